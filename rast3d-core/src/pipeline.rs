//! The render entry point: transform, clip, project, rasterize.
//!
//! One synchronous pass per frame. The caller owns the framebuffer and must
//! keep the mesh and camera stable for the duration of a call; the pipeline
//! itself holds no state between frames.

use nalgebra::Matrix4;
use tracing::debug;

use crate::camera::Camera;
use crate::clip::{self, ClipVertex};
use crate::color::Color;
use crate::error::RenderError;
use crate::framebuffer::Framebuffer;
use crate::mesh::Mesh;
use crate::raster::{self, ScreenVertex};
use crate::transform::Transform;

/// How triangle colors are produced for one draw call.
///
/// Selected once per call; the rasterizer itself never branches on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// Every face takes the same color.
    Flat(Color),
    /// Per-vertex colors interpolated across each face. Vertices without a
    /// color fall back to white.
    VertexColor,
}

impl Shading {
    fn resolve(&self, vertex_color: Option<Color>) -> Color {
        match self {
            Shading::Flat(color) => *color,
            Shading::VertexColor => vertex_color.unwrap_or(Color::WHITE),
        }
    }
}

/// Render a mesh with an identity model transform and per-vertex colors.
///
/// The framebuffer is not cleared here: the driver clears once per frame and
/// may compose several meshes into the same buffer.
pub fn render(
    mesh: &Mesh,
    camera: &Camera,
    framebuffer: &mut Framebuffer,
) -> Result<(), RenderError> {
    render_with(
        mesh,
        camera,
        &Matrix4::identity(),
        Shading::VertexColor,
        framebuffer,
    )
}

/// Render a mesh with an explicit model transform and shading selection.
///
/// Per face: transform the three vertices to clip space, clip against the
/// near plane, perspective-divide the survivors, map to pixel coordinates,
/// and scan-convert with depth testing. Clipping or culling everything away
/// is a valid, non-error outcome.
pub fn render_with(
    mesh: &Mesh,
    camera: &Camera,
    model: &Matrix4<f32>,
    shading: Shading,
    framebuffer: &mut Framebuffer,
) -> Result<(), RenderError> {
    mesh.validate()?;
    let view = camera.view_matrix()?;
    let projection = camera.projection_matrix()?;
    let mvp = Transform::mvp_matrix(model, &view, &projection);

    debug!(
        faces = mesh.face_count(),
        width = framebuffer.width(),
        height = framebuffer.height(),
        "rendering mesh"
    );

    for face in &mesh.faces {
        let triangle = [
            clip_vertex(mesh, face[0], &mvp, shading),
            clip_vertex(mesh, face[1], &mvp, shading),
            clip_vertex(mesh, face[2], &mvp, shading),
        ];
        for clipped in clip::clip_triangle_near(triangle).as_slice() {
            let screen = [
                to_screen(&clipped[0], framebuffer),
                to_screen(&clipped[1], framebuffer),
                to_screen(&clipped[2], framebuffer),
            ];
            raster::fill_triangle(framebuffer, screen);
        }
    }
    Ok(())
}

/// Map one mesh vertex to clip space, resolving its color.
///
/// Indices are in range here: `Mesh::validate` ran before the first face.
fn clip_vertex(mesh: &Mesh, index: u32, mvp: &Matrix4<f32>, shading: Shading) -> ClipVertex {
    let vertex = &mesh.vertices[index as usize];
    let position = mvp * vertex.position.to_homogeneous();
    ClipVertex::new(position, shading.resolve(vertex.color))
}

/// Perspective divide and viewport transform.
///
/// NDC x/y map affinely to `[0, width) x [0, height)` with y flipped so
/// screen y grows downwards; NDC z maps to the [0, 1] depth range used by
/// the framebuffer. Post-clip w is bounded away from zero, so the divisions
/// are safe.
fn to_screen(vertex: &ClipVertex, framebuffer: &Framebuffer) -> ScreenVertex {
    let w = vertex.position.w;
    let ndc_x = vertex.position.x / w;
    let ndc_y = vertex.position.y / w;
    let ndc_z = vertex.position.z / w;

    ScreenVertex::new(
        (ndc_x + 1.0) * 0.5 * framebuffer.width() as f32,
        (1.0 - ndc_y) * 0.5 * framebuffer.height() as f32,
        (ndc_z + 1.0) * 0.5,
        1.0 / w,
        vertex.color,
    )
}
