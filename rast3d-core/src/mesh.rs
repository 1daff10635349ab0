//! Indexed triangle mesh data.
//!
//! A [`Mesh`] is produced once by a loader (or built by hand) and is
//! read-only to the renderer: the pipeline never mutates vertices or faces.

use nalgebra::{Point3, Vector3};

use crate::color::Color;
use crate::error::MeshError;

/// A mesh vertex: a position plus optional shading attributes.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Option<Vector3<f32>>,
    pub color: Option<Color>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: None,
            color: None,
        }
    }

    pub fn with_normal(mut self, normal: Vector3<f32>) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }
}

/// A triangle face: three indices into the mesh's vertex list.
pub type Face = [u32; 3];

/// An indexed triangle mesh.
///
/// Faces reference vertices by index; [`Mesh::validate`] checks that every
/// index is in range. Winding is consistent per mesh (the built-in solids use
/// counter-clockwise seen from outside) but the rasterizer accepts either
/// orientation.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    pub fn from_parts(vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    /// Append an n-gon as a fan of triangles sharing the first vertex.
    ///
    /// The polygon must be convex and planar for the fan to be faithful;
    /// loaders that hand over quads or larger faces go through here.
    pub fn add_polygon(&mut self, indices: &[u32]) -> Result<(), MeshError> {
        if indices.len() < 3 {
            return Err(MeshError::PolygonTooSmall(indices.len()));
        }
        for corner in 1..indices.len() - 1 {
            self.faces
                .push([indices[0], indices[corner], indices[corner + 1]]);
        }
        Ok(())
    }

    /// Check that every face index is in range.
    ///
    /// Fails fast on the first violation; indices are never clamped, since
    /// that would silently corrupt geometry.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertex_count = self.vertices.len();
        for (face_index, face) in self.faces.iter().enumerate() {
            for &index in face {
                if index as usize >= vertex_count {
                    return Err(MeshError::FaceIndexOutOfRange {
                        face: face_index,
                        index,
                        vertex_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// A single triangle mesh, mostly for tests and demos.
    pub fn triangle(a: Vertex, b: Vertex, c: Vertex) -> Self {
        Self {
            vertices: vec![a, b, c],
            faces: vec![[0, 1, 2]],
        }
    }

    /// An axis-aligned cube centered at the origin.
    ///
    /// Each of the six sides carries its own four vertices so normals stay
    /// flat per side; 24 vertices, 12 faces.
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(24, 12);

        let sides: [(Vector3<f32>, [Point3<f32>; 4]); 6] = [
            // Front (+z)
            (
                Vector3::new(0.0, 0.0, 1.0),
                [
                    Point3::new(-half, -half, half),
                    Point3::new(half, -half, half),
                    Point3::new(half, half, half),
                    Point3::new(-half, half, half),
                ],
            ),
            // Back (-z)
            (
                Vector3::new(0.0, 0.0, -1.0),
                [
                    Point3::new(half, -half, -half),
                    Point3::new(-half, -half, -half),
                    Point3::new(-half, half, -half),
                    Point3::new(half, half, -half),
                ],
            ),
            // Top (+y)
            (
                Vector3::new(0.0, 1.0, 0.0),
                [
                    Point3::new(-half, half, half),
                    Point3::new(half, half, half),
                    Point3::new(half, half, -half),
                    Point3::new(-half, half, -half),
                ],
            ),
            // Bottom (-y)
            (
                Vector3::new(0.0, -1.0, 0.0),
                [
                    Point3::new(-half, -half, -half),
                    Point3::new(half, -half, -half),
                    Point3::new(half, -half, half),
                    Point3::new(-half, -half, half),
                ],
            ),
            // Right (+x)
            (
                Vector3::new(1.0, 0.0, 0.0),
                [
                    Point3::new(half, -half, half),
                    Point3::new(half, -half, -half),
                    Point3::new(half, half, -half),
                    Point3::new(half, half, half),
                ],
            ),
            // Left (-x)
            (
                Vector3::new(-1.0, 0.0, 0.0),
                [
                    Point3::new(-half, -half, -half),
                    Point3::new(-half, -half, half),
                    Point3::new(-half, half, half),
                    Point3::new(-half, half, -half),
                ],
            ),
        ];

        for (normal, corners) in sides {
            let base = mesh.vertices.len() as u32;
            for corner in corners {
                mesh.vertices.push(
                    Vertex::new(corner.x, corner.y, corner.z).with_normal(normal),
                );
            }
            mesh.add_face([base, base + 1, base + 2]);
            mesh.add_face([base, base + 2, base + 3]);
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_well_formed_mesh() {
        let mesh = Mesh::cube(2.0);
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.face_count(), 12);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_index() {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Vertex::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Vertex::new(1.0, 0.0, 0.0));
        mesh.add_face([0, 1, 2]);

        assert_eq!(
            mesh.validate(),
            Err(MeshError::FaceIndexOutOfRange {
                face: 0,
                index: 2,
                vertex_count: 2,
            })
        );
    }

    #[test]
    fn test_add_polygon_fans_a_quad() {
        let mut mesh = Mesh::new();
        for i in 0..4 {
            mesh.add_vertex(Vertex::new(i as f32, 0.0, 0.0));
        }
        mesh.add_polygon(&[0, 1, 2, 3]).unwrap();
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_add_polygon_rejects_degenerate() {
        let mut mesh = Mesh::new();
        assert_eq!(
            mesh.add_polygon(&[0, 1]),
            Err(MeshError::PolygonTooSmall(2))
        );
    }

    #[test]
    fn test_cube_normals_point_outward() {
        let mesh = Mesh::cube(2.0);
        for vertex in &mesh.vertices {
            let normal = vertex.normal.expect("cube vertices carry normals");
            // Each cube vertex sits on the side its normal points out of.
            assert!(vertex.position.coords.dot(&normal) > 0.0);
        }
    }
}
