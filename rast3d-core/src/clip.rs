//! Near-plane clipping in homogeneous clip space.
//!
//! Clipping happens before the perspective divide: the near plane is the one
//! frustum plane whose violation breaks the arithmetic (w collapsing towards
//! zero flips and explodes coordinates during division). Triangles are
//! clipped against it here; the remaining frustum planes are handled by the
//! rasterizer's screen-bounds clamp.

use nalgebra::Vector4;

use crate::color::Color;

/// Minimum signed distance to the near plane, measured as `z + w` in clip
/// space. For the perspective projection this keeps post-clip `w` bounded
/// away from zero; for the orthographic projection (`w` = 1) it clips
/// geometry at `z` = -1.
pub const NEAR_PLANE_EPSILON: f32 = 1e-5;

/// A vertex in clip space with its carried attributes.
#[derive(Debug, Clone, Copy)]
pub struct ClipVertex {
    pub position: Vector4<f32>,
    pub color: Color,
}

impl ClipVertex {
    pub fn new(position: Vector4<f32>, color: Color) -> Self {
        Self { position, color }
    }

    /// Signed distance to the near plane. Non-negative means in front.
    fn near_distance(&self) -> f32 {
        self.position.z + self.position.w - NEAR_PLANE_EPSILON
    }

    fn is_in_front(&self) -> bool {
        self.near_distance() >= 0.0
    }

    /// Interpolate towards `other`, attributes included. Linear in clip
    /// space, which is exact for plane intersections.
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            position: self.position + (other.position - self.position) * t,
            color: self.color.lerp(other.color, t),
        }
    }

    /// The point on the segment to `other` that lies exactly on the near
    /// plane. Caller guarantees the segment crosses it.
    fn intersect_near(&self, other: &Self) -> Self {
        let da = self.near_distance();
        let db = other.near_distance();
        let t = da / (da - db);
        self.lerp(other, t)
    }
}

/// Zero, one, or two triangles surviving the near-plane clip.
#[derive(Debug, Clone, Copy)]
pub struct ClippedTriangles {
    triangles: [[ClipVertex; 3]; 2],
    count: usize,
}

impl ClippedTriangles {
    fn none() -> Self {
        let unset = ClipVertex::new(Vector4::zeros(), Color::BLACK);
        Self {
            triangles: [[unset; 3]; 2],
            count: 0,
        }
    }

    fn one(triangle: [ClipVertex; 3]) -> Self {
        let mut out = Self::none();
        out.triangles[0] = triangle;
        out.count = 1;
        out
    }

    fn two(first: [ClipVertex; 3], second: [ClipVertex; 3]) -> Self {
        let mut out = Self::none();
        out.triangles[0] = first;
        out.triangles[1] = second;
        out.count = 2;
        out
    }

    pub fn as_slice(&self) -> &[[ClipVertex; 3]] {
        &self.triangles[..self.count]
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Clip one triangle against the near plane.
///
/// Fully-in-front triangles pass through unchanged, fully-behind ones are
/// discarded, and straddling triangles are cut: one vertex in front yields a
/// single smaller triangle, two in front yield a quad that is re-triangulated
/// into two. Original winding order is preserved in every case.
pub fn clip_triangle_near(triangle: [ClipVertex; 3]) -> ClippedTriangles {
    let in_front = [
        triangle[0].is_in_front(),
        triangle[1].is_in_front(),
        triangle[2].is_in_front(),
    ];

    match in_front {
        [true, true, true] => ClippedTriangles::one(triangle),
        [false, false, false] => ClippedTriangles::none(),
        [true, false, false] => keep_one(triangle, 0),
        [false, true, false] => keep_one(triangle, 1),
        [false, false, true] => keep_one(triangle, 2),
        [false, true, true] => keep_two(triangle, 0),
        [true, false, true] => keep_two(triangle, 1),
        [true, true, false] => keep_two(triangle, 2),
    }
}

/// Only the vertex at `index` is in front: shrink to a single triangle.
/// Starting the cycle at the survivor keeps the original winding.
fn keep_one(triangle: [ClipVertex; 3], index: usize) -> ClippedTriangles {
    let a = triangle[index];
    let b = triangle[(index + 1) % 3];
    let c = triangle[(index + 2) % 3];
    ClippedTriangles::one([a, a.intersect_near(&b), a.intersect_near(&c)])
}

/// Only the vertex at `index` is behind: the surviving quad
/// `ab -> b -> c -> ca` is fanned into two triangles.
fn keep_two(triangle: [ClipVertex; 3], index: usize) -> ClippedTriangles {
    let a = triangle[index];
    let b = triangle[(index + 1) % 3];
    let c = triangle[(index + 2) % 3];
    let ab = a.intersect_near(&b);
    let ca = a.intersect_near(&c);
    ClippedTriangles::two([ab, b, c], [ab, c, ca])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cv(x: f32, y: f32, z: f32, w: f32) -> ClipVertex {
        ClipVertex::new(Vector4::new(x, y, z, w), Color::WHITE)
    }

    fn all_in_front(clipped: &ClippedTriangles) -> bool {
        clipped
            .as_slice()
            .iter()
            .flatten()
            .all(|v| v.position.z + v.position.w >= 0.0)
    }

    #[test]
    fn test_fully_in_front_passes_through() {
        let tri = [
            cv(0.0, 0.0, 0.0, 1.0),
            cv(1.0, 0.0, 0.0, 1.0),
            cv(0.0, 1.0, 0.0, 1.0),
        ];
        let clipped = clip_triangle_near(tri);
        assert_eq!(clipped.len(), 1);
        for (out, original) in clipped.as_slice()[0].iter().zip(tri.iter()) {
            assert_eq!(out.position, original.position);
        }
    }

    #[test]
    fn test_fully_behind_is_discarded() {
        let tri = [
            cv(0.0, 0.0, -2.0, 1.0),
            cv(1.0, 0.0, -3.0, 1.0),
            cv(0.0, 1.0, -2.5, 1.0),
        ];
        assert!(clip_triangle_near(tri).is_empty());
    }

    #[test]
    fn test_one_vertex_behind_yields_two_triangles() {
        // v0 is behind the near plane (z + w < 0), v1 and v2 in front.
        let tri = [
            cv(0.0, 0.0, -2.0, 1.0),
            cv(1.0, 0.0, 1.0, 1.0),
            cv(0.0, 1.0, 1.0, 1.0),
        ];
        let clipped = clip_triangle_near(tri);
        assert_eq!(clipped.len(), 2);
        assert!(all_in_front(&clipped));
    }

    #[test]
    fn test_two_vertices_behind_yields_one_triangle() {
        let tri = [
            cv(0.0, 0.0, 1.0, 1.0),
            cv(1.0, 0.0, -2.0, 1.0),
            cv(0.0, 1.0, -2.0, 1.0),
        ];
        let clipped = clip_triangle_near(tri);
        assert_eq!(clipped.len(), 1);
        assert!(all_in_front(&clipped));
        // The surviving corner is the original in-front vertex.
        assert_eq!(clipped.as_slice()[0][0].position, tri[0].position);
    }

    #[test]
    fn test_intersection_interpolates_attributes() {
        // Edge from d = -1 to d = +1 crosses the plane at its midpoint.
        let behind = ClipVertex::new(Vector4::new(0.0, 0.0, -1.0, 0.0), Color::BLACK);
        let in_front = ClipVertex::new(Vector4::new(2.0, 0.0, 1.0, 0.0), Color::WHITE);
        let cut = behind.intersect_near(&in_front);
        assert_relative_eq!(cut.position.x, 1.0, epsilon = 1e-4);
        assert_relative_eq!(cut.color.r, 0.5, epsilon = 1e-4);
        // The cut lands on the plane itself.
        assert_relative_eq!(
            cut.position.z + cut.position.w,
            NEAR_PLANE_EPSILON,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_clip_preserves_winding() {
        // A counter-clockwise triangle (in x-y) with one vertex behind stays
        // counter-clockwise after the cut: the signed area in x-y keeps its
        // sign because the cuts happen along the original edges.
        let tri = [
            cv(0.0, 0.0, -2.0, 1.0),
            cv(2.0, 0.0, 1.0, 1.0),
            cv(0.0, 2.0, 1.0, 1.0),
        ];
        for out in clip_triangle_near(tri).as_slice() {
            let (a, b, c) = (out[0].position, out[1].position, out[2].position);
            let signed_area =
                (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
            assert!(signed_area > 0.0);
        }
    }
}
