//! Error types for the rendering core.

use thiserror::Error;

/// Errors raised while validating or constructing mesh data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    /// A face references a vertex index outside the vertex list.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },

    /// A polygon with fewer than three vertices cannot be triangulated.
    #[error("polygon with {0} vertices cannot be triangulated")]
    PolygonTooSmall(usize),

    /// STL data could not be parsed.
    #[error("failed to parse STL data: {0}")]
    Parse(String),
}

/// Errors raised while deriving matrices from a camera configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CameraError {
    /// Position and target coincide, so the look direction is undefined.
    #[error("camera position and target coincide, look direction is undefined")]
    DegenerateLookDirection,

    /// The up vector is zero or parallel to the look direction.
    #[error("camera up vector is zero or parallel to the look direction")]
    DegenerateUpVector,

    /// Vertical field of view outside (0, pi).
    #[error("vertical field of view must be in (0, pi) radians, got {0}")]
    InvalidFieldOfView(f32),

    /// Aspect ratio must be positive and finite.
    #[error("aspect ratio must be positive, got {0}")]
    InvalidAspectRatio(f32),

    /// Near/far planes must satisfy 0 < near < far.
    #[error("depth planes must satisfy 0 < near < far, got near {near}, far {far}")]
    InvalidDepthRange {
        /// Near plane distance.
        near: f32,
        /// Far plane distance.
        far: f32,
    },
}

/// Umbrella error returned by a render call.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// The mesh failed its integrity check.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// The camera configuration is degenerate.
    #[error(transparent)]
    Camera(#[from] CameraError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::FaceIndexOutOfRange {
            face: 7,
            index: 42,
            vertex_count: 12,
        };
        let msg = format!("{err}");
        assert!(msg.contains("face 7"));
        assert!(msg.contains("42"));

        let err = CameraError::InvalidDepthRange {
            near: 10.0,
            far: 0.1,
        };
        assert!(format!("{err}").contains("near 10"));
    }

    #[test]
    fn test_render_error_from() {
        let err: RenderError = CameraError::DegenerateLookDirection.into();
        assert!(matches!(err, RenderError::Camera(_)));
    }
}
