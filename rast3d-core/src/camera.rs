//! Camera configuration and derived view/projection matrices.

use nalgebra::{Matrix4, Point3, Vector3};

use crate::error::CameraError;
use crate::math;

/// Projection mode for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering.
///
/// Mutated between frames by the driving application, read-only during a
/// render pass. Both matrices are pure functions of the current fields and
/// are recomputed every frame.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height as f32,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Create the view matrix (world-to-camera transform).
    ///
    /// Fails when the look direction is undefined or the up vector is
    /// parallel to it, rather than letting NaNs reach the pipeline.
    pub fn view_matrix(&self) -> Result<Matrix4<f32>, CameraError> {
        math::look_at(self.position, self.target, self.up)
    }

    /// Create the projection matrix (camera-to-clip transform).
    pub fn projection_matrix(&self) -> Result<Matrix4<f32>, CameraError> {
        match self.mode {
            ProjectionMode::Perspective => {
                math::perspective(self.fov, self.aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                // Frame roughly what the perspective camera would see at the
                // target distance.
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                math::orthographic(width, height, self.near, self.far)
            }
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}
