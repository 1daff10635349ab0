//! Matrix construction for the rendering pipeline.
//!
//! View and projection matrices are built explicitly here rather than through
//! nalgebra's convenience constructors so that degenerate camera input is
//! rejected with a typed error instead of propagating NaNs into the frame.

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use crate::error::CameraError;

/// Magnitude below which a vector is treated as having no direction.
pub const DIRECTION_EPSILON: f32 = 1e-6;

/// Normalize a vector, or `None` when its magnitude is below
/// [`DIRECTION_EPSILON`]. This is the zero-safe normalization policy used
/// throughout the pipeline.
pub fn try_direction(v: Vector3<f32>) -> Option<Vector3<f32>> {
    let len = v.norm();
    if len < DIRECTION_EPSILON {
        None
    } else {
        Some(v / len)
    }
}

/// Build a right-handed world-to-camera view matrix.
///
/// The camera basis is re-orthogonalized: `up` only has to be roughly
/// perpendicular to the look direction, the true up vector is recovered via
/// cross products.
pub fn look_at(
    position: Point3<f32>,
    target: Point3<f32>,
    up: Vector3<f32>,
) -> Result<Matrix4<f32>, CameraError> {
    let forward =
        try_direction(target - position).ok_or(CameraError::DegenerateLookDirection)?;
    let right = try_direction(forward.cross(&up)).ok_or(CameraError::DegenerateUpVector)?;
    let true_up = right.cross(&forward);

    let eye = position.coords;
    Ok(Matrix4::new(
        right.x,
        right.y,
        right.z,
        -right.dot(&eye),
        true_up.x,
        true_up.y,
        true_up.z,
        -true_up.dot(&eye),
        -forward.x,
        -forward.y,
        -forward.z,
        forward.dot(&eye),
        0.0,
        0.0,
        0.0,
        1.0,
    ))
}

/// Build a perspective projection matrix from a vertical field of view,
/// aspect ratio, and near/far distances.
///
/// Maps the view frustum into the canonical clip volume: after perspective
/// division x, y, z all land in [-1, 1], with z = -1 at the near plane.
pub fn perspective(
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
) -> Result<Matrix4<f32>, CameraError> {
    if !(fov_y > 0.0 && fov_y < std::f32::consts::PI) {
        return Err(CameraError::InvalidFieldOfView(fov_y));
    }
    if !(aspect > 0.0 && aspect.is_finite()) {
        return Err(CameraError::InvalidAspectRatio(aspect));
    }
    if !(near > 0.0 && near < far) {
        return Err(CameraError::InvalidDepthRange { near, far });
    }

    let f = 1.0 / (fov_y * 0.5).tan();
    let depth = near - far;
    Ok(Matrix4::new(
        f / aspect,
        0.0,
        0.0,
        0.0,
        0.0,
        f,
        0.0,
        0.0,
        0.0,
        0.0,
        (far + near) / depth,
        2.0 * far * near / depth,
        0.0,
        0.0,
        -1.0,
        0.0,
    ))
}

/// Build an orthographic projection matrix for a centered view volume of the
/// given width and height.
pub fn orthographic(
    width: f32,
    height: f32,
    near: f32,
    far: f32,
) -> Result<Matrix4<f32>, CameraError> {
    if !(width > 0.0 && height > 0.0) {
        return Err(CameraError::InvalidAspectRatio(width / height));
    }
    if near >= far {
        return Err(CameraError::InvalidDepthRange { near, far });
    }

    let depth = far - near;
    Ok(Matrix4::new(
        2.0 / width,
        0.0,
        0.0,
        0.0,
        0.0,
        2.0 / height,
        0.0,
        0.0,
        0.0,
        0.0,
        -2.0 / depth,
        -(far + near) / depth,
        0.0,
        0.0,
        0.0,
        1.0,
    ))
}

/// Inverse-transpose of the upper-left 3x3 of a model matrix, for
/// transforming normals. `None` when the matrix is singular.
pub fn normal_matrix(model: &Matrix4<f32>) -> Option<Matrix3<f32>> {
    let linear = model.fixed_view::<3, 3>(0, 0).into_owned();
    linear.try_inverse().map(|inv| inv.transpose())
}
