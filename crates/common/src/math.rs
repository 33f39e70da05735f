//! Row-vector, left-handed matrix helpers.
//!
//! A row-vector matrix with rows `r0..r3` is stored as the glam matrix with
//! columns `r0..r3`, so the memory layout is identical and the matrix can be
//! uploaded to a shader as-is. The row-vector product `a × b` ("apply `a`,
//! then `b`") is therefore `b * a` in glam.

use glam::{Mat3, Mat4, Vec3, Vec4};

/// Row-vector composition: the result applies `first`, then `second`.
#[inline]
pub fn compose(first: Mat4, second: Mat4) -> Mat4 {
    second * first
}

/// `world × inverse_view × projection`.
#[inline]
pub fn world_view_projection(world: Mat4, inverse_view: Mat4, projection: Mat4) -> Mat4 {
    compose(compose(world, inverse_view), projection)
}

/// Orthonormal basis matrix with the basis vectors as rows and `origin` as
/// the translation row. This is the camera-to-world transform.
pub fn onb_matrix(right: Vec3, up: Vec3, forward: Vec3, origin: Vec3) -> Mat4 {
    Mat4::from_cols(
        right.extend(0.0),
        up.extend(0.0),
        forward.extend(0.0),
        origin.extend(1.0),
    )
}

/// Left-handed perspective projection with depth mapped to `[0, 1]`.
///
/// `fov_y` is the full vertical angle in radians.
pub fn perspective_lh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    let fov_value = (fov_y * 0.5).tan();
    let depth = far / (far - near);

    Mat4::from_cols(
        Vec4::new(1.0 / (aspect * fov_value), 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0 / fov_value, 0.0, 0.0),
        Vec4::new(0.0, 0.0, depth, 1.0),
        Vec4::new(0.0, 0.0, -near * depth, 0.0),
    )
}

/// `translate(-pivot) × rotate_y(angle) × translate(pivot)`: a rotation about
/// the vertical axis through `pivot`.
pub fn rotation_about_pivot(pivot: Vec3, angle: f32) -> Mat4 {
    let to_origin = Mat4::from_translation(-pivot);
    let rotation = Mat4::from_rotation_y(angle);
    let back = Mat4::from_translation(pivot);
    compose(compose(to_origin, rotation), back)
}

/// Unit forward vector for the given yaw/pitch (radians): pitch about X
/// first, then yaw about Y, applied to +Z.
pub fn forward_from_yaw_pitch(yaw: f32, pitch: f32) -> Vec3 {
    let rotation = Mat3::from_rotation_y(yaw) * Mat3::from_rotation_x(-pitch);
    (rotation * Vec3::Z).normalize()
}

/// Inverse of [`forward_from_yaw_pitch`] for a unit vector: `(yaw, pitch)`.
pub fn yaw_pitch_from_forward(forward: Vec3) -> (f32, f32) {
    let pitch = forward.y.clamp(-1.0, 1.0).asin();
    let yaw = forward.x.atan2(forward.z);
    (yaw, pitch)
}
