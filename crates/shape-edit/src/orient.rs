//! Rotation applied when an orientation arrow is released.

use glam::{Quat, Vec3};
use shape_core::sign;

/// Rotation taking the face `normal` onto the arrow `target`, expressed in
/// the shape's unmirrored space: both vectors are flipped on every axis
/// where `size` is negative. Returns the rotation and its signed angle in
/// radians, or `None` when the two directions are parallel.
pub fn orientation_delta(normal: Vec3, target: Vec3, size: Vec3) -> Option<(Quat, f32)> {
    let signs = sign(size);
    let current = (normal * signs).normalize_or_zero();
    let target = (target * signs).normalize_or_zero();

    let axis = current.cross(target);
    if axis.length_squared() < 1.0e-10 {
        return None;
    }
    let axis = axis.normalize();
    let angle = signed_angle(current, target, axis);
    Some((Quat::from_axis_angle(axis, angle), angle))
}

fn signed_angle(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let unsigned = from.angle_between(to);
    if axis.dot(from.cross(to)) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}
