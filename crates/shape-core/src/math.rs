use glam::Vec3;

use crate::EPSILON;

/// Relative slack so exact multiples survive float division.
const SNAP_SLACK: f32 = 1.0e-4;

pub fn is_near_zero(value: f32) -> bool {
    value.abs() < EPSILON
}

/// Per-axis sign where zero counts as positive.
pub fn sign(v: Vec3) -> Vec3 {
    Vec3::new(sign1(v.x), sign1(v.y), sign1(v.z))
}

pub fn abs(v: Vec3) -> Vec3 {
    v.abs()
}

fn sign1(value: f32) -> f32 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Rounds every axis toward zero to a whole multiple of `increment`.
/// Axes with a zero increment pass through untouched.
pub fn snap_toward_zero(value: Vec3, increment: Vec3) -> Vec3 {
    Vec3::new(
        snap1(value.x, increment.x),
        snap1(value.y, increment.y),
        snap1(value.z, increment.z),
    )
}

fn snap1(value: f32, increment: f32) -> f32 {
    let increment = increment.abs();
    if increment < EPSILON {
        return value;
    }
    let steps = value / increment;
    (steps + steps.signum() * SNAP_SLACK).trunc() * increment
}
