//! Converts slider motion along a face normal into a size change.

use glam::Vec3;
use shape_core::{sign, snap_toward_zero};

/// Result of one incremental resize frame, in local unscaled units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeStep {
    /// Amount added to the shape size.
    pub size_offset: Vec3,
    /// Part of the input held back by snapping, carried to the next frame.
    pub leftover: Vec3,
    /// Movement of the box center needed to keep the opposite face fixed,
    /// pre-signed so that applying the object scale to it yields a move
    /// along the handle's own normal.
    pub center_shift: Vec3,
}

/// `raw` is the slider displacement along `normal` since the previous
/// frame, in handle-space units. With `symmetric` set the box grows on both
/// sides: the delta is doubled and the center stays put. `snap` is the
/// active grid increment, if any.
pub fn resize_step(
    raw: f32,
    normal: Vec3,
    size: Vec3,
    scale: Vec3,
    leftover: Vec3,
    symmetric: bool,
    snap: Option<Vec3>,
) -> ResizeStep {
    let axis = normal.abs();
    let signs = sign(size);
    let axis_scale = scale.dot(axis).abs();
    let delta = axis * (raw / axis_scale) * signs;

    let modifier = if symmetric { 2.0 } else { 1.0 };
    let combined = modifier * delta + leftover;
    let size_offset = match snap {
        Some(increment) => snap_toward_zero(combined, increment),
        None => combined,
    };

    let center_shift = if symmetric {
        Vec3::ZERO
    } else {
        normal * ((size_offset * signs).dot(axis) * 0.5) * sign(scale)
    };

    ResizeStep {
        size_offset,
        leftover: combined - size_offset,
        center_shift,
    }
}
