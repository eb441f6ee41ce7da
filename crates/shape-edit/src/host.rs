//! Commit path from the edit session into a shape. Every commit records an
//! undo checkpoint with the host, mutates and rebuilds the shape, then asks
//! the host to repaint.

use glam::{Quat, Vec3};
use shape_core::Bounds;
use shape_geom::ShapeComponent;
use tracing::{debug, warn};

use crate::EditError;

pub const RESIZE_SHAPE: &str = "Resize Shape";
pub const ROTATE_SHAPE: &str = "Rotate Shape";

/// Capabilities the editor host provides to the tool.
pub trait EditorHost {
    /// Records the state of `shape`, its transform and mesh so the change
    /// that follows can be undone.
    fn begin_undoable_change(&mut self, shape: &ShapeComponent, label: &str);

    fn request_repaint(&mut self);
}

/// Host that only remembers what it was asked to do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingHost {
    pub checkpoints: Vec<String>,
    pub repaints: usize,
}

impl EditorHost for RecordingHost {
    fn begin_undoable_change(&mut self, _shape: &ShapeComponent, label: &str) {
        self.checkpoints.push(label.to_string());
    }

    fn request_repaint(&mut self) {
        self.repaints += 1;
    }
}

/// Resizes `shape` to `new_size` around the world-space `new_center`.
pub fn apply_properties<H: EditorHost + ?Sized>(
    host: &mut H,
    shape: &mut ShapeComponent,
    new_center: Vec3,
    new_size: Vec3,
) -> Result<(), EditError> {
    if !new_center.is_finite() || !new_size.is_finite() {
        warn!(?new_center, ?new_size, "non-finite resize candidate");
    }
    host.begin_undoable_change(shape, RESIZE_SHAPE);
    shape.update_bounds(Bounds::new(new_center, new_size))?;
    debug!(size = ?new_size, center = ?new_center, "resized shape");
    host.request_repaint();
    Ok(())
}

/// Left-multiplies `delta` onto the shape rotation, keeping it fitted to
/// its box.
pub fn rotate_inside_bounds<H: EditorHost + ?Sized>(
    host: &mut H,
    shape: &mut ShapeComponent,
    delta: Quat,
) -> Result<(), EditError> {
    host.begin_undoable_change(shape, ROTATE_SHAPE);
    shape.rotate_inside_bounds(delta)?;
    debug!(rotation = ?shape.rotation(), "rotated shape inside bounds");
    host.request_repaint();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shape_core::ShapeKind;

    #[test]
    fn commits_checkpoint_then_repaint() {
        let mut host = RecordingHost::default();
        let mut shape = ShapeComponent::new(ShapeKind::Cube, Vec3::ONE).unwrap();
        apply_properties(&mut host, &mut shape, Vec3::X, Vec3::splat(2.0)).unwrap();
        rotate_inside_bounds(&mut host, &mut shape, Quat::from_rotation_y(0.5)).unwrap();
        assert_eq!(host.checkpoints, vec![RESIZE_SHAPE, ROTATE_SHAPE]);
        assert_eq!(host.repaints, 2);
        assert_eq!(shape.size(), Vec3::splat(2.0));
        assert!(shape.world_center().abs_diff_eq(Vec3::X, 1.0e-5));
    }
}
