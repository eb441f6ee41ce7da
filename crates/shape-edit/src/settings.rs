use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::input::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapSettings {
    pub enabled: bool,
    /// Per-axis grid size used for incremental snapping.
    pub increment: Vec3,
}

impl Default for SnapSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            increment: Vec3::splat(0.25),
        }
    }
}

impl SnapSettings {
    /// Increment to snap to for this frame, if snapping applies.
    pub fn active_increment(&self, modifiers: Modifiers) -> Option<Vec3> {
        (self.enabled && modifiers.snap).then_some(self.increment)
    }
}

/// Handle sizes, as fractions of the viewport's handle size at the handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleSettings {
    pub midpoint_handle_size: f32,
    pub midpoint_square_size: f32,
    /// Arrow tip distance from the face center, in pick squares.
    pub arrow_length: f32,
    /// Slider pick radius as a multiple of the dot radius.
    pub size_pick_factor: f32,
    pub arrow_pick_tolerance: f32,
}

impl Default for HandleSettings {
    fn default() -> Self {
        Self {
            midpoint_handle_size: 0.03,
            midpoint_square_size: 0.15,
            arrow_length: 2.5,
            size_pick_factor: 2.0,
            arrow_pick_tolerance: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    pub snap: SnapSettings,
    pub handles: HandleSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapping_needs_flag_and_modifier() {
        let snap = SnapSettings::default();
        let held = Modifiers {
            precision: false,
            snap: true,
        };
        assert_eq!(snap.active_increment(held), Some(Vec3::splat(0.25)));
        assert_eq!(snap.active_increment(Modifiers::default()), None);
        let off = SnapSettings {
            enabled: false,
            ..snap
        };
        assert_eq!(off.active_increment(held), None);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let settings: ToolSettings =
            serde_json::from_str(r#"{ "snap": { "increment": [0.5, 0.5, 1.0] } }"#).unwrap();
        assert!(settings.snap.enabled);
        assert_eq!(settings.snap.increment, Vec3::new(0.5, 0.5, 1.0));
        assert_eq!(settings.handles, HandleSettings::default());
    }
}
