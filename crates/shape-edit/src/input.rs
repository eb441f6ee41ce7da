use serde::{Deserialize, Serialize};
use shape_core::Ray;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerKind {
    Down,
    Drag,
    Up,
    Move,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Resize symmetrically about the box center at double rate.
    pub precision: bool,
    /// Snap size changes to the grid increment.
    pub snap: bool,
}

/// Pointer input with the world-space ray under the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub ray: Ray,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, ray: Ray) -> Self {
        Self {
            kind,
            ray,
            modifiers: Modifiers::default(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
