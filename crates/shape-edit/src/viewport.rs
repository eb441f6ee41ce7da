use glam::Vec3;
use serde::{Deserialize, Serialize};

/// What the tool needs to know about the view it draws into.
pub trait Viewport {
    /// Eye position in world space.
    fn eye(&self) -> Vec3;

    /// World size of a handle that should look constant on screen at
    /// `position`.
    fn handle_size(&self, position: Vec3) -> f32;
}

/// Viewport with a constant handle size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedViewport {
    pub eye: Vec3,
    pub handle_size: f32,
}

impl FixedViewport {
    pub fn new(eye: Vec3, handle_size: f32) -> Self {
        Self { eye, handle_size }
    }
}

impl Viewport for FixedViewport {
    fn eye(&self) -> Vec3 {
        self.eye
    }

    fn handle_size(&self, _position: Vec3) -> f32 {
        self.handle_size
    }
}
