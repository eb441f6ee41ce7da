//! Handle identities, handle-space frame, arrow geometry and the draw data
//! handed back to the host.

use glam::{Mat4, Vec3};
use shape_core::Ray;
use shape_geom::ShapeComponent;

use crate::faces::FaceData;

pub const ARROWS_PER_FACE: usize = 4;

pub const BOUNDS_HANDLE_COLOR: [f32; 4] = [0.2, 0.4, 0.8, 1.0];
pub const SELECTED_HANDLE_COLOR: [f32; 4] = [1.0, 0.6, 0.1, 1.0];
pub const OUTLINE_WIDTH: f32 = 1.0;
pub const ARROW_WIDTH: f32 = 5.0;
pub const GUIDE_WIDTH: f32 = 3.0;

/// Identity of one interactive handle. Only one can be hot at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    FaceSize(usize),
    Orientation { face: usize, arrow: usize },
}

impl Control {
    pub fn is_orientation(&self) -> bool {
        matches!(self, Control::Orientation { .. })
    }

    pub fn face(&self) -> usize {
        match *self {
            Control::FaceSize(face) | Control::Orientation { face, .. } => face,
        }
    }
}

/// Frame centered on the shape box, rotated with the owning object and
/// unscaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleFrame {
    matrix: Mat4,
    inverse: Mat4,
}

impl Default for HandleFrame {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
        }
    }
}

impl HandleFrame {
    pub fn new(shape: &ShapeComponent) -> Self {
        let matrix = Mat4::from_rotation_translation(shape.transform().rotation, shape.world_center());
        Self {
            matrix,
            inverse: matrix.inverse(),
        }
    }

    pub fn to_world_point(&self, local: Vec3) -> Vec3 {
        self.matrix.transform_point3(local)
    }

    pub fn to_world_vector(&self, local: Vec3) -> Vec3 {
        self.matrix.transform_vector3(local)
    }

    pub fn to_local_point(&self, world: Vec3) -> Vec3 {
        self.inverse.transform_point3(world)
    }

    pub fn to_local_ray(&self, ray: &Ray) -> Ray {
        ray.transformed(&self.inverse)
    }
}

/// One orientation arrow drawn next to a face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHandle {
    pub control: Control,
    /// Back corner, tip, back corner.
    pub line: [Vec3; 3],
    /// In-face direction the arrow points to.
    pub direction: Vec3,
    pub side: Vec3,
    pub pick_center: Vec3,
    pub pick_half_size: f32,
}

impl ArrowHandle {
    pub fn tip(&self) -> Vec3 {
        self.line[1]
    }
}

/// Builds the four arrows of `face`, one per edge. `rect_size` is the
/// world size of the arrow's pick square.
pub fn face_arrows(
    face_index: usize,
    face: &FaceData,
    rect_size: f32,
    arrow_length: f32,
) -> [ArrowHandle; ARROWS_PER_FACE] {
    std::array::from_fn(|i| {
        let side = (face.points[(i + 1) % ARROWS_PER_FACE] - face.points[i]).normalize_or_zero();
        let direction = face.normal.normalize_or_zero().cross(side).normalize_or_zero();

        let top_direction = arrow_length * rect_size * direction;
        let top = face.center + top_direction;
        let big = top_direction.length();
        let a = 0.33 * (2.0 * big * big).sqrt();
        let h = 0.5 * (2.0 * a * a).sqrt();

        ArrowHandle {
            control: Control::Orientation {
                face: face_index,
                arrow: i,
            },
            line: [
                top - (h * direction + h * side),
                top,
                top - (h * direction - h * side),
            ],
            direction,
            side,
            pick_center: 0.8 * top + 0.2 * face.center,
            pick_half_size: rect_size / 2.0,
        }
    })
}

/// Distance from the ray's hit on the arrow plane to the arrow's pick
/// square; zero inside.
pub fn distance_to_arrow(ray: &Ray, arrow: &ArrowHandle) -> f32 {
    let normal = arrow.direction.cross(arrow.side);
    let Some(t) = ray.intersect_plane(arrow.pick_center, normal) else {
        return f32::INFINITY;
    };
    let offset = ray.at(t) - arrow.pick_center;
    let dx = (offset.dot(arrow.direction).abs() - arrow.pick_half_size).max(0.0);
    let dy = (offset.dot(arrow.side).abs() - arrow.pick_half_size).max(0.0);
    (dx * dx + dy * dy).sqrt()
}

/// Dot slider on a face center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeHandle {
    pub control: Control,
    pub position: Vec3,
    pub normal: Vec3,
    pub radius: f32,
    pub pick_radius: f32,
    pub dimmed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GizmoLine {
    pub points: Vec<Vec3>,
    pub color: [f32; 4],
    pub width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoDot {
    pub position: Vec3,
    pub radius: f32,
    pub color: [f32; 4],
}

/// World-space draw data for one frame of the edit tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HandleOverlay {
    pub outlines: Vec<GizmoLine>,
    pub dots: Vec<GizmoDot>,
    pub arrows: Vec<GizmoLine>,
    pub guide: Option<GizmoLine>,
}

pub(crate) fn with_alpha(color: [f32; 4], factor: f32) -> [f32; 4] {
    [color[0], color[1], color[2], color[3] * factor]
}
