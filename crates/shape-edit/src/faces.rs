//! Per-face descriptors of the edited box, used for hit-testing and
//! drawing.
//!
//! Faces are expressed in handle space: origin at the box center, axes of
//! the owning object, extents multiplied by the object's scale. Normals stay
//! unit axes of the unscaled local space.

use glam::Vec3;
use shape_core::{is_near_zero, Bounds, Ray};
use shape_geom::ray_triangle_intersect;

pub const FACE_COUNT: usize = 6;

/// Outward normal and two tangents per face, with `u × v = normal` so the
/// corners below wind counter-clockwise seen from outside.
const FACE_AXES: [(Vec3, Vec3, Vec3); FACE_COUNT] = [
    (Vec3::X, Vec3::Y, Vec3::Z),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::Z, Vec3::X),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::Y, Vec3::X),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceData {
    pub points: [Vec3; 4],
    pub center: Vec3,
    pub normal: Vec3,
    /// Faces the eye. Back faces are drawn dimmed but stay interactive.
    pub is_visible: bool,
    /// False when the box is collapsed along this face's normal.
    pub is_valid: bool,
}

impl Default for FaceData {
    fn default() -> Self {
        Self {
            points: [Vec3::ZERO; 4],
            center: Vec3::ZERO,
            normal: Vec3::ZERO,
            is_visible: false,
            is_valid: false,
        }
    }
}

impl FaceData {
    /// Position of the face center along its own normal.
    pub fn offset(&self) -> f32 {
        self.center.dot(self.normal)
    }
}

/// Recomputes all six faces of `bounds`. `eye` is the viewpoint in handle
/// space.
pub fn update_faces(bounds: &Bounds, scale: Vec3, eye: Vec3, faces: &mut [FaceData; FACE_COUNT]) {
    let extents = (bounds.extents() * scale).abs();
    let size = bounds.size;

    for (face, (normal, u, v)) in faces.iter_mut().zip(FACE_AXES) {
        let center = normal * extents;
        let u = u * extents;
        let v = v * extents;
        face.points = [center - u - v, center + u - v, center + u + v, center - u + v];
        face.center = center;
        face.normal = normal;
        face.is_valid = !is_near_zero(size.dot(normal.abs()));
        face.is_visible = normal.dot(eye - center) > 0.0;
    }
}

/// True when `ray` (in handle space) passes through the face quad.
pub fn pointer_is_in_face(face: &FaceData, ray: &Ray) -> bool {
    let [p0, p1, p2, p3] = face.points;
    ray_triangle_intersect(ray.origin, ray.direction, p0, p1, p2).is_some()
        || ray_triangle_intersect(ray.origin, ray.direction, p0, p2, p3).is_some()
}
