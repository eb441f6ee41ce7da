//! Core shape model shared by the geometry and editing layers.

mod math;

pub use math::{abs, is_near_zero, sign, snap_toward_zero};

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Threshold under which an axis is treated as collapsed.
pub const EPSILON: f32 = 1.0e-5;

/// Axis-aligned box in a shape's local space. `size` may be negative on
/// any axis to encode a flipped extent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub center: Vec3,
    pub size: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            size: Vec3::ZERO,
        }
    }
}

impl Bounds {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    pub fn extents(&self) -> Vec3 {
        self.size * 0.5
    }

    pub fn min(&self) -> Vec3 {
        self.center - self.extents().abs()
    }

    pub fn max(&self) -> Vec3 {
        self.center + self.extents().abs()
    }

    /// True when every axis has a non-degenerate extent.
    pub fn is_solid(&self) -> bool {
        let size = self.size.abs();
        size.x > EPSILON && size.y > EPSILON && size.z > EPSILON
    }
}

/// Placement of the object that owns a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.translation + self.transform_vector(local)
    }

    pub fn transform_vector(&self, local: Vec3) -> Vec3 {
        self.rotation * (self.scale * local)
    }
}

/// Half-line used for pointer picking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self::new(
            matrix.transform_point3(self.origin),
            matrix.transform_vector3(self.direction),
        )
    }

    /// Distance from `point` to the closest point of the ray.
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        let t = (point - self.origin).dot(self.direction).max(0.0);
        self.at(t).distance(point)
    }

    /// Parameter along the plane hit, if the ray crosses the plane in front
    /// of its origin.
    pub fn intersect_plane(&self, point: Vec3, normal: Vec3) -> Option<f32> {
        let denom = normal.dot(self.direction);
        if denom.abs() < 1.0e-6 {
            return None;
        }
        let t = (point - self.origin).dot(normal) / denom;
        (t >= 0.0).then_some(t)
    }

    /// Parameter along the line `line_origin + s * line_dir` of the point
    /// closest to this ray. `None` when ray and line are parallel.
    pub fn closest_on_line(&self, line_origin: Vec3, line_dir: Vec3) -> Option<f32> {
        let u = line_dir.normalize_or_zero();
        let v = self.direction;
        let w = line_origin - self.origin;
        let b = u.dot(v);
        let denom = 1.0 - b * b;
        if denom < 1.0e-6 {
            return None;
        }
        let d = u.dot(w);
        let e = v.dot(w);
        Some((b * e - d) / denom)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PivotLocation {
    #[default]
    Center,
    FirstVertex,
}

/// Procedural primitive variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeKind {
    Cube,
    Cylinder,
    Plane { width_cuts: u32, height_cuts: u32 },
    Sprite,
}

impl Default for ShapeKind {
    fn default() -> Self {
        ShapeKind::Cube
    }
}

impl ShapeKind {
    /// Flat variants live in the XZ plane and carry no height.
    pub fn is_2d(&self) -> bool {
        matches!(self, ShapeKind::Plane { .. } | ShapeKind::Sprite)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Cube => "Cube",
            ShapeKind::Cylinder => "Cylinder",
            ShapeKind::Plane { .. } => "Plane",
            ShapeKind::Sprite => "Sprite",
        }
    }

    /// Extents a generated mesh of this kind occupies for `size`.
    pub fn footprint(&self, size: Vec3) -> Vec3 {
        if self.is_2d() {
            Vec3::new(size.x, 0.0, size.z)
        } else {
            size
        }
    }
}

/// Abstract description of one primitive: what to build and the oriented
/// box it fills.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub size: Vec3,
    pub rotation: Quat,
    pub shape_box: Bounds,
}

impl Default for Shape {
    fn default() -> Self {
        Self::new(ShapeKind::Cube, Vec3::ONE)
    }
}

impl Shape {
    pub fn new(kind: ShapeKind, size: Vec3) -> Self {
        Self {
            kind,
            size,
            rotation: Quat::IDENTITY,
            shape_box: Bounds::new(Vec3::ZERO, kind.footprint(size)),
        }
    }
}

/// Persisted per-instance record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeDescriptor {
    pub shape: ShapeKind,
    pub size: Vec3,
    pub rotation: Quat,
    pub shape_box: Bounds,
    #[serde(default)]
    pub pivot_location: PivotLocation,
}

impl ShapeDescriptor {
    pub fn new(shape: &Shape, pivot_location: PivotLocation) -> Self {
        Self {
            shape: shape.kind,
            size: shape.size,
            rotation: shape.rotation,
            shape_box: shape.shape_box,
            pivot_location,
        }
    }

    pub fn to_shape(&self) -> Shape {
        Shape {
            kind: self.shape,
            size: self.size,
            rotation: self.rotation,
            shape_box: self.shape_box,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.size.is_finite()
            && self.rotation.is_finite()
            && self.shape_box.center.is_finite()
            && self.shape_box.size.is_finite()
    }
}
