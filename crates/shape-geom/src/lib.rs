//! Geometry layer: mesh generation backed by Truck and the shape rebuild
//! pipeline.

mod component;
mod generators;

pub use component::{ShapeBoxProperties, ShapeComponent};
pub use generators::{fit_to_size, generate, make_box, make_cylinder, tessellate_solid};

use glam::{Quat, Vec3};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeomError {
    #[error("tessellation failed: {0}")]
    Tessellation(String),
    #[error("invalid shape descriptor: {0}")]
    InvalidDescriptor(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aabb {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Aabb {
    pub fn size(&self) -> Vec3 {
        Vec3::from_array(self.max) - Vec3::from_array(self.min)
    }

    pub fn center(&self) -> Vec3 {
        (Vec3::from_array(self.max) + Vec3::from_array(self.min)) * 0.5
    }
}

impl TriMesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn aabb(&self) -> Aabb {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for p in &self.positions {
            let v = Vec3::from_array(*p);
            min = min.min(v);
            max = max.max(v);
        }
        if !min.is_finite() || !max.is_finite() {
            return Aabb::default();
        }
        Aabb {
            min: min.to_array(),
            max: max.to_array(),
        }
    }

    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p = (Vec3::from_array(*p) + offset).to_array();
        }
    }

    pub fn rotate(&mut self, rotation: Quat) {
        for p in &mut self.positions {
            *p = (rotation * Vec3::from_array(*p)).to_array();
        }
        for n in &mut self.normals {
            *n = (rotation * Vec3::from_array(*n)).to_array();
        }
    }

    /// Mirrors every axis whose sign is negative. Winding is reversed when
    /// the mirror turns the mesh inside out.
    pub fn mirror(&mut self, signs: Vec3) {
        for p in &mut self.positions {
            *p = (Vec3::from_array(*p) * signs).to_array();
        }
        for n in &mut self.normals {
            *n = (Vec3::from_array(*n) * signs).to_array();
        }
        if signs.x * signs.y * signs.z < 0.0 {
            for tri in self.indices.chunks_exact_mut(3) {
                tri.swap(1, 2);
            }
        }
    }
}

/// Möller–Trumbore test; returns the hit distance along `ray_d`.
pub fn ray_triangle_intersect(ray_o: Vec3, ray_d: Vec3, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    let eps = 1.0e-6;
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let pvec = ray_d.cross(e2);
    let det = e1.dot(pvec);
    if det.abs() < eps {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = ray_o - v0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(e1);
    let v = ray_d.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(qvec) * inv_det;
    if t > eps {
        Some(t)
    } else {
        None
    }
}
