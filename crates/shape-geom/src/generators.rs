use glam::{Quat, Vec3};
use shape_core::{sign, Bounds, ShapeKind, EPSILON};
use truck_meshalgo::{filters::*, tessellation::*};
use truck_modeling::{builder, InnerSpace, Point3, Rad, Solid, Vector3};
use truck_polymesh::{PolygonMesh, StandardAttributes, StandardVertex, TOLERANCE};

use crate::{GeomError, TriMesh};

const TESSELLATION_TOLERANCE: f64 = 0.01;

/// Builds the mesh for one shape variant: a unit primitive, rotated by
/// `rotation`, then mirrored on every axis where `size` is negative.
/// The result still has to be fitted to the shape box.
pub fn generate(kind: ShapeKind, size: Vec3, rotation: Quat) -> Result<TriMesh, GeomError> {
    let mut mesh = match kind {
        ShapeKind::Cube => tessellate_solid(&make_box(1.0, 1.0, 1.0), TESSELLATION_TOLERANCE),
        ShapeKind::Cylinder => tessellate_solid(&make_cylinder(0.5, 1.0)?, TESSELLATION_TOLERANCE),
        ShapeKind::Plane {
            width_cuts,
            height_cuts,
        } => make_grid(width_cuts + 1, height_cuts + 1),
        ShapeKind::Sprite => make_grid(1, 1),
    };
    mesh.rotate(rotation);
    mesh.mirror(sign(size));
    Ok(mesh)
}

/// Scales `mesh` so its bounds match `|target.size|` around `target.center`.
/// Axes along which the mesh is flat are left untouched.
pub fn fit_to_size(mesh: &mut TriMesh, target: &Bounds) {
    if mesh.positions.is_empty() {
        return;
    }
    let aabb = mesh.aabb();
    let current = aabb.size();
    let wanted = target.size.abs();
    let factor = Vec3::select(current.cmpgt(Vec3::splat(EPSILON)), wanted / current, Vec3::ONE);
    let inverse = Vec3::select(factor.cmpgt(Vec3::splat(EPSILON)), factor.recip(), Vec3::ONE);
    let origin = aabb.center();

    for p in &mut mesh.positions {
        let v = (Vec3::from_array(*p) - origin) * factor + target.center;
        *p = v.to_array();
    }
    for n in &mut mesh.normals {
        let original = Vec3::from_array(*n);
        let scaled = (original * inverse).normalize_or_zero();
        *n = if scaled == Vec3::ZERO { original } else { scaled }.to_array();
    }
}

pub fn make_box(w: f64, h: f64, d: f64) -> Solid {
    let v = builder::vertex(Point3::new(-w / 2.0, -h / 2.0, -d / 2.0));
    let e = builder::tsweep(&v, Vector3::unit_x() * w);
    let f = builder::tsweep(&e, Vector3::unit_y() * h);
    builder::tsweep(&f, Vector3::unit_z() * d)
}

pub fn make_cylinder(r: f64, h: f64) -> Result<Solid, GeomError> {
    let vertex = builder::vertex(Point3::new(0.0, -h / 2.0, r));
    let circle = builder::rsweep(
        &vertex,
        Point3::new(0.0, 0.0, 0.0),
        Vector3::unit_y(),
        Rad(std::f64::consts::TAU),
    );
    let disk = builder::try_attach_plane(&[circle])
        .map_err(|err| GeomError::Tessellation(err.to_string()))?;
    Ok(builder::tsweep(&disk, Vector3::new(0.0, h, 0.0)))
}

pub fn tessellate_solid(solid: &Solid, tolerance: f64) -> TriMesh {
    let mut poly = solid.triangulation(tolerance).to_polygon();
    poly.put_together_same_attrs(TOLERANCE * 10.0)
        .remove_degenerate_faces()
        .remove_unused_attrs();
    polygon_to_trimesh(&poly)
}

/// Unit grid in the XZ plane facing +Y, `cols` by `rows` cells.
fn make_grid(cols: u32, rows: u32) -> TriMesh {
    let cols = cols.max(1);
    let rows = rows.max(1);
    let mut mesh = TriMesh::default();

    for j in 0..=rows {
        for i in 0..=cols {
            let x = i as f32 / cols as f32 - 0.5;
            let z = j as f32 / rows as f32 - 0.5;
            mesh.positions.push([x, 0.0, z]);
            mesh.normals.push([0.0, 1.0, 0.0]);
        }
    }

    let stride = cols + 1;
    for j in 0..rows {
        for i in 0..cols {
            let a = j * stride + i;
            let b = a + 1;
            let d = a + stride;
            let c = d + 1;
            mesh.indices.extend_from_slice(&[a, d, c, a, c, b]);
        }
    }
    mesh
}

fn polygon_to_trimesh(poly: &PolygonMesh<StandardVertex, StandardAttributes>) -> TriMesh {
    let attrs = poly.attributes();
    let mut mesh = TriMesh::default();
    let mut index = 0u32;

    for tri in poly.faces().triangle_iter() {
        let p0 = attrs.positions[tri[0].pos];
        let p1 = attrs.positions[tri[1].pos];
        let p2 = attrs.positions[tri[2].pos];
        let fallback = face_normal(p0, p1, p2);

        for v in tri {
            let p = attrs.positions[v.pos];
            let n = v
                .nor
                .and_then(|idx| attrs.normals.get(idx))
                .map(vector_to_array)
                .unwrap_or(fallback);
            mesh.positions.push(point_to_array(p));
            mesh.normals.push(n);
            mesh.indices.push(index);
            index += 1;
        }
    }

    mesh
}

fn point_to_array(p: Point3) -> [f32; 3] {
    [p.x as f32, p.y as f32, p.z as f32]
}

fn vector_to_array(v: &Vector3) -> [f32; 3] {
    [v.x as f32, v.y as f32, v.z as f32]
}

fn face_normal(p0: Point3, p1: Point3, p2: Point3) -> [f32; 3] {
    let u = p1 - p0;
    let v = p2 - p0;
    let n = u.cross(v);
    if n.magnitude2() > 1.0e-12 {
        let n = n.normalize();
        [n.x as f32, n.y as f32, n.z as f32]
    } else {
        [0.0, 1.0, 0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn plane_grid_counts_follow_cuts() {
        let mesh = generate(
            ShapeKind::Plane {
                width_cuts: 2,
                height_cuts: 1,
            },
            Vec3::ONE,
            Quat::IDENTITY,
        )
        .unwrap();
        assert_eq!(mesh.vertex_count(), 4 * 3);
        assert_eq!(mesh.triangle_count(), 3 * 2 * 2);
        assert_eq!(mesh.aabb().size().y, 0.0);
    }

    #[test]
    fn grid_triangles_face_up() {
        let mesh = make_grid(1, 1);
        for tri in mesh.indices.chunks_exact(3) {
            let a = Vec3::from_array(mesh.positions[tri[0] as usize]);
            let b = Vec3::from_array(mesh.positions[tri[1] as usize]);
            let c = Vec3::from_array(mesh.positions[tri[2] as usize]);
            assert!((b - a).cross(c - a).y > 0.0);
        }
    }

    #[test]
    fn fit_stretches_to_target_and_keeps_flat_axes() {
        let mut mesh = make_grid(1, 1);
        fit_to_size(
            &mut mesh,
            &Bounds::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(-4.0, 3.0, 2.0)),
        );
        let aabb = mesh.aabb();
        assert_abs_diff_eq!(aabb.size().x, 4.0, epsilon = 1.0e-5);
        assert_abs_diff_eq!(aabb.size().y, 0.0, epsilon = 1.0e-6);
        assert_abs_diff_eq!(aabb.size().z, 2.0, epsilon = 1.0e-5);
        assert_abs_diff_eq!(aabb.center().x, 1.0, epsilon = 1.0e-5);
    }

    #[test]
    fn unit_box_tessellates_to_unit_bounds() {
        let mesh = tessellate_solid(&make_box(1.0, 1.0, 1.0), TESSELLATION_TOLERANCE);
        assert!(mesh.triangle_count() >= 12);
        let size = mesh.aabb().size();
        assert_abs_diff_eq!(size.x, 1.0, epsilon = 1.0e-5);
        assert_abs_diff_eq!(size.y, 1.0, epsilon = 1.0e-5);
        assert_abs_diff_eq!(size.z, 1.0, epsilon = 1.0e-5);
    }
}
