use glam::{Quat, Vec3};
use shape_core::{
    Bounds, PivotLocation, Shape, ShapeDescriptor, ShapeKind, Transform, EPSILON,
};
use tracing::{debug, trace};

use crate::generators::{fit_to_size, generate};
use crate::{GeomError, TriMesh};

/// Size fields as last shown to the user.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShapeBoxProperties {
    pub width: f32,
    pub height: f32,
    pub length: f32,
}

/// A shape instance attached to a scene object: the abstract box, the
/// owner's placement and the mesh generated from them.
#[derive(Debug, Clone)]
pub struct ShapeComponent {
    shape: Shape,
    pivot_location: PivotLocation,
    properties: ShapeBoxProperties,
    transform: Transform,
    mesh: TriMesh,
    hidden: bool,
    edited: bool,
}

impl ShapeComponent {
    pub fn new(kind: ShapeKind, size: Vec3) -> Result<Self, GeomError> {
        Self::from_shape(
            Shape::new(kind, size),
            PivotLocation::Center,
            Transform::default(),
        )
    }

    pub fn from_descriptor(
        descriptor: &ShapeDescriptor,
        transform: Transform,
    ) -> Result<Self, GeomError> {
        if !descriptor.is_finite() {
            return Err(GeomError::InvalidDescriptor("non-finite component"));
        }
        if descriptor.rotation.length_squared() < EPSILON {
            return Err(GeomError::InvalidDescriptor("zero-length rotation"));
        }
        let mut shape = descriptor.to_shape();
        shape.rotation = shape.rotation.normalize();
        Self::from_shape(shape, descriptor.pivot_location, transform)
    }

    fn from_shape(
        shape: Shape,
        pivot_location: PivotLocation,
        transform: Transform,
    ) -> Result<Self, GeomError> {
        let mut component = Self {
            shape,
            pivot_location,
            properties: ShapeBoxProperties::default(),
            transform,
            mesh: TriMesh::default(),
            hidden: false,
            edited: false,
        };
        component.rebuild()?;
        Ok(component)
    }

    pub fn descriptor(&self) -> ShapeDescriptor {
        ShapeDescriptor::new(&self.shape, self.pivot_location)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind
    }

    pub fn size(&self) -> Vec3 {
        self.shape.size
    }

    /// Sets the pending size; applied by the next rebuild.
    pub fn set_size(&mut self, size: Vec3) {
        self.shape.size = size;
    }

    pub fn rotation(&self) -> Quat {
        self.shape.rotation
    }

    pub fn shape_box(&self) -> Bounds {
        self.shape.shape_box
    }

    pub fn mesh(&self) -> &TriMesh {
        &self.mesh
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn properties(&self) -> ShapeBoxProperties {
        self.properties
    }

    pub fn set_properties(&mut self, properties: ShapeBoxProperties) {
        self.properties = properties;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Set while another tool owns the shape; cleared by every rebuild.
    pub fn edited(&self) -> bool {
        self.edited
    }

    pub fn set_edited(&mut self, edited: bool) {
        self.edited = edited;
    }

    pub fn pivot_location(&self) -> PivotLocation {
        self.pivot_location
    }

    pub fn set_pivot_location(&mut self, pivot_location: PivotLocation) -> Result<(), GeomError> {
        self.pivot_location = pivot_location;
        self.rebuild()
    }

    /// Box the edit handles work on. Flat shapes report a zero height even
    /// though `size.y` still remembers the last solid height.
    pub fn edition_bounds(&self) -> Bounds {
        let mut size = self.shape.size;
        if self.shape.shape_box.size.y.abs() < EPSILON {
            size.y = 0.0;
        }
        Bounds::new(self.shape.shape_box.center, size)
    }

    /// World position of the shape box center.
    pub fn world_center(&self) -> Vec3 {
        self.transform.transform_point(self.shape.shape_box.center)
    }

    /// Moves the object origin onto the box center.
    pub fn reset_pivot(&mut self) {
        let center = self.shape.shape_box.center;
        if center == Vec3::ZERO {
            return;
        }
        self.transform.translation += self.transform.transform_vector(center);
        self.mesh.translate(-center);
        self.shape.shape_box.center = Vec3::ZERO;
    }

    fn update_pivot(&mut self) {
        match self.pivot_location {
            PivotLocation::Center => {}
            PivotLocation::FirstVertex => {
                let Some(first) = self.mesh.positions.first().copied() else {
                    return;
                };
                let offset = Vec3::from_array(first);
                self.mesh.translate(-offset);
                self.transform.translation += self.transform.transform_vector(offset);
                self.shape.shape_box.center -= offset;
            }
        }
    }

    fn update_properties(&mut self) {
        let size = self.shape.size;
        self.properties = ShapeBoxProperties {
            width: size.x,
            height: size.y,
            length: size.z,
        };
    }

    /// Applies sizes typed into the cached display fields.
    pub fn update_component(&mut self) -> Result<(), GeomError> {
        self.reset_pivot();
        let props = self.properties;
        self.shape.size = Vec3::new(props.width, props.height, props.length);
        self.rebuild()
    }

    /// Resizes and re-centers the box; `bounds.center` is in world space.
    pub fn update_bounds(&mut self, bounds: Bounds) -> Result<(), GeomError> {
        self.reset_pivot();
        self.shape.size = bounds.size;
        self.transform.translation = bounds.center;
        self.rebuild()
    }

    /// Places the box at `bounds` with the owner rotated by `rotation`.
    pub fn rebuild_in(&mut self, bounds: Bounds, rotation: Quat) -> Result<(), GeomError> {
        self.reset_pivot();
        self.shape.size = bounds.size;
        self.transform.translation = bounds.center;
        self.transform.rotation = rotation;
        self.rebuild()
    }

    pub fn rebuild(&mut self) -> Result<(), GeomError> {
        if self.hidden {
            trace!(kind = self.shape.kind.name(), "skipping rebuild of hidden shape");
            self.update_properties();
            return Ok(());
        }

        self.reset_pivot();
        let mut mesh = generate(self.shape.kind, self.shape.size, self.shape.rotation)?;
        let footprint = self.shape.kind.footprint(self.shape.size);
        fit_to_size(
            &mut mesh,
            &Bounds::new(self.shape.shape_box.center, footprint.abs()),
        );
        self.shape.shape_box.size = footprint;
        self.mesh = mesh;
        self.edited = false;

        self.update_pivot();
        self.update_properties();
        debug!(
            kind = self.shape.kind.name(),
            size = ?self.shape.size,
            vertices = self.mesh.vertex_count(),
            "rebuilt shape mesh"
        );
        Ok(())
    }

    /// Swaps the variant while keeping the box where possible.
    pub fn set_shape(&mut self, kind: ShapeKind) -> Result<(), GeomError> {
        self.shape.kind = kind;
        let bounds = &mut self.shape.shape_box;
        if kind.is_2d() {
            bounds.center.y = 0.0;
            bounds.size.y = 0.0;
        } else if self.pivot_location == PivotLocation::FirstVertex
            && bounds.size.y == 0.0
            && self.shape.size.y != 0.0
        {
            // Grow upward from the flat footprint instead of through it.
            bounds.center.y += self.shape.size.y / 2.0;
            bounds.size.y = self.shape.size.y;
        }
        self.reset_pivot();
        self.rebuild()
    }

    /// Rotates the generated geometry while it stays fitted to the box.
    pub fn rotate_inside_bounds(&mut self, delta: Quat) -> Result<(), GeomError> {
        self.reset_pivot();
        self.shape.rotation = (delta * self.shape.rotation).normalize();
        self.rebuild()
    }
}
