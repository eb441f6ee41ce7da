use approx::assert_abs_diff_eq;
use glam::Vec3;
use shape_core::{Ray, ShapeKind, Transform};
use shape_edit::host::{RESIZE_SHAPE, ROTATE_SHAPE};
use shape_edit::{
    Control, EditSession, EventOutcome, FixedViewport, Modifiers, PointerEvent, PointerKind,
    RecordingHost,
};
use shape_geom::ShapeComponent;

fn assert_vec_eq(a: Vec3, b: Vec3) {
    assert_abs_diff_eq!(a.x, b.x, epsilon = 1.0e-4);
    assert_abs_diff_eq!(a.y, b.y, epsilon = 1.0e-4);
    assert_abs_diff_eq!(a.z, b.z, epsilon = 1.0e-4);
}

fn viewport() -> FixedViewport {
    FixedViewport::new(Vec3::new(0.0, 0.0, 10.0), 1.0)
}

/// Pointer looking straight down -Z through `(x, y)`.
fn at(kind: PointerKind, x: f32, y: f32) -> PointerEvent {
    PointerEvent::new(kind, Ray::new(Vec3::new(x, y, 10.0), Vec3::NEG_Z))
}

struct Fixture {
    session: EditSession,
    host: RecordingHost,
    view: FixedViewport,
    shape: ShapeComponent,
}

impl Fixture {
    fn new(kind: ShapeKind, size: Vec3) -> Self {
        Self {
            session: EditSession::default(),
            host: RecordingHost::default(),
            view: viewport(),
            shape: ShapeComponent::new(kind, size).unwrap(),
        }
    }

    fn send(&mut self, event: PointerEvent) -> EventOutcome {
        self.session
            .handle_event(Some(&mut self.shape), &mut self.host, &self.view, &event)
            .unwrap()
    }
}

#[test]
fn dragging_a_face_moves_only_that_face() {
    let mut fx = Fixture::new(ShapeKind::Cube, Vec3::splat(2.0));

    assert_eq!(
        fx.send(at(PointerKind::Down, 1.0, 0.0)),
        EventOutcome::Armed(Control::FaceSize(0))
    );
    let outcome = fx.send(at(PointerKind::Drag, 2.0, 0.0));
    let EventOutcome::Resized { size, center } = outcome else {
        panic!("expected a resize, got {outcome:?}");
    };
    assert_vec_eq(size, Vec3::new(3.0, 2.0, 2.0));
    assert_vec_eq(center, Vec3::new(0.5, 0.0, 0.0));
    assert_vec_eq(fx.shape.size(), Vec3::new(3.0, 2.0, 2.0));
    assert_vec_eq(fx.shape.world_center(), Vec3::new(0.5, 0.0, 0.0));
    // The -X face stayed where it was.
    assert_abs_diff_eq!(fx.shape.mesh().aabb().min[0] + fx.shape.transform().translation.x, -1.0, epsilon = 1.0e-4);
    assert_eq!(fx.host.checkpoints, vec![RESIZE_SHAPE]);

    assert_eq!(
        fx.send(at(PointerKind::Up, 2.0, 0.0)),
        EventOutcome::Released(Control::FaceSize(0))
    );
    assert_eq!(fx.session.active_control(), None);
}

#[test]
fn mirrored_object_grows_on_the_dragged_side() {
    let mut fx = Fixture::new(ShapeKind::Cube, Vec3::splat(2.0));
    fx.shape.set_transform(Transform {
        scale: Vec3::new(-1.0, 1.0, 1.0),
        ..Transform::default()
    });

    assert_eq!(
        fx.send(at(PointerKind::Down, 1.0, 0.0)),
        EventOutcome::Armed(Control::FaceSize(0))
    );
    let outcome = fx.send(at(PointerKind::Drag, 2.0, 0.0));
    let EventOutcome::Resized { size, center } = outcome else {
        panic!("expected a resize, got {outcome:?}");
    };
    assert_vec_eq(size, Vec3::new(3.0, 2.0, 2.0));
    assert_vec_eq(center, Vec3::new(0.5, 0.0, 0.0));

    let aabb = fx.shape.mesh().aabb();
    let transform = fx.shape.transform();
    let a = transform.transform_point(Vec3::from_array(aabb.min));
    let b = transform.transform_point(Vec3::from_array(aabb.max));
    assert_abs_diff_eq!(a.x.min(b.x), -1.0, epsilon = 1.0e-4);
    assert_abs_diff_eq!(a.x.max(b.x), 2.0, epsilon = 1.0e-4);
}

#[test]
fn drag_without_motion_does_not_commit() {
    let mut fx = Fixture::new(ShapeKind::Cube, Vec3::splat(2.0));
    fx.send(at(PointerKind::Down, 1.0, 0.0));
    let outcome = fx.send(at(PointerKind::Drag, 1.0, 0.0));
    assert!(matches!(outcome, EventOutcome::Hover { .. }));
    assert!(fx.host.checkpoints.is_empty());
}

#[test]
fn flat_shape_has_no_orientation_or_height_handles() {
    let mut fx = Fixture::new(
        ShapeKind::Plane {
            width_cuts: 1,
            height_cuts: 1,
        },
        Vec3::new(2.0, 1.0, 2.0),
    );
    fx.send(at(PointerKind::Move, 0.0, 0.0));

    let valid = fx.session.faces().iter().filter(|f| f.is_valid).count();
    assert_eq!(valid, 4);
    assert!(fx.session.orientation_handles().is_empty());
    let faces: Vec<usize> = fx
        .session
        .size_handles()
        .iter()
        .map(|h| h.control.face())
        .collect();
    assert_eq!(faces, vec![0, 1, 4, 5]);
}

#[test]
fn snapped_drag_carries_remainder_between_frames() {
    let mut fx = Fixture::new(ShapeKind::Cube, Vec3::ONE);
    let snap = Modifiers {
        precision: false,
        snap: true,
    };
    let snap_precise = Modifiers {
        precision: true,
        snap: true,
    };

    assert_eq!(
        fx.send(at(PointerKind::Down, 0.0, 0.5)),
        EventOutcome::Armed(Control::FaceSize(2))
    );

    fx.send(at(PointerKind::Drag, 0.0, 0.8).with_modifiers(snap));
    assert_vec_eq(fx.shape.size(), Vec3::new(1.0, 1.25, 1.0));
    assert_vec_eq(fx.shape.world_center(), Vec3::new(0.0, 0.125, 0.0));
    assert_abs_diff_eq!(fx.session.leftover().y, 0.05, epsilon = 1.0e-4);

    fx.send(at(PointerKind::Drag, 0.0, 1.1).with_modifiers(snap_precise));
    assert_vec_eq(fx.shape.size(), Vec3::new(1.0, 1.75, 1.0));
    assert_vec_eq(fx.shape.world_center(), Vec3::new(0.0, 0.125, 0.0));
    assert_abs_diff_eq!(fx.session.leftover().y, 0.15, epsilon = 1.0e-4);

    fx.send(at(PointerKind::Up, 0.0, 1.1));
    assert_eq!(fx.session.leftover(), Vec3::ZERO);
}

#[test]
fn releasing_on_an_armed_arrow_rotates_the_shape() {
    let mut fx = Fixture::new(ShapeKind::Cube, Vec3::splat(2.0));
    let arrow = Control::Orientation { face: 4, arrow: 0 };

    fx.send(at(PointerKind::Move, 0.0, 0.3));
    assert_eq!(fx.session.nearest_control(), Some(arrow));
    assert_eq!(fx.session.orientation_handles().len(), 4);

    assert_eq!(fx.send(at(PointerKind::Down, 0.0, 0.3)), EventOutcome::Armed(arrow));
    let outcome = fx.send(at(PointerKind::Up, 0.0, 0.3));
    let EventOutcome::Rotated { delta, angle } = outcome else {
        panic!("expected a rotation, got {outcome:?}");
    };
    assert_abs_diff_eq!(angle, std::f32::consts::FRAC_PI_2, epsilon = 1.0e-4);
    assert_vec_eq(delta * Vec3::Z, Vec3::Y);
    assert_vec_eq(fx.shape.rotation() * Vec3::Z, Vec3::Y);
    assert_vec_eq(fx.shape.size(), Vec3::splat(2.0));
    assert_eq!(fx.host.checkpoints, vec![ROTATE_SHAPE]);
    assert_abs_diff_eq!(fx.session.current_angle(), 90.0, epsilon = 1.0e-3);
}

#[test]
fn leaving_the_arrow_aborts_the_rotation() {
    let mut fx = Fixture::new(ShapeKind::Cube, Vec3::splat(2.0));
    let arrow = Control::Orientation { face: 4, arrow: 0 };

    fx.send(at(PointerKind::Down, 0.0, 0.3));
    assert_eq!(fx.send(at(PointerKind::Drag, 0.8, 0.8)), EventOutcome::Aborted(arrow));
    assert_eq!(fx.session.active_control(), None);
    assert_eq!(fx.send(at(PointerKind::Up, 0.8, 0.8)), EventOutcome::Ignored);
    assert_vec_eq(fx.shape.rotation() * Vec3::Z, Vec3::Z);
    assert!(fx.host.checkpoints.is_empty());
}

#[test]
fn second_press_while_hot_is_ignored() {
    let mut fx = Fixture::new(ShapeKind::Cube, Vec3::splat(2.0));
    fx.send(at(PointerKind::Down, 1.0, 0.0));
    assert_eq!(fx.send(at(PointerKind::Down, 0.0, 0.3)), EventOutcome::Ignored);
    assert_eq!(fx.session.active_control(), Some(Control::FaceSize(0)));
}

#[test]
fn size_drag_hides_orientation_arrows() {
    let mut fx = Fixture::new(ShapeKind::Cube, Vec3::splat(2.0));
    fx.send(at(PointerKind::Down, 1.0, 0.0));
    fx.send(at(PointerKind::Drag, 0.0, 0.3));
    assert!(fx.session.orientation_handles().is_empty());
}

#[test]
fn no_shape_or_edited_shape_is_ignored() {
    let mut session = EditSession::default();
    let mut host = RecordingHost::default();
    let view = viewport();
    let event = at(PointerKind::Down, 1.0, 0.0);

    let outcome = session.handle_event(None, &mut host, &view, &event).unwrap();
    assert_eq!(outcome, EventOutcome::Ignored);

    let mut shape = ShapeComponent::new(ShapeKind::Cube, Vec3::splat(2.0)).unwrap();
    shape.set_edited(true);
    let outcome = session
        .handle_event(Some(&mut shape), &mut host, &view, &event)
        .unwrap();
    assert_eq!(outcome, EventOutcome::Ignored);
    assert_eq!(session.active_control(), None);
    assert_eq!(host.repaints, 0);
}

#[test]
fn overlay_is_in_world_space() {
    let mut fx = Fixture::new(ShapeKind::Cube, Vec3::splat(2.0));
    fx.send(at(PointerKind::Down, 1.0, 0.0));
    fx.send(at(PointerKind::Drag, 2.0, 0.0));
    fx.send(at(PointerKind::Move, 2.0, 0.0));

    let overlay = fx.session.overlay();
    assert_eq!(overlay.outlines.len(), 6);
    let right = overlay
        .dots
        .iter()
        .map(|d| d.position)
        .find(|p| p.x > 1.5)
        .unwrap();
    assert_vec_eq(right, Vec3::new(2.0, 0.0, 0.0));
}
