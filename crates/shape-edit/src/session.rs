//! Interaction state of the edit-shape tool.
//!
//! One [`EditSession`] lives for as long as the tool is active and is fed
//! every pointer event. Each call recomputes the face geometry of the shape,
//! hit-tests the handles against the pointer ray, and only then advances the
//! drag state machine, so commits always act on fresh geometry.

use glam::{Quat, Vec3};
use shape_core::Ray;
use shape_geom::ShapeComponent;
use tracing::{debug, trace};

use crate::faces::{pointer_is_in_face, update_faces, FaceData, FACE_COUNT};
use crate::handles::{
    distance_to_arrow, face_arrows, with_alpha, ArrowHandle, Control, GizmoDot, GizmoLine,
    HandleFrame, HandleOverlay, SizeHandle, ARROWS_PER_FACE, ARROW_WIDTH, BOUNDS_HANDLE_COLOR,
    GUIDE_WIDTH, OUTLINE_WIDTH, SELECTED_HANDLE_COLOR,
};
use crate::host::{apply_properties, rotate_inside_bounds, EditorHost};
use crate::input::{Modifiers, PointerEvent, PointerKind};
use crate::orient::orientation_delta;
use crate::resize::resize_step;
use crate::settings::ToolSettings;
use crate::viewport::Viewport;
use crate::EditError;

/// What a pointer event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EventOutcome {
    Ignored,
    Hover { nearest: Option<Control> },
    Armed(Control),
    Resized { size: Vec3, center: Vec3 },
    Rotated { delta: Quat, angle: f32 },
    Aborted(Control),
    Released(Control),
}

/// Arrows of the face currently under the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FaceArrows {
    face: usize,
    arrows: [ArrowHandle; ARROWS_PER_FACE],
}

#[derive(Debug, Clone)]
pub struct EditSession {
    settings: ToolSettings,
    frame: HandleFrame,
    faces: [FaceData; FACE_COUNT],
    local_ray: Ray,
    size_handles: Vec<SizeHandle>,
    arrows: Option<FaceArrows>,
    guide: Option<[Vec3; 3]>,
    nearest: Option<Control>,
    hot: Option<Control>,
    armed: Option<Control>,
    slider_anchor: Option<Vec3>,
    leftover: Vec3,
    last_rotation: Quat,
    current_angle: f32,
    hovered_arrow: Option<Control>,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(ToolSettings::default())
    }
}

impl EditSession {
    pub fn new(settings: ToolSettings) -> Self {
        Self {
            settings,
            frame: HandleFrame::default(),
            faces: [FaceData::default(); FACE_COUNT],
            local_ray: Ray::new(Vec3::ZERO, Vec3::NEG_Z),
            size_handles: Vec::new(),
            arrows: None,
            guide: None,
            nearest: None,
            hot: None,
            armed: None,
            slider_anchor: None,
            leftover: Vec3::ZERO,
            last_rotation: Quat::IDENTITY,
            current_angle: 0.0,
            hovered_arrow: None,
        }
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    /// Faces computed by the last event, in handle space.
    pub fn faces(&self) -> &[FaceData; FACE_COUNT] {
        &self.faces
    }

    pub fn frame(&self) -> &HandleFrame {
        &self.frame
    }

    /// The single handle receiving drag input, if any.
    pub fn active_control(&self) -> Option<Control> {
        self.hot
    }

    pub fn nearest_control(&self) -> Option<Control> {
        self.nearest
    }

    pub fn size_handles(&self) -> &[SizeHandle] {
        &self.size_handles
    }

    /// Orientation arrows shown for the last event; empty for flat shapes
    /// or when the pointer is over no visible face.
    pub fn orientation_handles(&self) -> &[ArrowHandle] {
        match &self.arrows {
            Some(face_arrows) => &face_arrows.arrows,
            None => &[],
        }
    }

    pub fn leftover(&self) -> Vec3 {
        self.leftover
    }

    pub fn last_rotation(&self) -> Quat {
        self.last_rotation
    }

    /// Rotation accumulated on the hovered arrow, in degrees.
    pub fn current_angle(&self) -> f32 {
        self.current_angle
    }

    /// Drops any in-progress interaction.
    pub fn reset(&mut self) {
        self.hot = None;
        self.armed = None;
        self.slider_anchor = None;
        self.leftover = Vec3::ZERO;
    }

    pub fn handle_event<H, V>(
        &mut self,
        shape: Option<&mut ShapeComponent>,
        host: &mut H,
        viewport: &V,
        event: &PointerEvent,
    ) -> Result<EventOutcome, EditError>
    where
        H: EditorHost + ?Sized,
        V: Viewport + ?Sized,
    {
        let Some(shape) = shape else {
            return Ok(EventOutcome::Ignored);
        };
        if shape.edited() {
            return Ok(EventOutcome::Ignored);
        }

        self.layout(shape, viewport, &event.ray);

        let outcome = match event.kind {
            PointerKind::Move => {
                host.request_repaint();
                EventOutcome::Hover {
                    nearest: self.nearest,
                }
            }
            PointerKind::Down => self.on_down(),
            PointerKind::Drag => self.on_drag(shape, host, event.modifiers)?,
            PointerKind::Up => self.on_up(shape, host)?,
        };

        if self.hot.is_none() {
            self.slider_anchor = None;
            self.leftover = Vec3::ZERO;
        }
        Ok(outcome)
    }

    /// Recomputes faces, handles and the nearest control for this event.
    fn layout<V: Viewport + ?Sized>(&mut self, shape: &ShapeComponent, viewport: &V, ray: &Ray) {
        let handles = self.settings.handles;
        self.frame = HandleFrame::new(shape);
        let bounds = shape.edition_bounds();
        let eye = self.frame.to_local_point(viewport.eye());
        update_faces(&bounds, shape.transform().scale, eye, &mut self.faces);
        self.local_ray = self.frame.to_local_ray(ray);

        let mut best: Option<(Control, f32)> = None;
        let consider = |control: Control, distance: f32, best: &mut Option<(Control, f32)>| {
            if best.map_or(true, |(_, d)| distance < d) {
                *best = Some((control, distance));
            }
        };

        self.arrows = None;
        let orientation_allowed =
            bounds.is_solid() && self.hot.map_or(true, |hot| hot.is_orientation());
        if orientation_allowed {
            for (index, face) in self.faces.iter().enumerate() {
                if !face.is_visible || !pointer_is_in_face(face, &self.local_ray) {
                    continue;
                }
                let handle_size = viewport.handle_size(self.frame.to_world_point(face.center));
                let rect_size = handle_size * handles.midpoint_square_size;
                let arrows = face_arrows(index, face, rect_size, handles.arrow_length);
                let tolerance = handle_size * handles.arrow_pick_tolerance;
                for arrow in &arrows {
                    let distance = distance_to_arrow(&self.local_ray, arrow);
                    if distance <= tolerance {
                        consider(arrow.control, distance, &mut best);
                    }
                }
                self.arrows = Some(FaceArrows {
                    face: index,
                    arrows,
                });
                // A convex box shows at most one front face under the pointer.
                break;
            }
        }
        let over_arrow = best.is_some();

        self.size_handles.clear();
        for (index, face) in self.faces.iter().enumerate() {
            if !face.is_valid {
                continue;
            }
            if over_arrow && !pointer_is_in_face(face, &self.local_ray) {
                continue;
            }
            let handle_size = viewport.handle_size(self.frame.to_world_point(face.center));
            let radius = handle_size * handles.midpoint_handle_size;
            let handle = SizeHandle {
                control: Control::FaceSize(index),
                position: face.center,
                normal: face.normal,
                radius,
                pick_radius: radius * handles.size_pick_factor,
                dimmed: !face.is_visible,
            };
            let distance = self.local_ray.distance_to_point(face.center);
            if distance <= handle.pick_radius {
                consider(handle.control, distance, &mut best);
            }
            self.size_handles.push(handle);
        }

        self.nearest = best.map(|(control, _)| control);

        let hovered = self.nearest.filter(Control::is_orientation);
        if hovered != self.hovered_arrow {
            self.current_angle = 0.0;
        }
        self.hovered_arrow = hovered;
        self.guide = hovered.map(|_| {
            let half = shape.size() / 2.0;
            [
                shape.rotation() * Vec3::Y * half,
                Vec3::ZERO,
                shape.rotation() * Vec3::Z * half,
            ]
        });
    }

    fn on_down(&mut self) -> EventOutcome {
        if self.hot.is_some() {
            return EventOutcome::Ignored;
        }
        let Some(control) = self.nearest else {
            return EventOutcome::Ignored;
        };
        match control {
            Control::Orientation { .. } => {
                self.armed = Some(control);
            }
            Control::FaceSize(face) => {
                self.slider_anchor = Some(self.frame.to_world_point(self.faces[face].center));
            }
        }
        self.hot = Some(control);
        debug!(?control, "handle armed");
        EventOutcome::Armed(control)
    }

    fn on_drag<H: EditorHost + ?Sized>(
        &mut self,
        shape: &mut ShapeComponent,
        host: &mut H,
        modifiers: Modifiers,
    ) -> Result<EventOutcome, EditError> {
        match self.hot {
            Some(Control::FaceSize(face)) => self.drag_size(face, shape, host, modifiers),
            Some(control) => {
                if self.nearest != Some(control) {
                    debug!(?control, "pointer left orientation handle, drag aborted");
                    self.hot = None;
                    self.armed = None;
                    return Ok(EventOutcome::Aborted(control));
                }
                Ok(EventOutcome::Hover {
                    nearest: self.nearest,
                })
            }
            None => Ok(EventOutcome::Ignored),
        }
    }

    fn drag_size<H: EditorHost + ?Sized>(
        &mut self,
        face_index: usize,
        shape: &mut ShapeComponent,
        host: &mut H,
        modifiers: Modifiers,
    ) -> Result<EventOutcome, EditError> {
        let face = self.faces[face_index];
        let Some(s) = self.local_ray.closest_on_line(face.center, face.normal) else {
            return Ok(EventOutcome::Ignored);
        };
        let target = self.frame.to_world_point(face.center + face.normal * s);
        let anchor = self
            .slider_anchor
            .unwrap_or_else(|| self.frame.to_world_point(face.center));
        self.slider_anchor = Some(target);

        let raw = (target - anchor).dot(self.frame.to_world_vector(face.normal));
        let step = resize_step(
            raw,
            face.normal,
            shape.size(),
            shape.transform().scale,
            self.leftover,
            modifiers.precision,
            self.settings.snap.active_increment(modifiers),
        );
        self.leftover = step.leftover;
        trace!(raw, offset = ?step.size_offset, leftover = ?step.leftover, "size drag");

        if step.size_offset == Vec3::ZERO {
            return Ok(EventOutcome::Hover {
                nearest: self.nearest,
            });
        }

        let center = shape.world_center() + shape.transform().transform_vector(step.center_shift);
        let size = shape.size() + step.size_offset;
        apply_properties(host, shape, center, size)?;
        Ok(EventOutcome::Resized { size, center })
    }

    fn on_up<H: EditorHost + ?Sized>(
        &mut self,
        shape: &mut ShapeComponent,
        host: &mut H,
    ) -> Result<EventOutcome, EditError> {
        let Some(hot) = self.hot.take() else {
            return Ok(EventOutcome::Ignored);
        };
        let armed = self.armed.take();

        if let Some(Control::Orientation { face, arrow }) = armed {
            if self.nearest == armed {
                return self.commit_rotation(face, arrow, shape, host);
            }
        }
        Ok(EventOutcome::Released(hot))
    }

    fn commit_rotation<H: EditorHost + ?Sized>(
        &mut self,
        face: usize,
        arrow: usize,
        shape: &mut ShapeComponent,
        host: &mut H,
    ) -> Result<EventOutcome, EditError> {
        let control = Control::Orientation { face, arrow };
        let Some(face_arrows) = self.arrows.filter(|cached| cached.face == face) else {
            return Ok(EventOutcome::Released(control));
        };
        let face_data = self.faces[face];
        let target = (face_arrows.arrows[arrow].tip() - face_data.center).normalize_or_zero();

        let Some((delta, angle)) = orientation_delta(face_data.normal, target, shape.size()) else {
            return Ok(EventOutcome::Released(control));
        };
        self.last_rotation = delta;
        self.current_angle = (self.current_angle + angle.to_degrees()) % 360.0;

        rotate_inside_bounds(host, shape, delta)?;
        Ok(EventOutcome::Rotated { delta, angle })
    }

    /// Draw data for the state left by the last event, in world space.
    pub fn overlay(&self) -> HandleOverlay {
        let frame = &self.frame;
        let mut overlay = HandleOverlay::default();

        for face in self.faces.iter().filter(|face| face.is_valid) {
            let alpha = if face.is_visible { 1.0 } else { 0.5 };
            let mut points: Vec<Vec3> = face.points.iter().map(|p| frame.to_world_point(*p)).collect();
            points.push(points[0]);
            overlay.outlines.push(GizmoLine {
                points,
                color: with_alpha(BOUNDS_HANDLE_COLOR, alpha),
                width: OUTLINE_WIDTH,
            });
        }

        for handle in &self.size_handles {
            let base = if self.hot == Some(handle.control) {
                SELECTED_HANDLE_COLOR
            } else {
                BOUNDS_HANDLE_COLOR
            };
            overlay.dots.push(GizmoDot {
                position: frame.to_world_point(handle.position),
                radius: handle.radius,
                color: with_alpha(base, if handle.dimmed { 0.25 } else { 1.0 }),
            });
        }

        for arrow in self.orientation_handles() {
            let selected = self.nearest == Some(arrow.control);
            overlay.arrows.push(GizmoLine {
                points: arrow.line.iter().map(|p| frame.to_world_point(*p)).collect(),
                color: if selected {
                    SELECTED_HANDLE_COLOR
                } else {
                    BOUNDS_HANDLE_COLOR
                },
                width: ARROW_WIDTH,
            });
        }

        overlay.guide = self.guide.map(|points| GizmoLine {
            points: points.iter().map(|p| frame.to_world_point(*p)).collect(),
            color: SELECTED_HANDLE_COLOR,
            width: GUIDE_WIDTH,
        });

        overlay
    }
}
