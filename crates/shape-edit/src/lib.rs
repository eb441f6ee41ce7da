//! Interactive editing of a shape's box: face size sliders, orientation
//! arrows and the commit path into the host editor.

pub mod faces;
pub mod handles;
pub mod host;
pub mod input;
pub mod orient;
pub mod resize;
pub mod session;
pub mod settings;
pub mod viewport;

pub use faces::{pointer_is_in_face, update_faces, FaceData, FACE_COUNT};
pub use handles::{ArrowHandle, Control, HandleFrame, HandleOverlay, SizeHandle};
pub use host::{apply_properties, rotate_inside_bounds, EditorHost, RecordingHost};
pub use input::{Modifiers, PointerEvent, PointerKind};
pub use orient::orientation_delta;
pub use resize::{resize_step, ResizeStep};
pub use session::{EditSession, EventOutcome};
pub use settings::{HandleSettings, SnapSettings, ToolSettings};
pub use viewport::{FixedViewport, Viewport};

use shape_geom::GeomError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("geometry: {0}")]
    Geometry(#[from] GeomError),
}
