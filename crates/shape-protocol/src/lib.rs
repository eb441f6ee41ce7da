//! Serialized boundary between a host editor and the edit tool: the input
//! messages a host sends, the outcomes the tool reports back and the
//! recorded session scripts used for replay.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use shape_core::{PivotLocation, ShapeDescriptor, ShapeKind, Transform};
use shape_edit::{FixedViewport, PointerEvent, ToolSettings};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Input from the host editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HostMsg {
    Pointer(PointerEvent),
    SetShape { shape: ShapeKind },
    SetPivot { pivot: PivotLocation },
    SetHidden { hidden: bool },
    /// Sizes typed into the inspector fields.
    SetProperties { width: f32, height: f32, length: f32 },
    /// Another tool took or released ownership of the shape.
    SetEdited { edited: bool },
}

/// What the tool reports back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolMsg {
    Armed { face: usize, orientation: bool },
    Committed {
        label: String,
        descriptor: ShapeDescriptor,
        center: Vec3,
    },
    Rotated { angle_degrees: f32 },
    Aborted { face: usize },
    Released { face: usize },
    Log { text: String },
}

/// A recorded editing session: starting state plus the host messages to
/// replay against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionScript {
    #[serde(default)]
    pub settings: ToolSettings,
    pub shape: ShapeDescriptor,
    #[serde(default)]
    pub transform: Transform,
    pub viewport: FixedViewport,
    #[serde(default)]
    pub events: Vec<HostMsg>,
}

pub fn parse_script(text: &str) -> Result<SessionScript, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

pub fn parse_settings(text: &str) -> Result<ToolSettings, ProtocolError> {
    Ok(serde_json::from_str(text)?)
}

pub fn encode(msg: &ToolMsg) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(msg)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shape_core::{Ray, Shape};
    use shape_edit::{Modifiers, PointerKind};

    #[test]
    fn host_msg_roundtrip() {
        let msg = HostMsg::Pointer(
            PointerEvent::new(PointerKind::Drag, Ray::new(Vec3::Z, Vec3::NEG_Z)).with_modifiers(
                Modifiers {
                    precision: true,
                    snap: false,
                },
            ),
        );
        let json = serde_json::to_string(&msg).unwrap();
        let back: HostMsg = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }

    #[test]
    fn tool_msg_roundtrip() {
        let shape = Shape::new(ShapeKind::Cylinder, Vec3::new(1.0, 2.0, 1.0));
        let msg = ToolMsg::Committed {
            label: "Resize Shape".to_string(),
            descriptor: ShapeDescriptor::new(&shape, PivotLocation::Center),
            center: Vec3::X,
        };
        let json = encode(&msg).unwrap();
        let back: ToolMsg = serde_json::from_str(&json).unwrap();
        assert_eq!(msg, back);
    }

    #[test]
    fn script_fills_in_defaults() {
        let text = r#"{
            "shape": {
                "shape": { "type": "Plane", "width_cuts": 2, "height_cuts": 3 },
                "size": [2.0, 1.0, 2.0],
                "rotation": [0.0, 0.0, 0.0, 1.0],
                "shape_box": { "center": [0.0, 0.0, 0.0], "size": [2.0, 0.0, 2.0] }
            },
            "viewport": { "eye": [0.0, 5.0, 5.0], "handle_size": 1.0 },
            "events": [
                { "type": "SetPivot", "pivot": "FirstVertex" },
                { "type": "Pointer", "kind": "Move",
                  "ray": { "origin": [0.0, 5.0, 5.0], "direction": [0.0, -1.0, -1.0] } }
            ]
        }"#;
        let script = parse_script(text).unwrap();
        assert_eq!(script.settings, ToolSettings::default());
        assert_eq!(script.transform, Transform::default());
        assert_eq!(
            script.shape.shape,
            ShapeKind::Plane {
                width_cuts: 2,
                height_cuts: 3
            }
        );
        assert_eq!(script.shape.pivot_location, PivotLocation::Center);
        assert_eq!(script.events.len(), 2);
        assert!(matches!(
            script.events[1],
            HostMsg::Pointer(PointerEvent {
                kind: PointerKind::Move,
                ..
            })
        ));
    }

    #[test]
    fn malformed_script_is_an_error() {
        assert!(matches!(
            parse_script("{ \"shape\": 3 }"),
            Err(ProtocolError::Json(_))
        ));
    }
}
