use anyhow::{Context, Result};
use clap::Parser;
use shape_core::Ray;
use shape_edit::host::{RESIZE_SHAPE, ROTATE_SHAPE};
use shape_edit::{EditSession, EditorHost, EventOutcome, PointerEvent, ToolSettings};
use shape_geom::{ShapeBoxProperties, ShapeComponent};
use shape_protocol::{encode, parse_script, parse_settings, HostMsg, SessionScript, ToolMsg};
use std::path::PathBuf;
use tracing::{debug, info};

const CHANGE_SHAPE: &str = "Change Shape";

/// Replays a recorded edit-shape session and prints the tool's outcomes as
/// JSON lines.
#[derive(Parser, Debug)]
#[command(name = "shape-replay")]
struct Cli {
    /// Session script (JSON)
    #[arg(short, long)]
    script: PathBuf,

    /// Tool settings overriding the ones stored in the script
    #[arg(long, env = "SHAPEKIT_SETTINGS")]
    settings: Option<PathBuf>,
}

/// Host that logs undo checkpoints instead of recording them.
#[derive(Default)]
struct LogHost {
    checkpoints: usize,
    repaints: usize,
}

impl EditorHost for LogHost {
    fn begin_undoable_change(&mut self, shape: &ShapeComponent, label: &str) {
        self.checkpoints += 1;
        info!(label, kind = shape.kind().name(), size = ?shape.size(), "undo checkpoint");
    }

    fn request_repaint(&mut self) {
        self.repaints += 1;
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let text = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("failed to read script {}", cli.script.display()))?;
    let mut script = parse_script(&text).context("failed to parse session script")?;

    if let Some(path) = &cli.settings {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?;
        script.settings = parse_settings(&text).context("failed to parse tool settings")?;
    }

    let mut host = LogHost::default();
    for msg in replay(&script, &mut host)? {
        println!("{}", encode(&msg)?);
    }
    info!(
        checkpoints = host.checkpoints,
        repaints = host.repaints,
        "replay finished"
    );
    Ok(())
}

fn replay<H: EditorHost>(script: &SessionScript, host: &mut H) -> Result<Vec<ToolMsg>> {
    let mut shape = ShapeComponent::from_descriptor(&script.shape, script.transform)
        .context("invalid shape descriptor")?;
    let mut session = EditSession::new(script.settings);
    let mut out = Vec::new();

    for (index, msg) in script.events.iter().enumerate() {
        debug!(index, ?msg, "host message");
        match *msg {
            HostMsg::Pointer(event) => {
                let event = PointerEvent {
                    ray: Ray::new(event.ray.origin, event.ray.direction),
                    ..event
                };
                let outcome = session
                    .handle_event(Some(&mut shape), host, &script.viewport, &event)
                    .with_context(|| format!("event {index} failed"))?;
                report(outcome, &shape, &mut out);
            }
            HostMsg::SetShape { shape: kind } => {
                session.reset();
                host.begin_undoable_change(&shape, CHANGE_SHAPE);
                shape.set_shape(kind)?;
                out.push(ToolMsg::Log {
                    text: format!("shape set to {}", kind.name()),
                });
            }
            HostMsg::SetPivot { pivot } => {
                host.begin_undoable_change(&shape, CHANGE_SHAPE);
                shape.set_pivot_location(pivot)?;
            }
            HostMsg::SetHidden { hidden } => {
                shape.set_hidden(hidden);
                shape.rebuild()?;
            }
            HostMsg::SetProperties {
                width,
                height,
                length,
            } => {
                host.begin_undoable_change(&shape, CHANGE_SHAPE);
                shape.set_properties(ShapeBoxProperties {
                    width,
                    height,
                    length,
                });
                shape.update_component()?;
            }
            HostMsg::SetEdited { edited } => shape.set_edited(edited),
        }
    }
    Ok(out)
}

fn report(outcome: EventOutcome, shape: &ShapeComponent, out: &mut Vec<ToolMsg>) {
    match outcome {
        EventOutcome::Ignored | EventOutcome::Hover { .. } => {}
        EventOutcome::Armed(control) => out.push(ToolMsg::Armed {
            face: control.face(),
            orientation: control.is_orientation(),
        }),
        EventOutcome::Resized { center, .. } => out.push(ToolMsg::Committed {
            label: RESIZE_SHAPE.to_string(),
            descriptor: shape.descriptor(),
            center,
        }),
        EventOutcome::Rotated { angle, .. } => {
            out.push(ToolMsg::Rotated {
                angle_degrees: angle.to_degrees(),
            });
            out.push(ToolMsg::Committed {
                label: ROTATE_SHAPE.to_string(),
                descriptor: shape.descriptor(),
                center: shape.world_center(),
            });
        }
        EventOutcome::Aborted(control) => out.push(ToolMsg::Aborted {
            face: control.face(),
        }),
        EventOutcome::Released(control) => out.push(ToolMsg::Released {
            face: control.face(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shape_edit::RecordingHost;

    const SCRIPT: &str = r#"{
        "shape": {
            "shape": { "type": "Cube" },
            "size": [2.0, 2.0, 2.0],
            "rotation": [0.0, 0.0, 0.0, 1.0],
            "shape_box": { "center": [0.0, 0.0, 0.0], "size": [2.0, 2.0, 2.0] }
        },
        "viewport": { "eye": [0.0, 0.0, 10.0], "handle_size": 1.0 },
        "events": [
            { "type": "Pointer", "kind": "Down",
              "ray": { "origin": [1.0, 0.0, 10.0], "direction": [0.0, 0.0, -2.0] } },
            { "type": "Pointer", "kind": "Drag",
              "ray": { "origin": [2.0, 0.0, 10.0], "direction": [0.0, 0.0, -1.0] } },
            { "type": "Pointer", "kind": "Up",
              "ray": { "origin": [2.0, 0.0, 10.0], "direction": [0.0, 0.0, -1.0] } },
            { "type": "SetShape", "shape": { "type": "Sprite" } }
        ]
    }"#;

    #[test]
    fn replays_a_face_drag() {
        let script = parse_script(SCRIPT).unwrap();
        let mut host = RecordingHost::default();
        let out = replay(&script, &mut host).unwrap();

        assert_eq!(
            out[0],
            ToolMsg::Armed {
                face: 0,
                orientation: false
            }
        );
        let ToolMsg::Committed {
            descriptor, center, ..
        } = &out[1]
        else {
            panic!("expected a commit, got {:?}", out[1]);
        };
        assert!(descriptor.size.abs_diff_eq(glam::Vec3::new(3.0, 2.0, 2.0), 1.0e-4));
        assert!(center.abs_diff_eq(glam::Vec3::new(0.5, 0.0, 0.0), 1.0e-4));
        assert_eq!(out[2], ToolMsg::Released { face: 0 });
        assert!(matches!(out[3], ToolMsg::Log { .. }));
        assert_eq!(host.checkpoints, vec![RESIZE_SHAPE, CHANGE_SHAPE]);
    }
}
