// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Recordings carry frame indices rather than clock readings, so events are
//! laid out on a nominal timeline: frame `n` starts at `n * frame_us`, and
//! toggles land halfway through the frame in which they were applied. Time
//! spent in a non-flat mode shows up as a duration span.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use serde_json::{Value, json};

use strata_core::strategy::Mode;
use strata_core::trace::VisibilityTarget;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], frame_us: f64, writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    let mut frame = 0_u64;
    let between = |frame: u64| (frame as f64 + 0.5) * frame_us;

    for recorded in decode(bytes) {
        match recorded {
            RecordedEvent::ModeSwitch(e) => {
                let ts = between(frame);
                if e.from != Mode::Flat {
                    events.push(json!({
                        "ph": "E",
                        "name": e.from.name(),
                        "cat": "Mode",
                        "ts": ts,
                        "pid": 0,
                        "tid": 0,
                    }));
                }
                if e.to != Mode::Flat {
                    events.push(json!({
                        "ph": "B",
                        "name": e.to.name(),
                        "cat": "Mode",
                        "ts": ts,
                        "pid": 0,
                        "tid": 0,
                        "args": {
                            "added": e.edits.added,
                            "moved": e.edits.moved,
                            "retired": e.edits.retired,
                        }
                    }));
                } else {
                    events.push(json!({
                        "ph": "i",
                        "name": "ModeSwitch",
                        "cat": "Mode",
                        "ts": ts,
                        "pid": 0,
                        "tid": 0,
                        "s": "g",
                        "args": {
                            "to": e.to.name(),
                            "retired": e.edits.retired,
                        }
                    }));
                }
            }
            RecordedEvent::Visibility(e) => {
                let target = match e.target {
                    VisibilityTarget::Group(g) => g.name().to_owned(),
                    VisibilityTarget::Entity(id) => format!("entity {}", id.index()),
                    VisibilityTarget::DebugOverlay => "overlay".to_owned(),
                };
                events.push(json!({
                    "ph": "i",
                    "name": "Visibility",
                    "cat": "Toggle",
                    "ts": between(frame),
                    "pid": 0,
                    "tid": 1,
                    "s": "t",
                    "args": {
                        "target": target,
                        "on": e.on,
                        "flipped": e.flipped,
                    }
                }));
            }
            RecordedEvent::FrameBoundary(e) => {
                frame = e.frame_index;
                events.push(json!({
                    "ph": "C",
                    "name": "Frame",
                    "cat": "Frame",
                    "ts": frame as f64 * frame_us,
                    "pid": 0,
                    "tid": 0,
                    "args": {
                        "views": e.views,
                        "released": e.released,
                        "restructured": e.restructured,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use strata_core::scene::Group;
    use strata_core::strategy::EditSummary;
    use strata_core::trace::{FrameBoundaryEvent, ModeSwitchEvent, TraceSink, VisibilityEvent};

    #[test]
    fn export_produces_valid_json() {
        let mut rec = RecorderSink::new();
        rec.on_frame_boundary(&FrameBoundaryEvent {
            frame_index: 1,
            views: 1,
            ..FrameBoundaryEvent::default()
        });
        rec.on_mode_switch(&ModeSwitchEvent {
            from: Mode::Flat,
            to: Mode::Layered,
            edits: EditSummary {
                added: 7,
                moved: 2,
                retired: 0,
            },
        });
        rec.on_visibility(&VisibilityEvent {
            target: VisibilityTarget::Group(Group::Background),
            on: false,
            flipped: 2,
        });
        rec.on_mode_switch(&ModeSwitchEvent {
            from: Mode::Layered,
            to: Mode::Flat,
            edits: EditSummary {
                added: 0,
                moved: 2,
                retired: 7,
            },
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), 16_000.0, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 5);

        assert_eq!(parsed[0]["ph"], "C");
        assert_eq!(parsed[0]["ts"], 16_000.0);

        assert_eq!(parsed[1]["ph"], "B");
        assert_eq!(parsed[1]["name"], "layered");
        assert_eq!(parsed[1]["ts"], 24_000.0);

        assert_eq!(parsed[2]["args"]["target"], "background");

        assert_eq!(parsed[3]["ph"], "E");
        assert_eq!(parsed[4]["name"], "ModeSwitch");
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], 16_000.0, &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}
