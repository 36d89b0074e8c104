// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::trace::{
    FrameBoundaryEvent, ModeSwitchEvent, TraceSink, VisibilityEvent, VisibilityTarget,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_mode_switch(&mut self, e: &ModeSwitchEvent) {
        let _ = writeln!(
            self.writer,
            "[mode] {} -> {} added={} moved={} retired={}",
            e.from, e.to, e.edits.added, e.edits.moved, e.edits.retired,
        );
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        let target = match e.target {
            VisibilityTarget::Group(g) => format!("group={}", g.name()),
            VisibilityTarget::Entity(id) => format!("entity={}", id.index()),
            VisibilityTarget::DebugOverlay => "overlay".to_owned(),
        };
        let _ = writeln!(
            self.writer,
            "[visibility] {target} {} flipped={}",
            on_off(e.on),
            e.flipped,
        );
    }

    fn on_frame_boundary(&mut self, e: &FrameBoundaryEvent) {
        let _ = writeln!(
            self.writer,
            "[frame] index={} released={} restructured={} views={} shown={} hidden={}",
            e.frame_index, e.released, e.restructured, e.views, e.shown, e.hidden,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::scene::Group;
    use strata_core::strategy::{EditSummary, Mode};

    #[test]
    fn pretty_print_mode_switch() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_mode_switch(&ModeSwitchEvent {
            from: Mode::Flat,
            to: Mode::Layered,
            edits: EditSummary {
                added: 7,
                moved: 2,
                retired: 0,
            },
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert!(output.starts_with("[mode] flat -> layered"), "got: {output}");
        assert!(output.contains("added=7"), "got: {output}");
    }

    #[test]
    fn pretty_print_group_toggle() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_visibility(&VisibilityEvent {
            target: VisibilityTarget::Group(Group::Foreground),
            on: false,
            flipped: 2,
        });
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "[visibility] group=foreground off flipped=2\n");
    }
}
