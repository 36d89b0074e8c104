// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as fixed-size little-endian records. [`decode`] reads them back
//! as an iterator of [`RecordedEvent`]. Counts are stored as `u32` and
//! saturate.

use strata_core::scene::{EntityId, Group};
use strata_core::strategy::{EditSummary, Mode};
use strata_core::trace::{
    FrameBoundaryEvent, ModeSwitchEvent, TraceSink, VisibilityEvent, VisibilityTarget,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_MODE_SWITCH: u8 = 1;
const TAG_VISIBILITY: u8 = 2;
const TAG_FRAME_BOUNDARY: u8 = 3;

const TARGET_GROUP: u8 = 0;
const TARGET_ENTITY: u8 = 1;
const TARGET_OVERLAY: u8 = 2;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_count(&mut self, n: usize) {
        self.write_u32(u32::try_from(n).unwrap_or(u32::MAX));
    }

    fn write_mode(&mut self, m: Mode) {
        self.write_u8(match m {
            Mode::Flat => 0,
            Mode::Layered => 1,
        });
    }
}

impl TraceSink for RecorderSink {
    fn on_mode_switch(&mut self, e: &ModeSwitchEvent) {
        self.write_u8(TAG_MODE_SWITCH);
        self.write_mode(e.from);
        self.write_mode(e.to);
        self.write_count(e.edits.added);
        self.write_count(e.edits.moved);
        self.write_count(e.edits.retired);
    }

    fn on_visibility(&mut self, e: &VisibilityEvent) {
        self.write_u8(TAG_VISIBILITY);
        match e.target {
            VisibilityTarget::Group(g) => {
                self.write_u8(TARGET_GROUP);
                self.write_count(g.index());
            }
            VisibilityTarget::Entity(id) => {
                self.write_u8(TARGET_ENTITY);
                self.write_u32(id.index());
            }
            VisibilityTarget::DebugOverlay => {
                self.write_u8(TARGET_OVERLAY);
                self.write_u32(0);
            }
        }
        self.write_u8(u8::from(e.on));
        self.write_count(e.flipped);
    }

    fn on_frame_boundary(&mut self, e: &FrameBoundaryEvent) {
        self.write_u8(TAG_FRAME_BOUNDARY);
        self.write_u64(e.frame_index);
        self.write_count(e.released);
        self.write_count(e.restructured);
        self.write_count(e.views);
        self.write_count(e.shown);
        self.write_count(e.hidden);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordedEvent {
    /// A [`ModeSwitchEvent`].
    ModeSwitch(ModeSwitchEvent),
    /// A [`VisibilityEvent`].
    Visibility(VisibilityEvent),
    /// A [`FrameBoundaryEvent`].
    FrameBoundary(FrameBoundaryEvent),
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_count(&mut self) -> Option<usize> {
        usize::try_from(self.read_u32()?).ok()
    }

    fn read_mode(&mut self) -> Option<Mode> {
        Some(match self.read_u8()? {
            0 => Mode::Flat,
            _ => Mode::Layered,
        })
    }

    fn decode_mode_switch(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::ModeSwitch(ModeSwitchEvent {
            from: self.read_mode()?,
            to: self.read_mode()?,
            edits: EditSummary {
                added: self.read_count()?,
                moved: self.read_count()?,
                retired: self.read_count()?,
            },
        }))
    }

    fn decode_visibility(&mut self) -> Option<RecordedEvent> {
        let kind = self.read_u8()?;
        let payload = self.read_count()?;
        let target = match kind {
            TARGET_GROUP => VisibilityTarget::Group(*Group::BACK_TO_FRONT.get(payload)?),
            TARGET_ENTITY => VisibilityTarget::Entity(EntityId::from_index(
                u32::try_from(payload).ok()?,
            )),
            TARGET_OVERLAY => VisibilityTarget::DebugOverlay,
            _ => return None,
        };
        Some(RecordedEvent::Visibility(VisibilityEvent {
            target,
            on: self.read_u8()? != 0,
            flipped: self.read_count()?,
        }))
    }

    fn decode_frame_boundary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::FrameBoundary(FrameBoundaryEvent {
            frame_index: self.read_u64()?,
            released: self.read_count()?,
            restructured: self.read_count()?,
            views: self.read_count()?,
            shown: self.read_count()?,
            hidden: self.read_count()?,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_MODE_SWITCH => self.decode_mode_switch(),
            TAG_VISIBILITY => self.decode_visibility(),
            TAG_FRAME_BOUNDARY => self.decode_frame_boundary(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
