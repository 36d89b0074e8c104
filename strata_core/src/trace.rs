// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing hooks for toggles and frame boundaries.
//!
//! This module provides a [`TraceSink`] trait with one method per event. All
//! method bodies default to no-ops, so implementing only the events you care
//! about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.

use crate::scene::{EntityId, Group};
use crate::strategy::{EditSummary, Mode};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted after a mode switch was applied to the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeSwitchEvent {
    /// Mode before the switch.
    pub from: Mode,
    /// Mode after the switch.
    pub to: Mode,
    /// Graph edits made by teardown and build together.
    pub edits: EditSummary,
}

/// What a visibility toggle addressed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisibilityTarget {
    /// Every entity of a group.
    Group(Group),
    /// One entity.
    Entity(EntityId),
    /// The debug overlay stage.
    DebugOverlay,
}

/// Emitted after a visibility toggle was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityEvent {
    /// What was toggled.
    pub target: VisibilityTarget,
    /// The requested state.
    pub on: bool,
    /// Number of entities or stages whose state actually changed.
    pub flipped: usize,
}

/// Emitted once per frame boundary, after releases and extraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameBoundaryEvent {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Nodes released at this boundary.
    pub released: usize,
    /// Nodes whose render views were invalidated.
    pub restructured: usize,
    /// Render views extracted.
    pub views: usize,
    /// Entities shown since the previous boundary.
    pub shown: usize,
    /// Entities hidden since the previous boundary.
    pub hidden: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the controller.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called after a mode switch.
    fn on_mode_switch(&mut self, e: &ModeSwitchEvent) {
        _ = e;
    }

    /// Called after a visibility toggle.
    fn on_visibility(&mut self, e: &VisibilityEvent) {
        _ = e;
    }

    /// Called at every frame boundary.
    fn on_frame_boundary(&mut self, e: &FrameBoundaryEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`ModeSwitchEvent`].
    #[inline]
    pub fn mode_switch(&mut self, e: &ModeSwitchEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_mode_switch(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`VisibilityEvent`].
    #[inline]
    pub fn visibility(&mut self, e: &VisibilityEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_visibility(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`FrameBoundaryEvent`].
    #[inline]
    pub fn frame_boundary(&mut self, e: &FrameBoundaryEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_frame_boundary(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
