// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and export for strata diagnostics.
//!
//! Trace sinks for [`TraceSink`](strata_core::trace::TraceSink):
//!
//! - [`pretty::PrettyPrintSink`]: one human-readable line per event.
//! - [`recorder::RecorderSink`]: compact binary recording, read back with
//!   [`recorder::decode`].
//! - [`chrome::export`]: Chrome Trace Event Format JSON from recorded bytes.
//!
//! Topology inspection:
//!
//! - [`dump::dump_tree`]: an indented text rendering of a frame graph.
//! - [`snapshot::snapshot_json`]: the same tree, plus the scene, as JSON.

pub mod chrome;
pub mod dump;
pub mod pretty;
pub mod recorder;
pub mod snapshot;
