// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene groups and a live-reconfigurable frame graph for layered rendering.
//!
//! `strata_core` owns the part of a renderer that decides *how* a scene is
//! drawn: which render passes exist, in which order, and which geometry each
//! one sees. A scene is split into three independently toggleable groups
//! (background, middleground, foreground). The frame graph can be switched at
//! run time between a single flat pass and a layered strategy that clears
//! depth and stencil and draws each group in its own filtered sub-pass.
//!
//! The crate is `no_std` compatible (with `alloc`); the `std` feature adds
//! the cross-thread handoff in [`shared`].
//!
//! # Architecture
//!
//! ```text
//!   UI events (Event)
//!       │
//!       ▼
//!   ToggleController::handle() ──► SceneModel::set_visible()
//!       │
//!       ├──► inspect::classify() ──► TopologyHandle
//!       │
//!       ▼
//!   PipelineStrategy::build() / teardown() ──► FrameGraph edits
//!                                                   │
//!                 ┌─────────────────────────────────┘
//!                 ▼
//!   ToggleController::begin_frame() ──► FrameGraph::evaluate() ──► Frame
//!                                                                    │
//!                                       FrameConsumer::consume() ◄───┘
//! ```
//!
//! **[`scene`]**: Entities, the three groups and their recursive layers,
//! per-entity visibility.
//!
//! **[`graph`]**: Struct-of-arrays frame graph with generational handles.
//! Removals are detached immediately and released at the next frame boundary.
//!
//! **[`inspect`]**: Walks a frame graph and classifies the anchor stages a
//! strategy splices around.
//!
//! **[`strategy`]**: The [`PipelineStrategy`](strategy::PipelineStrategy)
//! seam and the layered implementation.
//!
//! **[`controller`]**: Maps toggle events to scene mutations and strategy
//! invocations; owns the rendering [`Mode`](strategy::Mode).
//!
//! **[`frame`]**: Per-frame extraction of render views, the backend's
//! read-only picture of the graph.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) hooks for graph edits and
//! frame boundaries, with a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (enabled by default): Enables `std` support in dependencies and the
//!   [`shared`] module.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod controller;
pub mod dirty;
pub mod error;
pub mod frame;
pub mod graph;
pub mod inspect;
pub mod scene;
#[cfg(feature = "std")]
pub mod shared;
pub mod strategy;
pub mod trace;
pub mod transform;

pub use error::{Result, StrataError};
