// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The frame graph and the scene both use multi-channel dirty tracking (via
//! [`understory_dirty`]) so that a backend can tell which render views and
//! which entities changed since the previous frame.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`STRUCTURE`] uses
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and has dependency edges
//!   from child to parent. Moving or inserting a node marks its whole subtree,
//!   because every render view below it now has a different ancestor chain.
//!
//! - **Local-only**: [`PAYLOAD`] is marked when a node's kind-specific data
//!   changes (clear planes, filter layers, overlay enablement). Only that node
//!   is reported.
//!
//! - **Scene**: [`VISIBILITY`] is marked on entities whose visible flag
//!   flipped. It lives in the scene's own tracker; entity and node keys never
//!   share a tracker.
//!
//! # Consumption
//!
//! Callers never query dirty state directly.
//! [`FrameGraph::evaluate`](crate::graph::FrameGraph::evaluate) and
//! [`SceneModel::evaluate`](crate::scene::SceneModel::evaluate) drain the
//! channels and surface the results as
//! [`GraphChanges`](crate::graph::GraphChanges) and
//! [`SceneChanges`](crate::scene::SceneChanges).

use understory_dirty::Channel;

/// A node was attached, moved, or detached: every view below it must be
/// rebuilt.
pub const STRUCTURE: Channel = Channel::new(0);

/// A node's kind-specific payload changed; no propagation needed.
pub const PAYLOAD: Channel = Channel::new(1);

/// An entity's visible flag changed.
pub const VISIBILITY: Channel = Channel::new(2);
