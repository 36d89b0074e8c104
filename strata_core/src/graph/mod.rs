// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame graph data model.
//!
//! A *frame graph* is the tree of pipeline stages a backend walks once per
//! frame. Every leaf produces one render view whose configuration is the
//! accumulated state of its ancestors (camera, clears, culling, layer
//! filters). Each node has:
//!
//! - An identity ([`NodeId`]): a generational handle that becomes stale when
//!   the node is released, so a handle kept across a teardown cannot reach a
//!   recycled slot.
//! - Topology: parent, first-child, and sibling links forming an ordered
//!   tree.
//! - A [`NodeKind`]: a closed set of stage kinds with their payloads.
//!
//! # Deferred release
//!
//! [`remove_subtree`](FrameGraph::remove_subtree) detaches the subtree at
//! once, so no later traversal reaches it, but the slots stay reserved until
//! the next [`evaluate`](FrameGraph::evaluate). A frame extracted before the
//! removal may therefore still name those nodes safely until the frame
//! boundary. Moves ([`reparent`](FrameGraph::reparent)) release nothing and
//! take effect immediately.

mod evaluate;
mod forward;
mod id;
mod node;
mod store;
mod traverse;

pub use evaluate::GraphChanges;
pub use forward::{ForwardConfig, forward_renderer};
pub use id::NodeId;
pub use node::{BufferPlanes, ClearBuffers, ClearColor, FilterMode, KindTag, LayerFilter, NodeKind};
pub use store::FrameGraph;
pub use traverse::Children;
