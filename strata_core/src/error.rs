// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types.
//!
//! Only structural problems are errors. A toggle that asks for the mode the
//! controller is already in is reported as
//! [`Outcome::Redundant`](crate::controller::Outcome::Redundant), and group
//! visibility changes cannot fail.

use alloc::string::String;

use crate::graph::NodeId;
use crate::inspect::AnchorRole;
use crate::scene::{EntityId, Group};
use crate::strategy::Mode;

/// Errors reported by the frame graph, the inspector, and the controller.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum StrataError {
    /// A required anchor stage was not found while classifying a topology.
    #[error("topology malformed: no {missing:?} stage reachable from the root")]
    MalformedTopology {
        /// The anchor that could not be found.
        missing: AnchorRole,
    },

    /// An anchor that must be unique appears more than once.
    #[error("topology malformed: more than one {0:?} stage reachable from the root")]
    DuplicateAnchor(AnchorRole),

    /// A node handle is stale, already queued for release, or was never part
    /// of this graph.
    #[error("dangling node reference {0:?}")]
    DanglingReference(NodeId),

    /// `append_child` was given a node that already has a parent; use
    /// `reparent` to move it.
    #[error("{0:?} already has a parent")]
    AlreadyAttached(NodeId),

    /// A reparent would place a node beneath itself.
    #[error("cannot move {node:?} beneath its own descendant {new_parent:?}")]
    WouldCycle {
        /// The node being moved.
        node: NodeId,
        /// The requested parent, which lies inside `node`'s subtree.
        new_parent: NodeId,
    },

    /// A controller was handed a topology that already carries strategy
    /// stages, so it cannot start in flat mode.
    #[error(
        "topology is not flat: {group_passes} group passes and {suppressors} draw suppressors present"
    )]
    NonFlatTopology {
        /// Clear-plus-filter pairs found under frustum culling.
        group_passes: usize,
        /// `NoDraw` stages found under the main clear.
        suppressors: usize,
    },

    /// A drawable entity was registered without a group.
    #[error("drawable entity '{0}' has no group")]
    UngroupedDrawable(String),

    /// The scene already holds as many entities as an [`EntityId`] can
    /// address.
    #[error("entity limit reached")]
    EntityLimit,

    /// An entity id does not belong to the scene.
    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),

    /// A per-group sub-pass was configured to clear the colour plane, which
    /// would erase the groups drawn before it.
    #[error("per-group sub-passes must not clear the colour plane")]
    ColorClearInSubPass,

    /// A layered pass order names a group more than once, so some other group
    /// would never be drawn.
    #[error("group {0:?} appears more than once in the pass order")]
    RepeatedGroupPass(Group),

    /// A mode switch asked for a mode no registered strategy realizes.
    #[error("no strategy registered for {0} mode")]
    NoStrategy(Mode),

    /// The shared controller lock was poisoned by a panicking thread.
    #[cfg(feature = "std")]
    #[error("controller lock poisoned")]
    Poisoned,
}

/// A specialized `Result` for strata operations.
pub type Result<T, E = StrataError> = core::result::Result<T, E>;
