// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering modes and the strategies that realize them.
//!
//! [`Mode::Flat`] is the forward pipeline as built, with no strategy applied.
//! Every other mode is realized by a [`PipelineStrategy`] that splices extra
//! stages around the anchors found by [`classify`](crate::inspect::classify)
//! and removes them again on teardown.

mod layered;

pub use layered::{LayeredConfig, LayeredStrategy};

use core::fmt;
use core::ops::AddAssign;

use crate::error::Result;
use crate::graph::FrameGraph;
use crate::inspect::TopologyHandle;
use crate::scene::SceneModel;

/// The rendering mode the controller is in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// One unfiltered pass draws every visible entity.
    #[default]
    Flat,
    /// Each group is drawn in its own depth-cleared, filtered sub-pass.
    Layered,
}

impl Mode {
    /// Lower-case name for logs and dumps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Layered => "layered",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Node counts touched by one build or teardown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditSummary {
    /// Nodes created and attached.
    pub added: usize,
    /// Existing nodes moved to a new parent.
    pub moved: usize,
    /// Nodes detached and queued for release.
    pub retired: usize,
}

impl EditSummary {
    /// Returns `true` if the graph was not touched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.added == 0 && self.moved == 0 && self.retired == 0
    }
}

impl AddAssign for EditSummary {
    fn add_assign(&mut self, rhs: Self) {
        self.added += rhs.added;
        self.moved += rhs.moved;
        self.retired += rhs.retired;
    }
}

/// Rewrites a flat topology into some other [`Mode`] and back.
///
/// Implementations must keep two laws:
///
/// - `teardown` after `build` restores the flat topology: the same anchors
///   in the same places and no other reachable nodes.
/// - Both operations are idempotent. A second `build` (or `teardown`) in a
///   row leaves the graph unchanged and returns an empty [`EditSummary`].
///
/// Neither operation may hold on to node handles between calls; anchors are
/// passed in fresh from the inspector every time.
pub trait PipelineStrategy: fmt::Debug {
    /// The mode this strategy realizes.
    fn mode(&self) -> Mode;

    /// Splices the strategy's stages into a flat topology.
    fn build(
        &self,
        graph: &mut FrameGraph,
        anchors: &TopologyHandle,
        scene: &SceneModel,
    ) -> Result<EditSummary>;

    /// Removes the stages `build` inserted and restores the flat topology.
    fn teardown(&self, graph: &mut FrameGraph, anchors: &TopologyHandle) -> Result<EditSummary>;
}
