// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Topology inspection.
//!
//! Strategies never hold on to node handles between mode switches. Instead,
//! every switch starts by calling [`classify`], which walks the current graph
//! and returns a fresh [`TopologyHandle`], and teardown rediscovers the nodes
//! a build inserted with [`group_passes`] and [`suppressors`].

use alloc::vec::Vec;
use core::fmt;

use crate::error::{Result, StrataError};
use crate::graph::{FrameGraph, KindTag, NodeId, NodeKind};

/// The role of an anchor stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnchorRole {
    /// Selects the camera for the active path.
    CameraSelector,
    /// The frame's main clear.
    ClearBuffers,
    /// Frustum culling above the drawing stages.
    FrustumCulling,
    /// The debug overlay leaf.
    DebugOverlay,
}

impl AnchorRole {
    /// Every role, in the order they appear on a forward pipeline.
    pub const ALL: [Self; 4] = [
        Self::CameraSelector,
        Self::ClearBuffers,
        Self::FrustumCulling,
        Self::DebugOverlay,
    ];

    const fn matches(self, kind: &NodeKind) -> bool {
        matches!(
            (self, kind),
            (Self::CameraSelector, NodeKind::CameraSelector(_))
                | (Self::ClearBuffers, NodeKind::ClearBuffers(_))
                | (Self::FrustumCulling, NodeKind::FrustumCulling)
                | (Self::DebugOverlay, NodeKind::DebugOverlay { .. })
        )
    }
}

/// The four anchor stages of a topology, as found by [`classify`].
///
/// A handle is a snapshot: it is recomputed on every mode switch and should
/// not be kept across frame boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TopologyHandle {
    /// The camera selector on the active path.
    pub camera_selector: NodeId,
    /// The main clear.
    pub clear_buffers: NodeId,
    /// Frustum culling.
    pub frustum_culling: NodeId,
    /// The debug overlay.
    pub debug_overlay: NodeId,
}

impl TopologyHandle {
    /// Returns the node playing `role`.
    #[must_use]
    pub const fn get(&self, role: AnchorRole) -> NodeId {
        match role {
            AnchorRole::CameraSelector => self.camera_selector,
            AnchorRole::ClearBuffers => self.clear_buffers,
            AnchorRole::FrustumCulling => self.frustum_culling,
            AnchorRole::DebugOverlay => self.debug_overlay,
        }
    }

    /// Fails with [`StrataError::DanglingReference`] unless every anchor is
    /// still alive in `graph`.
    pub fn validate(&self, graph: &FrameGraph) -> Result<()> {
        for role in AnchorRole::ALL {
            let id = self.get(role);
            if !graph.is_alive(id) {
                log::error!("{role:?} anchor {id:?} is no longer alive");
                return Err(StrataError::DanglingReference(id));
            }
        }
        Ok(())
    }
}

/// Walks the topology under `root` and records the first node of each anchor
/// kind.
///
/// The walk is depth-first pre-order with children taken in order. On a
/// chain this is a plain first-child descent; on a layered topology it still
/// lands on the original anchors, because the main clear precedes the
/// per-group clears in pre-order.
///
/// Fails with [`StrataError::MalformedTopology`] if an anchor is missing and
/// with [`StrataError::DuplicateAnchor`] if more than one camera selector is
/// reachable.
pub fn classify(graph: &FrameGraph, root: NodeId) -> Result<TopologyHandle> {
    let mut found: [Option<NodeId>; 4] = [None; 4];
    let mut cameras = 0_usize;

    for id in graph.subtree(root)? {
        let kind = graph.kind(id)?;
        if matches!(kind, NodeKind::CameraSelector(_)) {
            cameras += 1;
        }
        for (slot, role) in found.iter_mut().zip(AnchorRole::ALL) {
            if slot.is_none() && role.matches(kind) {
                *slot = Some(id);
            }
        }
    }

    if cameras > 1 {
        log::warn!("{cameras} camera selectors reachable from {root:?}");
        return Err(StrataError::DuplicateAnchor(AnchorRole::CameraSelector));
    }

    let anchor = |i: usize| {
        found[i].ok_or_else(|| {
            let missing = AnchorRole::ALL[i];
            log::warn!("no {missing:?} reachable from {root:?}");
            StrataError::MalformedTopology { missing }
        })
    };

    Ok(TopologyHandle {
        camera_selector: anchor(0)?,
        clear_buffers: anchor(1)?,
        frustum_culling: anchor(2)?,
        debug_overlay: anchor(3)?,
    })
}

/// A per-group clear and the layer filter beneath it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupPass {
    /// The sub-pass clear, a child of frustum culling.
    pub clear: NodeId,
    /// The filter under `clear`.
    pub filter: NodeId,
}

/// Returns the clear-plus-filter pairs directly under the frustum culling
/// anchor, in child order.
pub fn group_passes(graph: &FrameGraph, anchors: &TopologyHandle) -> Result<Vec<GroupPass>> {
    let mut passes = Vec::new();
    for clear in graph.children(anchors.frustum_culling)? {
        if !matches!(graph.kind(clear)?, NodeKind::ClearBuffers(_)) {
            continue;
        }
        let Some(filter) = graph.first_child(clear)? else {
            continue;
        };
        if matches!(graph.kind(filter)?, NodeKind::LayerFilter(_)) {
            passes.push(GroupPass { clear, filter });
        }
    }
    Ok(passes)
}

/// Returns the `NoDraw` stages directly under the main clear.
pub fn suppressors(graph: &FrameGraph, anchors: &TopologyHandle) -> Result<Vec<NodeId>> {
    let mut out = Vec::new();
    for id in graph.children(anchors.clear_buffers)? {
        if graph.kind(id)?.tag() == KindTag::NoDraw {
            out.push(id);
        }
    }
    Ok(out)
}

/// Counts the debug overlay stages reachable from `root`.
pub fn overlay_reach_count(graph: &FrameGraph, root: NodeId) -> Result<usize> {
    KindCensus::of(graph, root).map(|c| c.count(KindTag::DebugOverlay))
}

/// Number of reachable nodes of each kind.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KindCensus {
    counts: [usize; KindTag::ALL.len()],
}

impl KindCensus {
    /// Counts the nodes reachable from `root`, `root` included.
    pub fn of(graph: &FrameGraph, root: NodeId) -> Result<Self> {
        let mut census = Self::default();
        for id in graph.subtree(root)? {
            census.counts[graph.kind(id)?.tag() as usize] += 1;
        }
        Ok(census)
    }

    /// Number of nodes of kind `tag`.
    #[must_use]
    pub fn count(&self, tag: KindTag) -> usize {
        self.counts[tag as usize]
    }

    /// Total number of nodes counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl fmt::Debug for KindCensus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_map();
        for tag in KindTag::ALL {
            let n = self.count(tag);
            if n > 0 {
                m.entry(&tag.name(), &n);
            }
        }
        m.finish()
    }
}
