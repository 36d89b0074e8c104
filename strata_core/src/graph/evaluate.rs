// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame boundary processing and change tracking.
//!
//! [`FrameGraph::evaluate`] is called once per frame, before extraction:
//!
//! 1. Subtrees queued by `remove_subtree` are released in submission order.
//!    Their slots go to the free list and their generations are bumped.
//! 2. The traversal order is rebuilt if topology changed.
//! 3. **STRUCTURE** is drained with its dependents, yielding every node
//!    whose render view may have changed.
//! 4. **PAYLOAD** is drained as-is.

use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::{FrameGraph, SlotState};
use crate::dirty;

/// The set of changes produced by a single [`FrameGraph::evaluate`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GraphChanges {
    /// Live nodes whose position, or an ancestor's position, changed.
    pub restructured: Vec<NodeId>,
    /// Live nodes whose kind or payload was replaced.
    pub payload: Vec<NodeId>,
    /// Nodes created since the last evaluate that are still live.
    pub added: Vec<NodeId>,
    /// Handles released at this boundary. All of them are now stale.
    pub released: Vec<NodeId>,
    /// Whether the traversal order was rebuilt.
    pub topology_changed: bool,
}

impl GraphChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.restructured.clear();
        self.payload.clear();
        self.added.clear();
        self.released.clear();
        self.topology_changed = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.restructured.is_empty()
            && self.payload.is_empty()
            && self.added.is_empty()
            && self.released.is_empty()
            && !self.topology_changed
    }
}

impl FrameGraph {
    /// Crosses a frame boundary: releases retired subtrees and returns the
    /// set of changes since the previous call.
    pub fn evaluate(&mut self) -> GraphChanges {
        let mut changes = GraphChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut GraphChanges) {
        changes.clear();

        let queued = core::mem::take(&mut self.pending_release);
        for root in queued {
            for idx in self.subtree_indices(root) {
                changes.released.push(self.handle(idx));
                self.release_slot(idx);
            }
        }

        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        let restructured: Vec<u32> = self
            .dirty
            .drain(dirty::STRUCTURE)
            .affected()
            .deterministic()
            .run()
            .collect();
        changes.restructured = self.live_handles(restructured);

        let payload: Vec<u32> = self
            .dirty
            .drain(dirty::PAYLOAD)
            .deterministic()
            .run()
            .collect();
        changes.payload = self.live_handles(payload);

        let mut added = core::mem::take(&mut self.pending_added);
        added.sort_unstable();
        added.dedup();
        changes.added = self.live_handles(added);
    }

    /// Returns the current traversal order (depth-first pre-order over every
    /// live tree).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called at least
    /// once.
    #[must_use]
    pub fn traversal_order(&self) -> &[NodeId] {
        &self.traversal_order
    }

    fn live_handles(&self, indices: Vec<u32>) -> Vec<NodeId> {
        indices
            .into_iter()
            .filter(|&idx| self.state[idx as usize] == SlotState::Live)
            .map(|idx| self.handle(idx))
            .collect()
    }

    fn release_slot(&mut self, idx: u32) {
        let i = idx as usize;
        self.dirty.remove_key(idx);
        self.generation[i] = self.generation[i].wrapping_add(1);
        self.state[i] = SlotState::Free;
        self.parent[i] = INVALID;
        self.first_child[i] = INVALID;
        self.next_sibling[i] = INVALID;
        self.prev_sibling[i] = INVALID;
        self.free_list.push(idx);
    }

    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && self.state[idx as usize] == SlotState::Live
            {
                for i in self.subtree_indices(idx) {
                    let handle = self.handle(i);
                    self.traversal_order.push(handle);
                }
            }
        }
    }
}
