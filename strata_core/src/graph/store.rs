// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation, topology, and payload
//! management.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, NodeId};
use super::node::NodeKind;
use super::traverse::Children;
use crate::dirty;
use crate::error::{Result, StrataError};

/// Lifecycle of a slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SlotState {
    /// Allocated and usable.
    Live,
    /// Detached by `remove_subtree`, waiting for the frame boundary.
    Retiring,
    /// On the free list.
    Free,
}

/// Struct-of-arrays storage for a frame graph.
///
/// Nodes are addressed by [`NodeId`] handles. Internally, each node occupies
/// a slot in parallel arrays. Released nodes are recycled via a free list,
/// and generation counters make old handles fail validation.
///
/// Every mutation validates its handles and reports
/// [`StrataError::DanglingReference`] instead of touching a slot that is
/// retiring, free, or from another generation.
#[derive(Debug)]
pub struct FrameGraph {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Payload --
    pub(crate) kind: Vec<NodeKind>,

    // -- Allocation --
    pub(crate) state: Vec<SlotState>,
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<NodeId>,
    pub(crate) traversal_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    /// Roots of detached subtrees, in submission order.
    pub(crate) pending_release: Vec<u32>,
}

impl Default for FrameGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            kind: Vec::new(),
            state: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            pending_added: Vec::new(),
            pending_release: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a detached node and returns its handle.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a released slot; its generation was bumped on release.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.kind[i] = kind;
            self.state[i] = SlotState::Live;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.kind.push(kind);
            self.state.push(SlotState::Live);
            self.generation.push(0);
            idx
        };

        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::STRUCTURE);
        self.handle(idx)
    }

    /// Returns whether the handle refers to a live node.
    ///
    /// Nodes queued by [`remove_subtree`](Self::remove_subtree) are no longer
    /// alive, even before the frame boundary releases their slots.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len
            && self.generation[id.idx as usize] == id.generation
            && self.state[id.idx as usize] == SlotState::Live
    }

    /// Number of live nodes, attached or not.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.state.iter().filter(|s| **s == SlotState::Live).count()
    }

    /// Number of nodes detached by `remove_subtree` and not yet released.
    #[must_use]
    pub fn retiring_count(&self) -> usize {
        self.state
            .iter()
            .filter(|s| **s == SlotState::Retiring)
            .count()
    }

    // -- Topology API --

    /// Adds the detached node `child` as the last child of `parent`.
    ///
    /// Fails with [`StrataError::AlreadyAttached`] if `child` has a parent and
    /// with [`StrataError::WouldCycle`] if `parent` lies in `child`'s subtree.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.validate(parent)?;
        self.validate(child)?;
        if self.parent[child.idx as usize] != INVALID {
            return Err(StrataError::AlreadyAttached(child));
        }
        if self.is_within(parent.idx, child.idx) {
            return Err(StrataError::WouldCycle {
                node: child,
                new_parent: parent,
            });
        }
        self.link_last(parent.idx, child.idx);
        Ok(())
    }

    /// Moves `child`, with its subtree, to be the last child of `new_parent`.
    ///
    /// The node stays alive throughout; only its position changes, so this is
    /// safe to apply between any two traversals.
    pub fn reparent(&mut self, child: NodeId, new_parent: NodeId) -> Result<()> {
        self.validate(child)?;
        self.validate(new_parent)?;
        if self.is_within(new_parent.idx, child.idx) {
            return Err(StrataError::WouldCycle {
                node: child,
                new_parent,
            });
        }
        if self.parent[child.idx as usize] != INVALID {
            self.unlink_from_parent(child.idx);
        }
        self.link_last(new_parent.idx, child.idx);
        Ok(())
    }

    /// Detaches `node` and queues it, with all its descendants, for release at
    /// the next [`evaluate`](Self::evaluate).
    ///
    /// From this call on, handles into the subtree fail validation, but the
    /// slots are not reused until the frame boundary.
    pub fn remove_subtree(&mut self, node: NodeId) -> Result<()> {
        self.validate(node)?;
        if self.parent[node.idx as usize] != INVALID {
            self.unlink_from_parent(node.idx);
        }
        for idx in self.subtree_indices(node.idx) {
            self.state[idx as usize] = SlotState::Retiring;
        }
        self.pending_release.push(node.idx);
        self.traversal_dirty = true;
        Ok(())
    }

    /// Returns the parent of a node, if any.
    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.validate(id)?;
        let p = self.parent[id.idx as usize];
        Ok((p != INVALID).then(|| self.handle(p)))
    }

    /// Returns an iterator over the direct children of a node, in order.
    pub fn children(&self, id: NodeId) -> Result<Children<'_>> {
        self.validate(id)?;
        Ok(Children::new(self, self.first_child[id.idx as usize]))
    }

    /// Returns the first child of a node, if any.
    pub fn first_child(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.validate(id)?;
        let c = self.first_child[id.idx as usize];
        Ok((c != INVALID).then(|| self.handle(c)))
    }

    /// Returns live nodes that have no parent.
    #[must_use]
    pub fn roots(&self) -> Vec<NodeId> {
        (0..self.len)
            .filter(|&idx| {
                self.state[idx as usize] == SlotState::Live && self.parent[idx as usize] == INVALID
            })
            .map(|idx| self.handle(idx))
            .collect()
    }

    // -- Payload API --

    /// Returns the kind of a node.
    pub fn kind(&self, id: NodeId) -> Result<&NodeKind> {
        self.validate(id)?;
        Ok(&self.kind[id.idx as usize])
    }

    /// Replaces the kind of a node.
    pub fn set_kind(&mut self, id: NodeId, kind: NodeKind) -> Result<()> {
        self.validate(id)?;
        self.kind[id.idx as usize] = kind;
        self.dirty.mark(id.idx, dirty::PAYLOAD);
        Ok(())
    }

    // -- Internal helpers --

    /// Builds the current handle for slot `idx`.
    pub(crate) fn handle(&self, idx: u32) -> NodeId {
        NodeId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Fails if the handle is stale or not live.
    pub(crate) fn validate(&self, id: NodeId) -> Result<()> {
        if self.is_alive(id) {
            Ok(())
        } else {
            log::error!("dangling frame graph reference {id:?}");
            Err(StrataError::DanglingReference(id))
        }
    }

    /// Returns `true` if `idx` is `ancestor` or one of its descendants.
    pub(crate) fn is_within(&self, idx: u32, ancestor: u32) -> bool {
        let mut cur = idx;
        while cur != INVALID {
            if cur == ancestor {
                return true;
            }
            cur = self.parent[cur as usize];
        }
        false
    }

    /// Appends `c` as the last child of `p` and marks `c`'s subtree.
    fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        // Child depends on parent: a move upstream invalidates the views below.
        let _ = self.dirty.add_dependency(c, p, dirty::STRUCTURE);
        self.dirty.mark_with(c, dirty::STRUCTURE, &EagerPolicy);
        self.traversal_dirty = true;
    }

    /// Removes `idx` from its parent's child list.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;

        self.dirty.remove_dependency(idx, p, dirty::STRUCTURE);
        // The old parent may have become a leaf, which is a new render view.
        self.dirty.mark(p, dirty::STRUCTURE);
        self.traversal_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn node(graph: &mut FrameGraph) -> NodeId {
        graph.create_node(NodeKind::NoDraw)
    }

    #[test]
    fn create_and_remove() {
        let mut graph = FrameGraph::new();
        let id = node(&mut graph);
        assert!(graph.is_alive(id));
        graph.remove_subtree(id).unwrap();
        assert!(!graph.is_alive(id));
        assert_eq!(graph.retiring_count(), 1);
    }

    #[test]
    fn release_waits_for_evaluate() {
        let mut graph = FrameGraph::new();
        let a = node(&mut graph);
        graph.remove_subtree(a).unwrap();
        // Not yet recycled: a new node gets a fresh slot.
        let b = node(&mut graph);
        assert_ne!(a.idx, b.idx);

        let _ = graph.evaluate();
        let c = node(&mut graph);
        assert_eq!(a.idx, c.idx, "slot reused after the frame boundary");
        assert_ne!(a.generation, c.generation);
        assert!(!graph.is_alive(a));
        assert!(graph.is_alive(c));
    }

    #[test]
    fn append_child_and_query() {
        let mut graph = FrameGraph::new();
        let parent = node(&mut graph);
        let child1 = node(&mut graph);
        let child2 = node(&mut graph);

        graph.append_child(parent, child1).unwrap();
        graph.append_child(parent, child2).unwrap();

        assert_eq!(graph.parent(child1).unwrap(), Some(parent));
        assert_eq!(graph.parent(child2).unwrap(), Some(parent));
        let kids: Vec<_> = graph.children(parent).unwrap().collect();
        assert_eq!(kids, vec![child1, child2]);
        assert_eq!(graph.first_child(parent).unwrap(), Some(child1));
    }

    #[test]
    fn append_attached_child_is_rejected() {
        let mut graph = FrameGraph::new();
        let a = node(&mut graph);
        let b = node(&mut graph);
        let c = node(&mut graph);
        graph.append_child(a, c).unwrap();
        assert_eq!(
            graph.append_child(b, c),
            Err(StrataError::AlreadyAttached(c))
        );
    }

    #[test]
    fn reparent_moves_subtree() {
        let mut graph = FrameGraph::new();
        let p1 = node(&mut graph);
        let p2 = node(&mut graph);
        let child = node(&mut graph);
        let grandchild = node(&mut graph);

        graph.append_child(p1, child).unwrap();
        graph.append_child(child, grandchild).unwrap();
        graph.reparent(child, p2).unwrap();

        assert_eq!(graph.parent(child).unwrap(), Some(p2));
        assert_eq!(graph.parent(grandchild).unwrap(), Some(child));
        assert!(graph.children(p1).unwrap().next().is_none());
    }

    #[test]
    fn reparent_appends_after_existing_children() {
        let mut graph = FrameGraph::new();
        let p = node(&mut graph);
        let a = node(&mut graph);
        let b = node(&mut graph);
        let c = node(&mut graph);
        graph.append_child(p, a).unwrap();
        graph.append_child(a, c).unwrap();
        graph.append_child(p, b).unwrap();

        graph.reparent(c, p).unwrap();
        let kids: Vec<_> = graph.children(p).unwrap().collect();
        assert_eq!(kids, vec![a, b, c]);
        assert!(graph.children(a).unwrap().next().is_none());
    }

    #[test]
    fn reparent_into_own_subtree_is_rejected() {
        let mut graph = FrameGraph::new();
        let a = node(&mut graph);
        let b = node(&mut graph);
        graph.append_child(a, b).unwrap();

        assert_eq!(
            graph.reparent(a, b),
            Err(StrataError::WouldCycle {
                node: a,
                new_parent: b
            })
        );
        assert_eq!(
            graph.reparent(a, a),
            Err(StrataError::WouldCycle {
                node: a,
                new_parent: a
            })
        );
        // Nothing moved.
        assert_eq!(graph.parent(b).unwrap(), Some(a));
        assert_eq!(graph.parent(a).unwrap(), None);
    }

    #[test]
    fn remove_subtree_detaches_and_retires_descendants() {
        let mut graph = FrameGraph::new();
        let root = node(&mut graph);
        let keep = node(&mut graph);
        let gone = node(&mut graph);
        let gone_child = node(&mut graph);
        graph.append_child(root, keep).unwrap();
        graph.append_child(root, gone).unwrap();
        graph.append_child(gone, gone_child).unwrap();

        graph.remove_subtree(gone).unwrap();

        let kids: Vec<_> = graph.children(root).unwrap().collect();
        assert_eq!(kids, vec![keep]);
        assert!(!graph.is_alive(gone_child));
        assert_eq!(graph.live_count(), 2);
        assert_eq!(graph.retiring_count(), 2);

        let changes = graph.evaluate();
        assert_eq!(changes.released.len(), 2);
        assert_eq!(graph.retiring_count(), 0);
    }

    #[test]
    fn stale_handles_are_dangling_references() {
        let mut graph = FrameGraph::new();
        let root = node(&mut graph);
        let id = node(&mut graph);
        graph.remove_subtree(id).unwrap();

        assert_eq!(
            graph.append_child(root, id),
            Err(StrataError::DanglingReference(id))
        );
        assert_eq!(
            graph.reparent(id, root),
            Err(StrataError::DanglingReference(id))
        );
        assert_eq!(
            graph.remove_subtree(id),
            Err(StrataError::DanglingReference(id))
        );
        assert_eq!(graph.parent(id), Err(StrataError::DanglingReference(id)));
        assert!(graph.kind(id).is_err());
    }

    #[test]
    fn roots_returns_parentless_live_nodes() {
        let mut graph = FrameGraph::new();
        let a = node(&mut graph);
        let b = node(&mut graph);
        let c = node(&mut graph);
        graph.append_child(a, c).unwrap();
        graph.remove_subtree(b).unwrap();

        assert_eq!(graph.roots(), vec![a]);
    }

    #[test]
    fn set_kind_replaces_payload() {
        let mut graph = FrameGraph::new();
        let id = graph.create_node(NodeKind::DebugOverlay { enabled: false });
        graph
            .set_kind(id, NodeKind::DebugOverlay { enabled: true })
            .unwrap();
        assert_eq!(
            graph.kind(id).unwrap(),
            &NodeKind::DebugOverlay { enabled: true }
        );
    }
}
