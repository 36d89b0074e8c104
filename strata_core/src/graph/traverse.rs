// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::FrameGraph;
use crate::error::Result;

/// An iterator over the direct children of a node.
///
/// Created by [`FrameGraph::children`].
#[derive(Debug)]
pub struct Children<'a> {
    graph: &'a FrameGraph,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(graph: &'a FrameGraph, first: u32) -> Self {
        Self {
            graph,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.graph.next_sibling[idx as usize];
        Some(self.graph.handle(idx))
    }
}

impl FrameGraph {
    /// Returns `node` and all its descendants in pre-order.
    pub fn subtree(&self, node: NodeId) -> Result<Vec<NodeId>> {
        self.validate(node)?;
        Ok(self
            .subtree_indices(node.idx)
            .into_iter()
            .map(|idx| self.handle(idx))
            .collect())
    }

    /// Number of nodes reachable from `root`, `root` included.
    pub fn reachable_count(&self, root: NodeId) -> Result<usize> {
        self.validate(root)?;
        Ok(self.subtree_indices(root.idx).len())
    }

    /// Returns the leaves under `root` in pre-order. A childless root is its
    /// own leaf.
    pub fn leaves(&self, root: NodeId) -> Result<Vec<NodeId>> {
        self.validate(root)?;
        Ok(self
            .subtree_indices(root.idx)
            .into_iter()
            .filter(|&idx| self.first_child[idx as usize] == INVALID)
            .map(|idx| self.handle(idx))
            .collect())
    }

    /// Returns the path from the root of `node`'s tree down to `node`.
    pub fn path_to(&self, node: NodeId) -> Result<Vec<NodeId>> {
        self.validate(node)?;
        let mut path = Vec::new();
        let mut cur = node.idx;
        while cur != INVALID {
            path.push(self.handle(cur));
            cur = self.parent[cur as usize];
        }
        path.reverse();
        Ok(path)
    }

    /// Returns `true` if `node` is `root` or one of its descendants.
    pub fn is_in_subtree(&self, node: NodeId, root: NodeId) -> Result<bool> {
        self.validate(node)?;
        self.validate(root)?;
        Ok(self.is_within(node.idx, root.idx))
    }

    /// Pre-order slot indices of the subtree rooted at `idx`, without
    /// checking slot state.
    pub(crate) fn subtree_indices(&self, idx: u32) -> Vec<u32> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        stack.push(idx);
        while let Some(i) = stack.pop() {
            out.push(i);
            // Push children in reverse so the first child is visited first.
            let mut kids = Vec::new();
            let mut c = self.first_child[i as usize];
            while c != INVALID {
                kids.push(c);
                c = self.next_sibling[c as usize];
            }
            stack.extend(kids.into_iter().rev());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use crate::graph::{FrameGraph, NodeKind};

    #[test]
    fn subtree_is_pre_order() {
        let mut graph = FrameGraph::new();
        let r = graph.create_node(NodeKind::Root);
        let a = graph.create_node(NodeKind::NoDraw);
        let a1 = graph.create_node(NodeKind::NoDraw);
        let b = graph.create_node(NodeKind::NoDraw);
        graph.append_child(r, a).unwrap();
        graph.append_child(a, a1).unwrap();
        graph.append_child(r, b).unwrap();

        assert_eq!(graph.subtree(r).unwrap(), vec![r, a, a1, b]);
        assert_eq!(graph.leaves(r).unwrap(), vec![a1, b]);
        assert_eq!(graph.reachable_count(a).unwrap(), 2);
        assert_eq!(graph.path_to(a1).unwrap(), vec![r, a, a1]);
        assert!(graph.is_in_subtree(a1, r).unwrap());
        assert!(graph.is_in_subtree(a, a).unwrap());
        assert!(!graph.is_in_subtree(b, a).unwrap());
    }

    #[test]
    fn lone_root_is_its_own_leaf() {
        let mut graph = FrameGraph::new();
        let r = graph.create_node(NodeKind::Root);
        assert_eq!(graph.leaves(r).unwrap(), vec![r]);
    }
}
