//! Binary search and in-order stepping.
//!
//! Stepping uses parent links, so walking the whole map needs no auxiliary
//! stack and a single step costs O(log N) in the worst case.

use std::borrow::Borrow;

use super::node::{NodeArena, NodeIndex};
use crate::compare::Comparator;

impl<K, V> NodeArena<K, V> {
    /// Iterative comparator-driven search below `root`.
    pub(crate) fn find_node<Q, C>(
        &self,
        root: Option<NodeIndex>,
        key: &Q,
        comparator: &C,
    ) -> Option<NodeIndex>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut cursor = root;
        while let Some(index) = cursor {
            let node = &self[index];
            if comparator.less(key, node.key.borrow()) {
                cursor = node.left;
            } else if comparator.less(node.key.borrow(), key) {
                cursor = node.right;
            } else {
                return Some(index);
            }
        }
        None
    }

    /// Leftmost node of the subtree rooted at `index`.
    pub(crate) fn min_node(&self, index: NodeIndex) -> NodeIndex {
        let mut current = index;
        while let Some(left) = self[current].left {
            current = left;
        }
        current
    }

    /// Rightmost node of the subtree rooted at `index`.
    pub(crate) fn max_node(&self, index: NodeIndex) -> NodeIndex {
        let mut current = index;
        while let Some(right) = self[current].right {
            current = right;
        }
        current
    }

    /// The next node in key order, or `None` after the last one.
    pub(crate) fn successor(&self, index: NodeIndex) -> Option<NodeIndex> {
        if let Some(right) = self[index].right {
            return Some(self.min_node(right));
        }
        let mut child = index;
        let mut parent = self[index].parent;
        while let Some(ancestor) = parent {
            if self[ancestor].right != Some(child) {
                break;
            }
            child = ancestor;
            parent = self[ancestor].parent;
        }
        parent
    }

    /// The previous node in key order, or `None` before the first one.
    pub(crate) fn predecessor(&self, index: NodeIndex) -> Option<NodeIndex> {
        if let Some(left) = self[index].left {
            return Some(self.max_node(left));
        }
        let mut child = index;
        let mut parent = self[index].parent;
        while let Some(ancestor) = parent {
            if self[ancestor].left != Some(child) {
                break;
            }
            child = ancestor;
            parent = self[ancestor].parent;
        }
        parent
    }
}
