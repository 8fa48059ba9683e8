//! Recursive insert and erase.
//!
//! Both algorithms descend along one root-to-leaf path and, on the way
//! back up, rebalance every frame and reattach the frame's subtree to its
//! parent. Rotations can change which node roots a subtree, so the parent
//! link is rewritten after every call.

use super::AvlMap;
use super::node::{Node, NodeIndex};
use crate::compare::Comparator;

/// Result of one insert frame.
pub(super) struct InsertOutcome {
    /// Root of the subtree after rebalancing.
    pub(super) subtree: NodeIndex,
    /// Node holding the key: freshly created or already present.
    pub(super) node: NodeIndex,
    pub(super) inserted: bool,
}

impl<K, V, C: Comparator<K>> AvlMap<K, V, C> {
    pub(super) fn insert_into(
        &mut self,
        slot: Option<NodeIndex>,
        parent: Option<NodeIndex>,
        key: K,
        value: V,
    ) -> InsertOutcome {
        let Some(current) = slot else {
            let stamp = self.allocate_stamp();
            let created = self.nodes.insert(Node::new_leaf(key, value, parent, stamp));
            self.length += 1;
            return InsertOutcome {
                subtree: created,
                node: created,
                inserted: true,
            };
        };

        let outcome = if self.comparator.less(&key, &self.nodes[current].key) {
            let outcome = self.insert_into(self.nodes[current].left, Some(current), key, value);
            self.nodes[current].left = Some(outcome.subtree);
            outcome
        } else if self.comparator.less(&self.nodes[current].key, &key) {
            let outcome = self.insert_into(self.nodes[current].right, Some(current), key, value);
            self.nodes[current].right = Some(outcome.subtree);
            outcome
        } else {
            return InsertOutcome {
                subtree: current,
                node: current,
                inserted: false,
            };
        };

        let subtree = self.reattach(current, parent);
        InsertOutcome { subtree, ..outcome }
    }

    /// Erase `target` from the subtree at `slot`, returning the new subtree
    /// root. The removed pair is written to `removed`.
    pub(super) fn erase_from(
        &mut self,
        slot: Option<NodeIndex>,
        parent: Option<NodeIndex>,
        target: NodeIndex,
        removed: &mut Option<(K, V)>,
    ) -> Option<NodeIndex> {
        let current = slot?;

        if current == target {
            let (left, right) = (self.nodes[current].left, self.nodes[current].right);
            if let (Some(_), Some(right)) = (left, right) {
                // Two children: the successor's pair moves up, its node goes
                let successor = self.nodes.min_node(right);
                self.nodes.swap_entries(current, successor);
                let new_right = self.erase_from(Some(right), Some(current), successor, removed);
                self.nodes[current].right = new_right;
            } else {
                let child = left.or(right);
                if let Some(child) = child {
                    self.nodes[child].parent = parent;
                }
                let node = self.nodes.remove(current);
                self.length -= 1;
                *removed = Some((node.key, node.value));
                return child;
            }
        } else if self
            .comparator
            .less(&self.nodes[target].key, &self.nodes[current].key)
        {
            let new_left = self.erase_from(self.nodes[current].left, Some(current), target, removed);
            self.nodes[current].left = new_left;
        } else {
            let new_right =
                self.erase_from(self.nodes[current].right, Some(current), target, removed);
            self.nodes[current].right = new_right;
        }

        Some(self.reattach(current, parent))
    }

    /// Rebalance `index`, fix its children's parent links and hang the
    /// resulting subtree root under `parent`.
    fn reattach(&mut self, index: NodeIndex, parent: Option<NodeIndex>) -> NodeIndex {
        let subtree = self.nodes.rebalance(index);
        self.nodes.fix_child_links(subtree);
        self.nodes[subtree].parent = parent;
        subtree
    }
}

impl<K, V, C> AvlMap<K, V, C> {
    pub(super) const fn allocate_stamp(&mut self) -> u64 {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        stamp
    }
}
