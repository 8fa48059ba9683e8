//! Rotations and the AVL rebalance step.
//!
//! Rotations relink the pivot's inner child and recompute both heights. The
//! returned subtree root still carries the parent of the node it replaced;
//! the recursive insert/erase frame that owns this subtree sets it again
//! after [`NodeArena::rebalance`] returns.

use tracing::trace;

use super::node::{NodeArena, NodeIndex};

impl<K, V> NodeArena<K, V> {
    /// Recompute the cached height of `index` from its children.
    pub(crate) fn update_height(&mut self, index: NodeIndex) {
        let left = self.height(self[index].left);
        let right = self.height(self[index].right);
        self[index].height = 1 + left.max(right);
    }

    /// `height(left) - height(right)`.
    pub(crate) fn balance_factor(&self, index: NodeIndex) -> i32 {
        self.height(self[index].left) - self.height(self[index].right)
    }

    /// Rotate the subtree rooted at `old_root` to the right.
    ///
    /// Returns the new subtree root (the former left child). A node without
    /// a left child is returned unchanged.
    pub(crate) fn rotate_right(&mut self, old_root: NodeIndex) -> NodeIndex {
        let Some(new_root) = self[old_root].left else {
            return old_root;
        };
        let inner = self[new_root].right;

        self[old_root].left = inner;
        if let Some(inner) = inner {
            self[inner].parent = Some(old_root);
        }
        self[new_root].right = Some(old_root);
        self[new_root].parent = self[old_root].parent;
        self[old_root].parent = Some(new_root);

        self.update_height(old_root);
        self.update_height(new_root);
        trace!(pivot = ?old_root, new_root = ?new_root, "rotate right");
        new_root
    }

    /// Rotate the subtree rooted at `old_root` to the left.
    ///
    /// Returns the new subtree root (the former right child). A node without
    /// a right child is returned unchanged.
    pub(crate) fn rotate_left(&mut self, old_root: NodeIndex) -> NodeIndex {
        let Some(new_root) = self[old_root].right else {
            return old_root;
        };
        let inner = self[new_root].left;

        self[old_root].right = inner;
        if let Some(inner) = inner {
            self[inner].parent = Some(old_root);
        }
        self[new_root].left = Some(old_root);
        self[new_root].parent = self[old_root].parent;
        self[old_root].parent = Some(new_root);

        self.update_height(old_root);
        self.update_height(new_root);
        trace!(pivot = ?old_root, new_root = ?new_root, "rotate left");
        new_root
    }

    /// Restore the balance invariant at `index` with zero, one or two
    /// rotations, returning the root of the resulting subtree.
    ///
    /// Both subtrees of `index` must already be balanced and differ in
    /// height by at most two.
    pub(crate) fn rebalance(&mut self, index: NodeIndex) -> NodeIndex {
        self.update_height(index);
        let factor = self.balance_factor(index);

        if factor > 1 {
            // Left-Right: straighten the left child first
            if let Some(left) = self[index].left
                && self.balance_factor(left) < 0
            {
                let new_left = self.rotate_left(left);
                self[index].left = Some(new_left);
                self[new_left].parent = Some(index);
            }
            let new_root = self.rotate_right(index);
            self.fix_child_links(new_root);
            new_root
        } else if factor < -1 {
            // Right-Left: straighten the right child first
            if let Some(right) = self[index].right
                && self.balance_factor(right) > 0
            {
                let new_right = self.rotate_right(right);
                self[index].right = Some(new_right);
                self[new_right].parent = Some(index);
            }
            let new_root = self.rotate_left(index);
            self.fix_child_links(new_root);
            new_root
        } else {
            index
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::node::Node;
    use super::*;
    use rstest::rstest;

    /// Build a one-sided chain rooted at `keys[0]`, heights filled in bottom-up.
    fn chain(arena: &mut NodeArena<i32, ()>, keys: &[i32], leftward: bool) -> NodeIndex {
        let mut parent: Option<NodeIndex> = None;
        let mut root = None;
        for (stamp, &key) in keys.iter().enumerate() {
            let index = arena.insert(Node::new_leaf(key, (), parent, stamp as u64));
            if let Some(parent) = parent {
                if leftward {
                    arena[parent].left = Some(index);
                } else {
                    arena[parent].right = Some(index);
                }
            } else {
                root = Some(index);
            }
            parent = Some(index);
        }
        // Heights bottom-up
        let mut cursor = parent;
        while let Some(index) = cursor {
            arena.update_height(index);
            cursor = arena[index].parent;
        }
        root.unwrap_or_else(|| unreachable!("chain needs at least one key"))
    }

    #[rstest]
    fn test_rebalance_left_left() {
        let mut arena = NodeArena::new();
        let root = chain(&mut arena, &[3, 2, 1], true);

        let new_root = arena.rebalance(root);

        assert_eq!(arena[new_root].key, 2);
        assert_eq!(arena[new_root].height, 2);
        let left = arena[new_root].left.unwrap();
        let right = arena[new_root].right.unwrap();
        assert_eq!((arena[left].key, arena[right].key), (1, 3));
        assert_eq!(arena[left].parent, Some(new_root));
        assert_eq!(arena[right].parent, Some(new_root));
    }

    #[rstest]
    fn test_rebalance_right_left() {
        let mut arena = NodeArena::new();
        let root = arena.insert(Node::new_leaf(1, (), None, 0));
        let right = arena.insert(Node::new_leaf(3, (), Some(root), 1));
        let inner = arena.insert(Node::new_leaf(2, (), Some(right), 2));
        arena[root].right = Some(right);
        arena[right].left = Some(inner);
        arena.update_height(right);

        let new_root = arena.rebalance(root);

        assert_eq!(arena[new_root].key, 2);
        assert_eq!(arena.balance_factor(new_root), 0);
        assert_eq!(arena[root].parent, Some(new_root));
        assert_eq!(arena[right].parent, Some(new_root));
    }

    #[rstest]
    fn test_rebalance_keeps_balanced_node() {
        let mut arena = NodeArena::new();
        let root = chain(&mut arena, &[2, 1], true);
        assert_eq!(arena.rebalance(root), root);
        assert_eq!(arena[root].height, 2);
    }

    #[rstest]
    fn test_rotate_without_child_is_noop() {
        let mut arena: NodeArena<i32, ()> = NodeArena::new();
        let leaf = arena.insert(Node::new_leaf(1, (), None, 0));
        assert_eq!(arena.rotate_left(leaf), leaf);
        assert_eq!(arena.rotate_right(leaf), leaf);
    }

    #[rstest]
    fn test_rotate_left_right_chain() {
        let mut arena = NodeArena::new();
        let root = chain(&mut arena, &[1, 2, 3], false);
        let new_root = arena.rebalance(root);
        assert_eq!(arena[new_root].key, 2);
        assert_eq!(arena[new_root].parent, None);
    }
}
