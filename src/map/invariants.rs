//! Structural invariant checks.
//!
//! [`AvlMap::validate`] walks the whole tree and reports the first broken
//! invariant. It is O(N) and meant for tests and debugging.

use std::fmt;

use super::AvlMap;
use super::node::NodeIndex;
use crate::compare::Comparator;

/// A broken structural invariant, as reported by [`AvlMap::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvariantViolation {
    /// The root node has a parent link.
    RootHasParent,
    /// A child's parent link does not point back at its parent.
    ParentLinkMismatch,
    /// A cached height differs from `1 + max(child heights)`.
    HeightMismatch,
    /// Subtree heights at a node differ by more than one.
    Unbalanced,
    /// In-order keys are not strictly increasing under the comparator.
    OrderViolation,
    /// The stored length differs from the number of reachable nodes.
    LengthMismatch,
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Self::RootHasParent => "root node has a parent",
            Self::ParentLinkMismatch => "child does not link back to its parent",
            Self::HeightMismatch => "cached height is out of date",
            Self::Unbalanced => "subtree heights differ by more than one",
            Self::OrderViolation => "keys are not in strictly increasing order",
            Self::LengthMismatch => "length does not match the number of nodes",
        };
        formatter.write_str(description)
    }
}

impl std::error::Error for InvariantViolation {}

impl<K, V, C: Comparator<K>> AvlMap<K, V, C> {
    /// Checks every structural invariant of the tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avl_map::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// for key in (0..100).rev() {
    ///     map.insert(key, ());
    /// }
    /// assert_eq!(map.validate(), Ok(()));
    /// ```
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        if let Some(root) = self.root
            && self.nodes[root].parent.is_some()
        {
            return Err(InvariantViolation::RootHasParent);
        }
        let (_, reachable) = self.check_subtree(self.root)?;
        if reachable != self.length || self.nodes.len() != self.length {
            return Err(InvariantViolation::LengthMismatch);
        }

        let mut keys = self.keys();
        if let Some(mut previous) = keys.next() {
            for key in keys {
                if !self.comparator.less(previous, key) {
                    return Err(InvariantViolation::OrderViolation);
                }
                previous = key;
            }
        }
        Ok(())
    }

    /// Returns `(height, node count)` of a verified subtree.
    fn check_subtree(&self, index: Option<NodeIndex>) -> Result<(i32, usize), InvariantViolation> {
        let Some(index) = index else {
            return Ok((0, 0));
        };
        let node = &self.nodes[index];
        for child in [node.left, node.right].into_iter().flatten() {
            if self.nodes[child].parent != Some(index) {
                return Err(InvariantViolation::ParentLinkMismatch);
            }
        }

        let (left_height, left_count) = self.check_subtree(node.left)?;
        let (right_height, right_count) = self.check_subtree(node.right)?;
        if node.height != 1 + left_height.max(right_height) {
            return Err(InvariantViolation::HeightMismatch);
        }
        if (left_height - right_height).abs() > 1 {
            return Err(InvariantViolation::Unbalanced);
        }
        Ok((node.height, left_count + right_count + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> AvlMap<i32, ()> {
        (0..15).map(|key| (key, ())).collect()
    }

    #[rstest]
    fn test_valid_tree_passes() {
        assert_eq!(sample().validate(), Ok(()));
        assert_eq!(AvlMap::<i32, ()>::new().validate(), Ok(()));
    }

    #[rstest]
    fn test_detects_stale_height() {
        let mut map = sample();
        let root = map.root.unwrap();
        map.nodes[root].height += 1;
        assert_eq!(map.validate(), Err(InvariantViolation::HeightMismatch));
    }

    #[rstest]
    fn test_detects_broken_parent_link() {
        let mut map = sample();
        let root = map.root.unwrap();
        let left = map.nodes[root].left.unwrap();
        map.nodes[left].parent = None;
        assert_eq!(map.validate(), Err(InvariantViolation::ParentLinkMismatch));
    }

    #[rstest]
    fn test_detects_length_mismatch() {
        let mut map = sample();
        map.length += 1;
        assert_eq!(map.validate(), Err(InvariantViolation::LengthMismatch));
    }

    #[rstest]
    fn test_detects_order_violation() {
        let mut map = sample();
        let root = map.root.unwrap();
        let left = map.nodes[root].left.unwrap();
        map.nodes.swap_entries(root, left);
        assert_eq!(map.validate(), Err(InvariantViolation::OrderViolation));
    }

    #[rstest]
    fn test_violation_display() {
        assert_eq!(
            InvariantViolation::Unbalanced.to_string(),
            "subtree heights differ by more than one"
        );
    }
}
