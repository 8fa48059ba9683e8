//! Deep copy and teardown.
//!
//! Copies never share nodes: every node of the source is duplicated
//! pre-order with its cached height, so the copy has the same shape
//! without rebalancing. Teardown frees nodes post-order, each exactly once.

use tracing::debug;

use super::AvlMap;
use super::node::{Node, NodeArena, NodeIndex};
use crate::unique_id::MapId;

impl<K, V, C> AvlMap<K, V, C> {
    /// Free every node of the subtree rooted at `index`.
    pub(super) fn destroy_subtree(&mut self, index: Option<NodeIndex>) {
        let Some(index) = index else {
            return;
        };
        self.destroy_subtree(self.nodes[index].left);
        self.destroy_subtree(self.nodes[index].right);
        self.nodes.remove(index);
    }
}

impl<K: Clone, V: Clone, C> AvlMap<K, V, C> {
    /// Copy the subtree rooted at `index` of `source` into `self.nodes`,
    /// hanging it under `parent`.
    fn clone_subtree(
        &mut self,
        source: &NodeArena<K, V>,
        index: Option<NodeIndex>,
        parent: Option<NodeIndex>,
    ) -> Option<NodeIndex> {
        let original = &source[index?];
        let stamp = self.allocate_stamp();
        let mut node = Node::new_leaf(original.key.clone(), original.value.clone(), parent, stamp);
        node.height = original.height;
        let copy = self.nodes.insert(node);

        let left = self.clone_subtree(source, original.left, Some(copy));
        let right = self.clone_subtree(source, original.right, Some(copy));
        self.nodes[copy].left = left;
        self.nodes[copy].right = right;
        Some(copy)
    }
}

impl<K: Clone, V: Clone, C: Clone> Clone for AvlMap<K, V, C> {
    /// Deep copy with a fresh identity: positions of `self` are foreign to
    /// the copy.
    fn clone(&self) -> Self {
        let mut copy = Self {
            nodes: NodeArena::new(),
            root: None,
            length: self.length,
            comparator: self.comparator.clone(),
            id: MapId::next(),
            next_stamp: 0,
        };
        copy.root = copy.clone_subtree(&self.nodes, self.root, None);
        copy
    }

    /// Replace the contents of `self` with a deep copy of `source`.
    ///
    /// `self` keeps its identity, but all of its previous positions become
    /// stale.
    fn clone_from(&mut self, source: &Self) {
        debug!(map = %self.id, source = %source.id, length = source.length, "copy-assigning map");
        self.destroy_subtree(self.root);
        self.comparator = source.comparator.clone();
        self.root = self.clone_subtree(&source.nodes, source.root, None);
        self.length = source.length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{InvalidIteratorKind, MapError};
    use rstest::rstest;

    fn sample() -> AvlMap<i32, String> {
        (1..=20).map(|key| (key, format!("v{key}"))).collect()
    }

    #[rstest]
    fn test_clone_is_independent() {
        let original = sample();
        let mut copy = original.clone();
        copy.insert(100, "extra".to_string());
        copy.remove(&1);
        *copy.get_mut(&2).unwrap() = "changed".to_string();

        assert_eq!(original.len(), 20);
        assert_eq!(original.keys().copied().collect::<Vec<_>>(), (1..=20).collect::<Vec<_>>());
        assert_eq!(original[&2], "v2");
        assert_eq!(copy.len(), 20);
        assert_eq!(copy.validate(), Ok(()));
    }

    #[rstest]
    fn test_clone_preserves_shape() {
        let original = sample();
        let copy = original.clone();
        assert_eq!(copy.height(), original.height());
        let root_key = |map: &AvlMap<i32, String>| map.root.map(|root| map.nodes[root].key);
        assert_eq!(root_key(&copy), root_key(&original));
        assert_ne!(copy.id(), original.id());
    }

    #[rstest]
    fn test_clone_from_keeps_identity_and_stales_positions() {
        let mut target: AvlMap<i32, String> = AvlMap::new();
        target.insert(0, "zero".to_string());
        let old_position = target.find(&0);
        let identity = target.id();

        target.clone_from(&sample());

        assert_eq!(target.id(), identity);
        assert_eq!(target.len(), 20);
        assert_eq!(target.count(&0), 0);
        assert_eq!(
            old_position.get(&target),
            Err(MapError::InvalidIterator(InvalidIteratorKind::StalePosition))
        );
        assert_eq!(target.validate(), Ok(()));
    }

    #[rstest]
    fn test_destroy_frees_every_node() {
        let mut map = sample();
        map.clear();
        assert_eq!(map.nodes.len(), 0);
    }

    #[rstest]
    fn test_clone_of_empty() {
        let map: AvlMap<i32, i32> = AvlMap::new();
        let copy = map.clone();
        assert!(copy.is_empty());
        assert_eq!(copy.begin(), copy.end());
    }
}
