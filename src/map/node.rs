//! Arena storage for tree nodes.
//!
//! Every node of a map lives in one [`NodeArena`]. Child links express
//! ownership (a node belongs to its parent, the root belongs to the map);
//! parent links are plain indices used for traversal only and never decide
//! when a node is freed.

use std::ops::{Index, IndexMut};

use slab::Slab;

/// Index into the node arena.
///
/// A lightweight handle that stays valid across mutations to other slots.
/// Once the node is removed the slot may be reused, which is why positions
/// pair an index with the node's creation stamp (see [`NodeHandle`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub(crate) struct NodeIndex(usize);

impl NodeIndex {
    /// Return the raw slab key.
    pub(crate) const fn key(self) -> usize {
        self.0
    }
}

/// A node index together with the stamp of the node it was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeHandle {
    pub(crate) index: NodeIndex,
    pub(crate) stamp: u64,
}

/// One key/value pair plus its tree linkage.
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Option<NodeIndex>,
    pub(crate) right: Option<NodeIndex>,
    pub(crate) parent: Option<NodeIndex>,
    /// Height of the subtree rooted here; a leaf has height 1.
    pub(crate) height: i32,
    /// Creation stamp, unique within the owning map.
    pub(crate) stamp: u64,
}

impl<K, V> Node<K, V> {
    /// Creates a leaf node attached to `parent`.
    pub(crate) const fn new_leaf(key: K, value: V, parent: Option<NodeIndex>, stamp: u64) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            parent,
            height: 1,
            stamp,
        }
    }
}

/// Arena storage for [`Node`]s.
///
/// A newtype around [`Slab`] providing type-safe indexing via [`NodeIndex`].
#[derive(Debug)]
pub(crate) struct NodeArena<K, V> {
    nodes: Slab<Node<K, V>>,
}

impl<K, V> NodeArena<K, V> {
    /// Create a new empty arena.
    pub(crate) const fn new() -> Self {
        Self { nodes: Slab::new() }
    }

    /// Number of nodes currently stored.
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Insert a node, returning its index.
    pub(crate) fn insert(&mut self, node: Node<K, V>) -> NodeIndex {
        NodeIndex(self.nodes.insert(node))
    }

    /// Remove a node, returning it.
    ///
    /// # Panics
    ///
    /// Panics if the slot is vacant.
    pub(crate) fn remove(&mut self, index: NodeIndex) -> Node<K, V> {
        self.nodes.remove(index.0)
    }

    /// Get a node if the slot is occupied.
    pub(crate) fn get(&self, index: NodeIndex) -> Option<&Node<K, V>> {
        self.nodes.get(index.0)
    }

    /// Resolve a handle, rejecting vacant slots and reused slots.
    pub(crate) fn resolve(&self, handle: NodeHandle) -> Option<NodeIndex> {
        self.get(handle.index)
            .filter(|node| node.stamp == handle.stamp)
            .map(|_| handle.index)
    }

    /// Build the handle for a live node.
    pub(crate) fn handle(&self, index: NodeIndex) -> NodeHandle {
        NodeHandle {
            index,
            stamp: self[index].stamp,
        }
    }

    /// Iterate over all nodes mutably, in slot order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (NodeIndex, &mut Node<K, V>)> {
        self.nodes
            .iter_mut()
            .map(|(key, node)| (NodeIndex(key), node))
    }

    /// Height of an optional subtree; an empty subtree has height 0.
    pub(crate) fn height(&self, index: Option<NodeIndex>) -> i32 {
        index.map_or(0, |index| self[index].height)
    }

    /// Point the children of `index` back at it.
    pub(crate) fn fix_child_links(&mut self, index: NodeIndex) {
        if let Some(left) = self[index].left {
            self[left].parent = Some(index);
        }
        if let Some(right) = self[index].right {
            self[right].parent = Some(index);
        }
    }

    /// Exchange the key/value pairs of two nodes, leaving linkage untouched.
    pub(crate) fn swap_entries(&mut self, first: NodeIndex, second: NodeIndex) {
        if first == second {
            return;
        }
        if let Some((a, b)) = self.nodes.get2_mut(first.0, second.0) {
            std::mem::swap(&mut a.key, &mut b.key);
            std::mem::swap(&mut a.value, &mut b.value);
        }
    }
}

impl<K, V> Default for NodeArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Index<NodeIndex> for NodeArena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

impl<K, V> IndexMut<NodeIndex> for NodeArena<K, V> {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Self::Output {
        &mut self.nodes[index.0]
    }
}
