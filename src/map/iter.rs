//! Standard Rust iterators over an [`AvlMap`](super::AvlMap).
//!
//! [`Iter`] walks the tree through parent links, one successor (or
//! predecessor) step at a time. Handing out several `&mut V` at once cannot
//! be done through links, so [`IterMut`] and [`IntoIter`] collect the
//! entries in key order up front.

use std::iter::FusedIterator;

use super::node::{Node, NodeArena, NodeIndex};

// =============================================================================
// Borrowing Iterator
// =============================================================================

/// An iterator over the entries of an [`AvlMap`](super::AvlMap) in key order.
pub struct Iter<'a, K, V> {
    nodes: &'a NodeArena<K, V>,
    front: Option<NodeIndex>,
    back: Option<NodeIndex>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(super) fn new(nodes: &'a NodeArena<K, V>, root: Option<NodeIndex>, length: usize) -> Self {
        Self {
            nodes,
            front: root.map(|root| nodes.min_node(root)),
            back: root.map(|root| nodes.max_node(root)),
            remaining: length,
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.front?;
        self.remaining -= 1;
        self.front = self.nodes.successor(index);
        let node = &self.nodes[index];
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let index = self.back?;
        self.remaining -= 1;
        self.back = self.nodes.predecessor(index);
        let node = &self.nodes[index];
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// In-order node indices below `root`.
fn in_order<K, V>(nodes: &NodeArena<K, V>, root: Option<NodeIndex>) -> Vec<NodeIndex> {
    let mut order = Vec::with_capacity(nodes.len());
    let mut cursor = root.map(|root| nodes.min_node(root));
    while let Some(index) = cursor {
        order.push(index);
        cursor = nodes.successor(index);
    }
    order
}

// =============================================================================
// Mutable Iterator
// =============================================================================

/// An iterator over the entries of an [`AvlMap`](super::AvlMap) in key
/// order, with mutable values.
pub struct IterMut<'a, K, V> {
    entries: std::vec::IntoIter<(&'a K, &'a mut V)>,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(super) fn new(nodes: &'a mut NodeArena<K, V>, root: Option<NodeIndex>) -> Self {
        let order = in_order(nodes, root);

        let mut by_slot: Vec<Option<(&'a K, &'a mut V)>> = Vec::new();
        for (index, Node { key, value, .. }) in nodes.iter_mut() {
            let slot = index.key();
            if by_slot.len() <= slot {
                by_slot.resize_with(slot + 1, || None);
            }
            by_slot[slot] = Some((&*key, value));
        }

        let entries: Vec<(&'a K, &'a mut V)> = order
            .into_iter()
            .filter_map(|index| by_slot.get_mut(index.key()).and_then(Option::take))
            .collect();
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K, V> FusedIterator for IterMut<'_, K, V> {}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over the entries of an [`AvlMap`](super::AvlMap) in
/// key order.
pub struct IntoIter<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> IntoIter<K, V> {
    pub(super) fn new(mut nodes: NodeArena<K, V>, root: Option<NodeIndex>) -> Self {
        let entries: Vec<(K, V)> = in_order(&nodes, root)
            .into_iter()
            .map(|index| {
                let node = nodes.remove(index);
                (node.key, node.value)
            })
            .collect();
        Self {
            entries: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K, V> FusedIterator for IntoIter<K, V> {}

// =============================================================================
// Projections
// =============================================================================

/// An iterator over the keys of an [`AvlMap`](super::AvlMap) in order.
pub struct Keys<'a, K, V> {
    pub(super) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of an [`AvlMap`](super::AvlMap) in key order.
pub struct Values<'a, K, V> {
    pub(super) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// An iterator over mutable values of an [`AvlMap`](super::AvlMap) in key order.
pub struct ValuesMut<'a, K, V> {
    pub(super) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}

#[cfg(test)]
mod tests {
    use super::super::AvlMap;
    use rstest::rstest;

    fn sample() -> AvlMap<i32, i32> {
        (0..10).rev().map(|key| (key, key * key)).collect()
    }

    #[rstest]
    fn test_iter_is_sorted_and_exact() {
        let map = sample();
        let iter = map.iter();
        assert_eq!(iter.len(), 10);
        let keys: Vec<i32> = iter.map(|(key, _)| *key).collect();
        assert_eq!(keys, (0..10).collect::<Vec<_>>());
    }

    #[rstest]
    fn test_iter_meets_in_the_middle() {
        let map = sample();
        let mut iter = map.iter();
        assert_eq!(iter.next(), Some((&0, &0)));
        assert_eq!(iter.next_back(), Some((&9, &81)));
        let rest: Vec<&i32> = iter.by_ref().map(|(key, _)| key).collect();
        assert_eq!(rest.len(), 8);
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[rstest]
    fn test_iter_mut_updates_in_order() {
        let mut map = sample();
        let mut visited = Vec::new();
        for (key, value) in &mut map {
            visited.push(*key);
            *value = -*value;
        }
        assert_eq!(visited, (0..10).collect::<Vec<_>>());
        assert_eq!(map.at(&3), Ok(&-9));
    }

    #[rstest]
    fn test_iter_mut_after_erase_skips_vacant_slots() {
        let mut map = sample();
        map.remove(&2);
        map.remove(&7);
        for value in map.values_mut() {
            *value += 1;
        }
        let values: Vec<i32> = map.values().copied().collect();
        assert_eq!(values, vec![1, 2, 10, 17, 26, 37, 65, 82]);
    }

    #[rstest]
    fn test_into_iter_owns_entries_in_order() {
        let map: AvlMap<String, usize> = ["pear", "apple", "fig"]
            .into_iter()
            .map(|name| (name.to_string(), name.len()))
            .collect();
        let entries: Vec<(String, usize)> = map.into_iter().collect();
        assert_eq!(
            entries,
            vec![
                ("apple".to_string(), 5),
                ("fig".to_string(), 3),
                ("pear".to_string(), 4)
            ]
        );
    }

    #[rstest]
    fn test_keys_rev() {
        let map = sample();
        let keys: Vec<&i32> = map.keys().rev().take(3).collect();
        assert_eq!(keys, vec![&9, &8, &7]);
    }
}
