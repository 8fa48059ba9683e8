//! Ordered map based on a height-balanced (AVL) binary search tree.
//!
//! This module provides [`AvlMap`], a mutable ordered map whose nodes keep
//! a link to their parent. Positions ([`Position`], [`ConstPosition`]) are
//! small `Copy` handles that name a node, so they stay usable while the map
//! is mutated, the way iterators of a node-based map do.
//!
//! # Overview
//!
//! - O(log N) `find`, `insert`, `erase`
//! - O(log N) single step forward/backward, O(1) amortized over a full walk
//! - O(1) `len` and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use avl_map::AvlMap;
//!
//! let mut map = AvlMap::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     map.insert(key, key * 10);
//! }
//!
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &3, &4, &5, &7, &8, &9]);
//!
//! let position = map.find(&5);
//! let (key, value) = map.erase(position).unwrap();
//! assert_eq!((key, value), (5, 50));
//! assert!(map.find(&5).is_end());
//! ```
//!
//! # Internal Structure
//!
//! For every node the heights of its two subtrees differ by at most one,
//! which bounds the tree height by roughly `1.44 * log2(N)`. Nodes live in
//! an arena; child links own, parent links only navigate.

mod balance;
mod invariants;
mod iter;
mod lifecycle;
mod mutate;
mod node;
mod position;
mod search;

#[cfg(feature = "serde")]
mod serialization;

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Index;

use tracing::debug;

use crate::compare::{Comparator, NaturalOrder};
use crate::error::{InvalidIteratorKind, MapError};
use crate::unique_id::MapId;

use node::{NodeArena, NodeIndex};
use position::RawPosition;

pub use invariants::InvariantViolation;
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
pub use position::{ConstPosition, Position};

// =============================================================================
// AvlMap Definition
// =============================================================================

/// An ordered map backed by an AVL tree.
///
/// Keys are ordered by the comparator `C` (ascending [`Ord`] by default).
/// Each key appears at most once; inserting an equivalent key leaves the
/// map unchanged and reports the element already present.
///
/// # Time Complexity
///
/// | Operation        | Complexity |
/// |------------------|------------|
/// | `new`            | O(1)       |
/// | `find`/`at`      | O(log N)   |
/// | `insert`         | O(log N)   |
/// | `erase`          | O(log N)   |
/// | `begin`          | O(log N)   |
/// | `len`/`is_empty` | O(1)       |
/// | `clone`          | O(N)       |
///
/// # Examples
///
/// ```rust
/// use avl_map::AvlMap;
///
/// let mut map = AvlMap::new();
/// let (position, inserted) = map.insert("apple", 3);
/// assert!(inserted);
/// assert_eq!(position.get(&map), Ok((&"apple", &3)));
///
/// *map.get_or_insert_default("pear") += 2;
/// assert_eq!(map.at(&"pear"), Ok(&2));
/// ```
pub struct AvlMap<K, V, C = NaturalOrder> {
    nodes: NodeArena<K, V>,
    root: Option<NodeIndex>,
    length: usize,
    comparator: C,
    id: MapId,
    /// Stamp handed to the next node created in this map.
    next_stamp: u64,
}

impl<K, V> AvlMap<K, V> {
    /// Creates an empty map ordered by [`Ord`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avl_map::AvlMap;
    ///
    /// let map: AvlMap<i32, String> = AvlMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }
}

impl<K, V, C> AvlMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
            length: 0,
            comparator,
            id: MapId::next(),
            next_stamp: 0,
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map holds no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the comparator ordering this map.
    #[inline]
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Returns the identity carried by every position of this map.
    #[inline]
    pub const fn id(&self) -> MapId {
        self.id
    }

    /// Returns the height of the tree; 0 for an empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avl_map::AvlMap;
    ///
    /// let map: AvlMap<i32, ()> = (0..1000).map(|key| (key, ())).collect();
    /// assert!(map.height() <= 14);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        usize::try_from(self.nodes.height(self.root)).unwrap_or(0)
    }

    /// Position of the first element, or [`end`](Self::end) when empty.
    #[must_use]
    pub fn begin(&self) -> Position {
        Position::from_raw(self.raw_first())
    }

    /// The past-the-end position.
    #[must_use]
    pub const fn end(&self) -> Position {
        Position::from_raw(self.raw_end())
    }

    /// Read-only position of the first element.
    #[must_use]
    pub fn cbegin(&self) -> ConstPosition {
        ConstPosition::from_raw(self.raw_first())
    }

    /// Read-only past-the-end position.
    #[must_use]
    pub const fn cend(&self) -> ConstPosition {
        ConstPosition::from_raw(self.raw_end())
    }

    /// Returns the first key-value pair in order.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let node = &self.nodes[self.nodes.min_node(self.root?)];
        Some((&node.key, &node.value))
    }

    /// Returns the last key-value pair in order.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let node = &self.nodes[self.nodes.max_node(self.root?)];
        Some((&node.key, &node.value))
    }

    /// Removes every element.
    ///
    /// Positions taken before the call become stale.
    pub fn clear(&mut self) {
        debug!(map = %self.id, length = self.length, "clearing map");
        self.destroy_subtree(self.root);
        self.root = None;
        self.length = 0;
    }

    pub(crate) const fn raw_end(&self) -> RawPosition {
        RawPosition {
            owner: self.id,
            node: None,
        }
    }

    fn raw_first(&self) -> RawPosition {
        self.raw_at(self.root.map(|root| self.nodes.min_node(root)))
    }

    pub(crate) fn raw_at(&self, index: Option<NodeIndex>) -> RawPosition {
        RawPosition {
            owner: self.id,
            node: index.map(|index| self.nodes.handle(index)),
        }
    }

    /// Resolve a position to a live node of this map.
    pub(crate) fn resolve(&self, raw: RawPosition) -> Result<NodeIndex, MapError> {
        if raw.owner != self.id {
            return Err(InvalidIteratorKind::ForeignPosition.into());
        }
        let handle = raw.node.ok_or(InvalidIteratorKind::DereferencePastEnd)?;
        self.nodes
            .resolve(handle)
            .ok_or_else(|| InvalidIteratorKind::StalePosition.into())
    }

    /// One step forward in key order.
    pub(crate) fn step_forward(&self, raw: RawPosition) -> Result<RawPosition, MapError> {
        if raw.owner != self.id {
            return Err(InvalidIteratorKind::ForeignPosition.into());
        }
        let handle = raw.node.ok_or(InvalidIteratorKind::IncrementPastEnd)?;
        let index = self
            .nodes
            .resolve(handle)
            .ok_or(InvalidIteratorKind::StalePosition)?;
        Ok(self.raw_at(self.nodes.successor(index)))
    }

    /// One step backward in key order; past-the-end moves to the last element.
    pub(crate) fn step_backward(&self, raw: RawPosition) -> Result<RawPosition, MapError> {
        if raw.owner != self.id {
            return Err(InvalidIteratorKind::ForeignPosition.into());
        }
        let Some(handle) = raw.node else {
            let root = self.root.ok_or(InvalidIteratorKind::DecrementOnEmpty)?;
            return Ok(self.raw_at(Some(self.nodes.max_node(root))));
        };
        let index = self
            .nodes
            .resolve(handle)
            .ok_or(InvalidIteratorKind::StalePosition)?;
        self.nodes
            .predecessor(index)
            .map(|previous| self.raw_at(Some(previous)))
            .ok_or_else(|| InvalidIteratorKind::DecrementBeforeBegin.into())
    }

    /// Returns an iterator over the entries in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avl_map::AvlMap;
    ///
    /// let map: AvlMap<i32, char> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();
    /// let entries: Vec<(&i32, &char)> = map.iter().rev().collect();
    /// assert_eq!(entries, vec![(&3, &'c'), (&2, &'b'), (&1, &'a')]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.nodes, self.root, self.length)
    }

    /// Returns an iterator over the entries in key order with mutable values.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.nodes, self.root)
    }

    /// Returns an iterator over the keys in order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in key order.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Returns an iterator over mutable values in key order.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }

    /// Finds the node holding a key equivalent to `key`.
    fn find_index<Q>(&self, key: &Q) -> Option<NodeIndex>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.nodes.find_node(self.root, key, &self.comparator)
    }

    /// Returns the position of `key`, or [`end`](Self::end) if absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avl_map::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, "one");
    /// assert_eq!(map.find(&1).get(&map), Ok((&1, &"one")));
    /// assert_eq!(map.find(&2), map.end());
    /// ```
    pub fn find<Q>(&self, key: &Q) -> Position
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Position::from_raw(self.raw_at(self.find_index(key)))
    }

    /// Read-only form of [`find`](Self::find).
    pub fn cfind<Q>(&self, key: &Q) -> ConstPosition
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        ConstPosition::from_raw(self.raw_at(self.find_index(key)))
    }

    /// Number of elements with a key equivalent to `key`: 0 or 1.
    pub fn count<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        usize::from(self.find_index(key).is_some())
    }

    /// Returns `true` if an element with an equivalent key exists.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.find_index(key).is_some()
    }

    /// Returns a reference to the value of `key`, if present.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.find_index(key).map(|index| &self.nodes[index].value)
    }

    /// Returns a mutable reference to the value of `key`, if present.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.find_index(key)
            .map(|index| &mut self.nodes[index].value)
    }

    /// Returns the value of `key`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if no equivalent key exists.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avl_map::{AvlMap, MapError};
    ///
    /// let mut map = AvlMap::new();
    /// map.insert("key".to_string(), 42);
    /// assert_eq!(map.at("key"), Ok(&42));
    /// assert_eq!(map.at("other"), Err(MapError::KeyNotFound));
    /// ```
    pub fn at<Q>(&self, key: &Q) -> Result<&V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.get(key).ok_or(MapError::KeyNotFound)
    }

    /// Returns the value of `key` mutably.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::KeyNotFound`] if no equivalent key exists.
    pub fn at_mut<Q>(&mut self, key: &Q) -> Result<&mut V, MapError>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.get_mut(key).ok_or(MapError::KeyNotFound)
    }
}

impl<K, V, C: Comparator<K>> AvlMap<K, V, C> {
    /// Inserts `key` with `value` unless an equivalent key is present.
    ///
    /// Returns the position of the element with that key and whether the
    /// insertion happened. On a duplicate the map is unchanged and the
    /// offered pair is dropped. No existing position is invalidated.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avl_map::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// let (first, inserted) = map.insert(1, "one");
    /// assert!(inserted);
    ///
    /// let (second, inserted) = map.insert(1, "ONE");
    /// assert!(!inserted);
    /// assert_eq!(first, second);
    /// assert_eq!(map.at(&1), Ok(&"one"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> (Position, bool) {
        let outcome = self.insert_into(self.root, None, key, value);
        self.root = Some(outcome.subtree);
        self.nodes[outcome.subtree].parent = None;
        (
            Position::from_raw(self.raw_at(Some(outcome.node))),
            outcome.inserted,
        )
    }

    /// Inserts `key` with `value`, replacing the value of an equivalent key.
    ///
    /// Returns the position of the element and `true` if it was newly
    /// inserted. When the key was present, only the value changes.
    pub fn insert_or_assign(&mut self, key: K, value: V) -> (Position, bool) {
        if let Some(index) = self.find_index(&key) {
            self.nodes[index].value = value;
            return (Position::from_raw(self.raw_at(Some(index))), false);
        }
        self.insert(key, value)
    }

    /// Returns the value of `key`, inserting `V::default()` first if absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avl_map::AvlMap;
    ///
    /// let mut counts: AvlMap<char, usize> = AvlMap::new();
    /// for letter in "abracadabra".chars() {
    ///     *counts.get_or_insert_default(letter) += 1;
    /// }
    /// assert_eq!(counts.at(&'a'), Ok(&5));
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        if let Some(index) = self.find_index(&key) {
            return &mut self.nodes[index].value;
        }
        let outcome = self.insert_into(self.root, None, key, V::default());
        self.root = Some(outcome.subtree);
        self.nodes[outcome.subtree].parent = None;
        &mut self.nodes[outcome.node].value
    }

    /// Removes the element at `position`, returning its key and value.
    ///
    /// When the element has two children, its node stays in the tree and
    /// receives the in-order successor's pair; the successor's node is the
    /// one freed. Positions naming the erased element keep naming that node
    /// (now holding the successor's entry), while positions naming the
    /// successor become stale. Every other position stays valid.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidIterator`] if `position` is past-the-end,
    /// belongs to another map, or names a node that was already freed. The
    /// map is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use avl_map::AvlMap;
    ///
    /// let mut map: AvlMap<i32, ()> = (1..=3).map(|key| (key, ())).collect();
    /// assert_eq!(map.erase(map.find(&2)), Ok((2, ())));
    /// assert_eq!(map.len(), 2);
    /// assert!(map.erase(map.end()).is_err());
    /// ```
    pub fn erase(&mut self, position: Position) -> Result<(K, V), MapError> {
        let raw = position.raw();
        if raw.owner == self.id && raw.node.is_none() {
            return Err(InvalidIteratorKind::ErasePastEnd.into());
        }
        let target = self.resolve(raw)?;

        debug!(map = %self.id, length = self.length, "erasing element");
        let mut removed = None;
        self.root = self.erase_from(self.root, None, target, &mut removed);
        if let Some(root) = self.root {
            self.nodes[root].parent = None;
        }
        removed.ok_or_else(|| InvalidIteratorKind::StalePosition.into())
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let position = self.find(key);
        if position.is_end() {
            return None;
        }
        self.erase(position).ok().map(|(_, value)| value)
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for AvlMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for AvlMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_comparator(C::default());
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for AvlMap<K, V, C> {
    /// Inserts every pair; pairs whose key is already present are dropped.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C> IntoIterator for AvlMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.nodes, self.root)
    }
}

impl<'a, K, V, C> IntoIterator for &'a AvlMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, K, V, C> IntoIterator for &'a mut AvlMap<K, V, C> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<K, V, C, Q> Index<&Q> for AvlMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
{
    type Output = V;

    /// Returns the value of `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key is absent; use [`AvlMap::at`] for a fallible lookup.
    fn index(&self, key: &Q) -> &Self::Output {
        match self.at(key) {
            Ok(value) => value,
            Err(error) => panic!("{error}"),
        }
    }
}

/// Two maps are equal when they hold equal entries in the same order.
impl<K: PartialEq, V: PartialEq, C> PartialEq for AvlMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.length == other.length && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for AvlMap<K, V, C> {}

/// Hashes the length followed by every entry in key order, consistent with
/// [`PartialEq`].
impl<K: Hash, V: Hash, C> Hash for AvlMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for AvlMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for AvlMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Tests
// =============================================================================
