//! Positions: iterator handles that outlive borrows of the map.
//!
//! A position pairs a node handle (or past-the-end) with the identity of
//! the map that produced it. It holds no borrow, so it can be kept across
//! inserts and erases and handed back to the map later. Every operation
//! takes the map explicitly and validates ownership first.
//!
//! [`Position`] can read and write the value it names; [`ConstPosition`]
//! can only read. A `Position` widens into a `ConstPosition`, never the
//! other way around.
//!
//! # Examples
//!
//! ```rust
//! use avl_map::{AvlMap, ConstPosition, MapError};
//!
//! let mut map = AvlMap::new();
//! for key in [2, 1, 3] {
//!     map.insert(key, key * 100);
//! }
//!
//! let mut position = map.begin();
//! while !position.is_end() {
//!     let (_, value) = position.get_mut(&mut map)?;
//!     *value += 1;
//!     position.move_next(&map)?;
//! }
//!
//! let mut last: ConstPosition = map.end().into();
//! last.move_prev(&map)?;
//! assert_eq!(last.get(&map)?, (&3, &301));
//! # Ok::<(), MapError>(())
//! ```

use super::AvlMap;
use super::node::NodeHandle;
use crate::error::MapError;
use crate::unique_id::MapId;

/// Owner plus node, shared by both position flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RawPosition {
    pub(crate) owner: MapId,
    pub(crate) node: Option<NodeHandle>,
}

/// A read-write position in an [`AvlMap`].
///
/// Obtained from [`AvlMap::begin`], [`AvlMap::end`], [`AvlMap::find`] and
/// [`AvlMap::insert`]. Two positions are equal when they come from the same
/// map and name the same node (or are both past-the-end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    raw: RawPosition,
}

/// A read-only position in an [`AvlMap`].
///
/// Obtained from [`AvlMap::cbegin`], [`AvlMap::cend`], [`AvlMap::cfind`],
/// or by widening a [`Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstPosition {
    raw: RawPosition,
}

/// Stepping and reading, identical for both flavours.
macro_rules! position_protocol {
    ($position:ident) => {
        impl $position {
            pub(crate) const fn from_raw(raw: RawPosition) -> Self {
                Self { raw }
            }

            pub(crate) const fn raw(self) -> RawPosition {
                self.raw
            }

            /// Returns `true` for the past-the-end position.
            #[inline]
            #[must_use]
            pub const fn is_end(&self) -> bool {
                self.raw.node.is_none()
            }

            /// Identity of the map that produced this position.
            #[inline]
            #[must_use]
            pub const fn owner(&self) -> MapId {
                self.raw.owner
            }

            /// Moves to the next element in key order, or past-the-end
            /// after the last one.
            ///
            /// # Errors
            ///
            /// Fails with [`MapError::InvalidIterator`] when the position is
            /// already past-the-end, belongs to another map, or is stale.
            /// The position is unchanged on failure.
            pub fn move_next<K, V, C>(&mut self, map: &AvlMap<K, V, C>) -> Result<(), MapError> {
                self.raw = map.step_forward(self.raw)?;
                Ok(())
            }

            /// Moves to the previous element in key order. Past-the-end
            /// moves to the last element.
            ///
            /// # Errors
            ///
            /// Fails with [`MapError::InvalidIterator`] at the first element,
            /// past-the-end of an empty map, for a foreign position, or for
            /// a stale one. The position is unchanged on failure.
            pub fn move_prev<K, V, C>(&mut self, map: &AvlMap<K, V, C>) -> Result<(), MapError> {
                self.raw = map.step_backward(self.raw)?;
                Ok(())
            }

            /// Returns the following position, leaving `self` untouched.
            ///
            /// # Errors
            ///
            /// Same conditions as [`move_next`](Self::move_next).
            pub fn following<K, V, C>(self, map: &AvlMap<K, V, C>) -> Result<Self, MapError> {
                map.step_forward(self.raw).map(Self::from_raw)
            }

            /// Returns the preceding position, leaving `self` untouched.
            ///
            /// # Errors
            ///
            /// Same conditions as [`move_prev`](Self::move_prev).
            pub fn preceding<K, V, C>(self, map: &AvlMap<K, V, C>) -> Result<Self, MapError> {
                map.step_backward(self.raw).map(Self::from_raw)
            }

            /// Reads the entry at this position.
            ///
            /// # Errors
            ///
            /// Fails with [`MapError::InvalidIterator`] when the position is
            /// past-the-end, foreign, or stale.
            pub fn get<'a, K, V, C>(
                &self,
                map: &'a AvlMap<K, V, C>,
            ) -> Result<(&'a K, &'a V), MapError> {
                let index = map.resolve(self.raw)?;
                let node = &map.nodes[index];
                Ok((&node.key, &node.value))
            }

            /// Like [`get`](Self::get), but `None` instead of an error.
            pub fn try_get<'a, K, V, C>(&self, map: &'a AvlMap<K, V, C>) -> Option<(&'a K, &'a V)> {
                self.get(map).ok()
            }
        }
    };
}

position_protocol!(Position);
position_protocol!(ConstPosition);

impl Position {
    /// Reads the entry at this position with a mutable value.
    ///
    /// The key stays read-only: changing it could break the ordering.
    ///
    /// # Errors
    ///
    /// Fails with [`MapError::InvalidIterator`] when the position is
    /// past-the-end, foreign, or stale.
    pub fn get_mut<'a, K, V, C>(
        &self,
        map: &'a mut AvlMap<K, V, C>,
    ) -> Result<(&'a K, &'a mut V), MapError> {
        let index = map.resolve(self.raw)?;
        let node = &mut map.nodes[index];
        Ok((&node.key, &mut node.value))
    }
}

impl From<Position> for ConstPosition {
    fn from(position: Position) -> Self {
        Self::from_raw(position.raw)
    }
}

impl PartialEq<ConstPosition> for Position {
    fn eq(&self, other: &ConstPosition) -> bool {
        self.raw == other.raw()
    }
}

impl PartialEq<Position> for ConstPosition {
    fn eq(&self, other: &Position) -> bool {
        self.raw == other.raw
    }
}

static_assertions::assert_impl_all!(Position: Copy, Send, Sync, Into<ConstPosition>);
static_assertions::assert_impl_all!(ConstPosition: Copy, Send, Sync, From<Position>);
static_assertions::assert_not_impl_any!(Position: From<ConstPosition>);
