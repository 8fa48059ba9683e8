//! # avl-map
//!
//! An ordered map backed by a height-balanced (AVL) binary search tree.
//!
//! ## Overview
//!
//! [`AvlMap`] keeps its keys sorted under a pluggable [`Comparator`] and
//! guarantees O(log N) worst-case lookup, insertion and removal. Nodes carry
//! parent links, so in-order stepping needs no auxiliary stack.
//!
//! Besides the usual borrowing iterators, the map hands out *positions*
//! ([`Position`], [`ConstPosition`]): `Copy` handles naming one element.
//! They do not borrow the map, survive unrelated inserts and erases, and are
//! checked on every use, so a position from another map or one whose node
//! was freed is rejected with a [`MapError`] instead of reading garbage.
//!
//! - **Lookup**: `at`, `find`, `count`, `get`, indexing
//! - **Mutation**: `insert`, `insert_or_assign`, `get_or_insert_default`,
//!   `erase`, `remove`, `clear`
//! - **Traversal**: `begin`/`end`, `cbegin`/`cend`, `iter`, `iter_mut`,
//!   `keys`, `values`
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for [`AvlMap`] as a map
//!
//! ## Example
//!
//! ```rust
//! use avl_map::prelude::*;
//!
//! let mut map = AvlMap::new();
//! for key in [5, 3, 8, 1, 4, 7, 9] {
//!     map.insert(key, key.to_string());
//! }
//!
//! let mut position = map.begin();
//! assert_eq!(position.get(&map), Ok((&1, &"1".to_string())));
//! position.move_next(&map).unwrap();
//! assert_eq!(position.get(&map).map(|(key, _)| *key), Ok(3));
//!
//! assert!(map.end().move_next(&map).is_err());
//! assert!(map.begin().move_prev(&map).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```rust
/// use avl_map::prelude::*;
/// ```
pub mod prelude {
    pub use crate::compare::*;
    pub use crate::error::*;
    pub use crate::map::{AvlMap, ConstPosition, Position};
}

pub mod compare;
pub mod error;
pub mod map;
mod unique_id;

pub use compare::{Comparator, FnOrder, NaturalOrder, ReverseOrder};
pub use error::{InvalidIteratorKind, MapError};
pub use map::{AvlMap, ConstPosition, InvariantViolation, Position};
pub use unique_id::MapId;
