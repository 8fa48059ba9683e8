//! Key ordering for [`AvlMap`](crate::AvlMap).
//!
//! The map never calls `Ord` directly. It asks a [`Comparator`] whether one
//! key is strictly less than another, and derives equivalence as
//! `!less(a, b) && !less(b, a)`. Any strict weak ordering works.
//!
//! # Examples
//!
//! ```rust
//! use avl_map::{AvlMap, ReverseOrder};
//!
//! let mut map = AvlMap::with_comparator(ReverseOrder);
//! map.insert(1, "one");
//! map.insert(3, "three");
//! map.insert(2, "two");
//!
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&3, &2, &1]);
//! ```

use std::fmt;

/// A strict weak ordering over `Q`.
pub trait Comparator<Q: ?Sized> {
    /// Returns `true` if `left` is ordered strictly before `right`.
    fn less(&self, left: &Q, right: &Q) -> bool;

    /// Returns `true` if neither key is ordered before the other.
    #[inline]
    fn equivalent(&self, left: &Q, right: &Q) -> bool {
        !self.less(left, right) && !self.less(right, left)
    }
}

/// Ascending order through [`Ord`]. This is the default comparator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<Q: Ord + ?Sized> Comparator<Q> for NaturalOrder {
    #[inline]
    fn less(&self, left: &Q, right: &Q) -> bool {
        left < right
    }
}

/// Descending order through [`Ord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder;

impl<Q: Ord + ?Sized> Comparator<Q> for ReverseOrder {
    #[inline]
    fn less(&self, left: &Q, right: &Q) -> bool {
        right < left
    }
}

/// Adapts a `less`-style closure into a [`Comparator`].
///
/// # Examples
///
/// ```rust
/// use avl_map::{AvlMap, FnOrder};
///
/// // Case-insensitive keys
/// let mut map = AvlMap::with_comparator(FnOrder::new(|left: &String, right: &String| {
///     left.to_lowercase() < right.to_lowercase()
/// }));
/// map.insert("Apple".to_string(), 1);
/// let (_, inserted) = map.insert("APPLE".to_string(), 2);
/// assert!(!inserted);
/// assert_eq!(map.len(), 1);
/// ```
#[derive(Clone, Copy)]
pub struct FnOrder<F> {
    less: F,
}

impl<F> FnOrder<F> {
    /// Wraps `less`, which must describe a strict weak ordering.
    pub const fn new(less: F) -> Self {
        Self { less }
    }
}

impl<Q: ?Sized, F> Comparator<Q> for FnOrder<F>
where
    F: Fn(&Q, &Q) -> bool,
{
    #[inline]
    fn less(&self, left: &Q, right: &Q) -> bool {
        (self.less)(left, right)
    }
}

impl<F> fmt::Debug for FnOrder<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("FnOrder").finish_non_exhaustive()
    }
}
