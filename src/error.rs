//! Error types for [`AvlMap`](crate::AvlMap).
//!
//! Two kinds of failure exist: a key lookup that finds nothing, and a
//! position (iterator) that cannot be used for the requested operation.
//! Every check happens before the map is mutated, so an error never leaves
//! the map in a partially updated state.

use std::fmt;

/// The reason a position was rejected.
///
/// # Examples
///
/// ```rust
/// use avl_map::{AvlMap, InvalidIteratorKind, MapError};
///
/// let map: AvlMap<i32, i32> = AvlMap::new();
/// let mut end = map.end();
/// assert_eq!(
///     end.move_next(&map),
///     Err(MapError::InvalidIterator(InvalidIteratorKind::IncrementPastEnd))
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidIteratorKind {
    /// Stepping forward from the past-the-end position.
    IncrementPastEnd,
    /// Stepping backward from the first element.
    DecrementBeforeBegin,
    /// Stepping backward from past-the-end on an empty map.
    DecrementOnEmpty,
    /// Reading through the past-the-end position.
    DereferencePastEnd,
    /// The position was produced by a different map.
    ForeignPosition,
    /// The node the position referred to has been freed.
    StalePosition,
    /// Erasing through the past-the-end position.
    ErasePastEnd,
}

impl fmt::Display for InvalidIteratorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            Self::IncrementPastEnd => "cannot increment a past-the-end position",
            Self::DecrementBeforeBegin => "cannot decrement the first position",
            Self::DecrementOnEmpty => "cannot decrement past-the-end of an empty map",
            Self::DereferencePastEnd => "cannot dereference a past-the-end position",
            Self::ForeignPosition => "position belongs to a different map",
            Self::StalePosition => "position refers to an erased node",
            Self::ErasePastEnd => "cannot erase a past-the-end position",
        };
        formatter.write_str(description)
    }
}

/// Errors raised by [`AvlMap`](crate::AvlMap) and its positions.
///
/// # Examples
///
/// ```rust
/// use avl_map::{AvlMap, MapError};
///
/// let map: AvlMap<String, i32> = AvlMap::new();
/// assert_eq!(map.at("missing-key"), Err(MapError::KeyNotFound));
/// assert_eq!(format!("{}", MapError::KeyNotFound), "key not found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MapError {
    /// No element with an equivalent key exists.
    KeyNotFound,
    /// A position could not be stepped, dereferenced or erased.
    InvalidIterator(InvalidIteratorKind),
}

impl MapError {
    /// Returns `true` for [`MapError::InvalidIterator`] of any kind.
    #[must_use]
    pub const fn is_invalid_iterator(&self) -> bool {
        matches!(self, Self::InvalidIterator(_))
    }
}

impl From<InvalidIteratorKind> for MapError {
    fn from(kind: InvalidIteratorKind) -> Self {
        Self::InvalidIterator(kind)
    }
}

impl fmt::Display for MapError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound => formatter.write_str("key not found"),
            Self::InvalidIterator(kind) => write!(formatter, "invalid iterator: {kind}"),
        }
    }
}

impl std::error::Error for MapError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_key_not_found_display() {
        assert_eq!(format!("{}", MapError::KeyNotFound), "key not found");
    }

    #[rstest]
    #[case(InvalidIteratorKind::IncrementPastEnd, "cannot increment a past-the-end position")]
    #[case(InvalidIteratorKind::DecrementBeforeBegin, "cannot decrement the first position")]
    #[case(InvalidIteratorKind::ForeignPosition, "position belongs to a different map")]
    #[case(InvalidIteratorKind::StalePosition, "position refers to an erased node")]
    fn test_invalid_iterator_display(#[case] kind: InvalidIteratorKind, #[case] expected: &str) {
        let error = MapError::from(kind);
        assert_eq!(format!("{error}"), format!("invalid iterator: {expected}"));
        assert!(error.is_invalid_iterator());
    }

    #[rstest]
    fn test_map_error_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&MapError::KeyNotFound);
        assert!(!MapError::KeyNotFound.is_invalid_iterator());
    }
}
