//! Unique identifier for [`AvlMap`](crate::AvlMap) instances.

use std::sync::atomic::{AtomicU64, Ordering};

/// Global counter for unique map IDs.
static UNIQUE_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Identity of one map instance, carried by every position it hands out.
///
/// Generated from a global atomic counter, so two live maps never share an
/// ID. A clone receives a fresh ID; `clone_from` keeps the destination's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct MapId(u64);

impl MapId {
    /// Allocate the next unique ID from the global counter.
    pub(crate) fn next() -> Self {
        Self(UNIQUE_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for MapId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<MapId> for u64 {
    fn from(id: MapId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_ids_are_distinct() {
        let first = MapId::next();
        let second = MapId::next();
        assert_ne!(first, second);
        assert!(u64::from(second) > u64::from(first));
    }
}
