//! Property-based tests for AvlMap.
//!
//! A `BTreeMap` serves as the model: after any sequence of operations the
//! AVL map must hold the same entries, in the same order, and still pass
//! its structural checks.

use std::collections::BTreeMap;

use avl_map::{AvlMap, InvalidIteratorKind, MapError, ReverseOrder};
use proptest::prelude::*;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

#[derive(Debug, Clone)]
enum Operation {
    Insert(i16, i32),
    Assign(i16, i32),
    Remove(i16),
    EraseFound(i16),
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        4 => (any::<i16>(), any::<i32>()).prop_map(|(key, value)| Operation::Insert(key, value)),
        1 => (any::<i16>(), any::<i32>()).prop_map(|(key, value)| Operation::Assign(key, value)),
        2 => any::<i16>().prop_map(Operation::Remove),
        2 => any::<i16>().prop_map(Operation::EraseFound),
    ]
}

/// Small key space so that removals and duplicates actually hit.
fn dense_entries(max_size: usize) -> impl Strategy<Value = Vec<(i16, i32)>> {
    prop::collection::vec((-64i16..64, any::<i32>()), 0..max_size)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Model Laws
// =============================================================================

proptest! {
    /// Law: any operation sequence leaves the same entries as BTreeMap,
    /// with every structural invariant intact.
    #[test]
    fn prop_matches_btreemap_model(
        operations in prop::collection::vec(operation(), 0..200)
    ) {
        init_tracing();
        let mut map = AvlMap::new();
        let mut model = BTreeMap::new();

        for operation in operations {
            match operation {
                Operation::Insert(key, value) => {
                    let (_, inserted) = map.insert(key, value);
                    let expected = !model.contains_key(&key);
                    model.entry(key).or_insert(value);
                    prop_assert_eq!(inserted, expected);
                }
                Operation::Assign(key, value) => {
                    map.insert_or_assign(key, value);
                    model.insert(key, value);
                }
                Operation::Remove(key) => {
                    prop_assert_eq!(map.remove(&key), model.remove(&key));
                }
                Operation::EraseFound(key) => {
                    let position = map.find(&key);
                    match model.remove(&key) {
                        Some(value) => prop_assert_eq!(map.erase(position), Ok((key, value))),
                        None => prop_assert_eq!(
                            map.erase(position),
                            Err(MapError::InvalidIterator(InvalidIteratorKind::ErasePastEnd))
                        ),
                    }
                }
            }
            prop_assert_eq!(map.len(), model.len());
        }

        prop_assert_eq!(map.validate(), Ok(()));
        let entries: Vec<(i16, i32)> = map.iter().map(|(key, value)| (*key, *value)).collect();
        let expected: Vec<(i16, i32)> = model.into_iter().collect();
        prop_assert_eq!(entries, expected);
    }

    /// Law: the first inserted value for a key wins.
    #[test]
    fn prop_duplicate_insert_is_ignored(entries in dense_entries(100)) {
        let map: AvlMap<i16, i32> = entries.iter().copied().collect();
        let mut model = BTreeMap::new();
        for (key, value) in entries {
            model.entry(key).or_insert(value);
        }
        for (key, value) in &model {
            prop_assert_eq!(map.at(key), Ok(value));
        }
        prop_assert_eq!(map.len(), model.len());
    }
}

// =============================================================================
// Balance Laws
// =============================================================================

proptest! {
    /// Law: height never exceeds the AVL bound of about 1.44 * log2(n + 2).
    #[test]
    fn prop_height_is_logarithmic(keys in prop::collection::vec(any::<i32>(), 0..500)) {
        let map: AvlMap<i32, ()> = keys.into_iter().map(|key| (key, ())).collect();
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let bound = (1.4405 * ((map.len() + 2) as f64).log2()) as usize;
        prop_assert!(map.height() <= bound);
        prop_assert_eq!(map.validate(), Ok(()));
    }

    /// Law: removing half the keys keeps the tree valid and balanced.
    #[test]
    fn prop_removal_preserves_invariants(entries in dense_entries(150)) {
        let mut map: AvlMap<i16, i32> = entries.iter().copied().collect();
        for (key, _) in entries.iter().step_by(2) {
            map.remove(key);
            prop_assert_eq!(map.validate(), Ok(()));
        }
    }
}

// =============================================================================
// Traversal Laws
// =============================================================================

proptest! {
    /// Law: walking positions forward visits exactly the iterator's keys,
    /// and walking backward from end visits them reversed.
    #[test]
    fn prop_position_walks_agree_with_iter(entries in dense_entries(80)) {
        let map: AvlMap<i16, i32> = entries.into_iter().collect();
        let keys: Vec<i16> = map.keys().copied().collect();

        let mut forward = Vec::new();
        let mut position = map.cbegin();
        while position != map.cend() {
            forward.push(*position.get(&map).unwrap().0);
            position.move_next(&map).unwrap();
        }
        prop_assert_eq!(&forward, &keys);

        let mut backward = Vec::new();
        let mut position = map.cend();
        while position != map.cbegin() {
            position.move_prev(&map).unwrap();
            backward.push(*position.get(&map).unwrap().0);
        }
        backward.reverse();
        prop_assert_eq!(&backward, &keys);
    }

    /// Law: a reverse comparator yields the natural order reversed.
    #[test]
    fn prop_reverse_order_mirrors_natural(entries in dense_entries(80)) {
        let natural: AvlMap<i16, i32> = entries.iter().copied().collect();
        let reverse: AvlMap<i16, i32, ReverseOrder> = entries.into_iter().collect();
        let mut mirrored: Vec<i16> = reverse.keys().copied().collect();
        mirrored.reverse();
        prop_assert_eq!(mirrored, natural.keys().copied().collect::<Vec<_>>());
        prop_assert_eq!(reverse.validate(), Ok(()));
    }
}

// =============================================================================
// Copy Laws
// =============================================================================

proptest! {
    /// Law: a clone equals its source and is unaffected by later changes.
    #[test]
    fn prop_clone_is_independent(entries in dense_entries(80), extra: i16) {
        let original: AvlMap<i16, i32> = entries.into_iter().collect();
        let snapshot: Vec<(i16, i32)> = original.iter().map(|(key, value)| (*key, *value)).collect();
        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);

        copy.insert_or_assign(extra, i32::MIN);
        copy.remove(&extra.wrapping_add(1));
        let after: Vec<(i16, i32)> = original.iter().map(|(key, value)| (*key, *value)).collect();
        prop_assert_eq!(after, snapshot);
        prop_assert_eq!(copy.validate(), Ok(()));
    }
}
