//! Completeness tests: add/remove must not lose data.

use crate::ChampMap;

// ---------------------------------------------------------------------------
// add must overwrite, never duplicate
// ---------------------------------------------------------------------------

#[test]
fn add_new_increases_len() {
    let map = ChampMap::new().add("key", 42);
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&"key"), Some(42));
}

#[test]
fn add_update_keeps_len_replaces_value() {
    let m1 = ChampMap::new().add("key", 1);
    let m2 = m1.add("key", 2);
    assert_eq!(m2.len(), 1, "overwriting an existing key must not grow the map");
    assert_eq!(m2.get(&"key"), Some(2));
}

#[test]
fn add_chain_keeps_latest_value() {
    let m = ChampMap::new().add("k", 10).add("k", 20).add("k", 30);
    assert_eq!(m.len(), 1);
    assert_eq!(m.get(&"k"), Some(30));
}

// ---------------------------------------------------------------------------
// remove must drop exactly the targeted entry
// ---------------------------------------------------------------------------

#[test]
fn remove_existing_drops_len_by_one() {
    let map = ChampMap::new().add("a", 100);
    let after = map.remove(&"a");
    assert_eq!(after.len(), 0);
    assert_eq!(after.get(&"a"), None);
}

#[test]
fn remove_missing_key_is_noop() {
    let map = ChampMap::new().add("a", 1);
    let after = map.remove(&"z");
    assert_eq!(after.len(), map.len());
    assert_eq!(after, map);
}

#[test]
fn remove_correct_value_among_many() {
    let mut map = ChampMap::new();
    for i in 0..100 {
        map = map.add(i, i * 10);
    }
    let after = map.remove(&50);
    assert_eq!(after.get(&50), None);
    assert_eq!(after.len(), 99);
    // Removing again is a no-op.
    let again = after.remove(&50);
    assert_eq!(again.len(), 99);
    assert_eq!(again, after);
}

#[test]
fn no_entry_lost_across_mixed_add_and_remove() {
    let mut map = ChampMap::new();
    for i in 0..200 {
        map = map.add(i, i);
    }
    for i in (0..200).step_by(3) {
        map = map.remove(&i);
    }
    let expected = (0..200).filter(|i| i % 3 != 0).count();
    assert_eq!(map.len(), expected);
    for i in 0..200 {
        if i % 3 == 0 {
            assert_eq!(map.get(&i), None);
        } else {
            assert_eq!(map.get(&i), Some(i));
        }
    }
}
