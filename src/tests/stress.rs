use crate::ChampMap;

/// 1000 entries: add all, verify all, remove all.
#[test]
fn thousand_entries() {
    let mut map = ChampMap::new();
    for i in 0_u64..1000 {
        map = map.add(i, i * 3);
    }
    assert_eq!(map.len(), 1000);

    for i in 0_u64..1000 {
        assert_eq!(map.get(&i), Some(i * 3), "missing key {i}");
    }

    for i in 0_u64..1000 {
        let before = map.len();
        map = map.remove(&i);
        assert_eq!(map.len(), before - 1, "failed to remove key {i}");
    }
    assert!(map.is_empty());
    assert_eq!(map.adhash(), 0);
}

/// Deep trie: keys with shared hash prefixes force deeper nodes.
#[test]
fn deep_shared_prefixes() {
    let mut map = ChampMap::new();
    for i in 0_u64..500 {
        map = map.add(i, i);
    }
    assert_eq!(map.len(), 500);
    for i in 0_u64..500 {
        assert_eq!(map.get(&i), Some(i));
    }
}

/// Add + overwrite + remove interleaved.
#[test]
fn interleaved_operations() {
    let mut map = ChampMap::new();
    for i in 0_u64..200 {
        map = map.add(i, i);
    }
    // Overwrite even keys.
    for i in (0_u64..200).step_by(2) {
        map = map.add(i, i + 1000);
    }
    // Remove odd keys.
    for i in (1_u64..200).step_by(2) {
        map = map.remove(&i);
    }
    assert_eq!(map.len(), 100);
    for i in (0_u64..200).step_by(2) {
        assert_eq!(map.get(&i), Some(i + 1000));
    }
}

/// Earlier versions of a persistent map keep observing their own contents
/// even after many later versions have been derived from them.
#[test]
fn old_versions_survive_many_derivations() {
    let snapshot = ChampMap::new().add("alive", 1);
    let mut tip = snapshot.clone();
    for i in 0_u64..500 {
        tip = tip.add(i, i);
    }
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get(&"alive"), Some(1));
    assert_eq!(tip.len(), 501);
    assert_eq!(tip.get(&"alive"), Some(1));
}

/// Bulk removal via `remove_where` leaves exactly the complement.
#[test]
fn remove_where_large_set() {
    let mut map = ChampMap::new();
    for i in 0_u64..300 {
        map = map.add(i, i);
    }
    let odds_only = map.remove_where(|k, _| k % 2 == 0);
    assert_eq!(odds_only.len(), 150);
    for i in 0_u64..300 {
        if i % 2 == 0 {
            assert_eq!(odds_only.get(&i), None);
        } else {
            assert_eq!(odds_only.get(&i), Some(i));
        }
    }
}
