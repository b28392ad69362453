use crate::ChampMap;

#[test]
fn empty_map() {
    let map: ChampMap<String, i32> = ChampMap::new();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.adhash(), 0);
}

#[test]
fn add_one() {
    let map = ChampMap::new().add("hello", 42);
    assert_eq!(map.len(), 1);
    assert!(!map.is_empty());
    assert_ne!(map.adhash(), 0);
}

#[test]
fn add_does_not_mutate_receiver() {
    let before = ChampMap::new();
    let after = before.add("hello", 42);
    assert!(before.is_empty());
    assert_eq!(after.len(), 1);
}

#[test]
fn add_and_get() {
    let map = ChampMap::new().add("key", 100);
    assert_eq!(map.get(&"key"), Some(100));
}

#[test]
fn get_missing_key() {
    let map = ChampMap::new().add("a", 1);
    assert_eq!(map.get(&"b"), None);
}

#[test]
fn add_multiple() {
    let mut map = ChampMap::new();
    for i in 0..10 {
        map = map.add(i, i * 10);
    }
    assert_eq!(map.len(), 10);
    for i in 0..10 {
        assert_eq!(map.get(&i), Some(i * 10));
    }
}

#[test]
fn overwrite_value() {
    let v1 = ChampMap::new().add("k", 1);
    let v2 = v1.add("k", 2);
    assert_eq!(v2.len(), 1);
    assert_eq!(v2.get(&"k"), Some(2));
    // v1 is untouched.
    assert_eq!(v1.get(&"k"), Some(1));
}

#[test]
fn contains_key_true() {
    let map = ChampMap::new().add(42, "val");
    assert!(map.contains_key(&42));
}

#[test]
fn contains_key_false() {
    let map = ChampMap::new().add(1, "a");
    assert!(!map.contains_key(&2));
}

#[test]
fn contains_value() {
    let map = ChampMap::new().add(1, "a").add(2, "b");
    assert!(map.contains_value(&"a"));
    assert!(!map.contains_value(&"z"));
}

#[test]
fn remove_existing() {
    let map = ChampMap::new().add("a", 1).add("b", 2);
    let after = map.remove(&"a");
    assert_eq!(after.len(), 1);
    assert_eq!(after.get(&"a"), None);
    assert_eq!(after.get(&"b"), Some(2));
    // original map still has both entries.
    assert_eq!(map.len(), 2);
}

#[test]
fn remove_missing_returns_equivalent_map() {
    let map = ChampMap::new().add("a", 1);
    let after = map.remove(&"z");
    assert_eq!(after.len(), 1);
    assert_eq!(after, map);
}

#[test]
fn remove_all() {
    let map = ChampMap::new().add(1, 10).add(2, 20).add(3, 30);
    let map = map.remove(&1).remove(&2).remove(&3);
    assert!(map.is_empty());
    assert_eq!(map.adhash(), 0);
}

#[test]
fn update_existing() {
    let map = ChampMap::new().add("k", 1);
    let after = map.update(&"k", |v| v + 10);
    assert_eq!(after.get(&"k"), Some(11));
    assert_eq!(map.get(&"k"), Some(1));
}

#[test]
fn update_missing_is_noop() {
    let map = ChampMap::new().add("k", 1);
    let after = map.update(&"z", |v| v + 10);
    assert_eq!(after, map);
}

#[test]
fn update_or_insert_inserts_when_absent() {
    let map: ChampMap<&str, i32> = ChampMap::new();
    let after = map.update_or_insert(&"k", |v| v + 1, || 0);
    assert_eq!(after.get(&"k"), Some(0));
}

#[test]
fn update_or_insert_updates_when_present() {
    let map = ChampMap::new().add("k", 5);
    let after = map.update_or_insert(&"k", |v| v + 1, || 0);
    assert_eq!(after.get(&"k"), Some(6));
}

#[test]
fn put_if_absent_reads_without_mutating() {
    let map = ChampMap::new().add("k", 5);
    assert_eq!(map.put_if_absent(&"k", 99), 5);
    assert_eq!(map.put_if_absent(&"z", 99), 99);
    assert!(!map.contains_key(&"z"));
}

#[test]
fn clear_returns_empty_map() {
    let map = ChampMap::new().add(1, 1).add(2, 2);
    let cleared = map.clear();
    assert!(cleared.is_empty());
    assert_eq!(map.len(), 2);
}

#[test]
fn adhash_changes_on_add() {
    let m0 = ChampMap::new();
    let m1 = m0.add(1, 1);
    let m2 = m1.add(2, 2);
    assert_ne!(m0.adhash(), m1.adhash());
    assert_ne!(m1.adhash(), m2.adhash());
}

#[test]
fn adhash_changes_on_overwrite() {
    let m1 = ChampMap::new().add("k", 1);
    let m2 = m1.add("k", 2);
    assert_ne!(m1.adhash(), m2.adhash());
}
