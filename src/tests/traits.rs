use crate::ChampMap;

#[test]
fn default_is_empty() {
    let map: ChampMap<i32, i32> = ChampMap::default();
    assert!(map.is_empty());
    assert_eq!(map.adhash(), 0);
}

#[test]
fn debug_format() {
    let map: ChampMap<i32, i32> = ChampMap::new();
    let dbg = format!("{map:?}");
    assert!(dbg.contains("ChampMap"));
    assert!(dbg.contains("len"));
}

#[test]
fn from_iterator() {
    let map: ChampMap<i32, i32> = vec![(1, 10), (2, 20), (3, 30)].into_iter().collect();
    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&1), Some(10));
}

#[test]
fn extend_trait() {
    let mut map = ChampMap::new().add(1, 10);
    map.extend(vec![(2, 20), (3, 30)]);
    assert_eq!(map.len(), 3);
}

#[test]
fn clone_shares_arena_cheaply() {
    let map = ChampMap::new().add(1, 10).add(2, 20);
    let clone = map.clone();
    assert_eq!(map, clone);
    assert_eq!(map.arena_len(), clone.arena_len());
}

#[test]
fn eq_ignores_insertion_order() {
    let a = ChampMap::new().add(1, 10).add(2, 20);
    let b = ChampMap::new().add(2, 20).add(1, 10);
    assert_eq!(a, b);
}

#[test]
fn eq_detects_difference() {
    let a = ChampMap::new().add(1, 10);
    let b = ChampMap::new().add(1, 11);
    assert_ne!(a, b);
}

#[test]
fn hash_matches_for_equal_maps() {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let a = ChampMap::new().add(1, 10).add(2, 20);
    let b = ChampMap::new().add(2, 20).add(1, 10);

    let mut ha = DefaultHasher::new();
    a.hash(&mut ha);
    let mut hb = DefaultHasher::new();
    b.hash(&mut hb);

    assert_eq!(ha.finish(), hb.finish());
}

#[test]
fn into_iterator_for_ref() {
    let map = ChampMap::new().add(1, "a").add(2, "b");
    let mut seen: Vec<(i32, &str)> = (&map).into_iter().collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![(1, "a"), (2, "b")]);
}

#[test]
fn to_hash_map_round_trips() {
    let map = ChampMap::new().add(1, "a").add(2, "b");
    let std_map = map.to_hash_map();
    assert_eq!(std_map.len(), 2);
    assert_eq!(std_map.get(&1), Some(&"a"));
}
