use std::sync::Arc;
use std::thread;

use crate::ChampMapSync;

#[test]
fn sync_empty() {
    let map: ChampMapSync<i32, i32> = ChampMapSync::new();
    assert!(map.is_empty());
    assert_eq!(map.adhash(), 0);
}

#[test]
fn sync_add_and_get() {
    let map = ChampMapSync::new().add("key", 42);
    assert_eq!(map.get(&"key"), Some(42));
    assert_eq!(map.len(), 1);
}

#[test]
fn sync_remove() {
    let map = ChampMapSync::new().add(1, 10).add(2, 20);
    let after = map.remove(&1);
    assert_eq!(after.get(&1), None);
    assert_eq!(after.len(), 1);
}

#[test]
fn sync_canonical_order() {
    let m1 = ChampMapSync::new().add(1, 10).add(2, 20).add(3, 30);
    let m2 = ChampMapSync::new().add(3, 30).add(1, 10).add(2, 20);

    assert_eq!(m1.adhash(), m2.adhash());
    assert_eq!(m1, m2);
}

#[test]
fn sync_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<ChampMapSync<String, i32>>();
}

#[test]
fn sync_is_sync() {
    fn assert_sync<T: Sync>() {}
    assert_sync::<ChampMapSync<String, i32>>();
}

#[test]
fn sync_stress_100() {
    let mut map = ChampMapSync::new();
    for i in 0_u64..100 {
        map = map.add(i, i * 5);
    }
    assert_eq!(map.len(), 100);
    for i in 0_u64..100 {
        assert_eq!(map.get(&i), Some(i * 5));
    }
}

/// A frozen `ChampMapSync` can be shared across threads and read
/// concurrently, with every thread observing the same snapshot.
#[test]
fn sync_shared_across_threads() {
    let mut map = ChampMapSync::new();
    for i in 0_u64..1000 {
        map = map.add(i, i * 2);
    }
    let shared = Arc::new(map);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                for i in 0_u64..1000 {
                    assert_eq!(shared.get(&i), Some(i * 2), "thread {t} saw wrong value for {i}");
                }
                shared.len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1000);
    }
}

/// Each clone's writes are isolated — deriving a new version on one
/// thread never affects a sibling clone held by another thread.
#[test]
fn sync_clone_writes_are_isolated_across_threads() {
    let base = ChampMapSync::new().add("shared", 1);
    let base_for_thread = base.clone();

    let handle = thread::spawn(move || base_for_thread.add("only_in_thread", 2));
    let derived_here = base.add("only_in_main", 3);

    let derived_there = handle.join().unwrap();

    assert_eq!(base.len(), 1);
    assert!(!base.contains_key(&"only_in_thread"));
    assert!(!base.contains_key(&"only_in_main"));
    assert!(derived_here.contains_key(&"only_in_main"));
    assert!(!derived_here.contains_key(&"only_in_thread"));
    assert!(derived_there.contains_key(&"only_in_thread"));
    assert!(!derived_there.contains_key(&"only_in_main"));
}
