use std::hash::{Hash, Hasher};

use crate::ChampMap;

/// A key type with a controllable hash value for testing hash collisions.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CollidingKey {
    id: u32,
    forced_hash: u64,
}

impl CollidingKey {
    const fn new(id: u32, hash: u64) -> Self {
        Self {
            id,
            forced_hash: hash,
        }
    }
}

impl Hash for CollidingKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.forced_hash.hash(state);
    }
}

/// Two keys with the same 64-bit hash create a collision node.
#[test]
fn two_colliding_keys() {
    let k1 = CollidingKey::new(1, 0xDEAD_BEEF);
    let k2 = CollidingKey::new(2, 0xDEAD_BEEF);

    let map = ChampMap::new().add(k1.clone(), "first").add(k2.clone(), "second");

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some("first"));
    assert_eq!(map.get(&k2), Some("second"));
}

/// Three keys with the same hash.
#[test]
fn three_colliding_keys() {
    let keys: Vec<CollidingKey> = (0..3).map(|i| CollidingKey::new(i, 0xCAFE)).collect();

    let mut map = ChampMap::new();
    for (i, k) in keys.iter().enumerate() {
        map = map.add(k.clone(), i);
    }

    assert_eq!(map.len(), 3);
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(map.get(k), Some(i));
    }
}

/// Remove from collision node.
#[test]
fn remove_from_collision() {
    let k1 = CollidingKey::new(1, 0xAAAA);
    let k2 = CollidingKey::new(2, 0xAAAA);
    let k3 = CollidingKey::new(3, 0xAAAA);

    let map = ChampMap::new().add(k1.clone(), 10).add(k2.clone(), 20).add(k3.clone(), 30);

    let after = map.remove(&k2);
    assert_eq!(after.len(), 2);
    assert_eq!(after.get(&k1), Some(10));
    assert_eq!(after.get(&k2), None);
    assert_eq!(after.get(&k3), Some(30));
}

/// Overwrite in collision node.
#[test]
fn overwrite_in_collision() {
    let k1 = CollidingKey::new(1, 0xBBBB);
    let k2 = CollidingKey::new(2, 0xBBBB);

    let map = ChampMap::new().add(k1.clone(), "old").add(k2.clone(), "val2").add(k1.clone(), "new");

    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&k1), Some("new"));
}

/// Collision node with remove-all returns to empty.
#[test]
fn collision_remove_all() {
    let k1 = CollidingKey::new(1, 0xCCCC);
    let k2 = CollidingKey::new(2, 0xCCCC);

    let map = ChampMap::new().add(k1.clone(), 1).add(k2.clone(), 2);

    let map = map.remove(&k1).remove(&k2);
    assert!(map.is_empty());
    assert_eq!(map.adhash(), 0);
}

/// Collision node shrinking to a single entry collapses to `Data` form,
/// not a one-entry `Collision`.
#[test]
fn collision_shrinks_to_data() {
    let k1 = CollidingKey::new(1, 0xFEED);
    let k2 = CollidingKey::new(2, 0xFEED);

    let map = ChampMap::new().add(k1.clone(), "x").add(k2.clone(), "y");
    let after = map.remove(&k2);

    assert_eq!(after.len(), 1);
    assert_eq!(after.get(&k1), Some("x"));

    // The collapsed single-entry map must be structurally identical to one
    // built directly with a single add — same adhash, same canonical form.
    let direct = ChampMap::new().add(k1, "x");
    assert_eq!(after.adhash(), direct.adhash());
}

/// Two maps built from the same colliding keys with swapped values must
/// compare unequal even though they have equal len and equal adhash (the
/// adhash sum is permutation-invariant over the same multiset of
/// (key_hash, value) pairs). Equality must distinguish them by key, not
/// just by hash-and-value.
#[test]
fn colliding_keys_swapped_values_are_not_equal() {
    let k1 = CollidingKey::new(1, 0xF00D);
    let k2 = CollidingKey::new(2, 0xF00D);

    let a = ChampMap::new().add(k1.clone(), 1).add(k2.clone(), 2);
    let b = ChampMap::new().add(k1.clone(), 2).add(k2.clone(), 1);

    assert_eq!(a.len(), b.len());
    assert_eq!(a.adhash(), b.adhash());
    assert_ne!(a, b);
    assert_ne!(a.get(&k1), b.get(&k1));
}

/// Mixed: some keys collide, some don't.
#[test]
fn mixed_collisions_and_normal() {
    let collide_a = CollidingKey::new(1, 0xDDDD);
    let collide_b = CollidingKey::new(2, 0xDDDD);
    let normal = CollidingKey::new(3, 0xEEEE);

    let map = ChampMap::new()
        .add(collide_a.clone(), "a")
        .add(collide_b.clone(), "b")
        .add(normal.clone(), "c");

    assert_eq!(map.len(), 3);
    assert_eq!(map.get(&collide_a), Some("a"));
    assert_eq!(map.get(&collide_b), Some("b"));
    assert_eq!(map.get(&normal), Some("c"));
}
