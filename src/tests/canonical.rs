use crate::ChampMap;

/// Insertion order must not affect the resulting structure.
/// Same set of entries → same adhash.
#[test]
fn add_order_abc_cba_bca() {
    let orders: [&[(i32, i32)]; 3] = [
        &[(1, 10), (2, 20), (3, 30)],
        &[(3, 30), (2, 20), (1, 10)],
        &[(2, 20), (3, 30), (1, 10)],
    ];

    let maps: Vec<ChampMap<i32, i32>> = orders
        .iter()
        .map(|pairs| {
            let mut m = ChampMap::new();
            for &(k, v) in *pairs {
                m = m.add(k, v);
            }
            m
        })
        .collect();

    assert_eq!(maps[0].adhash(), maps[1].adhash());
    assert_eq!(maps[1].adhash(), maps[2].adhash());
    assert_eq!(maps[0].len(), maps[1].len());
    assert_eq!(maps[0], maps[1]);
}

/// Larger set — 100 entries, three orderings.
#[test]
fn add_order_100_entries() {
    let entries: Vec<(u64, u64)> = (0..100).map(|i| (i, i * 7)).collect();

    let forward: ChampMap<u64, u64> = ChampMap::from_entries(entries.iter().copied());
    let backward: ChampMap<u64, u64> = ChampMap::from_entries(entries.iter().rev().copied());

    let mut interleaved = ChampMap::new();
    for &(k, v) in entries.iter().step_by(2) {
        interleaved = interleaved.add(k, v);
    }
    for &(k, v) in entries.iter().skip(1).step_by(2) {
        interleaved = interleaved.add(k, v);
    }

    assert_eq!(forward.adhash(), backward.adhash());
    assert_eq!(forward.adhash(), interleaved.adhash());
    assert_eq!(forward.len(), 100);
}

/// After overwrite, order independence still holds.
#[test]
fn overwrite_preserves_canonicity() {
    let map_a = ChampMap::new().add(1, 10).add(2, 20).add(1, 11); // overwrite

    let map_b = ChampMap::new().add(2, 20).add(1, 11); // insert final value directly

    assert_eq!(map_a.adhash(), map_b.adhash());
    assert_eq!(map_a.len(), map_b.len());
    assert_eq!(map_a, map_b);
}

/// After delete, order independence holds.
#[test]
fn delete_preserves_canonicity() {
    let map_a = ChampMap::new().add(1, 10).add(2, 20).add(3, 30).remove(&2);

    let map_b = ChampMap::new().add(3, 30).add(1, 10);

    assert_eq!(map_a.adhash(), map_b.adhash());
    assert_eq!(map_a.len(), map_b.len());
    assert_eq!(map_a, map_b);
}

/// Two maps built from the same multiset via `add_all` in different
/// chunkings converge to the same structure.
#[test]
fn bulk_add_matches_incremental() {
    let pairs: Vec<(u32, u32)> = (0..64).map(|i| (i, i * i)).collect();

    let bulk: ChampMap<u32, u32> = ChampMap::new().add_all(pairs.iter().copied());
    let mut incremental = ChampMap::new();
    for &(k, v) in &pairs {
        incremental = incremental.add(k, v);
    }

    assert_eq!(bulk.adhash(), incremental.adhash());
    assert_eq!(bulk, incremental);
}
