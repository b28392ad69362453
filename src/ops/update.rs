//! Update operation — apply a function to an existing value, or insert via
//! an optional `if_absent` thunk.
//!
//! Structurally this is insert's "same key" and "empty slot" cases with the
//! replacement value supplied by a closure instead of handed in directly;
//! when the key is absent and no `if_absent` thunk is given, the subtree is
//! returned unchanged.
//!
//! A present key always allocates a fresh entry/node, even when `update_fn`
//! returns a value equal to the one it replaced: `V` carries no `PartialEq`
//! bound on this path, so there is nothing to compare the new value against
//! without imposing that bound on every caller.

use std::hash::Hash;

use safe_bump::Idx;

use crate::adhash;
use crate::node::{self, Entry, Node};
use crate::store::ChampStore;

/// Outcome of a recursive update.
pub struct UpdateOutcome<K, V> {
    /// Index of the (possibly unchanged) root of the modified subtree.
    pub node: Idx<Node<K, V>>,
    /// Wrapping `AdHash` delta to add to the parent's adhash.
    pub adhash_delta: u64,
    /// `true` if the key's presence changed (a new key was inserted).
    pub inserted: bool,
    /// `true` if the subtree identity changed (something was written).
    pub changed: bool,
}

fn unchanged<K, V>(node: Idx<Node<K, V>>) -> UpdateOutcome<K, V> {
    UpdateOutcome { node, adhash_delta: 0, inserted: false, changed: false }
}

/// Applies `update_fn` to the value at `key` in the subtree rooted at
/// `node_idx`, or inserts `if_absent()` when the key is missing and
/// `if_absent` is `Some`.
pub fn update_recursive<K, V, S, F, A>(
    store: &mut S,
    node_idx: Idx<Node<K, V>>,
    hash: u64,
    key: &K,
    shift: u32,
    update_fn: &mut F,
    if_absent: &mut Option<A>,
) -> UpdateOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
    S: ChampStore<K, V>,
    F: FnMut(&V) -> V,
    A: FnMut() -> V,
{
    let node = *store.get_node(node_idx);
    match node {
        Node::Inner { data_map, node_map, data_start, children_start, adhash } => {
            update_inner(
                store, data_map, node_map, data_start, children_start, adhash, hash, key, shift,
                update_fn, if_absent,
            )
        }
        Node::Collision { hash: node_hash, entries_start, entries_len, adhash } => {
            update_collision(store, node_hash, entries_start, entries_len, adhash, hash, key, update_fn, if_absent)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn update_inner<K, V, S, F, A>(
    store: &mut S,
    data_map: u32,
    node_map: u32,
    data_start: Idx<Entry<K, V>>,
    children_start: Idx<Idx<Node<K, V>>>,
    adhash: u64,
    hash: u64,
    key: &K,
    shift: u32,
    update_fn: &mut F,
    if_absent: &mut Option<A>,
) -> UpdateOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
    S: ChampStore<K, V>,
    F: FnMut(&V) -> V,
    A: FnMut() -> V,
{
    let frag = node::fragment(hash, shift);
    let bit = node::mask(frag);
    let data_len = data_map.count_ones() as usize;
    let children_len = node_map.count_ones() as usize;

    if data_map & bit != 0 {
        let pos = node::index(data_map, bit);
        let (key_eq, old_contrib, new_value) = {
            let e = store.get_entry(node::offset(data_start, pos));
            let eq = e.hash == hash && e.key == *key;
            if eq {
                let contrib = adhash::entry_adhash(e.hash, adhash::hash_one(&e.value));
                (true, contrib, Some(update_fn(&e.value)))
            } else {
                (false, 0, None)
            }
        };

        if !key_eq {
            return fall_through_to_insert(store, data_map, node_map, data_start, children_start, adhash, shift, hash, key, if_absent);
        }

        let new_value = new_value.expect("update_fn invoked");
        let new_contrib = adhash::entry_adhash(hash, adhash::hash_one(&new_value));
        let delta = new_contrib.wrapping_sub(old_contrib);
        let entry = Entry { hash, key: key.clone(), value: new_value };
        let entries = build_entries_replacing(store, data_start, data_len, pos, entry);
        let new_data = store.alloc_entries(entries).expect("non-empty");
        let new_node = store.alloc_node(Node::Inner {
            data_map,
            node_map,
            data_start: new_data,
            children_start,
            adhash: adhash.wrapping_add(delta),
        });
        UpdateOutcome { node: new_node, adhash_delta: delta, inserted: false, changed: true }
    } else if node_map & bit != 0 {
        let child_pos = node::index(node_map, bit);
        let old_child = *store.get_child(node::offset(children_start, child_pos));
        let outcome = update_recursive(store, old_child, hash, key, shift + node::BITS_PER_LEVEL, update_fn, if_absent);

        if !outcome.changed {
            return unchanged(store.alloc_node(Node::Inner { data_map, node_map, data_start, children_start, adhash }));
        }

        let children = build_children_replacing(store, children_start, children_len, child_pos, outcome.node);
        let new_children = store.alloc_children(children).expect("non-empty");
        let new_node = store.alloc_node(Node::Inner {
            data_map,
            node_map,
            data_start,
            children_start: new_children,
            adhash: adhash.wrapping_add(outcome.adhash_delta),
        });
        UpdateOutcome { node: new_node, adhash_delta: outcome.adhash_delta, inserted: outcome.inserted, changed: true }
    } else {
        fall_through_to_insert(store, data_map, node_map, data_start, children_start, adhash, shift, hash, key, if_absent)
    }
}

/// Key is absent at this position — insert via `if_absent`, or leave the
/// subtree unchanged if no `if_absent` thunk was given.
///
/// Covers both sub-cases of "absent at this `Inner` node" — a different key
/// occupying the data slot (needs splitting into a subtree) and a genuinely
/// empty slot — by reconstructing the node unchanged and handing it to
/// [`crate::ops::insert::insert_recursive`], which already knows how to tell
/// them apart. This avoids duplicating that bookkeeping here.
#[allow(clippy::too_many_arguments)]
fn fall_through_to_insert<K, V, S, A>(
    store: &mut S,
    data_map: u32,
    node_map: u32,
    data_start: Idx<Entry<K, V>>,
    children_start: Idx<Idx<Node<K, V>>>,
    adhash: u64,
    shift: u32,
    hash: u64,
    key: &K,
    if_absent: &mut Option<A>,
) -> UpdateOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
    S: ChampStore<K, V>,
    A: FnMut() -> V,
{
    let same = store.alloc_node(Node::Inner { data_map, node_map, data_start, children_start, adhash });

    let Some(make_value) = if_absent else {
        return unchanged(same);
    };

    let value = make_value();
    let entry = Entry { hash, key: key.clone(), value };
    let outcome = crate::ops::insert::insert_recursive(store, same, entry, shift);
    UpdateOutcome { node: outcome.node, adhash_delta: outcome.adhash_delta, inserted: true, changed: true }
}

fn update_collision<K, V, S, F, A>(
    store: &mut S,
    node_hash: u64,
    entries_start: Idx<Entry<K, V>>,
    entries_len: u8,
    adhash: u64,
    hash: u64,
    key: &K,
    update_fn: &mut F,
    if_absent: &mut Option<A>,
) -> UpdateOutcome<K, V>
where
    K: Hash + Eq + Clone,
    V: Hash + Clone,
    S: ChampStore<K, V>,
    F: FnMut(&V) -> V,
    A: FnMut() -> V,
{
    let len = usize::from(entries_len);

    if hash == node_hash {
        for i in 0..len {
            let (key_eq, old_contrib, new_value) = {
                let e = store.get_entry(node::offset(entries_start, i));
                let eq = e.key == *key;
                if eq {
                    let contrib = adhash::entry_adhash(e.hash, adhash::hash_one(&e.value));
                    (true, contrib, Some(update_fn(&e.value)))
                } else {
                    (false, 0, None)
                }
            };
            if key_eq {
                let new_value = new_value.expect("update_fn invoked");
                let new_contrib = adhash::entry_adhash(hash, adhash::hash_one(&new_value));
                let delta = new_contrib.wrapping_sub(old_contrib);
                let entry = Entry { hash, key: key.clone(), value: new_value };
                let entries = build_entries_replacing(store, entries_start, len, i, entry);
                let new_start = store.alloc_entries(entries).expect("non-empty");
                let new_node = store.alloc_node(Node::Collision {
                    hash: node_hash,
                    entries_start: new_start,
                    entries_len,
                    adhash: adhash.wrapping_add(delta),
                });
                return UpdateOutcome { node: new_node, adhash_delta: delta, inserted: false, changed: true };
            }
        }
    }

    let Some(make_value) = if_absent else {
        let same = store.alloc_node(Node::Collision { hash: node_hash, entries_start, entries_len, adhash });
        return unchanged(same);
    };

    assert_eq!(
        hash, node_hash,
        "a key can only route to this collision node if its full hash matches \
         every fragment used to get here: paths diverge at the first \
         differing fragment, or share the full hash at max depth"
    );

    let value = make_value();
    let new_contrib = adhash::entry_adhash(hash, adhash::hash_one(&value));
    let entry = Entry { hash, key: key.clone(), value };

    let new_len = entries_len.checked_add(1).expect("collision node overflow (>255 entries)");
    let mut entries = Vec::with_capacity(len + 1);
    for i in 0..len {
        let e = store.get_entry(node::offset(entries_start, i));
        entries.push(Entry { hash: e.hash, key: e.key.clone(), value: e.value.clone() });
    }
    entries.push(entry);
    let new_start = store.alloc_entries(entries).expect("non-empty");
    let new_node = store.alloc_node(Node::Collision {
        hash: node_hash,
        entries_start: new_start,
        entries_len: new_len,
        adhash: adhash.wrapping_add(new_contrib),
    });
    UpdateOutcome { node: new_node, adhash_delta: new_contrib, inserted: true, changed: true }
}

fn build_entries_replacing<K: Clone, V: Clone, S: ChampStore<K, V>>(
    store: &S,
    start: Idx<Entry<K, V>>,
    len: usize,
    at: usize,
    entry: Entry<K, V>,
) -> Vec<Entry<K, V>> {
    let mut out = Vec::with_capacity(len);
    for i in 0..at {
        let e = store.get_entry(node::offset(start, i));
        out.push(Entry { hash: e.hash, key: e.key.clone(), value: e.value.clone() });
    }
    out.push(entry);
    for i in (at + 1)..len {
        let e = store.get_entry(node::offset(start, i));
        out.push(Entry { hash: e.hash, key: e.key.clone(), value: e.value.clone() });
    }
    out
}

fn build_children_replacing<K, V, S: ChampStore<K, V>>(
    store: &S,
    start: Idx<Idx<Node<K, V>>>,
    len: usize,
    at: usize,
    child: Idx<Node<K, V>>,
) -> Vec<Idx<Node<K, V>>> {
    let mut out = Vec::with_capacity(len);
    for i in 0..len {
        if i == at {
            out.push(child);
        } else {
            out.push(*store.get_child(node::offset(start, i)));
        }
    }
    out
}
