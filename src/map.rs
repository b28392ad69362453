//! Single-threaded, persistent CHAMP map.

use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use safe_bump::Idx;

use crate::adhash;
use crate::arena::ChampArena;
use crate::builder::ChampBuilder;
use crate::error::ChampError;
use crate::iter::DfsStack;
use crate::node::{self, Entry, Node};
use crate::ops::get::get_recursive;
use crate::ops::insert::insert_recursive;
use crate::ops::remove::{RemoveOutcome, remove_recursive};
use crate::ops::update::update_recursive;
use crate::store::ChampStore;

/// Persistent, immutable hash map based on a CHAMP trie, single-threaded.
///
/// Every write (`add`, `remove`, `update`, ...) returns a new `ChampMap`
/// value; the receiver is left unchanged and remains fully usable — older
/// and newer versions share most of their underlying trie via structural
/// sharing, never mutating a node another version might still be reading.
/// Same set of key-value pairs always produces the same trie structure
/// (canonical form), enabling O(1) structural equality via
/// [`adhash`](Self::adhash).
pub struct ChampMap<K, V> {
    store: Rc<RefCell<ChampArena<K, V>>>,
    root: Option<Idx<Node<K, V>>>,
    size: usize,
    adhash: u64,
}

impl<K, V> Clone for ChampMap<K, V> {
    fn clone(&self) -> Self {
        Self { store: Rc::clone(&self.store), root: self.root, size: self.size, adhash: self.adhash }
    }
}

// ---------------------------------------------------------------------------
// Construction & accessors — no trait bounds
// ---------------------------------------------------------------------------

impl<K, V> ChampMap<K, V> {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self { store: Rc::new(RefCell::new(ChampArena::new())), root: None, size: 0, adhash: 0 }
    }

    /// Assembles a map directly from a consumed [`ChampBuilder`]'s parts.
    pub(crate) fn from_builder(store: ChampArena<K, V>, root: Option<Idx<Node<K, V>>>, size: usize, adhash: u64) -> Self {
        Self { store: Rc::new(RefCell::new(store)), root, size, adhash }
    }

    /// Returns the number of key-value pairs.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the current `AdHash` value.
    ///
    /// Two maps with the same `AdHash` and the same length contain the same
    /// entries with overwhelming probability (2⁻⁶⁴ collision chance) —
    /// regardless of the order entries were inserted in.
    #[must_use]
    pub const fn adhash(&self) -> u64 {
        self.adhash
    }

    /// Returns the total number of items allocated across every version
    /// that shares this map's arena: `(nodes, entries, children)`.
    ///
    /// Includes dead COW copies left behind by earlier versions — reflects
    /// true memory footprint, not this version's live entry count.
    #[must_use]
    pub fn arena_len(&self) -> (usize, usize, usize) {
        self.store.borrow().arena_len()
    }
}

// ---------------------------------------------------------------------------
// Construction from an existing iterable
// ---------------------------------------------------------------------------

impl<K: Hash + Eq + Clone, V: Hash + Clone> ChampMap<K, V> {
    /// Builds a map from an iterator of key-value pairs.
    #[must_use]
    pub fn from_entries<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        ChampBuilder::from_iter(iter).freeze()
    }

    /// Rebuilds this map's contents into a fresh, exclusively-owned
    /// builder — the entry point for every bulk operation below.
    fn to_builder(&self) -> ChampBuilder<K, V> {
        let mut builder = ChampBuilder::new();
        for (k, v) in self.iter() {
            builder.add(k, v);
        }
        builder
    }
}

// ---------------------------------------------------------------------------
// Read operations
// ---------------------------------------------------------------------------

impl<K: Hash + Eq, V> ChampMap<K, V> {
    /// Returns a clone of the value associated with `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let root = self.root?;
        let store = self.store.borrow();
        get_recursive(&*store, root, adhash::hash_one(key), key, 0).cloned()
    }

    /// Returns `true` if the map contains the given key.
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        let Some(root) = self.root else { return false };
        let store = self.store.borrow();
        get_recursive(&*store, root, adhash::hash_one(key), key, 0).is_some()
    }
}

impl<K, V: PartialEq> ChampMap<K, V> {
    /// Returns `true` if any entry has the given value (linear scan).
    #[must_use]
    pub fn contains_value(&self, value: &V) -> bool {
        let Some(root) = self.root else { return false };
        let store = self.store.borrow();
        let mut stack = DfsStack::new(&*store, Some(root));
        while let Some(idx) = stack.advance(&*store) {
            if store.get_entry(idx).value == *value {
                return true;
            }
        }
        false
    }
}

// ---------------------------------------------------------------------------
// Single-key write operations — each returns a new map sharing the arena
// ---------------------------------------------------------------------------

impl<K: Hash + Eq + Clone, V: Hash + Clone> ChampMap<K, V> {
    /// Returns a new map with `key` bound to `value`.
    ///
    /// # Panics
    ///
    /// Panics if internal arena allocation returns an unexpected `None`.
    #[must_use]
    pub fn add(&self, key: K, value: V) -> Self {
        let hash = adhash::hash_one(&key);
        let entry = Entry { hash, key, value };
        let mut store = self.store.borrow_mut();

        let Some(root) = self.root else {
            let (new_root, adhash) = insert_first(&mut *store, entry);
            drop(store);
            return Self { store: Rc::clone(&self.store), root: Some(new_root), size: 1, adhash };
        };

        let outcome = insert_recursive(&mut *store, root, entry, 0);
        let size = if outcome.inserted { self.size + 1 } else { self.size };
        drop(store);
        Self {
            store: Rc::clone(&self.store),
            root: Some(outcome.node),
            size,
            adhash: self.adhash.wrapping_add(outcome.adhash_delta),
        }
    }

    /// Returns a new map with every pair from `iter` added.
    #[must_use]
    pub fn add_all<I: IntoIterator<Item = (K, V)>>(&self, iter: I) -> Self {
        let mut builder = self.to_builder();
        builder.add_all(iter);
        builder.freeze()
    }

    /// Returns a new map with `key` removed, or a clone of this map if it
    /// was not present.
    #[must_use]
    pub fn remove(&self, key: &K) -> Self {
        let Some(root) = self.root else { return self.clone() };
        let hash = adhash::hash_one(key);
        let mut store = self.store.borrow_mut();
        match remove_recursive(&mut *store, root, hash, key, 0) {
            RemoveOutcome::NotFound => {
                drop(store);
                self.clone()
            }
            RemoveOutcome::Removed { node, adhash_delta } => {
                drop(store);
                Self {
                    store: Rc::clone(&self.store),
                    root: node,
                    size: self.size - 1,
                    adhash: self.adhash.wrapping_sub(adhash_delta),
                }
            }
        }
    }

    /// Returns a new map with every key for which `pred` returns `true`
    /// removed.
    #[must_use]
    pub fn remove_where(&self, mut pred: impl FnMut(&K, &V) -> bool) -> Self {
        let mut builder = self.to_builder();
        builder.remove_where(&mut pred);
        builder.freeze()
    }

    /// Returns a new map with `f` applied to the value at `key`, or a clone
    /// of this map if the key is absent.
    #[must_use]
    pub fn update<F: FnMut(&V) -> V>(&self, key: &K, mut f: F) -> Self {
        let Some(root) = self.root else { return self.clone() };
        let hash = adhash::hash_one(key);
        let mut store = self.store.borrow_mut();
        let mut if_absent: Option<fn() -> V> = None;
        let outcome = update_recursive(&mut *store, root, hash, key, 0, &mut f, &mut if_absent);
        drop(store);
        if outcome.changed {
            Self {
                store: Rc::clone(&self.store),
                root: Some(outcome.node),
                size: self.size,
                adhash: self.adhash.wrapping_add(outcome.adhash_delta),
            }
        } else {
            self.clone()
        }
    }

    /// Returns a new map with `f` applied to the value at `key`, inserting
    /// `if_absent()` when the key is missing.
    #[must_use]
    pub fn update_or_insert<F, A>(&self, key: &K, mut f: F, mut if_absent: A) -> Self
    where
        F: FnMut(&V) -> V,
        A: FnMut() -> V,
    {
        let mut store = self.store.borrow_mut();

        let Some(root) = self.root else {
            let value = if_absent();
            let hash = adhash::hash_one(key);
            let entry = Entry { hash, key: key.clone(), value };
            let (new_root, adhash) = insert_first(&mut *store, entry);
            drop(store);
            return Self { store: Rc::clone(&self.store), root: Some(new_root), size: 1, adhash };
        };

        let hash = adhash::hash_one(key);
        let mut some = Some(if_absent);
        let outcome = update_recursive(&mut *store, root, hash, key, 0, &mut f, &mut some);
        drop(store);
        let size = if outcome.inserted { self.size + 1 } else { self.size };
        Self {
            store: Rc::clone(&self.store),
            root: Some(outcome.node),
            size,
            adhash: self.adhash.wrapping_add(outcome.adhash_delta),
        }
    }

    /// Returns a new map with `f` applied to every value.
    #[must_use]
    pub fn update_all<F: FnMut(&K, &V) -> V>(&self, mut f: F) -> Self {
        let mut builder = self.to_builder();
        builder.update_all(&mut f);
        builder.freeze()
    }

    /// Returns an empty map. Does not reuse this map's arena — it carries
    /// no live entries to share.
    #[must_use]
    pub fn clear(&self) -> Self {
        Self::new()
    }

    /// Returns the value at `key` if present, or `value` otherwise —
    /// without modifying the map. Use [`update_or_insert`](Self::update_or_insert)
    /// for the map-returning form.
    #[must_use]
    pub fn put_if_absent(&self, key: &K, value: V) -> V
    where
        V: Clone,
    {
        self.get(key).unwrap_or(value)
    }

    /// Returns a new map with every `(K, V)` pair replaced by `f`'s result.
    ///
    /// Unlike the other bulk operations this may change the key type,
    /// which is why it gets a dedicated method instead of being expressible
    /// through `Iterator::map` plus `collect`.
    #[must_use]
    pub fn map_entries<K2, V2, F>(&self, mut f: F) -> ChampMap<K2, V2>
    where
        K2: Hash + Eq + Clone,
        V2: Hash + Clone,
        F: FnMut(K, V) -> (K2, V2),
    {
        let mut builder = ChampBuilder::new();
        for (k, v) in self.iter() {
            let (k2, v2) = f(k, v);
            builder.add(k2, v2);
        }
        builder.freeze()
    }
}

fn insert_first<K, V, S: ChampStore<K, V>>(store: &mut S, entry: Entry<K, V>) -> (Idx<Node<K, V>>, u64) {
    let contribution = adhash::entry_adhash(entry.hash, adhash::hash_one(&entry.value));
    let frag = node::fragment(entry.hash, 0);
    let bit = node::mask(frag);
    let data_start = store.alloc_entries(std::iter::once(entry)).expect("single entry");
    let new_node = store.alloc_node(Node::Inner {
        data_map: bit,
        node_map: 0,
        data_start,
        children_start: Idx::from_raw(0),
        adhash: contribution,
    });
    (new_node, contribution)
}

// ---------------------------------------------------------------------------
// Index-based accessors
// ---------------------------------------------------------------------------

impl<K: Clone, V: Clone> ChampMap<K, V> {
    /// Returns the `(key, value)` pair at the given zero-based traversal
    /// position.
    ///
    /// # Errors
    ///
    /// Returns [`ChampError::OutOfRange`] if `index >= len()`.
    pub fn element_at(&self, index: usize) -> Result<(K, V), ChampError> {
        if index >= self.size {
            return Err(ChampError::OutOfRange { index, len: self.size });
        }
        let store = self.store.borrow();
        let mut stack = DfsStack::new(&*store, self.root);
        let mut cursor = 0;
        loop {
            let idx = stack.advance(&*store).expect("index checked against len");
            if cursor == index {
                let e = store.get_entry(idx);
                return Ok((e.key.clone(), e.value.clone()));
            }
            cursor += 1;
        }
    }

    /// Returns the first `(key, value)` pair in traversal order.
    ///
    /// # Errors
    ///
    /// Returns [`ChampError::EmptyCollection`] if the map is empty.
    pub fn first(&self) -> Result<(K, V), ChampError> {
        if self.is_empty() {
            return Err(ChampError::EmptyCollection);
        }
        self.element_at(0)
    }

    /// Returns the last `(key, value)` pair in traversal order.
    ///
    /// # Errors
    ///
    /// Returns [`ChampError::EmptyCollection`] if the map is empty.
    pub fn last(&self) -> Result<(K, V), ChampError> {
        if self.is_empty() {
            return Err(ChampError::EmptyCollection);
        }
        self.element_at(self.size - 1)
    }

    /// Returns the map's only `(key, value)` pair.
    ///
    /// # Errors
    ///
    /// Returns [`ChampError::EmptyCollection`] if empty, or
    /// [`ChampError::AmbiguousSingle`] if it holds more than one entry.
    pub fn single(&self) -> Result<(K, V), ChampError> {
        match self.size {
            0 => Err(ChampError::EmptyCollection),
            1 => self.element_at(0),
            found => Err(ChampError::AmbiguousSingle { found }),
        }
    }

    /// Returns the map's only `(key, value)` pair matching `pred`.
    ///
    /// # Errors
    ///
    /// Returns [`ChampError::EmptyCollection`] if nothing matches, or
    /// [`ChampError::AmbiguousSingle`] if more than one entry matches.
    pub fn single_where(&self, mut pred: impl FnMut(&K, &V) -> bool) -> Result<(K, V), ChampError> {
        let mut matches: Vec<(K, V)> = self.iter().filter(|(k, v)| pred(k, v)).collect();
        match matches.len() {
            0 => Err(ChampError::EmptyCollection),
            1 => Ok(matches.pop().expect("len checked")),
            found => Err(ChampError::AmbiguousSingle { found }),
        }
    }
}

impl<K: Clone, V: Clone> ChampMap<K, V> {
    /// Copies this map's entries into a standard library [`HashMap`](std::collections::HashMap).
    #[must_use]
    pub fn to_hash_map(&self) -> std::collections::HashMap<K, V>
    where
        K: Hash + Eq,
    {
        self.iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Iteration
// ---------------------------------------------------------------------------

impl<K: Clone, V: Clone> ChampMap<K, V> {
    /// Returns an iterator over owned `(K, V)` clones, in trie traversal
    /// order, not insertion order.
    #[must_use]
    pub fn iter(&self) -> Iter<K, V> {
        Iter::new(self)
    }

    /// Returns an iterator over owned key clones.
    #[must_use]
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Returns an iterator over owned value clones.
    #[must_use]
    pub fn values(&self) -> impl Iterator<Item = V> + '_ {
        self.iter().map(|(_, v)| v)
    }
}

/// Cloning iterator over a [`ChampMap`]'s entries.
///
/// Re-borrows the shared arena for the duration of a single `next()` call
/// rather than across the whole iteration, since a `&'a K`/`&'a V` derived
/// from a [`RefCell::borrow`] cannot soundly outlive that borrow without
/// `unsafe`, which this crate forbids.
pub struct Iter<K, V> {
    store: Rc<RefCell<ChampArena<K, V>>>,
    stack: DfsStack<K, V>,
    remaining: usize,
}

impl<K, V> Iter<K, V> {
    fn new(map: &ChampMap<K, V>) -> Self {
        let store = map.store.borrow();
        let stack = DfsStack::new(&*store, map.root);
        drop(store);
        Self { store: Rc::clone(&map.store), stack, remaining: map.size }
    }
}

impl<K: Clone, V: Clone> Iterator for Iter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let store = self.store.borrow();
        let idx = self.stack.advance(&*store)?;
        self.remaining -= 1;
        let e = store.get_entry(idx);
        Some((e.key.clone(), e.value.clone()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Clone, V: Clone> ExactSizeIterator for Iter<K, V> {}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl<K, V> Default for ChampMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for ChampMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChampMap")
            .field("len", &self.size)
            .field("adhash", &format_args!("{:#018x}", self.adhash))
            .finish_non_exhaustive()
    }
}

impl<K: Hash + Eq + Clone, V: Hash + Clone> Extend<(K, V)> for ChampMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        *self = self.add_all(iter);
    }
}

impl<K: Hash + Eq + Clone, V: Hash + Clone> FromIterator<(K, V)> for ChampMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

impl<'a, K: Clone, V: Clone> IntoIterator for &'a ChampMap<K, V> {
    type Item = (K, V);
    type IntoIter = Iter<K, V>;

    fn into_iter(self) -> Iter<K, V> {
        self.iter()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for ChampMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        if self.size != other.size || self.adhash != other.adhash {
            return false;
        }
        if Rc::ptr_eq(&self.store, &other.store) && self.root == other.root {
            return true;
        }
        let a = self.store.borrow();
        let b = other.store.borrow();
        let mut stack = DfsStack::new(&*a, self.root);
        while let Some(idx) = stack.advance(&*a) {
            let e = a.get_entry(idx);
            let Some(other_root) = other.root else { return false };
            let mut probe = DfsStack::new(&*b, Some(other_root));
            let found = loop {
                let Some(oidx) = probe.advance(&*b) else { break false };
                let oe = b.get_entry(oidx);
                if oe.key == e.key && oe.value == e.value {
                    break true;
                }
            };
            if !found {
                return false;
            }
        }
        true
    }
}

impl<K: Hash + Eq, V: Eq> Eq for ChampMap<K, V> {}

impl<K, V> Hash for ChampMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.adhash);
    }
}
