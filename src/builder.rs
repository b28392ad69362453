//! Transient builders — the owner-mutation path.
//!
//! A [`ChampBuilder`]/[`ChampBuilderSync`] exclusively owns an arena (no
//! `Rc`/`Arc`, nothing else can reach it), so a run of `add`/`remove`/
//! `update` calls mutates in place with `&mut self` and no per-step facade
//! rewrapping. `freeze` consumes the builder and hands its arena to a
//! [`ChampMap`](crate::ChampMap)/[`ChampMapSync`](crate::ChampMapSync) —
//! the Rust compiler statically forbids any further use of the builder
//! after that point, which is the "a stale owner is rejected" rule enforced
//! at compile time instead of by a runtime token check.

use std::fmt;
use std::hash::Hash;
use std::ops;

use safe_bump::Idx;

use crate::adhash;
use crate::arena::ChampArena;
use crate::arena_sync::ChampArenaSync;
use crate::iter::Iter;
use crate::map::ChampMap;
use crate::map_sync::ChampMapSync;
use crate::node::{self, Entry, Node};
use crate::ops::get::get_recursive;
use crate::ops::insert::insert_recursive;
use crate::ops::remove::{RemoveOutcome, remove_recursive};
use crate::ops::update::update_recursive;
use crate::store::ChampStore;

macro_rules! builder_impl {
    ($Builder:ident, $Arena:ty, $Iter:ident) => {
        impl<K, V> $Builder<K, V> {
            /// Creates an empty builder.
            #[must_use]
            pub const fn new() -> Self {
                Self { store: <$Arena>::new(), root: None, size: 0, adhash: 0 }
            }

            /// Returns the number of key-value pairs.
            #[must_use]
            pub const fn len(&self) -> usize {
                self.size
            }

            /// Returns `true` if the builder holds no entries.
            #[must_use]
            pub const fn is_empty(&self) -> bool {
                self.size == 0
            }

            /// Returns the current `AdHash` value.
            #[must_use]
            pub const fn adhash(&self) -> u64 {
                self.adhash
            }

            /// Returns the total number of allocated items in each arena:
            /// `(nodes, entries, children)`.
            #[must_use]
            pub fn arena_len(&self) -> (usize, usize, usize) {
                self.store.arena_len()
            }
        }

        impl<K: Hash + Eq, V> $Builder<K, V> {
            /// Returns a reference to the value associated with `key`.
            #[must_use]
            pub fn get(&self, key: &K) -> Option<&V> {
                let root = self.root?;
                get_recursive(&self.store, root, adhash::hash_one(key), key, 0)
            }

            /// Returns `true` if the builder contains the given key.
            #[must_use]
            pub fn contains_key(&self, key: &K) -> bool {
                self.get(key).is_some()
            }
        }

        impl<K: Hash + Eq + Clone, V: Hash + Clone> $Builder<K, V> {
            /// Adds a key-value pair. Returns `true` if the key was new,
            /// `false` if an existing value was replaced.
            ///
            /// # Panics
            ///
            /// Panics if internal arena allocation returns an unexpected
            /// `None` — unreachable given a non-empty entries/children list.
            pub fn add(&mut self, key: K, value: V) -> bool {
                let hash = adhash::hash_one(&key);
                let entry = Entry { hash, key, value };

                let Some(root) = self.root else {
                    self.insert_first(entry);
                    return true;
                };

                let outcome = insert_recursive(&mut self.store, root, entry, 0);
                self.root = Some(outcome.node);
                self.adhash = self.adhash.wrapping_add(outcome.adhash_delta);
                if outcome.inserted {
                    self.size += 1;
                }
                outcome.inserted
            }

            /// Adds every pair from `iter`.
            pub fn add_all<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
                for (k, v) in iter {
                    self.add(k, v);
                }
            }

            /// Removes a key. Returns `true` if it was present.
            pub fn remove(&mut self, key: &K) -> bool {
                let Some(root) = self.root else {
                    return false;
                };
                let hash = adhash::hash_one(key);
                match remove_recursive(&mut self.store, root, hash, key, 0) {
                    RemoveOutcome::NotFound => false,
                    RemoveOutcome::Removed { node, adhash_delta } => {
                        self.root = node;
                        self.size -= 1;
                        self.adhash = self.adhash.wrapping_sub(adhash_delta);
                        true
                    }
                }
            }

            /// Removes every key for which `pred` returns `true`.
            pub fn remove_where(&mut self, mut pred: impl FnMut(&K, &V) -> bool) {
                let doomed: Vec<K> = self
                    .iter()
                    .filter(|(k, v)| pred(k, v))
                    .map(|(k, _)| k.clone())
                    .collect();
                for key in doomed {
                    self.remove(&key);
                }
            }

            /// Applies `f` to the value at `key` if present. Returns `true`
            /// if the key was found and updated.
            pub fn update<F: FnMut(&V) -> V>(&mut self, key: &K, mut f: F) -> bool {
                let Some(root) = self.root else {
                    return false;
                };
                let hash = adhash::hash_one(key);
                let mut if_absent: Option<fn() -> V> = None;
                let outcome = update_recursive(&mut self.store, root, hash, key, 0, &mut f, &mut if_absent);
                if outcome.changed {
                    self.root = Some(outcome.node);
                    self.adhash = self.adhash.wrapping_add(outcome.adhash_delta);
                }
                outcome.changed
            }

            /// Applies `f` to the value at `key` if present, or inserts
            /// `if_absent()` otherwise.
            pub fn update_or_insert<F, A>(&mut self, key: &K, mut f: F, mut if_absent: A)
            where
                F: FnMut(&V) -> V,
                A: FnMut() -> V,
            {
                let Some(root) = self.root else {
                    let value = if_absent();
                    self.insert_first(Entry { hash: adhash::hash_one(key), key: key.clone(), value });
                    return;
                };
                let hash = adhash::hash_one(key);
                let mut some = Some(if_absent);
                let outcome = update_recursive(&mut self.store, root, hash, key, 0, &mut f, &mut some);
                self.root = Some(outcome.node);
                self.adhash = self.adhash.wrapping_add(outcome.adhash_delta);
                if outcome.inserted {
                    self.size += 1;
                }
            }

            /// Applies `f` to every entry, replacing each value in place.
            pub fn update_all<F: FnMut(&K, &V) -> V>(&mut self, mut f: F) {
                let keys: Vec<K> = self.iter().map(|(k, _)| k.clone()).collect();
                for key in keys {
                    self.update(&key, |v| f(&key, v));
                }
            }

            fn insert_first(&mut self, entry: Entry<K, V>) {
                let value_hash = adhash::hash_one(&entry.value);
                let contribution = adhash::entry_adhash(entry.hash, value_hash);
                let frag = node::fragment(entry.hash, 0);
                let bit = node::mask(frag);
                let data_start = self.store.alloc_entries(std::iter::once(entry)).expect("single entry");
                let new_node = self.store.alloc_node(Node::Inner {
                    data_map: bit,
                    node_map: 0,
                    data_start,
                    children_start: Idx::from_raw(0),
                    adhash: contribution,
                });
                self.root = Some(new_node);
                self.size = 1;
                self.adhash = contribution;
            }
        }

        impl<K, V> $Builder<K, V> {
            /// Returns an iterator over `(&K, &V)` pairs.
            #[must_use]
            pub fn iter(&self) -> Iter<'_, K, V, $Arena> {
                Iter::new(&self.store, self.root, self.size)
            }
        }

        impl<K, V> Default for $Builder<K, V> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<K, V> fmt::Debug for $Builder<K, V> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($Builder))
                    .field("len", &self.size)
                    .field("adhash", &format_args!("{:#018x}", self.adhash))
                    .finish_non_exhaustive()
            }
        }

        impl<K: Hash + Eq + Clone, V: Hash + Clone> Extend<(K, V)> for $Builder<K, V> {
            fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
                self.add_all(iter);
            }
        }

        impl<K: Hash + Eq + Clone, V: Hash + Clone> FromIterator<(K, V)> for $Builder<K, V> {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                let mut builder = Self::new();
                builder.add_all(iter);
                builder
            }
        }

        impl<K: Hash + Eq, V> ops::Index<&K> for $Builder<K, V> {
            type Output = V;

            fn index(&self, key: &K) -> &V {
                self.get(key).expect("key not found")
            }
        }

        impl<'a, K, V> IntoIterator for &'a $Builder<K, V> {
            type Item = (&'a K, &'a V);
            type IntoIter = Iter<'a, K, V, $Arena>;

            fn into_iter(self) -> Iter<'a, K, V, $Arena> {
                self.iter()
            }
        }
    };
}

/// Exclusively-owned transient builder, freezing into a [`ChampMap`].
pub struct ChampBuilder<K, V> {
    store: ChampArena<K, V>,
    root: Option<Idx<Node<K, V>>>,
    size: usize,
    adhash: u64,
}

builder_impl!(ChampBuilder, ChampArena<K, V>, Iter);

impl<K, V> ChampBuilder<K, V> {
    /// Consumes the builder, returning an immutable, shareable
    /// [`ChampMap`] backed by the same arena (moved, not copied).
    #[must_use]
    pub fn freeze(self) -> ChampMap<K, V> {
        ChampMap::from_builder(self.store, self.root, self.size, self.adhash)
    }
}

/// Exclusively-owned transient builder using the thread-safe arena type,
/// freezing into a [`ChampMapSync`].
pub struct ChampBuilderSync<K, V> {
    store: ChampArenaSync<K, V>,
    root: Option<Idx<Node<K, V>>>,
    size: usize,
    adhash: u64,
}

builder_impl!(ChampBuilderSync, ChampArenaSync<K, V>, Iter);

impl<K, V> ChampBuilderSync<K, V> {
    /// Consumes the builder, returning an immutable, shareable, `Send +
    /// Sync` [`ChampMapSync`] backed by the same arena (moved, not
    /// copied).
    #[must_use]
    pub fn freeze(self) -> ChampMapSync<K, V> {
        ChampMapSync::from_builder(self.store, self.root, self.size, self.adhash)
    }
}
