//! Shared-arena-backed storage (multi-threaded).
//!
//! Wrapped in `Arc<Mutex<_>>` by [`ChampMapSync`](crate::ChampMapSync) and
//! [`ChampBuilderSync`](crate::ChampBuilderSync) — the arena itself has no
//! opinion about sharing; it just never overwrites an index it has already
//! handed out, which is what lets several facade clones safely observe the
//! same underlying storage.

use safe_bump::{Idx, SharedArena};

use crate::node::{Entry, Node};
use crate::store::ChampStore;

/// Thread-safe storage backend using three [`SharedArena`]s.
pub struct ChampArenaSync<K, V> {
    nodes: SharedArena<Node<K, V>>,
    entries: SharedArena<Entry<K, V>>,
    children: SharedArena<Idx<Node<K, V>>>,
}

impl<K, V> ChampArenaSync<K, V> {
    /// Creates an empty store.
    pub const fn new() -> Self {
        Self {
            nodes: SharedArena::new(),
            entries: SharedArena::new(),
            children: SharedArena::new(),
        }
    }
}

impl<K, V> Default for ChampArenaSync<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ChampStore<K, V> for ChampArenaSync<K, V> {
    fn alloc_node(&mut self, node: Node<K, V>) -> Idx<Node<K, V>> {
        self.nodes.alloc(node)
    }

    fn get_node(&self, idx: Idx<Node<K, V>>) -> &Node<K, V> {
        self.nodes.get(idx)
    }

    fn alloc_entries(
        &mut self,
        iter: impl IntoIterator<Item = Entry<K, V>>,
    ) -> Option<Idx<Entry<K, V>>> {
        self.entries.alloc_extend(iter)
    }

    fn get_entry(&self, idx: Idx<Entry<K, V>>) -> &Entry<K, V> {
        self.entries.get(idx)
    }

    fn alloc_children(
        &mut self,
        iter: impl IntoIterator<Item = Idx<Node<K, V>>>,
    ) -> Option<Idx<Idx<Node<K, V>>>> {
        self.children.alloc_extend(iter)
    }

    fn get_child(&self, idx: Idx<Idx<Node<K, V>>>) -> &Idx<Node<K, V>> {
        self.children.get(idx)
    }

    fn arena_len(&self) -> (usize, usize, usize) {
        (self.nodes.len(), self.entries.len(), self.children.len())
    }
}
