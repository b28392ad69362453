//! Plain-arena-backed storage (single-owner, exclusive access).
//!
//! Used by the transient builders ([`ChampBuilder`](crate::ChampBuilder)),
//! which hold this store behind a plain `&mut`, never behind `Rc`/`Arc` —
//! there is exactly one owner for the whole lifetime of a build, so no
//! interior mutability is needed.

use safe_bump::{Arena, Idx};

use crate::node::{Entry, Node};
use crate::store::ChampStore;

/// Exclusively-owned storage backend using three [`Arena`]s.
pub struct ChampArena<K, V> {
    nodes: Arena<Node<K, V>>,
    entries: Arena<Entry<K, V>>,
    children: Arena<Idx<Node<K, V>>>,
}

impl<K, V> ChampArena<K, V> {
    /// Creates an empty store.
    pub const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            entries: Arena::new(),
            children: Arena::new(),
        }
    }
}

impl<K, V> Default for ChampArena<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> ChampStore<K, V> for ChampArena<K, V> {
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
