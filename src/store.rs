//! Storage abstraction for CHAMP trie operations.

use safe_bump::Idx;

use crate::node::{Entry, Node};

/// Storage backend for CHAMP operations.
///
/// Abstracts over a plain [`Arena`](safe_bump::Arena)-backed
/// [`ChampArena`](crate::arena::ChampArena) (exclusively owned, used by the
/// transient builders) and a lock-protected
/// [`ChampArenaSync`](crate::arena_sync::ChampArenaSync) (shared across a
/// persistent `Sync` facade's clones).
///
/// The store is append-only: nothing it hands out an [`Idx`] for is ever
/// removed or overwritten. That is what lets a persistent facade clone
/// cheaply (copy a root index, clone a handle to the store) while every
/// previously-returned facade value keeps observing its own unchanged
/// subtree.
pub trait ChampStore<K, V> {
    /// Allocates a single node, returning its index.
    fn alloc_node(&mut self, node: Node<K, V>) -> Idx<Node<K, V>>;

    /// Returns a reference to the node at `idx`.
    fn get_node(&self, idx: Idx<Node<K, V>>) -> &Node<K, V>;

    /// Allocates a contiguous block of entries, returning the index of the
    /// first one. Returns `None` if the iterator is empty.
    fn alloc_entries(
        &mut self,
        iter: impl IntoIterator<Item = Entry<K, V>>,
    ) -> Option<Idx<Entry<K, V>>>;

    /// Returns a reference to the entry at `idx`.
    fn get_entry(&self, idx: Idx<Entry<K, V>>) -> &Entry<K, V>;

    /// Allocates a contiguous block of child node indices, returning the
    /// index of the first one. Returns `None` if the iterator is empty.
    fn alloc_children(
        &mut self,
        iter: impl IntoIterator<Item = Idx<Node<K, V>>>,
    ) -> Option<Idx<Idx<Node<K, V>>>>;

    /// Returns a reference to the child index at `idx`.
    fn get_child(&self, idx: Idx<Idx<Node<K, V>>>) -> &Idx<Node<K, V>>;

    /// Returns the total number of allocated items in each arena:
    /// `(nodes, entries, children)`.
    ///
    /// Includes dead COW copies left behind by earlier versions — reflects
    /// true memory footprint, not live entry count.
    fn arena_len(&self) -> (usize, usize, usize);
}
