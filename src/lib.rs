//! Persistent hash map based on CHAMP.
//!
//! CHAMP (Compressed Hash-Array Mapped Prefix-tree) is a refined HAMT that
//! guarantees **canonical form**: the same set of key-value pairs always
//! produces the same trie structure, regardless of insertion order.
//!
//! # Key properties
//!
//! - **Canonical form**: same contents = same structure
//! - **O(1) structural equality**: via incrementally maintained `AdHash`
//! - **COW structural sharing**: cheap copy, mutate-on-write
//! - **Zero `unsafe`**: enforced by `#![forbid(unsafe_code)]`
//!
//! # References
//!
//! - Steindorfer & Vinju, 2015 — "Optimizing Hash-Array Mapped Tries
//!   for Fast and Lean Immutable JVM Collections", OOPSLA 2015
//! - Bagwell, 2001 — "Ideal Hash Trees"

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod adhash;
pub mod error;
pub mod iter;
pub mod node;
pub mod store;

mod arena;
mod arena_sync;
mod builder;
mod map;
mod map_sync;
mod ops;

#[cfg(test)]
mod tests;

pub use builder::{ChampBuilder, ChampBuilderSync};
pub use error::ChampError;
pub use map::{ChampMap, Iter};
pub use map_sync::{ChampMapSync, SyncIter};
