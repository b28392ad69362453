//! Recursive trie operations, one module per verb.
//!
//! Each operation walks the trie from a root [`Idx`](safe_bump::Idx) and
//! returns enough information (new root, `AdHash` delta, whether anything
//! changed) for its caller to splice the result back into a parent node
//! without re-walking the path.

pub mod get;
pub mod insert;
pub mod remove;
pub mod update;
