//! Error taxonomy for the index-based and single-element accessors.
//!
//! Plain lookup (`get`) stays `Option`-shaped — absence is routine, not
//! exceptional. These variants cover the handful of facade operations that
//! have no sensible `None` answer: an out-of-range positional index, an
//! empty collection where exactly one element was expected, or more than
//! one match for a predicate that was supposed to pick a single element.

use thiserror::Error;

/// Errors produced by `champ_map`'s index-based and single-element
/// accessors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChampError {
    /// `element_at(index)` was called with an index `>= len()`.
    #[error("index {index} out of range for a map of length {len}")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// The map's length at the time of the call.
        len: usize,
    },

    /// `first()`, `last()`, or `single()` was called on an empty map.
    #[error("operation requires a non-empty map")]
    EmptyCollection,

    /// `single()` or `single_where(pred)` matched more than one entry.
    #[error("expected exactly one matching entry, found {found}")]
    AmbiguousSingle {
        /// The number of matching entries actually found.
        found: usize,
    },
}
