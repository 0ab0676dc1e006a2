//! An ordered index from integer keys to payloads, implemented with an AVL tree.
//!
//! Lookup, insertion and removal stay logarithmic in the number of entries
//! regardless of insertion order. Inserting a key that is already present,
//! and removing or updating a key that is absent, are silent no-ops.

mod error;
mod index;
mod iter;
mod node;

pub use error::ConsistencyError;
pub use index::AvlIndex;
pub use iter::Iter;
pub use node::NodeRef;

/// The key domain of the index.
pub type Key = i32;

#[cfg(test)]
mod proptests;
