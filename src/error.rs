use thiserror::Error;

use crate::Key;

/// A violated structural invariant, as reported by [`AvlIndex::validate`].
///
/// A correct index never produces one of these; seeing one means the tree
/// has been corrupted.
///
/// [`AvlIndex::validate`]: crate::AvlIndex::validate
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("key {key} follows {previous} in order but is not greater")]
    Order { previous: Key, key: Key },
    #[error("node {key} caches height {cached}, expected {expected}")]
    StaleHeight {
        key: Key,
        cached: usize,
        expected: usize,
    },
    #[error("node {key} is out of balance (balance factor {balance_factor})")]
    Unbalanced { key: Key, balance_factor: isize },
    #[error("index reports {reported} entries but holds {counted}")]
    Length { reported: usize, counted: usize },
}
