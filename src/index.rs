use std::cmp::{self, Ordering};
use std::fmt;
use std::mem;

use log::{debug, trace};

use crate::error::ConsistencyError;
use crate::iter::Iter;
use crate::node::{self, balance_factor, rotate_left, rotate_right, Link, Node, NodeRef};
use crate::Key;

/// An ordered index from integer keys to payloads, kept height-balanced.
///
/// ```
/// use avl_index::AvlIndex;
/// let mut index = AvlIndex::new();
/// index.insert(2, String::from("two"));
/// index.insert(1, String::from("one"));
/// assert_eq!(index.get(1).map(String::as_str), Some("one"));
/// index.remove(1);
/// assert!(index.get(1).is_none());
/// ```
#[derive(Clone)]
pub struct AvlIndex<V = String> {
    root: Link<V>,
    num_nodes: usize,
}

impl<V> AvlIndex<V> {
    /// Creates an empty index.
    /// No memory is allocated until the first entry is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the index contains no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of entries in the index.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree, 0 if empty.
    pub fn height(&self) -> usize {
        node::height(&self.root)
    }

    /// Clears the index, deallocating all memory.
    pub fn clear(&mut self) {
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns a read-only view of the root node, if any.
    pub fn root(&self) -> Option<NodeRef<'_, V>> {
        self.root.as_deref().map(NodeRef::new)
    }

    /// Returns a reference to the payload stored under the key.
    pub fn get(&self, key: Key) -> Option<&V> {
        self.find(key).map(|node| &node.value)
    }

    /// Returns the key-value pair stored under the key.
    pub fn get_key_value(&self, key: Key) -> Option<(Key, &V)> {
        self.find(key).map(|node| (node.key, &node.value))
    }

    /// Returns a mutable reference to the payload stored under the key.
    pub fn get_mut(&mut self, key: Key) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Equal => return Some(&mut node.value),
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
            };
        }
        None
    }

    /// Returns true if the index contains the key.
    pub fn contains_key(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Returns the entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(Key, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((node.key, &node.value))
    }

    /// Returns the entry with the largest key.
    pub fn last_key_value(&self) -> Option<(Key, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((node.key, &node.value))
    }

    /// Inserts a key-value pair.
    /// Returns false, leaving the stored payload untouched, if the key is already present.
    pub fn insert(&mut self, key: Key, value: V) -> bool {
        let mut inserted = false;
        self.root = Some(Self::insert_node(self.root.take(), key, value, &mut inserted));
        if inserted {
            self.num_nodes += 1;
        } else {
            debug!("key {} already present, insert ignored", key);
        }
        inserted
    }

    /// Replaces the payload stored under the key. The tree shape is not touched.
    /// Returns false if the key is not present.
    pub fn update(&mut self, key: Key, value: V) -> bool {
        match self.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => {
                debug!("key {} not present, update ignored", key);
                false
            }
        }
    }

    /// Removes a key from the index.
    /// Returns the payload if the key was previously in the index.
    pub fn remove(&mut self, key: Key) -> Option<V> {
        let (root, removed) = Self::remove_node(self.root.take(), key);
        self.root = root;
        match removed {
            Some((removed_key, value)) => {
                debug_assert_eq!(removed_key, key);
                debug_assert!(self.num_nodes >= 1);
                self.num_nodes -= 1;
                debug_assert!(self.get(key).is_none());
                Some(value)
            }
            None => {
                debug!("key {} not present, remove ignored", key);
                None
            }
        }
    }

    /// Returns the first `limit` entries in ascending key order,
    /// or all entries if there are fewer.
    pub fn bounded_in_order(&self, limit: usize) -> Vec<(Key, &V)> {
        let mut entries = Vec::with_capacity(cmp::min(limit, self.num_nodes));
        let mut remaining = limit;
        Self::collect_in_order(&self.root, &mut remaining, &mut entries);
        entries
    }

    /// Gets an iterator over the entries of the index, sorted by key.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.root, self.num_nodes)
    }

    /// Returns true if no node's subtree heights differ by more than one.
    /// Relies on the cached heights; see [`validate`](Self::validate) for a full check.
    pub fn is_balanced(&self) -> bool {
        Self::subtree_is_balanced(&self.root)
    }

    /// Verifies key order, cached heights, balance and entry count.
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        let mut previous = None;
        let mut counted = 0;
        Self::validate_subtree(&self.root, &mut previous, &mut counted)?;
        if counted != self.num_nodes {
            return Err(ConsistencyError::Length {
                reported: self.num_nodes,
                counted,
            });
        }
        Ok(())
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        if let Err(err) = self.validate() {
            panic!("inconsistent index: {}", err);
        }
    }

    fn find(&self, key: Key) -> Option<&Node<V>> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(&node.key) {
                Ordering::Equal => break,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        current
    }

    fn insert_node(link: Link<V>, key: Key, value: V, inserted: &mut bool) -> Box<Node<V>> {
        let mut node = match link {
            None => {
                *inserted = true;
                return Node::leaf(key, value);
            }
            Some(node) => node,
        };
        match key.cmp(&node.key) {
            Ordering::Less => {
                node.left = Some(Self::insert_node(node.left.take(), key, value, inserted));
            }
            Ordering::Greater => {
                node.right = Some(Self::insert_node(node.right.take(), key, value, inserted));
            }
            Ordering::Equal => return node,
        }
        if !*inserted {
            return node;
        }
        Self::rebalance_inserted(node, key)
    }

    /// Restores balance at `node` after `key` was inserted below it.
    /// The side of the child the new key went to picks single or double rotation.
    fn rebalance_inserted(mut node: Box<Node<V>>, key: Key) -> Box<Node<V>> {
        node.adjust_height();
        let balance = node.balance_factor();
        if balance > 1 {
            let Some(left_key) = node.left.as_ref().map(|left| left.key) else {
                return node;
            };
            if key < left_key {
                trace!("left-left case at {}", node.key);
                return rotate_right(node);
            }
            if key > left_key {
                trace!("left-right case at {}", node.key);
                node.left = node.left.take().map(rotate_left);
                return rotate_right(node);
            }
        } else if balance < -1 {
            let Some(right_key) = node.right.as_ref().map(|right| right.key) else {
                return node;
            };
            if key > right_key {
                trace!("right-right case at {}", node.key);
                return rotate_left(node);
            }
            if key < right_key {
                trace!("right-left case at {}", node.key);
                node.right = node.right.take().map(rotate_right);
                return rotate_left(node);
            }
        }
        node
    }

    fn remove_node(link: Link<V>, key: Key) -> (Link<V>, Option<(Key, V)>) {
        let Some(mut node) = link else {
            return (None, None);
        };
        let removed = match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, removed) = Self::remove_node(node.left.take(), key);
                node.left = left;
                removed
            }
            Ordering::Greater => {
                let (right, removed) = Self::remove_node(node.right.take(), key);
                node.right = right;
                removed
            }
            Ordering::Equal => match (node.left.take(), node.right.take()) {
                (None, None) => {
                    let Node { key, value, .. } = *node;
                    return (None, Some((key, value)));
                }
                (Some(child), None) | (None, Some(child)) => {
                    let old = mem::replace(&mut node, child);
                    let Node { key, value, .. } = *old;
                    Some((key, value))
                }
                (Some(left), Some(right)) => {
                    // Slide the in-order successor's entry into this node,
                    // then drop the successor from the right subtree.
                    let successor_key = right.min_key();
                    let (right, successor) = Self::remove_node(Some(right), successor_key);
                    node.left = Some(left);
                    node.right = right;
                    successor.map(|(key, value)| {
                        (
                            mem::replace(&mut node.key, key),
                            mem::replace(&mut node.value, value),
                        )
                    })
                }
            },
        };
        (Some(Self::rebalance_removed(node)), removed)
    }

    /// Restores balance at `node` after a removal below it.
    /// Ties (child balance factor 0) resolve to a single rotation.
    fn rebalance_removed(mut node: Box<Node<V>>) -> Box<Node<V>> {
        node.adjust_height();
        let balance = node.balance_factor();
        if balance > 1 {
            if balance_factor(&node.left) >= 0 {
                trace!("left-left case at {}", node.key);
            } else {
                trace!("left-right case at {}", node.key);
                node.left = node.left.take().map(rotate_left);
            }
            return rotate_right(node);
        }
        if balance < -1 {
            if balance_factor(&node.right) <= 0 {
                trace!("right-right case at {}", node.key);
            } else {
                trace!("right-left case at {}", node.key);
                node.right = node.right.take().map(rotate_right);
            }
            return rotate_left(node);
        }
        node
    }

    // Returns the number of nodes visited.
    fn collect_in_order<'a>(
        link: &'a Link<V>,
        remaining: &mut usize,
        entries: &mut Vec<(Key, &'a V)>,
    ) -> usize {
        let Some(node) = link.as_deref() else {
            return 0;
        };
        if *remaining == 0 {
            return 0;
        }
        let mut visited = 1 + Self::collect_in_order(&node.left, remaining, entries);
        if *remaining > 0 {
            entries.push((node.key, &node.value));
            *remaining -= 1;
        }
        visited += Self::collect_in_order(&node.right, remaining, entries);
        visited
    }

    fn subtree_is_balanced(link: &Link<V>) -> bool {
        match link {
            None => true,
            Some(node) => {
                node.balance_factor().abs() <= 1
                    && Self::subtree_is_balanced(&node.left)
                    && Self::subtree_is_balanced(&node.right)
            }
        }
    }

    // Returns the recomputed height of the subtree.
    fn validate_subtree(
        link: &Link<V>,
        previous: &mut Option<Key>,
        counted: &mut usize,
    ) -> Result<usize, ConsistencyError> {
        let Some(node) = link.as_deref() else {
            return Ok(0);
        };

        let left_height = Self::validate_subtree(&node.left, previous, counted)?;

        if let Some(previous) = *previous {
            if previous >= node.key {
                return Err(ConsistencyError::Order {
                    previous,
                    key: node.key,
                });
            }
        }
        *previous = Some(node.key);
        *counted += 1;

        let right_height = Self::validate_subtree(&node.right, previous, counted)?;

        let expected = 1 + cmp::max(left_height, right_height);
        if node.height != expected {
            return Err(ConsistencyError::StaleHeight {
                key: node.key,
                cached: node.height,
                expected,
            });
        }

        let balance_factor = left_height as isize - right_height as isize;
        if balance_factor.abs() > 1 {
            return Err(ConsistencyError::Unbalanced {
                key: node.key,
                balance_factor,
            });
        }

        Ok(expected)
    }
}

impl<V> Default for AvlIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for AvlIndex<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a AvlIndex<V> {
    type Item = (Key, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V> FromIterator<(Key, V)> for AvlIndex<V> {
    fn from_iter<I: IntoIterator<Item = (Key, V)>>(iter: I) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl<V> Extend<(Key, V)> for AvlIndex<V> {
    fn extend<I: IntoIterator<Item = (Key, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
