use std::cmp;

use log::trace;

use crate::Key;

pub(crate) type Link<V> = Option<Box<Node<V>>>;

#[derive(Clone)]
pub(crate) struct Node<V> {
    pub(crate) key: Key,
    pub(crate) value: V,
    pub(crate) left: Link<V>,
    pub(crate) right: Link<V>,
    pub(crate) height: usize,
}

impl<V> Node<V> {
    /// Creates a detached leaf.
    pub(crate) fn leaf(key: Key, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// Recomputes the cached height from the (already correct) child heights.
    /// Must run right after a child slot is reassigned.
    pub(crate) fn adjust_height(&mut self) {
        self.height = 1 + cmp::max(height(&self.left), height(&self.right));
    }

    /// Height difference between left and right subtree.
    /// Positive means left-heavy.
    pub(crate) fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }

    /// Key of the leftmost node, i.e. the smallest key in this subtree.
    pub(crate) fn min_key(&self) -> Key {
        let mut current = self;
        while let Some(left) = current.left.as_deref() {
            current = left;
        }
        current.key
    }
}

/// Cached height of a subtree, 0 if absent. Never recurses.
pub(crate) fn height<V>(link: &Link<V>) -> usize {
    match link {
        None => 0,
        Some(node) => node.height,
    }
}

pub(crate) fn balance_factor<V>(link: &Link<V>) -> isize {
    match link {
        None => 0,
        Some(node) => node.balance_factor(),
    }
}

//     y          x
//    / \        / \
//   x   c  ->  a   y
//  / \            / \
// a   b          b   c
pub(crate) fn rotate_right<V>(mut y: Box<Node<V>>) -> Box<Node<V>> {
    debug_assert!(y.left.is_some(), "rotate right at {} without left child", y.key);
    if let Some(mut x) = y.left.take() {
        trace!("rotate right: {} becomes parent of {}", x.key, y.key);
        y.left = x.right.take();
        y.adjust_height();
        x.right = Some(y);
        x.adjust_height();
        return x;
    }
    y
}

//   x              y
//  / \            / \
// a   y    ->    x   c
//    / \        / \
//   b   c      a   b
pub(crate) fn rotate_left<V>(mut x: Box<Node<V>>) -> Box<Node<V>> {
    debug_assert!(x.right.is_some(), "rotate left at {} without right child", x.key);
    if let Some(mut y) = x.right.take() {
        trace!("rotate left: {} becomes parent of {}", y.key, x.key);
        x.right = y.left.take();
        x.adjust_height();
        y.left = Some(x);
        y.adjust_height();
        return y;
    }
    x
}

/// A read-only view of one node, for callers that need to walk the tree shape
/// (e.g. to print it) without being able to modify it.
pub struct NodeRef<'a, V> {
    node: &'a Node<V>,
}

impl<'a, V> NodeRef<'a, V> {
    pub(crate) fn new(node: &'a Node<V>) -> Self {
        Self { node }
    }

    pub fn key(&self) -> Key {
        self.node.key
    }

    pub fn value(&self) -> &'a V {
        &self.node.value
    }

    /// Height of the subtree rooted here; 1 for a leaf.
    pub fn height(&self) -> usize {
        self.node.height
    }

    pub fn balance_factor(&self) -> isize {
        self.node.balance_factor()
    }

    pub fn left(&self) -> Option<NodeRef<'a, V>> {
        self.node.left.as_deref().map(NodeRef::new)
    }

    pub fn right(&self) -> Option<NodeRef<'a, V>> {
        self.node.right.as_deref().map(NodeRef::new)
    }
}

impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeRef<'_, V> {}
