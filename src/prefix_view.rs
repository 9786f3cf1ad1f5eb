//! Prefix view into a radix map.
//!
//! This module provides the `PrefixView` type returned by
//! [`RadixMap::starts_with`](crate::RadixMap::starts_with), and the depth-first
//! iterators used for all prefix-scoped reads.

use std::fmt;

use crate::node::{BranchNode, Child};
use crate::pattern;

/// The part of the tree reached by a prefix: a branch or a single stored value.
#[derive(Debug)]
pub enum Subtree<'a, V> {
    Branch(&'a BranchNode<V>),
    Leaf(&'a V),
}

impl<'a, V> Clone for Subtree<'a, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, V> Copy for Subtree<'a, V> {}

impl<'a, V> From<&'a Child<V>> for Subtree<'a, V> {
    fn from(child: &'a Child<V>) -> Self {
        match child {
            Child::Leaf(value) => Subtree::Leaf(value),
            Child::Branch(branch) => Subtree::Branch(&**branch),
        }
    }
}

/// A view of every key that starts with a given prefix.
///
/// The view borrows the map, so the map cannot change while the view (or any
/// iterator created from it) is alive.
///
/// # Examples
///
/// ```
/// use radix_pattern::RadixMap;
///
/// let mut map = RadixMap::new();
/// map.set("hello", 1).set("help", 2).set("world", 3);
///
/// let view = map.starts_with("hel").unwrap();
/// assert_eq!(view.len(), 2);
///
/// let keys: Vec<String> = view.keys().collect();
/// assert_eq!(keys, vec!["hello", "help"]);
/// ```
pub struct PrefixView<'a, V> {
    /// The prefix actually matched; may extend past the query to an edge boundary
    prefix: String,

    /// The subtree holding the keys under the prefix
    subtree: Subtree<'a, V>,
}

impl<'a, V> PrefixView<'a, V> {
    pub(crate) fn new(prefix: String, subtree: Subtree<'a, V>) -> Self {
        PrefixView { prefix, subtree }
    }

    /// Returns the matched prefix.
    ///
    /// When the query ended in the middle of an edge label this is the query extended
    /// to the end of that label; every key of the view starts with it.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the subtree reached by the prefix.
    pub fn subtree(&self) -> Subtree<'a, V> {
        self.subtree
    }

    /// Returns the number of entries in this view.
    pub fn len(&self) -> usize {
        match self.subtree {
            Subtree::Branch(node) => node.subtree_size(),
            Subtree::Leaf(_) => 1,
        }
    }

    /// Returns whether this view is empty (contains no entries).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an iterator over the key-value pairs in this view.
    pub fn iter(&self) -> Iter<'a, V> {
        Iter::new(self.prefix.clone(), self.subtree)
    }

    /// Returns an iterator over the keys in this view.
    pub fn keys(&self) -> Keys<'a, V> {
        Keys::new(self.iter())
    }

    /// Returns an iterator over the values in this view.
    pub fn values(&self) -> Values<'a, V> {
        Values::new(self.iter())
    }

    /// Returns the compacted alternation pattern of the keys in this view.
    ///
    /// ```
    /// use radix_pattern::RadixMap;
    ///
    /// let mut map = RadixMap::new();
    /// map.set("cat", 1).set("car", 2).set("dog", 3);
    ///
    /// assert_eq!(map.starts_with("c").unwrap().pattern(), "ca(t|r)");
    /// ```
    pub fn pattern(&self) -> String {
        pattern::compact_subtree(&self.prefix, self.subtree)
    }
}

impl<'a, V: fmt::Debug> fmt::Debug for PrefixView<'a, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixView")
            .field("prefix", &self.prefix)
            .field("subtree", &self.subtree)
            .finish()
    }
}

impl<'a, V> IntoIterator for PrefixView<'a, V> {
    type Item = (String, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        Iter::new(self.prefix, self.subtree)
    }
}

impl<'v, 'a, V> IntoIterator for &'v PrefixView<'a, V> {
    type Item = (String, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One branch being walked: the key prefix reaching it and what is left to visit.
struct Frame<'a, V> {
    prefix: String,
    terminal: Option<&'a V>,
    edges: std::slice::Iter<'a, (String, Child<V>)>,
}

impl<'a, V> Frame<'a, V> {
    fn new(prefix: String, node: &'a BranchNode<V>) -> Self {
        Frame {
            prefix,
            terminal: node.terminal(),
            edges: node.edges(),
        }
    }
}

/// Depth-first iterator over key-value pairs.
///
/// Keys are rebuilt from the edge labels on the way down. A node's own value comes
/// before the keys extending it; siblings follow edge order.
pub struct Iter<'a, V> {
    /// A lone value reached directly by the prefix
    pending: Option<(String, &'a V)>,

    /// Branches being walked, innermost last
    stack: Vec<Frame<'a, V>>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(prefix: String, subtree: Subtree<'a, V>) -> Self {
        match subtree {
            Subtree::Branch(node) => Iter {
                pending: None,
                stack: vec![Frame::new(prefix, node)],
            },
            Subtree::Leaf(value) => Iter {
                pending: Some((prefix, value)),
                stack: Vec::new(),
            },
        }
    }

    pub(crate) fn empty() -> Self {
        Iter {
            pending: None,
            stack: Vec::new(),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (String, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entry) = self.pending.take() {
            return Some(entry);
        }

        loop {
            let frame = self.stack.last_mut()?;

            if let Some(value) = frame.terminal.take() {
                return Some((frame.prefix.clone(), value));
            }

            match frame.edges.next() {
                Some((label, Child::Leaf(value))) => {
                    let mut key = frame.prefix.clone();
                    key.push_str(label);
                    return Some((key, value));
                }
                Some((label, Child::Branch(branch))) => {
                    let mut prefix = frame.prefix.clone();
                    prefix.push_str(label);
                    self.stack.push(Frame::new(prefix, &**branch));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Depth-first iterator over keys.
pub struct Keys<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Keys<'a, V> {
    pub(crate) fn new(inner: Iter<'a, V>) -> Self {
        Keys { inner }
    }
}

impl<'a, V> Iterator for Keys<'a, V> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }
}

/// Depth-first iterator over values.
pub struct Values<'a, V> {
    inner: Iter<'a, V>,
}

impl<'a, V> Values<'a, V> {
    pub(crate) fn new(inner: Iter<'a, V>) -> Self {
        Values { inner }
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }
}
