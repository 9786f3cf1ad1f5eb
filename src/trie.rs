//! The main radix map implementation.
//!
//! This module contains the `RadixMap` type, which provides the primary API for
//! working with the radix tree: mutation, lookup, prefix queries and the compacted
//! pattern of the stored key set.

use std::fmt;
use std::iter::FromIterator;
use std::mem;

use once_cell::unsync::OnceCell;
use regex::Regex;

use crate::node::{BranchNode, Child};
use crate::pattern::{self, PatternOptions};
use crate::prefix_view::{Iter, Keys, PrefixView, Subtree, Values};
use crate::util::prefix_match;
use crate::Error;

/// A mutable radix tree keyed by strings.
///
/// Edges carry string fragments, so keys sharing a prefix store it once. Besides the
/// usual map operations the whole key set can be rendered as a compact alternation
/// pattern (see [`RadixMap::pattern`]).
///
/// Iteration follows insertion and branching order, not sorted order.
///
/// The map has no internal locking; it is meant to be used from one thread at a time.
pub struct RadixMap<V> {
    /// The root node; never replaced, only mutated
    pub(crate) root: BranchNode<V>,

    /// The number of values stored in the map
    size: usize,

    /// Compacted pattern text, reset by every structural change
    pattern: OnceCell<String>,
}

impl<V> RadixMap<V> {
    /// Creates a new, empty map.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_pattern::RadixMap;
    ///
    /// let map = RadixMap::<i32>::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn new() -> Self {
        RadixMap {
            root: BranchNode::new(),
            size: 0,
            pattern: OnceCell::new(),
        }
    }

    /// Returns the number of values stored in the map.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the map contains no values.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the root node, for consumers that walk the tree themselves.
    pub fn root(&self) -> &BranchNode<V> {
        &self.root
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.root.clear();
        self.size = 0;
        self.pattern.take();
    }

    /// Inserts a key-value pair, returning the previous value of the key, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_pattern::RadixMap;
    ///
    /// let mut map = RadixMap::new();
    /// assert_eq!(map.insert("hello", 1), None);
    /// assert_eq!(map.insert("hello", 2), Some(1));
    /// assert_eq!(map.get("hello"), Some(&2));
    /// ```
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        self.pattern.take();

        let replaced = if key.is_empty() {
            self.root.set_terminal(value)
        } else {
            insert_recursive(&mut self.root, key, value)
        };

        if replaced.is_none() {
            self.size += 1;
        }
        replaced
    }

    /// Inserts or updates a key, returning the map for chaining.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_pattern::RadixMap;
    ///
    /// let mut map = RadixMap::new();
    /// map.set("cat", 1).set("car", 2).set("dog", 3);
    /// assert_eq!(map.len(), 3);
    /// ```
    pub fn set(&mut self, key: &str, value: V) -> &mut Self {
        self.insert(key, value);
        self
    }

    /// Inserts or updates a key with the default value, returning the map for chaining.
    pub fn set_key(&mut self, key: &str) -> &mut Self
    where
        V: Default,
    {
        self.set(key, V::default())
    }

    /// Retrieves a reference to the value stored for the given key, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_pattern::RadixMap;
    ///
    /// let mut map = RadixMap::new();
    /// map.set("hello", 42);
    ///
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("hell"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&V> {
        let mut node = &self.root;
        let mut rest = key;

        loop {
            if rest.is_empty() {
                return node.terminal();
            }

            let idx = node.find_edge(rest)?;
            let label = node.label(idx);
            if !rest.starts_with(label) {
                return None;
            }
            rest = &rest[label.len()..];

            match node.child(idx) {
                Child::Branch(branch) => node = &**branch,
                Child::Leaf(value) => return if rest.is_empty() { Some(value) } else { None },
            }
        }
    }

    /// Retrieves a mutable reference to the value stored for the given key, if any.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut node = &mut self.root;
        let mut rest = key;

        loop {
            if rest.is_empty() {
                return node.terminal_mut();
            }

            let idx = node.find_edge(rest)?;
            let label_len = {
                let label = node.label(idx);
                if !rest.starts_with(label) {
                    return None;
                }
                label.len()
            };
            rest = &rest[label_len..];

            match node.child_mut(idx) {
                Child::Branch(branch) => node = &mut **branch,
                Child::Leaf(value) => return if rest.is_empty() { Some(value) } else { None },
            }
        }
    }

    /// Returns `true` if the map contains a value for the given key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key, returning its value if it was present.
    ///
    /// Branches left with a single entry are collapsed on the way back up, so no
    /// non-branching chain survives the removal.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_pattern::RadixMap;
    ///
    /// let mut map = RadixMap::new();
    /// map.set("hello", 42);
    ///
    /// assert_eq!(map.remove("hello"), Some(42));
    /// assert_eq!(map.remove("hello"), None);
    /// assert!(map.is_empty());
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let removed = if key.is_empty() {
            self.root.take_terminal()
        } else {
            remove_recursive(&mut self.root, key)
        };

        if removed.is_some() {
            self.size -= 1;
            self.pattern.take();
        }
        removed
    }

    /// Removes a key, returning `true` if it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove(key).is_some()
    }

    /// Finds the subtree holding every key that starts with `prefix`.
    ///
    /// The matched prefix of the returned view may be longer than `prefix` when the
    /// query ends in the middle of an edge label.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_pattern::RadixMap;
    ///
    /// let mut map = RadixMap::new();
    /// map.set("hello", 1).set("help", 2);
    ///
    /// let view = map.starts_with("h").unwrap();
    /// assert_eq!(view.prefix(), "hel");
    /// assert_eq!(view.len(), 2);
    /// assert!(map.starts_with("x").is_none());
    /// ```
    pub fn starts_with(&self, prefix: &str) -> Option<PrefixView<'_, V>> {
        let mut node = &self.root;
        let mut matched = 0;

        loop {
            let rest = &prefix[matched..];
            if rest.is_empty() {
                return Some(PrefixView::new(prefix.to_owned(), Subtree::Branch(node)));
            }

            let idx = node.find_edge(rest)?;
            let label = node.label(idx);
            let common = prefix_match(label, rest);

            if common == label.len() {
                matched += common;
                match node.child(idx) {
                    Child::Branch(branch) => node = &**branch,
                    Child::Leaf(value) if matched == prefix.len() => {
                        return Some(PrefixView::new(prefix.to_owned(), Subtree::Leaf(value)));
                    }
                    Child::Leaf(_) => return None,
                }
            } else if common == rest.len() {
                // The prefix ends inside this label
                let mut full = prefix.to_owned();
                full.push_str(&label[common..]);
                return Some(PrefixView::new(full, Subtree::from(node.child(idx))));
            } else {
                return None;
            }
        }
    }

    /// Iterates over the keys starting with `prefix`.
    pub fn keys(&self, prefix: &str) -> Keys<'_, V> {
        Keys::new(self.entries(prefix))
    }

    /// Iterates over the values of the keys starting with `prefix`.
    pub fn values(&self, prefix: &str) -> Values<'_, V> {
        Values::new(self.entries(prefix))
    }

    /// Iterates over the key-value pairs whose key starts with `prefix`.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_pattern::RadixMap;
    ///
    /// let mut map = RadixMap::new();
    /// map.set("cat", 1).set("car", 2).set("dog", 3);
    ///
    /// let entries: Vec<_> = map.entries("ca").collect();
    /// assert_eq!(entries, vec![("cat".to_string(), &1), ("car".to_string(), &2)]);
    /// ```
    pub fn entries(&self, prefix: &str) -> Iter<'_, V> {
        match self.starts_with(prefix) {
            Some(view) => view.into_iter(),
            None => Iter::empty(),
        }
    }

    /// Iterates over all key-value pairs.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(String::new(), Subtree::Branch(&self.root))
    }

    /// Returns the compacted alternation pattern of the stored keys.
    ///
    /// The text is computed on first use and cached until the next change to the key
    /// set. Values do not take part in it.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_pattern::RadixMap;
    ///
    /// let mut map = RadixMap::new();
    /// map.set("cat", 1).set("car", 2).set("dog", 3);
    /// assert_eq!(map.pattern(), "ca(t|r)|dog");
    /// ```
    pub fn pattern(&self) -> &str {
        self.pattern.get_or_init(|| pattern::compact(&self.root))
    }

    /// Compiles the compacted pattern into a regular expression.
    ///
    /// An empty map compiles to a regex that matches nothing, even though its
    /// pattern text is empty.
    pub fn to_pattern(&self, options: &PatternOptions) -> Result<Regex, Error> {
        if self.is_empty() {
            return pattern::compile(pattern::NO_MATCH, options);
        }
        pattern::compile(self.pattern(), options)
    }
}

impl<V: Default> RadixMap<V> {
    /// Creates a map holding each key with the default value.
    ///
    /// # Examples
    ///
    /// ```
    /// use radix_pattern::RadixMap;
    ///
    /// let map: RadixMap<()> = RadixMap::from_keys(vec!["ab", "cb"]);
    /// assert_eq!(map.to_string(), "(a|c)b");
    /// ```
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut map = RadixMap::new();
        for key in keys {
            map.set_key(key.as_ref());
        }
        map
    }
}

fn insert_recursive<V>(node: &mut BranchNode<V>, rest: &str, value: V) -> Option<V> {
    let idx = match node.find_edge(rest) {
        Some(idx) => idx,
        None => {
            node.push_edge(rest.to_owned(), Child::Leaf(value));
            return None;
        }
    };

    let (common, label_len) = {
        let label = node.label(idx);
        (prefix_match(label, rest), label.len())
    };

    if common < label_len {
        // Either the key ends inside the label or both diverge after `common` bytes
        node.split_edge(idx, common, &rest[common..], value);
        return None;
    }

    let suffix = &rest[common..];
    if !suffix.is_empty() && !node.child(idx).is_branch() {
        // A stored key is a strict prefix of the new one
        node.extend_edge(idx, suffix, value);
        return None;
    }

    match node.child_mut(idx) {
        Child::Branch(branch) => {
            if suffix.is_empty() {
                branch.set_terminal(value)
            } else {
                insert_recursive(&mut **branch, suffix, value)
            }
        }
        Child::Leaf(old) => Some(mem::replace(old, value)),
    }
}

fn remove_recursive<V>(node: &mut BranchNode<V>, rest: &str) -> Option<V> {
    let idx = node.find_edge(rest)?;
    let label = node.label(idx);
    if !rest.starts_with(label) {
        return None;
    }
    let suffix = &rest[label.len()..];

    if !node.child(idx).is_branch() {
        if !suffix.is_empty() {
            return None;
        }
        return node.remove_edge(idx).1.into_leaf();
    }

    let removed = match node.child_mut(idx) {
        Child::Branch(branch) => {
            if suffix.is_empty() {
                branch.take_terminal()
            } else {
                remove_recursive(&mut **branch, suffix)
            }
        }
        Child::Leaf(_) => None,
    };

    if removed.is_some() {
        node.collapse_edge(idx);
    }
    removed
}

impl<V> Default for RadixMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> Clone for RadixMap<V> {
    fn clone(&self) -> Self {
        RadixMap {
            root: self.root.clone(),
            size: self.size,
            pattern: self.pattern.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for RadixMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Writes the compacted alternation pattern.
impl<V> fmt::Display for RadixMap<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

// Two maps are equal when they hold the same key-value pairs, whatever the order
impl<V: PartialEq> PartialEq for RadixMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self
                .iter()
                .all(|(key, value)| other.get(&key) == Some(value))
    }
}

impl<V: Eq> Eq for RadixMap<V> {}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for RadixMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = RadixMap::new();
        map.extend(iter);
        map
    }
}

impl<K: AsRef<str>, V> Extend<(K, V)> for RadixMap<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.as_ref(), value);
        }
    }
}

impl<'a, V> IntoIterator for &'a RadixMap<V> {
    type Item = (String, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
