//! Branch nodes of the radix map.
//!
//! A `BranchNode` is an ordered list of labelled edges plus an optional sentinel
//! value. Each edge leads either to a stored value (`Child::Leaf`) or to another
//! `BranchNode` (`Child::Branch`). The sentinel holds the value of the key that ends
//! exactly at the node, and is only needed when that key also has extensions.
//!
//! Nodes are exclusively owned by their parent. Structural edits take an edge out,
//! build the new shape and install it back at the same position.

use std::mem;

use crate::util::trace_edit;

/// A child of a `BranchNode`: either a stored value or a nested branch.
#[derive(Debug, Clone, PartialEq)]
pub enum Child<V> {
    /// A stored value; the key ends with the edge leading here.
    Leaf(V),
    /// A nested branch sharing the edge label as common prefix.
    Branch(Box<BranchNode<V>>),
}

impl<V> Child<V> {
    /// Returns whether this child is a nested branch.
    pub fn is_branch(&self) -> bool {
        matches!(self, Child::Branch(_))
    }

    /// Returns the nested branch, if any.
    pub fn as_branch(&self) -> Option<&BranchNode<V>> {
        match self {
            Child::Branch(branch) => Some(&**branch),
            Child::Leaf(_) => None,
        }
    }

    /// Returns the stored value, if this child is a leaf.
    pub fn as_leaf(&self) -> Option<&V> {
        match self {
            Child::Leaf(value) => Some(value),
            Child::Branch(_) => None,
        }
    }

    pub(crate) fn into_leaf(self) -> Option<V> {
        match self {
            Child::Leaf(value) => Some(value),
            Child::Branch(_) => None,
        }
    }

    /// Views the child as a branch: a leaf becomes a node holding only a sentinel.
    pub(crate) fn into_branch(self) -> BranchNode<V> {
        match self {
            Child::Leaf(value) => BranchNode {
                terminal: Some(value),
                edges: Vec::new(),
            },
            Child::Branch(branch) => *branch,
        }
    }
}

/// Interior node of the radix map.
///
/// Sibling labels never share a leading `char` and are never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchNode<V> {
    /// Value of the key ending exactly at this node (the sentinel entry)
    terminal: Option<V>,

    /// Labelled edges in insertion order
    edges: Vec<(String, Child<V>)>,
}

impl<V> BranchNode<V> {
    /// Creates a new empty node.
    pub fn new() -> Self {
        BranchNode {
            terminal: None,
            edges: Vec::new(),
        }
    }

    /// Number of entries in this node, counting the sentinel.
    pub fn len(&self) -> usize {
        self.edges.len() + usize::from(self.terminal.is_some())
    }

    /// Returns whether the node has neither a sentinel nor edges.
    pub fn is_empty(&self) -> bool {
        self.terminal.is_none() && self.edges.is_empty()
    }

    /// The sentinel value: the value of the prefix that reaches this node.
    pub fn terminal(&self) -> Option<&V> {
        self.terminal.as_ref()
    }

    /// Returns whether the prefix reaching this node is itself a stored key.
    pub fn has_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// The labelled edges of this node, in order.
    pub fn edges(&self) -> std::slice::Iter<'_, (String, Child<V>)> {
        self.edges.iter()
    }

    /// Returns the number of values stored in this subtree
    pub fn subtree_size(&self) -> usize {
        let mut count = usize::from(self.terminal.is_some());

        for (_, child) in &self.edges {
            count += match child {
                Child::Leaf(_) => 1,
                Child::Branch(branch) => branch.subtree_size(),
            };
        }

        count
    }

    pub(crate) fn terminal_mut(&mut self) -> Option<&mut V> {
        self.terminal.as_mut()
    }

    pub(crate) fn set_terminal(&mut self, value: V) -> Option<V> {
        self.terminal.replace(value)
    }

    pub(crate) fn take_terminal(&mut self) -> Option<V> {
        self.terminal.take()
    }

    /// Finds the only edge that can share a prefix with `rest`.
    pub(crate) fn find_edge(&self, rest: &str) -> Option<usize> {
        let first = rest.chars().next()?;
        self.edges.iter().position(|(label, _)| label.starts_with(first))
    }

    pub(crate) fn label(&self, idx: usize) -> &str {
        &self.edges[idx].0
    }

    pub(crate) fn child(&self, idx: usize) -> &Child<V> {
        &self.edges[idx].1
    }

    pub(crate) fn child_mut(&mut self, idx: usize) -> &mut Child<V> {
        &mut self.edges[idx].1
    }

    pub(crate) fn push_edge(&mut self, label: String, child: Child<V>) {
        debug_assert!(!label.is_empty());
        debug_assert!(self.find_edge(&label).is_none());
        self.edges.push((label, child));
    }

    pub(crate) fn remove_edge(&mut self, idx: usize) -> (String, Child<V>) {
        self.edges.remove(idx)
    }

    pub(crate) fn clear(&mut self) {
        self.terminal = None;
        self.edges.clear();
    }

    /// Splits the label of edge `idx` after `at` bytes.
    ///
    /// The head of the label leads to a new branch holding the tail of the old label
    /// and `value`: as sentinel when `rest` is empty, otherwise under the edge `rest`.
    pub(crate) fn split_edge(&mut self, idx: usize, at: usize, rest: &str, value: V) {
        let (mut label, child) = self.edges.remove(idx);
        let tail = label.split_off(at);
        trace_edit!(head = %label, tail = %tail, rest = %rest, "split edge");

        let mut branch = BranchNode::new();
        branch.edges.push((tail, child));
        if rest.is_empty() {
            branch.terminal = Some(value);
        } else {
            branch.edges.push((rest.to_owned(), Child::Leaf(value)));
        }

        self.edges
            .insert(idx, (label, Child::Branch(Box::new(branch))));
    }

    /// Extends the stored key of edge `idx` with `rest`, which must not be empty.
    ///
    /// A leaf turns into a branch with the old value as sentinel.
    pub(crate) fn extend_edge(&mut self, idx: usize, rest: &str, value: V) {
        let slot = &mut self.edges[idx].1;
        let old = mem::replace(slot, Child::Branch(Box::new(BranchNode::new())));
        trace_edit!(label = %self.edges[idx].0, rest = %rest, "extend leaf");

        let mut branch = old.into_branch();
        branch.push_edge(rest.to_owned(), Child::Leaf(value));
        self.edges[idx].1 = Child::Branch(Box::new(branch));
    }

    /// Collapses the branch under edge `idx` if it has a single entry left.
    ///
    /// A lone sentinel replaces the branch as a bare leaf; a lone edge is merged
    /// into the edge above by concatenating the labels.
    pub(crate) fn collapse_edge(&mut self, idx: usize) {
        match &self.edges[idx].1 {
            Child::Branch(branch) if branch.len() <= 1 => {}
            _ => return,
        }

        let (mut label, child) = self.edges.remove(idx);
        let BranchNode {
            terminal,
            mut edges,
        } = child.into_branch();

        let replacement = match (terminal, edges.pop()) {
            (Some(value), _) => Child::Leaf(value),
            (None, Some((tail, grandchild))) => {
                label.push_str(&tail);
                grandchild
            }
            (None, None) => {
                debug_assert!(false, "collapsing an empty branch under {:?}", label);
                return;
            }
        };
        trace_edit!(label = %label, "collapse edge");

        self.edges.insert(idx, (label, replacement));
    }
}

impl<V> Default for BranchNode<V> {
    fn default() -> Self {
        Self::new()
    }
}
