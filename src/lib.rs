//! # Radix Pattern
//!
//! A mutable radix tree keyed by strings that can render its key set as a compact
//! regular expression.
//!
//! This crate provides a radix tree (also known as a compressed trie): edges carry
//! string fragments rather than single characters, so runs of non-branching
//! characters are stored once. Labels are split on `char` boundaries.
//!
//! ## Features
//!
//! - **Map API**: insert, lookup, removal and chainable `set`
//! - **Path compression**: inserts split edges, removals merge them back
//! - **Prefix Views**: iterate over every key starting with a prefix
//! - **Pattern compaction**: the key set as a minimal alternation, factoring out
//!   shared prefixes and shared suffixes, ready to be compiled with `regex`
//!
//! ## Example
//!
//! ```rust
//! use radix_pattern::{PatternOptions, RadixMap};
//!
//! let mut map = RadixMap::new();
//! map.set("cat", 1).set("car", 2).set("dog", 3);
//!
//! // Lookup values
//! assert_eq!(map.get("car"), Some(&2));
//!
//! // Keys under a prefix
//! let keys: Vec<String> = map.keys("ca").collect();
//! assert_eq!(keys, vec!["cat", "car"]);
//!
//! // The key set as a pattern
//! assert_eq!(map.to_string(), "ca(t|r)|dog");
//! let regex = map.to_pattern(&PatternOptions::new().anchored(true)).unwrap();
//! assert!(regex.is_match("dog"));
//! assert!(!regex.is_match("cow"));
//! ```
//!
//! ## Logging
//!
//! With the `tracing` feature enabled, structural edits (edge splits, leaf extensions,
//! collapses) are reported as `trace` events and pattern compilation as a `debug`
//! event, all under the `radix_pattern` target.

pub mod node;
mod pattern;
mod prefix_view;
mod trie;
mod util;

// Re-export public types
pub use crate::node::{BranchNode, Child};
pub use crate::pattern::PatternOptions;
pub use crate::prefix_view::{Iter, Keys, PrefixView, Subtree, Values};
pub use crate::trie::RadixMap;

/// Errors that can occur when turning a map into a compiled pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The compacted pattern was rejected by the regular expression compiler
    Pattern(regex::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Pattern(err) => write!(f, "Invalid pattern: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Pattern(err) => Some(err),
        }
    }
}
