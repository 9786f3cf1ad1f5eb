//! Compaction of a key set into an alternation pattern.
//!
//! Every branch node becomes a group of alternatives: leaves contribute their label,
//! nested branches their label followed by the group of the nested node. A node
//! holding a sentinel is optional and gets a `?` quantifier. Before that, the leaf
//! labels of a node are checked for shared suffixes by loading them, reversed, into
//! an auxiliary map; shared suffixes are then factored out (`ab|cb` becomes `(a|c)b`).
//!
//! Labels are escaped, so the output is a valid regular expression matching exactly
//! the stored keys.

use regex::{Regex, RegexBuilder};

use crate::node::{BranchNode, Child};
use crate::prefix_view::Subtree;
use crate::trie::RadixMap;
use crate::util::reverse;
use crate::Error;

/// Flags used when compiling the compacted pattern into a [`Regex`].
///
/// # Examples
///
/// ```
/// use radix_pattern::{PatternOptions, RadixMap};
///
/// let mut map = RadixMap::new();
/// map.set("Cat", ()).set("car", ());
///
/// let options = PatternOptions::new().case_insensitive(true).anchored(true);
/// let regex = map.to_pattern(&options).unwrap();
/// assert!(regex.is_match("CAR"));
/// assert!(!regex.is_match("cart"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternOptions {
    case_insensitive: bool,
    multi_line: bool,
    unicode: bool,
    anchored: bool,
    size_limit: Option<usize>,
}

impl PatternOptions {
    /// Creates the default options: case sensitive, Unicode aware, unanchored.
    pub fn new() -> Self {
        PatternOptions {
            case_insensitive: false,
            multi_line: false,
            unicode: true,
            anchored: false,
            size_limit: None,
        }
    }

    /// Match letters regardless of case.
    pub fn case_insensitive(mut self, yes: bool) -> Self {
        self.case_insensitive = yes;
        self
    }

    /// With `anchored`, match whole lines instead of the whole haystack.
    pub fn multi_line(mut self, yes: bool) -> Self {
        self.multi_line = yes;
        self
    }

    /// Unicode-aware matching (on by default).
    pub fn unicode(mut self, yes: bool) -> Self {
        self.unicode = yes;
        self
    }

    /// Only match exactly one of the stored keys, spanning the whole haystack (or the
    /// whole line in `multi_line` mode).
    pub fn anchored(mut self, yes: bool) -> Self {
        self.anchored = yes;
        self
    }

    /// Upper bound, in bytes, for the compiled program.
    pub fn size_limit(mut self, limit: usize) -> Self {
        self.size_limit = Some(limit);
        self
    }
}

impl Default for PatternOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Which way labels are read. Reversed nodes come from the suffix map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Reversed,
}

/// One alternative of a group.
struct Alternative {
    text: String,
    /// A single character: can take a quantifier without parentheses
    atom: bool,
}

impl Alternative {
    fn literal(label: &str) -> Self {
        Alternative {
            text: regex::escape(label),
            atom: label.chars().count() == 1,
        }
    }
}

/// The alternatives of a node and whether the node holds a sentinel.
struct Group {
    alternatives: Vec<Alternative>,
    optional: bool,
}

impl Group {
    /// Renders the group as something safe to concatenate with a label.
    fn braced(self) -> String {
        let Group {
            mut alternatives,
            optional,
        } = self;

        if alternatives.len() == 1 {
            let single = alternatives.remove(0);
            if !optional {
                return single.text;
            }
            if single.atom {
                return single.text + "?";
            }
            alternatives.push(single);
        }

        if alternatives.is_empty() {
            return String::new();
        }

        let mut out = String::from("(");
        out.push_str(&join(&alternatives));
        out.push(')');
        if optional {
            out.push('?');
        }
        out
    }

    /// Renders the group at the top level, where no enclosing concatenation exists.
    fn top_level(self) -> String {
        if self.optional {
            self.braced()
        } else {
            join(&self.alternatives)
        }
    }
}

fn join(alternatives: &[Alternative]) -> String {
    alternatives
        .iter()
        .map(|alternative| alternative.text.as_str())
        .collect::<Vec<_>>()
        .join("|")
}

/// Compacts the whole tree under `root`.
pub(crate) fn compact<V>(root: &BranchNode<V>) -> String {
    render(root, Direction::Forward).top_level()
}

/// Compacts the keys under a prefix, the prefix included.
pub(crate) fn compact_subtree<V>(prefix: &str, subtree: Subtree<'_, V>) -> String {
    match subtree {
        Subtree::Leaf(_) => regex::escape(prefix),
        Subtree::Branch(node) if prefix.is_empty() => compact(node),
        Subtree::Branch(node) => {
            regex::escape(prefix) + &render(node, Direction::Forward).braced()
        }
    }
}

/// An empty class: the compiled form of an empty key set.
pub(crate) const NO_MATCH: &str = "[a&&b]";

/// Compiles compacted pattern text with the given options.
pub(crate) fn compile(pattern: &str, options: &PatternOptions) -> Result<Regex, Error> {
    let source = if options.anchored {
        format!("^(?:{})$", pattern)
    } else {
        pattern.to_owned()
    };

    #[cfg(feature = "tracing")]
    tracing::debug!(target: "radix_pattern", len = source.len(), "compiling pattern");

    let mut builder = RegexBuilder::new(&source);
    builder
        .case_insensitive(options.case_insensitive)
        .multi_line(options.multi_line)
        .unicode(options.unicode);
    if let Some(limit) = options.size_limit {
        builder.size_limit(limit);
    }

    builder.build().map_err(Error::Pattern)
}

fn render<V>(node: &BranchNode<V>, direction: Direction) -> Group {
    let mut alternatives = Vec::with_capacity(node.len());

    // Shared suffixes are only looked for among the leaves of a forward node; the
    // leaves of a reversed node end with their node's distinct leading chars.
    let suffixes = match direction {
        Direction::Forward => factor_suffixes(node),
        Direction::Reversed => None,
    };
    let factored = suffixes.is_some();
    if let Some(group) = suffixes {
        alternatives.extend(group.alternatives);
    }

    for (label, child) in node.edges() {
        match child {
            Child::Leaf(_) if factored => {}
            Child::Leaf(_) => alternatives.push(match direction {
                Direction::Forward => Alternative::literal(label),
                Direction::Reversed => Alternative::literal(&reverse(label)),
            }),
            Child::Branch(branch) => {
                let inner = render(&**branch, direction).braced();
                let text = match direction {
                    Direction::Forward => regex::escape(label) + &inner,
                    Direction::Reversed => inner + &regex::escape(&reverse(label)),
                };
                alternatives.push(Alternative { text, atom: false });
            }
        }
    }

    Group {
        alternatives,
        optional: node.has_terminal(),
    }
}

/// Renders the leaves of `node` with their shared suffixes factored out.
///
/// Returns `None` when no two leaf labels end with the same char.
fn factor_suffixes<V>(node: &BranchNode<V>) -> Option<Group> {
    let leaves: Vec<&str> = node
        .edges()
        .filter(|(_, child)| !child.is_branch())
        .map(|(label, _)| label.as_str())
        .collect();
    if leaves.len() < 2 {
        return None;
    }

    let reversed: RadixMap<()> = RadixMap::from_keys(leaves.iter().map(|label| reverse(label)));
    if !reversed.root().edges().any(|(_, child)| child.is_branch()) {
        return None;
    }

    Some(render(reversed.root(), Direction::Reversed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact_keys(keys: &[&str]) -> String {
        let map: RadixMap<()> = RadixMap::from_keys(keys);
        compact(map.root())
    }

    #[test]
    fn test_single_and_disjoint_keys() {
        assert_eq!(compact_keys(&[]), "");
        assert_eq!(compact_keys(&["abc"]), "abc");
        assert_eq!(compact_keys(&["abc", "xyz"]), "abc|xyz");
    }

    #[test]
    fn test_shared_prefix() {
        assert_eq!(compact_keys(&["cat", "car", "dog"]), "ca(t|r)|dog");
        assert_eq!(compact_keys(&["abcd", "abef"]), "ab(cd|ef)");
    }

    #[test]
    fn test_shared_suffix() {
        assert_eq!(compact_keys(&["ab", "cb"]), "(a|c)b");
        assert_eq!(compact_keys(&["ab", "cb", "d"]), "(a|c)b|d");
        assert_eq!(compact_keys(&["xab", "xcb"]), "x(a|c)b");
    }

    #[test]
    fn test_suffix_that_is_a_whole_label() {
        // "b" is itself the shared suffix of "ab"
        assert_eq!(compact_keys(&["b", "ab"]), "a?b");
    }

    #[test]
    fn test_optional_single_char() {
        assert_eq!(compact_keys(&["a", "ab"]), "ab?");
        assert_eq!(compact_keys(&["ab", "a"]), "ab?");
    }

    #[test]
    fn test_optional_longer_tail_is_braced() {
        assert_eq!(compact_keys(&["a", "abc"]), "a(bc)?");
    }

    #[test]
    fn test_optional_nested_branch_is_braced() {
        // A single-char label leading to a branch is not a lone atom
        assert_eq!(compact_keys(&["a", "abc", "abd"]), "a(b(c|d))?");
    }

    #[test]
    fn test_optional_group_of_alternatives() {
        assert_eq!(compact_keys(&["ab", "abc", "abd"]), "ab(c|d)?");
    }

    #[test]
    fn test_branches_follow_factored_leaves() {
        assert_eq!(compact_keys(&["ab", "cb", "dxy", "dxz"]), "(a|c)b|dx(y|z)");
    }

    #[test]
    fn test_empty_key_makes_top_level_optional() {
        assert_eq!(compact_keys(&[""]), "");
        assert_eq!(compact_keys(&["", "a"]), "a?");
        assert_eq!(compact_keys(&["", "ab"]), "(ab)?");
        assert_eq!(compact_keys(&["", "a", "b"]), "(a|b)?");
    }

    #[test]
    fn test_metacharacters_are_escaped() {
        assert_eq!(compact_keys(&["a.b", "a*b"]), r"a(\.|\*)b");
        assert_eq!(compact_keys(&["(", "(x"]), r"\(x?");
    }

    #[test]
    fn test_subtree_pattern() {
        let map: RadixMap<()> = RadixMap::from_keys(&["cat", "car", "dog"]);

        let view = map.starts_with("ca").unwrap();
        assert_eq!(compact_subtree(view.prefix(), view.subtree()), "ca(t|r)");

        let view = map.starts_with("d").unwrap();
        assert_eq!(compact_subtree(view.prefix(), view.subtree()), "dog");

        let view = map.starts_with("").unwrap();
        assert_eq!(compact_subtree(view.prefix(), view.subtree()), "ca(t|r)|dog");
    }

    #[test]
    fn test_compile_options() {
        let anchored = PatternOptions::new().anchored(true);
        let regex = compile("ca(t|r)|dog", &anchored).unwrap();
        assert!(regex.is_match("cat"));
        assert!(!regex.is_match("cats"));

        let loose = compile("ca(t|r)|dog", &PatternOptions::default()).unwrap();
        assert!(loose.is_match("cats"));

        let lines = PatternOptions::new().anchored(true).multi_line(true);
        let regex = compile("ab", &lines).unwrap();
        assert!(regex.is_match("x\nab\n"));
        assert!(!regex.is_match("x\nabc"));
        let whole = compile("ab", &anchored).unwrap();
        assert!(!whole.is_match("x\nab\n"));
        assert!(!whole.is_match("ab\n"));

        let never = compile(NO_MATCH, &anchored).unwrap();
        assert!(!never.is_match(""));
        assert!(!never.is_match("a"));

        let tiny = PatternOptions::new().size_limit(1);
        assert!(matches!(compile("ca(t|r)|dog", &tiny), Err(Error::Pattern(_))));
    }
}
