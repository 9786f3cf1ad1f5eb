/// Finds the length of the common prefix between an edge label and the rest of a key.
///
/// The result is a byte length that always falls on a `char` boundary of both strings,
/// so it can be used to slice either of them.
pub fn prefix_match(label: &str, word: &str) -> usize {
    label
        .char_indices()
        .zip(word.chars())
        .find(|((_, a), b)| a != b)
        .map(|((idx, _), _)| idx)
        .unwrap_or_else(|| label.len().min(word.len()))
}

/// Reverses a string char by char.
pub fn reverse(text: &str) -> String {
    text.chars().rev().collect()
}

/// Emits a `tracing` event at trace level when the `tracing` feature is on.
macro_rules! trace_edit {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!(target: "radix_pattern", $($arg)*);
    };
}

pub(crate) use trace_edit;
