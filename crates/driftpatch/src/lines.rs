//! Lossless line splitting and joining.
//!
//! Splitting keeps the empty segment after a trailing newline, so
//! `join_lines(&split_lines(text)) == text` for every input.

/// Split on `\n` without dropping anything (`"a\nb\n"` → `["a", "b", ""]`).
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Inverse of [`split_lines`].
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(|l| l.as_ref())
        .collect::<Vec<_>>()
        .join("\n")
}
