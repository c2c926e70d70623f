//! Diff computation between two text snapshots.
//!
//! A context-window line scan rather than a minimal edit script: two
//! cursors advance while lines match, and on a mismatch a look-ahead finds
//! the earliest point where both texts realign. Everything between the
//! mismatch and the realignment point becomes one hunk. Edit-script
//! minimality is not a contract here; non-overlap and round-trip
//! correctness are.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::lines::split_lines;

/// Context lines captured on each side of a changed region.
pub const DEFAULT_CONTEXT_SIZE: usize = 3;

/// One contiguous changed region, bounded by unchanged context.
///
/// Invariants: context lines are identical in base and revised text,
/// `removed` lines exist only in the base, `added` lines only in the
/// revised text. A hunk always has a non-empty changed region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    pub context_before: Vec<String>,
    pub removed: Vec<String>,
    pub added: Vec<String>,
    pub context_after: Vec<String>,
}

impl Hunk {
    fn render_into(&self, out: &mut String) {
        for line in &self.context_before {
            out.push(' ');
            out.push_str(line);
            out.push('\n');
        }
        for line in &self.removed {
            out.push('-');
            out.push_str(line);
            out.push('\n');
        }
        for line in &self.added {
            out.push('+');
            out.push_str(line);
            out.push('\n');
        }
        for line in &self.context_after {
            out.push(' ');
            out.push_str(line);
            out.push('\n');
        }
    }
}

/// An ordered, non-overlapping sequence of hunks, ordered by position in
/// the base text. Constructed per call and discarded after rendering; only
/// the rendered string is meant to outlive the computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    pub hunks: Vec<Hunk>,
}

impl Diff {
    /// True when both inputs were identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Serialize to the wire format: one marker character per line (`' '`
    /// context, `'-'` removed, `'+'` added), with an `@@` separator line
    /// between consecutive hunks. No numeric positions are emitted; the
    /// applier locates hunks by content.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (idx, hunk) in self.hunks.iter().enumerate() {
            if idx > 0 {
                out.push_str("@@\n");
            }
            hunk.render_into(&mut out);
        }
        out
    }
}

/// [`compute_diff`] with [`DEFAULT_CONTEXT_SIZE`].
pub fn compute_diff_default(base: &str, revised: &str) -> Diff {
    compute_diff(base, revised, DEFAULT_CONTEXT_SIZE)
}

/// Compute the hunks that turn `base` into `revised`.
///
/// Identical inputs yield an empty diff; unchanged runs never produce a
/// hunk. Changed regions in the result are separated by at least
/// `context_size` unchanged lines, so adjacent edits collapse into one
/// hunk instead of overlapping.
pub fn compute_diff(base: &str, revised: &str, context_size: usize) -> Diff {
    let a = split_lines(base);
    let b = split_lines(revised);

    let mut hunks = Vec::new();
    let mut i = 0;
    let mut j = 0;

    while i < a.len() || j < b.len() {
        if i < a.len() && j < b.len() && a[i] == b[j] {
            i += 1;
            j += 1;
            continue;
        }

        let (end_a, end_b) = find_resync(&a, &b, i, j, context_size);

        let context_start = i.saturating_sub(context_size);
        let context_end = (end_a + context_size).min(a.len());
        hunks.push(Hunk {
            context_before: to_owned(&a[context_start..i]),
            removed: to_owned(&a[i..end_a]),
            added: to_owned(&b[j..end_b]),
            context_after: to_owned(&a[end_a..context_end]),
        });
        trace!(start = i, end = end_a, "emitted hunk");

        i = end_a;
        j = end_b;
    }

    Diff { hunks }
}

fn to_owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

/// Find the earliest resynchronization point at or after the mismatch at
/// `(i, j)`.
///
/// Candidates are ordered by total cursor advance, so the earliest
/// realignment wins and hunks stay minimal. A candidate only counts as
/// realigned when the next `run` lines match too (clipped at end-of-text);
/// that keeps spurious one-line coincidences, like a closing brace, from
/// splitting a single edit and guarantees the inter-hunk separation
/// invariant. Falls back to both ends of text when nothing realigns.
fn find_resync(a: &[&str], b: &[&str], i: usize, j: usize, run: usize) -> (usize, usize) {
    let max_total = (a.len() - i) + (b.len() - j);
    for total in 1..=max_total {
        for da in 0..=total.min(a.len() - i) {
            let db = total - da;
            if db > b.len() - j {
                continue;
            }
            if is_aligned(a, b, i + da, j + db, run) {
                return (i + da, j + db);
            }
        }
    }
    (a.len(), b.len())
}

fn is_aligned(a: &[&str], b: &[&str], ca: usize, cb: usize, run: usize) -> bool {
    if ca == a.len() && cb == b.len() {
        return true;
    }
    for k in 0..run.max(1) {
        match (a.get(ca + k), b.get(cb + k)) {
            (Some(x), Some(y)) if x == y => {}
            (None, None) => return true,
            _ => return false,
        }
    }
    true
}
