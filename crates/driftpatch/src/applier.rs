//! Diff application with progressively relaxed context matching.
//!
//! The text a diff gets applied to is frequently not the text it was
//! computed against, so hunks are located by content instead of position.
//! Three tiers run in order for every hunk:
//!
//! 1. direct match on the leading-context-plus-removed anchor,
//! 2. the same match retried over alternative context anchors, widest
//!    first, and
//! 3. the underlying uniqueness-checked search-and-replace primitive.
//!
//! A hunk whose anchor matches more than once is never applied to the
//! first occurrence on a hunch; some other context anchor must single one
//! occurrence out, or the whole patch fails. Application
//! is all-or-nothing: the first failing hunk aborts and the caller keeps
//! the unpatched text.

use similar::TextDiff;
use tracing::debug;

use crate::error::{PatchError, Result};
use crate::parser::{parse_hunks, RawHunk};

/// Anchors shorter than this are too likely to collide to be trusted on a
/// direct match when they occur more than once.
const MIN_TRUSTED_ANCHOR_LEN: usize = 10;

/// Apply a rendered diff to `base`.
///
/// Hunks apply strictly in diff order, each against the cumulative result
/// of the previous ones, so hunks composing over nearby regions behave
/// correctly. An empty diff is a valid no-op.
///
/// Fails with [`PatchError::MalformedDiff`] for unparseable input,
/// [`PatchError::SearchTextNotUnique`] when an anchor is ambiguous, and
/// [`PatchError::HunkApply`] when every tier is exhausted. No partial
/// result is ever returned.
pub fn apply_diff(base: &str, diff_text: &str) -> Result<String> {
    let hunks = parse_hunks(diff_text)?;

    let mut current = base.to_string();
    for hunk in &hunks {
        if !hunk.has_changes() {
            continue;
        }
        current = apply_hunk(&current, hunk)?;
    }
    Ok(current)
}

fn apply_hunk(text: &str, hunk: &RawHunk) -> Result<String> {
    let leading = hunk.leading_context();
    let trailing = hunk.trailing_context();
    let mut ambiguous: Option<String> = None;

    // Tier 1: leading context plus removed lines, matched verbatim.
    let (full_before, full_after) = hunk.anchors(leading, 0);
    if full_before.trim().is_empty() {
        debug!("empty direct anchor, trying context variants");
    } else if full_before.chars().count() < MIN_TRUSTED_ANCHOR_LEN
        && text.matches(&full_before).count() > 1
    {
        debug!("direct anchor too short to trust, trying context variants");
    } else {
        match splice_anchored(text, &full_before, &full_after) {
            Splice::Done(patched) => return Ok(patched),
            Splice::Ambiguous => {
                // The direct anchor leaves trailing context out, and the
                // full-context candidate below can still single out one
                // occurrence. Not yet fatal.
                debug!("direct anchor ambiguous, trying context variants");
                ambiguous = Some(full_before.clone());
            }
            Splice::NotFound => {
                debug!("direct anchor not found, trying context variants");
            }
        }
    }

    // Tier 2: retry with every context anchor from the full (leading,
    // trailing) pair downward, widest and most balanced first. This
    // absorbs drift in lines near the edit, as long as some anchor is
    // still unique. Ambiguous candidates are skipped rather than fatal:
    // an asymmetric sibling split can still match uniquely where a
    // symmetric one collides.
    for (pre, post) in context_candidates(leading, trailing) {
        let (before, after) = hunk.anchors(pre, post);
        match splice_anchored(text, &before, &after) {
            Splice::Done(patched) => {
                debug!(pre, post, "hunk applied with context variant");
                return Ok(patched);
            }
            Splice::Ambiguous => {
                ambiguous.get_or_insert(before);
            }
            Splice::NotFound => {}
        }
    }

    // Every anchor that could still have disambiguated was tried, so an
    // ambiguity recorded at any tier means the hunk has no unique home.
    if let Some(search) = ambiguous {
        return Err(PatchError::SearchTextNotUnique { search });
    }
    Err(PatchError::HunkApply {
        hunk: hunk.render(),
        detail: closest_match(text, &full_before),
    })
}

/// Candidate `(pre, post)` context sizes: totals descending from the full
/// context down to zero; within a total, balanced splits first, leading
/// context preferred on ties.
fn context_candidates(leading: usize, trailing: usize) -> Vec<(usize, usize)> {
    let mut candidates = Vec::new();
    for total in (0..=leading + trailing).rev() {
        let mut splits: Vec<(usize, usize)> = (0..=total.min(leading))
            .filter_map(|pre| {
                let post = total - pre;
                (post <= trailing).then_some((pre, post))
            })
            .collect();
        splits.sort_by_key(|&(pre, post)| (pre.abs_diff(post), std::cmp::Reverse(pre)));
        candidates.extend(splits);
    }
    candidates
}

enum Splice {
    Done(String),
    NotFound,
    Ambiguous,
}

/// Splice with the anchor exactly as the hunk spells it; when that text is
/// absent, retry with edge whitespace trimmed from both anchor and
/// replacement to absorb blank-line and indentation drift at the block
/// edges. The exact attempt comes first so an edit that only changes
/// leading or trailing whitespace still lands on whole lines.
fn splice_anchored(text: &str, before: &str, after: &str) -> Splice {
    if before.trim().is_empty() {
        // Whitespace cannot pin a location; only an effectively empty
        // document accepts an effectively empty anchor.
        return splice_unique(text, "", after);
    }
    match splice_unique(text, before, after) {
        Splice::NotFound if before != before.trim() => {
            splice_unique(text, before.trim(), after.trim())
        }
        outcome => outcome,
    }
}

/// The search-and-replace primitive: split on every literal occurrence of
/// `search` and splice `replace` in only when the occurrence is unique.
/// An empty anchor can only anchor an empty document.
fn splice_unique(text: &str, search: &str, replace: &str) -> Splice {
    if search.is_empty() {
        return if text.trim().is_empty() {
            Splice::Done(replace.to_string())
        } else {
            Splice::NotFound
        };
    }
    let pieces: Vec<&str> = text.split(search).collect();
    match pieces.len() {
        1 => Splice::NotFound,
        2 => {
            let (head, tail) = (pieces[0], pieces[1]);
            // A deleted block takes one adjacent line separator with it,
            // otherwise removing the first or last lines of the document
            // leaves an orphan newline at the junction.
            if replace.is_empty() {
                if let Some(tail) = tail.strip_prefix('\n') {
                    return Splice::Done(format!("{head}{tail}"));
                }
                if let Some(head) = head.strip_suffix('\n') {
                    return Splice::Done(format!("{head}{tail}"));
                }
            }
            Splice::Done(format!("{head}{replace}{tail}"))
        }
        _ => Splice::Ambiguous,
    }
}

/// Best fuzzy similarity of the anchor over a sliding line window, for the
/// failure diagnostic. Char-level comparison: line-level is too coarse for
/// "this is almost certainly the spot you meant" reporting.
fn closest_match(text: &str, anchor: &str) -> String {
    if anchor.is_empty() {
        return "empty anchor against a non-empty target".to_string();
    }
    let window = anchor.lines().count().max(1);
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() < window {
        return format!("target is shorter than the {window}-line anchor");
    }

    let mut best = 0.0f32;
    for start in 0..=lines.len() - window {
        let candidate = lines[start..start + window].join("\n");
        let ratio = TextDiff::from_chars(anchor, candidate.as_str()).ratio();
        best = best.max(ratio);
    }
    format!("no anchor matched, closest candidate {:.0}% similar", best * 100.0)
}
