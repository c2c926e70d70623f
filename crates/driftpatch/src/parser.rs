//! Diff wire-format parsing.
//!
//! Hunks are reconstructed purely from per-line single-character prefixes;
//! the format carries no positional information. `@@` lines are accepted as
//! hunk delimiters only, never as coordinates. A line with no recognized
//! prefix fails the whole diff: silently treating it as context risks
//! corrupting the target text.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PatchError, Result};
use crate::lines::join_lines;

/// The single-character line prefix of the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Marker {
    /// `' '` — unchanged in both versions, present only to anchor the hunk.
    Context,
    /// `'-'` — present only in the base text.
    Removed,
    /// `'+'` — present only in the revised text.
    Added,
}

impl Marker {
    pub fn prefix(self) -> char {
        match self {
            Marker::Context => ' ',
            Marker::Removed => '-',
            Marker::Added => '+',
        }
    }
}

/// One parsed hunk: marker-tagged lines in wire order.
///
/// The parser does not split leading from trailing context; the applier
/// derives whatever views it needs from the tagged lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHunk {
    pub lines: Vec<(Marker, String)>,
}

impl RawHunk {
    /// The hunk as it reads in the base text: context and removed lines,
    /// in original order.
    pub fn before_view(&self) -> Vec<&str> {
        self.view(Marker::Removed)
    }

    /// The hunk as it reads in the revised text: context and added lines,
    /// in original order.
    pub fn after_view(&self) -> Vec<&str> {
        self.view(Marker::Added)
    }

    fn view(&self, changed: Marker) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(marker, _)| *marker == Marker::Context || *marker == changed)
            .map(|(_, content)| content.as_str())
            .collect()
    }

    /// True when the hunk contains at least one removed or added line.
    /// Context-only hunks describe nothing and apply as no-ops.
    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|(m, _)| *m != Marker::Context)
    }

    /// Number of context lines before the first changed line.
    pub fn leading_context(&self) -> usize {
        self.lines
            .iter()
            .take_while(|(m, _)| *m == Marker::Context)
            .count()
    }

    /// Number of context lines after the last changed line. Zero when the
    /// hunk is context-only (all of it counts as leading).
    pub fn trailing_context(&self) -> usize {
        let leading = self.leading_context();
        self.lines[leading..]
            .iter()
            .rev()
            .take_while(|(m, _)| *m == Marker::Context)
            .count()
    }

    /// Before/after anchors restricted to `pre` leading and `post`
    /// trailing context lines (the innermost ones). Both are joined
    /// verbatim, edge whitespace included, ready for literal matching.
    /// `pre`/`post` must not exceed [`Self::leading_context`] /
    /// [`Self::trailing_context`].
    pub fn anchors(&self, pre: usize, post: usize) -> (String, String) {
        let leading = self.leading_context();
        let trailing = self.trailing_context();
        let trail_start = self.lines.len() - trailing;

        let mut before = Vec::new();
        let mut after = Vec::new();
        for (idx, (marker, content)) in self.lines.iter().enumerate() {
            if idx < leading - pre {
                continue;
            }
            if idx >= trail_start + post {
                continue;
            }
            match marker {
                Marker::Context => {
                    before.push(content.as_str());
                    after.push(content.as_str());
                }
                Marker::Removed => before.push(content.as_str()),
                Marker::Added => after.push(content.as_str()),
            }
        }
        (join_lines(&before), join_lines(&after))
    }

    /// Reconstruct the wire text of this hunk, for diagnostics.
    pub fn render(&self) -> String {
        let rendered: Vec<String> = self
            .lines
            .iter()
            .map(|(marker, content)| format!("{}{}", marker.prefix(), content))
            .collect();
        join_lines(&rendered)
    }
}

/// Parse diff text into ordered hunks.
///
/// Empty input is a valid empty diff. Surrounding markdown fences are the
/// caller's problem; any unmarked line here is an error.
pub fn parse_hunks(diff_text: &str) -> Result<Vec<RawHunk>> {
    let mut hunks = Vec::new();
    let mut current = RawHunk::default();

    for raw in diff_text.lines() {
        if raw.starts_with("@@") {
            if !current.lines.is_empty() {
                hunks.push(std::mem::take(&mut current));
            }
            continue;
        }
        let marker = match raw.chars().next() {
            Some(' ') => Marker::Context,
            Some('-') => Marker::Removed,
            Some('+') => Marker::Added,
            _ => {
                return Err(PatchError::MalformedDiff {
                    line: raw.to_string(),
                })
            }
        };
        current.lines.push((marker, raw[1..].to_string()));
    }
    if !current.lines.is_empty() {
        hunks.push(current);
    }

    debug!(hunks = hunks.len(), "parsed diff");
    Ok(hunks)
}
