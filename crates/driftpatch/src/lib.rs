//! Drift-tolerant line diff and patch engine.
//!
//! This crate computes a structural diff between two versions of a
//! line-oriented text and can later re-apply that diff to a third,
//! possibly-drifted copy of the text. Because diff generation may be slow
//! and asynchronous (the typical producer is an LLM working from a
//! snapshot), the text at apply time is often no longer the text the diff
//! was computed against. Plain line-number patching is unsafe there, so
//! the applier locates every hunk by content, relaxing its context anchor
//! step by step and refusing outright when a match is ambiguous.
//!
//! The engine is pure and stateless: no I/O, no shared state, fully
//! reentrant. Callers own scheduling, cancellation, and anything
//! editor-shaped.
//!
//! # Usage
//!
//! ```
//! use driftpatch::{apply_diff, compute_diff_default};
//!
//! let base = "fn main() {\n    println!(\"hello\");\n}";
//! let revised = "fn main() {\n    println!(\"goodbye\");\n}";
//!
//! let diff = compute_diff_default(base, revised).render();
//!
//! // Later, against the (possibly drifted) live copy of `base`:
//! let patched = apply_diff(base, &diff)?;
//! assert_eq!(patched, revised);
//! # Ok::<(), driftpatch::PatchError>(())
//! ```

mod applier;
mod differ;
mod error;
mod lines;
mod parser;
mod summary;

pub use applier::apply_diff;
pub use differ::{compute_diff, compute_diff_default, Diff, Hunk, DEFAULT_CONTEXT_SIZE};
pub use error::{PatchError, Result};
pub use lines::{join_lines, split_lines};
pub use parser::{parse_hunks, Marker, RawHunk};
pub use summary::{extract_changes, ChangeKind, ChangeRecord, ChangeSummary};
