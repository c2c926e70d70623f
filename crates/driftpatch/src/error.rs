use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    /// A diff line carries no recognized marker. The whole diff is
    /// rejected; accepting the line as context could corrupt the target.
    #[error("malformed diff line (no marker): {line:?}")]
    MalformedDiff { line: String },

    /// Every matching tier was exhausted for this hunk. The whole patch is
    /// aborted; nothing is applied partially.
    #[error("hunk could not be applied ({detail}):\n{hunk}")]
    HunkApply { hunk: String, detail: String },

    /// An anchor matched more than one location in the target. Picking one
    /// would be a guess, so the patch is aborted instead.
    #[error("anchor text is not unique in the target:\n{search}")]
    SearchTextNotUnique { search: String },
}

pub type Result<T> = std::result::Result<T, PatchError>;
