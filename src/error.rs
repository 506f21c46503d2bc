//! Application error types.
//!
//! Defines `AppError` for all error conditions in the core. Object-store and
//! tree-walk failures from libgit2 are surfaced verbatim via the `Git`
//! variant; the remaining variants carry enough context (path, commit id)
//! to diagnose without retrying. None of these conditions improve on retry.
//!
//! "Empty history" is not an error: `find_commits` returns an empty list.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("No such revision: {0}")]
    NoSuchRevision(String),

    #[error("Path is outside the repository: {0}")]
    PathOutsideRepository(String),

    #[error("Path {path} not found in commit {commit}")]
    PathNotFoundInCommit { path: String, commit: String },

    #[error("Patch must contain exactly one file, found {0}")]
    InvalidPatchShape(usize),

    #[error("Malformed hunk: {0}")]
    MalformedHunk(String),

    #[error("Hunk does not apply at line {line}: expected {expected:?}, found {found:?}")]
    HunkApplyMismatch {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
