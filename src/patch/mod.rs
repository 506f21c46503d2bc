//! Unified-diff model, parser and directional application.
//!
//! A [`Patch`] is parsed from unified-diff text (always generated
//! internally, see `git::diff`), and applied to a [`TextBuffer`] in one of
//! four modes along two axes: [`Direction`] (which side's text the
//! application produces) and [`Alignment`] (bare text vs the
//! placeholder-padded rendering where both panes keep equal line counts).

pub mod apply;
pub mod buffer;
pub mod parse;

pub use apply::{Alignment, Direction};
pub use buffer::TextBuffer;

use crate::error::{AppError, Result};

/// Tag of one body line within a hunk, in the diff's native direction
/// (old → new).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineTag {
    Context,
    Removed,
    Added,
}

/// One contiguous block of line-level changes.
#[derive(Debug, Clone)]
pub struct Hunk {
    /// 1-based start line on the old side (0 when the old side is empty).
    pub old_start: u32,
    pub old_lines: u32,
    /// 1-based start line on the new side (0 when the new side is empty).
    pub new_start: u32,
    pub new_lines: u32,
    pub lines: Vec<(LineTag, String)>,
    /// `\ No newline at end of file` marker seen after an old-side line.
    pub no_newline_old: bool,
    /// Same, for the new side. A marker after a context line sets both.
    pub no_newline_new: bool,
}

/// All hunks for one file pair.
#[derive(Debug, Clone)]
pub struct FilePatch {
    pub old_path: Option<String>,
    pub new_path: Option<String>,
    pub hunks: Vec<Hunk>,
}

/// A parsed unified diff: an ordered list of per-file patches.
#[derive(Debug, Clone)]
pub struct Patch {
    pub files: Vec<FilePatch>,
}

impl Patch {
    /// The single file entry every buffer operation requires. A diff with
    /// any other shape is a contract violation by the caller.
    pub fn single_file(&self) -> Result<&FilePatch> {
        match self.files.as_slice() {
            [file] => Ok(file),
            files => Err(AppError::InvalidPatchShape(files.len())),
        }
    }
}
