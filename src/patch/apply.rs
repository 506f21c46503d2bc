//! Directional patch application: one algorithm parametrized by two axes.
//! Both directions consume the same forward diff; the backward direction
//! interprets the tags inversely instead of requiring a reversed diff.
//!
//! Per tag the rule is symmetric. A line that exists only on the side being
//! produced ("incoming") is inserted: real text in plain mode, a placeholder
//! in aligned mode. A line that exists only on the side being consumed
//! ("outgoing") is verified and removed in plain mode, or kept and marked in
//! aligned mode. Classification always follows the tag's side: added lines
//! are `Added`, removed lines are `Deleted`, whichever direction the
//! application runs in.
//!
//! Only the plain variants verify hunk content against the buffer; the
//! aligned variants are purely structural and apply without checking.

use std::collections::BTreeMap;

use crate::error::{AppError, Result};
use crate::models::LineChange;
use crate::patch::buffer::TextBuffer;
use crate::patch::{Hunk, LineTag, Patch};

/// Which text the application produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Produce the "after" text from the "before" text.
    Forward,
    /// Produce the "before" text from the "after" text.
    Backward,
}

/// Bare text vs the lockstep-scrolling rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Only the real resulting lines; context and outgoing lines are
    /// verified against the buffer.
    Plain,
    /// Placeholder lines substitute for the lines this side does not have,
    /// so both sides of a comparison keep equal line counts per hunk.
    Aligned,
}

/// Stands in for a line the buffer's side does not have. The renderer
/// highlights the full line span, so the content must be visually non-empty.
pub const PLACEHOLDER: &str = "               ";

impl TextBuffer {
    /// Apply `patch` to this buffer, replacing its text and change map.
    ///
    /// The patch must contain exactly one file entry. Hunk line numbers are
    /// 1-based and anchored on the side being produced (`new_start` going
    /// forward, `old_start` going backward); a cursor tracks the offset
    /// within the hunk because every insertion or removal shifts the
    /// positions that follow it.
    pub fn apply(
        &mut self,
        patch: &Patch,
        direction: Direction,
        alignment: Alignment,
    ) -> Result<()> {
        let file = patch.single_file()?;

        let mut working: Vec<String> = self.lines().map(str::to_string).collect();
        let mut changes: BTreeMap<usize, LineChange> = BTreeMap::new();

        // In aligned mode the buffer keeps outgoing lines too, so the
        // produced-side coordinates of later hunks drift by the number of
        // outgoing lines retained so far.
        let mut aligned_shift = 0usize;

        for hunk in &file.hunks {
            let start = match direction {
                Direction::Forward => hunk.new_start,
                Direction::Backward => hunk.old_start,
            };
            let hunk_start = (start as usize).saturating_sub(1) + aligned_shift;
            let mut pos = 0usize;

            for (tag, text) in &hunk.lines {
                let at = hunk_start + pos;
                let incoming = (*tag == LineTag::Added) == (direction == Direction::Forward);

                match tag {
                    LineTag::Context => {
                        if alignment == Alignment::Plain {
                            verify_line(&working, at, text, hunk)?;
                        }
                        pos += 1;
                    }
                    _ if incoming => {
                        let content = match alignment {
                            Alignment::Plain => text.clone(),
                            Alignment::Aligned => PLACEHOLDER.to_string(),
                        };
                        insert_line(&mut working, at, content, hunk)?;
                        changes.insert(at, classify(*tag));
                        pos += 1;
                    }
                    _ => match alignment {
                        Alignment::Plain => {
                            verify_line(&working, at, text, hunk)?;
                            working.remove(at);
                        }
                        Alignment::Aligned => {
                            if at >= working.len() {
                                return Err(out_of_range(hunk, at, working.len()));
                            }
                            changes.insert(at, classify(*tag));
                            pos += 1;
                        }
                    },
                }
            }

            if alignment == Alignment::Aligned {
                let outgoing = match direction {
                    Direction::Forward => LineTag::Removed,
                    Direction::Backward => LineTag::Added,
                };
                aligned_shift += hunk.lines.iter().filter(|(tag, _)| *tag == outgoing).count();
            }
        }

        let missing_newline = match direction {
            Direction::Forward => file.hunks.last().is_some_and(|h| h.no_newline_new),
            Direction::Backward => file.hunks.last().is_some_and(|h| h.no_newline_old),
        };

        self.replace(working, missing_newline, changes);
        Ok(())
    }
}

fn classify(tag: LineTag) -> LineChange {
    match tag {
        LineTag::Added => LineChange::Added,
        _ => LineChange::Deleted,
    }
}

fn verify_line(working: &[String], at: usize, expected: &str, hunk: &Hunk) -> Result<()> {
    let found = working
        .get(at)
        .ok_or_else(|| out_of_range(hunk, at, working.len()))?;
    if found != expected {
        return Err(AppError::HunkApplyMismatch {
            line: at + 1,
            expected: expected.to_string(),
            found: found.to_string(),
        });
    }
    Ok(())
}

fn insert_line(working: &mut Vec<String>, at: usize, content: String, hunk: &Hunk) -> Result<()> {
    if at > working.len() {
        return Err(out_of_range(hunk, at, working.len()));
    }
    working.insert(at, content);
    Ok(())
}

fn out_of_range(hunk: &Hunk, at: usize, len: usize) -> AppError {
    AppError::MalformedHunk(format!(
        "@@ -{},{} +{},{} @@ references line {} beyond end of buffer ({} lines)",
        hunk.old_start,
        hunk.old_lines,
        hunk.new_start,
        hunk.new_lines,
        at + 1,
        len
    ))
}
