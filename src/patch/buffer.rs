//! Text buffer with derived line-offset spans and a per-line change map.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::models::LineChange;

/// A text file as an ordered sequence of lines, plus the byte span each line
/// occupies in the joined representation and the change classification left
/// behind by the last patch application.
///
/// Spans are contiguous, non-overlapping and cover the whole text; they are
/// recomputed whenever the line sequence changes. A line's span includes its
/// trailing newline when one exists.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    missing_newline_at_end: bool,
    spans: Vec<Range<usize>>,
    changes: BTreeMap<usize, LineChange>,
}

impl TextBuffer {
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let missing_newline_at_end = if text.ends_with('\n') || text.is_empty() {
            lines.pop();
            false
        } else {
            true
        };

        let mut buffer = TextBuffer {
            lines,
            missing_newline_at_end,
            spans: Vec::new(),
            changes: BTreeMap::new(),
        };
        buffer.recompute_spans();
        buffer
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_text(&String::from_utf8_lossy(bytes))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, i: usize) -> Option<&str> {
        self.lines.get(i).map(String::as_str)
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn text(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut text = self.lines.join("\n");
        if !self.missing_newline_at_end {
            text.push('\n');
        }
        text
    }

    /// Byte span of line `i` within `text()`, trailing newline included.
    pub fn line_span(&self, i: usize) -> Option<Range<usize>> {
        self.spans.get(i).cloned()
    }

    pub fn spans(&self) -> &[Range<usize>] {
        &self.spans
    }

    /// Classification of line `i` after the last patch application, or
    /// `None` when `i` is out of bounds.
    pub fn change(&self, i: usize) -> Option<LineChange> {
        if i >= self.lines.len() {
            return None;
        }
        Some(
            self.changes
                .get(&i)
                .copied()
                .unwrap_or(LineChange::Unchanged),
        )
    }

    /// Every line the last patch application classified, by final line
    /// index. Consumed by the presentation layer to style line spans.
    pub fn changed_lines(&self) -> &BTreeMap<usize, LineChange> {
        &self.changes
    }

    /// Replace the whole content, clearing the change map.
    pub fn set_text(&mut self, text: &str) {
        *self = Self::from_text(text);
    }

    /// Install the result of a patch application.
    pub(crate) fn replace(
        &mut self,
        lines: Vec<String>,
        missing_newline_at_end: bool,
        changes: BTreeMap<usize, LineChange>,
    ) {
        self.lines = lines;
        self.missing_newline_at_end = missing_newline_at_end;
        self.changes = changes;
        self.recompute_spans();
    }

    pub(crate) fn recompute_spans(&mut self) {
        self.spans.clear();
        let mut offset = 0;
        let last = self.lines.len().saturating_sub(1);
        for (i, line) in self.lines.iter().enumerate() {
            let newline = if i < last || !self.missing_newline_at_end {
                1
            } else {
                0
            };
            let end = offset + line.len() + newline;
            self.spans.push(offset..end);
            offset = end;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn splits_lines_like_the_joined_text() {
        let buffer = TextBuffer::from_text("x\ny\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(0), Some("x"));
        assert_eq!(buffer.line(1), Some("y"));
        assert_eq!(buffer.text(), "x\ny\n");
    }

    #[test]
    fn preserves_missing_trailing_newline() {
        let buffer = TextBuffer::from_text("x\ny");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.text(), "x\ny");
    }

    #[test]
    fn empty_text_has_no_lines() {
        let buffer = TextBuffer::from_text("");
        assert_eq!(buffer.line_count(), 0);
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn spans_are_contiguous_and_cover_the_text() {
        let buffer = TextBuffer::from_text("ab\n\ncde\n");
        let spans = buffer.spans();
        assert_eq!(spans[0], 0..3);
        assert_eq!(spans[1], 3..4);
        assert_eq!(spans[2], 4..8);
        assert_eq!(spans.last().unwrap().end, buffer.text().len());
    }

    #[test]
    fn last_span_excludes_missing_newline() {
        let buffer = TextBuffer::from_text("ab\ncd");
        assert_eq!(buffer.line_span(1), Some(3..5));
    }

    #[test]
    fn recomputing_spans_is_idempotent() {
        let mut buffer = TextBuffer::from_text("one\ntwo\nthree\n");
        let before = buffer.spans().to_vec();
        buffer.recompute_spans();
        buffer.recompute_spans();
        assert_eq!(buffer.spans(), &before[..]);
    }

    #[test]
    fn change_defaults_to_unchanged_in_bounds_only() {
        let buffer = TextBuffer::from_text("x\n");
        assert_eq!(buffer.change(0), Some(LineChange::Unchanged));
        assert_eq!(buffer.change(1), None);
    }
}
