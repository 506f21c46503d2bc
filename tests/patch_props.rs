//! Property tests for the patch engine: generated text pairs are diffed
//! with the real diff producer, then pushed through the directional
//! transforms.

use git_timelapse::git::diff::unified_diff;
use git_timelapse::patch::{Alignment, Direction, Patch, TextBuffer};
use proptest::prelude::*;

/// Newline-terminated text of 0..8 short lines. Trailing-newline edge cases
/// get their own deterministic tests in `src/patch/apply.rs`.
fn text_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{0,6}", 0..8).prop_map(|lines| {
        if lines.is_empty() {
            String::new()
        } else {
            lines.join("\n") + "\n"
        }
    })
}

proptest! {
    #[test]
    fn plain_applications_round_trip(old in text_strategy(), new in text_strategy()) {
        prop_assume!(old != new);

        let diff = unified_diff(old.as_bytes(), new.as_bytes(), "f.txt").unwrap();
        let patch = Patch::parse(&diff).unwrap();

        let mut forward = TextBuffer::from_text(&old);
        forward.apply(&patch, Direction::Forward, Alignment::Plain).unwrap();
        prop_assert_eq!(forward.text(), new.clone());

        let mut backward = TextBuffer::from_text(&new);
        backward.apply(&patch, Direction::Backward, Alignment::Plain).unwrap();
        prop_assert_eq!(backward.text(), old);
    }

    #[test]
    fn aligned_panes_keep_equal_line_counts(old in text_strategy(), new in text_strategy()) {
        prop_assume!(old != new);

        let diff = unified_diff(old.as_bytes(), new.as_bytes(), "f.txt").unwrap();
        let patch = Patch::parse(&diff).unwrap();

        let mut left = TextBuffer::from_text(&old);
        left.apply(&patch, Direction::Forward, Alignment::Aligned).unwrap();
        let mut right = TextBuffer::from_text(&new);
        right.apply(&patch, Direction::Backward, Alignment::Aligned).unwrap();

        prop_assert_eq!(left.line_count(), right.line_count());
        prop_assert_eq!(left.changed_lines().len(), right.changed_lines().len());
    }

    #[test]
    fn offset_spans_cover_the_text_exactly(old in text_strategy()) {
        let buffer = TextBuffer::from_text(&old);

        let mut expected_start = 0;
        for i in 0..buffer.line_count() {
            let span = buffer.line_span(i).unwrap();
            prop_assert_eq!(span.start, expected_start);
            expected_start = span.end;
        }
        prop_assert_eq!(expected_start, buffer.text().len());
    }
}
