//! Parser for unified-diff text.
//!
//! Accepts the format git produces: optional `diff --git` / `---` / `+++`
//! header lines, hunk headers `@@ -oldStart[,oldCount] +newStart[,newCount] @@`,
//! body lines prefixed with space, `-` or `+`, and the optional
//! `\ No newline at end of file` marker. Unknown lines between file headers
//! (index, mode) are skipped; unknown lines inside a hunk body are not.

use crate::error::{AppError, Result};
use crate::patch::{FilePatch, Hunk, LineTag, Patch};

const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

impl Patch {
    pub fn parse(text: &str) -> Result<Patch> {
        Parser::default().parse(text)
    }
}

#[derive(Default)]
struct Parser {
    files: Vec<FilePatch>,
    current: Option<FilePatch>,
    /// Old-side and new-side body lines still owed by the open hunk header.
    pending: Option<(u32, u32)>,
}

impl Parser {
    fn parse(mut self, text: &str) -> Result<Patch> {
        for line in text.lines() {
            // While the open hunk header still owes body lines, everything
            // is body: a removed line whose content starts with "-- " must
            // not be mistaken for a `---` file header.
            if self.mid_hunk() || line == NO_NEWLINE_MARKER {
                self.body_line(line)?;
            } else if line.starts_with("diff --git ") {
                self.finish_hunk()?;
                self.finish_file();
                self.current = Some(FilePatch {
                    old_path: None,
                    new_path: None,
                    hunks: Vec::new(),
                });
            } else if let Some(path) = line.strip_prefix("--- ") {
                self.header_path(|file| &mut file.old_path, path);
            } else if let Some(path) = line.strip_prefix("+++ ") {
                self.header_path(|file| &mut file.new_path, path);
            } else if line.starts_with("@@ -") {
                self.finish_hunk()?;
                let (old_start, old_lines, new_start, new_lines) = parse_hunk_header(line)?;
                self.file_mut().hunks.push(Hunk {
                    old_start,
                    old_lines,
                    new_start,
                    new_lines,
                    lines: Vec::new(),
                    no_newline_old: false,
                    no_newline_new: false,
                });
                self.pending = Some((old_lines, new_lines));
            } else if self.pending.is_some()
                && (line.starts_with(' ') || line.starts_with('+') || line.starts_with('-'))
            {
                return Err(AppError::MalformedHunk(format!(
                    "hunk body is longer than its header promises at {line:?}"
                )));
            }
            // Anything else outside a hunk body (index lines, mode lines,
            // similarity scores) is header noise and skipped.
        }
        self.finish_hunk()?;
        self.finish_file();

        Ok(Patch { files: self.files })
    }

    fn mid_hunk(&self) -> bool {
        matches!(self.pending, Some((old, new)) if old > 0 || new > 0)
    }

    fn body_line(&mut self, line: &str) -> Result<()> {
        if line == NO_NEWLINE_MARKER {
            let tag = self.last_line_tag();
            let hunk = self.hunk_mut()?;
            match tag {
                Some(LineTag::Removed) => hunk.no_newline_old = true,
                Some(LineTag::Added) => hunk.no_newline_new = true,
                // After a context line the marker applies to both sides.
                _ => {
                    hunk.no_newline_old = true;
                    hunk.no_newline_new = true;
                }
            }
            return Ok(());
        }

        let (tag, text) = match line.split_at_checked(1) {
            Some((" ", rest)) => (LineTag::Context, rest),
            Some(("-", rest)) => (LineTag::Removed, rest),
            Some(("+", rest)) => (LineTag::Added, rest),
            // Some producers emit completely empty context lines.
            None | Some(("", _)) => (LineTag::Context, ""),
            _ => {
                return Err(AppError::MalformedHunk(format!(
                    "unrecognized body line {line:?}"
                )));
            }
        };

        let (old_left, new_left) = self
            .pending
            .ok_or_else(|| AppError::MalformedHunk(format!("body line {line:?} outside a hunk")))?;
        let (old_cost, new_cost) = match tag {
            LineTag::Context => (1, 1),
            LineTag::Removed => (1, 0),
            LineTag::Added => (0, 1),
        };
        if old_left < old_cost || new_left < new_cost {
            return Err(AppError::MalformedHunk(format!(
                "hunk body is longer than its header promises at {line:?}"
            )));
        }
        self.pending = Some((old_left - old_cost, new_left - new_cost));
        self.hunk_mut()?.lines.push((tag, text.to_string()));

        Ok(())
    }

    fn header_path(&mut self, select: impl Fn(&mut FilePatch) -> &mut Option<String>, raw: &str) {
        let file = self.file_mut();
        let path = match raw {
            "/dev/null" => None,
            p => Some(
                p.strip_prefix("a/")
                    .or_else(|| p.strip_prefix("b/"))
                    .unwrap_or(p)
                    .to_string(),
            ),
        };
        *select(file) = path;
    }

    fn file_mut(&mut self) -> &mut FilePatch {
        self.current.get_or_insert_with(|| FilePatch {
            old_path: None,
            new_path: None,
            hunks: Vec::new(),
        })
    }

    fn hunk_mut(&mut self) -> Result<&mut Hunk> {
        self.current
            .as_mut()
            .and_then(|f| f.hunks.last_mut())
            .ok_or_else(|| AppError::MalformedHunk("body line before any hunk header".to_string()))
    }

    fn last_line_tag(&self) -> Option<LineTag> {
        self.current
            .as_ref()
            .and_then(|f| f.hunks.last())
            .and_then(|h| h.lines.last())
            .map(|(tag, _)| *tag)
    }

    fn finish_hunk(&mut self) -> Result<()> {
        if let Some((old_left, new_left)) = self.pending.take() {
            if old_left > 0 || new_left > 0 {
                return Err(AppError::MalformedHunk(format!(
                    "hunk body is shorter than its header promises ({old_left} old, \
                     {new_left} new lines missing)"
                )));
            }
        }
        Ok(())
    }

    fn finish_file(&mut self) {
        if let Some(file) = self.current.take() {
            self.files.push(file);
        }
    }
}

/// `@@ -oldStart[,oldCount] +newStart[,newCount] @@ ...`
fn parse_hunk_header(line: &str) -> Result<(u32, u32, u32, u32)> {
    let malformed = || AppError::MalformedHunk(format!("bad hunk header {line:?}"));

    let rest = line.strip_prefix("@@ -").ok_or_else(malformed)?;
    let (old_part, rest) = rest.split_once(" +").ok_or_else(malformed)?;
    let (new_part, _) = rest.split_once(" @@").ok_or_else(malformed)?;

    let (old_start, old_lines) = parse_range(old_part).ok_or_else(malformed)?;
    let (new_start, new_lines) = parse_range(new_part).ok_or_else(malformed)?;

    Ok((old_start, old_lines, new_start, new_lines))
}

fn parse_range(s: &str) -> Option<(u32, u32)> {
    match s.split_once(',') {
        Some((start, count)) => Some((start.parse().ok()?, count.parse().ok()?)),
        None => Some((s.parse().ok()?, 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SIMPLE: &str = "\
diff --git a/f.txt b/f.txt
index 1234567..89abcde 100644
--- a/f.txt
+++ b/f.txt
@@ -1,2 +1,3 @@
 x
-y
+y2
+z
";

    #[test]
    fn parses_single_file_diff() {
        let patch = Patch::parse(SIMPLE).unwrap();
        let file = patch.single_file().unwrap();

        assert_eq!(file.old_path.as_deref(), Some("f.txt"));
        assert_eq!(file.new_path.as_deref(), Some("f.txt"));
        assert_eq!(file.hunks.len(), 1);

        let hunk = &file.hunks[0];
        assert_eq!(
            (hunk.old_start, hunk.old_lines, hunk.new_start, hunk.new_lines),
            (1, 2, 1, 3)
        );
        assert_eq!(
            hunk.lines,
            vec![
                (LineTag::Context, "x".to_string()),
                (LineTag::Removed, "y".to_string()),
                (LineTag::Added, "y2".to_string()),
                (LineTag::Added, "z".to_string()),
            ]
        );
        assert!(!hunk.no_newline_old);
        assert!(!hunk.no_newline_new);
    }

    #[test]
    fn parses_headerless_hunks() {
        let patch = Patch::parse("@@ -1 +1 @@\n-a\n+b\n").unwrap();
        let file = patch.single_file().unwrap();
        assert_eq!(file.hunks[0].lines.len(), 2);
    }

    #[test]
    fn counts_omitted_in_header_default_to_one() {
        let patch = Patch::parse("@@ -3 +4,2 @@\n-a\n+b\n+c\n").unwrap();
        let hunk = &patch.files[0].hunks[0];
        assert_eq!((hunk.old_start, hunk.old_lines), (3, 1));
        assert_eq!((hunk.new_start, hunk.new_lines), (4, 2));
    }

    #[test]
    fn no_newline_marker_lands_on_the_right_side() {
        let text = "\
--- a/f.txt
+++ b/f.txt
@@ -1 +1,2 @@
-a
\\ No newline at end of file
+a
+b
";
        let patch = Patch::parse(text).unwrap();
        let hunk = &patch.files[0].hunks[0];
        assert!(hunk.no_newline_old);
        assert!(!hunk.no_newline_new);
    }

    #[test]
    fn no_newline_marker_after_context_applies_to_both_sides() {
        let text = "@@ -1,2 +1,2 @@\n-a\n+b\n c\n\\ No newline at end of file\n";
        let patch = Patch::parse(text).unwrap();
        let hunk = &patch.files[0].hunks[0];
        assert!(hunk.no_newline_old);
        assert!(hunk.no_newline_new);
    }

    #[test]
    fn multi_file_diff_fails_the_shape_check() {
        let text = "\
diff --git a/f.txt b/f.txt
--- a/f.txt
+++ b/f.txt
@@ -1 +1 @@
-a
+b
diff --git a/g.txt b/g.txt
--- a/g.txt
+++ b/g.txt
@@ -1 +1 @@
-c
+d
";
        let patch = Patch::parse(text).unwrap();
        assert_eq!(patch.files.len(), 2);
        assert!(matches!(
            patch.single_file(),
            Err(AppError::InvalidPatchShape(2))
        ));
    }

    #[test]
    fn empty_text_has_no_files() {
        let patch = Patch::parse("").unwrap();
        assert!(matches!(
            patch.single_file(),
            Err(AppError::InvalidPatchShape(0))
        ));
    }

    #[test]
    fn rejects_bad_hunk_header() {
        assert!(matches!(
            Patch::parse("@@ -x +1 @@\n"),
            Err(AppError::MalformedHunk(_))
        ));
    }

    #[test]
    fn rejects_short_hunk_body() {
        assert!(matches!(
            Patch::parse("@@ -1,2 +1,2 @@\n a\n"),
            Err(AppError::MalformedHunk(_))
        ));
    }

    #[test]
    fn rejects_overlong_hunk_body() {
        assert!(matches!(
            Patch::parse("@@ -1 +1 @@\n a\n b\n"),
            Err(AppError::MalformedHunk(_))
        ));
    }
}
