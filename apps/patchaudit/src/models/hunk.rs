//! Parsed patch data: files, hunks and tagged lines.
//!
//! Values here are produced by `diff::parse` and never mutated afterwards.
//! The applier reads them through the old/new side accessors.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Tag of a hunk body line, taken from its leading marker.
pub enum LineKind {
    Context,
    Removed,
    Added,
}

impl LineKind {
    pub fn from_marker(c: char) -> Option<Self> {
        match c {
            ' ' => Some(LineKind::Context),
            '-' => Some(LineKind::Removed),
            '+' => Some(LineKind::Added),
            _ => None,
        }
    }

    pub fn marker(self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Removed => '-',
            LineKind::Added => '+',
        }
    }

    fn on_old_side(self) -> bool {
        matches!(self, LineKind::Context | LineKind::Removed)
    }

    fn on_new_side(self) -> bool {
        matches!(self, LineKind::Context | LineKind::Added)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HunkLine {
    pub kind: LineKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One `@@ -l,c +l,c @@` block.
pub struct Hunk {
    pub old_start: usize,
    pub old_count: usize,
    pub new_start: usize,
    pub new_count: usize,
    /// Text after the closing `@@`, usually a function signature.
    pub section: String,
    pub lines: Vec<HunkLine>,
}

impl Hunk {
    /// Context and removed lines, in order.
    pub fn old_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.kind.on_old_side())
            .map(|l| l.text.as_str())
            .collect()
    }

    /// Context and added lines, in order.
    pub fn new_lines(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|l| l.kind.on_new_side())
            .map(|l| l.text.as_str())
            .collect()
    }

    /// Number of context lines before the first change.
    pub fn leading_context(&self) -> usize {
        self.lines
            .iter()
            .take_while(|l| l.kind == LineKind::Context)
            .count()
    }

    /// Number of context lines after the last change.
    pub fn trailing_context(&self) -> usize {
        self.lines
            .iter()
            .rev()
            .take_while(|l| l.kind == LineKind::Context)
            .count()
    }

    /// Net change in file length once this hunk is applied.
    pub fn line_delta(&self) -> isize {
        self.new_count as isize - self.old_count as isize
    }

    /// Check the declared counts against the body.
    ///
    /// Returns `(old_found, new_found)` on mismatch so the reader can report
    /// both sides.
    pub fn count_mismatch(&self) -> Option<(usize, usize)> {
        let old_found = self.lines.iter().filter(|l| l.kind.on_old_side()).count();
        let new_found = self.lines.iter().filter(|l| l.kind.on_new_side()).count();
        if old_found != self.old_count || new_found != self.new_count {
            Some((old_found, new_found))
        } else {
            None
        }
    }
}

impl fmt::Display for Hunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@@ -{},{} +{},{} @@{}",
            self.old_start, self.old_count, self.new_start, self.new_count, self.section
        )?;
        for l in &self.lines {
            write!(f, "\n{}{}", l.kind.marker(), l.text)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One file entry of a (possibly multi-file) unified diff.
pub struct PatchedFile {
    /// Core-relative path, no leading slash.
    pub path: String,
    /// Previous path when the section renames the file.
    pub old_path: Option<String>,
    pub hunks: Vec<Hunk>,
    /// Verbatim section text with LF line endings.
    #[serde(skip)]
    pub raw: String,
}

impl fmt::Display for PatchedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(kind: LineKind, text: &str) -> HunkLine {
        HunkLine {
            kind,
            text: text.into(),
        }
    }

    fn sample() -> Hunk {
        Hunk {
            old_start: 3,
            old_count: 4,
            new_start: 3,
            new_count: 4,
            section: " function foo()".into(),
            lines: vec![
                line(LineKind::Context, "a"),
                line(LineKind::Context, "b"),
                line(LineKind::Removed, "c"),
                line(LineKind::Added, "C"),
                line(LineKind::Context, "d"),
            ],
        }
    }

    #[test]
    fn test_sides_and_context_counts() {
        let h = sample();
        assert_eq!(h.old_lines(), vec!["a", "b", "c", "d"]);
        assert_eq!(h.new_lines(), vec!["a", "b", "C", "d"]);
        assert_eq!(h.leading_context(), 2);
        assert_eq!(h.trailing_context(), 1);
        assert_eq!(h.line_delta(), 0);
        assert_eq!(h.count_mismatch(), None);
    }

    #[test]
    fn test_count_mismatch_reports_found_sides() {
        let mut h = sample();
        h.old_count = 5;
        assert_eq!(h.count_mismatch(), Some((4, 4)));
    }

    #[test]
    fn test_display_renders_unified_block() {
        let h = sample();
        let s = h.to_string();
        assert!(s.starts_with("@@ -3,4 +3,4 @@ function foo()\n a\n b\n-c\n+C\n d"));
    }
}
