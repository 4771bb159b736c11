//! Unified diff reader.
//!
//! Turns raw patch text into `PatchedFile` values. The input may be a git
//! style diff (`diff --git` sections) or a plain unified diff where files are
//! only delimited by `---`/`+++` pairs.
//!
//! A malformed section is isolated: in `RunMode::Lenient` it is dropped from
//! the result and recorded as a `ParseFailure`, so one corrupt hunk does not
//! cost the whole run. `RunMode::Strict` turns the first failure into an
//! error instead.

use crate::error::{Error, Result};
use crate::models::hunk::{Hunk, HunkLine, LineKind, PatchedFile};
use crate::models::RunMode;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed hunk header '{0}'")]
    MalformedHeader(String),

    #[error(
        "hunk at -{old_start} declares {expected_old} old/{expected_new} new lines but the body has {found_old}/{found_new}"
    )]
    CountMismatch {
        old_start: usize,
        expected_old: usize,
        expected_new: usize,
        found_old: usize,
        found_new: usize,
    },

    #[error("hunk at -{0} has no body lines")]
    EmptyHunk(usize),

    #[error("unexpected line after hunk: '{0}'")]
    UnexpectedLine(String),

    #[error("file header does not name a path")]
    MissingPath,

    #[error("file header '{0}' is missing its other half")]
    IncompleteFileHeader(String),

    #[error("file header is not followed by any hunk")]
    NoHunks,
}

#[derive(Debug, Clone, Serialize)]
/// A file section that could not be parsed.
pub struct ParseFailure {
    pub path: Option<String>,
    /// 1-based line in the patch where the problem was detected.
    pub line: usize,
    #[serde(serialize_with = "crate::utils::serialize_display")]
    pub error: ParseError,
}

#[derive(Debug, Clone, Serialize)]
/// A well-formed section without content changes (rename, mode, binary).
pub struct SkippedSection {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ParsedPatch {
    pub files: Vec<PatchedFile>,
    pub failures: Vec<ParseFailure>,
    pub skipped: Vec<SkippedSection>,
}

impl ParsedPatch {
    /// True when nothing usable came out of the input.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

enum Section {
    File(PatchedFile),
    Skipped(SkippedSection),
    Failed(ParseFailure),
}

struct HunkHeader {
    old_start: usize,
    old_count: usize,
    new_start: usize,
    new_count: usize,
    section: String,
}

/// Parse unified diff text.
///
/// Files come back in the order they appear. Empty input yields an empty
/// `ParsedPatch`; callers must treat that as "not a unified diff".
pub fn parse(raw: &str, mode: RunMode) -> Result<ParsedPatch> {
    let text = raw.replace("\r\n", "\n");
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }

    let mut out = ParsedPatch::default();
    for (start, end) in split_sections(&lines) {
        match parse_section(&lines[start..end], start) {
            Section::File(f) => out.files.push(f),
            Section::Skipped(s) => {
                tracing::debug!(path = %s.path, reason = %s.reason, "section without hunks");
                out.skipped.push(s);
            }
            Section::Failed(f) => {
                if mode == RunMode::Strict {
                    return Err(Error::Parse {
                        path: f.path.unwrap_or_else(|| "<unknown>".into()),
                        line: f.line,
                        source: f.error,
                    });
                }
                tracing::warn!(line = f.line, "dropping file section: {}", f.error);
                out.failures.push(f);
            }
        }
    }
    Ok(out)
}

/// Parse a single hunk block (header plus body) with no file header.
pub fn parse_hunk(raw: &str) -> std::result::Result<Hunk, ParseError> {
    let text = raw.replace("\r\n", "\n");
    let mut lines: Vec<&str> = text.split('\n').collect();
    if lines.last() == Some(&"") {
        lines.pop();
    }
    let first = lines
        .iter()
        .position(|l| l.starts_with("@@"))
        .ok_or_else(|| ParseError::MalformedHeader(String::new()))?;
    let (hunk, used) = read_hunk(&lines, first)?;
    if let Some(extra) = lines[first + used..]
        .iter()
        .find(|l| l.starts_with(' ') || l.starts_with('+') || l.starts_with('-'))
    {
        return Err(ParseError::UnexpectedLine(extra.to_string()));
    }
    Ok(hunk)
}

fn hunk_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@(.*)$")
            .expect("hunk header regex")
    })
}

fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    let caps = hunk_header_re().captures(line)?;
    let num = |i: usize, default: usize| -> Option<usize> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };
    Some(HunkHeader {
        old_start: num(1, 0)?,
        old_count: num(2, 1)?,
        new_start: num(3, 0)?,
        new_count: num(4, 1)?,
        section: caps.get(5).map(|m| m.as_str().to_string()).unwrap_or_default(),
    })
}

/// `---`/`+++`/`@@` triple.
fn is_plain_file_header(lines: &[&str], i: usize) -> bool {
    lines[i].starts_with("--- ")
        && lines.get(i + 1).is_some_and(|l| l.starts_with("+++ "))
        && lines.get(i + 2).is_some_and(|l| l.starts_with("@@"))
}

fn is_lone_file_header(line: &str) -> bool {
    line.starts_with("--- ") || line.starts_with("+++ ")
}

/// End of a hunk body when the lines from `from` meet the declared counts
/// exactly, trailing `\` markers included.
fn counted_body_end(lines: &[&str], from: usize, old: usize, new: usize) -> Option<usize> {
    let (mut old_left, mut new_left) = (old, new);
    let mut j = from;
    while old_left > 0 || new_left > 0 {
        match lines.get(j)?.chars().next() {
            None | Some(' ') => {
                old_left = old_left.checked_sub(1)?;
                new_left = new_left.checked_sub(1)?;
            }
            Some('-') => old_left = old_left.checked_sub(1)?,
            Some('+') => new_left = new_left.checked_sub(1)?,
            Some('\\') => {}
            _ => return None,
        }
        j += 1;
    }
    while lines.get(j).is_some_and(|l| l.starts_with('\\')) {
        j += 1;
    }
    Some(j)
}

/// Index just past a hunk body. Declared counts win; a body that cannot
/// meet them is cut at the next file header instead.
fn skip_hunk_body(lines: &[&str], from: usize, old: usize, new: usize) -> usize {
    if let Some(end) = counted_body_end(lines, from, old, new) {
        return end;
    }
    let (mut old_left, mut new_left) = (old, new);
    let mut j = from;
    while j < lines.len() && (old_left > 0 || new_left > 0) && !is_plain_file_header(lines, j) {
        match lines[j].chars().next() {
            None | Some(' ') => {
                old_left = old_left.saturating_sub(1);
                new_left = new_left.saturating_sub(1);
            }
            Some('-') => old_left = old_left.saturating_sub(1),
            Some('+') => new_left = new_left.saturating_sub(1),
            Some('\\') => {}
            _ => break,
        }
        j += 1;
    }
    j
}

/// Find `[start, end)` ranges of file sections.
///
/// A hunk ahead of any file header, or a `---`/`+++` line without its
/// partner, opens a section of its own so it surfaces as a failure.
fn split_sections(lines: &[&str]) -> Vec<(usize, usize)> {
    let mut starts: Vec<usize> = Vec::new();
    let mut in_git_header = false;
    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if line.starts_with("diff --git ") {
            starts.push(i);
            in_git_header = true;
        } else if line.starts_with("--- ")
            && lines.get(i + 1).is_some_and(|l| l.starts_with("+++ "))
        {
            if !in_git_header {
                starts.push(i);
            }
            in_git_header = false;
            i += 2;
            continue;
        } else if let Some(h) = parse_hunk_header(line) {
            if starts.is_empty() {
                starts.push(i);
            }
            in_git_header = false;
            i = skip_hunk_body(lines, i + 1, h.old_count, h.new_count);
            continue;
        } else if !in_git_header && is_lone_file_header(line) {
            starts.push(i);
        }
        i += 1;
    }

    let mut ranges = Vec::with_capacity(starts.len());
    for (n, s) in starts.iter().enumerate() {
        let e = starts.get(n + 1).copied().unwrap_or(lines.len());
        ranges.push((*s, e));
    }
    ranges
}

/// Read one hunk starting at its header line. Returns the hunk and the
/// number of lines consumed, header included.
fn read_hunk(lines: &[&str], at: usize) -> std::result::Result<(Hunk, usize), ParseError> {
    let header = parse_hunk_header(lines[at])
        .ok_or_else(|| ParseError::MalformedHeader(lines[at].to_string()))?;
    let (mut old_left, mut new_left) = (header.old_count, header.new_count);
    let mut body: Vec<HunkLine> = Vec::new();
    let mut j = at + 1;
    while j < lines.len() && (old_left > 0 || new_left > 0) {
        let line = lines[j];
        if line.starts_with('\\') {
            j += 1;
            continue;
        }
        let (kind, text) = match line.chars().next() {
            None => (LineKind::Context, ""),
            Some(c) => match LineKind::from_marker(c) {
                Some(k) => (k, &line[1..]),
                None => break,
            },
        };
        match kind {
            LineKind::Context => {
                old_left = old_left.saturating_sub(1);
                new_left = new_left.saturating_sub(1);
            }
            LineKind::Removed => old_left = old_left.saturating_sub(1),
            LineKind::Added => new_left = new_left.saturating_sub(1),
        }
        body.push(HunkLine {
            kind,
            text: text.to_string(),
        });
        j += 1;
    }
    while j < lines.len() && lines[j].starts_with('\\') {
        j += 1;
    }

    if body.is_empty() {
        return Err(ParseError::EmptyHunk(header.old_start));
    }
    let hunk = Hunk {
        old_start: header.old_start,
        old_count: header.old_count,
        new_start: header.new_start,
        new_count: header.new_count,
        section: header.section,
        lines: body,
    };
    if let Some((found_old, found_new)) = hunk.count_mismatch() {
        return Err(ParseError::CountMismatch {
            old_start: hunk.old_start,
            expected_old: hunk.old_count,
            expected_new: hunk.new_count,
            found_old,
            found_new,
        });
    }
    Ok((hunk, j - at))
}

/// Path from a `---`/`+++` header value. `None` for `/dev/null`.
fn header_path(value: &str) -> Option<String> {
    let v = value.split('\t').next().unwrap_or(value).trim_end();
    let v = v.trim_matches('"');
    if v == "/dev/null" {
        return None;
    }
    let v = v
        .strip_prefix("a/")
        .or_else(|| v.strip_prefix("b/"))
        .unwrap_or(v);
    clean_path(v)
}

fn clean_path(p: &str) -> Option<String> {
    let p = p.trim().trim_start_matches('/');
    if p.is_empty() {
        None
    } else {
        Some(p.to_string())
    }
}

/// b-side of `diff --git a/x b/y`.
fn git_header_path(rest: &str) -> Option<String> {
    let idx = rest.rfind(" b/")?;
    clean_path(&rest[idx + 3..])
}

fn parse_section(lines: &[&str], base: usize) -> Section {
    let mut git_path: Option<String> = None;
    let mut minus_path: Option<String> = None;
    let mut plus_path: Option<String> = None;
    let mut rename_from: Option<String> = None;
    let mut rename_to: Option<String> = None;
    let mut saw_file_header = false;
    let mut binary = false;
    let mut extended = false;
    let mut signature = false;
    let mut hunks: Vec<Hunk> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        if signature {
            i += 1;
            continue;
        }
        if let Some(rest) = line.strip_prefix("diff --git ") {
            git_path = git_header_path(rest);
            i += 1;
            continue;
        }
        if !saw_file_header
            && hunks.is_empty()
            && line.starts_with("--- ")
            && lines.get(i + 1).is_some_and(|l| l.starts_with("+++ "))
        {
            minus_path = header_path(&line[4..]);
            plus_path = header_path(&lines[i + 1][4..]);
            saw_file_header = true;
            i += 2;
            continue;
        }
        if !saw_file_header && hunks.is_empty() && is_lone_file_header(line) {
            return Section::Failed(ParseFailure {
                path: header_path(&line[4..]).or(git_path),
                line: base + i + 1,
                error: ParseError::IncompleteFileHeader(line.to_string()),
            });
        }
        if line.starts_with("@@") {
            match read_hunk(lines, i) {
                Ok((hunk, used)) => {
                    hunks.push(hunk);
                    i += used;
                    continue;
                }
                Err(error) => {
                    let path = plus_path
                        .clone()
                        .or(minus_path.clone())
                        .or(rename_to.clone())
                        .or(git_path.clone());
                    return Section::Failed(ParseFailure {
                        path,
                        line: base + i + 1,
                        error,
                    });
                }
            }
        }
        if line == "-- " {
            signature = true;
            i += 1;
            continue;
        }
        if hunks.is_empty() {
            if let Some(p) = line.strip_prefix("rename from ") {
                rename_from = clean_path(p);
                extended = true;
            } else if let Some(p) = line.strip_prefix("rename to ") {
                rename_to = clean_path(p);
                extended = true;
            } else if line.starts_with("Binary files ") || line == "GIT binary patch" {
                binary = true;
                extended = true;
            } else if [
                "copy from ",
                "copy to ",
                "new file mode ",
                "deleted file mode ",
                "old mode ",
                "new mode ",
                "similarity index ",
                "dissimilarity index ",
            ]
            .iter()
            .any(|p| line.starts_with(p))
            {
                extended = true;
            }
        } else if line.starts_with(' ') || line.starts_with('+') || line.starts_with('-') {
            return Section::Failed(ParseFailure {
                path: plus_path.or(minus_path).or(git_path),
                line: base + i + 1,
                error: ParseError::UnexpectedLine(line.to_string()),
            });
        }
        i += 1;
    }

    let path = plus_path
        .clone()
        .or(minus_path.clone())
        .or(rename_to.clone())
        .or(git_path.clone());
    let Some(path) = path else {
        return Section::Failed(ParseFailure {
            path: None,
            line: base + 1,
            error: ParseError::MissingPath,
        });
    };

    if hunks.is_empty() {
        if (extended && !saw_file_header) || binary {
            let reason = if binary {
                "binary file"
            } else if rename_from.is_some() || rename_to.is_some() {
                "rename without content changes"
            } else {
                "no content changes"
            };
            return Section::Skipped(SkippedSection {
                path,
                reason: reason.to_string(),
            });
        }
        return Section::Failed(ParseFailure {
            path: Some(path),
            line: base + 1,
            error: ParseError::NoHunks,
        });
    }

    let old_path = rename_from.or(minus_path).filter(|p| *p != path);
    let mut raw = lines.join("\n");
    raw.push('\n');
    Section::File(PatchedFile {
        path,
        old_path,
        hunks,
        raw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lenient(s: &str) -> ParsedPatch {
        parse(s, RunMode::Lenient).unwrap()
    }

    #[test]
    fn test_hunk_before_any_file_header_is_reported() {
        let src = "\
@@ -1,1 +1,1 @@
-a
+b
diff --git a/vendor/x.php b/vendor/x.php
--- a/vendor/x.php
+++ b/vendor/x.php
@@ -1 +1 @@
-c
+d
";
        let p = lenient(src);
        assert_eq!(p.files.len(), 1);
        assert_eq!(p.files[0].path, "vendor/x.php");
        assert_eq!(p.failures.len(), 1);
        assert_eq!(p.failures[0].path, None);
        assert_eq!(p.failures[0].line, 1);
        assert_eq!(p.failures[0].error, ParseError::MissingPath);

        assert!(matches!(
            parse(src, RunMode::Strict),
            Err(Error::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_hunk_bare_block() {
        let h = parse_hunk("@@ -1,2 +1,3 @@\n context\n-old\n+new1\n+new2\n").unwrap();
        assert_eq!(
            (h.old_start, h.old_count, h.new_start, h.new_count),
            (1, 2, 1, 3)
        );
        assert_eq!(h.lines.len(), 4);
        assert_eq!(h.lines[0].kind, LineKind::Context);
        assert_eq!(h.lines[1].kind, LineKind::Removed);
        assert_eq!(h.lines[2].kind, LineKind::Added);
        assert_eq!(h.lines[3].kind, LineKind::Added);
    }

    #[test]
    fn test_parse_hunk_rejects_short_body() {
        let err = parse_hunk("@@ -1,3 +1,3 @@\n a\n-b\n+c\n").unwrap_err();
        assert!(matches!(err, ParseError::CountMismatch { found_old: 2, .. }));
    }

    #[test]
    fn test_single_hunk_lines_are_tagged() {
        let src = "--- a/vendor/acme/module-x/a.phtml\n+++ b/vendor/acme/module-x/a.phtml\n@@ -1,2 +1,3 @@\n context\n-old\n+new1\n+new2\n";
        let p = lenient(src);
        assert_eq!(p.files.len(), 1);
        let f = &p.files[0];
        assert_eq!(f.path, "vendor/acme/module-x/a.phtml");
        assert_eq!(f.old_path, None);
        let h = &f.hunks[0];
        assert_eq!(
            (h.old_start, h.old_count, h.new_start, h.new_count),
            (1, 2, 1, 3)
        );
        let kinds: Vec<LineKind> = h.lines.iter().map(|l| l.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Context,
                LineKind::Removed,
                LineKind::Added,
                LineKind::Added
            ]
        );
        assert_eq!(h.lines[3].text, "new2");
    }

    #[test]
    fn test_empty_input_yields_no_files() {
        let p = lenient("");
        assert!(p.is_empty());
        assert!(p.failures.is_empty());
    }

    #[test]
    fn test_git_diff_multiple_files_and_hunks_in_order() {
        let src = "\
diff --git a/vendor/a/one.php b/vendor/a/one.php
index 111..222 100644
--- a/vendor/a/one.php
+++ b/vendor/a/one.php
@@ -1,3 +1,3 @@ class One
 a
-b
+B
 c
@@ -10,2 +10,3 @@
 x
+y
 z
diff --git a/vendor/a/two.php b/vendor/a/two.php
--- a/vendor/a/two.php
+++ b/vendor/a/two.php
@@ -5 +5 @@
-old
+new
";
        let p = lenient(src);
        assert_eq!(p.files.len(), 2);
        assert_eq!(p.files[0].path, "vendor/a/one.php");
        assert_eq!(p.files[0].hunks.len(), 2);
        assert_eq!(p.files[0].hunks[0].section, " class One");
        assert_eq!(p.files[0].hunks[1].old_start, 10);
        assert_eq!(p.files[1].path, "vendor/a/two.php");
        assert_eq!(p.files[1].hunks[0].old_count, 1);
        assert!(p.files[0].raw.starts_with("diff --git a/vendor/a/one.php"));
        assert!(p.files[0].raw.ends_with(" z\n"));
    }

    #[test]
    fn test_plain_diff_split_on_header_pairs_with_timestamps() {
        let src = "\
--- vendor/a/one.php\t2020-01-01 00:00:00
+++ vendor/a/one.php\t2020-01-02 00:00:00
@@ -1,1 +1,1 @@
-a
+b
--- vendor/a/two.php
+++ vendor/a/two.php
@@ -1,1 +1,1 @@
-c
+d
";
        let p = lenient(src);
        let paths: Vec<&str> = p.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["vendor/a/one.php", "vendor/a/two.php"]);
    }

    #[test]
    fn test_removed_line_looking_like_header_stays_in_body() {
        let src = "\
--- a/vendor/a/sql.txt
+++ b/vendor/a/sql.txt
@@ -1,2 +1,2 @@
--- comment
-++ other
+x
+y
";
        let p = lenient(src);
        assert_eq!(p.files.len(), 1);
        assert_eq!(p.files[0].hunks[0].old_lines(), vec!["-- comment", "++ other"]);
    }

    #[test]
    fn test_header_lookalikes_inside_counted_hunk_stay_in_body() {
        let src = "\
--- a/vendor/x.sql
+++ b/vendor/x.sql
@@ -1,2 +1,2 @@
 keep
--- old
+++ new
@@ -10,1 +10,1 @@
-a
+b
";
        let p = lenient(src);
        assert!(p.failures.is_empty());
        assert_eq!(p.files.len(), 1);
        let f = &p.files[0];
        assert_eq!(f.path, "vendor/x.sql");
        assert_eq!(f.hunks.len(), 2);
        assert_eq!(f.hunks[0].old_lines(), vec!["keep", "-- old"]);
        assert_eq!(f.hunks[0].new_lines(), vec!["keep", "++ new"]);
        assert_eq!(f.hunks[1].old_start, 10);
    }

    #[test]
    fn test_short_hunk_still_yields_to_next_file_header() {
        let src = "\
--- a/vendor/a/one.php
+++ b/vendor/a/one.php
@@ -1,4 +1,4 @@
 a
-b
+B
--- a/vendor/a/two.php
+++ b/vendor/a/two.php
@@ -1,1 +1,1 @@
-c
+d
";
        let p = lenient(src);
        assert_eq!(p.files.len(), 1);
        assert_eq!(p.files[0].path, "vendor/a/two.php");
        assert_eq!(p.failures.len(), 1);
        assert_eq!(p.failures[0].path.as_deref(), Some("vendor/a/one.php"));
        assert!(matches!(
            p.failures[0].error,
            ParseError::CountMismatch { .. }
        ));
    }

    #[test]
    fn test_lone_minus_header_fails_on_its_own() {
        let src = "\
--- a/vendor/a/one.php
+++ b/vendor/a/one.php
@@ -1,1 +1,1 @@
-a
+b
--- a/vendor/a/two.php
@@ -1,1 +1,1 @@
-c
+d
";
        let p = lenient(src);
        assert_eq!(p.files.len(), 1);
        assert_eq!(p.files[0].path, "vendor/a/one.php");
        assert_eq!(p.files[0].hunks[0].new_lines(), vec!["b"]);
        assert_eq!(p.failures.len(), 1);
        assert_eq!(p.failures[0].path.as_deref(), Some("vendor/a/two.php"));
        assert_eq!(p.failures[0].line, 6);
        assert!(matches!(
            p.failures[0].error,
            ParseError::IncompleteFileHeader(_)
        ));
    }

    #[test]
    fn test_crlf_input_is_normalized() {
        let src = "--- a/f.txt\r\n+++ b/f.txt\r\n@@ -1,2 +1,2 @@\r\n keep\r\n-a\r\n+b\r\n";
        let p = lenient(src);
        assert_eq!(p.files.len(), 1);
        assert_eq!(p.files[0].hunks[0].new_lines(), vec!["keep", "b"]);
        assert!(!p.files[0].raw.contains('\r'));
    }

    #[test]
    fn test_understated_count_is_rejected() {
        let src = "\
--- a/f.txt
+++ b/f.txt
@@ -1,3 +1,3 @@
 a
-b
+B
";
        let p = lenient(src);
        assert!(p.files.is_empty());
        assert_eq!(p.failures.len(), 1);
        assert!(matches!(
            p.failures[0].error,
            ParseError::CountMismatch {
                expected_old: 3,
                found_old: 2,
                ..
            }
        ));
        assert_eq!(p.failures[0].path.as_deref(), Some("f.txt"));
    }

    #[test]
    fn test_overstated_body_is_rejected() {
        let src = "\
--- a/f.txt
+++ b/f.txt
@@ -1,1 +1,1 @@
-b
+B
 extra
";
        let p = lenient(src);
        assert!(p.files.is_empty());
        assert!(matches!(p.failures[0].error, ParseError::UnexpectedLine(_)));
        assert_eq!(p.failures[0].line, 6);
    }

    #[test]
    fn test_second_file_malformed_keeps_first() {
        let src = "\
diff --git a/vendor/a/one.php b/vendor/a/one.php
--- a/vendor/a/one.php
+++ b/vendor/a/one.php
@@ -1,2 +1,2 @@
 a
-b
+B
diff --git a/vendor/a/two.php b/vendor/a/two.php
--- a/vendor/a/two.php
+++ b/vendor/a/two.php
@@ -1,3 +1,2 @@
 c
-d
";
        let p = lenient(src);
        assert_eq!(p.files.len(), 1);
        assert_eq!(p.files[0].path, "vendor/a/one.php");
        assert_eq!(p.failures.len(), 1);
        assert_eq!(p.failures[0].path.as_deref(), Some("vendor/a/two.php"));
    }

    #[test]
    fn test_strict_mode_fails_on_first_bad_section() {
        let src = "--- a/f.txt\n+++ b/f.txt\n@@ -1,2 +1,2 @@\n a\n";
        let err = parse(src, RunMode::Strict).unwrap_err();
        match err {
            Error::Parse { path, line, .. } => {
                assert_eq!(path, "f.txt");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_without_body_is_malformed() {
        let src = "--- a/f.txt\n+++ b/f.txt\n@@ -1,0 +1,0 @@\n";
        let p = lenient(src);
        assert!(p.files.is_empty());
        assert_eq!(p.failures[0].error, ParseError::EmptyHunk(1));
    }

    #[test]
    fn test_garbage_header_is_malformed() {
        let src = "--- a/f.txt\n+++ b/f.txt\n@@ -x,1 +1 @@\n-a\n+b\n";
        let p = lenient(src);
        assert!(matches!(p.failures[0].error, ParseError::MalformedHeader(_)));
    }

    #[test]
    fn test_rename_with_changes_reports_both_paths() {
        let src = "\
diff --git a/vendor/a/old.php b/vendor/a/new.php
similarity index 90%
rename from vendor/a/old.php
rename to vendor/a/new.php
--- a/vendor/a/old.php
+++ b/vendor/a/new.php
@@ -1 +1 @@
-x
+y
";
        let p = lenient(src);
        assert_eq!(p.files[0].path, "vendor/a/new.php");
        assert_eq!(p.files[0].old_path.as_deref(), Some("vendor/a/old.php"));
    }

    #[test]
    fn test_pure_rename_and_binary_are_skipped() {
        let src = "\
diff --git a/vendor/a/old.php b/vendor/a/new.php
similarity index 100%
rename from vendor/a/old.php
rename to vendor/a/new.php
diff --git a/vendor/a/logo.png b/vendor/a/logo.png
index 111..222 100644
Binary files a/vendor/a/logo.png and b/vendor/a/logo.png differ
";
        let p = lenient(src);
        assert!(p.files.is_empty());
        assert!(p.failures.is_empty());
        assert_eq!(p.skipped.len(), 2);
        assert_eq!(p.skipped[0].path, "vendor/a/new.php");
        assert_eq!(p.skipped[1].reason, "binary file");
    }

    #[test]
    fn test_deleted_file_uses_minus_side() {
        let src = "--- a/vendor/a/gone.php\n+++ /dev/null\n@@ -1,1 +0,0 @@\n-bye\n";
        let p = lenient(src);
        assert_eq!(p.files[0].path, "vendor/a/gone.php");
    }

    #[test]
    fn test_no_newline_marker_and_blank_context() {
        let src = "--- a/f.txt\n+++ b/f.txt\n@@ -1,3 +1,3 @@\n a\n\n-b\n\\ No newline at end of file\n+c\n\\ No newline at end of file\n";
        let p = lenient(src);
        assert_eq!(p.files.len(), 1);
        assert_eq!(p.files[0].hunks[0].old_lines(), vec!["a", "", "b"]);
    }

    #[test]
    fn test_preamble_and_signature_are_ignored() {
        let src = "\
From 123 Mon Sep 17 00:00:00 2001
Subject: [PATCH] fix

---
 f.txt | 2 +-

diff --git a/f.txt b/f.txt
--- a/f.txt
+++ b/f.txt
@@ -1 +1 @@
-a
+b
";
        let src = format!("{src}-- \n2.40.0\n");
        let p = lenient(&src);
        assert_eq!(p.files.len(), 1);
        assert!(p.failures.is_empty());
    }
}
