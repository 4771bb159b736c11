//! Fuzzy hunk application.
//!
//! Applies a hunk taken from a core file to a structurally similar copy of
//! that file (typically a theme override). The old side of the hunk is first
//! matched exactly at its nominal position. With a positive fuzz budget the
//! applier then trims leading/trailing context lines, one more line per
//! round, and searches a small window around the nominal position. The
//! number of trimmed lines is reported as `fuzz_used`. A hunk without any
//! context can only be moved by a position search, which costs one unit.
//!
//! Nothing is ever partially applied: a hunk either lands as a whole or is
//! rejected, and the input text is never modified in place.

use crate::models::hunk::Hunk;
use crate::models::RunMode;
use serde::Serialize;

/// Extra positional tolerance on top of the trimmed line count.
pub const POSITION_SLACK: usize = 2;

pub const NO_MATCH: &str = "no sufficiently similar context found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuzzResult {
    /// `line` is the 1-based first line of the replaced span in the target.
    Applied {
        new_text: String,
        fuzz_used: usize,
        line: usize,
    },
    Rejected {
        reason: String,
    },
}

impl FuzzResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, FuzzResult::Applied { .. })
    }

    fn rejected() -> Self {
        FuzzResult::Rejected {
            reason: NO_MATCH.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HunkStatus {
    Applied { fuzz_used: usize, line: usize },
    Rejected { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HunkReport {
    pub old_start: usize,
    #[serde(flatten)]
    pub status: HunkStatus,
}

#[derive(Debug, Clone)]
/// Result of applying all hunks of one file.
pub struct FileApply {
    /// Updated text, `None` when nothing should be written.
    pub text: Option<String>,
    pub hunks: Vec<HunkReport>,
}

impl FileApply {
    pub fn applied(&self) -> usize {
        self.hunks
            .iter()
            .filter(|h| matches!(h.status, HunkStatus::Applied { .. }))
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.hunks.len() - self.applied()
    }
}

struct Target<'a> {
    lines: Vec<&'a str>,
    crlf: bool,
    trailing_newline: bool,
}

impl<'a> Target<'a> {
    fn split(text: &'a str) -> Self {
        let crlf = text.contains("\r\n");
        let trailing_newline = text.ends_with('\n');
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            let body = text.strip_suffix('\n').unwrap_or(text);
            body.split('\n')
                .map(|l| l.strip_suffix('\r').unwrap_or(l))
                .collect()
        };
        Target {
            lines,
            crlf,
            trailing_newline,
        }
    }

    fn matches_at(&self, pos: isize, expected: &[&str]) -> bool {
        if pos < 0 {
            return false;
        }
        let pos = pos as usize;
        match self.lines.get(pos..pos + expected.len()) {
            Some(window) => window.iter().zip(expected).all(|(a, b)| a == b),
            None => false,
        }
    }

    /// Search outward from `centre`: 0, -1, +1, -2, +2, ...
    fn search(&self, expected: &[&str], centre: isize, window: usize) -> Option<usize> {
        for d in 0..=window as isize {
            if self.matches_at(centre - d, expected) {
                return Some((centre - d) as usize);
            }
            if d > 0 && self.matches_at(centre + d, expected) {
                return Some((centre + d) as usize);
            }
        }
        None
    }

    fn splice(&self, pos: usize, remove: usize, insert: &[&str]) -> String {
        let mut out: Vec<&str> = Vec::with_capacity(self.lines.len() + insert.len());
        out.extend_from_slice(&self.lines[..pos]);
        out.extend_from_slice(insert);
        out.extend_from_slice(&self.lines[pos + remove..]);
        let eol = if self.crlf { "\r\n" } else { "\n" };
        let mut s = out.join(eol);
        if !out.is_empty() && (self.trailing_newline || self.lines.is_empty()) {
            s.push_str(eol);
        }
        s
    }
}

fn nominal_index(hunk: &Hunk, delta: isize) -> isize {
    let base = if hunk.old_count == 0 {
        hunk.old_start
    } else {
        hunk.old_start.saturating_sub(1)
    };
    base as isize + delta
}

/// Apply one hunk to `target` with the given fuzz budget.
pub fn apply(hunk: &Hunk, target: &str, fuzz: usize) -> FuzzResult {
    apply_at(hunk, target, fuzz, 0)
}

/// Like `apply`, with the nominal position shifted by `delta` lines (the
/// net growth of hunks already applied earlier in the same file).
pub fn apply_at(hunk: &Hunk, target: &str, fuzz: usize, delta: isize) -> FuzzResult {
    let t = Target::split(target);
    let old = hunk.old_lines();
    let new = hunk.new_lines();
    let nominal = nominal_index(hunk, delta);

    if old.is_empty() {
        if nominal >= 0 && nominal as usize <= t.lines.len() {
            let pos = nominal as usize;
            return FuzzResult::Applied {
                new_text: t.splice(pos, 0, &new),
                fuzz_used: 0,
                line: pos + 1,
            };
        }
        return FuzzResult::rejected();
    }

    if t.matches_at(nominal, &old) {
        let pos = nominal as usize;
        return FuzzResult::Applied {
            new_text: t.splice(pos, old.len(), &new),
            fuzz_used: 0,
            line: pos + 1,
        };
    }

    let lead = hunk.leading_context();
    let trail = hunk.trailing_context();
    let max_total = fuzz.min(lead + trail);
    for total in 1..=max_total {
        for head in (0..=total).rev() {
            let tail = total - head;
            if head > lead || tail > trail || head + tail >= old.len() {
                continue;
            }
            let expected = &old[head..old.len() - tail];
            let centre = nominal + head as isize;
            if let Some(pos) = t.search(expected, centre, total + POSITION_SLACK) {
                return FuzzResult::Applied {
                    new_text: t.splice(pos, expected.len(), &new[head..new.len() - tail]),
                    fuzz_used: total,
                    line: pos + 1,
                };
            }
        }
    }
    // no context to trim: one unit of fuzz buys a position-only search
    if lead + trail == 0 && fuzz > 0 {
        if let Some(pos) = t.search(&old, nominal, 1 + POSITION_SLACK) {
            return FuzzResult::Applied {
                new_text: t.splice(pos, old.len(), &new),
                fuzz_used: 1,
                line: pos + 1,
            };
        }
    }
    FuzzResult::rejected()
}

/// Apply the hunks of one file in order, threading the line delta.
///
/// In `Lenient` mode the text is returned when at least one hunk landed; in
/// `Strict` mode only when every hunk landed.
pub fn apply_hunks(hunks: &[Hunk], target: &str, fuzz: usize, mode: RunMode) -> FileApply {
    let mut current = target.to_string();
    let mut delta: isize = 0;
    let mut reports = Vec::with_capacity(hunks.len());
    for h in hunks {
        let status = match apply_at(h, &current, fuzz, delta) {
            FuzzResult::Applied {
                new_text,
                fuzz_used,
                line,
            } => {
                current = new_text;
                delta += h.line_delta();
                HunkStatus::Applied { fuzz_used, line }
            }
            FuzzResult::Rejected { reason } => HunkStatus::Rejected { reason },
        };
        reports.push(HunkReport {
            old_start: h.old_start,
            status,
        });
    }
    let mut out = FileApply {
        text: None,
        hunks: reports,
    };
    let keep = match mode {
        RunMode::Strict => out.rejected() == 0 && out.applied() > 0,
        RunMode::Lenient => out.applied() > 0,
    };
    if keep {
        out.text = Some(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::parse_hunk;

    const SCENARIO: &str = "@@ -1,2 +1,3 @@\n context\n-old\n+new1\n+new2\n";

    fn applied_text(r: &FuzzResult) -> &str {
        match r {
            FuzzResult::Applied { new_text, .. } => new_text,
            FuzzResult::Rejected { reason } => panic!("rejected: {reason}"),
        }
    }

    #[test]
    fn test_exact_apply_roundtrip() {
        let h = parse_hunk(SCENARIO).unwrap();
        let r = apply(&h, "context\nold\n", 0);
        assert_eq!(applied_text(&r), "context\nnew1\nnew2\n");
        assert!(matches!(r, FuzzResult::Applied { fuzz_used: 0, line: 1, .. }));
    }

    #[test]
    fn test_roundtrip_reproduces_new_side() {
        let h = parse_hunk(
            "@@ -2,4 +2,4 @@ fn x\n a\n b\n-c\n+C\n d\n",
        )
        .unwrap();
        let old = format!("top\n{}\n", h.old_lines().join("\n"));
        let r = apply(&h, &old, 0);
        assert_eq!(applied_text(&r), format!("top\n{}\n", h.new_lines().join("\n")));
    }

    #[test]
    fn test_shift_needs_fuzz() {
        let h = parse_hunk(SCENARIO).unwrap();
        let target = "unrelated\ncontext\nold\n";
        assert_eq!(
            apply(&h, target, 0),
            FuzzResult::Rejected {
                reason: NO_MATCH.into()
            }
        );
        let r = apply(&h, target, 1);
        assert_eq!(applied_text(&r), "unrelated\ncontext\nnew1\nnew2\n");
        assert!(matches!(r, FuzzResult::Applied { fuzz_used: 1, .. }));
    }

    #[test]
    fn test_two_line_shift_within_window() {
        let h = parse_hunk(SCENARIO).unwrap();
        let r = apply(&h, "u1\nu2\ncontext\nold\n", 1);
        assert_eq!(applied_text(&r), "u1\nu2\ncontext\nnew1\nnew2\n");
    }

    #[test]
    fn test_fuzz_monotonic() {
        let h = parse_hunk("@@ -3,5 +3,5 @@\n a\n b\n-c\n+C\n d\n e\n").unwrap();
        let target = "x\ny\nz\nA\nb\nc\nd\nE\n";
        assert!(!apply(&h, target, 0).is_applied());
        let mut first: Option<usize> = None;
        for k in 0..6 {
            if let FuzzResult::Applied { fuzz_used, .. } = apply(&h, target, k) {
                let need = *first.get_or_insert(k);
                assert!(fuzz_used <= need);
                assert!(k >= need);
            } else {
                assert!(first.is_none(), "failed at {k} after succeeding");
            }
        }
        assert_eq!(first, Some(2));
        let r = apply(&h, target, 4);
        assert_eq!(applied_text(&r), "x\ny\nz\nA\nb\nC\nd\nE\n");
    }

    #[test]
    fn test_rejects_far_away_block() {
        let h = parse_hunk(SCENARIO).unwrap();
        let mut target = String::new();
        for i in 0..20 {
            target.push_str(&format!("filler{i}\n"));
        }
        target.push_str("context\nold\n");
        let r = apply(&h, &target, 1);
        assert!(!r.is_applied());
    }

    #[test]
    fn test_removed_lines_are_never_trimmed() {
        // Only the removed line differs; no amount of fuzz should skip it.
        let h = parse_hunk(SCENARIO).unwrap();
        let r = apply(&h, "context\nOLD\n", 5);
        assert!(!r.is_applied());
    }

    #[test]
    fn test_crlf_target_keeps_line_endings() {
        let h = parse_hunk(SCENARIO).unwrap();
        let r = apply(&h, "context\r\nold\r\n", 0);
        assert_eq!(applied_text(&r), "context\r\nnew1\r\nnew2\r\n");
    }

    #[test]
    fn test_missing_trailing_newline_is_preserved() {
        let h = parse_hunk(SCENARIO).unwrap();
        let r = apply(&h, "context\nold", 0);
        assert_eq!(applied_text(&r), "context\nnew1\nnew2");
    }

    #[test]
    fn test_pure_insertion_into_empty_file() {
        let h = parse_hunk("@@ -0,0 +1,2 @@\n+a\n+b\n").unwrap();
        let r = apply(&h, "", 0);
        assert_eq!(applied_text(&r), "a\nb\n");
    }

    #[test]
    fn test_zero_context_hunk_moves_only_with_fuzz() {
        let h = parse_hunk("@@ -2,1 +2,1 @@\n-old\n+new\n").unwrap();
        let target = "a\nextra\nold\nz\n";
        assert!(!apply(&h, target, 0).is_applied());
        let r = apply(&h, target, 1);
        assert_eq!(applied_text(&r), "a\nextra\nnew\nz\n");
        assert!(matches!(
            r,
            FuzzResult::Applied {
                fuzz_used: 1,
                line: 3,
                ..
            }
        ));
        assert!(!apply(&h, "a\nb\nc\nd\ne\nf\nold\n", 3).is_applied());
    }

    #[test]
    fn test_apply_hunks_threads_delta() {
        let h1 = parse_hunk("@@ -1,2 +1,4 @@\n a\n+a1\n+a2\n b\n").unwrap();
        let h2 = parse_hunk("@@ -5,2 +7,2 @@\n e\n-f\n+F\n").unwrap();
        let out = apply_hunks(&[h1, h2], "a\nb\nc\nd\ne\nf\n", 0, RunMode::Lenient);
        assert_eq!(out.text.as_deref(), Some("a\na1\na2\nb\nc\nd\ne\nF\n"));
        assert_eq!(out.applied(), 2);
        assert_eq!(
            out.hunks[1].status,
            HunkStatus::Applied {
                fuzz_used: 0,
                line: 7
            }
        );
    }

    #[test]
    fn test_apply_hunks_strict_keeps_nothing_on_rejection() {
        let h1 = parse_hunk("@@ -1,2 +1,2 @@\n a\n-b\n+B\n").unwrap();
        let h2 = parse_hunk("@@ -4,1 +4,1 @@\n-zzz\n+yyy\n").unwrap();
        let target = "a\nb\nc\nd\n";
        let lenient = apply_hunks(&[h1.clone(), h2.clone()], target, 0, RunMode::Lenient);
        assert_eq!(lenient.text.as_deref(), Some("a\nB\nc\nd\n"));
        assert_eq!(lenient.rejected(), 1);
        let strict = apply_hunks(&[h1, h2], target, 0, RunMode::Strict);
        assert!(strict.text.is_none());
        assert_eq!(strict.applied(), 1);
    }
}
