//! Shared data models for parsed patches and analysis output.

pub mod hunk;

use crate::locator::OverrideKind;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// How problems inside a run are treated.
///
/// `Lenient` isolates a bad file section or rejected hunk and carries on;
/// `Strict` makes the first one fatal.
pub enum RunMode {
    #[default]
    Lenient,
    Strict,
}

impl RunMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            RunMode::Strict
        } else {
            RunMode::Lenient
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A core file superseded by an override.
pub struct OverrideFinding {
    pub kind: OverrideKind,
    pub source_file: String,
    pub overriding_location: String,
}

#[derive(Debug, Default, Serialize)]
/// Aggregated counts used by printers.
pub struct Summary {
    pub files: usize,
    pub skipped: usize,
    pub findings: usize,
    pub parse_failures: usize,
    pub hunks_applied: usize,
    pub hunks_rejected: usize,
}
