//! Analysis runner: patch → findings → optional theme updates.
//!
//! Produces an `AnalyseReport` with the override findings, parse failures,
//! theme update results and a summary. Files are classified in parallel;
//! results keep patch order unless `sort_by_type` is set.

use crate::apply::{apply_hunks, HunkReport, HunkStatus};
use crate::config::Effective;
use crate::diff::{self, ParseFailure, SkippedSection};
use crate::error::{Error, Result};
use crate::locator::manifest::ManifestLocator;
use crate::locator::theme::{ModuleRegistry, ThemeLocator};
use crate::locator::{CompositeLocator, OverrideLocator};
use crate::models::hunk::PatchedFile;
use crate::models::{OverrideFinding, RunMode, Summary};
use crate::utils;
use crate::validator::{OverrideValidator, Scope};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Serialize)]
/// Outcome of pushing a file's hunks into one theme copy.
pub struct ThemeUpdate {
    pub core: String,
    pub file: String,
    pub wrote: bool,
    pub hunks: Vec<HunkReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyseReport {
    pub findings: Vec<OverrideFinding>,
    pub failures: Vec<ParseFailure>,
    pub skipped: Vec<SkippedSection>,
    pub updates: Vec<ThemeUpdate>,
    pub residual: String,
    pub summary: Summary,
}

/// Build the locator chain from the effective config: manifest entries
/// first, then theme copies discovered on disk.
pub fn build_locator(eff: &Effective) -> Result<CompositeLocator> {
    let mut chain = CompositeLocator::new();
    let manifest = ManifestLocator::from_entries(&eff.overrides)?;
    if !manifest.is_empty() {
        chain.push(manifest);
    }
    if eff.theme_enabled {
        let registry = ModuleRegistry::scan(&eff.project_root)?;
        tracing::info!(modules = registry.len(), "module registry loaded");
        chain.push(ThemeLocator::new(
            eff.project_root.clone(),
            eff.design_dir.clone(),
            registry,
        ));
    }
    tracing::debug!(locators = chain.len(), "locator chain ready");
    Ok(chain)
}

/// Run the analysis for one project.
///
/// Fatal only on input-level problems: unreadable patch, nothing parsable,
/// or a strict-mode failure. Everything else ends up in the report.
pub fn run_analyse(eff: &Effective, locator: &dyn OverrideLocator) -> Result<AnalyseReport> {
    if !eff.patch.is_file() {
        return Err(Error::MissingPatch(eff.patch.to_string_lossy().to_string()));
    }
    let raw = fs::read_to_string(&eff.patch).map_err(|e| Error::io(&eff.patch, e))?;
    let parsed = diff::parse(&raw, eff.mode)?;
    if parsed.is_empty() {
        return Err(Error::NotUnifiedDiff);
    }
    tracing::info!(files = parsed.files.len(), "patch file has been parsed");

    let scope = Scope::new(&eff.module_roots, &eff.skip, &eff.vendor_namespaces)?;
    let validator = OverrideValidator::new(scope);
    let per_file: Vec<(bool, Vec<OverrideFinding>)> = parsed
        .files
        .par_iter()
        .map(|f| {
            if !validator.can_validate(&f.path) {
                tracing::debug!(path = %f.path, "skipping");
                return (false, Vec::new());
            }
            tracing::info!(path = %f.path, "validating");
            (true, validator.classify(f, locator))
        })
        .collect();

    let mut updates: Vec<ThemeUpdate> = Vec::new();
    if let Some(fuzz) = eff.fuzz {
        for (file, (_, findings)) in parsed.files.iter().zip(per_file.iter()) {
            for finding in findings.iter().filter(|f| f.kind.file_copy) {
                updates.push(update_theme_file(
                    &eff.project_root,
                    file,
                    finding,
                    fuzz,
                    eff.mode,
                ));
            }
        }
    }

    let mut residual = String::new();
    for (file, (_, findings)) in parsed.files.iter().zip(per_file.iter()) {
        if !findings.is_empty() {
            residual.push_str(&file.raw);
        }
    }
    fs::write(&eff.residual, &residual).map_err(|e| Error::io(&eff.residual, e))?;

    let skipped_files = per_file.iter().filter(|(ok, _)| !ok).count();
    let mut findings: Vec<OverrideFinding> =
        per_file.into_iter().flat_map(|(_, v)| v).collect();
    if eff.sort_by_type {
        sort_by_type(&mut findings);
    }

    let hunks_applied = updates
        .iter()
        .flat_map(|u| u.hunks.iter())
        .filter(|h| matches!(h.status, HunkStatus::Applied { .. }))
        .count();
    let hunks_total: usize = updates.iter().map(|u| u.hunks.len()).sum();
    let summary = Summary {
        files: parsed.files.len(),
        skipped: skipped_files,
        findings: findings.len(),
        parse_failures: parsed.failures.len(),
        hunks_applied,
        hunks_rejected: hunks_total - hunks_applied,
    };
    Ok(AnalyseReport {
        findings,
        failures: parsed.failures,
        skipped: parsed.skipped,
        updates,
        residual: utils::rel_to(&eff.residual, &eff.project_root),
        summary,
    })
}

/// Order by type, then core file, then overriding location.
pub fn sort_by_type(findings: &mut [OverrideFinding]) {
    findings.sort_by(|a, b| {
        a.kind
            .label
            .cmp(&b.kind.label)
            .then_with(|| a.source_file.cmp(&b.source_file))
            .then_with(|| a.overriding_location.cmp(&b.overriding_location))
    });
}

fn update_theme_file(
    root: &Path,
    file: &PatchedFile,
    finding: &OverrideFinding,
    fuzz: usize,
    mode: RunMode,
) -> ThemeUpdate {
    let target = root.join(&finding.overriding_location);
    let mut update = ThemeUpdate {
        core: file.path.clone(),
        file: finding.overriding_location.clone(),
        wrote: false,
        hunks: Vec::new(),
        error: None,
    };
    let current = match fs::read_to_string(&target) {
        Ok(s) => s,
        Err(e) => {
            update.error = Some(e.to_string());
            return update;
        }
    };
    let applied = apply_hunks(&file.hunks, &current, fuzz, mode);
    if applied.rejected() > 0 {
        tracing::warn!(
            file = %update.file,
            rejected = applied.rejected(),
            "hunks could not be applied to theme file"
        );
    }
    update.hunks = applied.hunks;
    if let Some(text) = applied.text {
        if text != current {
            match fs::write(&target, text) {
                Ok(()) => {
                    update.wrote = true;
                    tracing::info!(file = %update.file, "theme file updated");
                }
                Err(e) => update.error = Some(e.to_string()),
            }
        }
    }
    update
}
