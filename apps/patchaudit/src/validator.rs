//! Per-file override classification.
//!
//! `OverrideValidator::classify` asks the locator about one patched file and
//! turns every answer into an `OverrideFinding`, keeping the locator's kind
//! untouched. Files outside the analysable scope (build output, paths outside
//! module roots) produce no findings at all.

use crate::error::{Error, Result};
use crate::locator::OverrideLocator;
use crate::models::hunk::PatchedFile;
use crate::models::OverrideFinding;
use glob::Pattern;

pub const DEFAULT_MODULE_ROOTS: [&str; 2] = ["vendor/", "app/code/"];
pub const DEFAULT_SKIP: [&str; 4] = ["generated/**", "var/**", "pub/static/**", "dev/tests/**"];

#[derive(Debug, Clone)]
/// Which files are analysed and which findings are reported.
pub struct Scope {
    module_roots: Vec<String>,
    skip: Vec<Pattern>,
    vendor_namespaces: Vec<String>,
}

impl Scope {
    pub fn new(module_roots: &[String], skip: &[String], vendor_namespaces: &[String]) -> Result<Self> {
        let skip = skip
            .iter()
            .map(|s| {
                Pattern::new(s).map_err(|source| Error::Pattern {
                    pattern: s.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Scope {
            module_roots: module_roots.to_vec(),
            skip,
            vendor_namespaces: vendor_namespaces
                .iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
        })
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope {
            module_roots: DEFAULT_MODULE_ROOTS.iter().map(|s| s.to_string()).collect(),
            skip: DEFAULT_SKIP
                .iter()
                .filter_map(|s| Pattern::new(s).ok())
                .collect(),
            vendor_namespaces: Vec::new(),
        }
    }
}

pub struct OverrideValidator {
    scope: Scope,
}

impl OverrideValidator {
    pub fn new(scope: Scope) -> Self {
        OverrideValidator { scope }
    }

    /// Cheap admissibility check, no locator query.
    pub fn can_validate(&self, path: &str) -> bool {
        let in_root = self.scope.module_roots.is_empty()
            || self
                .scope
                .module_roots
                .iter()
                .any(|r| path.starts_with(r.as_str()));
        in_root && !self.scope.skip.iter().any(|p| p.matches(path))
    }

    /// Findings for one file, in locator order.
    pub fn classify(&self, file: &PatchedFile, locator: &dyn OverrideLocator) -> Vec<OverrideFinding> {
        if !self.can_validate(&file.path) {
            return Vec::new();
        }
        locator
            .locate(&file.path)
            .into_iter()
            .filter(|loc| in_namespaces(&loc.location, &self.scope.vendor_namespaces))
            .map(|loc| OverrideFinding {
                kind: loc.kind,
                source_file: file.path.clone(),
                overriding_location: loc.location,
            })
            .collect()
    }
}

/// True when `location` names one of `namespaces` as a whole segment.
fn in_namespaces(location: &str, namespaces: &[String]) -> bool {
    if namespaces.is_empty() {
        return true;
    }
    location
        .split(['/', '\\', '_', '.', ':'])
        .any(|seg| namespaces.iter().any(|n| n == seg))
}
