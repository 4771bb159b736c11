//! Overrides declared in the config file under `[[overrides]]`.

use super::{OverrideKind, OverrideLocation, OverrideLocator};
use crate::error::{Error, Result};
use glob::{MatchOptions, Pattern};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
/// One `[[overrides]]` entry.
pub struct ManifestEntry {
    /// Label reported in the `Type` column, e.g. "Preference" or "Plugin".
    pub kind: String,
    /// Glob over core-relative paths.
    pub core: String,
    pub location: String,
    #[serde(default)]
    pub file_copy: bool,
}

pub struct ManifestLocator {
    rules: Vec<(Pattern, OverrideLocation)>,
}

impl ManifestLocator {
    pub fn from_entries(entries: &[ManifestEntry]) -> Result<Self> {
        let mut rules = Vec::with_capacity(entries.len());
        for e in entries {
            let pattern = Pattern::new(&e.core).map_err(|source| Error::Pattern {
                pattern: e.core.clone(),
                source,
            })?;
            rules.push((
                pattern,
                OverrideLocation {
                    kind: OverrideKind::new(e.kind.clone(), e.file_copy),
                    location: e.location.clone(),
                },
            ));
        }
        Ok(ManifestLocator { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl OverrideLocator for ManifestLocator {
    fn locate(&self, core_path: &str) -> Vec<OverrideLocation> {
        let opts = MatchOptions {
            case_sensitive: true,
            require_literal_separator: true,
            require_literal_leading_dot: false,
        };
        self.rules
            .iter()
            .filter(|(p, _)| p.matches_with(core_path, opts))
            .map(|(_, loc)| loc.clone())
            .collect()
    }
}
