//! Override lookup.
//!
//! An `OverrideLocator` answers one question: given a core-relative path,
//! which overrides supersede it? The analysis never interprets the answer
//! beyond the `file_copy` flag; labels, precedence and how many kinds exist
//! are owned by the locator.
//!
//! Built-in locators:
//! - `theme::ThemeLocator`: theme template/web copies and layout overrides,
//!   resolved through module `registration.php` files.
//! - `manifest::ManifestLocator`: explicit entries from the config file
//!   (preferences, plugins, anything the registry cannot see).

pub mod manifest;
pub mod theme;

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Label of an override mechanism as reported by a locator.
pub struct OverrideKind {
    pub label: String,
    /// The override is a full copy of the core file and can receive hunks.
    #[serde(default)]
    pub file_copy: bool,
}

impl OverrideKind {
    pub fn new(label: impl Into<String>, file_copy: bool) -> Self {
        OverrideKind {
            label: label.into(),
            file_copy,
        }
    }
}

impl fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideLocation {
    pub kind: OverrideKind,
    /// Project-relative path, or an identifier such as a class name.
    pub location: String,
}

/// Resolve the overrides of a core file.
///
/// Implementations must be safe for concurrent read-only queries.
pub trait OverrideLocator: Sync {
    fn locate(&self, core_path: &str) -> Vec<OverrideLocation>;
}

impl<F> OverrideLocator for F
where
    F: Fn(&str) -> Vec<OverrideLocation> + Sync,
{
    fn locate(&self, core_path: &str) -> Vec<OverrideLocation> {
        self(core_path)
    }
}

#[derive(Default)]
/// Chains locators; results keep locator order.
pub struct CompositeLocator {
    locators: Vec<Box<dyn OverrideLocator + Send>>,
}

impl CompositeLocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, locator: impl OverrideLocator + Send + 'static) {
        self.locators.push(Box::new(locator));
    }

    pub fn len(&self) -> usize {
        self.locators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locators.is_empty()
    }
}

impl OverrideLocator for CompositeLocator {
    fn locate(&self, core_path: &str) -> Vec<OverrideLocation> {
        self.locators
            .iter()
            .flat_map(|l| l.locate(core_path))
            .collect()
    }
}
