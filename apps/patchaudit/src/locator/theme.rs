//! Theme overrides resolved from the project tree.
//!
//! Modules are discovered from their `registration.php` files, which map a
//! package directory (e.g. `vendor/acme/module-cart`) to a module name
//! (`Acme_Cart`). A core file under `<module>/view/<area>/templates|web/...`
//! is overridden by a theme copy at
//! `<design>/<area>/<Vendor>/<theme>/<Module>/templates|web/...`; layout
//! files are overridden under `<Module>/layout/override/...`.

use super::{OverrideKind, OverrideLocation, OverrideLocator};
use crate::error::{Error, Result};
use crate::utils;
use glob::Pattern;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

pub const TEMPLATE_OVERRIDE: &str = "Override (phtml/js/html)";
pub const LAYOUT_OVERRIDE: &str = "Layout Override";

const REGISTRATION_GLOBS: [&str; 2] = [
    "vendor/*/*/registration.php",
    "app/code/*/*/registration.php",
];

#[derive(Debug, Default, Clone)]
/// Package directory → module name, longest directory first.
pub struct ModuleRegistry {
    modules: Vec<(String, String)>,
}

impl ModuleRegistry {
    /// Scan `registration.php` files below `root`.
    pub fn scan(root: &Path) -> Result<Self> {
        let re = Regex::new(r#"ComponentRegistrar::MODULE\s*,\s*['"]([A-Za-z0-9_]+)['"]"#)
            .expect("registration regex");
        let base = Pattern::escape(&root.to_string_lossy());
        let mut pairs: Vec<(String, String)> = Vec::new();
        for pat in REGISTRATION_GLOBS {
            let pattern = format!("{}/{}", base, pat);
            let entries = glob::glob(&pattern).map_err(|source| Error::Pattern {
                pattern: pattern.clone(),
                source,
            })?;
            for entry in entries.flatten() {
                let Ok(src) = fs::read_to_string(&entry) else {
                    continue;
                };
                let Some(name) = re.captures(&src).and_then(|c| c.get(1)) else {
                    continue;
                };
                let Some(dir) = entry.parent() else { continue };
                pairs.push((utils::rel_to(dir, root), name.as_str().to_string()));
            }
        }
        tracing::debug!(modules = pairs.len(), "module registry scanned");
        Ok(Self::from_pairs(pairs))
    }

    pub fn from_pairs<I, A, B>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: Into<String>,
        B: Into<String>,
    {
        let mut modules: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(d, n)| (d.into().trim_end_matches('/').to_string(), n.into()))
            .collect();
        modules.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(&b.0)));
        ModuleRegistry { modules }
    }

    /// Module name and the path remainder inside the module directory.
    pub fn module_for<'a>(&self, core_path: &'a str) -> Option<(&str, &'a str)> {
        self.modules.iter().find_map(|(dir, name)| {
            let rest = core_path.strip_prefix(dir.as_str())?.strip_prefix('/')?;
            Some((name.as_str(), rest))
        })
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

pub struct ThemeLocator {
    root: PathBuf,
    design_dir: String,
    registry: ModuleRegistry,
}

impl ThemeLocator {
    pub fn new(root: impl Into<PathBuf>, design_dir: impl Into<String>, registry: ModuleRegistry) -> Self {
        ThemeLocator {
            root: root.into(),
            design_dir: design_dir.into().trim_end_matches('/').to_string(),
            registry,
        }
    }

    fn search(&self, rel_patterns: &[String], kind: &OverrideKind) -> Vec<OverrideLocation> {
        let base = Pattern::escape(&self.root.to_string_lossy());
        let mut found: Vec<String> = Vec::new();
        for rel in rel_patterns {
            let pattern = format!("{}/{}", base, rel);
            match glob::glob(&pattern) {
                Ok(entries) => {
                    for p in entries.flatten() {
                        if p.is_file() {
                            found.push(utils::rel_to(&p, &self.root));
                        }
                    }
                }
                Err(e) => tracing::warn!(%pattern, "bad theme pattern: {}", e),
            }
        }
        found.sort();
        found.dedup();
        found
            .into_iter()
            .map(|location| OverrideLocation {
                kind: kind.clone(),
                location,
            })
            .collect()
    }
}

impl OverrideLocator for ThemeLocator {
    fn locate(&self, core_path: &str) -> Vec<OverrideLocation> {
        let Some((module, rest)) = self.registry.module_for(core_path) else {
            return Vec::new();
        };
        let Some((area, sub)) = rest.strip_prefix("view/").and_then(|v| v.split_once('/')) else {
            return Vec::new();
        };
        let areas: &[&str] = match area {
            "base" => &["frontend", "adminhtml"],
            "frontend" => &["frontend"],
            "adminhtml" => &["adminhtml"],
            _ => return Vec::new(),
        };
        let design = Pattern::escape(&self.design_dir);
        let module = Pattern::escape(module);

        if sub.starts_with("templates/") || sub.starts_with("web/") {
            let sub = Pattern::escape(sub);
            let patterns: Vec<String> = areas
                .iter()
                .map(|a| format!("{design}/{a}/*/*/{module}/{sub}"))
                .collect();
            return self.search(&patterns, &OverrideKind::new(TEMPLATE_OVERRIDE, true));
        }
        if let Some(file) = sub.strip_prefix("layout/") {
            let file = Pattern::escape(file);
            let patterns: Vec<String> = areas
                .iter()
                .flat_map(|a| {
                    [
                        format!("{design}/{a}/*/*/{module}/layout/override/base/{file}"),
                        format!("{design}/{a}/*/*/{module}/layout/override/theme/*/*/{file}"),
                    ]
                })
                .collect();
            return self.search(&patterns, &OverrideKind::new(LAYOUT_OVERRIDE, false));
        }
        Vec::new()
    }
}
