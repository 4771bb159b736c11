//! Configuration discovery and effective settings resolution.
//!
//! Patchaudit reads `patchaudit.toml|yaml|yml` from the project root and
//! merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `patch`: `vendor.patch`
//! - `residual`: `vendor_files_to_check.patch`
//! - `output`: `human`
//! - `analyse.fuzz`: unset (no automatic theme update)
//! - `analyse.sort_by_type|strict`: false
//! - `analyse.module_roots`: `vendor/`, `app/code/`
//! - `theme.design_dir`: `app/design`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{Error, Result};
use crate::locator::manifest::ManifestEntry;
use crate::models::RunMode;
use crate::validator::{DEFAULT_MODULE_ROOTS, DEFAULT_SKIP};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_NAMES: [&str; 3] = ["patchaudit.toml", "patchaudit.yaml", "patchaudit.yml"];
pub const DEFAULT_PATCH: &str = "vendor.patch";
pub const DEFAULT_RESIDUAL: &str = "vendor_files_to_check.patch";
pub const DEFAULT_DESIGN_DIR: &str = "app/design";

#[derive(Debug, Default, Deserialize, Clone)]
/// Analysis section under `[analyse]`.
pub struct AnalyseCfg {
    /// Fuzz factor for automatic theme updates; signed so negatives can be reported.
    pub fuzz: Option<i64>,
    pub sort_by_type: Option<bool>,
    pub vendor_namespaces: Option<Vec<String>>,
    pub strict: Option<bool>,
    pub module_roots: Option<Vec<String>>,
    pub skip: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ThemeCfg {
    pub design_dir: Option<String>,
    /// Turn the theme locator off entirely.
    pub disabled: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `patchaudit.toml|yaml`.
pub struct AuditConfig {
    pub patch: Option<String>,
    pub residual: Option<String>,
    pub output: Option<String>,
    pub analyse: Option<AnalyseCfg>,
    pub theme: Option<ThemeCfg>,
    #[serde(default)]
    pub overrides: Vec<ManifestEntry>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub project_root: PathBuf,
    pub config_found: bool,
    pub patch: PathBuf,
    pub residual: PathBuf,
    pub output: String,
    pub fuzz: Option<usize>,
    pub sort_by_type: bool,
    pub vendor_namespaces: Vec<String>,
    pub mode: RunMode,
    pub module_roots: Vec<String>,
    pub skip: Vec<String>,
    pub design_dir: String,
    pub theme_enabled: bool,
    pub overrides: Vec<ManifestEntry>,
}

/// CLI values that take precedence over the config file.
#[derive(Debug, Default, Clone)]
pub struct CliArgs<'a> {
    pub project: Option<&'a str>,
    pub patch: Option<&'a str>,
    pub output: Option<&'a str>,
    pub fuzz: Option<&'a str>,
    pub sort_by_type: Option<bool>,
    pub vendor_namespaces: Option<&'a str>,
    pub strict: Option<bool>,
}

/// Walk upward from `start` to detect the project root.
///
/// Stops when a `patchaudit.toml|yaml|yml`, a `vendor.patch` or a `.git`
/// directory is found.
pub fn detect_project_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(DEFAULT_PATCH).exists() || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `AuditConfig` from `patchaudit.toml` or `patchaudit.yaml|yml`.
///
/// A missing file is `Ok(None)`; a file that does not parse is an error.
pub fn load_config(root: &Path) -> Result<Option<AuditConfig>> {
    let toml_path = root.join(CONFIG_NAMES[0]);
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).map_err(|e| Error::io(&toml_path, e))?;
        let cfg: AuditConfig = toml::from_str(&s).map_err(|e| Error::Config {
            path: toml_path.to_string_lossy().to_string(),
            message: e.to_string(),
        })?;
        return Ok(Some(cfg));
    }
    for yml in &CONFIG_NAMES[1..] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).map_err(|e| Error::io(&p, e))?;
            let cfg: AuditConfig = serde_yaml::from_str(&s).map_err(|e| Error::Config {
                path: p.to_string_lossy().to_string(),
                message: e.to_string(),
            })?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

/// Parse a fuzz factor given on the command line.
pub fn parse_fuzz(raw: &str) -> Result<usize> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| Error::InvalidFuzz(raw.to_string()))
}

/// Split a comma separated namespace list, dropping blanks and spaces.
pub fn split_namespaces(raw: &str) -> Vec<String> {
    raw.replace(' ', "")
        .split(',')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(cli: &CliArgs<'_>) -> Result<Effective> {
    let project_root = match cli.project {
        Some(p) => {
            let path = PathBuf::from(p);
            if !path.is_dir() {
                return Err(Error::InvalidProject(p.to_string()));
            }
            path
        }
        None => detect_project_root(Path::new(".")),
    };
    let loaded = load_config(&project_root)?;
    let config_found = loaded.is_some();
    let cfg = loaded.unwrap_or_default();
    let analyse = cfg.analyse.unwrap_or_default();
    let theme = cfg.theme.unwrap_or_default();

    let patch = cli
        .patch
        .map(|s| s.to_string())
        .or(cfg.patch)
        .unwrap_or_else(|| DEFAULT_PATCH.to_string());
    let residual = cfg
        .residual
        .unwrap_or_else(|| DEFAULT_RESIDUAL.to_string());
    let output = cli
        .output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());

    let fuzz = match cli.fuzz {
        Some(raw) => Some(parse_fuzz(raw)?),
        None => match analyse.fuzz {
            Some(n) if n < 0 => return Err(Error::InvalidFuzz(n.to_string())),
            Some(n) => Some(n as usize),
            None => None,
        },
    };
    let sort_by_type = cli
        .sort_by_type
        .or(analyse.sort_by_type)
        .unwrap_or(false);
    let vendor_namespaces = cli
        .vendor_namespaces
        .map(split_namespaces)
        .or(analyse.vendor_namespaces)
        .unwrap_or_default();
    let strict = cli.strict.or(analyse.strict).unwrap_or(false);
    let module_roots = analyse
        .module_roots
        .unwrap_or_else(|| DEFAULT_MODULE_ROOTS.iter().map(|s| s.to_string()).collect());
    let skip = analyse
        .skip
        .unwrap_or_else(|| DEFAULT_SKIP.iter().map(|s| s.to_string()).collect());
    let design_dir = theme
        .design_dir
        .unwrap_or_else(|| DEFAULT_DESIGN_DIR.to_string());
    let theme_enabled = !theme.disabled.unwrap_or(false);

    Ok(Effective {
        patch: project_root.join(patch),
        residual: project_root.join(residual),
        project_root,
        config_found,
        output,
        fuzz,
        sort_by_type,
        vendor_namespaces,
        mode: RunMode::from_strict(strict),
        module_roots,
        skip,
        design_dir,
        theme_enabled,
        overrides: cfg.overrides,
    })
}
