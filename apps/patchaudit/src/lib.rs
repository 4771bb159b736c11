//! Patchaudit core library.
//!
//! This crate exposes programmatic APIs for auditing a hand-made vendor patch
//! against the overrides in a project that would hide it at runtime.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `diff`: Unified diff reader with per-section failure isolation.
//! - `models`: Hunk/file data, findings and summary structs.
//! - `locator`: The `OverrideLocator` seam plus manifest and theme locators.
//! - `validator`: Per-file admissibility and override classification.
//! - `apply`: Fuzzy hunk application for theme file copies.
//! - `analyse`: The end-to-end run used by the `analyse` command.
//! - `output`: Human/JSON printers.
//! - `logging`, `utils`, `error`: Supporting pieces.
pub mod analyse;
pub mod apply;
pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod locator;
pub mod logging;
pub mod models;
pub mod output;
pub mod utils;
pub mod validator;

pub use error::{Error, Result};
