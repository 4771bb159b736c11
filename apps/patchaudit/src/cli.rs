//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "patchaudit",
    version,
    about = "Find overrides that mask a vendor patch",
    long_about = "Patchaudit reads a hand-made unified diff of vendor code (vendor.patch) and reports, per patched file, the theme files, preferences, plugins and layout overrides that would hide the change at runtime.\n\nConfiguration precedence: CLI > patchaudit.toml > defaults.",
    after_help = "Examples:\n  patchaudit analyse /srv/shop\n  patchaudit analyse /srv/shop --sort-by-type --vendor-namespaces Shop,Acme\n  patchaudit analyse /srv/shop -a 2 --output json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current patchaudit version."
    )]
    Version,
    /// Analyse a project against its vendor.patch
    #[command(
        about = "Analyse a project",
        long_about = "Parse the project's vendor.patch, list every override that supersedes a patched core file, and write the affected sections to vendor_files_to_check.patch. With --auto-theme-update, hunks are also applied to theme file copies.",
        after_help = "Examples:\n  patchaudit analyse .\n  patchaudit analyse . --auto-theme-update 1 --strict"
    )]
    Analyse {
        #[arg(help = "Project root (default: detected from current dir)")]
        project: Option<String>,
        #[arg(long, help = "Patch file relative to the project root (default: vendor.patch)")]
        patch: Option<String>,
        #[arg(
            short = 'a',
            long,
            value_name = "FUZZ",
            allow_hyphen_values = true,
            help = "Apply hunks to theme file overrides, tolerating up to FUZZ context lines"
        )]
        auto_theme_update: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Sort the output by override type")]
        sort_by_type: bool,
        #[arg(long, help = "Only report overrides in these namespaces (comma separated)")]
        vendor_namespaces: Option<String>,
        #[arg(long, action = clap::ArgAction::SetTrue, overrides_with = "no_strict", help = "Fail on malformed patch sections; update theme files only when every hunk applies")]
        strict: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, overrides_with = "strict", help = "Disable strict mode even when the config file enables it")]
        no_strict: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
        verbose: u8,
    },
}

/// Collapse a `--flag`/`--no-flag` pair into an override; `None` defers to config.
pub fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
