//! Diagnostic logging on stderr.
//!
//! `PATCHAUDIT_LOG` takes an `EnvFilter` directive and wins over `-v`.
//! Without it, verbosity maps to: 0 → warn, 1 → info, 2 → debug, 3+ → trace.

use tracing_subscriber::EnvFilter;

pub const ENV_VAR: &str = "PATCHAUDIT_LOG";

pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(format!("patchaudit={}", level_for(verbose))));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
