#![warn(missing_docs)]

//! Shared logging helpers, CLI argument definitions, and tracing utilities
//! for the showtest workspace.

use std::env;

use clap::Args;
use once_cell::sync::OnceCell;
use tracing_subscriber::{EnvFilter, prelude::*};

/// Logging controls for CLI apps.
#[derive(Debug, Clone, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive (overrides other flags)
    /// e.g. "showtest_viewport=trace,showtest=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

/// List of crate targets that constitute "our" logs.
pub fn our_crates() -> &'static [&'static str] {
    &[
        "showtest",
        "showtest_telemetry",
        "showtest_viewport",
        "showtest_winops",
        "logging",
    ]
}

/// Build a filter directive string that sets the same `level` for all of our crates.
pub fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    let parts: Vec<String> = our_crates()
        .iter()
        .map(|t| format!("{}={}", t, lvl))
        .collect();
    parts.join(",")
}

/// Compute the final filter spec string with precedence:
/// - `log_filter`
/// - `trace`/`debug`/`log_level` (crate-scoped)
/// - `RUST_LOG` env
/// - default to crate-scoped `info`
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
) -> String {
    if let Some(spec) = log_filter {
        return spec.to_string();
    }
    if trace {
        return level_spec_for("trace");
    }
    if debug {
        return level_spec_for("debug");
    }
    if let Some(lvl) = log_level {
        return level_spec_for(lvl);
    }
    if let Ok(spec) = env::var("RUST_LOG") {
        spec
    } else {
        level_spec_for("info")
    }
}

/// Global flag to track if logging has been initialized.
static LOGGING_INITIALIZED: OnceCell<()> = OnceCell::new();

/// Initialize the tracing subscriber once for the process.
///
/// Timestamps are omitted for cleaner test output. Safe to call repeatedly;
/// only the first call installs a subscriber.
pub fn init(args: &LogArgs, quiet: bool) {
    LOGGING_INITIALIZED.get_or_init(|| {
        let spec = if quiet {
            // Force warn+ without consulting environment
            "warn".to_string()
        } else {
            compute_spec(
                args.trace,
                args.debug,
                args.log_level.as_deref(),
                args.log_filter.as_deref(),
            )
        };
        let env_filter = EnvFilter::new(spec);
        let _ = tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().without_time())
            .try_init();
    });
}

/// Return the `RUST_LOG` value to use for child processes.
///
/// If the environment already specifies `RUST_LOG`, return that; otherwise
/// return a default crate-scoped `info` configuration.
pub fn log_config_for_child() -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| level_spec_for("info"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let spec = compute_spec(true, false, Some("debug"), Some("showtest=trace"));
        assert_eq!(spec, "showtest=trace");
    }

    #[test]
    fn level_spec_covers_all_crates() {
        let spec = level_spec_for("DEBUG");
        for krate in our_crates() {
            assert!(spec.contains(&format!("{}=debug", krate)));
        }
    }
}
