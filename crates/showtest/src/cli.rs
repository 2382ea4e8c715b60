//! Command-line interface definitions for showtest.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use logging::LogArgs;

/// Command-line interface arguments for the showtest binary.
#[derive(Parser, Debug)]
#[command(name = "showtest", about = "End-to-end UI test harness for the showcase app", version)]
pub struct Cli {
    /// Logging controls
    #[command(flatten)]
    pub log: LogArgs,

    /// Suppress non-error output (used by orchestrated runs)
    #[arg(long)]
    pub quiet: bool,

    /// Which subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI commands for the harness.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a single named component test
    Component {
        /// Case name (nav, checkboxes, sliders, tabs, lists, menus, theme)
        name: String,

        /// Initial client size, preset or WxH (defaults to the app's own)
        #[arg(long)]
        size: Option<String>,
    },

    /// Run every component test in suite order
    All {
        /// Initial client size, preset or WxH
        #[arg(long)]
        size: Option<String>,
    },

    /// Navigation-only smoke test across all sections
    Nav,

    /// Responsive matrix sweep across window sizes
    Matrix {
        /// Comma-separated size presets or WxH list (e.g. phone,tablet,1280x720)
        #[arg(long, default_value = "")]
        sizes: String,

        /// Start at this section name or nav id (e.g. "Sliders" or "nav_sliders")
        #[arg(long)]
        start_from: Option<String>,

        /// Run only these sections (comma-separated names or nav ids)
        #[arg(long, value_delimiter = ',')]
        only: Vec<String>,

        /// Resume from the last failing section recorded on disk
        #[arg(long)]
        resume: bool,

        /// With --resume: continue from the failing size through the rest
        /// (default: only the failing size)
        #[arg(long)]
        resume_all_sizes: bool,

        /// Path to the resume state file
        #[arg(long)]
        resume_file: Option<PathBuf>,
    },

    /// List all element ids in the current telemetry snapshot
    ListElements,
}
