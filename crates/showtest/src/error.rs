//! Error taxonomy for the harness binary.

use std::path::PathBuf;

use showtest_viewport::ReconcileError;
use thiserror::Error;

/// Errors that can occur during a harness run.
#[derive(Error, Debug)]
pub enum Error {
    /// The showcase binary could not be found.
    #[error("could not locate the showcase binary (set SHOWCASE_BIN or `cargo build --release --bin showcase`)")]
    AppBinNotFound,

    /// Failed to spawn a process.
    #[error("failed to launch showcase: {0}")]
    SpawnFailed(String),

    /// The app exited or never produced valid telemetry during startup.
    #[error("showcase failed to start: {detail}")]
    StartupFailure {
        /// What was observed, including a stderr tail when available.
        detail: String,
    },

    /// The app window was never discoverable.
    #[error("could not find the showcase window within {timeout_ms} ms")]
    WindowNotFound {
        /// How long we looked.
        timeout_ms: u64,
    },

    /// A client-area resize did not take.
    #[error("could not resize showcase window to {width}x{height}")]
    ResizeFailed {
        /// Requested client width.
        width: u32,
        /// Requested client height.
        height: u32,
    },

    /// The platform has no window-system backend.
    #[error("no window-system backend for this platform")]
    UnsupportedPlatform,

    /// The OS input backend could not be initialized.
    #[error("could not initialize the synthetic input backend")]
    InputUnavailable,

    /// Viewport reconciliation failed (blocked or exhausted).
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    /// An action happened but the expected telemetry state never appeared.
    #[error("[FAIL] {key}: expected '{expected}', got '{}'", actual.as_deref().unwrap_or("None"))]
    VerificationMismatch {
        /// State key that was checked.
        key: String,
        /// Expected value.
        expected: String,
        /// Last observed value, if any.
        actual: Option<String>,
    },

    /// A required element never showed up in telemetry.
    #[error("[FAIL] required element '{0}' not present in telemetry")]
    RequiredElementMissing(String),

    /// A layout region is missing or degenerate.
    #[error("[FAIL] layout element '{id}' invalid: {detail}")]
    LayoutInvalid {
        /// Element id.
        id: String,
        /// What is wrong with it.
        detail: String,
    },

    /// Screen capture failed.
    #[error("failed to capture {0}")]
    CaptureFailed(&'static str),

    /// An unknown section name was passed on the CLI.
    #[error("unknown section '{0}'")]
    UnknownSection(String),

    /// An unknown component case name was passed on the CLI.
    #[error("unknown component '{0}'")]
    UnknownCase(String),

    /// An unparsable window-size spec was passed on the CLI.
    #[error("invalid size '{0}'; use a preset (phone/tablet/desktop) or WxH")]
    InvalidSizeSpec(String),

    /// A config file existed but could not be parsed.
    #[error("invalid tuning file {}: {detail}", path.display())]
    InvalidTuning {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser message.
        detail: String,
    },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used across the binary.
pub type Result<T> = std::result::Result<T, Error>;

/// Print helpful hints for common errors.
pub fn print_hints(err: &Error) {
    match err {
        Error::AppBinNotFound => {
            eprintln!("hint: set SHOWCASE_BIN to the built showcase executable, or run");
            eprintln!("      `cargo build --release --bin showcase` in the app workspace first");
        }
        Error::StartupFailure { .. } => {
            eprintln!("hint: the stdout/stderr logs under test_output/ capture the app's last words");
            eprintln!("      check that the app honors SHOWCASE_TELEMETRY=1 and can reach its assets");
        }
        Error::WindowNotFound { .. } => {
            eprintln!("hint: the window is matched by pid, then exe name, then title substring;");
            eprintln!("      a remote/headless session without a desktop will never produce one");
        }
        Error::InputUnavailable => {
            eprintln!("hint: synthetic input needs an interactive desktop session");
        }
        Error::VerificationMismatch { .. } => {
            eprintln!("hint: screenshots and logs leading up to the failure remain in test_output/;");
            eprintln!("      rerun with --resume to continue from the failing section");
        }
        _ => {}
    }
}
