//! Showcase app process management.

use std::{
    env, fs,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use showtest_telemetry::TelemetryReader;
use showtest_winops::await_condition;
use tracing::info;

use crate::{
    config,
    error::{Error, Result},
};

/// Managed child process that is killed and reaped on drop.
pub struct ManagedChild {
    /// Handle to the spawned child process.
    child: Option<Child>,
    /// Process identifier for the child.
    pub pid: u32,
}

impl ManagedChild {
    /// Wrap a freshly spawned child.
    pub fn new(child: Child) -> Self {
        let pid = child.id();
        Self {
            child: Some(child),
            pid,
        }
    }

    /// Whether the child has exited, without blocking.
    pub fn has_exited(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(Some(_))),
            None => true,
        }
    }

    /// Terminate the child and wait for it to exit.
    pub fn kill_and_wait(&mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            child.kill().map_err(Error::Io)?;
            child.wait().map_err(Error::Io)?;
        }
        Ok(())
    }
}

impl Drop for ManagedChild {
    fn drop(&mut self) {
        if self.kill_and_wait().is_err() {
            // best-effort cleanup on drop
        }
    }
}

/// Locate the showcase binary: `SHOWCASE_BIN` first, then the release build
/// in the current workspace.
pub fn resolve_showcase_bin() -> Option<PathBuf> {
    if let Ok(p) = env::var(config::APP_BIN_ENV) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Some(pb);
        }
    }
    let name = if cfg!(windows) {
        "showcase.exe"
    } else {
        "showcase"
    };
    let candidate = Path::new("target").join("release").join(name);
    candidate.exists().then_some(candidate)
}

/// Build the showcase binary quietly if it is missing or stale.
/// Output is suppressed to avoid interleaved cargo logs.
pub fn ensure_showcase_built() -> Result<PathBuf> {
    if let Some(bin) = resolve_showcase_bin() {
        // Skip the rebuild when the binary is fresh.
        if let Ok(meta) = fs::metadata(&bin)
            && let Ok(modified) = meta.modified()
            && let Ok(elapsed) = SystemTime::now().duration_since(modified)
            && elapsed.as_secs() < 60
        {
            return Ok(bin);
        }
    }

    info!("building showcase (release)...");
    let status = Command::new("cargo")
        .args(["build", "--release", "--bin", "showcase", "-q"])
        .env("CARGO_TERM_COLOR", "never")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match status {
        Ok(s) if s.success() => {}
        _ => {
            // The build may legitimately be unavailable here (prebuilt app);
            // fall through to the lookup and let that decide.
        }
    }
    resolve_showcase_bin().ok_or(Error::AppBinNotFound)
}

/// Read the trailing bytes of a text file, for failure diagnostics.
fn tail_text_file(path: &Path, max_bytes: usize) -> String {
    match fs::read(path) {
        Ok(data) => {
            let start = data.len().saturating_sub(max_bytes);
            String::from_utf8_lossy(&data[start..]).into_owned()
        }
        Err(_) => String::new(),
    }
}

/// A running showcase process with its output redirected to log files.
pub struct ShowcaseSession {
    /// The app process.
    child: ManagedChild,
    /// Stdout log path.
    stdout_log: PathBuf,
    /// Stderr log path.
    stderr_log: PathBuf,
}

impl ShowcaseSession {
    /// Launch the showcase app with telemetry enabled.
    ///
    /// Stdout/stderr go to timestamped files rather than pipes so a chatty
    /// app cannot deadlock against a full pipe buffer.
    pub fn launch() -> Result<Self> {
        let bin = ensure_showcase_built()?;
        let out_dir = config::output_dir()?;
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let stdout_log = out_dir.join(format!("showcase_{}.stdout.log", stamp));
        let stderr_log = out_dir.join(format!("showcase_{}.stderr.log", stamp));

        let out_f = fs::File::create(&stdout_log)?;
        let err_f = fs::File::create(&stderr_log)?;

        let child = Command::new(&bin)
            .env(config::TELEMETRY_ENV, "1")
            .env("RUST_LOG", logging::log_config_for_child())
            .stdout(Stdio::from(out_f))
            .stderr(Stdio::from(err_f))
            .spawn()
            .map_err(|e| Error::SpawnFailed(e.to_string()))?;

        info!("launched showcase: {} (pid {})", bin.display(), child.id());
        Ok(Self {
            child: ManagedChild::new(child),
            stdout_log,
            stderr_log,
        })
    }

    /// Pid of the app process.
    pub fn pid(&self) -> u32 {
        self.child.pid
    }

    /// Stderr log path for diagnostics.
    pub fn stderr_log(&self) -> &Path {
        &self.stderr_log
    }

    /// Stdout log path for diagnostics.
    pub fn stdout_log(&self) -> &Path {
        &self.stdout_log
    }

    /// Wait for the app to signal readiness by writing telemetry with a
    /// non-empty element set. An app exit before that is a startup failure
    /// carrying the stderr tail.
    pub fn wait_for_telemetry(&mut self, reader: &TelemetryReader, timeout: Duration) -> Result<()> {
        let start = Instant::now();
        let poll = config::ms(config::DEFAULTS.discovery_poll_ms);

        let outcome = await_condition(timeout, poll, || {
            if self.child.has_exited() {
                return Some(Err(()));
            }
            match reader.read() {
                Some(snapshot) if !snapshot.elements.is_empty() => Some(Ok(())),
                _ => None,
            }
        });

        match outcome {
            Ok(Ok(())) => {
                info!(
                    "showcase ready after {:.1}s",
                    start.elapsed().as_secs_f64()
                );
                Ok(())
            }
            Ok(Err(())) => {
                let tail = tail_text_file(&self.stderr_log, 3000);
                let mut detail = format!(
                    "process exited before producing telemetry (stderr log: {})",
                    self.stderr_log.display()
                );
                if !tail.trim().is_empty() {
                    detail.push_str("\n--- stderr tail ---\n");
                    detail.push_str(&tail);
                }
                Err(Error::StartupFailure { detail })
            }
            Err(_) => Err(Error::StartupFailure {
                detail: format!(
                    "no telemetry with elements within {:.0}s (stdout log: {})",
                    timeout.as_secs_f64(),
                    self.stdout_log.display()
                ),
            }),
        }
    }

    /// Terminate the app. Also runs on drop; explicit calls give a chance
    /// to surface errors.
    pub fn shutdown(&mut self) {
        if self.child.kill_and_wait().is_err() {
            // already gone
        }
        // Brief pause so the OS releases the window before a relaunch.
        thread::sleep(Duration::from_millis(100));
    }
}
