//! Configuration constants, size presets, and scroll tuning for the harness.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use showtest_viewport::{ContainerSpec, ReconcileTuning};

use crate::error::{Error, Result};

/// Environment variable the app reads to enable telemetry emission.
pub const TELEMETRY_ENV: &str = "SHOWCASE_TELEMETRY";

/// Environment variable overriding the app binary location.
pub const APP_BIN_ENV: &str = "SHOWCASE_BIN";

/// Telemetry document the app writes, relative to the working directory.
pub const TELEMETRY_FILE: &str = "telemetry.json";

/// Harness output directory (screenshots, logs, resume state).
pub const OUTPUT_DIR: &str = "test_output";

/// Baseline images for visual regression checks.
pub const BASELINE_DIR: &str = "baselines";

/// Optional RON file with scroll-tuning overrides.
pub const TUNING_FILE: &str = "showtest.ron";

/// Telemetry id of the sidebar scroll container.
pub const SIDEBAR_CONTAINER: &str = "sidebar_scroll_container";

/// Telemetry id of the main detail-panel scroll container.
pub const MAIN_CONTAINER: &str = "main_scroll_container";

/// Default test-wide timeouts.
#[derive(Debug, Clone, Copy)]
pub struct Defaults {
    /// Maximum time to wait for the app to produce telemetry at startup.
    pub startup_timeout_ms: u64,
    /// Maximum time to wait for the app window to be discoverable.
    pub window_timeout_ms: u64,
    /// Polling interval for startup and window discovery.
    pub discovery_poll_ms: u64,
}

/// Default startup/discovery settings.
pub const DEFAULTS: Defaults = Defaults {
    startup_timeout_ms: 120_000,
    window_timeout_ms: 20_000,
    discovery_poll_ms: 250,
};

/// Navigation and verification pacing.
#[derive(Debug, Clone, Copy)]
pub struct NavTiming {
    /// Retries for a navigate-and-verify sequence.
    pub retries: u32,
    /// Retries used during matrix runs (sizes stress the layout more).
    pub matrix_retries: u32,
    /// Settle delay after a navigation click.
    pub settle_ms: u64,
    /// Settle delay during matrix runs.
    pub matrix_settle_ms: u64,
    /// How long verification waits for the state to converge.
    pub verify_wait_ms: u64,
    /// Gap between retry rounds.
    pub retry_gap_ms: u64,
}

/// Default navigation pacing.
pub const NAV: NavTiming = NavTiming {
    retries: 3,
    matrix_retries: 5,
    settle_ms: 800,
    matrix_settle_ms: 1000,
    verify_wait_ms: 1000,
    retry_gap_ms: 200,
};

/// Element presence waits.
#[derive(Debug, Clone, Copy)]
pub struct ElementWaits {
    /// Plain element wait.
    pub wait_ms: u64,
    /// Wait for elements a test requires.
    pub required_wait_ms: u64,
    /// Wait for scaffold layout regions.
    pub layout_wait_ms: u64,
    /// Minimum sane size for a layout region, per axis.
    pub layout_min_px: f64,
}

/// Default element-presence waits.
pub const ELEMENT: ElementWaits = ElementWaits {
    wait_ms: 1200,
    required_wait_ms: 1500,
    layout_wait_ms: 2000,
    layout_min_px: 8.0,
};

/// Window geometry checks.
#[derive(Debug, Clone, Copy)]
pub struct WindowChecks {
    /// Decoration margin for click validation.
    pub margin_px: f64,
    /// Settle time after a resize before bounds are re-read.
    pub resize_settle_ms: u64,
}

/// Default window-check settings.
pub const WINDOW: WindowChecks = WindowChecks {
    margin_px: 5.0,
    resize_settle_ms: 250,
};

/// Visual regression settings. The threshold is deliberately loose: window
/// position varies between runs.
#[derive(Debug, Clone, Copy)]
pub struct VisualChecks {
    /// Fraction of pixels allowed to differ from the baseline.
    pub baseline_threshold: f64,
    /// Per-channel difference below which a pixel counts as equal.
    pub channel_tolerance: u8,
}

/// Default visual-check settings.
pub const VISUAL: VisualChecks = VisualChecks {
    baseline_threshold: 0.40,
    channel_tolerance: 10,
};

/// A named client-area size used to emulate responsive breakpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Preset name or "WxH" spec.
    pub name: String,
    /// Client width in pixels.
    pub width: u32,
    /// Client height in pixels.
    pub height: u32,
}

impl WindowSize {
    fn preset(name: &str, width: u32, height: u32) -> Self {
        Self {
            name: name.to_string(),
            width,
            height,
        }
    }
}

/// The standard breakpoint presets, chosen to fit on most displays while
/// stressing responsive layout.
pub fn size_presets() -> Vec<WindowSize> {
    vec![
        WindowSize::preset("phone", 480, 800),
        WindowSize::preset("tablet", 768, 1024),
        WindowSize::preset("desktop", 1280, 720),
    ]
}

/// Parse a comma-separated size list like `phone,tablet,1280x720`.
/// An empty spec yields all presets.
pub fn parse_sizes(spec: &str) -> Result<Vec<WindowSize>> {
    if spec.trim().is_empty() {
        return Ok(size_presets());
    }

    let presets = size_presets();
    let mut sizes = Vec::new();
    for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let token = part.to_ascii_lowercase();
        if let Some(preset) = presets.iter().find(|s| s.name == token) {
            sizes.push(preset.clone());
            continue;
        }
        if let Some((w, h)) = token.split_once('x') {
            if let (Ok(width), Ok(height)) = (w.parse::<u32>(), h.parse::<u32>()) {
                sizes.push(WindowSize {
                    name: token.clone(),
                    width,
                    height,
                });
                continue;
            }
        }
        return Err(Error::InvalidSizeSpec(part.to_string()));
    }
    Ok(sizes)
}

/// Scroll conversion tuning.
///
/// These values are empirically matched to the app engine's scroll
/// semantics, so they are data: the defaults below can be overridden per
/// machine via `showtest.ron`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrollTuning {
    /// Reconciler attempt ceiling.
    pub max_attempts: u32,
    /// Minimum visible span for a clickable slice.
    pub visibility_eps: f64,
    /// Vertical thumb drag per correction in the sidebar.
    pub sidebar_thumb_drag: f64,
    /// Vertical thumb drag per correction in the main panel.
    pub main_thumb_drag: f64,
    /// Horizontal thumb drag per correction.
    pub thumb_drag_h: f64,
    /// Wheel notches per sidebar correction.
    pub sidebar_wheel_notches: i32,
    /// Wheel notches per main-panel correction.
    pub main_wheel_notches: i32,
    /// Horizontal wheel amount when no thumb exists.
    pub hwheel_notches: i32,
    /// Approximate content movement per wheel notch, in pixels.
    pub px_per_notch: f64,
    /// Thumb travel as a fraction of desired content travel.
    pub thumb_ratio: f64,
    /// Inset when clamping thumb drags into the window.
    pub clamp_inset: f64,
    /// Pause after each corrective action.
    pub settle_ms: u64,
    /// Duration of thumb drags.
    pub drag_ms: u64,
}

impl Default for ScrollTuning {
    fn default() -> Self {
        Self {
            max_attempts: 12,
            visibility_eps: 4.0,
            sidebar_thumb_drag: 160.0,
            main_thumb_drag: 200.0,
            thumb_drag_h: 220.0,
            sidebar_wheel_notches: 6,
            main_wheel_notches: 8,
            hwheel_notches: 80,
            px_per_notch: 40.0,
            thumb_ratio: 0.3,
            clamp_inset: 10.0,
            settle_ms: 250,
            drag_ms: 300,
        }
    }
}

impl ScrollTuning {
    /// Load overrides from `path`, falling back to defaults when the file
    /// is absent. A present-but-broken file is an error; silently ignoring
    /// it would un-tune every scroll.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };
        ron::from_str(&content).map_err(|e| Error::InvalidTuning {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Reconciler tuning for the sidebar container.
    pub fn sidebar(&self) -> ReconcileTuning {
        ReconcileTuning {
            max_attempts: self.max_attempts,
            visibility_eps: self.visibility_eps,
            thumb_drag_v: self.sidebar_thumb_drag,
            thumb_drag_h: self.thumb_drag_h,
            wheel_notches: self.sidebar_wheel_notches,
            hwheel_notches: self.hwheel_notches,
            clamp_inset: self.clamp_inset,
            drag_duration: Duration::from_millis(self.drag_ms),
            settle: Duration::from_millis(self.settle_ms),
        }
    }

    /// Reconciler tuning for the main detail panel.
    pub fn main(&self) -> ReconcileTuning {
        ReconcileTuning {
            wheel_notches: self.main_wheel_notches,
            thumb_drag_v: self.main_thumb_drag,
            ..self.sidebar()
        }
    }
}

/// Container descriptor for the sidebar. Falls back to a horizontal wheel
/// when the compact bottom-nav layout clips nav items sideways.
pub fn sidebar_container() -> ContainerSpec {
    ContainerSpec::with_standard_thumbs(SIDEBAR_CONTAINER)
}

/// Container descriptor for the main detail panel. Horizontal clipping with
/// no thumb is a refusal here, not a wheel fallback.
pub fn main_container() -> ContainerSpec {
    ContainerSpec {
        hwheel_fallback: false,
        ..ContainerSpec::with_standard_thumbs(MAIN_CONTAINER)
    }
}

/// Output directory, created on demand.
pub fn output_dir() -> Result<PathBuf> {
    let dir = PathBuf::from(OUTPUT_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Resume checkpoint path inside the output directory.
pub fn default_resume_path() -> PathBuf {
    PathBuf::from(OUTPUT_DIR).join("last_failure.json")
}

/// Convert milliseconds to `Duration`.
pub const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_spec_yields_presets() {
        let sizes = parse_sizes("").unwrap();
        assert_eq!(sizes.len(), 3);
        assert_eq!(sizes[0].name, "phone");
    }

    #[test]
    fn mixed_presets_and_custom() {
        let sizes = parse_sizes("tablet, 1280x720").unwrap();
        assert_eq!(sizes[0].width, 768);
        assert_eq!(sizes[1], WindowSize::preset("1280x720", 1280, 720));
    }

    #[test]
    fn bad_specs_are_rejected() {
        assert!(parse_sizes("widescreen").is_err());
        assert!(parse_sizes("1280xtall").is_err());
    }

    #[test]
    fn tuning_defaults_flow_into_reconcilers() {
        let tuning = ScrollTuning::default();
        assert_eq!(tuning.sidebar().wheel_notches, 6);
        assert_eq!(tuning.main().wheel_notches, 8);
        assert_eq!(tuning.main().thumb_drag_v, 200.0);
        assert_eq!(tuning.sidebar().max_attempts, 12);
    }

    #[test]
    fn tuning_file_overrides_partial_fields() {
        let content = "(max_attempts: 4, px_per_notch: 55.0)";
        let tuning: ScrollTuning = ron::from_str(content).unwrap();
        assert_eq!(tuning.max_attempts, 4);
        assert_eq!(tuning.px_per_notch, 55.0);
        // Untouched fields keep their defaults.
        assert_eq!(tuning.sidebar_wheel_notches, 6);
    }
}
