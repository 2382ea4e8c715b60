//! Screenshot capture and visual baseline comparison.

use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use image::{Rgba, RgbaImage};
use showtest_winops::{Rect, ScreenCapture};
use tracing::info;

use crate::{
    config,
    error::{Error, Result},
};

/// Outcome of one baseline comparison.
#[derive(Debug, Clone)]
pub struct VisualCheck {
    /// Capture name.
    pub name: String,
    /// Whether a baseline existed before this run.
    pub had_baseline: bool,
    /// Whether the capture matched the baseline (true for new baselines).
    pub matches: bool,
    /// Fraction of pixels that differed.
    pub difference: f64,
    /// Human-readable summary line.
    pub message: String,
}

/// Captures window screenshots and checks them against stored baselines.
pub struct Capturer {
    /// Platform screen grabber.
    backend: Box<dyn ScreenCapture>,
    /// Where timestamped captures land.
    output_dir: PathBuf,
    /// Where baselines are stored.
    baseline_dir: PathBuf,
    /// Allowed fraction of differing pixels.
    threshold: f64,
}

impl Capturer {
    /// Capturer writing into the standard output/baseline directories.
    pub fn new(backend: Box<dyn ScreenCapture>) -> Result<Self> {
        let output_dir = config::output_dir()?;
        let baseline_dir = PathBuf::from(config::BASELINE_DIR);
        fs::create_dir_all(&baseline_dir)?;
        Ok(Self {
            backend,
            output_dir,
            baseline_dir,
            threshold: config::VISUAL.baseline_threshold,
        })
    }

    /// Capture `rect` to a timestamped PNG. Returns the file path.
    pub fn capture(&mut self, name: &str, rect: Rect) -> Result<PathBuf> {
        let img = self
            .backend
            .capture_rect(rect)
            .ok_or(Error::CaptureFailed("window"))?;
        let stamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let path = self.output_dir.join(format!("{}_{}.png", sanitize(name), stamp));
        img.save(&path).map_err(|_| Error::CaptureFailed("png"))?;
        Ok(path)
    }

    /// Capture `rect` and compare against the stored baseline for `name`.
    /// A missing baseline is saved from this capture and reported as new.
    pub fn capture_with_baseline(&mut self, name: &str, rect: Rect) -> Result<VisualCheck> {
        let img = self
            .backend
            .capture_rect(rect)
            .ok_or(Error::CaptureFailed("window"))?;
        let baseline_path = self.baseline_dir.join(format!("{}.png", sanitize(name)));

        if !baseline_path.exists() {
            img.save(&baseline_path).map_err(|_| Error::CaptureFailed("baseline"))?;
            info!("saved new baseline: {}", baseline_path.display());
            return Ok(VisualCheck {
                name: name.to_string(),
                had_baseline: false,
                matches: true,
                difference: 0.0,
                message: format!("no baseline found; saved current image as baseline: {}", name),
            });
        }

        let baseline = image::open(&baseline_path)
            .map_err(|_| Error::CaptureFailed("baseline"))?
            .to_rgba8();
        let difference = diff_fraction(&baseline, &img, config::VISUAL.channel_tolerance);
        let matches = difference <= self.threshold;

        if !matches {
            let diff_path = self.output_dir.join(format!("{}_diff.png", sanitize(name)));
            let _ = diff_image(&baseline, &img, config::VISUAL.channel_tolerance).save(&diff_path);
        }

        let message = if matches {
            format!(
                "[PASS] {}: matches baseline ({:.2}% difference)",
                name,
                difference * 100.0
            )
        } else {
            format!(
                "[FAIL] {}: visual regression detected ({:.2}% difference)",
                name,
                difference * 100.0
            )
        };
        Ok(VisualCheck {
            name: name.to_string(),
            had_baseline: true,
            matches,
            difference,
            message,
        })
    }
}

/// File-system-safe capture name.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Fraction of pixels whose any channel differs by more than `tolerance`.
/// Dimension mismatches count as entirely different — the window moved or
/// was resized, so the comparison is meaningless anyway.
pub fn diff_fraction(baseline: &RgbaImage, current: &RgbaImage, tolerance: u8) -> f64 {
    if baseline.dimensions() != current.dimensions() {
        return 1.0;
    }
    let total = (baseline.width() * baseline.height()) as f64;
    if total == 0.0 {
        return 0.0;
    }
    let differing = baseline
        .pixels()
        .zip(current.pixels())
        .filter(|(a, b)| pixel_differs(a, b, tolerance))
        .count();
    differing as f64 / total
}

fn pixel_differs(a: &Rgba<u8>, b: &Rgba<u8>, tolerance: u8) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .take(3)
        .any(|(&x, &y)| x.abs_diff(y) > tolerance)
}

/// Differences in red over a dimmed copy of the current capture.
fn diff_image(baseline: &RgbaImage, current: &RgbaImage, tolerance: u8) -> RgbaImage {
    let (w, h) = current.dimensions();
    let mut out = RgbaImage::new(w, h);
    for (x, y, px) in current.enumerate_pixels() {
        let differs = baseline
            .get_pixel_checked(x, y)
            .is_none_or(|base| pixel_differs(base, px, tolerance));
        let rendered = if differs {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([px.0[0] / 3, px.0[1] / 3, px.0[2] / 3, 255])
        };
        out.put_pixel(x, y, rendered);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, value: u8) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([value, value, value, 255]))
    }

    #[test]
    fn identical_images_have_zero_difference() {
        let a = solid(10, 10, 100);
        assert_eq!(diff_fraction(&a, &a.clone(), 10), 0.0);
    }

    #[test]
    fn small_channel_noise_is_tolerated() {
        let a = solid(10, 10, 100);
        let b = solid(10, 10, 108);
        assert_eq!(diff_fraction(&a, &b, 10), 0.0);
        let c = solid(10, 10, 120);
        assert_eq!(diff_fraction(&a, &c, 10), 1.0);
    }

    #[test]
    fn partial_difference_is_fractional() {
        let a = solid(10, 10, 100);
        let mut b = solid(10, 10, 100);
        for x in 0..5 {
            b.put_pixel(x, 0, Rgba([255, 0, 0, 255]));
        }
        let frac = diff_fraction(&a, &b, 10);
        assert!((frac - 0.05).abs() < 1e-9);
    }

    #[test]
    fn dimension_mismatch_is_total_difference() {
        let a = solid(10, 10, 100);
        let b = solid(12, 10, 100);
        assert_eq!(diff_fraction(&a, &b, 10), 1.0);
    }

    #[test]
    fn diff_image_highlights_changes_in_red() {
        let a = solid(4, 4, 90);
        let mut b = solid(4, 4, 90);
        b.put_pixel(2, 2, Rgba([200, 200, 200, 255]));
        let d = diff_image(&a, &b, 10);
        assert_eq!(*d.get_pixel(2, 2), Rgba([255, 0, 0, 255]));
        assert_eq!(*d.get_pixel(0, 0), Rgba([30, 30, 30, 255]));
    }
}
