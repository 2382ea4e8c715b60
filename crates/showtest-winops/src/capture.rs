//! Screen capture seam.

use image::RgbaImage;

use crate::geom::Rect;

/// Capture a region of the screen as RGBA pixels.
pub trait ScreenCapture {
    /// Grab `rect` (screen coordinates). `None` on platform failure.
    fn capture_rect(&mut self, rect: Rect) -> Option<RgbaImage>;
}
