//! Synthetic mouse input.
//!
//! [`PointerOps`] is the seam the dispatcher drives; the real implementation
//! rides on `enigo`, test code substitutes a recording fake.

use std::{thread, time::Duration};

use enigo::{Axis, Button, Coordinate, Direction, Enigo, Mouse, Settings};
use tracing::warn;

use crate::geom::Point;

/// Abstract pointer device. Positive wheel notches scroll content up
/// (wheel away from the user); negative notches scroll down.
pub trait PointerOps {
    /// Glide the cursor to `p`.
    fn move_to(&mut self, p: Point) -> bool;

    /// Move to `p` and click the primary button.
    fn click(&mut self, p: Point) -> bool;

    /// Press at `start`, glide to `end` over `duration`, release.
    fn drag(&mut self, start: Point, end: Point, duration: Duration) -> bool;

    /// Hover `anchor` and turn the vertical wheel by `notches`.
    fn wheel(&mut self, anchor: Point, notches: i32) -> bool;

    /// Hover `anchor` and turn the horizontal wheel by `notches`
    /// (positive scrolls content left).
    fn hwheel(&mut self, anchor: Point, notches: i32) -> bool;
}

/// Number of interpolation steps for glides and drags.
const GLIDE_STEPS: u32 = 16;

/// Pause between button transition and movement.
const BUTTON_SETTLE: Duration = Duration::from_millis(50);

/// Real pointer backed by the OS input queue via `enigo`.
pub struct EnigoPointer {
    /// Underlying input synthesizer.
    enigo: Enigo,
}

impl EnigoPointer {
    /// Initialize the OS input backend.
    pub fn new() -> Option<Self> {
        match Enigo::new(&Settings::default()) {
            Ok(enigo) => Some(Self { enigo }),
            Err(e) => {
                warn!("failed to initialize input backend: {}", e);
                None
            }
        }
    }

    /// Interpolated absolute move so engines that track hover see the path.
    fn glide(&mut self, from: Point, to: Point, duration: Duration) -> bool {
        let steps = GLIDE_STEPS.max(1);
        let pause = duration / steps;
        for i in 1..=steps {
            let t = f64::from(i) / f64::from(steps);
            let x = from.x + (to.x - from.x) * t;
            let y = from.y + (to.y - from.y) * t;
            if self
                .enigo
                .move_mouse(x.round() as i32, y.round() as i32, Coordinate::Abs)
                .is_err()
            {
                return false;
            }
            if !pause.is_zero() {
                thread::sleep(pause);
            }
        }
        true
    }

    fn position(&self) -> Point {
        match self.enigo.location() {
            Ok((x, y)) => Point::new(f64::from(x), f64::from(y)),
            Err(_) => Point::new(0.0, 0.0),
        }
    }
}

impl PointerOps for EnigoPointer {
    fn move_to(&mut self, p: Point) -> bool {
        let from = self.position();
        self.glide(from, p, Duration::from_millis(100))
    }

    fn click(&mut self, p: Point) -> bool {
        if !self.move_to(p) {
            return false;
        }
        thread::sleep(BUTTON_SETTLE);
        self.enigo.button(Button::Left, Direction::Click).is_ok()
    }

    fn drag(&mut self, start: Point, end: Point, duration: Duration) -> bool {
        if !self.move_to(start) {
            return false;
        }
        thread::sleep(BUTTON_SETTLE);
        if self.enigo.button(Button::Left, Direction::Press).is_err() {
            return false;
        }
        thread::sleep(BUTTON_SETTLE);
        let moved = self.glide(start, end, duration);
        let released = self.enigo.button(Button::Left, Direction::Release).is_ok();
        moved && released
    }

    fn wheel(&mut self, anchor: Point, notches: i32) -> bool {
        if !self.move_to(anchor) {
            return false;
        }
        thread::sleep(BUTTON_SETTLE);
        // enigo's vertical axis is inverted relative to our convention.
        self.enigo.scroll(-notches, Axis::Vertical).is_ok()
    }

    fn hwheel(&mut self, anchor: Point, notches: i32) -> bool {
        if !self.move_to(anchor) {
            return false;
        }
        thread::sleep(BUTTON_SETTLE);
        self.enigo.scroll(-notches, Axis::Horizontal).is_ok()
    }
}
