//! Validated synthetic input dispatch.
//!
//! Every endpoint is checked against the viewport before anything reaches
//! the OS input queue; a refused action returns `false` and logs the bound
//! it violated. This is what keeps the automation from clicking the host
//! desktop or another window after a surprise resize.

use std::time::Duration;

use showtest_winops::{Point, PointerOps};
use tracing::{debug, warn};

use crate::viewport::Viewport;

/// Best-effort window focus hook, re-asserted before physical actions.
/// Window managers can silently steal focus between actions; failure here
/// is non-fatal.
pub trait FocusOps {
    /// Try to bring the app window back to the foreground.
    fn reassert_focus(&mut self) -> bool;
}

/// No-op focus handler for contexts with nothing to focus.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFocus;

impl FocusOps for NoFocus {
    fn reassert_focus(&mut self) -> bool {
        true
    }
}

/// Pointer actions gated by viewport validation.
pub struct Dispatcher<'a> {
    /// Raw pointer device.
    pointer: &'a mut dyn PointerOps,
    /// Focus re-assert hook.
    focus: &'a mut dyn FocusOps,
    /// Current window placement.
    viewport: Viewport,
}

impl<'a> Dispatcher<'a> {
    /// Build a dispatcher for the current viewport.
    pub fn new(
        pointer: &'a mut dyn PointerOps,
        focus: &'a mut dyn FocusOps,
        viewport: Viewport,
    ) -> Self {
        Self {
            pointer,
            focus,
            viewport,
        }
    }

    /// The viewport this dispatcher validates against.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    fn refocus(&mut self) {
        if !self.focus.reassert_focus() {
            debug!("focus re-assert failed; continuing");
        }
    }

    /// Click at a screen coordinate. Refuses out-of-window points.
    pub fn click(&mut self, p: Point, what: &str) -> bool {
        if let Err(v) = self.viewport.check(p) {
            warn!(
                "[BLOCKED] click at ({:.0}, {:.0}) would be outside application: {} ({})",
                p.x, p.y, v, what
            );
            return false;
        }
        self.refocus();
        self.pointer.click(p)
    }

    /// Drag from `start` by `(dx, dy)`. Origin and destination are
    /// validated independently; either failing refuses the whole action.
    pub fn drag(&mut self, start: Point, dx: f64, dy: f64, duration: Duration, what: &str) -> bool {
        let end = start.offset(dx, dy);
        if let Err(v) = self.viewport.check(start) {
            warn!(
                "[BLOCKED] drag start at ({:.0}, {:.0}) outside application: {} ({})",
                start.x, start.y, v, what
            );
            return false;
        }
        if let Err(v) = self.viewport.check(end) {
            warn!(
                "[BLOCKED] drag end at ({:.0}, {:.0}) would be outside application: {} ({})",
                end.x, end.y, v, what
            );
            return false;
        }
        self.refocus();
        self.pointer.drag(start, end, duration)
    }

    /// Drag a scrollbar thumb. The start must be valid; an out-of-window
    /// endpoint is clamped into the window rather than refused, since a
    /// long thumb drag legitimately overshoots.
    pub fn drag_thumb(
        &mut self,
        start: Point,
        dx: f64,
        dy: f64,
        inset: f64,
        duration: Duration,
        what: &str,
    ) -> bool {
        if let Err(v) = self.viewport.check(start) {
            warn!(
                "[BLOCKED] scrollbar at ({:.0}, {:.0}) outside window: {} ({})",
                start.x, start.y, v, what
            );
            return false;
        }
        let mut end = start.offset(dx, dy);
        if self.viewport.check(end).is_err() {
            end = self.viewport.clamp_into(end, inset);
            debug!("[CLAMPED] scrollbar drag end clamped to ({:.0}, {:.0})", end.x, end.y);
        }
        self.refocus();
        self.pointer.drag(start, end, duration)
    }

    /// Vertical wheel at an anchor point. Positive notches scroll up.
    pub fn wheel(&mut self, anchor: Point, notches: i32) -> bool {
        if let Err(v) = self.viewport.check(anchor) {
            warn!(
                "[BLOCKED] wheel anchor ({:.0}, {:.0}) outside window: {}",
                anchor.x, anchor.y, v
            );
            return false;
        }
        self.refocus();
        self.pointer.wheel(anchor, notches)
    }

    /// Horizontal wheel at an anchor point.
    pub fn hwheel(&mut self, anchor: Point, notches: i32) -> bool {
        if let Err(v) = self.viewport.check(anchor) {
            warn!(
                "[BLOCKED] wheel anchor ({:.0}, {:.0}) outside window: {}",
                anchor.x, anchor.y, v
            );
            return false;
        }
        self.refocus();
        self.pointer.hwheel(anchor, notches)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Recording fakes shared by the dispatcher and reconciler tests.

    use std::time::Duration;

    use showtest_winops::{Point, PointerOps};

    /// One recorded pointer action.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Action {
        /// Cursor move.
        Move(Point),
        /// Click at a point.
        Click(Point),
        /// Drag from start to end.
        Drag(Point, Point),
        /// Vertical wheel (anchor, notches).
        Wheel(Point, i32),
        /// Horizontal wheel (anchor, notches).
        HWheel(Point, i32),
    }

    /// Pointer that records instead of dispatching.
    #[derive(Debug, Default)]
    pub struct RecordingPointer {
        /// Actions in dispatch order.
        pub actions: Vec<Action>,
    }

    impl PointerOps for RecordingPointer {
        fn move_to(&mut self, p: Point) -> bool {
            self.actions.push(Action::Move(p));
            true
        }
        fn click(&mut self, p: Point) -> bool {
            self.actions.push(Action::Click(p));
            true
        }
        fn drag(&mut self, start: Point, end: Point, _duration: Duration) -> bool {
            self.actions.push(Action::Drag(start, end));
            true
        }
        fn wheel(&mut self, anchor: Point, notches: i32) -> bool {
            self.actions.push(Action::Wheel(anchor, notches));
            true
        }
        fn hwheel(&mut self, anchor: Point, notches: i32) -> bool {
            self.actions.push(Action::HWheel(anchor, notches));
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use showtest_winops::Rect;

    use super::{test_support::{Action, RecordingPointer}, *};

    fn viewport() -> Viewport {
        Viewport::new(
            Rect::new(0.0, 0.0, 800.0, 600.0),
            Point::new(8.0, 31.0),
            5.0,
        )
    }

    #[test]
    fn click_inside_dispatches() {
        let mut pointer = RecordingPointer::default();
        let mut focus = NoFocus;
        let mut d = Dispatcher::new(&mut pointer, &mut focus, viewport());
        assert!(d.click(Point::new(400.0, 300.0), "test"));
        assert_eq!(pointer.actions, vec![Action::Click(Point::new(400.0, 300.0))]);
    }

    #[test]
    fn click_refused_on_every_side() {
        let mut pointer = RecordingPointer::default();
        let mut focus = NoFocus;
        let mut d = Dispatcher::new(&mut pointer, &mut focus, viewport());
        for p in [
            Point::new(2.0, 300.0),   // left
            Point::new(798.0, 300.0), // right
            Point::new(400.0, 2.0),   // top
            Point::new(400.0, 598.0), // bottom
        ] {
            assert!(!d.click(p, "oob"));
        }
        assert!(pointer.actions.is_empty(), "no OS input for refused clicks");
    }

    #[test]
    fn drag_validates_both_endpoints() {
        let mut pointer = RecordingPointer::default();
        let mut focus = NoFocus;
        // Valid start, end would leave the window.
        {
            let mut d = Dispatcher::new(&mut pointer, &mut focus, viewport());
            assert!(!d.drag(
                Point::new(700.0, 300.0),
                200.0,
                0.0,
                Duration::from_millis(10),
                "slider"
            ));
        }
        assert!(pointer.actions.is_empty());
        // Both valid.
        {
            let mut d = Dispatcher::new(&mut pointer, &mut focus, viewport());
            assert!(d.drag(
                Point::new(300.0, 300.0),
                100.0,
                0.0,
                Duration::from_millis(10),
                "slider"
            ));
        }
        assert_eq!(pointer.actions.len(), 1);
    }

    #[test]
    fn thumb_drag_clamps_instead_of_refusing() {
        let mut pointer = RecordingPointer::default();
        let mut focus = NoFocus;
        let mut d = Dispatcher::new(&mut pointer, &mut focus, viewport());
        assert!(d.drag_thumb(
            Point::new(780.0, 300.0),
            0.0,
            500.0,
            10.0,
            Duration::from_millis(10),
            "thumb"
        ));
        match &pointer.actions[0] {
            Action::Drag(start, end) => {
                assert_eq!(*start, Point::new(780.0, 300.0));
                assert_eq!(*end, Point::new(780.0, 590.0));
            }
            other => panic!("expected drag, got {:?}", other),
        }
    }

    #[test]
    fn thumb_drag_still_refuses_bad_start() {
        let mut pointer = RecordingPointer::default();
        let mut focus = NoFocus;
        let mut d = Dispatcher::new(&mut pointer, &mut focus, viewport());
        assert!(!d.drag_thumb(
            Point::new(900.0, 300.0),
            0.0,
            50.0,
            10.0,
            Duration::from_millis(10),
            "thumb"
        ));
        assert!(pointer.actions.is_empty());
    }
}
