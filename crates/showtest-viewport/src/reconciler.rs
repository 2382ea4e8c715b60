//! The viewport reconciler: brings a named element into a clickable
//! on-screen state.
//!
//! Telemetry boxes are already layout/scroll-adjusted, but an element can
//! still be hidden two distinct ways: clipped by a logical scroll container,
//! or outside the physical OS window. The remedies differ (drag an in-app
//! scrollbar vs. nothing can help at this window size), and both can be true
//! at once after a resize, so the two checks stay separate.

use std::{thread, time::Duration};

use showtest_telemetry::ElementSource;
use showtest_winops::Point;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    dispatch::Dispatcher,
    viewport::{Side, Viewport},
    visibility::{ClipDirection, ContainerVisibility, classify},
};

/// Scroll-container descriptor: which telemetry ids participate in
/// corrective scrolling for one container.
///
/// One reconciler parameterized this way serves both the sidebar and the
/// main detail panel; the container is data, not a code path.
#[derive(Debug, Clone)]
pub struct ContainerSpec {
    /// Telemetry id of the scroll container itself.
    pub id: String,
    /// Vertical scrollbar thumb id, when the app exposes one.
    pub thumb_v: Option<String>,
    /// Horizontal scrollbar thumb id, when the app exposes one.
    pub thumb_h: Option<String>,
    /// Whether a horizontal wheel scroll is an acceptable fallback when no
    /// horizontal thumb exists. The main detail panel refuses instead.
    pub hwheel_fallback: bool,
    /// Wheel anchor in client coordinates when neither the recorded anchor
    /// element nor the container can be resolved.
    pub wheel_anchor: Option<Point>,
}

impl ContainerSpec {
    /// Container whose thumbs follow the app's `<id>_scroll_thumb_{v,h}`
    /// naming convention.
    pub fn with_standard_thumbs(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            thumb_v: Some(format!("{}_scroll_thumb_v", id)),
            thumb_h: Some(format!("{}_scroll_thumb_h", id)),
            hwheel_fallback: true,
            wheel_anchor: None,
            id,
        }
    }
}

/// Tunables for one reconciler instance. The pixel amounts are empirically
/// matched to the app engine's scroll semantics and are configuration, not
/// constants — see the harness config for the override file.
#[derive(Debug, Clone)]
pub struct ReconcileTuning {
    /// Attempt ceiling before giving up.
    pub max_attempts: u32,
    /// Minimum visible span, per axis, for a slice to be clickable.
    pub visibility_eps: f64,
    /// Vertical thumb drag distance per correction, in pixels.
    pub thumb_drag_v: f64,
    /// Horizontal thumb drag distance per correction, in pixels.
    pub thumb_drag_h: f64,
    /// Wheel notches per vertical correction.
    pub wheel_notches: i32,
    /// Wheel notches per horizontal correction.
    pub hwheel_notches: i32,
    /// Inset used when clamping thumb-drag endpoints into the window.
    pub clamp_inset: f64,
    /// Duration of thumb drags.
    pub drag_duration: Duration,
    /// Pause after each corrective action before re-resolving.
    pub settle: Duration,
}

impl Default for ReconcileTuning {
    fn default() -> Self {
        Self {
            max_attempts: 12,
            visibility_eps: 4.0,
            thumb_drag_v: 160.0,
            thumb_drag_h: 220.0,
            wheel_notches: 6,
            hwheel_notches: 80,
            clamp_inset: 10.0,
            drag_duration: Duration::from_millis(300),
            settle: Duration::from_millis(250),
        }
    }
}

/// Where one reconciliation attempt landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReconcileState {
    /// Visibility cannot be determined yet (declared container not in
    /// telemetry).
    Unresolved,
    /// A clickable point exists; carries the screen coordinate.
    VisibleInWindow(Point),
    /// Hidden by the scroll container in the given direction.
    ClippedByContainer(ClipDirection),
    /// The candidate point falls outside the OS window in the given
    /// direction.
    OutOfWindow(ClipDirection),
    /// Attempt ceiling reached; terminal.
    Exhausted,
}

/// Terminal reconciliation failures.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// The element is absent from telemetry; retries cannot help.
    #[error("element '{0}' not found in telemetry")]
    ElementMissing(String),
    /// A non-directional blockage with no scroll remedy.
    #[error("'{id}' blocked: {reason}")]
    Blocked {
        /// Element being reconciled.
        id: String,
        /// Human-readable reason, naming the violated constraint.
        reason: String,
    },
    /// The attempt ceiling was reached without achieving visibility.
    #[error("unable to bring '{id}' into view after {attempts} attempts")]
    Exhausted {
        /// Element being reconciled.
        id: String,
        /// Attempts consumed (equals the configured ceiling).
        attempts: u32,
    },
}

/// The reconciliation engine. Holds no OS state; everything flows through
/// the element source and the dispatcher it is handed per call.
pub struct Reconciler<'a, S: ElementSource> {
    /// Element bounds provider (live telemetry in production).
    source: &'a S,
    /// Scroll container ancestry, when one is declared for the target.
    container: Option<ContainerSpec>,
    /// Scroll tuning.
    tuning: ReconcileTuning,
    /// Previously successful nearby element used to anchor wheel events;
    /// engines route wheel input to the hovered region, not globally.
    anchor: Option<String>,
}

impl<'a, S: ElementSource> Reconciler<'a, S> {
    /// Reconciler over `source` for an optional container ancestry.
    pub fn new(source: &'a S, container: Option<ContainerSpec>, tuning: ReconcileTuning) -> Self {
        Self {
            source,
            container,
            tuning,
            anchor: None,
        }
    }

    /// Use `anchor` as the preferred wheel hover target.
    pub fn with_anchor(mut self, anchor: Option<String>) -> Self {
        self.anchor = anchor;
        self
    }

    /// One classification pass with no side effects.
    ///
    /// Returns `Unresolved`, `VisibleInWindow`, `ClippedByContainer`, or
    /// `OutOfWindow`; an absent element is an immediate error.
    pub fn classify(&self, id: &str, viewport: &Viewport) -> Result<ReconcileState, ReconcileError> {
        let element = self
            .source
            .element(id)
            .ok_or_else(|| ReconcileError::ElementMissing(id.to_string()))?;

        let candidate = match &self.container {
            Some(spec) => match self.source.element(&spec.id) {
                Some(container) => {
                    match classify(
                        &element.bounds(),
                        &container.bounds(),
                        self.tuning.visibility_eps,
                    ) {
                        ContainerVisibility::Visible(slice) => slice.center(),
                        ContainerVisibility::Clipped(dir) => {
                            return Ok(ReconcileState::ClippedByContainer(dir));
                        }
                    }
                }
                None => return Ok(ReconcileState::Unresolved),
            },
            None => {
                if !element.meaningfully_visible(self.tuning.visibility_eps) {
                    return Err(ReconcileError::Blocked {
                        id: id.to_string(),
                        reason: format!(
                            "box {:.0}x{:.0} is below the visibility epsilon",
                            element.width, element.height
                        ),
                    });
                }
                element.bounds().center()
            }
        };

        // Independent physical-window check on the slice-adjusted point.
        let screen = viewport.to_screen(candidate);
        match viewport.check(screen) {
            Ok(()) => Ok(ReconcileState::VisibleInWindow(screen)),
            Err(v) => Ok(ReconcileState::OutOfWindow(side_direction(v.side))),
        }
    }

    /// Iterate classify-and-correct until the element is clickable.
    ///
    /// Returns the validated screen coordinate; the caller performs the
    /// actual action. Fails with `Exhausted` after exactly the configured
    /// number of attempts, `Blocked` when a needed remedy does not exist.
    pub fn bring_into_view(
        &self,
        id: &str,
        dispatcher: &mut Dispatcher<'_>,
    ) -> Result<Point, ReconcileError> {
        let mut state = ReconcileState::Unresolved;
        for attempt in 1..=self.tuning.max_attempts {
            state = self.classify(id, dispatcher.viewport())?;
            let direction = match state {
                ReconcileState::VisibleInWindow(p) => {
                    debug!("'{}' visible at ({:.0}, {:.0})", id, p.x, p.y);
                    return Ok(p);
                }
                ReconcileState::ClippedByContainer(dir) | ReconcileState::OutOfWindow(dir) => dir,
                // Container not in telemetry yet; content is assumed below
                // the fold until proven otherwise.
                ReconcileState::Unresolved => ClipDirection::Below,
                ReconcileState::Exhausted => unreachable!("classify never returns Exhausted"),
            };

            debug!(
                "[SCROLL] '{}' {} viewport (attempt {}/{}); correcting",
                id, direction, attempt, self.tuning.max_attempts
            );
            self.correct(direction, dispatcher)
                .map_err(|reason| ReconcileError::Blocked {
                    id: id.to_string(),
                    reason,
                })?;
            if !self.tuning.settle.is_zero() {
                thread::sleep(self.tuning.settle);
            }
        }

        state = ReconcileState::Exhausted;
        warn!("reconcile '{}' ended in {:?}", id, state);
        Err(ReconcileError::Exhausted {
            id: id.to_string(),
            attempts: self.tuning.max_attempts,
        })
    }

    /// Issue exactly one corrective action for `direction`.
    fn correct(&self, direction: ClipDirection, dispatcher: &mut Dispatcher<'_>) -> Result<(), String> {
        let Some(spec) = &self.container else {
            // No container ancestry means no scroll remedy at all.
            return Err(format!("element is {} the window and nothing can scroll it", direction));
        };

        if direction.is_vertical() {
            let sign = if direction == ClipDirection::Below { 1.0 } else { -1.0 };
            if let Some(thumb) = self.resolve_thumb(spec.thumb_v.as_deref()) {
                let start = dispatcher.viewport().to_screen(thumb);
                let ok = dispatcher.drag_thumb(
                    start,
                    0.0,
                    sign * self.tuning.thumb_drag_v,
                    self.tuning.clamp_inset,
                    self.tuning.drag_duration,
                    "vertical scroll thumb",
                );
                return ok.then_some(()).ok_or_else(|| "vertical thumb drag refused".to_string());
            }
            // Wheel routing is hover-dependent; anchor on something known
            // to sit inside the container.
            let anchor = self.wheel_anchor(dispatcher.viewport());
            let notches = if direction == ClipDirection::Below {
                -self.tuning.wheel_notches
            } else {
                self.tuning.wheel_notches
            };
            return dispatcher
                .wheel(anchor, notches)
                .then_some(())
                .ok_or_else(|| "wheel scroll refused".to_string());
        }

        let sign = if direction == ClipDirection::Right { 1.0 } else { -1.0 };
        if let Some(thumb) = self.resolve_thumb(spec.thumb_h.as_deref()) {
            let start = dispatcher.viewport().to_screen(thumb);
            let ok = dispatcher.drag_thumb(
                start,
                sign * self.tuning.thumb_drag_h,
                0.0,
                self.tuning.clamp_inset,
                self.tuning.drag_duration,
                "horizontal scroll thumb",
            );
            return ok.then_some(()).ok_or_else(|| "horizontal thumb drag refused".to_string());
        }
        if !spec.hwheel_fallback {
            return Err(format!("element is {} the container and no horizontal remedy exists", direction));
        }
        let anchor = self.wheel_anchor(dispatcher.viewport());
        let notches = if direction == ClipDirection::Right {
            -self.tuning.hwheel_notches
        } else {
            self.tuning.hwheel_notches
        };
        dispatcher
            .hwheel(anchor, notches)
            .then_some(())
            .ok_or_else(|| "horizontal wheel scroll refused".to_string())
    }

    /// Screen-space center of a thumb element, if present in telemetry.
    fn resolve_thumb(&self, id: Option<&str>) -> Option<Point> {
        let element = self.source.element(id?)?;
        Some(element.bounds().center())
    }

    /// Preference chain for the wheel hover point: recorded anchor element,
    /// then the container itself, then the configured fallback, then the
    /// window center.
    fn wheel_anchor(&self, viewport: &Viewport) -> Point {
        if let Some(anchor_id) = self.anchor.as_deref() {
            if let Some(e) = self.source.element(anchor_id) {
                return viewport.to_screen(e.bounds().center());
            }
        }
        if let Some(spec) = &self.container {
            if let Some(c) = self.source.element(&spec.id) {
                return viewport.to_screen(c.bounds().center());
            }
            if let Some(p) = spec.wheel_anchor {
                return viewport.to_screen(p);
            }
        }
        viewport.outer().center()
    }
}

/// Map a window-bounds violation side onto a clip direction.
const fn side_direction(side: Side) -> ClipDirection {
    match side {
        Side::Left => ClipDirection::Left,
        Side::Right => ClipDirection::Right,
        Side::Top => ClipDirection::Above,
        Side::Bottom => ClipDirection::Below,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use showtest_telemetry::ElementSnapshot;
    use showtest_winops::{PointerOps, Rect};

    use super::*;
    use crate::dispatch::{
        NoFocus,
        test_support::{Action, RecordingPointer},
    };

    /// Element source replaying one frame per reconciliation attempt.
    /// The last frame repeats once the script runs out.
    struct ScriptedSource {
        frames: RefCell<Vec<HashMap<String, ElementSnapshot>>>,
    }

    impl ScriptedSource {
        fn new(frames: Vec<Vec<(&str, Rect)>>) -> Self {
            let frames = frames
                .into_iter()
                .map(|frame| {
                    frame
                        .into_iter()
                        .map(|(id, r)| {
                            (
                                id.to_string(),
                                ElementSnapshot {
                                    id: id.to_string(),
                                    x: r.x,
                                    y: r.y,
                                    width: r.w,
                                    height: r.h,
                                },
                            )
                        })
                        .collect()
                })
                .collect();
            Self {
                frames: RefCell::new(frames),
            }
        }
    }

    impl ElementSource for ScriptedSource {
        fn element(&self, id: &str) -> Option<ElementSnapshot> {
            let frames = self.frames.borrow();
            frames.first().and_then(|f| f.get(id).cloned())
        }
    }

    impl ScriptedSource {
        /// Advance to the next scripted frame, emulating the UI responding
        /// to a corrective action.
        fn advance(&self) {
            let mut frames = self.frames.borrow_mut();
            if frames.len() > 1 {
                frames.remove(0);
            }
        }
    }

    /// Pointer that records actions and advances the scripted UI after each
    /// corrective scroll, the way the real app reacts to input.
    struct AdvancingPointer<'a> {
        inner: RecordingPointer,
        source: &'a ScriptedSource,
    }

    impl<'a> AdvancingPointer<'a> {
        fn new(source: &'a ScriptedSource) -> Self {
            Self {
                inner: RecordingPointer::default(),
                source,
            }
        }
    }

    impl showtest_winops::PointerOps for AdvancingPointer<'_> {
        fn move_to(&mut self, p: Point) -> bool {
            self.inner.move_to(p)
        }
        fn click(&mut self, p: Point) -> bool {
            self.inner.click(p)
        }
        fn drag(&mut self, start: Point, end: Point, duration: Duration) -> bool {
            let ok = self.inner.drag(start, end, duration);
            self.source.advance();
            ok
        }
        fn wheel(&mut self, anchor: Point, notches: i32) -> bool {
            let ok = self.inner.wheel(anchor, notches);
            self.source.advance();
            ok
        }
        fn hwheel(&mut self, anchor: Point, notches: i32) -> bool {
            let ok = self.inner.hwheel(anchor, notches);
            self.source.advance();
            ok
        }
    }

    fn test_tuning() -> ReconcileTuning {
        ReconcileTuning {
            settle: Duration::ZERO,
            drag_duration: Duration::ZERO,
            ..ReconcileTuning::default()
        }
    }

    /// Viewport with client origin at (0, 0) so client == screen coords.
    fn flat_viewport() -> Viewport {
        Viewport::new(Rect::new(0.0, 0.0, 1280.0, 900.0), Point::new(0.0, 0.0), 5.0)
    }

    const SIDEBAR: &str = "sidebar_scroll_container";

    fn sidebar_spec() -> ContainerSpec {
        ContainerSpec::with_standard_thumbs(SIDEBAR)
    }

    #[test]
    fn clipped_below_scrolls_then_clicks_slice_midpoint() {
        // Attempt 1: element entirely below the container. Attempt 2: the
        // scroll brought it to y=300, fully visible.
        let source = ScriptedSource::new(vec![
            vec![
                ("nav_checkboxes", Rect::new(20.0, 650.0, 180.0, 32.0)),
                (SIDEBAR, Rect::new(0.0, 100.0, 220.0, 500.0)),
            ],
            vec![
                ("nav_checkboxes", Rect::new(20.0, 300.0, 180.0, 32.0)),
                (SIDEBAR, Rect::new(0.0, 100.0, 220.0, 500.0)),
            ],
        ]);

        let reconciler = Reconciler::new(&source, Some(sidebar_spec()), test_tuning());
        let vp = flat_viewport();

        // First classification must be a vertical container clip.
        assert_eq!(
            reconciler.classify("nav_checkboxes", &vp).unwrap(),
            ReconcileState::ClippedByContainer(ClipDirection::Below)
        );

        let mut pointer = AdvancingPointer::new(&source);
        let mut focus = NoFocus;
        let mut dispatcher = Dispatcher::new(&mut pointer, &mut focus, vp);
        let point = reconciler
            .bring_into_view("nav_checkboxes", &mut dispatcher)
            .unwrap();

        // Slice midpoint of the now-visible element, in screen coordinates.
        assert_eq!(point, Point::new(110.0, 316.0));
        // Exactly one downward correction happened, and never a click —
        // the caller owns the click.
        assert_eq!(pointer.inner.actions.len(), 1);
        match &pointer.inner.actions[0] {
            Action::Wheel(_, notches) => assert!(*notches < 0),
            other => panic!("expected wheel correction, got {:?}", other),
        }
    }

    #[test]
    fn corrective_scroll_precedes_any_click_when_clipped() {
        // Element below the fold; no thumbs in telemetry, so the wheel path
        // fires. The scripted source never updates, so every attempt
        // produces one corrective wheel event.
        let source = ScriptedSource::new(vec![vec![
            ("nav_checkboxes", Rect::new(20.0, 650.0, 180.0, 32.0)),
            (SIDEBAR, Rect::new(0.0, 100.0, 220.0, 500.0)),
        ]]);
        let tuning = ReconcileTuning {
            max_attempts: 3,
            ..test_tuning()
        };
        let reconciler = Reconciler::new(&source, Some(sidebar_spec()), tuning);

        let mut pointer = RecordingPointer::default();
        let mut focus = NoFocus;
        let mut dispatcher = Dispatcher::new(&mut pointer, &mut focus, flat_viewport());

        let err = reconciler
            .bring_into_view("nav_checkboxes", &mut dispatcher)
            .unwrap_err();
        assert!(matches!(err, ReconcileError::Exhausted { attempts: 3, .. }));

        // One wheel correction per attempt, anchored at the container
        // center, scrolling down; never a click.
        assert_eq!(pointer.actions.len(), 3);
        for action in &pointer.actions {
            match action {
                Action::Wheel(anchor, notches) => {
                    assert_eq!(*anchor, Point::new(110.0, 350.0));
                    assert!(*notches < 0, "downward scroll has negative notches");
                }
                other => panic!("expected wheel, got {:?}", other),
            }
        }
    }

    #[test]
    fn thumb_drag_preferred_over_wheel() {
        let source = ScriptedSource::new(vec![vec![
            ("nav_checkboxes", Rect::new(20.0, 650.0, 180.0, 32.0)),
            (SIDEBAR, Rect::new(0.0, 100.0, 220.0, 500.0)),
            ("sidebar_scroll_container_scroll_thumb_v", Rect::new(208.0, 120.0, 8.0, 60.0)),
        ]]);
        let tuning = ReconcileTuning {
            max_attempts: 1,
            ..test_tuning()
        };
        let reconciler = Reconciler::new(&source, Some(sidebar_spec()), tuning);

        let mut pointer = RecordingPointer::default();
        let mut focus = NoFocus;
        let mut dispatcher = Dispatcher::new(&mut pointer, &mut focus, flat_viewport());
        let _ = reconciler.bring_into_view("nav_checkboxes", &mut dispatcher);

        match &pointer.actions[0] {
            Action::Drag(start, end) => {
                assert_eq!(*start, Point::new(212.0, 150.0));
                assert_eq!(end.y, 310.0, "downward thumb drag by the tuned distance");
            }
            other => panic!("expected thumb drag, got {:?}", other),
        }
    }

    #[test]
    fn exhausts_after_exactly_the_configured_attempts() {
        // Declared container never appears in telemetry: every attempt is
        // Unresolved, corrected blindly, until the ceiling.
        let source = ScriptedSource::new(vec![vec![(
            "nav_checkboxes",
            Rect::new(20.0, 650.0, 180.0, 32.0),
        )]]);
        let tuning = ReconcileTuning {
            max_attempts: 5,
            ..test_tuning()
        };
        let reconciler = Reconciler::new(&source, Some(sidebar_spec()), tuning);

        let mut pointer = RecordingPointer::default();
        let mut focus = NoFocus;
        let mut dispatcher = Dispatcher::new(&mut pointer, &mut focus, flat_viewport());
        let err = reconciler
            .bring_into_view("nav_checkboxes", &mut dispatcher)
            .unwrap_err();
        match err {
            ReconcileError::Exhausted { attempts, .. } => assert_eq!(attempts, 5),
            other => panic!("expected exhausted, got {}", other),
        }
        assert_eq!(pointer.actions.len(), 5, "one correction per attempt");
    }

    #[test]
    fn missing_element_fails_immediately() {
        let source = ScriptedSource::new(vec![vec![(SIDEBAR, Rect::new(0.0, 100.0, 220.0, 500.0))]]);
        let reconciler = Reconciler::new(&source, Some(sidebar_spec()), test_tuning());

        let mut pointer = RecordingPointer::default();
        let mut focus = NoFocus;
        let mut dispatcher = Dispatcher::new(&mut pointer, &mut focus, flat_viewport());
        let err = reconciler.bring_into_view("nav_gone", &mut dispatcher).unwrap_err();
        assert!(matches!(err, ReconcileError::ElementMissing(_)));
        assert!(pointer.actions.is_empty(), "no retries for a missing element");
    }

    #[test]
    fn horizontal_clip_without_remedy_is_blocked() {
        let source = ScriptedSource::new(vec![vec![
            ("tab_7", Rect::new(900.0, 300.0, 80.0, 32.0)),
            ("main_scroll_container", Rect::new(240.0, 100.0, 600.0, 700.0)),
        ]]);
        let spec = ContainerSpec {
            id: "main_scroll_container".into(),
            thumb_v: Some("main_scroll_container_scroll_thumb_v".into()),
            thumb_h: None,
            hwheel_fallback: false,
            wheel_anchor: None,
        };
        let reconciler = Reconciler::new(&source, Some(spec), test_tuning());

        let mut pointer = RecordingPointer::default();
        let mut focus = NoFocus;
        let mut dispatcher = Dispatcher::new(&mut pointer, &mut focus, flat_viewport());
        let err = reconciler.bring_into_view("tab_7", &mut dispatcher).unwrap_err();
        assert!(matches!(err, ReconcileError::Blocked { .. }));
        assert!(pointer.actions.is_empty());
    }

    #[test]
    fn out_of_window_is_distinct_from_container_clip() {
        // Fully visible within its container, but the container itself
        // hangs below a freshly shrunken window.
        let source = ScriptedSource::new(vec![vec![
            ("nav_tail", Rect::new(20.0, 700.0, 180.0, 32.0)),
            (SIDEBAR, Rect::new(0.0, 100.0, 220.0, 700.0)),
        ]]);
        let reconciler = Reconciler::new(&source, Some(sidebar_spec()), test_tuning());
        let small = Viewport::new(Rect::new(0.0, 0.0, 480.0, 600.0), Point::new(0.0, 0.0), 5.0);
        assert_eq!(
            reconciler.classify("nav_tail", &small).unwrap(),
            ReconcileState::OutOfWindow(ClipDirection::Below)
        );
    }

    #[test]
    fn classification_is_idempotent_for_a_static_snapshot() {
        let source = ScriptedSource::new(vec![vec![
            ("nav_checkboxes", Rect::new(20.0, 650.0, 180.0, 32.0)),
            (SIDEBAR, Rect::new(0.0, 100.0, 220.0, 500.0)),
        ]]);
        let reconciler = Reconciler::new(&source, Some(sidebar_spec()), test_tuning());
        let vp = flat_viewport();
        let a = reconciler.classify("nav_checkboxes", &vp).unwrap();
        let b = reconciler.classify("nav_checkboxes", &vp).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn no_container_degenerate_box_is_blocked() {
        let source = ScriptedSource::new(vec![vec![("badge_0", Rect::new(10.0, 10.0, 2.0, 2.0))]]);
        let reconciler = Reconciler::new(&source, None, test_tuning());
        let err = reconciler.classify("badge_0", &flat_viewport()).unwrap_err();
        assert!(matches!(err, ReconcileError::Blocked { .. }));
    }
}
