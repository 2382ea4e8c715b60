//! Telemetry snapshot data model.
//!
//! The app under test periodically serializes its UI element tree to a JSON
//! file; these types mirror that document. Snapshots are replaced wholesale
//! on every read — no identity persists across snapshots except the string
//! id.

use std::{cmp::Ordering, collections::BTreeMap};

use serde::Deserialize;
use showtest_winops::Rect;

/// One addressable UI element at the last telemetry sample.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ElementSnapshot {
    /// Stable string identifier, unique within a snapshot.
    #[serde(rename = "test_id")]
    pub id: String,
    /// Left edge in window-client pixels, layout/scroll-adjusted.
    pub x: f64,
    /// Top edge in window-client pixels.
    pub y: f64,
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl ElementSnapshot {
    /// Bounding box as a rectangle.
    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Whether the box meets the visibility epsilon in both dimensions.
    /// Degenerate boxes stay in the snapshot but are not interactable.
    #[inline]
    pub fn meaningfully_visible(&self, eps: f64) -> bool {
        self.width >= eps && self.height >= eps
    }
}

/// Known state keys the app publishes.
///
/// The raw map remains reachable via [`TelemetrySnapshot::state_raw`] for
/// keys the harness has no name for yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKey {
    /// Currently selected showcase section.
    SelectedSection,
    /// Logical window width in pixels.
    WindowWidth,
    /// Logical window height in pixels.
    WindowHeight,
    /// Sidebar scroll offset in pixels.
    SidebarScrollY,
    /// Main content scroll offset in pixels.
    MainScrollY,
    /// Active theme mode (light/dark).
    ThemeMode,
}

impl StateKey {
    /// Wire name of the key in the telemetry `states` map.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SelectedSection => "selected_section",
            Self::WindowWidth => "window_width",
            Self::WindowHeight => "window_height",
            Self::SidebarScrollY => "sidebar_scroll_y",
            Self::MainScrollY => "main_scroll_y",
            Self::ThemeMode => "theme_mode",
        }
    }
}

/// Position in the append-only event log. Events only ever accumulate within
/// a run, so a cursor taken earlier bounds a precise "what happened since"
/// range query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct EventCursor(pub usize);

/// The full telemetry document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetrySnapshot {
    /// All elements visible to automation, replaced wholesale per sample.
    #[serde(default)]
    pub elements: Vec<ElementSnapshot>,
    /// Named UI state values.
    #[serde(default)]
    pub states: BTreeMap<String, String>,
    /// Append-only log of recent UI-triggered events, most recent last.
    #[serde(default)]
    pub events: Vec<String>,
}

impl TelemetrySnapshot {
    /// Find an element by id. Linear scan; `None` means "not rendered", not
    /// an error.
    pub fn element(&self, id: &str) -> Option<&ElementSnapshot> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Typed state lookup.
    pub fn state(&self, key: StateKey) -> Option<&str> {
        self.state_raw(key.as_str())
    }

    /// Raw state lookup for keys without a [`StateKey`] name.
    pub fn state_raw(&self, key: &str) -> Option<&str> {
        self.states.get(key).map(String::as_str)
    }

    /// Numeric state lookup; unparsable or missing values read as 0.0.
    pub fn state_f64(&self, key: StateKey) -> f64 {
        self.state(key)
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    /// Element ids starting with `prefix`, ordered by on-screen (y, x).
    pub fn ids_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut matches: Vec<&ElementSnapshot> = self
            .elements
            .iter()
            .filter(|e| e.id.starts_with(prefix))
            .collect();
        matches.sort_by(|a, b| {
            (a.y, a.x)
                .partial_cmp(&(b.y, b.x))
                .unwrap_or(Ordering::Equal)
        });
        matches.into_iter().map(|e| e.id.clone()).collect()
    }

    /// Cursor marking the current end of the event log.
    pub fn event_cursor(&self) -> EventCursor {
        EventCursor(self.events.len())
    }

    /// Events appended after `cursor` was taken.
    pub fn events_since(&self, cursor: EventCursor) -> &[String] {
        let start = cursor.0.min(self.events.len());
        &self.events[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_json() -> TelemetrySnapshot {
        serde_json::from_str(
            r#"{
                "elements": [
                    {"test_id": "nav_buttons", "x": 20.0, "y": 40.0, "width": 180.0, "height": 32.0},
                    {"test_id": "nav_checkboxes", "x": 20.0, "y": 80.0, "width": 180.0, "height": 32.0},
                    {"test_id": "badge_0", "x": 300.0, "y": 10.0, "width": 2.0, "height": 2.0}
                ],
                "states": {"selected_section": "Buttons", "sidebar_scroll_y": "12.5"},
                "events": ["Nav: Buttons selected"]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn element_lookup_and_bounds() {
        let snap = snapshot_json();
        let e = snap.element("nav_buttons").unwrap();
        assert_eq!(e.bounds(), showtest_winops::Rect::new(20.0, 40.0, 180.0, 32.0));
        assert!(snap.element("nav_missing").is_none());
    }

    #[test]
    fn degenerate_boxes_are_not_visible() {
        let snap = snapshot_json();
        assert!(!snap.element("badge_0").unwrap().meaningfully_visible(4.0));
        assert!(snap.element("nav_buttons").unwrap().meaningfully_visible(4.0));
    }

    #[test]
    fn typed_and_numeric_states() {
        let snap = snapshot_json();
        assert_eq!(snap.state(StateKey::SelectedSection), Some("Buttons"));
        assert_eq!(snap.state_f64(StateKey::SidebarScrollY), 12.5);
        assert_eq!(snap.state_f64(StateKey::MainScrollY), 0.0);
    }

    #[test]
    fn prefix_ids_ordered_by_position() {
        let snap = snapshot_json();
        assert_eq!(
            snap.ids_with_prefix("nav_"),
            vec!["nav_buttons".to_string(), "nav_checkboxes".to_string()]
        );
    }

    #[test]
    fn event_cursor_range_query() {
        let mut snap = snapshot_json();
        let cursor = snap.event_cursor();
        assert!(snap.events_since(cursor).is_empty());
        snap.events.push("Theme: mode changed to Dark".into());
        let new = snap.events_since(cursor);
        assert_eq!(new.len(), 1);
        assert!(new[0].contains("mode changed"));
    }

    #[test]
    fn missing_top_level_keys_default_empty() {
        let snap: TelemetrySnapshot = serde_json::from_str("{}").unwrap();
        assert!(snap.elements.is_empty());
        assert!(snap.states.is_empty());
        assert!(snap.events.is_empty());
    }
}
