//! Element bounds resolution over live telemetry.

use std::time::Duration;

use showtest_winops::await_condition;

use crate::{
    model::{ElementSnapshot, StateKey, TelemetrySnapshot},
    reader::TelemetryReader,
};

/// Maps element ids to their last-known boxes, with blocking variants that
/// absorb UI-settling latency after an action.
#[derive(Debug, Clone)]
pub struct BoundsResolver {
    /// Underlying race-tolerant reader.
    reader: TelemetryReader,
    /// Poll cadence for the blocking variants.
    poll_interval: Duration,
}

impl BoundsResolver {
    /// Resolver over `reader`, polling at 50 ms in the waiting variants.
    pub fn new(reader: TelemetryReader) -> Self {
        Self {
            reader,
            poll_interval: Duration::from_millis(50),
        }
    }

    /// Current full snapshot, if any usable data exists.
    pub fn snapshot(&self) -> Option<TelemetrySnapshot> {
        self.reader.read()
    }

    /// Look up `id` in the freshest snapshot. `None` = "not yet rendered";
    /// callers decide whether that is skippable or fatal.
    pub fn resolve(&self, id: &str) -> Option<ElementSnapshot> {
        self.snapshot()?.element(id).cloned()
    }

    /// Block until `id` appears, up to `timeout`.
    pub fn wait_for(&self, id: &str, timeout: Duration) -> Option<ElementSnapshot> {
        await_condition(timeout, self.poll_interval, || self.resolve(id)).ok()
    }

    /// Current value of a typed state key.
    pub fn state(&self, key: StateKey) -> Option<String> {
        self.snapshot()?.state(key).map(str::to_string)
    }

    /// Numeric state value; missing/unparsable reads as 0.0.
    pub fn state_f64(&self, key: StateKey) -> f64 {
        self.snapshot().map(|s| s.state_f64(key)).unwrap_or(0.0)
    }

    /// Block until `key` equals `expected`, up to `timeout`.
    pub fn wait_for_state(&self, key: StateKey, expected: &str, timeout: Duration) -> bool {
        self.wait_for_state_raw(key.as_str(), expected, timeout)
    }

    /// Raw-keyed state lookup for keys without a [`StateKey`] name.
    pub fn state_raw(&self, key: &str) -> Option<String> {
        self.snapshot()?.state_raw(key).map(str::to_string)
    }

    /// Raw-keyed variant of [`Self::wait_for_state`].
    pub fn wait_for_state_raw(&self, key: &str, expected: &str, timeout: Duration) -> bool {
        await_condition(timeout, Duration::from_millis(100), || {
            (self.state_raw(key).as_deref() == Some(expected)).then_some(())
        })
        .is_ok()
    }

    /// Element ids with `prefix`, ordered by on-screen (y, x).
    pub fn ids_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.snapshot()
            .map(|s| s.ids_with_prefix(prefix))
            .unwrap_or_default()
    }
}

/// Anything that can map an element id to a bounding box.
///
/// The reconciler depends on this seam rather than on [`BoundsResolver`]
/// directly so tests can script element positions per attempt.
pub trait ElementSource {
    /// Look up the current bounds for `id`.
    fn element(&self, id: &str) -> Option<ElementSnapshot>;
}

impl ElementSource for BoundsResolver {
    fn element(&self, id: &str) -> Option<ElementSnapshot> {
        self.resolve(id)
    }
}
