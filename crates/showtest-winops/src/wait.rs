//! Bounded-wait primitive shared by every polling call site.

use std::{
    thread,
    time::{Duration, Instant},
};

use thiserror::Error;

/// A condition did not become true within its deadline.
#[derive(Debug, Error)]
#[error("condition not met within {waited:?}")]
pub struct Timeout {
    /// How long we actually waited.
    pub waited: Duration,
}

/// Poll `condition` until it yields a value or `timeout` elapses.
///
/// The condition is checked once immediately, so a zero timeout still gets
/// one evaluation. Sleeps are clamped to the remaining time.
pub fn await_condition<T, F>(timeout: Duration, poll_interval: Duration, mut condition: F) -> Result<T, Timeout>
where
    F: FnMut() -> Option<T>,
{
    let start = Instant::now();
    let deadline = start + timeout;

    loop {
        if let Some(v) = condition() {
            return Ok(v);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(Timeout {
                waited: start.elapsed(),
            });
        }

        if poll_interval.is_zero() {
            thread::yield_now();
        } else {
            let remaining = deadline - now;
            thread::sleep(poll_interval.min(remaining));
        }
    }
}

/// Retry `operation` up to `max_attempts` times with a fixed delay between
/// attempts. Returns the first `Some` produced.
pub fn retry_with_delay<T, F>(mut operation: F, max_attempts: u32, delay: Duration) -> Option<T>
where
    F: FnMut() -> Option<T>,
{
    for attempt in 0..max_attempts {
        if let Some(v) = operation() {
            return Some(v);
        }
        if attempt + 1 < max_attempts && !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    None
}
