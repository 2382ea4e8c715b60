#![warn(missing_docs)]

//! Viewport reconciliation core for the showtest harness.
//!
//! Given a named UI element, a possibly-stale telemetry snapshot, and a
//! resizable/scrollable window, this crate computes a screen coordinate
//! guaranteed to land on that element — scrolling or dragging intervening
//! containers as needed and retrying while the UI settles — and gates all
//! synthetic input behind window-bounds validation.

pub mod dispatch;
pub mod reconciler;
pub mod viewport;
pub mod visibility;

pub use dispatch::{Dispatcher, FocusOps, NoFocus};
pub use reconciler::{
    ContainerSpec, ReconcileError, ReconcileState, ReconcileTuning, Reconciler,
};
pub use viewport::{BoundsViolation, Side, Viewport};
pub use visibility::{ClipDirection, ContainerVisibility, classify};
