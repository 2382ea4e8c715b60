#![warn(missing_docs)]

//! Geometry primitives, polling helpers, and native window/input operations
//! for the showtest harness.
//!
//! Everything OS-specific sits behind the [`window::WindowSystem`],
//! [`pointer::PointerOps`], and [`capture::ScreenCapture`] traits so the
//! harness core stays platform-neutral and unit-testable.

pub mod capture;
pub mod geom;
pub mod pointer;
pub mod wait;
pub mod window;

#[cfg(target_os = "windows")]
pub mod win32;

pub use capture::ScreenCapture;
pub use geom::{Point, Rect, clamp};
pub use pointer::{EnigoPointer, PointerOps};
pub use wait::{Timeout, await_condition, retry_with_delay};
pub use window::{
    DiscoverySpec, WindowBounds, WindowId, WindowInfo, WindowSystem, discover, wait_for_window,
};
