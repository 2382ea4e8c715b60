//! Window session: discovery, viewport maintenance, resizing, focus.

use std::{thread, time::Duration};

use showtest_viewport::{FocusOps, Viewport};
use showtest_winops::{
    DiscoverySpec, ScreenCapture, WindowId, WindowSystem, wait_for_window,
};
use tracing::{debug, info};

use crate::{
    config::{self, WindowSize},
    error::{Error, Result},
};

/// Construct the platform window system.
#[cfg(target_os = "windows")]
pub fn window_system() -> Result<Box<dyn WindowSystem>> {
    Ok(Box::new(showtest_winops::win32::Win32WindowSystem))
}

/// Construct the platform window system.
#[cfg(not(target_os = "windows"))]
pub fn window_system() -> Result<Box<dyn WindowSystem>> {
    Err(Error::UnsupportedPlatform)
}

/// Construct the platform screen capturer, when one exists.
#[cfg(target_os = "windows")]
pub fn screen_capture() -> Option<Box<dyn ScreenCapture>> {
    Some(Box::new(showtest_winops::win32::GdiCapture))
}

/// Construct the platform screen capturer, when one exists.
#[cfg(not(target_os = "windows"))]
pub fn screen_capture() -> Option<Box<dyn ScreenCapture>> {
    None
}

/// The discovered app window plus its current viewport.
///
/// The viewport is refreshed only here, at the defined checkpoints:
/// discovery, resize, and focus re-assert.
pub struct WindowSession {
    /// Platform backend.
    system: Box<dyn WindowSystem>,
    /// Discovered window handle.
    window: WindowId,
    /// Current placement.
    viewport: Viewport,
}

impl WindowSession {
    /// Find the app window and establish the initial viewport.
    pub fn discover(pid: u32, timeout: Duration) -> Result<Self> {
        let mut system = window_system()?;
        let spec = DiscoverySpec {
            pid: Some(pid),
            process_name: Some("showcase.exe".to_string()),
            title_substring: Some("Showcase".to_string()),
        };
        let poll = config::ms(config::DEFAULTS.discovery_poll_ms);
        let found = wait_for_window(system.as_ref(), &spec, timeout, poll).ok_or(
            Error::WindowNotFound {
                timeout_ms: timeout.as_millis() as u64,
            },
        )?;
        info!(
            "found showcase window: '{}' (pid {})",
            if found.title.is_empty() {
                "<untitled>"
            } else {
                found.title.as_str()
            },
            found.pid
        );

        system.restore(found.id);
        system.set_foreground(found.id);
        thread::sleep(config::ms(config::WINDOW.resize_settle_ms));

        let viewport = Self::query_viewport(system.as_ref(), found.id)?;
        info!(
            "window rect: ({:.0}, {:.0}) {}x{}, client origin ({:.0}, {:.0})",
            viewport.outer().x,
            viewport.outer().y,
            viewport.outer().w,
            viewport.outer().h,
            viewport.client_origin().x,
            viewport.client_origin().y
        );
        Ok(Self {
            system,
            window: found.id,
            viewport,
        })
    }

    fn query_viewport(system: &dyn WindowSystem, id: WindowId) -> Result<Viewport> {
        let bounds = system.bounds(id).ok_or(Error::WindowNotFound {
            timeout_ms: 0,
        })?;
        Ok(Viewport::new(
            bounds.outer,
            bounds.client_origin,
            config::WINDOW.margin_px,
        ))
    }

    /// Current viewport snapshot.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Re-read window bounds into the viewport.
    pub fn refresh(&mut self) -> Result<Viewport> {
        self.viewport = Self::query_viewport(self.system.as_ref(), self.window)?;
        Ok(self.viewport)
    }

    /// Resize the client area and refresh the viewport.
    pub fn resize_client(&mut self, size: &WindowSize) -> Result<Viewport> {
        if !self.system.resize_client(self.window, size.width, size.height) {
            return Err(Error::ResizeFailed {
                width: size.width,
                height: size.height,
            });
        }
        thread::sleep(config::ms(config::WINDOW.resize_settle_ms));
        let viewport = self.refresh()?;
        info!(
            "resized client to {}x{} ({})",
            size.width, size.height, size.name
        );
        Ok(viewport)
    }
}

impl FocusOps for WindowSession {
    /// Keep the app window frontmost before input; window managers can
    /// silently steal focus between actions. Bounds are re-read afterwards
    /// in case the window moved.
    fn reassert_focus(&mut self) -> bool {
        let ok = self.system.set_foreground(self.window);
        if let Ok(vp) = Self::query_viewport(self.system.as_ref(), self.window) {
            self.viewport = vp;
        } else {
            debug!("focus refresh could not re-read window bounds");
        }
        ok
    }
}
