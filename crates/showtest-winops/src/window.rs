//! Native window enumeration, discovery, and manipulation.
//!
//! The harness only ever talks to the OS through [`WindowSystem`]; the
//! discovery policy itself is platform-neutral and unit-testable.

use std::time::Duration;

use crate::{
    geom::{Point, Rect},
    wait::await_condition,
};

/// Opaque native window identifier (HWND on Windows).
pub type WindowId = u64;

/// One visible top-level window as reported by the platform.
#[derive(Debug, Clone)]
pub struct WindowInfo {
    /// Native handle.
    pub id: WindowId,
    /// Owning process id.
    pub pid: u32,
    /// Lowercased basename of the owning executable, when resolvable.
    pub exe: Option<String>,
    /// Window title (may be empty).
    pub title: String,
}

/// Outer rectangle and client-area origin for a window, in screen pixels.
#[derive(Debug, Clone, Copy)]
pub struct WindowBounds {
    /// Outer window rectangle including decorations.
    pub outer: Rect,
    /// Screen position of the client area's (0, 0).
    pub client_origin: Point,
}

/// Platform operations the harness needs from the OS.
pub trait WindowSystem {
    /// Enumerate currently visible top-level windows.
    fn list_windows(&self) -> Vec<WindowInfo>;

    /// Query the outer rect and client origin for a window.
    fn bounds(&self, id: WindowId) -> Option<WindowBounds>;

    /// Restore the window if minimized and bring it to a normal state.
    fn restore(&mut self, id: WindowId) -> bool;

    /// Resize the window so its *client area* is `width` x `height` pixels.
    fn resize_client(&mut self, id: WindowId, width: u32, height: u32) -> bool;

    /// Bring the window to the foreground. Best-effort.
    fn set_foreground(&mut self, id: WindowId) -> bool;
}

/// How to pick the application window out of the enumeration.
#[derive(Debug, Clone, Default)]
pub struct DiscoverySpec {
    /// Exact owning-process match; strongest signal.
    pub pid: Option<u32>,
    /// Owning-executable basename match (lowercased), e.g. "showcase.exe".
    pub process_name: Option<String>,
    /// Title substring match; weakest signal.
    pub title_substring: Option<String>,
}

/// Executables that commonly own stray visible windows on test machines;
/// never candidates even when a title happens to match.
const EXCLUDED_HOST_EXES: &[&str] = &["code.exe", "powershell.exe", "python.exe", "cmd.exe"];

fn is_excluded(win: &WindowInfo) -> bool {
    win.exe
        .as_deref()
        .is_some_and(|exe| EXCLUDED_HOST_EXES.contains(&exe))
}

/// Locate the application window.
///
/// Matching priority: exact pid, then owning-executable name, then title
/// substring. A pid match is accepted even with an empty title (engine
/// windows often take a moment to set one).
pub fn discover(ws: &dyn WindowSystem, spec: &DiscoverySpec) -> Option<WindowInfo> {
    let windows: Vec<WindowInfo> = ws
        .list_windows()
        .into_iter()
        .filter(|w| !is_excluded(w))
        .collect();

    if let Some(pid) = spec.pid {
        if let Some(w) = windows.iter().find(|w| w.pid == pid) {
            return Some(w.clone());
        }
    }

    if let Some(name) = spec.process_name.as_deref() {
        let want = name.to_ascii_lowercase();
        if let Some(w) = windows
            .iter()
            .find(|w| w.exe.as_deref() == Some(want.as_str()))
        {
            return Some(w.clone());
        }
    }

    if let Some(fragment) = spec.title_substring.as_deref() {
        if let Some(w) = windows
            .iter()
            .find(|w| !w.title.is_empty() && w.title.contains(fragment))
        {
            return Some(w.clone());
        }
    }

    None
}

/// Poll for the application window until it is discoverable.
pub fn wait_for_window(
    ws: &dyn WindowSystem,
    spec: &DiscoverySpec,
    timeout: Duration,
    poll_interval: Duration,
) -> Option<WindowInfo> {
    await_condition(timeout, poll_interval, || discover(ws, spec)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSystem {
        windows: Vec<WindowInfo>,
    }

    impl WindowSystem for FakeSystem {
        fn list_windows(&self) -> Vec<WindowInfo> {
            self.windows.clone()
        }
        fn bounds(&self, _id: WindowId) -> Option<WindowBounds> {
            None
        }
        fn restore(&mut self, _id: WindowId) -> bool {
            true
        }
        fn resize_client(&mut self, _id: WindowId, _width: u32, _height: u32) -> bool {
            true
        }
        fn set_foreground(&mut self, _id: WindowId) -> bool {
            true
        }
    }

    fn win(id: WindowId, pid: u32, exe: &str, title: &str) -> WindowInfo {
        WindowInfo {
            id,
            pid,
            exe: Some(exe.to_string()),
            title: title.to_string(),
        }
    }

    #[test]
    fn pid_match_beats_name_and_title() {
        let ws = FakeSystem {
            windows: vec![
                win(1, 100, "other.exe", "Showcase"),
                win(2, 200, "showcase.exe", ""),
            ],
        };
        let spec = DiscoverySpec {
            pid: Some(200),
            process_name: Some("other.exe".into()),
            title_substring: Some("Showcase".into()),
        };
        assert_eq!(discover(&ws, &spec).unwrap().id, 2);
    }

    #[test]
    fn falls_back_to_exe_then_title() {
        let ws = FakeSystem {
            windows: vec![
                win(1, 100, "unrelated.exe", "Some Editor"),
                win(2, 200, "showcase.exe", "Showcase Demo"),
            ],
        };
        let by_exe = DiscoverySpec {
            pid: Some(999),
            process_name: Some("showcase.exe".into()),
            title_substring: None,
        };
        assert_eq!(discover(&ws, &by_exe).unwrap().id, 2);

        let by_title = DiscoverySpec {
            pid: None,
            process_name: Some("missing.exe".into()),
            title_substring: Some("Showcase".into()),
        };
        assert_eq!(discover(&ws, &by_title).unwrap().id, 2);
    }

    #[test]
    fn excluded_hosts_never_match() {
        let ws = FakeSystem {
            windows: vec![win(1, 100, "powershell.exe", "Showcase Demo")],
        };
        let spec = DiscoverySpec {
            pid: Some(100),
            process_name: None,
            title_substring: Some("Showcase".into()),
        };
        assert!(discover(&ws, &spec).is_none());
    }

    #[test]
    fn empty_title_never_matches_substring() {
        let ws = FakeSystem {
            windows: vec![win(1, 100, "showcase.exe", "")],
        };
        let spec = DiscoverySpec {
            pid: None,
            process_name: None,
            title_substring: Some("".into()),
        };
        assert!(discover(&ws, &spec).is_none());
    }
}
