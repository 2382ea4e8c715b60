//! Win32 implementations of the platform traits.
//!
//! Thin bindings only: enumeration, geometry queries, client-area resizing,
//! foreground handling, and a GDI screen grab. Policy lives above, in the
//! platform-neutral modules.

use image::RgbaImage;
use tracing::warn;
use windows::Win32::{
    Foundation::{BOOL, CloseHandle, HANDLE, HWND, LPARAM, POINT, RECT},
    Graphics::Gdi::{
        BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BitBlt, CreateCompatibleBitmap, CreateCompatibleDC,
        DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDC, GetDIBits, ReleaseDC, SRCCOPY, SelectObject,
    },
    System::Threading::{
        AttachThreadInput, GetCurrentThreadId, OpenProcess, PROCESS_NAME_WIN32,
        PROCESS_QUERY_LIMITED_INFORMATION, QueryFullProcessImageNameW,
    },
    UI::WindowsAndMessaging::{
        AdjustWindowRectEx, ClientToScreen, EnumWindows, GWL_EXSTYLE, GWL_STYLE,
        GetForegroundWindow, GetWindowLongW, GetWindowRect, GetWindowTextLengthW, GetWindowTextW,
        GetWindowThreadProcessId, IsIconic, IsWindowVisible, SW_RESTORE, SW_SHOWNORMAL,
        SWP_NOACTIVATE, SWP_NOMOVE, SWP_NOZORDER, SetForegroundWindow, SetWindowPos, ShowWindow,
        WINDOW_EX_STYLE, WINDOW_STYLE,
    },
};
use windows::core::PWSTR;

use crate::{
    capture::ScreenCapture,
    geom::{Point, Rect},
    window::{WindowBounds, WindowId, WindowInfo, WindowSystem},
};

/// Window system backed by user32.
#[derive(Debug, Default)]
pub struct Win32WindowSystem;

fn hwnd(id: WindowId) -> HWND {
    HWND(id as isize as *mut core::ffi::c_void)
}

fn window_title(h: HWND) -> String {
    let len = unsafe { GetWindowTextLengthW(h) };
    if len <= 0 {
        return String::new();
    }
    let mut buf = vec![0u16; (len + 1) as usize];
    let copied = unsafe { GetWindowTextW(h, &mut buf) };
    if copied <= 0 {
        return String::new();
    }
    String::from_utf16_lossy(&buf[..copied as usize])
}

fn window_pid(h: HWND) -> u32 {
    let mut pid = 0u32;
    unsafe { GetWindowThreadProcessId(h, Some(&mut pid)) };
    pid
}

/// Lowercased basename of the executable owning `pid`.
fn process_basename(pid: u32) -> Option<String> {
    let handle: HANDLE =
        unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) }.ok()?;
    let mut buf = vec![0u16; 260];
    let mut size = buf.len() as u32;
    let result = unsafe {
        QueryFullProcessImageNameW(handle, PROCESS_NAME_WIN32, PWSTR(buf.as_mut_ptr()), &mut size)
    };
    unsafe {
        let _ = CloseHandle(handle);
    }
    result.ok()?;
    let path = String::from_utf16_lossy(&buf[..size as usize]);
    path.rsplit(['\\', '/'])
        .next()
        .map(|name| name.to_ascii_lowercase())
}

unsafe extern "system" fn enum_callback(h: HWND, lparam: LPARAM) -> BOOL {
    let out = unsafe { &mut *(lparam.0 as *mut Vec<WindowInfo>) };
    if unsafe { IsWindowVisible(h) }.as_bool() {
        let pid = window_pid(h);
        // Keep empty titles too; pid filtering disambiguates.
        out.push(WindowInfo {
            id: h.0 as isize as u64,
            pid,
            exe: process_basename(pid),
            title: window_title(h),
        });
    }
    BOOL(1)
}

impl WindowSystem for Win32WindowSystem {
    fn list_windows(&self) -> Vec<WindowInfo> {
        let mut windows: Vec<WindowInfo> = Vec::new();
        let lparam = LPARAM(&mut windows as *mut Vec<WindowInfo> as isize);
        if unsafe { EnumWindows(Some(enum_callback), lparam) }.is_err() {
            warn!("EnumWindows failed");
        }
        windows
    }

    fn bounds(&self, id: WindowId) -> Option<WindowBounds> {
        let h = hwnd(id);
        let mut rect = RECT::default();
        unsafe { GetWindowRect(h, &mut rect) }.ok()?;
        let mut origin = POINT { x: 0, y: 0 };
        if !unsafe { ClientToScreen(h, &mut origin) }.as_bool() {
            return None;
        }
        Some(WindowBounds {
            outer: Rect::new(
                f64::from(rect.left),
                f64::from(rect.top),
                f64::from(rect.right - rect.left),
                f64::from(rect.bottom - rect.top),
            ),
            client_origin: Point::new(f64::from(origin.x), f64::from(origin.y)),
        })
    }

    fn restore(&mut self, id: WindowId) -> bool {
        let h = hwnd(id);
        if unsafe { IsIconic(h) }.as_bool() {
            unsafe { ShowWindow(h, SW_RESTORE) };
        } else {
            unsafe { ShowWindow(h, SW_SHOWNORMAL) };
        }
        true
    }

    fn resize_client(&mut self, id: WindowId, width: u32, height: u32) -> bool {
        let h = hwnd(id);
        let style = WINDOW_STYLE(unsafe { GetWindowLongW(h, GWL_STYLE) } as u32);
        let ex_style = WINDOW_EX_STYLE(unsafe { GetWindowLongW(h, GWL_EXSTYLE) } as u32);

        // Grow the requested client size by the decoration extents.
        let mut rect = RECT {
            left: 0,
            top: 0,
            right: width as i32,
            bottom: height as i32,
        };
        if unsafe { AdjustWindowRectEx(&mut rect, style, false, ex_style) }.is_err() {
            return false;
        }
        let outer_w = rect.right - rect.left;
        let outer_h = rect.bottom - rect.top;

        // Make sure we are in a resizable "normal" state first.
        unsafe { ShowWindow(h, SW_SHOWNORMAL) };
        unsafe {
            SetWindowPos(
                h,
                HWND::default(),
                0,
                0,
                outer_w,
                outer_h,
                SWP_NOZORDER | SWP_NOACTIVATE | SWP_NOMOVE,
            )
        }
        .is_ok()
    }

    fn set_foreground(&mut self, id: WindowId) -> bool {
        let h = hwnd(id);
        let foreground = unsafe { GetForegroundWindow() };
        let fg_tid = if foreground.is_invalid() {
            0
        } else {
            unsafe { GetWindowThreadProcessId(foreground, None) }
        };
        let target_tid = unsafe { GetWindowThreadProcessId(h, None) };
        let our_tid = unsafe { GetCurrentThreadId() };

        // Attach input queues so the OS permits the foreground change.
        let attach = fg_tid != 0 && target_tid != 0 && fg_tid != target_tid;
        if attach {
            unsafe {
                let _ = AttachThreadInput(fg_tid, target_tid, true);
                let _ = AttachThreadInput(our_tid, target_tid, true);
            }
        }
        let ok = unsafe { SetForegroundWindow(h) }.as_bool();
        if attach {
            unsafe {
                let _ = AttachThreadInput(fg_tid, target_tid, false);
                let _ = AttachThreadInput(our_tid, target_tid, false);
            }
        }
        ok
    }
}

/// GDI-based screen grabber.
#[derive(Debug, Default)]
pub struct GdiCapture;

impl ScreenCapture for GdiCapture {
    fn capture_rect(&mut self, rect: Rect) -> Option<RgbaImage> {
        let x = rect.x.round() as i32;
        let y = rect.y.round() as i32;
        let w = rect.w.round() as i32;
        let h = rect.h.round() as i32;
        if w <= 0 || h <= 0 {
            return None;
        }

        unsafe {
            let screen_dc = GetDC(HWND::default());
            if screen_dc.is_invalid() {
                return None;
            }
            let mem_dc = CreateCompatibleDC(screen_dc);
            let bitmap = CreateCompatibleBitmap(screen_dc, w, h);
            let old = SelectObject(mem_dc, bitmap);

            let blitted = BitBlt(mem_dc, 0, 0, w, h, screen_dc, x, y, SRCCOPY).is_ok();

            let mut pixels = vec![0u8; (w as usize) * (h as usize) * 4];
            let mut info = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: w,
                    // Negative height requests a top-down DIB.
                    biHeight: -h,
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };
            let rows = GetDIBits(
                mem_dc,
                bitmap,
                0,
                h as u32,
                Some(pixels.as_mut_ptr().cast()),
                &mut info,
                DIB_RGB_COLORS,
            );

            SelectObject(mem_dc, old);
            let _ = DeleteObject(bitmap);
            let _ = DeleteDC(mem_dc);
            ReleaseDC(HWND::default(), screen_dc);

            if !blitted || rows == 0 {
                return None;
            }

            // GDI hands back BGRA; swizzle in place and force opaque alpha.
            for px in pixels.chunks_exact_mut(4) {
                px.swap(0, 2);
                px[3] = 0xff;
            }
            RgbaImage::from_raw(w as u32, h as u32, pixels)
        }
    }
}
