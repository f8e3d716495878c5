use tuckaway_core::{Error, Rect, Result};

use windows::Win32::Foundation::{ERROR_SUCCESS, GetLastError, HWND, RECT, SetLastError};
use windows::Win32::UI::WindowsAndMessaging::{
    BringWindowToTop, GWL_EXSTYLE, GetWindowLongPtrW, GetWindowRect, IsWindow, IsWindowVisible,
    SW_RESTORE, SW_SHOW, SWP_FRAMECHANGED, SWP_NOACTIVATE, SWP_NOSIZE, SWP_NOZORDER,
    SetForegroundWindow, SetWindowLongPtrW, SetWindowPos, ShowWindow,
};

use crate::OsResultExt;

/// A window on the Windows platform, wrapping a Win32 `HWND`.
///
/// `HWND` is an opaque handle: a number that identifies a window to the
/// OS. The struct holds that handle and queries the OS on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    hwnd: HWND,
}

impl Window {
    /// Creates a new `Window` from a raw `HWND`.
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }

    /// Creates a new `Window` from a raw handle value (pointer-sized integer).
    ///
    /// This allows callers to construct a `Window` without depending on the
    /// `windows` crate directly.
    pub fn from_raw(handle: usize) -> Self {
        Self {
            hwnd: HWND(handle as *mut _),
        }
    }

    /// Returns the raw window handle.
    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }

    /// Whether the handle still refers to an existing window.
    pub fn exists(&self) -> bool {
        // SAFETY: IsWindow accepts any handle value, stale ones included.
        unsafe { IsWindow(Some(self.hwnd)).as_bool() }
    }
}

impl tuckaway_core::Window for Window {
    fn id(&self) -> usize {
        self.hwnd.0 as usize
    }

    fn rect(&self) -> Result<Rect> {
        let mut rect = RECT::default();
        // SAFETY: GetWindowRect writes into the RECT we own.
        unsafe { GetWindowRect(self.hwnd, &mut rect) }.or_os("GetWindowRect")?;
        Ok(Rect::from_edges(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn set_rect(&self, rect: &Rect) -> Result<()> {
        // SAFETY: SetWindowPos with a valid HWND is safe.
        unsafe {
            SetWindowPos(
                self.hwnd,
                None,
                rect.x,
                rect.y,
                rect.width,
                rect.height,
                SWP_NOZORDER | SWP_NOACTIVATE | SWP_FRAMECHANGED,
            )
        }
        .or_os("SetWindowPos")
    }

    fn move_to(&self, x: i32, y: i32) -> Result<()> {
        // SWP_FRAMECHANGED makes the shell re-read the extended style, so
        // a taskbar button disappears together with the move.
        //
        // SAFETY: SetWindowPos with a valid HWND is safe.
        unsafe {
            SetWindowPos(
                self.hwnd,
                None,
                x,
                y,
                0,
                0,
                SWP_NOSIZE | SWP_NOZORDER | SWP_NOACTIVATE | SWP_FRAMECHANGED,
            )
        }
        .or_os("SetWindowPos")
    }

    fn ex_style(&self) -> u32 {
        // SAFETY: reading a window long has no side effects.
        unsafe { GetWindowLongPtrW(self.hwnd, GWL_EXSTYLE) as u32 }
    }

    fn set_ex_style(&self, ex_style: u32) -> Result<()> {
        // SetWindowLongPtrW returns the previous value, so 0 is only an
        // error when the last-error code says so.
        //
        // SAFETY: both calls only touch this thread's last-error value
        // and the window's extended style.
        unsafe {
            SetLastError(ERROR_SUCCESS);
            let previous = SetWindowLongPtrW(self.hwnd, GWL_EXSTYLE, ex_style as isize);
            if previous == 0 && GetLastError() != ERROR_SUCCESS {
                return Err(Error::Os(format!(
                    "SetWindowLongPtrW failed for window 0x{:X}",
                    self.hwnd.0 as usize
                )));
            }
        }
        Ok(())
    }

    fn is_visible(&self) -> bool {
        // SAFETY: IsWindowVisible is a read-only query.
        unsafe { IsWindowVisible(self.hwnd).as_bool() }
    }

    fn reveal(&self) {
        // SAFETY: all four calls take a window handle and tolerate a
        // window that disappeared in the meantime. Focus stealing may be
        // refused by the OS; that only leaves the window behind others.
        unsafe {
            let _ = ShowWindow(self.hwnd, SW_SHOW);
            let _ = ShowWindow(self.hwnd, SW_RESTORE);
            let _ = SetForegroundWindow(self.hwnd);
            let _ = BringWindowToTop(self.hwnd);
        }
    }
}
