use tuckaway_core::target::{ProcessNames, TargetWindow};

use windows::Win32::UI::WindowsAndMessaging::{
    GW_OWNER, GetWindow, GetWindowThreadProcessId, IsWindowVisible,
};

use crate::process;
use crate::window::Window;

/// Process names read from the live system.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageNames;

impl ProcessNames for ImageNames {
    fn image_name(&self, pid: u32) -> Option<String> {
        process::image_name(pid)
    }
}

impl TargetWindow for Window {
    fn process_id(&self) -> Option<u32> {
        let mut pid = 0u32;
        // SAFETY: GetWindowThreadProcessId writes the owning PID into a
        // local we own; a stale handle yields 0.
        unsafe { GetWindowThreadProcessId(self.hwnd(), Some(&mut pid)) };
        (pid != 0).then_some(pid)
    }

    fn has_owner(&self) -> bool {
        // SAFETY: GetWindow is a read-only query.
        unsafe { GetWindow(self.hwnd(), GW_OWNER) }.is_ok_and(|owner| !owner.is_invalid())
    }

    fn is_visible(&self) -> bool {
        // SAFETY: IsWindowVisible is a read-only query.
        unsafe { IsWindowVisible(self.hwnd()).as_bool() }
    }
}
