//! The library the OS maps into every GUI process once the hook is
//! installed.
//!
//! Only thin C-ABI exports live here; the hook itself is in
//! `tuckaway_windows::hook`. No export lets a panic cross the boundary.

#![allow(non_snake_case)]

use std::ffi::c_void;
use std::panic;

use tuckaway_windows::hook;

use windows::Win32::Foundation::{HMODULE, HWND, RECT};
use windows::Win32::System::LibraryLoader::DisableThreadLibraryCalls;
use windows::Win32::System::SystemServices::{DLL_PROCESS_ATTACH, DLL_PROCESS_DETACH};
use windows::core::{BOOL, PCWSTR};

#[unsafe(no_mangle)]
pub extern "system" fn DllMain(module: HMODULE, reason: u32, reserved: *mut c_void) -> BOOL {
    let _ = panic::catch_unwind(|| match reason {
        DLL_PROCESS_ATTACH => {
            // SAFETY: the module handle is our own; thread notifications
            // are not used.
            unsafe {
                let _ = DisableThreadLibraryCalls(module);
            }
            hook::on_process_attach(module);
        }
        // A non-null `reserved` means the process is terminating.
        DLL_PROCESS_DETACH => hook::on_process_detach(!reserved.is_null()),
        _ => {}
    });
    BOOL(1)
}

/// Installs the hook for the executable named by `target_exe`.
///
/// `module` is this library's handle as seen by the caller; null means
/// "use the handle recorded at load".
///
/// # Safety
///
/// `target_exe` must be null or point to a NUL-terminated UTF-16 string.
#[unsafe(no_mangle)]
pub unsafe extern "system" fn InstallHook(module: HMODULE, target_exe: PCWSTR) -> BOOL {
    if target_exe.is_null() {
        return BOOL(0);
    }
    // SAFETY: upheld by the caller.
    let Ok(target) = (unsafe { target_exe.to_string() }) else {
        return BOOL(0);
    };
    let installed = panic::catch_unwind(|| hook::install(module, &target).is_ok());
    installed.unwrap_or(false).into()
}

/// Removes the hook. FALSE when nothing was installed.
#[unsafe(no_mangle)]
pub extern "system" fn UninstallHook() -> BOOL {
    panic::catch_unwind(hook::uninstall).unwrap_or(false).into()
}

/// The concealed window, or null.
#[unsafe(no_mangle)]
pub extern "system" fn GetHiddenWindow() -> HWND {
    panic::catch_unwind(hook::hidden_window)
        .ok()
        .flatten()
        .unwrap_or_default()
}

#[unsafe(no_mangle)]
pub extern "system" fn ClearHiddenWindow() {
    let _ = panic::catch_unwind(hook::clear_hidden_window);
}

/// Forgets attach and hide records whose window no longer exists. TRUE
/// if any was dropped.
#[unsafe(no_mangle)]
pub extern "system" fn ReleaseMissingWindows() -> BOOL {
    panic::catch_unwind(hook::release_missing_windows)
        .unwrap_or(false)
        .into()
}

/// Writes the saved pre-conceal rectangle to `rect`. FALSE if none was
/// captured or `rect` is null.
///
/// # Safety
///
/// `rect` must be null or valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "system" fn GetOriginalRect(rect: *mut RECT) -> BOOL {
    if rect.is_null() {
        return BOOL(0);
    }
    let Some(saved) = panic::catch_unwind(hook::original_rect).ok().flatten() else {
        return BOOL(0);
    };
    // SAFETY: non-null and valid for writes, upheld by the caller.
    unsafe {
        rect.write(RECT {
            left: saved.x,
            top: saved.y,
            right: saved.right(),
            bottom: saved.bottom(),
        });
    }
    BOOL(1)
}

#[unsafe(no_mangle)]
pub extern "system" fn GetOriginalExStyle() -> u32 {
    panic::catch_unwind(hook::original_ex_style).unwrap_or(0)
}
