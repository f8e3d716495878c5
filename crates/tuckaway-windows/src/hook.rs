//! The system-wide `WH_CALLWNDPROC` hook.
//!
//! The OS maps the hook library into every GUI process of the desktop and
//! calls [`call_wnd_proc`] before each sent message is delivered. For the
//! monitored application's main window the hook attaches the subclass
//! from [`crate::subclass`]; everything else is only passed along.
//!
//! The functions below back the C exports of the `tuckaway-hook` library.

use std::panic;

use tuckaway_core::hook::should_attach;
use tuckaway_core::{Error, HookTrigger, Rect, Result, SharedState, StateCell, Window as _};

use windows::Win32::Foundation::{HINSTANCE, HMODULE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CWPSTRUCT, CallNextHookEx, HC_ACTION, HHOOK, SetWindowsHookExW, UnhookWindowsHookEx,
    WH_CALLWNDPROC,
};

use crate::context::{self, ProcessContext};
use crate::subclass;
use crate::target::ImageNames;
use crate::window::Window;

/// Records the library's module handle. Called from `DllMain`.
pub fn on_process_attach(module: HMODULE) {
    context::with(|ctx| ctx.module = module.0 as usize);
}

/// Tears down the per-process context. Called from `DllMain`.
///
/// When the whole process is terminating the OS reclaims everything, and
/// other threads may have died holding the lock, so nothing is done.
pub fn on_process_detach(process_terminating: bool) {
    if process_terminating {
        return;
    }
    uninstall();
    context::with(|ctx| ctx.mapping = None);
}

/// Installs the hook for `target_exe` from `module`, the hook library's
/// own handle. A null `module` falls back to the handle recorded at
/// process attach.
///
/// Returns `Ok(false)` if the hook was already installed by this
/// process. The target name is published in the shared state before the
/// hook goes live, so no hooked process ever sees a hook without one.
pub fn install(module: HMODULE, target_exe: &str) -> Result<bool> {
    context::with(|ctx| {
        let ProcessContext {
            module: own_module,
            hook,
            mapping,
            matcher,
        } = ctx;
        if hook.is_installed() {
            return Ok(false);
        }

        let mapping = context::mapping(mapping)?;
        mapping.update(|s| s.set_target_exe(target_exe))?;
        matcher.retarget(target_exe);

        let module = if module.is_invalid() {
            HINSTANCE(*own_module as *mut _)
        } else {
            HINSTANCE(module.0)
        };
        hook.install_with(|| {
            // SAFETY: call_wnd_proc lives in `module`, which the OS maps
            // into every process it injects the hook into. Thread id 0
            // means all threads of the desktop.
            let handle =
                unsafe { SetWindowsHookExW(WH_CALLWNDPROC, Some(call_wnd_proc), Some(module), 0) }
                    .map_err(|e| Error::HookInstallFailed(e.message()))?;
            Ok(handle.0 as isize)
        })
    })
}

/// Removes the hook and clears the attach record.
///
/// The target name is withdrawn too, so a window that is still
/// subclassed closes normally while no controller is around. Returns
/// `false` if this process had no hook installed.
pub fn uninstall() -> bool {
    let Some(handle) = context::with(|ctx| ctx.hook.take()) else {
        return false;
    };

    // SAFETY: `handle` came from SetWindowsHookExW and was removed from
    // the slot, so it is unhooked exactly once.
    unsafe {
        let _ = UnhookWindowsHookEx(HHOOK(handle as *mut _));
    }

    context::with(|ctx| {
        if let Ok(mapping) = context::mapping(&mut ctx.mapping) {
            mapping.update(|s| {
                s.reset_attach();
                let _ = s.set_target_exe("");
            });
        }
    });
    true
}

/// The window currently concealed, if any.
pub fn hidden_window() -> Option<HWND> {
    let state = read_state()?;
    state
        .hidden_window()
        .map(|id| Window::from_raw(id).hwnd())
}

/// Forgets the concealed window without touching it.
pub fn clear_hidden_window() {
    context::with(|ctx| {
        if let Ok(mapping) = context::mapping(&mut ctx.mapping) {
            mapping.update(SharedState::clear_hidden_window);
        }
    });
}

/// The rectangle saved before the last conceal, if one was captured.
pub fn original_rect() -> Option<Rect> {
    let bounds = read_state()?.original_bounds();
    (!bounds.is_empty()).then_some(bounds)
}

/// The extended style saved before the last conceal.
pub fn original_ex_style() -> u32 {
    read_state().map_or(0, |s| s.original_ex_style())
}

/// Drops the attach and hide records of windows that no longer exist.
/// Returns whether anything was dropped.
pub fn release_missing_windows() -> bool {
    context::with(|ctx| {
        context::mapping(&mut ctx.mapping)
            .is_ok_and(|mapping| mapping.update(|s| s.release_missing(window_exists)))
    })
}

fn window_exists(id: usize) -> bool {
    Window::from_raw(id).exists()
}

fn read_state() -> Option<SharedState> {
    context::with(|ctx| context::mapping(&mut ctx.mapping).ok().map(StateCell::read))
}

/// The hook procedure. Never unwinds and always chains.
unsafe extern "system" fn call_wnd_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code == HC_ACTION as i32 {
        // SAFETY: for HC_ACTION, lparam points at the CWPSTRUCT of the
        // message about to be delivered.
        let message = unsafe { &*(lparam.0 as *const CWPSTRUCT) };
        let (hwnd, msg, msg_wparam) = (message.hwnd, message.message, message.wParam);
        let _ = panic::catch_unwind(|| observe(hwnd, msg, msg_wparam));
    }

    // SAFETY: passing the untouched arguments down the hook chain.
    unsafe { CallNextHookEx(None, code, wparam, lparam) }
}

fn observe(hwnd: HWND, message: u32, wparam: WPARAM) {
    if HookTrigger::classify(message, wparam.0).is_none() {
        return;
    }
    let window = Window::new(hwnd);

    let claimed = context::with(|ctx| {
        let Ok(mapping) = context::mapping(&mut ctx.mapping) else {
            return false;
        };
        // A killed target leaves its window id behind in the attach slot.
        let state = mapping.update(|s| {
            s.release_missing(window_exists);
            *s
        });
        should_attach(&state, &mut ctx.matcher, &window, &ImageNames)
            && mapping.update(|s| s.try_attach(window.id()))
    });

    // Attaching runs outside the lock: installing a subclass may send
    // messages to the window, which re-enter this hook.
    if claimed && !subclass::attach(hwnd) {
        context::with(|ctx| {
            if let Ok(mapping) = context::mapping(&mut ctx.mapping) {
                mapping.update(|s| s.detach(window.id()));
            }
        });
    }
}
