//! The per-window interception, installed as a comctl32 window subclass
//! on the monitored application's main window.
//!
//! The subclass reference data is a boxed [`Interception`] owned by the
//! subclass: created in [`attach`], freed when the window is destroyed.

use std::panic::{self, AssertUnwindSafe};

use tuckaway_core::conceal;
use tuckaway_core::{Interception, SharedState, StateCell, Verdict, Window as _, WindowMessage};

use windows::Win32::Foundation::{HMODULE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::{
    GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS, GET_MODULE_HANDLE_EX_FLAG_PIN, GetModuleHandleExW,
};
use windows::Win32::UI::Shell::{
    DefSubclassProc, GetWindowSubclass, RemoveWindowSubclass, SetWindowSubclass,
};
use windows::core::PCWSTR;

use crate::shared_memory::SharedMapping;
use crate::window::Window;

const SUBCLASS_ID: usize = 0x7475_636B;

/// Instruments `hwnd`. Returns `true` if the window carries the
/// interception afterwards, including when it already did.
pub(crate) fn attach(hwnd: HWND) -> bool {
    if is_attached(hwnd) {
        return true;
    }
    pin_module();

    let mut interception = Interception::default();
    interception.attach();
    let data = Box::into_raw(Box::new(interception));

    // SAFETY: subclass_proc matches SUBCLASSPROC and `data` stays valid
    // until the subclass frees it on destroy.
    let attached =
        unsafe { SetWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID, data as usize) }
            .as_bool();
    if !attached {
        // SAFETY: the subclass was not installed, so we still own `data`.
        drop(unsafe { Box::from_raw(data) });
    }
    attached
}

/// Whether `hwnd` already carries our subclass, e.g. from before the
/// hook was reinstalled.
fn is_attached(hwnd: HWND) -> bool {
    let mut data = 0usize;
    // SAFETY: read-only query of the window's subclass chain.
    unsafe { GetWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID, Some(&mut data)) }.as_bool()
}

/// Keeps the library mapped for the rest of the process lifetime.
///
/// The subclass procedure lives in this library; unloading it while a
/// window still points at it would crash the host on the next message.
fn pin_module() {
    let mut module = HMODULE::default();
    // SAFETY: FROM_ADDRESS resolves the module containing the given
    // address; PIN adds a reference that is never released.
    unsafe {
        let _ = GetModuleHandleExW(
            GET_MODULE_HANDLE_EX_FLAG_FROM_ADDRESS | GET_MODULE_HANDLE_EX_FLAG_PIN,
            PCWSTR(subclass_proc as usize as *const u16),
            &mut module,
        );
    }
}

unsafe extern "system" fn subclass_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
    _id: usize,
    data: usize,
) -> LRESULT {
    let interception = data as *mut Interception;

    // SAFETY: `data` is the box handed over in `attach`; it is freed only
    // on the Release verdict below, after which the subclass is gone.
    let verdict = panic::catch_unwind(AssertUnwindSafe(|| unsafe {
        (*interception).on_message(WindowMessage::classify(msg))
    }))
    .unwrap_or(Verdict::PassThrough);

    match verdict {
        Verdict::Conceal if conceal_window(hwnd) => return LRESULT(0),
        Verdict::Release => release(hwnd, interception),
        _ => {}
    }

    // SAFETY: forwarding to the next procedure in the subclass chain.
    unsafe { DefSubclassProc(hwnd, msg, wparam, lparam) }
}

/// Runs the conceal sequence. `false` lets the close go through.
fn conceal_window(hwnd: HWND) -> bool {
    panic::catch_unwind(|| {
        let Ok(mapping) = SharedMapping::acquire() else {
            return false;
        };
        // No published target means no controller to restore the window.
        if mapping.read().target_exe().is_empty() {
            return false;
        }
        conceal::conceal(&Window::new(hwnd), &mapping).is_ok()
    })
    .unwrap_or(false)
}

fn release(hwnd: HWND, interception: *mut Interception) {
    let id = Window::new(hwnd).id();
    let _ = panic::catch_unwind(|| {
        if let Ok(mapping) = SharedMapping::acquire() {
            mapping.update(|s: &mut SharedState| s.release_window(id));
        }
    });

    // SAFETY: removing our own subclass, then freeing the box it owned.
    // No further message reaches subclass_proc for this window.
    unsafe {
        let _ = RemoveWindowSubclass(hwnd, Some(subclass_proc), SUBCLASS_ID);
        drop(Box::from_raw(interception));
    }
}
