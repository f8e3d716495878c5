//! Ctrl+C signal handler using `SetConsoleCtrlHandler`.

use std::sync::OnceLock;
use std::sync::mpsc::Sender;

use tuckaway_core::{Error, Result};

use windows::Win32::System::Console::{CTRL_BREAK_EVENT, CTRL_C_EVENT, SetConsoleCtrlHandler};
use windows::core::BOOL;

use crate::OsResultExt;

/// Global sender, written once by `set_handler` and read by the callback.
static SENDER: OnceLock<Sender<()>> = OnceLock::new();

/// Registers a Ctrl+C / Ctrl+Break handler that sends `()` on the given
/// channel. Only one handler may be registered per process.
pub fn set_handler(tx: Sender<()>) -> Result<()> {
    SENDER
        .set(tx)
        .map_err(|_| Error::Os("Ctrl+C handler already registered".into()))?;
    // SAFETY: `handler` is a valid HandlerRoutine for the process lifetime.
    unsafe { SetConsoleCtrlHandler(Some(handler), true) }.or_os("SetConsoleCtrlHandler")
}

unsafe extern "system" fn handler(ctrl_type: u32) -> BOOL {
    if (ctrl_type == CTRL_C_EVENT || ctrl_type == CTRL_BREAK_EVENT)
        && let Some(tx) = SENDER.get()
    {
        let _ = tx.send(());
    }
    BOOL(1)
}
