//! The hide half of the round trip: park a window off-screen and out of
//! the taskbar while it stays in the shown state.
//!
//! The window is moved, not hidden with `SW_HIDE`: a hidden window stops
//! receiving the host application's own notification and toast
//! behaviour.

use crate::rect::PARKED_COORD;
use crate::{Result, StateCell, Window};

pub const WS_EX_TOOLWINDOW: u32 = 0x0000_0080;
pub const WS_EX_APPWINDOW: u32 = 0x0004_0000;

/// Extended style that keeps the window off the taskbar and Alt+Tab.
pub fn taskbar_hidden_style(ex_style: u32) -> u32 {
    (ex_style | WS_EX_TOOLWINDOW) & !WS_EX_APPWINDOW
}

/// Conceals `window` and records it in `state`.
///
/// Saves the current rectangle and extended style, strips the taskbar
/// bits, parks the window at the off-screen coordinate keeping its size,
/// then publishes it as the hidden window. If the move fails the style
/// is put back and the error returned, so the caller can let the close
/// request through instead.
///
/// A window that is already the hidden window is left as it is: its
/// saved record must keep describing where it was before the first hide.
pub fn conceal(window: &impl Window, state: &impl StateCell) -> Result<()> {
    if state.read().hidden_window() == Some(window.id()) {
        return Ok(());
    }

    let bounds = window.rect()?;
    let ex_style = window.ex_style();
    state.update(|s| s.save_original(bounds, ex_style));

    window.set_ex_style(taskbar_hidden_style(ex_style))?;
    if let Err(e) = window.move_to(PARKED_COORD, PARKED_COORD) {
        let _ = window.set_ex_style(ex_style);
        return Err(e);
    }

    state.update(|s| s.mark_hidden(window.id()));
    Ok(())
}
