//! The process-wide observation point and its attach policy.

use crate::interception::messages::{WM_CLOSE, WM_SHOWWINDOW};
use crate::target::{self, ProcessNames, TargetMatcher, TargetWindow};
use crate::{Result, SharedState};

/// A place from which window messages of a foreign process can be
/// observed. On Windows this is a `WH_CALLWNDPROC` hook living in a DLL
/// that the OS maps into every GUI process.
pub trait ObservationPoint {
    /// Activates the observation for `target_exe`. Installing twice is a
    /// no-op success.
    fn install(&mut self, target_exe: &str) -> Result<()>;

    /// Deactivates it. A no-op if nothing is installed.
    fn uninstall(&mut self) -> Result<()>;
}

/// Observed messages that may trigger attaching the interception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookTrigger {
    /// The window is asked to close.
    Close,
    /// The window is being shown (`WM_SHOWWINDOW` with `wParam = TRUE`).
    Shown,
}

impl HookTrigger {
    pub fn classify(message: u32, wparam: usize) -> Option<Self> {
        match message {
            WM_CLOSE => Some(Self::Close),
            WM_SHOWWINDOW if wparam != 0 => Some(Self::Shown),
            _ => None,
        }
    }
}

/// Whether a window that just produced a [`HookTrigger`] should get the
/// interception: nothing is attached yet, and the window is the
/// published target's main window.
pub fn should_attach(
    state: &SharedState,
    matcher: &mut TargetMatcher,
    window: &impl TargetWindow,
    names: &impl ProcessNames,
) -> bool {
    if state.is_attached() {
        return false;
    }
    matcher.retarget(&state.target_exe());
    matcher.belongs_to_monitored_app(window, names) && target::is_main_window(window)
}

/// Holds the handle of an installed hook and makes installation
/// idempotent.
#[derive(Debug)]
pub struct HookSlot<H> {
    handle: Option<H>,
}

impl<H> Default for HookSlot<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> HookSlot<H> {
    pub const fn new() -> Self {
        Self { handle: None }
    }

    pub fn is_installed(&self) -> bool {
        self.handle.is_some()
    }

    /// Runs `install` only if the slot is empty.
    ///
    /// Returns `Ok(true)` when a hook was installed by this call and
    /// `Ok(false)` when one was already in place. A failed install
    /// leaves the slot empty.
    pub fn install_with(&mut self, install: impl FnOnce() -> Result<H>) -> Result<bool> {
        if self.handle.is_some() {
            return Ok(false);
        }
        self.handle = Some(install()?);
        Ok(true)
    }

    /// Empties the slot, returning the handle to unhook.
    pub fn take(&mut self) -> Option<H> {
        self.handle.take()
    }
}
