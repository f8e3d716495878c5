//! Controller-side restore protocol.

use crate::{Error, Rect, Result, Window, log_info, log_warn};

/// Read/clear access to the hide record, as the controller sees it.
pub trait HiddenWindowStore {
    fn hidden_window(&self) -> Option<usize>;

    /// Forgets the hidden window without touching the window itself.
    fn clear_hidden_window(&self);

    /// The saved pre-hide rectangle, if one was captured.
    fn original_rect(&self) -> Option<Rect>;

    fn original_ex_style(&self) -> u32;
}

/// The desktop the controller acts on.
pub trait Desktop {
    type Window: Window;

    /// Looks up a live window by id. `None` if it no longer exists.
    fn window(&self, id: usize) -> Option<Self::Window>;

    /// Executable name of the monitored application.
    fn target_exe(&self) -> &str;

    /// Whether the monitored application has a running process.
    fn is_target_running(&self) -> bool;

    /// Starts the monitored application.
    fn launch_target(&self) -> Result<()>;
}

/// Whether the saved geometry and taskbar style are reapplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreMode {
    /// Put back the saved extended style and rectangle, then show.
    Geometry,
    /// Only show, un-minimize, and focus.
    ShowOnly,
}

/// How a restore request was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The tracked window was brought back.
    Restored { window: usize },
    /// The application runs but no window is tracked; the window is in
    /// some state Tuckaway did not produce and the user should open it
    /// by hand.
    Untracked,
    /// The application was not running and has been launched.
    Launched,
}

impl RestoreMode {
    pub fn from_config(reapply_geometry: bool) -> Self {
        if reapply_geometry {
            Self::Geometry
        } else {
            Self::ShowOnly
        }
    }
}

/// Brings the concealed window back, or falls back to probing and
/// launching the monitored application.
///
/// A recorded window that no longer exists is not an error: the stale
/// record is dropped and the protocol continues as if nothing had been
/// recorded. A target that is not running is launched.
pub fn restore<D: Desktop>(
    desktop: &D,
    store: &impl HiddenWindowStore,
    mode: RestoreMode,
) -> Result<RestoreOutcome> {
    if let Some(id) = store.hidden_window() {
        match reveal_tracked(desktop, store, id, mode) {
            Ok(()) => {
                log_info!("Restored window 0x{id:X}");
                return Ok(RestoreOutcome::Restored { window: id });
            }
            Err(Error::WindowGone(id)) => {
                log_warn!("Hidden window 0x{id:X} is gone, dropping the record");
                store.clear_hidden_window();
            }
            Err(e) => return Err(e),
        }
    }

    match probe_target(desktop) {
        Ok(()) => Ok(RestoreOutcome::Untracked),
        Err(Error::ProcessNotFound(_)) => {
            desktop.launch_target()?;
            log_info!("{} was not running, launched it", desktop.target_exe());
            Ok(RestoreOutcome::Launched)
        }
        Err(e) => Err(e),
    }
}

fn reveal_tracked<D: Desktop>(
    desktop: &D,
    store: &impl HiddenWindowStore,
    id: usize,
    mode: RestoreMode,
) -> Result<()> {
    let window = desktop.window(id).ok_or(Error::WindowGone(id))?;

    if mode == RestoreMode::Geometry {
        window.set_ex_style(store.original_ex_style())?;
        let saved = store
            .original_rect()
            .filter(|r| !r.is_empty() && !r.is_parked());
        if let Some(rect) = saved {
            window.set_rect(&rect)?;
        }
    }

    window.reveal();
    store.clear_hidden_window();
    Ok(())
}

fn probe_target<D: Desktop>(desktop: &D) -> Result<()> {
    if desktop.is_target_running() {
        Ok(())
    } else {
        Err(Error::ProcessNotFound(desktop.target_exe().to_string()))
    }
}
