use tuckaway_core::restore::{self, RestoreMode, RestoreOutcome};
use tuckaway_core::{config, log};
use tuckaway_windows::{HookLibrary, Win32Desktop, dpi};

/// Brings the tucked-away window back.
///
/// Runs in the CLI process rather than the daemon: Windows only lets the
/// process the user is interacting with move a window to the foreground.
pub fn execute() {
    let config = config::load();
    log::init(&config.logging);
    dpi::enable_dpi_awareness();

    let library = match HookLibrary::load() {
        Ok(library) => library,
        Err(e) => super::fail(e),
    };
    let desktop = Win32Desktop::new(&config.target);
    let mode = RestoreMode::from_config(config.restore.reapply_geometry);
    let target = &config.target.executable;

    match restore::restore(&desktop, &library, mode) {
        Ok(RestoreOutcome::Restored { window }) => {
            println!("Restored window 0x{window:X}.");
        }
        Ok(RestoreOutcome::Untracked) => {
            println!("{target} is running, but no window of it is tucked away.");
            println!("Open it from its taskbar button or notification area icon.");
        }
        Ok(RestoreOutcome::Launched) => {
            println!("{target} was not running; launched it.");
        }
        Err(e) => super::fail(e),
    }
}
