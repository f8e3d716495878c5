use tuckaway_core::config::TargetConfig;
use tuckaway_core::{Desktop, Error, Result};

use windows::Win32::UI::Shell::ShellExecuteW;
use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;
use windows::core::{HSTRING, PCWSTR, w};

use crate::process;
use crate::window::Window;

/// The live desktop as the restore protocol sees it.
#[derive(Debug, Clone)]
pub struct Win32Desktop {
    target_exe: String,
    launch_uri: String,
}

impl Win32Desktop {
    pub fn new(target: &TargetConfig) -> Self {
        Self {
            target_exe: target.executable.clone(),
            launch_uri: target.launch_uri.clone(),
        }
    }
}

impl Desktop for Win32Desktop {
    type Window = Window;

    fn window(&self, id: usize) -> Option<Window> {
        let window = Window::from_raw(id);
        window.exists().then_some(window)
    }

    fn target_exe(&self) -> &str {
        &self.target_exe
    }

    fn is_target_running(&self) -> bool {
        process::find_process_id(&self.target_exe).is_some()
    }

    fn launch_target(&self) -> Result<()> {
        shell_open(&self.launch_uri)
    }
}

/// Opens a URI or path through the shell, as if the user had run it.
pub fn shell_open(target: &str) -> Result<()> {
    let file = HSTRING::from(target);

    // SAFETY: all strings outlive the call; no owner window.
    let result = unsafe {
        ShellExecuteW(
            None,
            w!("open"),
            &file,
            PCWSTR::null(),
            PCWSTR::null(),
            SW_SHOWNORMAL,
        )
    };

    // ShellExecuteW reports success with a value greater than 32.
    let code = result.0 as isize;
    if code <= 32 {
        return Err(Error::Os(format!("ShellExecuteW failed for {target} (code {code})")));
    }
    Ok(())
}
