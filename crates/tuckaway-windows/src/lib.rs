use tuckaway_core::{Error, Result};

/// Per-process globals of the injected library.
mod context;

/// Ctrl+C handling for the daemon.
pub mod ctrl_c;

/// Daemon main loop.
pub mod daemon;

/// The controller's view of the desktop: window lookup and launching.
pub mod desktop;

/// Process DPI awareness.
pub mod dpi;

/// The `WH_CALLWNDPROC` hook that runs inside every GUI process.
pub mod hook;

/// Controller-side handle on the injected library.
pub mod hook_library;

/// IPC via Named Pipes.
pub mod ipc;

/// Process utilities (alive check, lookup by name, termination).
pub mod process;

/// The named file mapping backing the shared state block.
pub mod shared_memory;

/// Window subclass that turns a close into a conceal.
mod subclass;

/// Target identification backed by Win32 process queries.
pub mod target;

/// Window type wrapping a Win32 `HWND`.
pub mod window;

pub use desktop::Win32Desktop;
pub use hook_library::HookLibrary;
pub use shared_memory::SharedMapping;
pub use window::Window;

/// Converts `windows` crate errors into [`Error::Os`], naming the call
/// that failed.
pub(crate) trait OsResultExt<T> {
    fn or_os(self, call: &str) -> Result<T>;
}

impl<T> OsResultExt<T> for windows::core::Result<T> {
    fn or_os(self, call: &str) -> Result<T> {
        self.map_err(|e| Error::Os(format!("{call}: {}", e.message())))
    }
}
