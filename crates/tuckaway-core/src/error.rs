use thiserror::Error;

/// Everything that can go wrong between the controller, the injected
/// hook library, and the shared state block.
#[derive(Debug, Error)]
pub enum Error {
    /// The named shared block could not be created, opened, or mapped.
    #[error("shared state unavailable: {0}")]
    StoreUnavailable(String),

    /// The OS refused the system-wide hook, or the hook library could
    /// not be loaded.
    #[error("could not install the message hook: {0}")]
    HookInstallFailed(String),

    /// A recorded window handle no longer refers to a live window.
    #[error("window 0x{0:X} no longer exists")]
    WindowGone(usize),

    /// The monitored application is not running.
    #[error("{0} is not running")]
    ProcessNotFound(String),

    /// The configured target executable name cannot be published.
    #[error("invalid target executable name: {0}")]
    InvalidTarget(String),

    /// A Win32 call failed.
    #[error("{0}")]
    Os(String),

    /// The daemon pipe or its JSON payload failed.
    #[error("ipc: {0}")]
    Ipc(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used across the Tuckaway crates.
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Ipc(e.to_string())
    }
}
