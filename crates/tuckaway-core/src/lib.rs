pub mod conceal;
pub mod config;
pub mod error;
pub mod hook;
pub mod interception;
pub mod ipc;
pub mod log;
pub mod pid;
pub mod presence;
pub mod rect;
pub mod restore;
pub mod shared;
pub mod target;
pub mod window;

#[cfg(test)]
mod scenario_tests;
#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use hook::{HookSlot, HookTrigger, ObservationPoint};
pub use interception::{Interception, Verdict, WindowMessage};
pub use ipc::{Command, PIPE_NAME, Response};
pub use rect::Rect;
pub use restore::{Desktop, HiddenWindowStore, RestoreMode, RestoreOutcome};
pub use shared::{SHARED_STATE_NAME, SharedState, StateCell};
pub use target::{ProcessNames, TargetMatcher, TargetWindow};
pub use window::Window;
