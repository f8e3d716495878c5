use std::fmt;

use serde::{Deserialize, Serialize};

/// The named pipe path used for IPC between CLI and daemon.
pub const PIPE_NAME: &str = r"\\.\pipe\tuckaway";

/// A command sent from the CLI to the daemon.
///
/// These are serialized as JSON, one per line, over the named pipe.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Command {
    /// Uninstall the hook and exit.
    Stop,
    /// Report target and hidden-window state.
    Status,
}

/// A response sent from the daemon back to the CLI.
#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    /// Whether the command succeeded.
    pub status: ResponseStatus,
    /// Optional human-readable message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Status of a daemon response.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

impl Response {
    pub fn ok() -> Self {
        Self {
            status: ResponseStatus::Ok,
            message: None,
        }
    }

    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Ok,
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: Some(message.into()),
        }
    }
}

/// What the daemon reports for `Command::Status`. The hook is
/// installed for as long as the daemon answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonReport {
    pub target_exe: String,
    pub target_pid: Option<u32>,
    pub hidden_window: Option<usize>,
}

impl fmt::Display for DaemonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target_pid {
            Some(pid) => writeln!(f, "{}: running (pid {pid})", self.target_exe)?,
            None => writeln!(f, "{}: not running", self.target_exe)?,
        }
        match self.hidden_window {
            Some(window) => write!(f, "hidden window: 0x{window:X}"),
            None => write!(f, "hidden window: none"),
        }
    }
}
