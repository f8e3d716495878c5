use std::sync::mpsc;

use tuckaway_core::ipc::{Command, Response};
use tuckaway_core::presence::PresenceChange;

/// Internal message type for the main daemon thread.
pub(super) enum DaemonMsg {
    /// The monitored application started or exited.
    Presence(PresenceChange),
    /// A CLI command with a callback to send the response.
    Command(Command, ResponseSender),
    /// Ctrl+C or Ctrl+Break on the daemon's console.
    Interrupted,
}

/// Sends a response back to the IPC thread for the connected client.
pub(super) type ResponseSender = mpsc::Sender<Response>;
