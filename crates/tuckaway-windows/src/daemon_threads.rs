use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tuckaway_core::presence::PresenceTracker;

use crate::process;

use super::daemon_ipc;
use super::daemon_types::DaemonMsg;

/// Spawns the IPC listener thread.
pub(super) fn spawn_ipc_listener(tx: mpsc::Sender<DaemonMsg>) -> thread::JoinHandle<()> {
    thread::spawn(move || daemon_ipc::ipc_loop(tx))
}

/// Spawns the presence monitor: probes for `target_exe` every `interval`
/// and reports starts and exits until `running` is cleared.
pub(super) fn spawn_presence_monitor(
    target_exe: String,
    interval: Duration,
    tx: mpsc::Sender<DaemonMsg>,
    running: Arc<AtomicBool>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut tracker = PresenceTracker::new();
        while running.load(Ordering::Relaxed) {
            if let Some(change) = tracker.observe(process::find_process_id(&target_exe))
                && tx.send(DaemonMsg::Presence(change)).is_err()
            {
                break;
            }
            thread::sleep(interval);
        }
    })
}

/// Bridges Ctrl+C signals into the daemon message channel.
pub(super) fn spawn_interrupt_bridge(
    ctrl_rx: mpsc::Receiver<()>,
    tx: mpsc::Sender<DaemonMsg>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        if ctrl_rx.recv().is_ok() {
            let _ = tx.send(DaemonMsg::Interrupted);
        }
    })
}
