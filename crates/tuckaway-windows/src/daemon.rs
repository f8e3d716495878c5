use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

use tuckaway_core::config::Config;
use tuckaway_core::ipc::{Command, DaemonReport, Response};
use tuckaway_core::presence::PresenceChange;
use tuckaway_core::{
    HiddenWindowStore, ObservationPoint, Result, log_error, log_info, log_warn, pid,
};

use crate::ctrl_c;
use crate::dpi;
use crate::hook_library::HookLibrary;

#[path = "daemon_ipc.rs"]
mod daemon_ipc;
#[path = "daemon_threads.rs"]
mod daemon_threads;
#[path = "daemon_types.rs"]
mod daemon_types;

use daemon_types::DaemonMsg;

/// Runs the Tuckaway daemon.
///
/// Loads the hook library and installs the hook for the configured
/// target, then starts background threads for the presence monitor, the
/// IPC listener, and Ctrl+C. The main thread owns the hook library and
/// answers commands until asked to stop.
pub fn run(config: &Config) -> Result<()> {
    dpi::enable_dpi_awareness();
    pid::write_pid_file()?;
    log_info!("Tuckaway daemon started (pid {})", std::process::id());

    let result = serve(config);
    if let Err(e) = &result {
        log_error!("Daemon failed: {e}");
    }

    let _ = pid::remove_pid_file();
    log_info!("Tuckaway daemon stopped");
    result
}

fn serve(config: &Config) -> Result<()> {
    let target_exe = config.target.executable.clone();
    let mut library = HookLibrary::load()?;
    library.install(&target_exe)?;

    let (tx, rx) = mpsc::channel::<DaemonMsg>();
    let (ctrl_tx, ctrl_rx) = mpsc::channel();
    match ctrl_c::set_handler(ctrl_tx) {
        Ok(()) => {
            daemon_threads::spawn_interrupt_bridge(ctrl_rx, tx.clone());
        }
        Err(e) => log_warn!("Ctrl+C handling unavailable: {e}"),
    }

    let running = Arc::new(AtomicBool::new(true));
    let interval = Duration::from_millis(config.monitor.poll_interval_ms);
    let monitor = daemon_threads::spawn_presence_monitor(
        target_exe.clone(),
        interval,
        tx.clone(),
        running.clone(),
    );
    daemon_threads::spawn_ipc_listener(tx);

    let mut target_pid = None;
    for msg in rx {
        match msg {
            DaemonMsg::Presence(change) => {
                target_pid = on_presence(&library, &target_exe, change);
            }
            DaemonMsg::Command(Command::Status, reply) => {
                let report = DaemonReport {
                    target_exe: target_exe.clone(),
                    target_pid,
                    hidden_window: library.hidden_window(),
                };
                let _ = reply.send(Response::ok_with_message(report.to_string()));
            }
            DaemonMsg::Command(Command::Stop, reply) => {
                log_info!("Stop requested over IPC");
                let _ = reply.send(Response::ok());
                break;
            }
            DaemonMsg::Interrupted => {
                log_info!("Interrupted");
                break;
            }
        }
    }

    running.store(false, Ordering::Relaxed);
    let _ = monitor.join();
    library.uninstall()
}

/// Tracks the target process. A target that is killed or crashes never
/// destroys its window cleanly, so every start and exit also drops the
/// records of windows that are gone.
fn on_presence(library: &HookLibrary, target_exe: &str, change: PresenceChange) -> Option<u32> {
    let target_pid = match change {
        PresenceChange::Appeared { pid } => {
            log_info!("{target_exe} is running (pid {pid})");
            Some(pid)
        }
        PresenceChange::Vanished { pid } => {
            log_info!("{target_exe} exited (pid {pid})");
            None
        }
    };
    if library.release_missing_windows() {
        log_warn!("Dropped records of windows that no longer exist");
    }
    target_pid
}
