use std::os::windows::process::CommandExt;
use std::process::{Command, Stdio};

use tuckaway_core::{config, pid};
use tuckaway_windows::{ipc, process};

/// Windows process creation flags for launching a fully detached daemon.
///
/// `CREATE_NEW_PROCESS_GROUP` (0x200): the daemon gets its own process
/// group, so Ctrl+C in the CLI terminal won't kill it.
///
/// `CREATE_NO_WINDOW` (0x08000000): the daemon doesn't get a console
/// window and does not inherit the parent's console handles.
const DETACH_FLAGS: u32 = 0x08000000 | 0x00000200;

pub fn execute() {
    if ipc::is_daemon_running() {
        println!("Tuckaway is already running.");
        return;
    }

    // Clean up stale PID file from a previous unclean shutdown
    if let Ok(Some(pid)) = pid::read_pid_file() {
        if process::is_process_alive(pid) {
            println!("Tuckaway process exists (PID: {pid}) but is not responding.");
            return;
        }
        let _ = pid::remove_pid_file();
    }

    let exe = match std::env::current_exe() {
        Ok(exe) => exe,
        Err(e) => super::fail(format!("could not locate the tuckaway executable: {e}")),
    };

    // Re-run ourselves with the hidden `daemon` subcommand.
    let spawned = Command::new(exe)
        .arg("daemon")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .creation_flags(DETACH_FLAGS)
        .spawn();
    let mut child = match spawned {
        Ok(child) => child,
        Err(e) => super::fail(format!("failed to start daemon: {e}")),
    };

    let pid = child.id();

    // Detach: the daemon outlives the CLI process.
    let _ = child.try_wait();

    let target = config::load().target.executable;
    println!("Tuckaway started (PID: {pid}).");
    println!("Closing the main window of {target} now tucks it away.");
    println!("Run 'tuckaway restore' to bring it back.");
}
