use tuckaway_core::ipc::{Command, ResponseStatus};
use tuckaway_core::pid;
use tuckaway_windows::{ipc, process};

pub fn execute() {
    if ipc::is_daemon_running() {
        println!("Tuckaway is running.");
        match ipc::send_command(&Command::Status) {
            Ok(response) if response.status == ResponseStatus::Ok => {
                if let Some(report) = response.message {
                    for line in report.lines() {
                        println!("  {line}");
                    }
                }
            }
            Ok(response) => eprintln!(
                "Error: {}",
                response.message.unwrap_or_else(|| "unknown error".into())
            ),
            Err(e) => eprintln!("IPC failed: {e}"),
        }
        return;
    }

    // Pipe isn't responding; check if a stale PID file was left behind
    // by a daemon that was killed without a clean shutdown.
    if let Ok(Some(pid)) = pid::read_pid_file() {
        if process::is_process_alive(pid) {
            println!("Tuckaway process exists (PID: {pid}) but is not responding.");
        } else {
            let _ = pid::remove_pid_file();
            println!("Tuckaway is not running (cleaned up stale PID file).");
        }
    } else {
        println!("Tuckaway is not running.");
    }
}
