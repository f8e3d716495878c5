use tuckaway_core::ipc::{Command, ResponseStatus};
use tuckaway_core::pid;
use tuckaway_windows::{ipc, process};

pub fn execute() {
    // Try graceful shutdown via IPC first, so the hook is uninstalled.
    if ipc::is_daemon_running() {
        match ipc::send_command(&Command::Stop) {
            Ok(response) if response.status == ResponseStatus::Ok => {
                println!("Tuckaway stopped.");
                let _ = pid::remove_pid_file();
                return;
            }
            Ok(response) => {
                super::fail(response.message.unwrap_or_else(|| "unknown error".into()));
            }
            Err(e) => eprintln!("IPC failed: {e}"),
        }
    }

    // Fallback: the pipe is gone but the process may still be alive.
    // Killing it drops the hook with it; the OS unhooks on exit.
    match pid::read_pid_file() {
        Ok(Some(pid)) if process::is_process_alive(pid) => {
            if process::kill_process(pid) {
                let _ = pid::remove_pid_file();
                println!("Tuckaway stopped (killed PID {pid}).");
            } else {
                super::fail(format!("failed to kill process {pid}."));
            }
        }
        _ => {
            println!("Tuckaway is not running.");
        }
    }
}
