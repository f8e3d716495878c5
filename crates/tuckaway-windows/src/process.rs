use tuckaway_core::target::exe_matches;

use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW, TH32CS_SNAPPROCESS,
};
use windows::Win32::System::ProcessStatus::GetModuleBaseNameW;
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_ACCESS_RIGHTS, PROCESS_QUERY_INFORMATION,
    PROCESS_QUERY_LIMITED_INFORMATION, PROCESS_TERMINATE, PROCESS_VM_READ, TerminateProcess,
};

/// Closes a process or snapshot handle on drop.
struct OwnedHandle(HANDLE);

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        // SAFETY: the guard owns this handle exclusively.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

fn open(pid: u32, access: PROCESS_ACCESS_RIGHTS) -> Option<OwnedHandle> {
    // SAFETY: OpenProcess attempts to open an existing process; the
    // returned handle is owned by the guard.
    unsafe { OpenProcess(access, false, pid) }.ok().map(OwnedHandle)
}

/// Checks whether a process with the given PID is still alive.
///
/// Uses `OpenProcess` with minimal access rights. If the handle can be
/// opened, the process exists. This is used to detect stale PID files
/// left behind when the daemon is killed without a clean shutdown.
pub fn is_process_alive(pid: u32) -> bool {
    open(pid, PROCESS_QUERY_LIMITED_INFORMATION).is_some()
}

/// Terminates the process with the given PID. Returns `true` on success.
pub fn kill_process(pid: u32) -> bool {
    let Some(process) = open(pid, PROCESS_TERMINATE) else {
        return false;
    };
    // SAFETY: the handle was opened with PROCESS_TERMINATE.
    unsafe { TerminateProcess(process.0, 1) }.is_ok()
}

/// Returns the base name of the main module of `pid` (e.g. `olk.exe`).
///
/// `None` when the process cannot be opened or its module list read,
/// which happens for protected and elevated processes.
pub fn image_name(pid: u32) -> Option<String> {
    let process = open(pid, PROCESS_QUERY_INFORMATION | PROCESS_VM_READ)?;
    let mut buffer = [0u16; 260];

    // SAFETY: GetModuleBaseNameW writes at most buffer.len() units.
    let length = unsafe { GetModuleBaseNameW(process.0, None, &mut buffer) } as usize;
    if length == 0 {
        return None;
    }
    Some(String::from_utf16_lossy(&buffer[..length]))
}

/// Finds a running process whose executable is named `exe`.
///
/// Walks a Toolhelp snapshot; the comparison ignores ASCII case.
pub fn find_process_id(exe: &str) -> Option<u32> {
    // SAFETY: the snapshot handle is owned by the guard below.
    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }.ok()?;
    let snapshot = OwnedHandle(snapshot);

    let mut entry = PROCESSENTRY32W {
        dwSize: size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };

    // SAFETY: entry.dwSize is initialised as both calls require.
    let mut more = unsafe { Process32FirstW(snapshot.0, &mut entry) }.is_ok();
    while more {
        let end = entry
            .szExeFile
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(entry.szExeFile.len());
        let name = String::from_utf16_lossy(&entry.szExeFile[..end]);
        if exe_matches(&name, exe) {
            return Some(entry.th32ProcessID);
        }
        // SAFETY: same snapshot and entry as above.
        more = unsafe { Process32NextW(snapshot.0, &mut entry) }.is_ok();
    }
    None
}
