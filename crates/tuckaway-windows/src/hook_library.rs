use std::path::{Path, PathBuf};

use tuckaway_core::{
    Error, HiddenWindowStore, ObservationPoint, Rect, Result, log_debug, log_info,
};

use windows::Win32::Foundation::{FreeLibrary, HMODULE, HWND, RECT};
use windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};
use windows::core::{BOOL, HSTRING, PCSTR, PCWSTR, s};

use crate::shared_memory::SharedMapping;

/// File name of the injected library, expected next to the controller.
pub const HOOK_LIBRARY_NAME: &str = "tuckaway_hook.dll";

type InstallHookFn = unsafe extern "system" fn(HMODULE, PCWSTR) -> BOOL;
type UninstallHookFn = unsafe extern "system" fn() -> BOOL;
type GetHiddenWindowFn = unsafe extern "system" fn() -> HWND;
type ClearHiddenWindowFn = unsafe extern "system" fn();
type ReleaseMissingWindowsFn = unsafe extern "system" fn() -> BOOL;
type GetOriginalRectFn = unsafe extern "system" fn(*mut RECT) -> BOOL;
type GetOriginalExStyleFn = unsafe extern "system" fn() -> u32;

struct Exports {
    install: InstallHookFn,
    uninstall: UninstallHookFn,
    hidden_window: GetHiddenWindowFn,
    clear_hidden_window: ClearHiddenWindowFn,
    release_missing_windows: ReleaseMissingWindowsFn,
    original_rect: GetOriginalRectFn,
    original_ex_style: GetOriginalExStyleFn,
}

/// The hook library loaded into the controller process.
///
/// The controller installs the hook and reads the shared state only
/// through the library's exports, so both sides always agree on the
/// shared block's layout. The controller still holds its own mapping of
/// the block, so the block outlives every hooked process for as long as
/// the controller runs.
///
/// Dropping the value uninstalls a hook this process installed and
/// unloads the library.
pub struct HookLibrary {
    module: HMODULE,
    exports: Exports,
    _mapping: SharedMapping,
}

impl HookLibrary {
    /// Loads [`HOOK_LIBRARY_NAME`] from the directory of the running
    /// executable.
    pub fn load() -> Result<Self> {
        Self::load_from(&default_path()?)
    }

    /// Loads the hook library from `path` and resolves its exports.
    ///
    /// Fails with [`Error::StoreUnavailable`] if the shared block cannot
    /// be mapped and with [`Error::HookInstallFailed`] if the library
    /// cannot be loaded.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mapping = SharedMapping::acquire()?;

        // SAFETY: loading a library runs its DllMain, which only records
        // its module handle.
        let module = unsafe { LoadLibraryW(&HSTRING::from(path)) }
            .map_err(|e| Error::HookInstallFailed(format!("{}: {}", path.display(), e.message())))?;

        match resolve(module) {
            Ok(exports) => {
                log_debug!("Loaded hook library {}", path.display());
                Ok(Self {
                    module,
                    exports,
                    _mapping: mapping,
                })
            }
            Err(e) => {
                // SAFETY: nothing from the library is referenced yet.
                unsafe {
                    let _ = FreeLibrary(module);
                }
                Err(e)
            }
        }
    }

    /// Drops the attach and hide records of windows that no longer
    /// exist, e.g. after the target was killed. Returns whether anything
    /// was dropped.
    pub fn release_missing_windows(&self) -> bool {
        // SAFETY: no arguments.
        unsafe { (self.exports.release_missing_windows)() }.as_bool()
    }
}

fn default_path() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| Error::HookInstallFailed("executable has no parent directory".into()))?;
    Ok(dir.join(HOOK_LIBRARY_NAME))
}

fn resolve(module: HMODULE) -> Result<Exports> {
    // SAFETY: each symbol is declared in the hook library with exactly
    // the signature it is transmuted to.
    unsafe {
        Ok(Exports {
            install: symbol(module, s!("InstallHook"))?,
            uninstall: symbol(module, s!("UninstallHook"))?,
            hidden_window: symbol(module, s!("GetHiddenWindow"))?,
            clear_hidden_window: symbol(module, s!("ClearHiddenWindow"))?,
            release_missing_windows: symbol(module, s!("ReleaseMissingWindows"))?,
            original_rect: symbol(module, s!("GetOriginalRect"))?,
            original_ex_style: symbol(module, s!("GetOriginalExStyle"))?,
        })
    }
}

/// Looks up an export and reinterprets it as the function type `F`.
///
/// # Safety
///
/// `F` must be a function pointer type matching the export's signature.
unsafe fn symbol<F: Copy>(module: HMODULE, name: PCSTR) -> Result<F> {
    // SAFETY: GetProcAddress only reads the module's export table.
    let proc = unsafe { GetProcAddress(module, name) }.ok_or_else(|| {
        // SAFETY: `s!` literals are NUL-terminated ASCII.
        let name = unsafe { name.to_string() }.unwrap_or_default();
        Error::HookInstallFailed(format!("{HOOK_LIBRARY_NAME} does not export {name}"))
    })?;
    // SAFETY: upheld by the caller.
    Ok(unsafe { std::mem::transmute_copy(&proc) })
}

impl ObservationPoint for HookLibrary {
    fn install(&mut self, target_exe: &str) -> Result<()> {
        let target = HSTRING::from(target_exe);
        // SAFETY: a null module makes the library use its own handle;
        // `target` outlives the call.
        let installed =
            unsafe { (self.exports.install)(HMODULE::default(), PCWSTR(target.as_ptr())) };
        if !installed.as_bool() {
            return Err(Error::HookInstallFailed(format!(
                "the hook library refused to install for {target_exe}"
            )));
        }
        log_info!("Hook installed for {target_exe}");
        Ok(())
    }

    fn uninstall(&mut self) -> Result<()> {
        // SAFETY: no arguments; a no-op when nothing is installed.
        if unsafe { (self.exports.uninstall)() }.as_bool() {
            log_info!("Hook removed");
        }
        Ok(())
    }
}

impl HiddenWindowStore for HookLibrary {
    fn hidden_window(&self) -> Option<usize> {
        // SAFETY: no arguments; returns a plain handle value.
        let hwnd = unsafe { (self.exports.hidden_window)() };
        (!hwnd.is_invalid()).then_some(hwnd.0 as usize)
    }

    fn clear_hidden_window(&self) {
        // SAFETY: no arguments.
        unsafe { (self.exports.clear_hidden_window)() }
    }

    fn original_rect(&self) -> Option<Rect> {
        let mut rect = RECT::default();
        // SAFETY: the export writes into the RECT we own.
        let saved = unsafe { (self.exports.original_rect)(&mut rect) };
        saved
            .as_bool()
            .then(|| Rect::from_edges(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn original_ex_style(&self) -> u32 {
        // SAFETY: no arguments.
        unsafe { (self.exports.original_ex_style)() }
    }
}

impl Drop for HookLibrary {
    fn drop(&mut self) {
        let _ = self.uninstall();
        // SAFETY: the hook is gone and no export is called after this.
        unsafe {
            let _ = FreeLibrary(self.module);
        }
    }
}
