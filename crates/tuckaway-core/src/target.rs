//! Deciding whether a window is the monitored application's main window.

/// Maximum number of per-process verdicts kept by [`TargetMatcher`].
const VERDICT_CACHE_LEN: usize = 16;

/// What target identification needs to know about a window.
pub trait TargetWindow {
    /// Id of the process owning the window, if it can be resolved.
    fn process_id(&self) -> Option<u32>;

    /// Whether the window has an owner window (dialogs, tool palettes).
    fn has_owner(&self) -> bool;

    /// Returns whether the window is currently visible.
    fn is_visible(&self) -> bool;
}

/// Resolves a process id to its executable base name (e.g. `olk.exe`).
pub trait ProcessNames {
    /// Returns `None` if the process cannot be opened or read.
    fn image_name(&self, pid: u32) -> Option<String>;
}

/// Case-insensitive executable name comparison. An empty target never
/// matches.
pub fn exe_matches(name: &str, target: &str) -> bool {
    !target.is_empty() && name.eq_ignore_ascii_case(target)
}

/// True iff the window has no owner and is visible.
pub fn is_main_window(window: &impl TargetWindow) -> bool {
    !window.has_owner() && window.is_visible()
}

/// Matches windows against the target executable, remembering verdicts
/// per process id so a process is not reopened for every message.
///
/// Only verdicts backed by a successfully read name are remembered; a
/// process that could not be inspected is rejected and asked again next
/// time.
#[derive(Debug, Default)]
pub struct TargetMatcher {
    target: String,
    verdicts: Vec<(u32, bool)>,
}

impl TargetMatcher {
    pub const fn new() -> Self {
        Self {
            target: String::new(),
            verdicts: Vec::new(),
        }
    }

    /// Switches to a new target name, dropping stale verdicts.
    pub fn retarget(&mut self, target: &str) {
        if self.target != target {
            self.target = target.to_string();
            self.verdicts.clear();
        }
    }

    /// Whether `window` belongs to a process running the target
    /// executable. Fails closed.
    pub fn belongs_to_monitored_app(
        &mut self,
        window: &impl TargetWindow,
        names: &impl ProcessNames,
    ) -> bool {
        let Some(pid) = window.process_id() else {
            return false;
        };
        if let Some(&(_, verdict)) = self.verdicts.iter().find(|(p, _)| *p == pid) {
            return verdict;
        }
        let Some(name) = names.image_name(pid) else {
            return false;
        };
        let verdict = exe_matches(&name, &self.target);
        if self.verdicts.len() == VERDICT_CACHE_LEN {
            self.verdicts.remove(0);
        }
        self.verdicts.push((pid, verdict));
        verdict
    }
}
