//! The shared state block.
//!
//! One fixed-layout record, addressed by [`SHARED_STATE_NAME`], mapped
//! by the controller and by every process the hook library is loaded
//! into. There is no lock and no version field: each field has a single
//! logical writer at a time (the concealing hook writes the hide record,
//! the controller clears it on restore), and any layout change breaks
//! every concurrently running instance.
//!
//! A freshly created mapping is zero-filled, and the all-zero record is
//! the valid "nothing hidden, nothing attached, no target" state.

use crate::Rect;
use crate::error::{Error, Result};

/// Name of the OS file mapping holding [`SharedState`].
pub const SHARED_STATE_NAME: &str = "TuckawaySharedState";

/// Capacity, in UTF-16 units including the terminating NUL, of the
/// published target executable name.
pub const TARGET_EXE_CAPACITY: usize = 64;

/// The cross-process record.
///
/// Window ids are stored as `u64` so 32-bit and 64-bit builds agree on
/// the layout; handles only carry 32 significant bits anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct SharedState {
    hidden_window: u64,
    attached_window: u64,
    original_bounds: Rect,
    original_ex_style: u32,
    target_exe: [u16; TARGET_EXE_CAPACITY],
}

/// Access to a [`SharedState`] that lives somewhere else (a mapped view,
/// or a plain cell in tests).
pub trait StateCell {
    /// Returns a snapshot of the record.
    fn read(&self) -> SharedState;

    /// Runs `f` against the live record.
    fn update<R>(&self, f: impl FnOnce(&mut SharedState) -> R) -> R;
}

impl Default for SharedState {
    fn default() -> Self {
        Self {
            hidden_window: 0,
            attached_window: 0,
            original_bounds: Rect::default(),
            original_ex_style: 0,
            target_exe: [0; TARGET_EXE_CAPACITY],
        }
    }
}

impl SharedState {
    /// The window currently concealed, if any.
    pub fn hidden_window(&self) -> Option<usize> {
        (self.hidden_window != 0).then_some(self.hidden_window as usize)
    }

    /// The window currently carrying the close interception, if any.
    pub fn attached_window(&self) -> Option<usize> {
        (self.attached_window != 0).then_some(self.attached_window as usize)
    }

    pub fn is_attached(&self) -> bool {
        self.attached_window != 0
    }

    pub fn original_bounds(&self) -> Rect {
        self.original_bounds
    }

    pub fn original_ex_style(&self) -> u32 {
        self.original_ex_style
    }

    /// Records the pre-hide geometry and style of the window about to be
    /// concealed.
    pub fn save_original(&mut self, bounds: Rect, ex_style: u32) {
        self.original_bounds = bounds;
        self.original_ex_style = ex_style;
    }

    /// Publishes `window` as the concealed window.
    pub fn mark_hidden(&mut self, window: usize) {
        self.hidden_window = window as u64;
    }

    /// Forgets the concealed window without touching the window itself.
    pub fn clear_hidden_window(&mut self) {
        self.hidden_window = 0;
    }

    /// Claims the single attach slot for `window`.
    ///
    /// Returns `false` if another window (or this one) already holds it.
    pub fn try_attach(&mut self, window: usize) -> bool {
        if self.attached_window != 0 || window == 0 {
            return false;
        }
        self.attached_window = window as u64;
        true
    }

    /// Gives the attach slot back, but only if `window` holds it.
    pub fn detach(&mut self, window: usize) {
        if self.attached_window == window as u64 {
            self.attached_window = 0;
        }
    }

    /// Drops every record that refers to `window`. Called when the
    /// window is destroyed.
    pub fn release_window(&mut self, window: usize) {
        if self.hidden_window == window as u64 {
            self.hidden_window = 0;
        }
        self.detach(window);
    }

    /// Drops the records of every window `exists` reports gone.
    ///
    /// A target that is killed or crashes never processes `WM_DESTROY`,
    /// so its window would otherwise hold the attach slot until the next
    /// install. Returns whether anything was dropped.
    pub fn release_missing(&mut self, exists: impl Fn(usize) -> bool) -> bool {
        let mut released = false;
        for window in [self.attached_window(), self.hidden_window()].into_iter().flatten() {
            if !exists(window) {
                self.release_window(window);
                released = true;
            }
        }
        released
    }

    /// Empties the attach slot regardless of owner. Called on uninstall
    /// so the next install starts clean.
    pub fn reset_attach(&mut self) {
        self.attached_window = 0;
    }

    /// The published target executable name (empty if none).
    pub fn target_exe(&self) -> String {
        let len = self
            .target_exe
            .iter()
            .position(|&c| c == 0)
            .unwrap_or(TARGET_EXE_CAPACITY);
        String::from_utf16_lossy(&self.target_exe[..len])
    }

    /// Publishes the target executable name.
    ///
    /// Fails without modifying the record if the name is empty or does
    /// not fit with its terminating NUL.
    pub fn set_target_exe(&mut self, name: &str) -> Result<()> {
        let wide: Vec<u16> = name.encode_utf16().collect();
        if wide.is_empty() || wide.len() >= TARGET_EXE_CAPACITY {
            return Err(Error::InvalidTarget(name.to_string()));
        }
        self.target_exe = [0; TARGET_EXE_CAPACITY];
        self.target_exe[..wide.len()].copy_from_slice(&wide);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{offset_of, size_of};

    use super::*;

    #[test]
    fn layout_is_fixed() {
        assert_eq!(offset_of!(SharedState, hidden_window), 0);
        assert_eq!(offset_of!(SharedState, attached_window), 8);
        assert_eq!(offset_of!(SharedState, original_bounds), 16);
        assert_eq!(offset_of!(SharedState, original_ex_style), 32);
        assert_eq!(offset_of!(SharedState, target_exe), 36);
        assert_eq!(size_of::<SharedState>(), 168);
    }

    #[test]
    fn zeroed_record_tracks_nothing() {
        // Arrange / Act
        let state = SharedState::default();

        // Assert
        assert_eq!(state.hidden_window(), None);
        assert!(!state.is_attached());
        assert_eq!(state.target_exe(), "");
    }

    #[test]
    fn attach_slot_is_exclusive() {
        // Arrange
        let mut state = SharedState::default();

        // Act
        let first = state.try_attach(0x10);
        let second = state.try_attach(0x20);

        // Assert
        assert!(first);
        assert!(!second);
        assert_eq!(state.attached_window(), Some(0x10));
    }

    #[test]
    fn null_window_cannot_attach() {
        let mut state = SharedState::default();

        assert!(!state.try_attach(0));
        assert!(!state.is_attached());
    }

    #[test]
    fn detach_ignores_other_windows() {
        // Arrange
        let mut state = SharedState::default();
        state.try_attach(0x10);

        // Act
        state.detach(0x20);

        // Assert
        assert_eq!(state.attached_window(), Some(0x10));
    }

    #[test]
    fn release_window_clears_hidden_and_attached() {
        // Arrange
        let mut state = SharedState::default();
        state.try_attach(0x10);
        state.mark_hidden(0x10);

        // Act
        state.release_window(0x10);

        // Assert
        assert_eq!(state.hidden_window(), None);
        assert!(!state.is_attached());
    }

    #[test]
    fn release_window_keeps_records_of_other_windows() {
        // Arrange
        let mut state = SharedState::default();
        state.try_attach(0x10);
        state.mark_hidden(0x10);

        // Act
        state.release_window(0x99);

        // Assert
        assert_eq!(state.hidden_window(), Some(0x10));
        assert_eq!(state.attached_window(), Some(0x10));
    }

    #[test]
    fn reset_attach_frees_slot_for_a_new_window() {
        // Arrange
        let mut state = SharedState::default();
        state.try_attach(0x10);

        // Act
        state.reset_attach();

        // Assert
        assert!(!state.is_attached());
        assert!(state.try_attach(0x20));
        assert_eq!(state.attached_window(), Some(0x20));
    }

    #[test]
    fn records_of_vanished_windows_are_released() {
        // Arrange
        let mut state = SharedState::default();
        state.try_attach(0x10);
        state.mark_hidden(0x10);

        // Act
        let released = state.release_missing(|_| false);

        // Assert
        assert!(released);
        assert_eq!(state.hidden_window(), None);
        assert!(!state.is_attached());
    }

    #[test]
    fn records_of_live_windows_survive_release_missing() {
        let mut state = SharedState::default();
        state.try_attach(0x10);
        state.mark_hidden(0x10);

        let released = state.release_missing(|id| id == 0x10);

        assert!(!released);
        assert_eq!(state.hidden_window(), Some(0x10));
        assert_eq!(state.attached_window(), Some(0x10));
    }

    #[test]
    fn target_name_is_published() {
        // Arrange
        let mut state = SharedState::default();

        // Act
        state.set_target_exe("olk.exe").unwrap();

        // Assert
        assert_eq!(state.target_exe(), "olk.exe");
    }

    #[test]
    fn shorter_target_name_replaces_longer_one() {
        let mut state = SharedState::default();
        state.set_target_exe("thunderbird.exe").unwrap();

        state.set_target_exe("olk.exe").unwrap();

        assert_eq!(state.target_exe(), "olk.exe");
    }

    #[test]
    fn oversized_target_name_is_rejected() {
        // Arrange
        let mut state = SharedState::default();
        state.set_target_exe("olk.exe").unwrap();
        let long = "a".repeat(TARGET_EXE_CAPACITY);

        // Act
        let result = state.set_target_exe(&long);

        // Assert
        assert!(matches!(result, Err(Error::InvalidTarget(_))));
        assert_eq!(state.target_exe(), "olk.exe");
    }
}
