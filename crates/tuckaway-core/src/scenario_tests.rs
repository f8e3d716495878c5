//! End-to-end hide/restore scenarios, driven through the same pieces the
//! Windows layer wires into its hook and subclass procedures.

use std::rc::Rc;

use crate::conceal::{WS_EX_APPWINDOW, WS_EX_TOOLWINDOW, conceal};
use crate::hook::{HookTrigger, should_attach};
use crate::interception::messages::{WM_CLOSE, WM_DESTROY, WM_SHOWWINDOW};
use crate::rect::PARKED_COORD;
use crate::restore::{HiddenWindowStore, RestoreMode, RestoreOutcome, restore, Desktop};
use crate::testing::{FakeDesktop, FakeNames, FakeWindow, MemoryState};
use crate::{Interception, Rect, StateCell, TargetMatcher, Verdict, Window, WindowMessage};

const TARGET_PID: u32 = 4242;

/// One hooked process: its matcher, the process table, the desktop it
/// checks window liveness against, and the interception state of the
/// window it instrumented.
struct HookedProcess {
    matcher: TargetMatcher,
    names: FakeNames,
    desktop: Rc<FakeDesktop>,
    interception: Interception,
}

impl HookedProcess {
    fn new(desktop: &Rc<FakeDesktop>) -> Self {
        Self {
            matcher: TargetMatcher::new(),
            names: FakeNames::new(&[(TARGET_PID, "olk.exe"), (7, "notepad.exe")]),
            desktop: Rc::clone(desktop),
            interception: Interception::default(),
        }
    }

    /// What the hook procedure does with one observed message.
    fn observe(&mut self, window: &FakeWindow, state: &MemoryState, message: u32, wparam: usize) {
        if HookTrigger::classify(message, wparam).is_none() {
            return;
        }
        let desktop = &self.desktop;
        let snapshot = state.update(|s| {
            s.release_missing(|id| desktop.window(id).is_some());
            *s
        });
        if should_attach(&snapshot, &mut self.matcher, window, &self.names)
            && state.update(|s| s.try_attach(window.id()))
        {
            self.interception.attach();
        }
    }

    /// What the subclass procedure does; returns whether the message was
    /// swallowed.
    fn deliver(&mut self, window: &FakeWindow, state: &MemoryState, message: u32) -> bool {
        match self.interception.on_message(WindowMessage::classify(message)) {
            Verdict::Conceal => conceal(window, state).is_ok(),
            Verdict::Release => {
                state.update(|s| s.release_window(window.id()));
                false
            }
            Verdict::PassThrough => false,
        }
    }

    /// Hook first, then the window procedure, like the OS does.
    fn send(&mut self, window: &FakeWindow, state: &MemoryState, message: u32, wparam: usize) -> bool {
        self.observe(window, state, message, wparam);
        self.deliver(window, state, message)
    }
}

fn published_state() -> MemoryState {
    let state = MemoryState::default();
    state.update(|s| s.set_target_exe("olk.exe")).unwrap();
    state
}

fn main_window() -> FakeWindow {
    FakeWindow::new(0x5A0)
        .in_process(TARGET_PID)
        .with_rect(Rect::new(200, 100, 1400, 900))
        .with_ex_style(WS_EX_APPWINDOW)
}

/// A running desktop that knows about `windows`.
fn desktop_with(windows: &[&FakeWindow]) -> Rc<FakeDesktop> {
    let desktop = FakeDesktop::default().running();
    for window in windows {
        desktop.add((*window).clone());
    }
    Rc::new(desktop)
}

#[test]
fn close_of_main_window_is_swallowed_and_window_parked() {
    // Arrange
    let state = published_state();
    let window = main_window();
    let desktop = desktop_with(&[&window]);
    let mut process = HookedProcess::new(&desktop);

    // Act
    let swallowed = process.send(&window, &state, WM_CLOSE, 0);

    // Assert
    let snapshot = state.read();
    assert!(swallowed);
    assert_eq!(snapshot.hidden_window(), Some(0x5A0));
    assert_eq!(snapshot.original_bounds(), Rect::new(200, 100, 1400, 900));
    assert_eq!(snapshot.original_ex_style(), WS_EX_APPWINDOW);
    assert_eq!(window.ex_style(), WS_EX_TOOLWINDOW);
    assert_eq!(window.rect().unwrap().x, PARKED_COORD);
    assert!(window.is_visible());
}

#[test]
fn controller_reads_then_clears_hidden_window() {
    // Arrange
    let state = published_state();
    let window = main_window();
    let desktop = desktop_with(&[&window]);
    let mut process = HookedProcess::new(&desktop);
    process.send(&window, &state, WM_CLOSE, 0);

    // Act
    let seen = state.hidden_window();
    state.clear_hidden_window();

    // Assert
    assert_eq!(seen, Some(0x5A0));
    assert_eq!(state.hidden_window(), None);
}

#[test]
fn destroying_hidden_window_resets_tracking() {
    // Arrange
    let state = published_state();
    let window = main_window();
    let desktop = desktop_with(&[&window]);
    let mut process = HookedProcess::new(&desktop);
    process.send(&window, &state, WM_CLOSE, 0);

    // Act
    let swallowed = process.send(&window, &state, WM_DESTROY, 0);

    // Assert
    assert!(!swallowed);
    assert_eq!(state.read().hidden_window(), None);
    assert!(!state.read().is_attached());
    assert_eq!(process.interception, Interception::Detached);
}

#[test]
fn restore_without_record_launches_stopped_target() {
    // Arrange
    let state = published_state();
    let desktop = FakeDesktop::default();

    // Act
    let outcome = restore(&desktop, &state, RestoreMode::Geometry);

    // Assert
    assert_eq!(outcome.unwrap(), RestoreOutcome::Launched);
    assert_eq!(desktop.launches(), 1);
}

#[test]
fn only_first_shown_window_is_attached() {
    // Arrange
    let state = published_state();
    let first = main_window();
    let second = FakeWindow::new(0x6B0).in_process(TARGET_PID);
    let desktop = desktop_with(&[&first, &second]);
    let mut first_process = HookedProcess::new(&desktop);
    let mut second_process = HookedProcess::new(&desktop);

    // Act
    first_process.send(&first, &state, WM_SHOWWINDOW, 1);
    second_process.send(&second, &state, WM_SHOWWINDOW, 1);

    // Assert
    assert_eq!(state.read().attached_window(), Some(0x5A0));
    assert!(first_process.interception.is_attached());
    assert!(!second_process.interception.is_attached());
}

#[test]
fn windows_of_other_applications_are_never_touched() {
    // Arrange
    let state = published_state();
    let notepad = FakeWindow::new(0x700)
        .in_process(7)
        .with_rect(Rect::new(10, 10, 640, 480));
    let desktop = desktop_with(&[&notepad]);
    let mut process = HookedProcess::new(&desktop);

    // Act
    let swallowed = process.send(&notepad, &state, WM_CLOSE, 0);

    // Assert
    assert!(!swallowed);
    assert!(!state.read().is_attached());
    assert_eq!(notepad.rect().unwrap(), Rect::new(10, 10, 640, 480));
}

#[test]
fn hide_restore_hide_cycle_reparks_window() {
    // Arrange
    let state = published_state();
    let window = main_window();
    let desktop = desktop_with(&[&window]);
    let mut process = HookedProcess::new(&desktop);
    process.send(&window, &state, WM_CLOSE, 0);
    restore(&*desktop, &state, RestoreMode::Geometry).unwrap();

    // Act
    let swallowed = process.send(&window, &state, WM_CLOSE, 0);

    // Assert
    assert!(swallowed);
    assert_eq!(state.read().hidden_window(), Some(0x5A0));
    assert_eq!(state.read().original_bounds(), Rect::new(200, 100, 1400, 900));
}

#[test]
fn repeated_close_while_hidden_still_restores_original_placement() {
    // Arrange
    let state = published_state();
    let window = main_window();
    let desktop = desktop_with(&[&window]);
    let mut process = HookedProcess::new(&desktop);
    process.send(&window, &state, WM_CLOSE, 0);

    // Act
    let swallowed = process.send(&window, &state, WM_CLOSE, 0);
    let outcome = restore(&*desktop, &state, RestoreMode::Geometry);

    // Assert
    assert!(swallowed);
    assert_eq!(outcome.unwrap(), RestoreOutcome::Restored { window: 0x5A0 });
    assert_eq!(window.rect().unwrap(), Rect::new(200, 100, 1400, 900));
    assert_eq!(window.ex_style(), WS_EX_APPWINDOW);
    assert!(!window.was_destroyed());
}

#[test]
fn killed_target_does_not_block_its_next_instance() {
    // Arrange
    let state = published_state();
    let old = main_window();
    let new = FakeWindow::new(0x7C0).in_process(TARGET_PID);
    let desktop = desktop_with(&[&old, &new]);
    let mut old_process = HookedProcess::new(&desktop);
    old_process.send(&old, &state, WM_CLOSE, 0);
    old.destroy();

    // Act
    let mut new_process = HookedProcess::new(&desktop);
    new_process.send(&new, &state, WM_SHOWWINDOW, 1);

    // Assert
    let snapshot = state.read();
    assert_eq!(snapshot.attached_window(), Some(0x7C0));
    assert_eq!(snapshot.hidden_window(), None);
    assert!(new_process.interception.is_attached());
}

#[test]
fn reinstall_after_uninstall_attaches_a_new_window() {
    // Arrange
    let state = published_state();
    let first = main_window();
    let second = FakeWindow::new(0x6B0).in_process(TARGET_PID);
    let desktop = desktop_with(&[&first, &second]);
    HookedProcess::new(&desktop).send(&first, &state, WM_SHOWWINDOW, 1);
    state.update(|s| {
        s.reset_attach();
        let _ = s.set_target_exe("");
    });

    // Act
    state.update(|s| s.set_target_exe("olk.exe")).unwrap();
    let mut process = HookedProcess::new(&desktop);
    process.send(&second, &state, WM_SHOWWINDOW, 1);

    // Assert
    assert_eq!(state.read().attached_window(), Some(0x6B0));
    assert!(process.interception.is_attached());
}
