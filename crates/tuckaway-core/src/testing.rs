//! In-memory stand-ins for the desktop, used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::restore::{Desktop, HiddenWindowStore};
use crate::target::{ProcessNames, TargetWindow};
use crate::{Error, Rect, Result, SharedState, StateCell, Window};

#[derive(Debug, Default)]
struct WindowInner {
    id: usize,
    pid: Cell<Option<u32>>,
    owned: Cell<bool>,
    hidden: Cell<bool>,
    rect: Cell<Rect>,
    ex_style: Cell<u32>,
    fail_moves: Cell<bool>,
    revealed: Cell<bool>,
    destroyed: Cell<bool>,
}

/// A window whose clones share state, so a test can keep a handle while
/// the fake desktop hands out another.
#[derive(Debug, Clone, Default)]
pub struct FakeWindow {
    inner: Rc<WindowInner>,
}

impl FakeWindow {
    pub fn new(id: usize) -> Self {
        Self {
            inner: Rc::new(WindowInner {
                id,
                ..Default::default()
            }),
        }
    }

    pub fn in_process(self, pid: u32) -> Self {
        self.inner.pid.set(Some(pid));
        self
    }

    pub fn owned(self) -> Self {
        self.inner.owned.set(true);
        self
    }

    pub fn hidden(self) -> Self {
        self.inner.hidden.set(true);
        self
    }

    pub fn with_rect(self, rect: Rect) -> Self {
        self.inner.rect.set(rect);
        self
    }

    pub fn with_ex_style(self, ex_style: u32) -> Self {
        self.inner.ex_style.set(ex_style);
        self
    }

    pub fn failing_moves(self) -> Self {
        self.inner.fail_moves.set(true);
        self
    }

    pub fn destroy(&self) {
        self.inner.destroyed.set(true);
    }

    pub fn was_revealed(&self) -> bool {
        self.inner.revealed.get()
    }

    pub fn was_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }
}

impl Window for FakeWindow {
    fn id(&self) -> usize {
        self.inner.id
    }

    fn rect(&self) -> Result<Rect> {
        Ok(self.inner.rect.get())
    }

    fn set_rect(&self, rect: &Rect) -> Result<()> {
        self.inner.rect.set(*rect);
        Ok(())
    }

    fn move_to(&self, x: i32, y: i32) -> Result<()> {
        if self.inner.fail_moves.get() {
            return Err(Error::Os("SetWindowPos failed".into()));
        }
        let rect = self.inner.rect.get();
        self.inner.rect.set(Rect::new(x, y, rect.width, rect.height));
        Ok(())
    }

    fn ex_style(&self) -> u32 {
        self.inner.ex_style.get()
    }

    fn set_ex_style(&self, ex_style: u32) -> Result<()> {
        self.inner.ex_style.set(ex_style);
        Ok(())
    }

    fn is_visible(&self) -> bool {
        !self.inner.hidden.get()
    }

    fn reveal(&self) {
        self.inner.hidden.set(false);
        self.inner.revealed.set(true);
    }
}

impl TargetWindow for FakeWindow {
    fn process_id(&self) -> Option<u32> {
        self.inner.pid.get()
    }

    fn has_owner(&self) -> bool {
        self.inner.owned.get()
    }

    fn is_visible(&self) -> bool {
        !self.inner.hidden.get()
    }
}

/// Process table with a lookup counter.
#[derive(Debug, Default)]
pub struct FakeNames {
    names: RefCell<HashMap<u32, String>>,
    lookups: Cell<usize>,
}

impl FakeNames {
    pub fn new(entries: &[(u32, &str)]) -> Self {
        let names = entries
            .iter()
            .map(|(pid, name)| (*pid, (*name).to_string()))
            .collect();
        Self {
            names: RefCell::new(names),
            lookups: Cell::new(0),
        }
    }

    pub fn insert(&self, pid: u32, name: &str) {
        self.names.borrow_mut().insert(pid, name.to_string());
    }

    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl ProcessNames for FakeNames {
    fn image_name(&self, pid: u32) -> Option<String> {
        self.lookups.set(self.lookups.get() + 1);
        self.names.borrow().get(&pid).cloned()
    }
}

/// Desktop with a window list, a running flag, and a launch counter.
#[derive(Debug, Default)]
pub struct FakeDesktop {
    windows: RefCell<Vec<FakeWindow>>,
    running: bool,
    fail_launch: bool,
    launches: Cell<usize>,
}

impl FakeDesktop {
    pub fn running(mut self) -> Self {
        self.running = true;
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn add(&self, window: FakeWindow) {
        self.windows.borrow_mut().push(window);
    }

    pub fn launches(&self) -> usize {
        self.launches.get()
    }
}

impl Desktop for FakeDesktop {
    type Window = FakeWindow;

    fn window(&self, id: usize) -> Option<FakeWindow> {
        self.windows
            .borrow()
            .iter()
            .find(|w| w.id() == id && !w.was_destroyed())
            .cloned()
    }

    fn target_exe(&self) -> &str {
        "olk.exe"
    }

    fn is_target_running(&self) -> bool {
        self.running
    }

    fn launch_target(&self) -> Result<()> {
        if self.fail_launch {
            return Err(Error::Os("ShellExecuteW failed".into()));
        }
        self.launches.set(self.launches.get() + 1);
        Ok(())
    }
}

/// A shared state record living in process memory.
#[derive(Debug, Default)]
pub struct MemoryState {
    state: RefCell<SharedState>,
}

impl StateCell for MemoryState {
    fn read(&self) -> SharedState {
        *self.state.borrow()
    }

    fn update<R>(&self, f: impl FnOnce(&mut SharedState) -> R) -> R {
        f(&mut *self.state.borrow_mut())
    }
}

impl HiddenWindowStore for MemoryState {
    fn hidden_window(&self) -> Option<usize> {
        self.read().hidden_window()
    }

    fn clear_hidden_window(&self) {
        self.update(SharedState::clear_hidden_window);
    }

    fn original_rect(&self) -> Option<Rect> {
        let rect = self.read().original_bounds();
        (!rect.is_empty()).then_some(rect)
    }

    fn original_ex_style(&self) -> u32 {
        self.read().original_ex_style()
    }
}
