use std::sync::{Mutex, PoisonError};

use tuckaway_core::{HookSlot, Result, TargetMatcher};

use crate::shared_memory::SharedMapping;

/// Everything the hook library keeps per process.
///
/// Handles are stored as integers so the context is `Send` and can sit
/// in a static.
pub(crate) struct ProcessContext {
    /// The library's own module handle, recorded on process attach.
    pub module: usize,
    /// The `HHOOK` of an installed hook, in the process that installed it.
    pub hook: HookSlot<isize>,
    /// Mapped lazily by the first accessor.
    pub mapping: Option<SharedMapping>,
    pub matcher: TargetMatcher,
}

impl ProcessContext {
    const fn new() -> Self {
        Self {
            module: 0,
            hook: HookSlot::new(),
            mapping: None,
            matcher: TargetMatcher::new(),
        }
    }
}

static CONTEXT: Mutex<ProcessContext> = Mutex::new(ProcessContext::new());

/// Runs `f` with the process context locked.
///
/// `f` must not call anything that sends window messages: the hook runs
/// on every message of this thread, so a sent message would re-enter
/// and deadlock on the lock.
pub(crate) fn with<R>(f: impl FnOnce(&mut ProcessContext) -> R) -> R {
    let mut context = CONTEXT.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut context)
}

/// Returns the mapped shared state, mapping it on first use.
pub(crate) fn mapping(slot: &mut Option<SharedMapping>) -> Result<&SharedMapping> {
    let mapping = match slot.take() {
        Some(mapping) => mapping,
        None => SharedMapping::acquire()?,
    };
    Ok(slot.insert(mapping))
}
