use std::ptr::NonNull;
use std::sync::atomic::{Ordering, fence};

use tuckaway_core::{Error, Result, SHARED_STATE_NAME, SharedState, StateCell};

use windows::Win32::Foundation::{CloseHandle, HANDLE, INVALID_HANDLE_VALUE};
use windows::Win32::System::Memory::{
    CreateFileMappingW, FILE_MAP_ALL_ACCESS, MEMORY_MAPPED_VIEW_ADDRESS, MapViewOfFile,
    PAGE_READWRITE, UnmapViewOfFile,
};
use windows::core::HSTRING;

/// A mapped view of the named shared state block.
///
/// Every process that acquires the mapping sees the same memory. The OS
/// zero-fills the block when the first accessor creates it and reclaims
/// it when the last handle closes. Dropping the value unmaps the view
/// and closes the handle.
#[derive(Debug)]
pub struct SharedMapping {
    handle: HANDLE,
    state: NonNull<SharedState>,
}

// SAFETY: the view stays valid until drop, and the record is plain data
// shared with other processes anyway; there is no thread affinity.
unsafe impl Send for SharedMapping {}

impl SharedMapping {
    /// Opens the named mapping, creating it if absent, and maps a view.
    pub fn acquire() -> Result<Self> {
        let name = HSTRING::from(SHARED_STATE_NAME);
        let size = size_of::<SharedState>() as u32;

        // SAFETY: with INVALID_HANDLE_VALUE the mapping is backed by the
        // paging file. An existing mapping of the same name is opened
        // instead of created.
        let handle =
            unsafe { CreateFileMappingW(INVALID_HANDLE_VALUE, None, PAGE_READWRITE, 0, size, &name) }
                .map_err(|e| Error::StoreUnavailable(e.message()))?;

        // SAFETY: the handle was just created with read/write protection
        // and is at least `size` bytes long.
        let view = unsafe { MapViewOfFile(handle, FILE_MAP_ALL_ACCESS, 0, 0, size as usize) };
        let Some(state) = NonNull::new(view.Value.cast::<SharedState>()) else {
            // SAFETY: we own the handle and nothing else refers to it.
            unsafe {
                let _ = CloseHandle(handle);
            }
            return Err(Error::StoreUnavailable(format!(
                "MapViewOfFile failed for {SHARED_STATE_NAME}"
            )));
        };

        Ok(Self { handle, state })
    }
}

impl StateCell for SharedMapping {
    fn read(&self) -> SharedState {
        // SAFETY: the view is mapped for the lifetime of self and is
        // suitably sized and aligned (mappings are page aligned). Other
        // processes may write concurrently, hence the volatile copy.
        unsafe { self.state.as_ptr().read_volatile() }
    }

    fn update<R>(&self, f: impl FnOnce(&mut SharedState) -> R) -> R {
        // SAFETY: as in `read`. Writers in other processes touch other
        // fields by convention.
        let result = f(unsafe { &mut *self.state.as_ptr() });
        fence(Ordering::SeqCst);
        result
    }
}

impl Drop for SharedMapping {
    fn drop(&mut self) {
        // SAFETY: the view and the handle were created in `acquire` and
        // are owned exclusively by this value.
        unsafe {
            let _ = UnmapViewOfFile(MEMORY_MAPPED_VIEW_ADDRESS {
                Value: self.state.as_ptr().cast(),
            });
            let _ = CloseHandle(self.handle);
        }
    }
}
