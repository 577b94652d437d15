//! Owned HANDLE wrapper with automatic cleanup

use crate::windows::bindings::kernel32;
use std::ptr;
use winapi::um::winnt::HANDLE;

/// Owned Windows HANDLE, closed on drop
pub struct Handle {
    handle: HANDLE,
}

impl Handle {
    /// Take ownership of a raw handle
    pub fn new(handle: HANDLE) -> Self {
        Handle { handle }
    }

    /// Check if handle is null
    pub fn is_null(&self) -> bool {
        self.handle.is_null()
    }

    /// Get the raw handle
    pub fn raw(&self) -> HANDLE {
        self.handle
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            unsafe {
                let _ = kernel32::close_handle(self.handle);
            }
            self.handle = ptr::null_mut();
        }
    }
}
