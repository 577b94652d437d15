//! Operation facade over a backend
//!
//! [`Introspector`] bundles the four operations behind one value so callers
//! can inject a backend once. The free functions use the native backend.

use crate::backend::{IntrospectionBackend, NativeBackend};
use crate::core::types::{
    Address, IntrospectResult, MemoryRegion, ProcessId, RegisterSnapshot, ThreadEntry, ThreadId,
};
use crate::memory::{MemoryReader, MemoryRegionEnumerator};
use crate::threads::{ThreadEnumerator, ThreadRegisterReader};

/// Read-only introspection of live processes through one backend
#[derive(Debug, Clone, Default)]
pub struct Introspector<B: IntrospectionBackend = NativeBackend> {
    backend: B,
}

impl Introspector<NativeBackend> {
    /// Introspector on the backend for the current OS
    pub fn native() -> Self {
        Introspector {
            backend: NativeBackend::default(),
        }
    }
}

impl<B: IntrospectionBackend> Introspector<B> {
    /// Create an introspector on a specific backend
    pub fn new(backend: B) -> Self {
        Introspector { backend }
    }

    /// Get the underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Committed regions of `pid` in ascending address order
    pub fn get_memory_regions(&self, pid: ProcessId) -> IntrospectResult<Vec<MemoryRegion>> {
        MemoryRegionEnumerator::new(&self.backend).enumerate(pid)
    }

    /// Up to `size` bytes of `pid`'s memory at `address`
    pub fn read_memory(
        &self,
        pid: ProcessId,
        address: Address,
        size: usize,
    ) -> IntrospectResult<Vec<u8>> {
        MemoryReader::new(&self.backend).read(pid, address, size)
    }

    /// Decoded register state of `tid`
    pub fn get_thread_context(&self, tid: ThreadId) -> IntrospectResult<RegisterSnapshot> {
        ThreadRegisterReader::new(&self.backend).capture(tid)
    }

    /// First thread in enumeration order owned by `pid`
    ///
    /// This is a heuristic: it is usually, but not provably, the thread the
    /// process started with.
    pub fn get_main_thread_id(&self, pid: ProcessId) -> IntrospectResult<ThreadId> {
        ThreadEnumerator::new(&self.backend).find_main_thread(pid)
    }

    /// Register state of the thread [`Self::get_main_thread_id`] picks
    pub fn get_main_thread_context(&self, pid: ProcessId) -> IntrospectResult<RegisterSnapshot> {
        let tid = self.get_main_thread_id(pid)?;
        self.get_thread_context(tid)
    }

    /// Every thread on the system
    pub fn list_threads(&self) -> IntrospectResult<Vec<ThreadEntry>> {
        ThreadEnumerator::new(&self.backend).list_threads()
    }

    /// Threads owned by `pid`
    pub fn list_process_threads(&self, pid: ProcessId) -> IntrospectResult<Vec<ThreadEntry>> {
        ThreadEnumerator::new(&self.backend).list_process_threads(pid)
    }
}

/// Committed regions of `pid` using the native backend
pub fn get_memory_regions(pid: ProcessId) -> IntrospectResult<Vec<MemoryRegion>> {
    Introspector::native().get_memory_regions(pid)
}

/// Reads memory of `pid` using the native backend
pub fn read_memory(pid: ProcessId, address: Address, size: usize) -> IntrospectResult<Vec<u8>> {
    Introspector::native().read_memory(pid, address, size)
}

/// Captures the registers of `tid` using the native backend
pub fn get_thread_context(tid: ThreadId) -> IntrospectResult<RegisterSnapshot> {
    Introspector::native().get_thread_context(tid)
}

/// Main-thread heuristic for `pid` using the native backend
pub fn get_main_thread_id(pid: ProcessId) -> IntrospectResult<ThreadId> {
    Introspector::native().get_main_thread_id(pid)
}

/// Captures the registers of `pid`'s main thread using the native backend
pub fn get_main_thread_context(pid: ProcessId) -> IntrospectResult<RegisterSnapshot> {
    Introspector::native().get_main_thread_context(pid)
}

/// System thread list using the native backend
pub fn list_threads() -> IntrospectResult<Vec<ThreadEntry>> {
    Introspector::native().list_threads()
}

/// Threads of `pid` using the native backend
pub fn list_process_threads(pid: ProcessId) -> IntrospectResult<Vec<ThreadEntry>> {
    Introspector::native().list_process_threads(pid)
}
