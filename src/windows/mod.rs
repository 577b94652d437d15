//! Windows backend
//!
//! Process sessions wrap an `OpenProcess` handle, thread sessions an
//! `OpenThread` handle. Regions come from `VirtualQueryEx`, reads from
//! `ReadProcessMemory`, register state from `GetThreadContext` and the thread
//! list from a Toolhelp32 snapshot. All unsafe FFI calls stay inside
//! [`bindings`].

pub mod bindings;
pub mod types;
pub mod utils;

pub use types::{Handle, MemoryBasicInfo};
pub use utils::ErrorCode;

use crate::backend::{
    IntrospectionBackend, ProcessAccess, ProcessSession, ThreadAccess, ThreadSession,
};
use crate::core::types::{
    Address, CpuContext, IntrospectError, IntrospectResult, PlatformCode, ProcessId, RegionQuery,
    ThreadEntry, ThreadId,
};
use bindings::kernel32;
use tracing::{debug, trace};
use utils::classify_acquisition;

/// Open process handle
pub struct WindowsProcess {
    pid: ProcessId,
    handle: Handle,
}

impl ProcessSession for WindowsProcess {
    fn pid(&self) -> ProcessId {
        self.pid
    }

    fn query_region(&self, address: Address) -> Option<RegionQuery> {
        // addresses past the host pointer width do not exist in the target
        let address = address.to_usize()?;
        match unsafe { kernel32::virtual_query_ex(self.handle.raw(), address) } {
            Ok(mbi) => Some(MemoryBasicInfo::from(mbi).to_region_query()),
            Err(code) => {
                trace!("VirtualQueryEx(0x{:x}) ended walk: {}", address, code);
                None
            }
        }
    }

    fn read(&self, address: Address, buffer: &mut [u8]) -> Result<usize, PlatformCode> {
        let address = address.to_usize().ok_or(PlatformCode::NONE)?;
        unsafe { kernel32::read_process_memory(self.handle.raw(), address, buffer) }
    }
}

impl Drop for WindowsProcess {
    fn drop(&mut self) {
        debug!("closing process {}", self.pid);
    }
}

/// Open thread handle
pub struct WindowsThread {
    tid: ThreadId,
    handle: Handle,
}

impl ThreadSession for WindowsThread {
    fn tid(&self) -> ThreadId {
        self.tid
    }

    fn capture_context(&self) -> IntrospectResult<CpuContext> {
        let raw = unsafe { kernel32::get_thread_context(self.handle.raw(), types::context_flags()) }
            .map_err(|code| {
                IntrospectError::context_unavailable(self.tid, "GetThreadContext failed", code)
            })?;

        types::convert_context(&raw).ok_or_else(|| {
            IntrospectError::context_unavailable(
                self.tid,
                "no register layout for this architecture",
                PlatformCode::NONE,
            )
        })
    }
}

impl Drop for WindowsThread {
    fn drop(&mut self) {
        debug!("closing thread {}", self.tid);
    }
}

/// Backend over the Win32 debugging and memory APIs
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsBackend;

impl IntrospectionBackend for WindowsBackend {
    type Process = WindowsProcess;
    type Thread = WindowsThread;

    fn name(&self) -> &'static str {
        "windows"
    }

    fn open_process(&self, pid: ProcessId, access: ProcessAccess) -> IntrospectResult<WindowsProcess> {
        let handle = kernel32::open_process(pid, access.value()).map_err(|code| {
            IntrospectError::process_unavailable(pid, classify_acquisition(code), code)
        })?;

        Ok(WindowsProcess {
            pid,
            handle: Handle::new(handle),
        })
    }

    fn open_thread(&self, tid: ThreadId, access: ThreadAccess) -> IntrospectResult<WindowsThread> {
        let handle = kernel32::open_thread(tid, access.value()).map_err(|code| {
            IntrospectError::thread_unavailable(tid, classify_acquisition(code), code)
        })?;

        Ok(WindowsThread {
            tid,
            handle: Handle::new(handle),
        })
    }

    fn thread_snapshot(&self) -> IntrospectResult<Vec<ThreadEntry>> {
        let threads = kernel32::snapshot_threads().map_err(|code| {
            IntrospectError::snapshot_unavailable(classify_acquisition(code), code)
        })?;

        Ok(threads
            .into_iter()
            .map(|(tid, pid)| ThreadEntry::new(tid, pid))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{AcquisitionReason, SessionTarget};

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_open_current_process() {
        let session = WindowsBackend
            .open_process(std::process::id(), ProcessAccess::query_and_read())
            .unwrap();
        assert_eq!(session.pid(), std::process::id());
        assert!(session.query_region(Address::null()).is_some());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_open_missing_process() {
        let err = WindowsBackend
            .open_process(u32::MAX - 2, ProcessAccess::query_and_read())
            .err()
            .unwrap();
        match err {
            IntrospectError::AcquisitionFailed { target, reason, .. } => {
                assert_eq!(target, SessionTarget::Process);
                assert_eq!(reason, AcquisitionReason::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
