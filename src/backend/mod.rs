//! Process-introspection backend interface
//!
//! A backend knows how to open a scoped session on a process or thread and
//! answer the handful of primitive queries the operation layer needs. Sessions
//! release their OS resources in `Drop`, so every exit path of an operation
//! gives the handle back. One backend exists per supported OS family and the
//! build selects it as [`NativeBackend`]; tests and alternate platforms can
//! supply their own implementation.

mod unsupported;

pub use unsupported::UnsupportedBackend;

use crate::core::types::{
    Address, CpuContext, IntrospectResult, PlatformCode, ProcessId, RegionQuery, ThreadEntry,
    ThreadId,
};

/// Access rights requested when opening a process
///
/// Values follow the Windows access-mask bits; other backends interpret them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessAccess {
    value: u32,
}

impl ProcessAccess {
    /// Query information access
    pub const QUERY_INFORMATION: Self = Self { value: 0x0400 };
    /// Read memory access
    pub const VM_READ: Self = Self { value: 0x0010 };

    /// Combine access rights
    pub fn combine(rights: &[Self]) -> Self {
        let mut value = 0;
        for right in rights {
            value |= right.value;
        }
        Self { value }
    }

    /// Rights needed to walk regions and read memory
    pub fn query_and_read() -> Self {
        Self::combine(&[Self::QUERY_INFORMATION, Self::VM_READ])
    }

    /// Check whether all rights in `other` are requested
    pub fn includes(&self, other: Self) -> bool {
        self.value & other.value == other.value
    }

    /// Get raw value
    pub fn value(&self) -> u32 {
        self.value
    }
}

/// Access rights requested when opening a thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAccess {
    value: u32,
}

impl ThreadAccess {
    /// Read the register context
    pub const GET_CONTEXT: Self = Self { value: 0x0008 };
    /// Query information access
    pub const QUERY_INFORMATION: Self = Self { value: 0x0040 };

    /// Combine access rights
    pub fn combine(rights: &[Self]) -> Self {
        let mut value = 0;
        for right in rights {
            value |= right.value;
        }
        Self { value }
    }

    /// Rights needed to capture a register snapshot
    pub fn capture() -> Self {
        Self::combine(&[Self::GET_CONTEXT, Self::QUERY_INFORMATION])
    }

    /// Check whether all rights in `other` are requested
    pub fn includes(&self, other: Self) -> bool {
        self.value & other.value == other.value
    }

    /// Get raw value
    pub fn value(&self) -> u32 {
        self.value
    }
}

/// An open handle on a target process
pub trait ProcessSession {
    /// Process this session was opened on
    fn pid(&self) -> ProcessId;

    /// Describes the region containing `address`
    ///
    /// `None` means the query failed, which ends a region walk.
    fn query_region(&self, address: Address) -> Option<RegionQuery>;

    /// Copies target memory at `address` into `buffer`
    ///
    /// Returns the number of bytes transferred, which may be less than the
    /// buffer length when the range runs into unmapped memory. An error means
    /// nothing was transferred.
    fn read(&self, address: Address, buffer: &mut [u8]) -> Result<usize, PlatformCode>;
}

/// An open handle on a target thread
pub trait ThreadSession {
    /// Thread this session was opened on
    fn tid(&self) -> ThreadId;

    /// Captures the full register set and debug registers in one call
    fn capture_context(&self) -> IntrospectResult<CpuContext>;
}

/// Process-introspection capability of one OS family
pub trait IntrospectionBackend {
    type Process: ProcessSession;
    type Thread: ThreadSession;

    /// Short backend name for diagnostics
    fn name(&self) -> &'static str;

    /// Opens a process session, failing with `AcquisitionFailed`
    fn open_process(&self, pid: ProcessId, access: ProcessAccess)
        -> IntrospectResult<Self::Process>;

    /// Opens a thread session, failing with `AcquisitionFailed`
    fn open_thread(&self, tid: ThreadId, access: ThreadAccess) -> IntrospectResult<Self::Thread>;

    /// Takes a system-wide snapshot of threads in enumeration order
    fn thread_snapshot(&self) -> IntrospectResult<Vec<ThreadEntry>>;
}

impl<B: IntrospectionBackend + ?Sized> IntrospectionBackend for &B {
    type Process = B::Process;
    type Thread = B::Thread;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn open_process(
        &self,
        pid: ProcessId,
        access: ProcessAccess,
    ) -> IntrospectResult<Self::Process> {
        (**self).open_process(pid, access)
    }

    fn open_thread(&self, tid: ThreadId, access: ThreadAccess) -> IntrospectResult<Self::Thread> {
        (**self).open_thread(tid, access)
    }

    fn thread_snapshot(&self) -> IntrospectResult<Vec<ThreadEntry>> {
        (**self).thread_snapshot()
    }
}

/// The backend for the OS this crate was built for
#[cfg(windows)]
pub type NativeBackend = crate::windows::WindowsBackend;

/// The backend for the OS this crate was built for
#[cfg(target_os = "linux")]
pub type NativeBackend = crate::linux::LinuxBackend;

/// The backend for the OS this crate was built for
#[cfg(not(any(windows, target_os = "linux")))]
pub type NativeBackend = UnsupportedBackend;
