//! Backend for platforms without an introspection implementation

use super::{IntrospectionBackend, ProcessAccess, ProcessSession, ThreadAccess, ThreadSession};
use crate::core::types::{
    AcquisitionReason, Address, CpuContext, IntrospectError, IntrospectResult, PlatformCode,
    ProcessId, RegionQuery, ThreadEntry, ThreadId,
};

/// Backend whose every acquisition fails
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedBackend;

/// Session type that can never be constructed
#[derive(Debug)]
pub enum NoSession {}

impl ProcessSession for NoSession {
    fn pid(&self) -> ProcessId {
        match *self {}
    }

    fn query_region(&self, _address: Address) -> Option<RegionQuery> {
        match *self {}
    }

    fn read(&self, _address: Address, _buffer: &mut [u8]) -> Result<usize, PlatformCode> {
        match *self {}
    }
}

impl ThreadSession for NoSession {
    fn tid(&self) -> ThreadId {
        match *self {}
    }

    fn capture_context(&self) -> IntrospectResult<CpuContext> {
        match *self {}
    }
}

impl IntrospectionBackend for UnsupportedBackend {
    type Process = NoSession;
    type Thread = NoSession;

    fn name(&self) -> &'static str {
        "unsupported"
    }

    fn open_process(&self, pid: ProcessId, _access: ProcessAccess) -> IntrospectResult<NoSession> {
        Err(IntrospectError::process_unavailable(
            pid,
            AcquisitionReason::Other,
            PlatformCode::NONE,
        ))
    }

    fn open_thread(&self, tid: ThreadId, _access: ThreadAccess) -> IntrospectResult<NoSession> {
        Err(IntrospectError::thread_unavailable(
            tid,
            AcquisitionReason::Other,
            PlatformCode::NONE,
        ))
    }

    fn thread_snapshot(&self) -> IntrospectResult<Vec<ThreadEntry>> {
        Err(IntrospectError::snapshot_unavailable(
            AcquisitionReason::Other,
            PlatformCode::NONE,
        ))
    }
}
