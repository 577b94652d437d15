//! Error types for introspection operations

use super::address::Address;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Raw error code reported by the operating system
///
/// `GetLastError` on Windows, `errno` elsewhere. Zero means the platform did
/// not report a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlatformCode(pub i32);

impl PlatformCode {
    /// No code was reported
    pub const NONE: PlatformCode = PlatformCode(0);

    /// Captures the calling thread's last OS error
    pub fn last() -> Self {
        PlatformCode(std::io::Error::last_os_error().raw_os_error().unwrap_or(0))
    }

    /// Returns the raw code
    pub fn raw(&self) -> i32 {
        self.0
    }
}

impl From<&std::io::Error> for PlatformCode {
    fn from(err: &std::io::Error) -> Self {
        PlatformCode(err.raw_os_error().unwrap_or(0))
    }
}

impl fmt::Display for PlatformCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "os error {}", self.0)
    }
}

/// What a failed acquisition was trying to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionTarget {
    Process,
    Thread,
    ThreadSnapshot,
}

impl fmt::Display for SessionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionTarget::Process => write!(f, "process"),
            SessionTarget::Thread => write!(f, "thread"),
            SessionTarget::ThreadSnapshot => write!(f, "thread snapshot"),
        }
    }
}

/// Best-effort classification of an acquisition failure
///
/// The OS does not always separate "no such object" from "not allowed", so
/// `Other` is a legitimate answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcquisitionReason {
    NotFound,
    PermissionDenied,
    Other,
}

impl fmt::Display for AcquisitionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionReason::NotFound => write!(f, "not found"),
            AcquisitionReason::PermissionDenied => write!(f, "permission denied"),
            AcquisitionReason::Other => write!(f, "unavailable"),
        }
    }
}

/// Main error type for introspection operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntrospectError {
    #[error("Failed to open {target} {id}: {reason} ({code})")]
    AcquisitionFailed {
        target: SessionTarget,
        id: u32,
        reason: AcquisitionReason,
        code: PlatformCode,
    },

    #[error("Failed to read {size} bytes at {address} in process {pid} ({code})")]
    ReadFault {
        pid: u32,
        address: Address,
        size: u64,
        code: PlatformCode,
    },

    #[error("Context of thread {tid} unavailable: {detail} ({code})")]
    ContextUnavailable {
        tid: u32,
        detail: String,
        code: PlatformCode,
    },

    #[error("No thread owned by process {pid} in the current snapshot")]
    ThreadNotFound { pid: u32 },

    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),
}

/// Result type alias for introspection operations
pub type IntrospectResult<T> = Result<T, IntrospectError>;

impl IntrospectError {
    /// Creates an acquisition failure for a process
    pub fn process_unavailable(pid: u32, reason: AcquisitionReason, code: PlatformCode) -> Self {
        IntrospectError::AcquisitionFailed {
            target: SessionTarget::Process,
            id: pid,
            reason,
            code,
        }
    }

    /// Creates an acquisition failure for a thread
    pub fn thread_unavailable(tid: u32, reason: AcquisitionReason, code: PlatformCode) -> Self {
        IntrospectError::AcquisitionFailed {
            target: SessionTarget::Thread,
            id: tid,
            reason,
            code,
        }
    }

    /// Creates an acquisition failure for the system thread snapshot
    pub fn snapshot_unavailable(reason: AcquisitionReason, code: PlatformCode) -> Self {
        IntrospectError::AcquisitionFailed {
            target: SessionTarget::ThreadSnapshot,
            id: 0,
            reason,
            code,
        }
    }

    /// Creates a read fault
    pub fn read_fault(pid: u32, address: Address, size: u64, code: PlatformCode) -> Self {
        IntrospectError::ReadFault {
            pid,
            address,
            size,
            code,
        }
    }

    /// Creates a context capture failure
    pub fn context_unavailable(tid: u32, detail: impl Into<String>, code: PlatformCode) -> Self {
        IntrospectError::ContextUnavailable {
            tid,
            detail: detail.into(),
            code,
        }
    }

    /// The platform code attached to this error, if any
    pub fn platform_code(&self) -> Option<PlatformCode> {
        match self {
            IntrospectError::AcquisitionFailed { code, .. }
            | IntrospectError::ReadFault { code, .. }
            | IntrospectError::ContextUnavailable { code, .. } => Some(*code),
            IntrospectError::ThreadNotFound { .. } | IntrospectError::InvalidAddress(_) => None,
        }
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            IntrospectError::AcquisitionFailed { .. } => "AcquisitionFailed",
            IntrospectError::ReadFault { .. } => "ReadFault",
            IntrospectError::ContextUnavailable { .. } => "ContextUnavailable",
            IntrospectError::ThreadNotFound { .. } => "ThreadNotFound",
            IntrospectError::InvalidAddress(_) => "InvalidAddress",
        }
    }
}
