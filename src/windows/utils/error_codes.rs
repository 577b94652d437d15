//! Windows error code classification

use crate::core::types::{AcquisitionReason, PlatformCode};
use std::fmt;

/// Windows error codes the backend distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success,
    AccessDenied,
    InvalidHandle,
    InvalidParameter,
    PartialCopy,
    InvalidAddress,
    Unknown(u32),
}

impl From<u32> for ErrorCode {
    fn from(code: u32) -> Self {
        match code {
            0 => ErrorCode::Success,
            5 => ErrorCode::AccessDenied,
            6 => ErrorCode::InvalidHandle,
            87 => ErrorCode::InvalidParameter,
            299 => ErrorCode::PartialCopy,
            487 => ErrorCode::InvalidAddress,
            _ => ErrorCode::Unknown(code),
        }
    }
}

impl From<PlatformCode> for ErrorCode {
    fn from(code: PlatformCode) -> Self {
        ErrorCode::from(code.raw() as u32)
    }
}

impl ErrorCode {
    /// Classify a failed OpenProcess/OpenThread
    ///
    /// Both calls answer `ERROR_INVALID_PARAMETER` for an id that does not
    /// exist and `ERROR_ACCESS_DENIED` when the id exists but is off limits.
    pub fn acquisition_reason(&self) -> AcquisitionReason {
        match self {
            ErrorCode::InvalidParameter => AcquisitionReason::NotFound,
            ErrorCode::AccessDenied => AcquisitionReason::PermissionDenied,
            _ => AcquisitionReason::Other,
        }
    }
}

/// Classify a raw acquisition failure code
pub fn classify_acquisition(code: PlatformCode) -> AcquisitionReason {
    ErrorCode::from(code).acquisition_reason()
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::Success => write!(f, "Success"),
            ErrorCode::AccessDenied => write!(f, "Access denied"),
            ErrorCode::InvalidHandle => write!(f, "Invalid handle"),
            ErrorCode::InvalidParameter => write!(f, "Invalid parameter"),
            ErrorCode::PartialCopy => write!(f, "Partial copy"),
            ErrorCode::InvalidAddress => write!(f, "Invalid address"),
            ErrorCode::Unknown(code) => write!(f, "Unknown error: {}", code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_conversion() {
        assert_eq!(ErrorCode::from(0), ErrorCode::Success);
        assert_eq!(ErrorCode::from(5), ErrorCode::AccessDenied);
        assert_eq!(ErrorCode::from(299), ErrorCode::PartialCopy);
        assert_eq!(ErrorCode::from(999), ErrorCode::Unknown(999));
    }

    #[test]
    fn test_acquisition_reason() {
        assert_eq!(
            classify_acquisition(PlatformCode(87)),
            AcquisitionReason::NotFound
        );
        assert_eq!(
            classify_acquisition(PlatformCode(5)),
            AcquisitionReason::PermissionDenied
        );
        assert_eq!(classify_acquisition(PlatformCode(6)), AcquisitionReason::Other);
    }

    #[test]
    fn test_error_code_display() {
        assert_eq!(format!("{}", ErrorCode::AccessDenied), "Access denied");
        assert_eq!(format!("{}", ErrorCode::Unknown(123)), "Unknown error: 123");
    }
}
