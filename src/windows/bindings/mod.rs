//! Windows API bindings
//!
//! Thin wrappers over the kernel32 calls the backend needs. Failures come back
//! as the `GetLastError` code captured right after the call.

pub mod kernel32;

pub use kernel32::*;
