//! Core module containing the data model shared by all backends

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, IntrospectError, IntrospectResult, MemoryRegion, ProcessId, RegisterSnapshot,
    ThreadEntry, ThreadId,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
