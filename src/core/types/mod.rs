//! Core type definitions for hedgehog-native
//!
//! Plain records returned by every backend: addresses, region descriptors,
//! register snapshots, thread entries and the error taxonomy.

mod address;
mod error;
mod region;
mod registers;
mod thread;

// Re-export all public types
pub use address::{parse_address, Address};
pub use error::{
    AcquisitionReason, IntrospectError, IntrospectResult, PlatformCode, SessionTarget,
};
pub use region::{MemoryRegion, PageAccess, Protection, RegionQuery, RegionState, RegionType};
pub use registers::{
    BreakpointCondition, BreakpointSlot, CpuContext, DebugRegisters, FlagsState,
    GeneralPurposeRegisters, RegisterSnapshot, SegmentRegisters, X64Registers, X86Registers,
};
pub use thread::ThreadEntry;

// Common type aliases
pub type ProcessId = u32;
pub type ThreadId = u32;
