//! Read-only process introspection for debugger front-ends
//!
//! Enumerates the committed regions of a live process, reads raw bytes from
//! it, lists threads and captures a thread's CPU registers with the hardware
//! breakpoint slots decoded. The OS-specific work sits behind
//! [`backend::IntrospectionBackend`]; [`NativeBackend`] is the implementation
//! for the build target.
//!
//! ```no_run
//! use hedgehog_native::{get_memory_regions, read_memory, Address};
//!
//! let pid = std::process::id();
//! for region in get_memory_regions(pid)? {
//!     println!("{}", region);
//! }
//! let bytes = read_memory(pid, Address::new(0x7ff6_0000_0000), 16)?;
//! println!("{:02x?}", bytes);
//! # Ok::<(), hedgehog_native::IntrospectError>(())
//! ```

pub mod backend;
pub mod config;
pub mod core;
pub mod decode;
pub mod introspector;
pub mod memory;
pub mod threads;

#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(windows)]
pub mod windows;

pub use backend::{IntrospectionBackend, NativeBackend, ProcessSession, ThreadSession};
pub use introspector::{
    get_main_thread_context, get_main_thread_id, get_memory_regions, get_thread_context,
    list_process_threads, list_threads, read_memory, Introspector,
};
pub use memory::format_hex_dump;

// Re-export main types from core module
pub use core::types::{
    Address, AcquisitionReason, IntrospectError, IntrospectResult, MemoryRegion, PlatformCode,
    ProcessId, RegisterSnapshot, SessionTarget, ThreadEntry, ThreadId,
};

pub use core::{AUTHORS, VERSION};
