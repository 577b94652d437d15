//! Windows-specific type wrappers

pub mod context;
pub mod handle;
pub mod memory_info;

pub use context::{context_flags, convert_context};
pub use handle::Handle;
pub use memory_info::MemoryBasicInfo;
