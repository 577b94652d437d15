//! Memory introspection: region enumeration and raw reads
//!
//! Both operations open their own process session, do one logical query and
//! release the session before returning. Nothing is cached between calls.

pub mod reader;
pub mod regions;

pub use reader::{format_hex_dump, MemoryReader};
pub use regions::{FilterCriteria, MemoryRegionEnumerator, RegionFilter, RegionWalk};
