//! Memory region enumeration for a target process
//!
//! The walk itself is backend independent: it asks the session to describe the
//! region containing an address, advances past it and keeps only committed
//! regions. Filters narrow the result for display.

pub mod enumerator;
pub mod filter;

pub use enumerator::{committed_regions, MemoryRegionEnumerator, RegionWalk};
pub use filter::{FilterCriteria, RegionFilter};
