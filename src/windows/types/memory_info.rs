//! MEMORY_BASIC_INFORMATION conversion

use crate::core::types::{Address, RegionQuery};
use crate::decode::{decode_page_protection, decode_region_state, decode_region_type};
use winapi::um::winnt::MEMORY_BASIC_INFORMATION;

/// The fields of MEMORY_BASIC_INFORMATION the region walk uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBasicInfo {
    pub base_address: Address,
    pub region_size: u64,
    pub state: u32,
    pub protect: u32,
    pub type_flags: u32,
}

impl From<MEMORY_BASIC_INFORMATION> for MemoryBasicInfo {
    fn from(mbi: MEMORY_BASIC_INFORMATION) -> Self {
        MemoryBasicInfo {
            base_address: Address::from(mbi.BaseAddress as usize),
            region_size: mbi.RegionSize as u64,
            state: mbi.State,
            protect: mbi.Protect,
            type_flags: mbi.Type,
        }
    }
}

impl MemoryBasicInfo {
    /// Decode the native codes into a region description
    pub fn to_region_query(&self) -> RegionQuery {
        RegionQuery {
            base_address: self.base_address,
            size: self.region_size,
            state: decode_region_state(self.state),
            protection: decode_page_protection(self.protect),
            region_type: decode_region_type(self.type_flags),
        }
    }
}
