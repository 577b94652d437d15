//! Memory region descriptors

use super::address::Address;
use serde::{Serialize, Serializer};
use std::fmt;

/// Access rights of a page range
///
/// Each variant corresponds to one row of the native protection table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageAccess {
    /// No access rights (e.g. `PAGE_NOACCESS`)
    None,
    Execute,
    ExecuteRead,
    ExecuteReadWrite,
    ExecuteReadWriteCopy,
    Read,
    ReadWrite,
    ReadWriteCopy,
}

impl PageAccess {
    /// Canonical short rendering: `r`, `rw`, `rw(cow)`, `x`, `rx`, `rwx`, `rwx(cow)`
    pub const fn as_str(&self) -> &'static str {
        match self {
            PageAccess::None => "",
            PageAccess::Execute => "x",
            PageAccess::ExecuteRead => "rx",
            PageAccess::ExecuteReadWrite => "rwx",
            PageAccess::ExecuteReadWriteCopy => "rwx(cow)",
            PageAccess::Read => "r",
            PageAccess::ReadWrite => "rw",
            PageAccess::ReadWriteCopy => "rw(cow)",
        }
    }

    pub const fn is_readable(&self) -> bool {
        !matches!(self, PageAccess::None | PageAccess::Execute)
    }

    pub const fn is_writable(&self) -> bool {
        matches!(
            self,
            PageAccess::ExecuteReadWrite
                | PageAccess::ExecuteReadWriteCopy
                | PageAccess::ReadWrite
                | PageAccess::ReadWriteCopy
        )
    }

    pub const fn is_executable(&self) -> bool {
        matches!(
            self,
            PageAccess::Execute
                | PageAccess::ExecuteRead
                | PageAccess::ExecuteReadWrite
                | PageAccess::ExecuteReadWriteCopy
        )
    }

    pub const fn is_copy_on_write(&self) -> bool {
        matches!(
            self,
            PageAccess::ExecuteReadWriteCopy | PageAccess::ReadWriteCopy
        )
    }
}

impl fmt::Display for PageAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PageAccess {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Decoded page protection: access rights plus caching/guard modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Protection {
    pub access: PageAccess,
    pub guard: bool,
    pub no_cache: bool,
    pub write_combine: bool,
}

impl Protection {
    /// Protection with the given access rights and no modifiers
    pub const fn new(access: PageAccess) -> Self {
        Protection {
            access,
            guard: false,
            no_cache: false,
            write_combine: false,
        }
    }
}

/// Renders the access rights only; modifiers are exposed as fields
impl fmt::Display for Protection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.access, f)
    }
}

/// What backs a memory region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionType {
    /// Executable image or module mapping
    Image,
    /// Shared or file mapping
    Mapped,
    /// Anonymous private allocation
    Private,
    Unknown,
}

impl fmt::Display for RegionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionType::Image => "image",
            RegionType::Mapped => "mapped",
            RegionType::Private => "private",
            RegionType::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Allocation state of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionState {
    Committed,
    Reserved,
    Free,
}

impl fmt::Display for RegionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegionState::Committed => "committed",
            RegionState::Reserved => "reserved",
            RegionState::Free => "free",
        };
        f.write_str(name)
    }
}

/// One answer from a backend's "describe the region containing this address" query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionQuery {
    pub base_address: Address,
    pub size: u64,
    pub state: RegionState,
    pub protection: Protection,
    pub region_type: RegionType,
}

/// A committed region of the target's address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryRegion {
    pub base_address: Address,
    pub size: u64,
    pub protection: Protection,
    #[serde(rename = "type")]
    pub region_type: RegionType,
    pub state: RegionState,
}

impl MemoryRegion {
    /// First address past the region, saturating at the top of the address space
    pub fn end_address(&self) -> Address {
        self.base_address.saturating_add(self.size)
    }

    /// Check if an address is within this region
    pub fn contains(&self, address: Address) -> bool {
        self.base_address.contains(self.size, address)
    }

    /// Check if two regions share any byte
    pub fn overlaps(&self, other: &MemoryRegion) -> bool {
        self.base_address
            .overlaps(self.size, other.base_address, other.size)
    }

    /// Guard pages fault on first touch and are treated as unreadable
    pub fn is_readable(&self) -> bool {
        self.protection.access.is_readable() && !self.protection.guard
    }

    pub fn is_writable(&self) -> bool {
        self.protection.access.is_writable()
    }

    pub fn is_executable(&self) -> bool {
        self.protection.access.is_executable()
    }

    pub fn is_guarded(&self) -> bool {
        self.protection.guard
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:x}-{:x} {:<8} {:<7} {}",
            self.base_address,
            self.end_address(),
            self.protection.to_string(),
            self.region_type,
            self.size
        )
    }
}
