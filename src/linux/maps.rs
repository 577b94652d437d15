//! `/proc/<pid>/maps` parsing
//!
//! The maps file lists only mapped ranges. The gaps between them are reported
//! as free regions so a region walk sees a contiguous address space.

use crate::core::types::{Address, RegionQuery, RegionState, RegionType};
use crate::decode::decode_posix_permissions;
use std::fs;
use std::io;

/// One line of a maps file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapsEntry {
    pub start: u64,
    pub end: u64,
    pub perms: String,
    pub offset: u64,
    pub inode: u64,
    pub pathname: Option<String>,
}

impl MapsEntry {
    /// Parses `start-end perms offset dev inode [pathname]`
    pub fn parse(line: &str) -> Option<MapsEntry> {
        let mut parts = line.split_whitespace();
        let range = parts.next()?;
        let perms = parts.next()?;
        let offset = parts.next()?;
        let _dev = parts.next()?;
        let inode = parts.next()?;
        let pathname: Vec<&str> = parts.collect();

        let (start, end) = range.split_once('-')?;
        let start = u64::from_str_radix(start, 16).ok()?;
        let end = u64::from_str_radix(end, 16).ok()?;
        if end <= start {
            return None;
        }

        Some(MapsEntry {
            start,
            end,
            perms: perms.to_string(),
            offset: u64::from_str_radix(offset, 16).ok()?,
            inode: inode.parse().ok()?,
            pathname: if pathname.is_empty() {
                None
            } else {
                Some(pathname.join(" "))
            },
        })
    }

    pub fn size(&self) -> u64 {
        self.end - self.start
    }

    /// Backed by a file on disk rather than anonymous memory
    pub fn is_file_backed(&self) -> bool {
        self.inode != 0
    }

    pub fn is_shared(&self) -> bool {
        self.perms.as_bytes().get(3) == Some(&b's')
    }

    /// Image for private file and kernel-provided code mappings, mapped for
    /// shared mappings, private for anonymous memory
    pub fn region_type(&self) -> RegionType {
        if self.is_shared() {
            return RegionType::Mapped;
        }
        if self.is_file_backed() {
            return RegionType::Image;
        }
        match self.pathname.as_deref() {
            Some("[vdso]") | Some("[vsyscall]") => RegionType::Image,
            Some("[vvar]") => RegionType::Mapped,
            _ => RegionType::Private,
        }
    }

    /// No access at all: address space set aside, like a Windows reservation
    pub fn is_inaccessible(&self) -> bool {
        self.perms.starts_with("---")
    }

    pub fn to_region_query(&self) -> RegionQuery {
        RegionQuery {
            base_address: Address::new(self.start),
            size: self.size(),
            state: if self.is_inaccessible() {
                RegionState::Reserved
            } else {
                RegionState::Committed
            },
            protection: decode_posix_permissions(&self.perms, self.is_file_backed()),
            region_type: self.region_type(),
        }
    }
}

/// Parses a whole maps file, skipping malformed lines and keeping ascending order
pub fn parse_maps(content: &str) -> Vec<MapsEntry> {
    let mut entries: Vec<MapsEntry> = content.lines().filter_map(MapsEntry::parse).collect();
    entries.sort_by_key(|entry| entry.start);
    entries
}

/// Reads and parses `/proc/<pid>/maps`
pub fn read_maps(pid: u32) -> io::Result<Vec<MapsEntry>> {
    let content = fs::read_to_string(format!("/proc/{}/maps", pid))?;
    Ok(parse_maps(&content))
}

/// Describes the region containing `address`
///
/// Addresses inside a mapping get that mapping; addresses in a gap get a free
/// region running up to the next mapping or the top of the address space.
pub fn region_at(entries: &[MapsEntry], address: Address) -> RegionQuery {
    let addr = address.as_u64();
    let next = entries.partition_point(|entry| entry.end <= addr);

    match entries.get(next) {
        Some(entry) if entry.start <= addr => entry.to_region_query(),
        Some(entry) => free_region(address, entry.start - addr),
        None => free_region(address, (u64::MAX - addr).saturating_add(1)),
    }
}

fn free_region(address: Address, size: u64) -> RegionQuery {
    RegionQuery {
        base_address: address,
        size,
        state: RegionState::Free,
        protection: decode_posix_permissions("---p", false),
        region_type: RegionType::Unknown,
    }
}
