//! Page protection, region type and region state decoding

use crate::core::types::{PageAccess, Protection, RegionState, RegionType};

// Protection constants
pub const PAGE_NOACCESS: u32 = 0x01;
pub const PAGE_READONLY: u32 = 0x02;
pub const PAGE_READWRITE: u32 = 0x04;
pub const PAGE_WRITECOPY: u32 = 0x08;
pub const PAGE_EXECUTE: u32 = 0x10;
pub const PAGE_EXECUTE_READ: u32 = 0x20;
pub const PAGE_EXECUTE_READWRITE: u32 = 0x40;
pub const PAGE_EXECUTE_WRITECOPY: u32 = 0x80;
pub const PAGE_GUARD: u32 = 0x100;
pub const PAGE_NOCACHE: u32 = 0x200;
pub const PAGE_WRITECOMBINE: u32 = 0x400;

// Region state constants
pub const MEM_COMMIT: u32 = 0x1000;
pub const MEM_RESERVE: u32 = 0x2000;
pub const MEM_FREE: u32 = 0x10000;

// Region type constants
pub const MEM_PRIVATE: u32 = 0x20000;
pub const MEM_MAPPED: u32 = 0x40000;
pub const MEM_IMAGE: u32 = 0x1000000;

/// Access table in precedence order, most specific execute/write/copy first
const ACCESS_PRECEDENCE: [(u32, PageAccess); 7] = [
    (PAGE_EXECUTE_WRITECOPY, PageAccess::ExecuteReadWriteCopy),
    (PAGE_EXECUTE_READWRITE, PageAccess::ExecuteReadWrite),
    (PAGE_EXECUTE_READ, PageAccess::ExecuteRead),
    (PAGE_EXECUTE, PageAccess::Execute),
    (PAGE_WRITECOPY, PageAccess::ReadWriteCopy),
    (PAGE_READWRITE, PageAccess::ReadWrite),
    (PAGE_READONLY, PageAccess::Read),
];

/// Decodes a native page protection bitmask
pub fn decode_page_protection(raw: u32) -> Protection {
    let access = ACCESS_PRECEDENCE
        .iter()
        .find(|(mask, _)| raw & mask != 0)
        .map(|&(_, access)| access)
        .unwrap_or(PageAccess::None);

    Protection {
        access,
        guard: raw & PAGE_GUARD != 0,
        no_cache: raw & PAGE_NOCACHE != 0,
        write_combine: raw & PAGE_WRITECOMBINE != 0,
    }
}

/// Decodes a native region type value
pub fn decode_region_type(raw: u32) -> RegionType {
    match raw {
        MEM_IMAGE => RegionType::Image,
        MEM_MAPPED => RegionType::Mapped,
        MEM_PRIVATE => RegionType::Private,
        _ => RegionType::Unknown,
    }
}

/// Decodes a native region state value
///
/// Unrecognised values are treated as free so they are never surfaced.
pub fn decode_region_state(raw: u32) -> RegionState {
    match raw {
        MEM_COMMIT => RegionState::Committed,
        MEM_RESERVE => RegionState::Reserved,
        _ => RegionState::Free,
    }
}

/// Decodes a POSIX permission string such as `r-xp` or `rw-s`
///
/// A private (`p`) writable mapping of a file is copy-on-write; anonymous
/// private memory is plain read/write.
pub fn decode_posix_permissions(perms: &str, file_backed: bool) -> Protection {
    let bytes = perms.as_bytes();
    let flag = |i: usize, c: u8| bytes.get(i) == Some(&c);

    let read = flag(0, b'r');
    let write = flag(1, b'w');
    let execute = flag(2, b'x');
    let copy = write && flag(3, b'p') && file_backed;

    let access = match (read || write, write, execute, copy) {
        (_, true, true, true) => PageAccess::ExecuteReadWriteCopy,
        (_, true, true, false) => PageAccess::ExecuteReadWrite,
        (true, false, true, _) => PageAccess::ExecuteRead,
        (false, false, true, _) => PageAccess::Execute,
        (_, true, false, true) => PageAccess::ReadWriteCopy,
        (_, true, false, false) => PageAccess::ReadWrite,
        (true, false, false, _) => PageAccess::Read,
        (false, false, false, _) => PageAccess::None,
    };

    Protection::new(access)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_protection_table_is_exhaustive() {
        let table = [
            (PAGE_NOACCESS, PageAccess::None, ""),
            (PAGE_READONLY, PageAccess::Read, "r"),
            (PAGE_READWRITE, PageAccess::ReadWrite, "rw"),
            (PAGE_WRITECOPY, PageAccess::ReadWriteCopy, "rw(cow)"),
            (PAGE_EXECUTE, PageAccess::Execute, "x"),
            (PAGE_EXECUTE_READ, PageAccess::ExecuteRead, "rx"),
            (PAGE_EXECUTE_READWRITE, PageAccess::ExecuteReadWrite, "rwx"),
            (PAGE_EXECUTE_WRITECOPY, PageAccess::ExecuteReadWriteCopy, "rwx(cow)"),
            (0, PageAccess::None, ""),
        ];

        for (raw, access, rendered) in table {
            let decoded = decode_page_protection(raw);
            assert_eq!(decoded.access, access, "raw 0x{:X}", raw);
            assert_eq!(decoded.to_string(), rendered, "raw 0x{:X}", raw);
            assert!(!decoded.guard && !decoded.no_cache && !decoded.write_combine);
        }
    }

    #[test]
    fn test_modifiers_do_not_change_access() {
        let decoded = decode_page_protection(PAGE_READWRITE | PAGE_GUARD);
        assert_eq!(decoded.access, PageAccess::ReadWrite);
        assert!(decoded.guard);

        let decoded = decode_page_protection(PAGE_EXECUTE_READ | PAGE_NOCACHE);
        assert_eq!(decoded.access, PageAccess::ExecuteRead);
        assert!(decoded.no_cache);

        let decoded = decode_page_protection(PAGE_READONLY | PAGE_WRITECOMBINE);
        assert_eq!(decoded.access, PageAccess::Read);
        assert!(decoded.write_combine);
    }

    #[test]
    fn test_precedence_prefers_execute_write_copy() {
        let decoded = decode_page_protection(PAGE_EXECUTE_WRITECOPY | PAGE_READONLY);
        assert_eq!(decoded.access, PageAccess::ExecuteReadWriteCopy);

        let decoded = decode_page_protection(PAGE_WRITECOPY | PAGE_READWRITE);
        assert_eq!(decoded.access, PageAccess::ReadWriteCopy);
    }

    #[test]
    fn test_region_type_decoding() {
        assert_eq!(decode_region_type(MEM_IMAGE), RegionType::Image);
        assert_eq!(decode_region_type(MEM_MAPPED), RegionType::Mapped);
        assert_eq!(decode_region_type(MEM_PRIVATE), RegionType::Private);
        assert_eq!(decode_region_type(0), RegionType::Unknown);
        assert_eq!(
            decode_region_type(MEM_IMAGE | MEM_PRIVATE),
            RegionType::Unknown
        );
    }

    #[test]
    fn test_region_state_decoding() {
        assert_eq!(decode_region_state(MEM_COMMIT), RegionState::Committed);
        assert_eq!(decode_region_state(MEM_RESERVE), RegionState::Reserved);
        assert_eq!(decode_region_state(MEM_FREE), RegionState::Free);
        assert_eq!(decode_region_state(0x42), RegionState::Free);
    }

    #[test]
    fn test_posix_permissions() {
        let table = [
            ("r--p", true, PageAccess::Read),
            ("rw-p", false, PageAccess::ReadWrite),
            ("rw-p", true, PageAccess::ReadWriteCopy),
            ("rw-s", true, PageAccess::ReadWrite),
            ("r-xp", true, PageAccess::ExecuteRead),
            ("--xp", true, PageAccess::Execute),
            ("rwxp", false, PageAccess::ExecuteReadWrite),
            ("rwxp", true, PageAccess::ExecuteReadWriteCopy),
            ("---p", false, PageAccess::None),
            ("", false, PageAccess::None),
        ];

        for (perms, file_backed, access) in table {
            assert_eq!(
                decode_posix_permissions(perms, file_backed).access,
                access,
                "{} (file_backed={})",
                perms,
                file_backed
            );
        }
    }
}
