//! Raw byte reads from a target process

pub mod dump;

pub use dump::format_hex_dump;

use crate::backend::{IntrospectionBackend, ProcessAccess, ProcessSession};
use crate::core::types::{Address, IntrospectError, IntrospectResult, PlatformCode, ProcessId};
use tracing::{debug, trace};

/// Number of bytes that can be read at `address` before running off the top
/// of the 64-bit address space, capped at `size`
pub fn clamp_to_address_space(address: Address, size: usize) -> usize {
    // bytes from address to u64::MAX inclusive, minus one so it cannot overflow
    let room = u64::MAX - address.as_u64();
    match u64::try_from(size) {
        Ok(requested) if requested.saturating_sub(1) <= room => size,
        Ok(_) => usize::try_from(room + 1).unwrap_or(usize::MAX),
        Err(_) => usize::try_from(room.saturating_add(1)).unwrap_or(usize::MAX),
    }
}

/// Largest single transfer handed to a session
pub const READ_CHUNK: usize = 1 << 20;

/// Reads up to `len` bytes at `address` through an open session
///
/// The buffer grows one chunk at a time and stops at the first short
/// transfer, so a large request over a small mapping never allocates the
/// whole range. Nothing transferred is a read fault; a fault after some data
/// arrived ends the read with what was transferred.
pub fn read_chunked<S: ProcessSession>(
    session: &S,
    address: Address,
    len: usize,
) -> IntrospectResult<Vec<u8>> {
    let fault = |code| IntrospectError::read_fault(session.pid(), address, len as u64, code);
    let mut buffer: Vec<u8> = Vec::new();

    while buffer.len() < len {
        let filled = buffer.len();
        let chunk = (len - filled).min(READ_CHUNK);
        if buffer.try_reserve(chunk).is_err() {
            if filled == 0 {
                return Err(fault(PlatformCode::NONE));
            }
            break;
        }
        buffer.resize(filled + chunk, 0);

        let cursor = address.saturating_add(filled as u64);
        match session.read(cursor, &mut buffer[filled..]) {
            Ok(transferred) if transferred > 0 => {
                let transferred = transferred.min(chunk);
                buffer.truncate(filled + transferred);
                if transferred < chunk {
                    break;
                }
            }
            result => {
                buffer.truncate(filled);
                if filled == 0 {
                    return Err(fault(result.err().unwrap_or(PlatformCode::NONE)));
                }
                trace!("read stopped at {} after {} bytes", cursor, filled);
                break;
            }
        }
    }

    trace!("read {} of {} bytes at {}", buffer.len(), len, address);
    Ok(buffer)
}

/// Reads byte ranges from a process
pub struct MemoryReader<B: IntrospectionBackend> {
    backend: B,
}

impl<B: IntrospectionBackend> MemoryReader<B> {
    /// Create a new reader on a backend
    pub fn new(backend: B) -> Self {
        MemoryReader { backend }
    }

    /// Reads up to `size` bytes at `address`
    ///
    /// A zero size returns an empty buffer without touching the process. A
    /// short read is success and yields a shorter buffer; a range that would
    /// run past the top of the address space is clamped first. The process
    /// is opened before any buffer is allocated, so an unknown pid fails with
    /// `AcquisitionFailed` whatever the size.
    pub fn read(&self, pid: ProcessId, address: Address, size: usize) -> IntrospectResult<Vec<u8>> {
        if size == 0 {
            return Ok(Vec::new());
        }

        let session = self
            .backend
            .open_process(pid, ProcessAccess::query_and_read())?;
        debug!("opened process {} for read at {}", pid, address);

        read_chunked(&session, address, clamp_to_address_space(address, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::UnsupportedBackend;

    #[test]
    fn test_clamp_leaves_ordinary_ranges_alone() {
        assert_eq!(clamp_to_address_space(Address::new(0x1000), 64), 64);
        assert_eq!(clamp_to_address_space(Address::null(), usize::MAX), usize::MAX);
    }

    #[test]
    fn test_unknown_pid_wins_over_huge_size() {
        let err = MemoryReader::new(UnsupportedBackend)
            .read(1, Address::null(), usize::MAX)
            .unwrap_err();
        assert_eq!(err.kind(), "AcquisitionFailed");
    }

    #[test]
    fn test_clamp_at_top_of_address_space() {
        assert_eq!(clamp_to_address_space(Address::MAX, 16), 1);
        assert_eq!(clamp_to_address_space(Address::new(u64::MAX - 3), 16), 4);
        assert_eq!(clamp_to_address_space(Address::new(u64::MAX - 3), 4), 4);
    }
}
