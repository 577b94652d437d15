//! Memory region enumeration functionality

use crate::backend::{IntrospectionBackend, ProcessAccess, ProcessSession};
use crate::core::types::{
    Address, IntrospectResult, MemoryRegion, ProcessId, RegionQuery, RegionState,
};
use tracing::{debug, trace, warn};

/// Iterator over every region of an address space, committed or not
///
/// Starts at address 0 and advances to `base + size` after each answer. Ends
/// when the session stops answering, a region reports zero size, or the next
/// address would wrap past the top of the address space.
pub struct RegionWalk<'a, S: ProcessSession> {
    session: &'a S,
    next_address: Option<Address>,
}

impl<'a, S: ProcessSession> RegionWalk<'a, S> {
    /// Create a walk starting at address 0
    pub fn new(session: &'a S) -> Self {
        RegionWalk {
            session,
            next_address: Some(Address::null()),
        }
    }
}

impl<S: ProcessSession> Iterator for RegionWalk<'_, S> {
    type Item = RegionQuery;

    fn next(&mut self) -> Option<RegionQuery> {
        let address = self.next_address.take()?;
        let query = self.session.query_region(address)?;
        trace!(
            "region {} +0x{:x} {} {}",
            query.base_address,
            query.size,
            query.state,
            query.protection
        );

        if query.size == 0 {
            warn!("zero-size region reported at {}, ending walk", query.base_address);
            return None;
        }

        match query.base_address.checked_add(query.size) {
            Some(next) if next > address => self.next_address = Some(next),
            Some(next) => {
                warn!("region walk stalled at {} (next {})", address, next);
            }
            None => {
                debug!("region at {} reaches the top of the address space", query.base_address);
            }
        }

        Some(query)
    }
}

/// Collects the committed regions of an open session
pub fn committed_regions<S: ProcessSession>(session: &S) -> Vec<MemoryRegion> {
    RegionWalk::new(session)
        .filter(|query| query.state == RegionState::Committed)
        .map(|query| MemoryRegion {
            base_address: query.base_address,
            size: query.size,
            protection: query.protection,
            region_type: query.region_type,
            state: query.state,
        })
        .collect()
}

/// Enumerates committed memory regions of a process
pub struct MemoryRegionEnumerator<B: IntrospectionBackend> {
    backend: B,
}

impl<B: IntrospectionBackend> MemoryRegionEnumerator<B> {
    /// Create a new enumerator on a backend
    pub fn new(backend: B) -> Self {
        MemoryRegionEnumerator { backend }
    }

    /// Walks the whole address space of `pid` and returns its committed regions
    ///
    /// Regions come back in strictly ascending, non-overlapping order. A walk
    /// always starts from address 0.
    pub fn enumerate(&self, pid: ProcessId) -> IntrospectResult<Vec<MemoryRegion>> {
        let session = self
            .backend
            .open_process(pid, ProcessAccess::query_and_read())?;
        debug!("opened process {} for region walk", session.pid());

        let regions = committed_regions(&session);
        debug!("process {}: {} committed regions", pid, regions.len());
        Ok(regions)
    }
}
