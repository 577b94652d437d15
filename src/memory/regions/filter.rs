//! Memory region filtering functionality

use crate::core::types::{Address, MemoryRegion, RegionType};

/// Criteria for filtering memory regions
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Filter by minimum size
    pub min_size: Option<u64>,
    /// Filter by type
    pub region_type: Option<RegionType>,
    /// Filter by readable regions only
    pub readable_only: bool,
    /// Filter by writable regions only
    pub writable_only: bool,
    /// Filter by executable regions only
    pub executable_only: bool,
    /// Keep only regions overlapping this half-open range
    pub address_range: Option<(Address, Address)>,
    /// Exclude guarded pages
    pub exclude_guarded: bool,
}

impl FilterCriteria {
    /// Create a new filter criteria builder
    pub fn new() -> Self {
        FilterCriteria::default()
    }

    /// Set minimum size filter
    pub fn with_min_size(mut self, size: u64) -> Self {
        self.min_size = Some(size);
        self
    }

    /// Set type filter
    pub fn with_type(mut self, region_type: RegionType) -> Self {
        self.region_type = Some(region_type);
        self
    }

    /// Filter for readable regions only
    pub fn readable(mut self) -> Self {
        self.readable_only = true;
        self
    }

    /// Filter for writable regions only
    pub fn writable(mut self) -> Self {
        self.writable_only = true;
        self
    }

    /// Filter for executable regions only
    pub fn executable(mut self) -> Self {
        self.executable_only = true;
        self
    }

    /// Set address range filter
    pub fn with_address_range(mut self, start: Address, end: Address) -> Self {
        self.address_range = Some((start, end));
        self
    }

    /// Exclude guarded pages
    pub fn exclude_guarded_pages(mut self) -> Self {
        self.exclude_guarded = true;
        self
    }

    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.min_size.is_none()
            && self.region_type.is_none()
            && !self.readable_only
            && !self.writable_only
            && !self.executable_only
            && self.address_range.is_none()
            && !self.exclude_guarded
    }
}

/// Filter for memory regions
pub struct RegionFilter {
    criteria: FilterCriteria,
}

impl RegionFilter {
    /// Create a new region filter with the given criteria
    pub fn new(criteria: FilterCriteria) -> Self {
        RegionFilter { criteria }
    }

    /// Apply the filter to a list of regions, keeping their order
    pub fn apply(&self, regions: &[MemoryRegion]) -> Vec<MemoryRegion> {
        regions
            .iter()
            .filter(|region| self.matches(region))
            .copied()
            .collect()
    }

    /// Check if a region matches the filter criteria
    pub fn matches(&self, region: &MemoryRegion) -> bool {
        if let Some(min) = self.criteria.min_size {
            if region.size < min {
                return false;
            }
        }

        if let Some(region_type) = self.criteria.region_type {
            if region.region_type != region_type {
                return false;
            }
        }

        if self.criteria.readable_only && !region.is_readable() {
            return false;
        }

        if self.criteria.writable_only && !region.is_writable() {
            return false;
        }

        if self.criteria.executable_only && !region.is_executable() {
            return false;
        }

        if let Some((start, end)) = self.criteria.address_range {
            let Some(len) = start.distance_to(end) else {
                return false;
            };
            if !region.base_address.overlaps(region.size, start, len) {
                return false;
            }
        }

        if self.criteria.exclude_guarded && region.is_guarded() {
            return false;
        }

        true
    }

    /// Get total size of regions matching the filter
    pub fn total_size(&self, regions: &[MemoryRegion]) -> u64 {
        regions
            .iter()
            .filter(|region| self.matches(region))
            .fold(0u64, |total, region| total.saturating_add(region.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{PageAccess, Protection, RegionState};

    fn region(base: u64, size: u64, access: PageAccess, region_type: RegionType) -> MemoryRegion {
        MemoryRegion {
            base_address: Address::new(base),
            size,
            protection: Protection::new(access),
            region_type,
            state: RegionState::Committed,
        }
    }

    #[test]
    fn test_filter_criteria_builder() {
        let criteria = FilterCriteria::new()
            .with_min_size(4096)
            .readable()
            .writable()
            .exclude_guarded_pages();

        assert_eq!(criteria.min_size, Some(4096));
        assert!(criteria.readable_only);
        assert!(criteria.writable_only);
        assert!(criteria.exclude_guarded);
        assert!(!criteria.is_empty());
        assert!(FilterCriteria::new().is_empty());
    }

    #[test]
    fn test_region_filter_matching() {
        let data = region(0x1000, 8192, PageAccess::ReadWrite, RegionType::Private);

        let filter = RegionFilter::new(FilterCriteria::new().with_min_size(4096).readable());
        assert!(filter.matches(&data));

        let filter = RegionFilter::new(FilterCriteria::new().executable());
        assert!(!filter.matches(&data));

        let filter = RegionFilter::new(FilterCriteria::new().with_type(RegionType::Image));
        assert!(!filter.matches(&data));
    }

    #[test]
    fn test_guard_pages() {
        let mut guarded = region(0x1000, 0x1000, PageAccess::ReadWrite, RegionType::Private);
        guarded.protection.guard = true;

        let filter = RegionFilter::new(FilterCriteria::new().exclude_guarded_pages());
        assert!(!filter.matches(&guarded));

        // guard pages are not readable even with read access
        let filter = RegionFilter::new(FilterCriteria::new().readable());
        assert!(!filter.matches(&guarded));
    }

    #[test]
    fn test_address_range_and_total_size() {
        let regions = [
            region(0x1000, 0x1000, PageAccess::Read, RegionType::Image),
            region(0x3000, 0x1000, PageAccess::ExecuteRead, RegionType::Image),
            region(0x8000, 0x2000, PageAccess::ReadWrite, RegionType::Private),
        ];

        let filter = RegionFilter::new(
            FilterCriteria::new().with_address_range(Address::new(0x1800), Address::new(0x3001)),
        );
        let kept = filter.apply(&regions);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].base_address, Address::new(0x3000));

        let filter = RegionFilter::new(FilterCriteria::new().with_type(RegionType::Image));
        assert_eq!(filter.total_size(&regions), 0x2000);
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let data = region(0x1000, 0x1000, PageAccess::Read, RegionType::Private);
        let filter = RegionFilter::new(
            FilterCriteria::new().with_address_range(Address::new(0x2000), Address::new(0x1000)),
        );
        assert!(!filter.matches(&data));
    }
}
