//! Virtual address wrapper with checked range arithmetic

use super::error::{IntrospectError, IntrospectResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A virtual address in the target process
///
/// Always 64 bits wide regardless of the host pointer width, so 32-bit and
/// 64-bit targets share the same arithmetic.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Address(u64);

impl Address {
    /// Highest representable address
    pub const MAX: Address = Address(u64::MAX);

    /// Creates a new address from a raw value
    pub const fn new(value: u64) -> Self {
        Address(value)
    }

    /// Creates a null address (0x0)
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks if the address is null
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns the raw value
    pub const fn as_u64(&self) -> u64 {
        self.0
    }

    /// Adds an offset, returning `None` on wrap-around
    pub const fn checked_add(&self, offset: u64) -> Option<Self> {
        match self.0.checked_add(offset) {
            Some(value) => Some(Address(value)),
            None => None,
        }
    }

    /// Adds an offset, stopping at [`Address::MAX`]
    pub const fn saturating_add(&self, offset: u64) -> Self {
        Address(self.0.saturating_add(offset))
    }

    /// Number of bytes from `self` up to `other`, or `None` if `other` is below `self`
    pub const fn distance_to(&self, other: Address) -> Option<u64> {
        other.0.checked_sub(self.0)
    }

    /// Returns true if `address` lies in `[self, self + size)`
    pub fn contains(&self, size: u64, address: Address) -> bool {
        match address.0.checked_sub(self.0) {
            Some(delta) => delta < size,
            None => false,
        }
    }

    /// Returns true if `[self, self + size)` and `[other, other + other_size)` share a byte
    pub fn overlaps(&self, size: u64, other: Address, other_size: u64) -> bool {
        if size == 0 || other_size == 0 {
            return false;
        }
        self.contains(size, other) || other.contains(other_size, *self)
    }

    /// Converts to a host pointer-sized value, if it fits
    pub fn to_usize(&self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl FromStr for Address {
    type Err = IntrospectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        let value = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u64::from_str_radix(hex, 16)
        } else if s.chars().any(|c| c.is_ascii_alphabetic()) {
            u64::from_str_radix(s, 16)
        } else {
            s.parse::<u64>()
        };

        value
            .map(Address::new)
            .map_err(|_| IntrospectError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016x}", self.0)
    }
}

impl From<u64> for Address {
    fn from(value: u64) -> Self {
        Address::new(value)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Address::new(value as u64)
    }
}

impl From<Address> for u64 {
    fn from(address: Address) -> Self {
        address.0
    }
}

/// Parses an address argument, accepting `0x` hex, bare hex or decimal
pub fn parse_address(s: &str) -> IntrospectResult<Address> {
    s.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_parsing() {
        assert_eq!(Address::from_str("0x1000").unwrap(), Address::new(0x1000));
        assert_eq!(Address::from_str("0X1000").unwrap(), Address::new(0x1000));
        assert_eq!(
            Address::from_str("DEADBEEF").unwrap(),
            Address::new(0xDEADBEEF)
        );
        assert_eq!(Address::from_str("4096").unwrap(), Address::new(4096));
        assert!(Address::from_str("0xZZ").is_err());
        assert!(parse_address("").is_err());
    }

    #[test]
    fn test_checked_add() {
        let addr = Address::new(0x1000);
        assert_eq!(addr.checked_add(0x10), Some(Address::new(0x1010)));
        assert_eq!(Address::MAX.checked_add(1), None);
        assert_eq!(Address::new(u64::MAX - 1).saturating_add(8), Address::MAX);
    }

    #[test]
    fn test_contains_is_half_open() {
        let base = Address::new(0x1000);
        assert!(base.contains(0x1000, Address::new(0x1000)));
        assert!(base.contains(0x1000, Address::new(0x1FFF)));
        assert!(!base.contains(0x1000, Address::new(0x2000)));
        assert!(!base.contains(0x1000, Address::new(0x0FFF)));
        assert!(!base.contains(0, base));
    }

    #[test]
    fn test_contains_near_top_of_address_space() {
        let base = Address::new(u64::MAX - 0xFFF);
        assert!(base.contains(0x1000, Address::MAX));
    }

    #[test]
    fn test_overlaps() {
        let a = Address::new(0x1000);
        assert!(a.overlaps(0x1000, Address::new(0x1800), 0x1000));
        assert!(Address::new(0x1800).overlaps(0x1000, a, 0x1000));
        assert!(!a.overlaps(0x1000, Address::new(0x2000), 0x1000));
        assert!(!a.overlaps(0, a, 0x1000));
    }

    #[test]
    fn test_distance_to() {
        let a = Address::new(0x1000);
        assert_eq!(a.distance_to(Address::new(0x1800)), Some(0x800));
        assert_eq!(a.distance_to(Address::new(0x800)), None);
    }

    #[test]
    fn test_address_display() {
        let addr = Address::new(0xDEADBEEF);
        assert_eq!(format!("{}", addr), "0x00000000DEADBEEF");
        assert_eq!(format!("{:x}", addr), "0x00000000deadbeef");
    }
}
