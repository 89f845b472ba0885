// src/common/address.rs

use super::error::LookupError;
use core::convert::TryFrom;
use core::fmt;

/// A validated 7-bit I2C address in the range the EZO firmware accepts (1..=127).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct I2cAddr(u8);

impl I2cAddr {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 127;

    /// Creates a new `I2cAddr` if `raw` lies in `MIN..=MAX`.
    pub fn new(raw: u8) -> Result<Self, LookupError> {
        if Self::is_valid(raw) {
            Ok(I2cAddr(raw))
        } else {
            Err(LookupError::InvalidSelector)
        }
    }

    /// Internal constructor for addresses known to be in range (factory defaults, scan loops).
    #[inline]
    pub(crate) const fn new_unchecked(raw: u8) -> Self {
        debug_assert!(Self::is_valid(raw));
        I2cAddr(raw)
    }

    #[inline]
    pub const fn as_u8(&self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_valid(raw: u8) -> bool {
        matches!(raw, Self::MIN..=Self::MAX)
    }

    /// Every address a module can live on, lowest first.
    pub fn all() -> impl Iterator<Item = I2cAddr> {
        (Self::MIN..=Self::MAX).map(I2cAddr)
    }
}

impl TryFrom<u8> for I2cAddr {
    type Error = LookupError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<I2cAddr> for u8 {
    fn from(value: I2cAddr) -> Self {
        value.0
    }
}

impl fmt::Display for I2cAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        assert!(I2cAddr::new(1).is_ok());
        assert!(I2cAddr::new(99).is_ok());
        assert!(I2cAddr::new(127).is_ok());
    }

    #[test]
    fn test_invalid_addresses() {
        assert_eq!(I2cAddr::new(0), Err(LookupError::InvalidSelector));
        assert_eq!(I2cAddr::new(128), Err(LookupError::InvalidSelector));
        assert_eq!(I2cAddr::new(255), Err(LookupError::InvalidSelector));
    }

    #[test]
    fn test_try_from_and_into() {
        let addr = I2cAddr::try_from(102u8).unwrap();
        assert_eq!(addr.as_u8(), 102);
        let raw: u8 = addr.into();
        assert_eq!(raw, 102);
        assert!(I2cAddr::try_from(200u8).is_err());
    }

    #[test]
    fn test_all_covers_full_range() {
        let mut iter = I2cAddr::all();
        assert_eq!(iter.next().map(|a| a.as_u8()), Some(1));
        assert_eq!(iter.last().map(|a| a.as_u8()), Some(127));
        assert_eq!(I2cAddr::all().count(), 127);
    }

    #[test]
    fn test_display() {
        let addr = I2cAddr::new(97).unwrap();
        assert_eq!(std::format!("{}", addr), "97");
    }
}
