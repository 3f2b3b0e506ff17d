//! KNX Individual Address implementation.
//!
//! Individual (physical) addresses identify devices on the KNX bus.
//! Format: Area.Line.Device (e.g., 1.1.5)
//! - Area: 0-15 (4 bits)
//! - Line: 0-15 (4 bits)
//! - Device: 0-255 (8 bits)

use crate::error::{KnxError, Result};
use core::fmt;

/// Pack an individual address into its 16-bit wire form.
///
/// `area` and `line` are masked to 4 bits each instead of being rejected.
/// Use [`IndividualAddress::new`] when out-of-range input must be an error.
#[inline]
pub const fn pack_individual_address(area: u8, line: u8, device: u8) -> u16 {
    ((area as u16 & 0x0F) << 12) | ((line as u16 & 0x0F) << 8) | device as u16
}

/// Split a 16-bit individual address into `(area, line, device)`.
#[inline]
pub const fn unpack_individual_address(raw: u16) -> (u8, u8, u8) {
    (
        ((raw >> 12) & 0x0F) as u8,
        ((raw >> 8) & 0x0F) as u8,
        (raw & 0xFF) as u8,
    )
}

/// KNX Individual Address (Area.Line.Device)
///
/// Used to identify physical devices on the KNX bus.
///
/// # Examples
///
/// ```
/// use knx_ipcore::IndividualAddress;
///
/// // Create from components
/// let addr = IndividualAddress::new(1, 1, 5).unwrap();
/// assert_eq!(addr.to_string(), "1.1.5");
///
/// // Create from raw u16
/// let addr = IndividualAddress::from(0x1105u16);
/// assert_eq!(addr.parts(), (1, 1, 5));
///
/// // Parse from string
/// let addr: IndividualAddress = "1.1.5".parse().unwrap();
/// assert_eq!(u16::from(addr), 0x1105);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndividualAddress {
    raw: u16,
}

/// KNX documentation also calls these physical addresses.
pub type PhysicalAddress = IndividualAddress;

impl IndividualAddress {
    /// Maximum area value (4 bits)
    pub const MAX_AREA: u8 = 15;
    /// Maximum line value (4 bits)
    pub const MAX_LINE: u8 = 15;
    /// Maximum device value (8 bits)
    pub const MAX_DEVICE: u8 = 255;

    /// Create a new Individual Address from components.
    ///
    /// # Arguments
    ///
    /// * `area` - Area (0-15)
    /// * `line` - Line (0-15)
    /// * `device` - Device (0-255)
    ///
    /// # Errors
    ///
    /// Returns an addressing error if any component is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use knx_ipcore::IndividualAddress;
    ///
    /// let addr = IndividualAddress::new(1, 1, 5)?;
    /// assert_eq!(addr.to_string(), "1.1.5");
    /// # Ok::<(), knx_ipcore::KnxError>(())
    /// ```
    pub fn new(area: u8, line: u8, device: u8) -> Result<Self> {
        if area > Self::MAX_AREA || line > Self::MAX_LINE {
            return Err(KnxError::address_out_of_range());
        }
        Ok(Self::from_parts(area, line, device))
    }

    /// Create an address, masking each component to its bit width.
    #[inline]
    pub const fn from_parts(area: u8, line: u8, device: u8) -> Self {
        Self {
            raw: pack_individual_address(area, line, device),
        }
    }

    /// Get the raw u16 representation of the address.
    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Get `(area, line, device)`.
    #[inline(always)]
    pub const fn parts(self) -> (u8, u8, u8) {
        unpack_individual_address(self.raw)
    }

    /// Get the area component (0-15).
    #[inline(always)]
    pub const fn area(self) -> u8 {
        self.parts().0
    }

    /// Get the line component (0-15).
    #[inline(always)]
    pub const fn line(self) -> u8 {
        self.parts().1
    }

    /// Get the device component (0-255).
    #[inline(always)]
    pub const fn device(self) -> u8 {
        self.parts().2
    }

    /// Encode the address into a byte buffer (big-endian).
    ///
    /// # Errors
    ///
    /// Returns a buffer error if `buf` is shorter than 2 bytes.
    #[inline]
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let dst = buf.get_mut(..2).ok_or_else(KnxError::buffer_too_small)?;
        dst.copy_from_slice(&self.raw.to_be_bytes());
        Ok(2)
    }

    /// Decode an address from a byte buffer (big-endian).
    ///
    /// # Errors
    ///
    /// Returns a buffer error if `buf` is shorter than 2 bytes.
    #[inline]
    pub fn decode(buf: &[u8]) -> Result<Self> {
        match buf {
            [hi, lo, ..] => Ok(Self {
                raw: u16::from_be_bytes([*hi, *lo]),
            }),
            _ => Err(KnxError::buffer_too_small()),
        }
    }
}

impl fmt::Display for IndividualAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.area(), self.line(), self.device())
    }
}

impl From<u16> for IndividualAddress {
    #[inline(always)]
    fn from(raw: u16) -> Self {
        Self { raw }
    }
}

impl From<IndividualAddress> for u16 {
    #[inline(always)]
    fn from(addr: IndividualAddress) -> u16 {
        addr.raw
    }
}

impl core::str::FromStr for IndividualAddress {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('.');
        let mut next = || {
            parts
                .next()
                .and_then(|s| s.parse::<u8>().ok())
                .ok_or_else(KnxError::invalid_individual_address)
        };

        let area = next()?;
        let line = next()?;
        let device = next()?;

        if parts.next().is_some() {
            return Err(KnxError::invalid_individual_address());
        }

        Self::new(area, line, device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let addr = IndividualAddress::new(1, 2, 3).unwrap();
        assert_eq!(addr.area(), 1);
        assert_eq!(addr.line(), 2);
        assert_eq!(addr.device(), 3);
    }

    #[test]
    fn test_new_invalid_area() {
        assert!(IndividualAddress::new(16, 0, 0).is_err());
    }

    #[test]
    fn test_new_invalid_line() {
        assert!(IndividualAddress::new(0, 16, 0).is_err());
    }

    #[test]
    fn test_pack_known_values() {
        assert_eq!(pack_individual_address(1, 1, 250), 0x11FA);
        assert_eq!(pack_individual_address(1, 2, 3), 0x1203);
        assert_eq!(pack_individual_address(15, 15, 255), 0xFFFF);
    }

    #[test]
    fn test_pack_masks_out_of_range() {
        assert_eq!(pack_individual_address(0x11, 0x12, 3), pack_individual_address(1, 2, 3));
    }

    #[test]
    fn test_round_trip_all_components() {
        for area in 0..=IndividualAddress::MAX_AREA {
            for line in 0..=IndividualAddress::MAX_LINE {
                for device in 0..=IndividualAddress::MAX_DEVICE {
                    let raw = pack_individual_address(area, line, device);
                    assert_eq!(unpack_individual_address(raw), (area, line, device));
                }
            }
        }
    }

    #[test]
    fn test_physical_alias() {
        let addr: PhysicalAddress = IndividualAddress::from_parts(1, 1, 0);
        assert_eq!(addr.raw(), 0x1100);
    }

    #[test]
    fn test_encode_decode() {
        let addr = IndividualAddress::new(15, 15, 255).unwrap();
        let mut buf = [0u8; 2];
        addr.encode(&mut buf).unwrap();
        assert_eq!(IndividualAddress::decode(&buf).unwrap(), addr);
    }

    #[test]
    fn test_display() {
        let addr = IndividualAddress::new(1, 2, 3).unwrap();
        assert_eq!(format!("{}", addr), "1.2.3");
    }

    #[test]
    fn test_from_str() {
        let addr: IndividualAddress = "1.2.3".parse().unwrap();
        assert_eq!(addr.parts(), (1, 2, 3));
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("1.2".parse::<IndividualAddress>().is_err());
        assert!("16.0.0".parse::<IndividualAddress>().is_err());
        assert!("1.2.3.4".parse::<IndividualAddress>().is_err());
        assert!("a.b.c".parse::<IndividualAddress>().is_err());
        assert!("".parse::<IndividualAddress>().is_err());
    }
}
