//! KNX Group Address implementation.
//!
//! Group addresses represent logical groupings of devices for functional control.
//! Two formats are supported:
//! - 2-level: Main/Sub (e.g., 1/234)
//! - 3-level: Main/Middle/Sub (e.g., 1/2/3) - most common
//!
//! Internally stored as 16 bits:
//! - Main: 5 bits (0-31)
//! - Middle: 3 bits (0-7)
//! - Sub: 8 bits (0-255)

use crate::error::{KnxError, Result};
use core::fmt;

/// Pack a 3-level group address into its 16-bit wire form.
///
/// Each component is masked to its bit width (`main` to 5 bits, `middle` to
/// 3 bits) rather than rejected, so `pack_group_address(33, 9, 1)` is the
/// same as `pack_group_address(1, 1, 1)`. Use [`GroupAddress::new`] when
/// out-of-range input must be an error.
#[inline]
pub const fn pack_group_address(main: u8, middle: u8, sub: u8) -> u16 {
    ((main as u16 & 0x1F) << 11) | ((middle as u16 & 0x07) << 8) | sub as u16
}

/// Split a 16-bit group address into `(main, middle, sub)`.
#[inline]
pub const fn unpack_group_address(raw: u16) -> (u8, u8, u8) {
    (
        ((raw >> 11) & 0x1F) as u8,
        ((raw >> 8) & 0x07) as u8,
        (raw & 0xFF) as u8,
    )
}

/// KNX Group Address
///
/// Used for logical grouping of devices and functions.
///
/// # Examples
///
/// ```
/// use knx_ipcore::GroupAddress;
///
/// // Create 3-level address
/// let addr = GroupAddress::new(1, 2, 3).unwrap();
/// assert_eq!(addr.to_string(), "1/2/3");
///
/// // Create 2-level address
/// let addr = GroupAddress::new_2level(1, 234).unwrap();
/// assert_eq!(addr.to_string_2level(), "1/234");
///
/// // Create from raw u16
/// let addr = GroupAddress::from(0x0A03u16);
/// assert_eq!(addr.parts(), (1, 2, 3));
///
/// // Parse from string (auto-detects format)
/// let addr: GroupAddress = "1/2/3".parse().unwrap();
/// assert_eq!(u16::from(addr), 0x0A03);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupAddress {
    raw: u16,
}

impl GroupAddress {
    /// Maximum main group value (5 bits)
    pub const MAX_MAIN: u8 = 31;
    /// Maximum middle group value (3 bits)
    pub const MAX_MIDDLE: u8 = 7;
    /// Maximum sub group value (8 bits)
    pub const MAX_SUB: u8 = 255;
    /// Maximum sub value for 2-level format (11 bits)
    pub const MAX_SUB_2LEVEL: u16 = 2047;

    /// Create a new 3-level Group Address (Main/Middle/Sub).
    ///
    /// # Arguments
    ///
    /// * `main` - Main group (0-31)
    /// * `middle` - Middle group (0-7)
    /// * `sub` - Sub group (0-255)
    ///
    /// # Errors
    ///
    /// Returns an addressing error if any component is out of range.
    pub fn new(main: u8, middle: u8, sub: u8) -> Result<Self> {
        if main > Self::MAX_MAIN || middle > Self::MAX_MIDDLE {
            return Err(KnxError::address_out_of_range());
        }
        Ok(Self::from_parts(main, middle, sub))
    }

    /// Create a 3-level address, masking each component to its bit width.
    ///
    /// Never fails; see [`pack_group_address`].
    #[inline]
    pub const fn from_parts(main: u8, middle: u8, sub: u8) -> Self {
        Self {
            raw: pack_group_address(main, middle, sub),
        }
    }

    /// Create a new 2-level Group Address (Main/Sub).
    ///
    /// # Arguments
    ///
    /// * `main` - Main group (0-31)
    /// * `sub` - Sub group (0-2047)
    ///
    /// # Errors
    ///
    /// Returns an addressing error if any component is out of range.
    pub fn new_2level(main: u8, sub: u16) -> Result<Self> {
        if main > Self::MAX_MAIN {
            return Err(KnxError::address_out_of_range());
        }
        if sub > Self::MAX_SUB_2LEVEL {
            return Err(KnxError::address_out_of_range());
        }

        let raw = (u16::from(main) << 11) | sub;
        Ok(Self { raw })
    }

    /// Get the raw u16 representation of the address.
    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.raw
    }

    /// Get `(main, middle, sub)`.
    #[inline(always)]
    pub const fn parts(self) -> (u8, u8, u8) {
        unpack_group_address(self.raw)
    }

    /// Get the main group component (0-31).
    #[inline(always)]
    pub const fn main(self) -> u8 {
        self.parts().0
    }

    /// Get the middle group component for 3-level format (0-7).
    #[inline(always)]
    pub const fn middle(self) -> u8 {
        self.parts().1
    }

    /// Get the sub group component for 3-level format (0-255).
    #[inline(always)]
    pub const fn sub(self) -> u8 {
        self.parts().2
    }

    /// Get the sub group component for 2-level format (0-2047).
    #[inline(always)]
    pub const fn sub_2level(self) -> u16 {
        self.raw & 0x07FF
    }

    /// Format as 2-level string (Main/Sub).
    pub fn to_string_2level(&self) -> heapless::String<16> {
        use core::fmt::Write;
        let mut s = heapless::String::new();
        let _ = write!(s, "{}/{}", self.main(), self.sub_2level());
        s
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

impl From<u16> for GroupAddress {
    #[inline(always)]
    fn from(raw: u16) -> Self {
        Self { raw }
    }
}

impl From<GroupAddress> for u16 {
    #[inline(always)]
    fn from(addr: GroupAddress) -> u16 {
        addr.raw
    }
}

impl fmt::Display for GroupAddress {
    /// Format as 3-level address by default
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.main(), self.middle(), self.sub())
    }
}

impl core::str::FromStr for GroupAddress {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('/');

        let main = parts
            .next()
            .and_then(|s| s.parse::<u8>().ok())
            .ok_or_else(KnxError::invalid_group_address)?;

        let middle = parts
            .next()
            .and_then(|s| s.parse::<u16>().ok())
            .ok_or_else(KnxError::invalid_group_address)?;

        if let Some(sub_str) = parts.next() {
            // 3-level format: Main/Middle/Sub
            let sub = sub_str
                .parse::<u8>()
                .map_err(|_| KnxError::invalid_group_address())?;

            if parts.next().is_some() {
                return Err(KnxError::invalid_group_address());
            }

            let middle = u8::try_from(middle).map_err(|_| KnxError::invalid_group_address())?;
            Self::new(main, middle, sub)
        } else {
            // 2-level format: Main/Sub, the second part is the sub value
            Self::new_2level(main, middle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_3level_valid() {
        let addr = GroupAddress::new(1, 2, 3).unwrap();
        assert_eq!(addr.main(), 1);
        assert_eq!(addr.middle(), 2);
        assert_eq!(addr.sub(), 3);
    }

    #[test]
    fn test_new_3level_invalid_main() {
        assert!(GroupAddress::new(32, 0, 0).is_err());
    }

    #[test]
    fn test_new_3level_invalid_middle() {
        assert!(GroupAddress::new(0, 8, 0).is_err());
    }

    #[test]
    fn test_pack_known_values() {
        assert_eq!(pack_group_address(1, 2, 3), 0x0A03);
        assert_eq!(pack_group_address(1, 0, 1), 0x0801);
        assert_eq!(pack_group_address(3, 2, 1), 0x1A01);
        assert_eq!(pack_group_address(31, 7, 255), 0xFFFF);
    }

    #[test]
    fn test_pack_masks_out_of_range() {
        // 33 & 0x1F = 1, 9 & 0x07 = 1
        assert_eq!(pack_group_address(33, 9, 1), pack_group_address(1, 1, 1));
        assert_eq!(GroupAddress::from_parts(0xFF, 0xFF, 0xFF).raw(), 0xFFFF);
    }

    #[test]
    fn test_round_trip_all_components() {
        for main in 0..=GroupAddress::MAX_MAIN {
            for middle in 0..=GroupAddress::MAX_MIDDLE {
                for sub in 0..=GroupAddress::MAX_SUB {
                    let raw = pack_group_address(main, middle, sub);
                    assert_eq!(unpack_group_address(raw), (main, middle, sub));
                    let (m, mi, s) = unpack_group_address(raw);
                    assert_eq!(pack_group_address(m, mi, s), raw);
                }
            }
        }
    }

    #[test]
    fn test_new_2level_valid() {
        let addr = GroupAddress::new_2level(1, 234).unwrap();
        assert_eq!(addr.main(), 1);
        assert_eq!(addr.sub_2level(), 234);
    }

    #[test]
    fn test_new_2level_invalid() {
        assert!(GroupAddress::new_2level(0, 2048).is_err());
    }

    #[test]
    fn test_encode_decode() {
        let addr = GroupAddress::new(31, 7, 255).unwrap();
        let mut buf = [0u8; 2];
        addr.encode(&mut buf).unwrap();
        let decoded = GroupAddress::decode(&buf).unwrap();
        assert_eq!(addr, decoded);
    }

    #[test]
    fn test_encode_decode_short_buffer() {
        let addr = GroupAddress::new(1, 2, 3).unwrap();
        let mut buf = [0u8; 1];
        assert!(matches!(addr.encode(&mut buf), Err(KnxError::Buffer(_))));
        assert!(matches!(GroupAddress::decode(&[0x0A]), Err(KnxError::Buffer(_))));
        assert!(GroupAddress::decode(&[]).is_err());
    }

    #[test]
    fn test_display_3level() {
        let addr = GroupAddress::new(1, 2, 3).unwrap();
        assert_eq!(format!("{}", addr), "1/2/3");
    }

    #[test]
    fn test_from_str_3level() {
        let addr: GroupAddress = "1/2/3".parse().unwrap();
        assert_eq!(addr.parts(), (1, 2, 3));
    }

    #[test]
    fn test_from_str_2level() {
        let addr: GroupAddress = "1/234".parse().unwrap();
        assert_eq!(addr.main(), 1);
        assert_eq!(addr.sub_2level(), 234);
    }

    #[test]
    fn test_from_str_invalid() {
        assert!("1".parse::<GroupAddress>().is_err());
        assert!("32/0/0".parse::<GroupAddress>().is_err());
        assert!("1/2/3/4".parse::<GroupAddress>().is_err());
        assert!("a/b/c".parse::<GroupAddress>().is_err());
        assert!("".parse::<GroupAddress>().is_err());
        assert!("1/2048".parse::<GroupAddress>().is_err());
        assert!("1/300/1".parse::<GroupAddress>().is_err());
    }
}
