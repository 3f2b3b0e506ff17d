//! DPT 5.xxx - 8-bit Unsigned Value (1 byte)
//!
//! The wire value is always one unsigned byte following the APCI byte. Some
//! subtypes scale an engineering range onto `0..=255`.
//!
//! ## Common Subtypes
//!
//! - **5.001** - Percentage (0-100%)
//! - **5.003** - Angle (0-360°)
//! - **5.004** - Percentage 0-255 (0-255)
//! - **5.010** - Counter pulses (0-255)
//!
//! ## Example
//!
//! ```rust
//! use knx_ipcore::dpt::{Dpt5, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 1];
//! Dpt5::Percentage.encode(75, &mut buf)?;
//! assert_eq!(buf, [0xBF]);
//! assert_eq!(Dpt5::Percentage.decode(&buf)?, 75);
//! # Ok::<(), knx_ipcore::KnxError>(())
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 5.xxx 8-bit unsigned types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt5 {
    /// DPT 5.001 - Percentage (0-100%)
    Percentage,
    /// DPT 5.003 - Angle (0-360°)
    Angle,
    /// DPT 5.004 - Percentage 0-255 (0-255)
    PercentU8,
    /// DPT 5.005 - Ratio (0-255)
    Ratio,
    /// DPT 5.006 - Tariff (0-254)
    Tariff,
    /// DPT 5.010 - Counter pulses (0-255)
    Counter,
}

impl Dpt5 {
    /// Get the DPT identifier string (e.g., "5.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt5::Percentage => "5.001",
            Dpt5::Angle => "5.003",
            Dpt5::PercentU8 => "5.004",
            Dpt5::Ratio => "5.005",
            Dpt5::Tariff => "5.006",
            Dpt5::Counter => "5.010",
        }
    }

    /// Get the unit string for this DPT
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt5::Percentage => "%",
            Dpt5::Angle => "°",
            Dpt5::Counter => "pulses",
            Dpt5::PercentU8 | Dpt5::Ratio | Dpt5::Tariff => "",
        }
    }

    /// Valid engineering range as `(min, max)`.
    pub const fn range(&self) -> (u16, u16) {
        match self {
            Dpt5::Percentage => (0, 100),
            Dpt5::Angle => (0, 360),
            Dpt5::Tariff => (0, 254),
            Dpt5::PercentU8 | Dpt5::Ratio | Dpt5::Counter => (0, 255),
        }
    }

    /// Full-scale value for the scaled subtypes.
    const fn full_scale(&self) -> Option<u32> {
        match self {
            Dpt5::Percentage => Some(100),
            Dpt5::Angle => Some(360),
            _ => None,
        }
    }

    /// Map an engineering value to the raw byte, rounding to nearest.
    ///
    /// # Errors
    ///
    /// Returns a DPT value-out-of-range error above [`Dpt5::range`].
    pub fn encode_to_byte(&self, value: u16) -> Result<u8> {
        let (_, max) = self.range();
        if value > max {
            return Err(KnxError::dpt_value_out_of_range());
        }

        let raw = match self.full_scale() {
            Some(scale) => (u32::from(value) * 255 + scale / 2) / scale,
            None => u32::from(value),
        };
        Ok(raw as u8)
    }

    /// Map a raw byte back to the engineering value.
    pub fn decode_byte(&self, raw: u8) -> u16 {
        match self.full_scale() {
            Some(scale) => ((u32::from(raw) * scale + 127) / 255) as u16,
            None => u16::from(raw),
        }
    }
}

impl DptEncode<u16> for Dpt5 {
    fn encode(&self, value: u16, buf: &mut [u8]) -> Result<usize> {
        let dst = buf.first_mut().ok_or_else(KnxError::buffer_too_small)?;
        *dst = self.encode_to_byte(value)?;
        Ok(1)
    }
}

impl DptDecode<u16> for Dpt5 {
    fn decode(&self, data: &[u8]) -> Result<u16> {
        let raw = *data.first().ok_or_else(KnxError::invalid_dpt_data)?;
        if *self == Dpt5::Tariff && raw == 255 {
            return Err(KnxError::dpt_value_out_of_range());
        }
        Ok(self.decode_byte(raw))
    }
}
