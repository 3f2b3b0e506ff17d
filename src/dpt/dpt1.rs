//! DPT 1.xxx - Boolean (1-bit)
//!
//! Boolean datapoint types carry a single bit. On the wire the bit is not a
//! separate data byte: it is merged into the low 6 bits of the APCI byte
//! ("short data"), so a group write of `true` is `[0x00, 0x81]`.
//!
//! ## Common Subtypes
//!
//! - **1.001** - Switch (off/on)
//! - **1.002** - Bool (false/true)
//! - **1.003** - Enable (disable/enable)
//! - **1.008** - UpDown (up/down)
//! - **1.009** - OpenClose (open/close)
//!
//! ## Example
//!
//! ```rust
//! use knx_ipcore::dpt::{Dpt1, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 1];
//! Dpt1::Switch.encode(true, &mut buf)?;
//! assert_eq!(buf, [0x01]);
//! assert!(Dpt1::Switch.decode(&buf)?);
//! # Ok::<(), knx_ipcore::KnxError>(())
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// DPT 1.xxx Boolean types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt1 {
    /// DPT 1.001 - Switch (off/on)
    Switch,
    /// DPT 1.002 - Bool (false/true)
    Bool,
    /// DPT 1.003 - Enable (disable/enable)
    Enable,
    /// DPT 1.004 - Ramp (no ramp/ramp)
    Ramp,
    /// DPT 1.005 - Alarm (no alarm/alarm)
    Alarm,
    /// DPT 1.006 - BinaryValue (low/high)
    BinaryValue,
    /// DPT 1.007 - Step (decrease/increase)
    Step,
    /// DPT 1.008 - UpDown (up/down)
    UpDown,
    /// DPT 1.009 - OpenClose (open/close)
    OpenClose,
    /// DPT 1.010 - Start (stop/start)
    Start,
    /// DPT 1.011 - State (inactive/active)
    State,
    /// DPT 1.012 - Invert (not inverted/inverted)
    Invert,
}

/// Only the LSB of the short data carries the value.
#[inline]
pub const fn bit(short_data: u8) -> bool {
    short_data & 0x01 != 0
}

impl Dpt1 {
    /// Get the DPT identifier string (e.g., "1.001")
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt1::Switch => "1.001",
            Dpt1::Bool => "1.002",
            Dpt1::Enable => "1.003",
            Dpt1::Ramp => "1.004",
            Dpt1::Alarm => "1.005",
            Dpt1::BinaryValue => "1.006",
            Dpt1::Step => "1.007",
            Dpt1::UpDown => "1.008",
            Dpt1::OpenClose => "1.009",
            Dpt1::Start => "1.010",
            Dpt1::State => "1.011",
            Dpt1::Invert => "1.012",
        }
    }

    /// Semantic labels as `(false_label, true_label)`.
    pub const fn labels(&self) -> (&'static str, &'static str) {
        match self {
            Dpt1::Switch => ("off", "on"),
            Dpt1::Bool => ("false", "true"),
            Dpt1::Enable => ("disable", "enable"),
            Dpt1::Ramp => ("no ramp", "ramp"),
            Dpt1::Alarm => ("no alarm", "alarm"),
            Dpt1::BinaryValue => ("low", "high"),
            Dpt1::Step => ("decrease", "increase"),
            Dpt1::UpDown => ("up", "down"),
            Dpt1::OpenClose => ("open", "close"),
            Dpt1::Start => ("stop", "start"),
            Dpt1::State => ("inactive", "active"),
            Dpt1::Invert => ("not inverted", "inverted"),
        }
    }

    /// Label for a concrete value.
    pub const fn label(&self, value: bool) -> &'static str {
        let (off, on) = self.labels();
        if value {
            on
        } else {
            off
        }
    }
}

impl DptEncode<bool> for Dpt1 {
    fn encode(&self, value: bool, buf: &mut [u8]) -> Result<usize> {
        let dst = buf.first_mut().ok_or_else(KnxError::buffer_too_small)?;
        *dst = u8::from(value);
        Ok(1)
    }
}

impl DptDecode<bool> for Dpt1 {
    fn decode(&self, data: &[u8]) -> Result<bool> {
        data.first()
            .map(|&b| bit(b))
            .ok_or_else(KnxError::invalid_dpt_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_false() {
        let mut buf = [0xFFu8; 1];
        assert_eq!(Dpt1::Switch.encode(false, &mut buf).unwrap(), 1);
        assert_eq!(buf, [0x00]);
    }

    #[test]
    fn test_encode_true() {
        let mut buf = [0u8; 1];
        Dpt1::Switch.encode(true, &mut buf).unwrap();
        assert_eq!(buf, [0x01]);
    }

    #[test]
    fn test_encode_empty_buffer() {
        let result = Dpt1::Switch.encode(true, &mut []);
        assert!(matches!(result, Err(KnxError::Buffer(_))));
    }

    #[test]
    fn test_decode_ignores_upper_bits() {
        assert!(Dpt1::Switch.decode(&[0xFF]).unwrap());
        assert!(!Dpt1::Switch.decode(&[0xFE]).unwrap());
        assert!(Dpt1::Switch.decode(&[0x81]).unwrap());
    }

    #[test]
    fn test_decode_empty() {
        let result = Dpt1::Switch.decode(&[]);
        assert!(matches!(result, Err(KnxError::Dpt(ref e)) if e.is_invalid_data()));
    }

    #[test]
    fn test_identifiers_and_labels() {
        assert_eq!(Dpt1::Switch.identifier(), "1.001");
        assert_eq!(Dpt1::UpDown.identifier(), "1.008");
        assert_eq!(Dpt1::Switch.labels(), ("off", "on"));
        assert_eq!(Dpt1::OpenClose.label(true), "close");
        assert_eq!(Dpt1::Enable.label(false), "disable");
    }
}
