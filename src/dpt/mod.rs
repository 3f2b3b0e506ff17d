//! KNX Datapoint Types (DPT)
//!
//! This module converts native values to application-layer payloads and back.
//!
//! ## Supported DPT Families
//!
//! - **DPT 1.xxx** - Boolean (1 bit): switches, buttons, binary sensors
//! - **DPT 5.xxx** - 8-bit unsigned: percentages, angles, counters
//! - **DPT 9.xxx** - 2-byte float: temperature, illuminance, pressure
//!
//! ## APDU layout
//!
//! A group value write always starts with two control bytes:
//!
//! ```text
//! Byte 0: TPCI (0x00, unnumbered data) | APCI bits 9-8 (0)
//! Byte 1: APCI bits 7-6 (0b10 = write) | 6 bits short data
//! Byte 2..: value bytes (absent for DPT 1)
//! ```
//!
//! A parsed [`Telegram`](crate::protocol::telegram::Telegram) payload starts at
//! byte 1 with the APCI bits already masked off, so it is decoded with
//! [`DatapointType::decode_payload`] instead of [`DatapointType::decode_apdu`].
//!
//! ## Usage
//!
//! ```rust
//! use knx_ipcore::dpt::{DatapointType, DatapointValue};
//!
//! let apdu = DatapointValue::Float(22.5).encode()?;
//! assert_eq!(apdu.as_slice(), &[0x00, 0x80, 0x0C, 0x65]);
//!
//! let value = DatapointType::Float.decode_apdu(&apdu)?;
//! assert_eq!(value, DatapointValue::Float(22.5));
//! # Ok::<(), knx_ipcore::KnxError>(())
//! ```

use core::fmt;
use core::ops::Deref;

use crate::error::{KnxError, Result};
use crate::protocol::constants::{APCI_GROUP_VALUE_WRITE, SHORT_DATA_MASK, TPCI_UNNUMBERED_DATA};

pub mod dpt1;
pub mod dpt5;
pub mod dpt9;

#[doc(inline)]
pub use dpt1::Dpt1;
#[doc(inline)]
pub use dpt5::Dpt5;
#[doc(inline)]
pub use dpt9::Dpt9;

/// First APDU byte of a group value write: TPCI plus APCI bits 9-8.
pub const GROUP_WRITE_PREFIX_0: u8 = TPCI_UNNUMBERED_DATA | (APCI_GROUP_VALUE_WRITE >> 2);

/// Second APDU byte of a group value write before short data is merged in.
pub const GROUP_WRITE_PREFIX_1: u8 = (APCI_GROUP_VALUE_WRITE & 0x03) << 6;

/// Encode a value into its raw data bytes (no APDU control bytes).
pub trait DptEncode<T> {
    /// Write the encoded value into `buf`, returning the number of bytes used.
    ///
    /// # Errors
    ///
    /// Fails if the value is outside the subtype's range or `buf` is too small.
    fn encode(&self, value: T, buf: &mut [u8]) -> Result<usize>;
}

/// Decode raw data bytes (no APDU control bytes) into a value.
pub trait DptDecode<T> {
    /// Decode a value from `data`.
    ///
    /// # Errors
    ///
    /// Fails if `data` is too short or holds an invalid value.
    fn decode(&self, data: &[u8]) -> Result<T>;
}

/// Encoded application protocol data unit.
///
/// Fixed-capacity and `Copy`, so building one never allocates.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Apdu {
    bytes: [u8; Apdu::CAPACITY],
    len: u8,
}

impl Apdu {
    /// Largest APDU this crate produces (2 control bytes + 14 data bytes).
    pub const CAPACITY: usize = 16;

    /// Group value write with `short_data` in the APCI byte followed by `data`.
    ///
    /// `data` is at most 2 bytes for every supported datapoint type.
    fn group_write(short_data: u8, data: &[u8]) -> Self {
        let mut bytes = [0u8; Self::CAPACITY];
        bytes[0] = GROUP_WRITE_PREFIX_0;
        bytes[1] = GROUP_WRITE_PREFIX_1 | (short_data & SHORT_DATA_MASK);
        let len = 2 + data.len().min(Self::CAPACITY - 2);
        bytes[2..len].copy_from_slice(&data[..len - 2]);
        Self {
            bytes,
            len: len as u8,
        }
    }

    /// Borrow the encoded bytes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes[..usize::from(self.len)]
    }
}

impl Deref for Apdu {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AsRef<[u8]> for Apdu {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for Apdu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Apdu").field(&self.as_slice()).finish()
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Apdu {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "Apdu({=[u8]:02x})", self.as_slice());
    }
}

/// Datapoint main types supported by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DatapointType {
    /// DPT 1 - 1-bit boolean
    Bool,
    /// DPT 5 - 8-bit unsigned
    U8,
    /// DPT 9 - 2-byte float
    Float,
}

impl DatapointType {
    /// Map a DPT main number (the `9` in `9.001`) to a type.
    ///
    /// # Errors
    ///
    /// Returns a DPT unsupported-type error for any other main number.
    pub fn from_main_number(main: u16) -> Result<Self> {
        match main {
            1 => Ok(Self::Bool),
            5 => Ok(Self::U8),
            9 => Ok(Self::Float),
            _ => Err(KnxError::unsupported_dpt()),
        }
    }

    /// DPT main number.
    pub const fn main_number(self) -> u16 {
        match self {
            Self::Bool => 1,
            Self::U8 => 5,
            Self::Float => 9,
        }
    }

    /// Number of value bytes following the APCI byte.
    pub const fn data_len(self) -> usize {
        match self {
            Self::Bool => 0,
            Self::U8 => 1,
            Self::Float => 2,
        }
    }

    /// Decode a full APDU (TPCI byte, APCI byte, value bytes).
    ///
    /// # Errors
    ///
    /// Returns a DPT invalid-data error if `apdu` is too short for this type.
    pub fn decode_apdu(self, apdu: &[u8]) -> Result<DatapointValue> {
        let short = *apdu.get(1).ok_or_else(KnxError::invalid_dpt_data)?;
        self.decode_value(short, apdu.get(2..).unwrap_or_default())
    }

    /// Decode a telegram payload (APCI byte with command bits masked, value
    /// bytes).
    ///
    /// # Errors
    ///
    /// Returns a DPT invalid-data error if `payload` is too short for this type.
    pub fn decode_payload(self, payload: &[u8]) -> Result<DatapointValue> {
        let short = *payload.first().ok_or_else(KnxError::invalid_dpt_data)?;
        self.decode_value(short, payload.get(1..).unwrap_or_default())
    }

    fn decode_value(self, short: u8, data: &[u8]) -> Result<DatapointValue> {
        match self {
            Self::Bool => Ok(DatapointValue::Bool(dpt1::bit(short))),
            Self::U8 => Dpt5::Counter.decode(data).map(|v| DatapointValue::U8(v as u8)),
            Self::Float => Dpt9::Temperature.decode(data).map(DatapointValue::Float),
        }
    }
}

/// A native datapoint value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DatapointValue {
    /// DPT 1
    Bool(bool),
    /// DPT 5
    U8(u8),
    /// DPT 9
    Float(f32),
}

impl DatapointValue {
    /// The main type this value encodes as.
    pub const fn datapoint_type(&self) -> DatapointType {
        match self {
            Self::Bool(_) => DatapointType::Bool,
            Self::U8(_) => DatapointType::U8,
            Self::Float(_) => DatapointType::Float,
        }
    }

    /// Whether [`DatapointValue::encode`] will accept this value.
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Bool(_) | Self::U8(_) => true,
            Self::Float(v) => dpt9::in_range(v),
        }
    }

    /// Encode as a group value write APDU.
    ///
    /// # Errors
    ///
    /// Returns a DPT value-out-of-range error for a float outside the DPT 9
    /// domain.
    pub fn encode(&self) -> Result<Apdu> {
        match *self {
            Self::Bool(v) => Ok(encode_bool(v)),
            Self::U8(v) => Ok(encode_u8(v)),
            Self::Float(v) => encode_float(v),
        }
    }

    /// Boolean payload, if this is a `Bool`.
    pub const fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Byte payload, if this is a `U8`.
    pub const fn as_u8(&self) -> Option<u8> {
        match *self {
            Self::U8(v) => Some(v),
            _ => None,
        }
    }

    /// Float payload, if this is a `Float`.
    pub const fn as_f32(&self) -> Option<f32> {
        match *self {
            Self::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for DatapointValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<u8> for DatapointValue {
    fn from(v: u8) -> Self {
        Self::U8(v)
    }
}

impl From<f32> for DatapointValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

/// `[0x00, 0x80 | v]`
pub fn encode_bool(value: bool) -> Apdu {
    Apdu::group_write(u8::from(value), &[])
}

/// `[0x00, 0x80, v]`
pub fn encode_u8(value: u8) -> Apdu {
    Apdu::group_write(0, &[value])
}

/// `[0x00, 0x80, hi, lo]`
///
/// # Errors
///
/// Returns a DPT value-out-of-range error outside the DPT 9 domain.
pub fn encode_float(value: f32) -> Result<Apdu> {
    let raw = dpt9::encode_raw(value)?;
    Ok(Apdu::group_write(0, &raw.to_be_bytes()))
}

/// Decode bit 0 of APDU byte 1.
///
/// # Errors
///
/// Returns a DPT invalid-data error for fewer than 2 bytes.
pub fn decode_bool(apdu: &[u8]) -> Result<bool> {
    match DatapointType::Bool.decode_apdu(apdu)? {
        DatapointValue::Bool(v) => Ok(v),
        _ => Err(KnxError::invalid_dpt_data()),
    }
}

/// Decode APDU byte 2.
///
/// # Errors
///
/// Returns a DPT invalid-data error for fewer than 3 bytes.
pub fn decode_u8(apdu: &[u8]) -> Result<u8> {
    match DatapointType::U8.decode_apdu(apdu)? {
        DatapointValue::U8(v) => Ok(v),
        _ => Err(KnxError::invalid_dpt_data()),
    }
}

/// Decode APDU bytes 2-3 as a DPT 9 float.
///
/// # Errors
///
/// Returns a DPT invalid-data error for fewer than 4 bytes.
pub fn decode_float(apdu: &[u8]) -> Result<f32> {
    match DatapointType::Float.decode_apdu(apdu)? {
        DatapointValue::Float(v) => Ok(v),
        _ => Err(KnxError::invalid_dpt_data()),
    }
}
