//! DPT 9.xxx - 2-byte Float (16-bit floating point)
//!
//! 2-byte floating point datapoint types represent values using a custom
//! 16-bit floating point format with 1 sign bit, 4 exponent bits, and 11 mantissa bits.
//!
//! ## Format
//!
//! ```text
//! Byte 0: SEEE EMMM
//! Byte 1: MMMM MMMM
//!
//! S = Sign bit (bit 15)
//! E = Exponent (bits 14-11: 4 bits, unsigned, range 0-15)
//! M = Mantissa (bits 10-0, low 11 bits of the two's complement mantissa)
//!
//! Value = (0.01 * M) * 2^E
//! ```
//!
//! ## Encoding
//!
//! The value is scaled by 100 and rounded, then halved (integer division,
//! truncating toward zero) until it fits the signed 12-bit range, bumping the
//! exponent once per halving. Each halving drops one bit of precision, so the
//! quantization step at exponent `E` is `2^E / 100`. The sign bit comes from
//! the sign of the input value.
//!
//! On decode a set sign bit extends the mantissa only when the 11 mantissa
//! bits are non-zero. `0x8000` therefore decodes to `0.0`.
//!
//! ## Range
//!
//! - Min: -671088.64
//! - Max: +670760.96
//!
//! Values outside this range (and NaN) are rejected, not clamped.
//!
//! ## Example
//!
//! ```rust
//! use knx_ipcore::dpt::{Dpt9, DptDecode, DptEncode};
//!
//! let mut buf = [0u8; 2];
//! let len = Dpt9::Temperature.encode(22.5, &mut buf)?;
//! assert_eq!(&buf[..len], &[0x0C, 0x65]);
//!
//! let temp = Dpt9::Temperature.decode(&buf)?;
//! assert!((temp - 22.5).abs() < 0.01);
//! # Ok::<(), knx_ipcore::KnxError>(())
//! ```

use crate::dpt::{DptDecode, DptEncode};
use crate::error::{KnxError, Result};

/// Smallest encodable value.
pub const MIN_VALUE: f32 = -671_088.64;
/// Largest encodable value.
pub const MAX_VALUE: f32 = 670_760.96;

const MANTISSA_MIN: i32 = -2048;
const MANTISSA_MAX: i32 = 2047;

/// Check whether `value` lies inside the DPT 9 domain.
#[inline]
pub fn in_range(value: f32) -> bool {
    (MIN_VALUE..=MAX_VALUE).contains(&value)
}

/// Round half away from zero (`f64::round` is not available in `core`).
#[inline]
fn round_half_away(value: f64) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}

/// Encode a float into the 16-bit DPT 9 representation.
///
/// # Errors
///
/// Returns a DPT value-out-of-range error outside [`MIN_VALUE`]..=[`MAX_VALUE`]
/// or for NaN.
pub fn encode_raw(value: f32) -> Result<u16> {
    if !in_range(value) {
        knx_log!(warn, "DPT9 value out of range");
        return Err(KnxError::dpt_value_out_of_range());
    }

    let mut mantissa = round_half_away(f64::from(value) * 100.0);
    let mut exponent: u16 = 0;

    while !(MANTISSA_MIN..=MANTISSA_MAX).contains(&mantissa) {
        mantissa /= 2;
        exponent += 1;
    }
    debug_assert!(exponent <= 15);

    let mut raw = (exponent << 11) | (mantissa as u16 & 0x07FF);
    if value < 0.0 {
        raw |= 0x8000;
    }
    Ok(raw)
}

/// Decode the 16-bit DPT 9 representation into a float.
pub fn decode_raw(raw: u16) -> f32 {
    let negative = raw & 0x8000 != 0;
    let exponent = (raw >> 11) & 0x0F;
    let mut mantissa = raw & 0x07FF;

    if negative && mantissa != 0 {
        mantissa |= 0xF800;
    }

    f32::from(mantissa as i16) * (1u32 << exponent) as f32 / 100.0
}

/// DPT 9.xxx 2-byte float types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dpt9 {
    /// DPT 9.001 - Temperature (°C)
    Temperature,
    /// DPT 9.002 - Temperature difference (K)
    TemperatureDifference,
    /// DPT 9.003 - Kelvin per hour (K/h)
    KelvinPerHour,
    /// DPT 9.004 - Illuminance (lux)
    Illuminance,
    /// DPT 9.005 - Wind speed (m/s)
    WindSpeed,
    /// DPT 9.006 - Pressure (Pa)
    Pressure,
    /// DPT 9.007 - Humidity (%)
    Humidity,
    /// DPT 9.008 - Air quality (ppm)
    AirQuality,
    /// DPT 9.010 - Time difference (s)
    TimeDifference,
    /// DPT 9.011 - Time difference (ms)
    TimeDifferenceMs,
    /// DPT 9.020 - Voltage (mV)
    Voltage,
    /// DPT 9.021 - Current (mA)
    Current,
    /// DPT 9.022 - Power density (W/m²)
    PowerDensity,
    /// DPT 9.023 - Kelvin per percent (K/%)
    KelvinPerPercent,
    /// DPT 9.024 - Power (kW)
    Power,
}

impl Dpt9 {
    /// Get the DPT identifier string
    pub const fn identifier(&self) -> &'static str {
        match self {
            Dpt9::Temperature => "9.001",
            Dpt9::TemperatureDifference => "9.002",
            Dpt9::KelvinPerHour => "9.003",
            Dpt9::Illuminance => "9.004",
            Dpt9::WindSpeed => "9.005",
            Dpt9::Pressure => "9.006",
            Dpt9::Humidity => "9.007",
            Dpt9::AirQuality => "9.008",
            Dpt9::TimeDifference => "9.010",
            Dpt9::TimeDifferenceMs => "9.011",
            Dpt9::Voltage => "9.020",
            Dpt9::Current => "9.021",
            Dpt9::PowerDensity => "9.022",
            Dpt9::KelvinPerPercent => "9.023",
            Dpt9::Power => "9.024",
        }
    }

    /// Get the unit string
    pub const fn unit(&self) -> &'static str {
        match self {
            Dpt9::Temperature => "°C",
            Dpt9::TemperatureDifference => "K",
            Dpt9::KelvinPerHour => "K/h",
            Dpt9::Illuminance => "lux",
            Dpt9::WindSpeed => "m/s",
            Dpt9::Pressure => "Pa",
            Dpt9::Humidity => "%",
            Dpt9::AirQuality => "ppm",
            Dpt9::TimeDifference => "s",
            Dpt9::TimeDifferenceMs => "ms",
            Dpt9::Voltage => "mV",
            Dpt9::Current => "mA",
            Dpt9::PowerDensity => "W/m²",
            Dpt9::KelvinPerPercent => "K/%",
            Dpt9::Power => "kW",
        }
    }

    /// Encode to a 2-byte big-endian array.
    pub fn encode_to_bytes(&self, value: f32) -> Result<[u8; 2]> {
        encode_raw(value).map(u16::to_be_bytes)
    }
}

impl DptEncode<f32> for Dpt9 {
    fn encode(&self, value: f32, buf: &mut [u8]) -> Result<usize> {
        let dst = buf.get_mut(..2).ok_or_else(KnxError::buffer_too_small)?;
        dst.copy_from_slice(&self.encode_to_bytes(value)?);
        Ok(2)
    }
}

impl DptDecode<f32> for Dpt9 {
    fn decode(&self, data: &[u8]) -> Result<f32> {
        match data {
            [hi, lo, ..] => Ok(decode_raw(u16::from_be_bytes([*hi, *lo]))),
            _ => Err(KnxError::invalid_dpt_data()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
        assert!(
            (a - b).abs() <= epsilon,
            "Expected {} ≈ {}, diff = {}",
            a,
            b,
            (a - b).abs()
        );
    }

    /// Quantization step for the exponent chosen when encoding `raw`.
    fn step(raw: u16) -> f32 {
        (1u32 << ((raw >> 11) & 0x0F)) as f32 / 100.0
    }

    #[test]
    fn test_encode_reference_temperature() {
        // 22.5 * 100 = 2250 -> 1125, E=1 -> 0x0C65
        assert_eq!(encode_raw(22.5).unwrap(), 0x0C65);
        assert_eq!(Dpt9::Temperature.encode_to_bytes(22.5).unwrap(), [0x0C, 0x65]);
    }

    #[test]
    fn test_encode_zero() {
        assert_eq!(encode_raw(0.0).unwrap(), 0x0000);
        assert_eq!(decode_raw(0x0000), 0.0);
    }

    #[test]
    fn test_encode_negative_sets_sign_bit() {
        // -22.5 -> mantissa -1125, E=1; -1125 & 0x7FF = 0x39B
        assert_eq!(encode_raw(-22.5).unwrap(), 0x8B9B);
        assert_float_eq(decode_raw(0x8B9B), -22.5, 0.001);
    }

    #[test]
    fn test_encode_hundred() {
        assert_eq!(encode_raw(100.0).unwrap(), 0x1CE2);
        assert_eq!(encode_raw(-100.0).unwrap(), 0x9B1E);
    }

    #[test]
    fn test_halving_truncates_toward_zero() {
        // 2049 / 2 = 1024 and -2049 / 2 = -1024 (floor would give -1025)
        assert_eq!(encode_raw(20.49).unwrap(), 0x0C00);
        assert_eq!(encode_raw(-20.49).unwrap(), 0x8C00);
    }

    #[test]
    fn test_round_trip_within_quantization() {
        for value in [0.0, 22.5, -22.5, 100.0, -100.0, 670_760.96, -671_088.64, 0.5, -5.0, 1000.0] {
            let raw = encode_raw(value).unwrap();
            assert_float_eq(decode_raw(raw), value, step(raw) + 0.01);
        }
    }

    #[test]
    fn test_extremes_use_top_exponent() {
        let max = encode_raw(MAX_VALUE).unwrap();
        assert_eq!(max, 0x7FFE);
        assert_float_eq(decode_raw(max), MAX_VALUE, step(max) + 0.01);

        let min = encode_raw(MIN_VALUE).unwrap();
        assert_eq!(min, 0xF801);
        assert_eq!((min >> 11) & 0x0F, 15);
        assert_float_eq(decode_raw(min), MIN_VALUE, step(min) + 0.01);
    }

    #[test]
    fn test_out_of_range_rejected() {
        for value in [700_000.0, -700_000.0, f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            let err = encode_raw(value).unwrap_err();
            assert!(matches!(err, KnxError::Dpt(ref e) if e.is_out_of_range()));
        }
    }

    #[test]
    fn test_decode_real_knx_bus_value() {
        // 0x0C38: E=1, M=1080 -> 21.6
        assert_float_eq(decode_raw(0x0C38), 21.6, 0.01);
        // 0x0AF0: E=1, M=752 -> 15.04
        assert_float_eq(decode_raw(0x0AF0), 15.04, 0.01);
    }

    #[test]
    fn test_sign_with_zero_mantissa_decodes_to_zero() {
        assert_eq!(decode_raw(0x8000), 0.0);
        assert_eq!(decode_raw(0x8800), 0.0);
    }

    #[test]
    fn test_trait_encode_decode() {
        let mut buf = [0u8; 2];
        let len = Dpt9::Humidity.encode(65.5, &mut buf).unwrap();
        assert_eq!(len, 2);
        assert_float_eq(Dpt9::Humidity.decode(&buf).unwrap(), 65.5, 0.05);
    }

    #[test]
    fn test_trait_encode_buffer_too_small() {
        let mut buf = [0u8; 1];
        let result = Dpt9::Temperature.encode(21.5, &mut buf);
        assert!(matches!(result, Err(KnxError::Buffer(_))));
    }

    #[test]
    fn test_trait_decode_short_input() {
        assert!(matches!(Dpt9::Temperature.decode(&[0x0C]), Err(KnxError::Dpt(_))));
        assert!(Dpt9::Temperature.decode(&[]).is_err());
    }

    #[test]
    fn test_identifier_and_unit() {
        assert_eq!(Dpt9::Temperature.identifier(), "9.001");
        assert_eq!(Dpt9::Temperature.unit(), "°C");
        assert_eq!(Dpt9::Illuminance.identifier(), "9.004");
        assert_eq!(Dpt9::WindSpeed.unit(), "m/s");
        assert_eq!(Dpt9::Current.identifier(), "9.021");
        assert_eq!(Dpt9::Power.unit(), "kW");
    }
}
