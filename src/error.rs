//! Error types for KNX operations following M-ERRORS-CANONICAL-STRUCTS guideline.
//!
//! This module provides structured error types with backtraces (when std is enabled)
//! and helper methods for error information.
//!
//! Note that the frame parser does not use these: a malformed inbound frame
//! yields an empty [`Telegram`](crate::protocol::Telegram) instead.

use core::fmt;

#[cfg(feature = "std")]
use std::backtrace::Backtrace;

/// Result type alias for KNX operations.
pub type Result<T> = core::result::Result<T, KnxError>;

// =============================================================================
// Error Kind Enums (Internal)
// =============================================================================

/// Protocol error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProtocolErrorKind {
    InvalidFrame,
    UnsupportedVersion,
    UnsupportedServiceType,
    PayloadTooLarge,
}

/// Buffer error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BufferErrorKind {
    TooSmall,
}

/// Addressing error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AddressingErrorKind {
    InvalidIndividualAddress,
    InvalidGroupAddress,
    InvalidIpAddress,
    OutOfRange,
}

/// DPT error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DptErrorKind {
    InvalidData,
    ValueOutOfRange,
    UnsupportedType,
}

/// Configuration error variants (internal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConfigErrorKind {
    InvalidMode,
    InvalidGatewayIp,
    InvalidIndividualAddress,
    InvalidChannelId,
}

// =============================================================================
// Main Error Type
// =============================================================================

/// KNX error types.
///
/// This is the main error type returned by all fallible KNX operations.
/// It contains a backtrace (when std feature is enabled) and detailed
/// error information through helper methods.
#[derive(Debug)]
pub enum KnxError {
    /// Protocol-related errors (header validation, frame size)
    Protocol(ProtocolError),
    /// Caller-supplied buffer too small
    Buffer(BufferError),
    /// Addressing errors (invalid address format, etc.)
    Addressing(AddressingError),
    /// Datapoint Type errors (encoding, decoding, etc.)
    Dpt(DptError),
    /// Configuration parsing errors
    Config(ConfigError),
}

// =============================================================================
// Structured Error Types
// =============================================================================

/// Protocol error with optional backtrace
#[derive(Debug)]
pub struct ProtocolError {
    kind: ProtocolErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl ProtocolError {
    pub(crate) fn new(kind: ProtocolErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if this is an invalid frame error
    pub fn is_invalid_frame(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::InvalidFrame)
    }

    /// Check if this is an unsupported version error
    pub fn is_unsupported_version(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::UnsupportedVersion)
    }

    /// Check if the frame would exceed the maximum frame size
    pub fn is_payload_too_large(&self) -> bool {
        matches!(self.kind, ProtocolErrorKind::PayloadTooLarge)
    }
}

/// Buffer error with optional backtrace
#[derive(Debug)]
pub struct BufferError {
    kind: BufferErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl BufferError {
    pub(crate) fn new(kind: BufferErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if buffer is too small
    pub fn is_too_small(&self) -> bool {
        matches!(self.kind, BufferErrorKind::TooSmall)
    }
}

/// Addressing error with optional backtrace
#[derive(Debug)]
pub struct AddressingError {
    kind: AddressingErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl AddressingError {
    pub(crate) fn new(kind: AddressingErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if address is out of range
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind, AddressingErrorKind::OutOfRange)
    }

    /// Check if a textual address could not be parsed
    pub fn is_invalid_format(&self) -> bool {
        matches!(
            self.kind,
            AddressingErrorKind::InvalidGroupAddress
                | AddressingErrorKind::InvalidIndividualAddress
                | AddressingErrorKind::InvalidIpAddress
        )
    }
}

/// DPT error with optional backtrace
#[derive(Debug)]
pub struct DptError {
    kind: DptErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl DptError {
    pub(crate) fn new(kind: DptErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Check if value is out of range
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.kind, DptErrorKind::ValueOutOfRange)
    }

    /// Check if the input was too short or otherwise malformed
    pub fn is_invalid_data(&self) -> bool {
        matches!(self.kind, DptErrorKind::InvalidData)
    }

    /// Check if the datapoint type is not supported
    pub fn is_unsupported(&self) -> bool {
        matches!(self.kind, DptErrorKind::UnsupportedType)
    }
}

/// Configuration error with optional backtrace
#[derive(Debug)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    #[cfg(feature = "std")]
    backtrace: Backtrace,
}

impl ConfigError {
    pub(crate) fn new(kind: ConfigErrorKind) -> Self {
        Self {
            kind,
            #[cfg(feature = "std")]
            backtrace: Backtrace::capture(),
        }
    }

    /// Name of the configuration key that failed to parse
    pub fn key(&self) -> &'static str {
        match self.kind {
            ConfigErrorKind::InvalidMode => "KNX_MODE",
            ConfigErrorKind::InvalidGatewayIp => "KNX_GATEWAY_IP",
            ConfigErrorKind::InvalidIndividualAddress => "KNX_INDIVIDUAL_ADDRESS",
            ConfigErrorKind::InvalidChannelId => "KNX_CHANNEL_ID",
        }
    }
}

// =============================================================================
// Convenience Constructors for KnxError
// =============================================================================

impl KnxError {
    // Protocol errors
    pub(crate) fn invalid_frame() -> Self {
        Self::Protocol(ProtocolError::new(ProtocolErrorKind::InvalidFrame))
    }

    pub(crate) fn unsupported_version() -> Self {
        Self::Protocol(ProtocolError::new(ProtocolErrorKind::UnsupportedVersion))
    }

    pub(crate) fn unsupported_service_type() -> Self {
        Self::Protocol(ProtocolError::new(ProtocolErrorKind::UnsupportedServiceType))
    }

    pub(crate) fn payload_too_large() -> Self {
        Self::Protocol(ProtocolError::new(ProtocolErrorKind::PayloadTooLarge))
    }

    // Buffer errors
    pub(crate) fn buffer_too_small() -> Self {
        Self::Buffer(BufferError::new(BufferErrorKind::TooSmall))
    }

    // Addressing errors
    pub(crate) fn invalid_group_address() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::InvalidGroupAddress))
    }

    pub(crate) fn invalid_individual_address() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::InvalidIndividualAddress))
    }

    pub(crate) fn invalid_ip_address() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::InvalidIpAddress))
    }

    pub(crate) fn address_out_of_range() -> Self {
        Self::Addressing(AddressingError::new(AddressingErrorKind::OutOfRange))
    }

    // DPT errors
    pub(crate) fn invalid_dpt_data() -> Self {
        Self::Dpt(DptError::new(DptErrorKind::InvalidData))
    }

    pub(crate) fn dpt_value_out_of_range() -> Self {
        Self::Dpt(DptError::new(DptErrorKind::ValueOutOfRange))
    }

    pub(crate) fn unsupported_dpt() -> Self {
        Self::Dpt(DptError::new(DptErrorKind::UnsupportedType))
    }

    // Configuration errors
    pub(crate) fn invalid_config_mode() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::InvalidMode))
    }

    pub(crate) fn invalid_config_gateway() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::InvalidGatewayIp))
    }

    pub(crate) fn invalid_config_address() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::InvalidIndividualAddress))
    }

    pub(crate) fn invalid_config_channel() -> Self {
        Self::Config(ConfigError::new(ConfigErrorKind::InvalidChannelId))
    }

    /// Short, stable name of the error category and kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            KnxError::Protocol(e) => match e.kind {
                ProtocolErrorKind::InvalidFrame => "protocol: invalid frame",
                ProtocolErrorKind::UnsupportedVersion => "protocol: unsupported version",
                ProtocolErrorKind::UnsupportedServiceType => "protocol: unsupported service type",
                ProtocolErrorKind::PayloadTooLarge => "protocol: payload too large",
            },
            KnxError::Buffer(e) => match e.kind {
                BufferErrorKind::TooSmall => "buffer: too small",
            },
            KnxError::Addressing(e) => match e.kind {
                AddressingErrorKind::InvalidIndividualAddress => {
                    "addressing: invalid individual address"
                }
                AddressingErrorKind::InvalidGroupAddress => "addressing: invalid group address",
                AddressingErrorKind::InvalidIpAddress => "addressing: invalid IPv4 address",
                AddressingErrorKind::OutOfRange => "addressing: out of range",
            },
            KnxError::Dpt(e) => match e.kind {
                DptErrorKind::InvalidData => "dpt: invalid data",
                DptErrorKind::ValueOutOfRange => "dpt: value out of range",
                DptErrorKind::UnsupportedType => "dpt: unsupported type",
            },
            KnxError::Config(e) => match e.kind {
                ConfigErrorKind::InvalidMode => "config: invalid KNX_MODE",
                ConfigErrorKind::InvalidGatewayIp => "config: invalid KNX_GATEWAY_IP",
                ConfigErrorKind::InvalidIndividualAddress => {
                    "config: invalid KNX_INDIVIDUAL_ADDRESS"
                }
                ConfigErrorKind::InvalidChannelId => "config: invalid KNX_CHANNEL_ID",
            },
        }
    }

    /// Captured backtrace, if the `std` feature is enabled and capture was on.
    #[cfg(feature = "std")]
    pub fn backtrace(&self) -> &Backtrace {
        match self {
            KnxError::Protocol(e) => &e.backtrace,
            KnxError::Buffer(e) => &e.backtrace,
            KnxError::Addressing(e) => &e.backtrace,
            KnxError::Dpt(e) => &e.backtrace,
            KnxError::Config(e) => &e.backtrace,
        }
    }
}

// =============================================================================
// Display Implementation
// =============================================================================

impl fmt::Display for KnxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for KnxError {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "{=str}", self.kind_name());
    }
}

// Implement std::error::Error for std-based applications
#[cfg(feature = "std")]
impl std::error::Error for KnxError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dpt_error_helpers() {
        let KnxError::Dpt(e) = KnxError::dpt_value_out_of_range() else {
            panic!("expected DPT error");
        };
        assert!(e.is_out_of_range());
        assert!(!e.is_invalid_data());
        assert!(!e.is_unsupported());
    }

    #[test]
    fn test_display_uses_kind_name() {
        let err = KnxError::payload_too_large();
        assert_eq!(format!("{err}"), "protocol: payload too large");
    }

    #[test]
    fn test_config_error_key() {
        let KnxError::Config(e) = KnxError::invalid_config_gateway() else {
            panic!("expected config error");
        };
        assert_eq!(e.key(), "KNX_GATEWAY_IP");
    }
}
