//! KNXnet/IP frame header, transport modes and outbound frame assembly.
//!
//! ## Frame Structure
//!
//! All KNXnet/IP frames follow this structure:
//!
//! ```text
//! ┌─────────────────────────────┐
//! │  Header (6 bytes)           │
//! │  - Header Length: 0x06      │
//! │  - Protocol Version: 0x10   │
//! │  - Service Type: 2 bytes    │
//! │  - Total Length: 2 bytes    │
//! ├─────────────────────────────┤
//! │  Connection header (4 bytes)│  tunneling only
//! ├─────────────────────────────┤
//! │  cEMI (variable)            │
//! └─────────────────────────────┘
//! ```
//!
//! Frames are assembled in two phases: the header is written with a zero
//! total length, the body is appended, then [`FrameBuilder::patch_total_length`]
//! writes the final size into bytes 4-5.
//!
//! ## Example
//!
//! ```rust
//! use knx_ipcore::protocol::{build_frame, ConnectionHeader, LData, TransportMode};
//! use knx_ipcore::{dpt, GroupAddress, IndividualAddress};
//!
//! let ldata = LData::to_group(
//!     IndividualAddress::from_parts(1, 1, 250),
//!     GroupAddress::from_parts(1, 0, 1),
//! );
//! let apdu = dpt::encode_bool(true);
//! let frame = build_frame(TransportMode::Routing, ConnectionHeader::default(), &ldata, &apdu)?;
//! assert_eq!(&frame[..6], &[0x06, 0x10, 0x05, 0x30, 0x00, 0x11]);
//! # Ok::<(), knx_ipcore::KnxError>(())
//! ```

use core::fmt;
use core::str::FromStr;

use crate::error::{KnxError, Result};
use crate::protocol::cemi::LData;
use crate::protocol::constants::{
    CemiMessageCode, ServiceType, CONNECTION_HEADER_SIZE, HEADER_SIZE_10, KNXNETIP_VERSION_10,
    MAX_FRAME_SIZE,
};

/// Outbound frame bytes.
pub type Frame = heapless::Vec<u8, MAX_FRAME_SIZE>;

/// How frames reach the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TransportMode {
    /// Unicast to a gateway (`TUNNELLING_REQUEST`)
    #[default]
    Tunneling,
    /// Multicast to 224.0.23.12 (`ROUTING_INDICATION`)
    Routing,
}

impl TransportMode {
    /// Service type of frames sent in this mode.
    pub const fn service_type(self) -> ServiceType {
        match self {
            Self::Tunneling => ServiceType::TunnellingRequest,
            Self::Routing => ServiceType::RoutingIndication,
        }
    }

    /// cEMI message code of frames sent in this mode.
    pub const fn message_code(self) -> CemiMessageCode {
        match self {
            Self::Tunneling => CemiMessageCode::LDataReq,
            Self::Routing => CemiMessageCode::LDataInd,
        }
    }

    /// Bytes in front of the cEMI block: 10 for tunneling, 6 for routing.
    pub const fn header_len(self) -> usize {
        match self {
            Self::Tunneling => KnxnetIpHeader::SIZE + CONNECTION_HEADER_SIZE as usize,
            Self::Routing => KnxnetIpHeader::SIZE,
        }
    }

    /// Guess the mode from a frame's header.
    ///
    /// Returns `None` for invalid headers and other service types.
    pub fn detect(data: &[u8]) -> Option<Self> {
        match KnxnetIpHeader::parse(data).ok()?.service_type {
            ServiceType::TunnellingRequest => Some(Self::Tunneling),
            ServiceType::RoutingIndication => Some(Self::Routing),
            _ => None,
        }
    }

    /// Lowercase name as used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tunneling => "tunneling",
            Self::Routing => "routing",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("tunneling") || s.eq_ignore_ascii_case("tunnelling") {
            Ok(Self::Tunneling)
        } else if s.eq_ignore_ascii_case("routing") {
            Ok(Self::Routing)
        } else {
            Err(KnxError::invalid_config_mode())
        }
    }
}

/// KNXnet/IP frame header (6 bytes)
///
/// ```text
/// ┌──────────────┬──────────────┬─────────────────────┐
/// │ Header Len   │ Protocol Ver │  Service Type ID    │
/// │   (1 byte)   │   (1 byte)   │     (2 bytes)       │
/// ├──────────────┴──────────────┴─────────────────────┤
/// │           Total Length (2 bytes)                   │
/// └────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KnxnetIpHeader {
    /// Service type identifier
    pub service_type: ServiceType,
    /// Total length of frame (header + body)
    pub total_length: u16,
}

impl KnxnetIpHeader {
    /// Size of the header in bytes
    pub const SIZE: usize = 6;

    /// Create a new header
    pub const fn new(service_type: ServiceType, body_length: u16) -> Self {
        Self {
            service_type,
            total_length: Self::SIZE as u16 + body_length,
        }
    }

    /// Parse a header from a byte slice
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Buffer is too small
    /// - Header length is invalid
    /// - Protocol version is unsupported
    /// - Service type is unknown
    pub fn parse(data: &[u8]) -> Result<Self> {
        let Some(&[header_length, protocol_version, st_hi, st_lo, len_hi, len_lo]) =
            data.get(..Self::SIZE)
        else {
            return Err(KnxError::buffer_too_small());
        };

        if header_length != HEADER_SIZE_10 {
            return Err(KnxError::invalid_frame());
        }

        if protocol_version != KNXNETIP_VERSION_10 {
            return Err(KnxError::unsupported_version());
        }

        let service_type = ServiceType::from_u16(u16::from_be_bytes([st_hi, st_lo]))
            .ok_or_else(KnxError::unsupported_service_type)?;

        Ok(Self {
            service_type,
            total_length: u16::from_be_bytes([len_hi, len_lo]),
        })
    }

    /// Encode the header into a byte buffer
    ///
    /// # Errors
    ///
    /// Returns a buffer error if `buf` is shorter than 6 bytes.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let dst = buf.get_mut(..Self::SIZE).ok_or_else(KnxError::buffer_too_small)?;
        let [st_hi, st_lo] = self.service_type.to_u16().to_be_bytes();
        let [len_hi, len_lo] = self.total_length.to_be_bytes();
        dst.copy_from_slice(&[HEADER_SIZE_10, KNXNETIP_VERSION_10, st_hi, st_lo, len_hi, len_lo]);
        Ok(Self::SIZE)
    }

    /// Get the expected body length from the header
    pub const fn body_length(&self) -> u16 {
        self.total_length.saturating_sub(Self::SIZE as u16)
    }
}

/// Tunneling connection header (`04 channel seq 00`).
///
/// Ignored for routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConnectionHeader {
    /// Channel assigned by the gateway
    pub channel_id: u8,
    /// Per-channel sequence counter
    pub sequence: u8,
}

impl ConnectionHeader {
    /// Create a connection header
    pub const fn new(channel_id: u8, sequence: u8) -> Self {
        Self {
            channel_id,
            sequence,
        }
    }

    fn write(&self, out: &mut FrameBuilder) -> Result<()> {
        out.extend(&[CONNECTION_HEADER_SIZE, self.channel_id, self.sequence, 0x00])
    }
}

/// Append-then-patch builder over a bounded buffer.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    buf: Frame,
}

impl FrameBuilder {
    /// Start a frame with a header whose total length is still zero.
    ///
    /// # Errors
    ///
    /// Never fails in practice; the header always fits.
    pub fn new(service_type: ServiceType) -> Result<Self> {
        let mut header = [0u8; KnxnetIpHeader::SIZE];
        KnxnetIpHeader::new(service_type, 0).encode(&mut header)?;
        // total length placeholder
        header[4] = 0;
        header[5] = 0;

        let mut builder = Self { buf: Frame::new() };
        builder.extend(&header)?;
        Ok(builder)
    }

    /// Append one byte.
    ///
    /// # Errors
    ///
    /// Returns a payload-too-large error when the frame is full.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Result<()> {
        self.buf.push(byte).map_err(|_| KnxError::payload_too_large())
    }

    /// Append a byte slice.
    ///
    /// # Errors
    ///
    /// Returns a payload-too-large error if the bytes do not fit. The buffer
    /// is left unchanged in that case.
    #[inline]
    pub fn extend(&mut self, bytes: &[u8]) -> Result<()> {
        self.buf
            .extend_from_slice(bytes)
            .map_err(|_| KnxError::payload_too_large())
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been written (never true after [`FrameBuilder::new`]).
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write the current length big-endian into header bytes 4-5.
    ///
    /// # Errors
    ///
    /// Returns a buffer error if the header has not been written.
    pub fn patch_total_length(&mut self) -> Result<()> {
        let total = u16::try_from(self.buf.len()).map_err(|_| KnxError::payload_too_large())?;
        let dst = self
            .buf
            .get_mut(4..KnxnetIpHeader::SIZE)
            .ok_or_else(KnxError::buffer_too_small)?;
        dst.copy_from_slice(&total.to_be_bytes());
        Ok(())
    }

    /// Patch the total length and hand out the frame.
    ///
    /// # Errors
    ///
    /// See [`FrameBuilder::patch_total_length`].
    pub fn finish(mut self) -> Result<Frame> {
        self.patch_total_length()?;
        Ok(self.buf)
    }
}

/// Build a complete outbound frame for `mode`.
///
/// ```text
/// tunneling: 06 10 04 20 len16 | 04 ch seq 00 | 11 00 ctrl1 ctrl2 src dst n apdu
/// routing:   06 10 05 30 len16 |                29 00 ctrl1 ctrl2 src dst n apdu
/// ```
///
/// # Errors
///
/// Returns a payload-too-large error if the frame exceeds [`MAX_FRAME_SIZE`].
pub fn build_frame(
    mode: TransportMode,
    connection: ConnectionHeader,
    ldata: &LData,
    apdu: &[u8],
) -> Result<Frame> {
    let mut out = FrameBuilder::new(mode.service_type())?;
    if mode == TransportMode::Tunneling {
        connection.write(&mut out)?;
    }
    ldata.write(mode.message_code(), apdu, &mut out)?;
    out.finish()
}
