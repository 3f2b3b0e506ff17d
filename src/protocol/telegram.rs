//! Inbound frame parsing into [`Telegram`] values.
//!
//! Parsing never fails loudly. Truncated or malformed input, including a frame
//! parsed under the wrong [`TransportMode`], yields `Telegram::default()`, which
//! [`Telegram::is_empty`] reports. Every byte is read through a checked slice
//! access.

use crate::addressing::{GroupAddress, IndividualAddress};
use crate::dpt::{DatapointType, DatapointValue};
use crate::error::Result;
use crate::protocol::cemi::{Apci, ControlField2};
use crate::protocol::constants::{CemiMessageCode, MAX_PAYLOAD_SIZE, SHORT_DATA_MASK};
use crate::protocol::frame::TransportMode;

/// Payload bytes of a telegram (APCI short data followed by value bytes).
pub type Payload = heapless::Vec<u8, MAX_PAYLOAD_SIZE>;

/// Smallest cEMI block worth looking at.
const MIN_CEMI_LEN: usize = 8;

/// One decoded application-layer message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Telegram {
    source: IndividualAddress,
    destination: u16,
    is_group_address: bool,
    routing_counter: u8,
    command: u8,
    payload: Payload,
}

impl Telegram {
    /// Parse a datagram received under `mode`.
    ///
    /// Returns an empty telegram when the input is too short or inconsistent.
    pub fn parse(data: &[u8], mode: TransportMode) -> Self {
        let Some(cemi) = data.get(mode.header_len()..) else {
            knx_log!(debug, "dropping datagram shorter than header ({} bytes)", data.len());
            return Self::default();
        };
        Self::parse_cemi(cemi)
    }

    /// Parse a datagram, taking the mode from its header.
    ///
    /// Returns an empty telegram for unknown service types.
    pub fn parse_frame(data: &[u8]) -> Self {
        match TransportMode::detect(data) {
            Some(mode) => Self::parse(data, mode),
            None => {
                knx_log!(debug, "dropping datagram with unknown header");
                Self::default()
            }
        }
    }

    /// Parse a bare cEMI block.
    pub fn parse_cemi(cemi: &[u8]) -> Self {
        if cemi.len() < MIN_CEMI_LEN {
            knx_log!(debug, "dropping truncated cEMI block ({} bytes)", cemi.len());
            return Self::default();
        }

        let offset = match cemi.first().copied().and_then(CemiMessageCode::from_u8) {
            Some(code) if code.is_ldata() => {
                2 + cemi.get(1).map_or(0, |&len| usize::from(len))
            }
            _ => 0,
        };

        let Some(&[_ctrl1, ctrl2, src_hi, src_lo, dst_hi, dst_lo]) = cemi.get(offset..offset + 6)
        else {
            knx_log!(debug, "dropping cEMI block, additional info overruns frame");
            return Self::default();
        };
        let ctrl2 = ControlField2::from(ctrl2);

        let mut telegram = Self {
            source: IndividualAddress::from(u16::from_be_bytes([src_hi, src_lo])),
            destination: u16::from_be_bytes([dst_hi, dst_lo]),
            is_group_address: ctrl2.is_group_address(),
            routing_counter: ctrl2.hop_count(),
            ..Self::default()
        };

        let tpdu_len = cemi.get(offset + 6).map_or(0, |&len| usize::from(len));
        if tpdu_len == 0 {
            return telegram;
        }
        let Some(&tpci) = cemi.get(offset + 7) else {
            return telegram;
        };
        let apci = cemi.get(offset + 8).copied().unwrap_or(0);
        telegram.command = Apci::command(tpci, apci);

        let start = offset + 8;
        let end = (offset + 6 + tpdu_len).min(cemi.len());
        if let Some(bytes) = cemi.get(start..end) {
            // tpdu_len <= 255, so at most 253 bytes
            if telegram.payload.extend_from_slice(bytes).is_err() {
                knx_log!(debug, "dropping oversized payload ({} bytes)", bytes.len());
                return Self::default();
            }
            if let Some(first) = telegram.payload.first_mut() {
                *first &= SHORT_DATA_MASK;
            }
        }

        telegram
    }

    /// Whether this is the sentinel produced for unparseable input.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Sender of the telegram.
    #[inline]
    pub const fn source(&self) -> IndividualAddress {
        self.source
    }

    /// Raw destination; see [`Telegram::is_group_address`].
    #[inline]
    pub const fn destination(&self) -> u16 {
        self.destination
    }

    /// Destination address type from control field 2.
    #[inline]
    pub const fn is_group_address(&self) -> bool {
        self.is_group_address
    }

    /// Destination as a group address, if it is one.
    pub fn group_address(&self) -> Option<GroupAddress> {
        self.is_group_address.then(|| GroupAddress::from(self.destination))
    }

    /// Destination as an individual address, if it is one.
    pub fn individual_destination(&self) -> Option<IndividualAddress> {
        (!self.is_group_address).then(|| IndividualAddress::from(self.destination))
    }

    /// Hop count (3 bits).
    #[inline]
    pub const fn routing_counter(&self) -> u8 {
        self.routing_counter
    }

    /// APCI-derived command code.
    #[inline]
    pub const fn command(&self) -> u8 {
        self.command
    }

    /// Application service of the command.
    pub const fn apci(&self) -> Apci {
        Apci::from_command(self.command)
    }

    /// Payload, first byte stripped of APCI bits.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Decode the payload as a datapoint of type `ty`.
    ///
    /// # Errors
    ///
    /// Returns a DPT invalid-data error if the payload is too short.
    pub fn value(&self, ty: DatapointType) -> Result<DatapointValue> {
        ty.decode_payload(&self.payload)
    }
}
