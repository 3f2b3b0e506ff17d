//! Common External Message Interface (cEMI) `L_Data` envelope.
//!
//! cEMI carries the KNX link-layer telegram inside a KNXnet/IP frame.
//!
//! ## Frame Structure
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ Message Code (1 byte)                    │
//! ├──────────────────────────────────────────┤
//! │ Additional Info Length (1 byte)          │
//! ├──────────────────────────────────────────┤
//! │ Additional Info (variable)               │
//! ├──────────────────────────────────────────┤
//! │ Service Information (L_Data)             │
//! │  ├─ Control Field 1 (1 byte)             │
//! │  ├─ Control Field 2 (1 byte)             │
//! │  ├─ Source Address (2 bytes)             │
//! │  ├─ Destination Address (2 bytes)        │
//! │  ├─ TPDU Length (1 byte)                 │
//! │  └─ APDU: TPCI, APCI, data (variable)    │
//! └──────────────────────────────────────────┘
//! ```
//!
//! Outbound frames never carry additional info. The parser in
//! [`telegram`](crate::protocol::telegram) honors it on input.

use crate::addressing::{GroupAddress, IndividualAddress};
use crate::error::{KnxError, Result};
use crate::protocol::constants::{
    CemiMessageCode, Priority, APCI_GROUP_VALUE_READ, APCI_GROUP_VALUE_RESPONSE,
    APCI_GROUP_VALUE_WRITE, CTRL1_DEFAULT, CTRL2_GROUP_ADDRESS, CTRL2_HOP_COUNT_6,
};
use crate::protocol::frame::FrameBuilder;

/// Control Field 1 of `L_Data` frame
///
/// ```text
/// Bit 7: Frame Type (0=extended, 1=standard)
/// Bit 6: Reserved
/// Bit 5: Repeat (0=repeat, 1=do not repeat)
/// Bit 4: System Broadcast (0=system, 1=broadcast)
/// Bit 3-2: Priority (00=system, 01=normal, 10=urgent, 11=low)
/// Bit 1: Acknowledge Request (0=no ack, 1=ack requested)
/// Bit 0: Confirm (0=no error, 1=error)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlField1 {
    raw: u8,
}

impl From<u8> for ControlField1 {
    #[inline(always)]
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl From<ControlField1> for u8 {
    #[inline(always)]
    fn from(ctrl: ControlField1) -> u8 {
        ctrl.raw
    }
}

impl ControlField1 {
    /// Get raw byte value
    #[inline(always)]
    pub const fn raw(self) -> u8 {
        self.raw
    }

    /// Check if frame is standard (true) or extended (false)
    #[inline(always)]
    pub const fn is_standard_frame(self) -> bool {
        (self.raw & 0x80) != 0
    }

    /// Check if repeat flag is set (do not repeat if true)
    #[inline(always)]
    pub const fn do_not_repeat(self) -> bool {
        (self.raw & 0x20) != 0
    }

    /// Check if this is a system broadcast
    #[inline(always)]
    pub const fn is_broadcast(self) -> bool {
        (self.raw & 0x10) != 0
    }

    /// Get priority
    #[inline(always)]
    pub const fn priority(self) -> Priority {
        Priority::from_u8((self.raw >> 2) & 0x03)
    }

    /// Check if acknowledge is requested
    #[inline(always)]
    pub const fn ack_requested(self) -> bool {
        (self.raw & 0x02) != 0
    }
}

impl Default for ControlField1 {
    /// `0xBC`: standard frame, do not repeat, broadcast, low priority.
    #[inline]
    fn default() -> Self {
        Self { raw: CTRL1_DEFAULT }
    }
}

/// Control Field 2 of `L_Data` frame
///
/// ```text
/// Bit 7: Destination Address Type (0=individual, 1=group)
/// Bit 6-4: Hop Count (0-7)
/// Bit 3-0: Extended Frame Format (0000=standard)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlField2 {
    raw: u8,
}

impl From<u8> for ControlField2 {
    #[inline(always)]
    fn from(raw: u8) -> Self {
        Self { raw }
    }
}

impl From<ControlField2> for u8 {
    #[inline(always)]
    fn from(ctrl: ControlField2) -> u8 {
        ctrl.raw
    }
}

impl ControlField2 {
    /// Outbound value: hop count 6 plus the address type bit.
    #[inline]
    pub const fn for_destination(is_group: bool) -> Self {
        let raw = if is_group {
            CTRL2_HOP_COUNT_6 | CTRL2_GROUP_ADDRESS
        } else {
            CTRL2_HOP_COUNT_6
        };
        Self { raw }
    }

    /// Get raw byte value
    #[inline(always)]
    pub const fn raw(self) -> u8 {
        self.raw
    }

    /// Check if destination is group address (true) or individual (false)
    #[inline(always)]
    pub const fn is_group_address(self) -> bool {
        (self.raw & CTRL2_GROUP_ADDRESS) != 0
    }

    /// Get hop count (0-7), also called the routing counter
    #[inline(always)]
    pub const fn hop_count(self) -> u8 {
        (self.raw >> 4) & 0x07
    }

    /// Get extended frame format
    #[inline(always)]
    pub const fn extended_format(self) -> u8 {
        self.raw & 0x0F
    }
}

/// Application layer service derived from a telegram command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Apci {
    /// `A_GroupValue_Read`
    GroupValueRead,
    /// `A_GroupValue_Response`
    GroupValueResponse,
    /// `A_GroupValue_Write`
    GroupValueWrite,
    /// Any other 4-bit service code
    Other(u8),
}

impl Apci {
    /// Build the command code from the TPCI and APCI bytes.
    ///
    /// The result is the 4-bit APCI opcode: TPCI bits 1-0 followed by APCI
    /// byte bits 7-6.
    #[inline]
    pub const fn command(tpci: u8, apci: u8) -> u8 {
        ((tpci & 0x03) << 2) | (apci >> 6)
    }

    /// Classify a command code.
    pub const fn from_command(command: u8) -> Self {
        match command {
            APCI_GROUP_VALUE_READ => Self::GroupValueRead,
            APCI_GROUP_VALUE_RESPONSE => Self::GroupValueResponse,
            APCI_GROUP_VALUE_WRITE => Self::GroupValueWrite,
            other => Self::Other(other),
        }
    }

    /// Command code for this service.
    pub const fn to_command(self) -> u8 {
        match self {
            Self::GroupValueRead => APCI_GROUP_VALUE_READ,
            Self::GroupValueResponse => APCI_GROUP_VALUE_RESPONSE,
            Self::GroupValueWrite => APCI_GROUP_VALUE_WRITE,
            Self::Other(code) => code,
        }
    }
}

/// Addressing part of an outbound `L_Data` service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LData {
    /// Control field 1
    pub ctrl1: ControlField1,
    /// Control field 2
    pub ctrl2: ControlField2,
    /// Sender
    pub source: IndividualAddress,
    /// Raw destination, group or individual per `ctrl2`
    pub destination: u16,
}

impl LData {
    /// Telegram addressed to a group.
    pub fn to_group(source: IndividualAddress, destination: GroupAddress) -> Self {
        Self {
            ctrl1: ControlField1::default(),
            ctrl2: ControlField2::for_destination(true),
            source,
            destination: destination.raw(),
        }
    }

    /// Telegram addressed to a single device.
    pub fn to_individual(source: IndividualAddress, destination: IndividualAddress) -> Self {
        Self {
            ctrl1: ControlField1::default(),
            ctrl2: ControlField2::for_destination(false),
            source,
            destination: destination.raw(),
        }
    }

    /// Append the cEMI block (`code 00 ctrl1 ctrl2 src dst len apdu`).
    ///
    /// The length byte is `apdu.len() + 1`.
    ///
    /// # Errors
    ///
    /// Returns a payload-too-large error if the APDU does not fit.
    pub fn write(&self, code: CemiMessageCode, apdu: &[u8], out: &mut FrameBuilder) -> Result<()> {
        let apdu_len = u8::try_from(apdu.len() + 1).map_err(|_| KnxError::payload_too_large())?;

        out.push(code.to_u8())?;
        out.push(0x00)?;
        out.push(self.ctrl1.raw())?;
        out.push(self.ctrl2.raw())?;
        out.extend(&self.source.raw().to_be_bytes())?;
        out.extend(&self.destination.to_be_bytes())?;
        out.push(apdu_len)?;
        out.extend(apdu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::constants::ServiceType;

    #[test]
    fn test_control_field1_default() {
        let ctrl = ControlField1::default();
        assert_eq!(ctrl.raw(), 0xBC);
        assert!(ctrl.is_standard_frame());
        assert!(ctrl.do_not_repeat());
        assert!(ctrl.is_broadcast());
        assert_eq!(ctrl.priority(), Priority::Low);
        assert!(!ctrl.ack_requested());
    }

    #[test]
    fn test_control_field2_group() {
        let ctrl = ControlField2::for_destination(true);
        assert_eq!(ctrl.raw(), 0xE0);
        assert!(ctrl.is_group_address());
        assert_eq!(ctrl.hop_count(), 6);
        assert_eq!(ctrl.extended_format(), 0);
    }

    #[test]
    fn test_control_field2_individual_addr() {
        let ctrl = ControlField2::for_destination(false);
        assert_eq!(ctrl.raw(), 0x60);
        assert!(!ctrl.is_group_address());
        assert_eq!(ControlField2::from(0xD5).hop_count(), 5);
    }

    #[test]
    fn test_apci_command() {
        // group write: TPCI 0x00, APCI byte 0x80
        assert_eq!(Apci::command(0x00, 0x80), 0x02);
        assert_eq!(Apci::command(0x00, 0x81), 0x02);
        assert_eq!(Apci::command(0x00, 0x40), 0x01);
        assert_eq!(Apci::command(0x03, 0xC0), 0x0F);
        assert_eq!(Apci::from_command(0x02), Apci::GroupValueWrite);
        assert_eq!(Apci::from_command(0x00), Apci::GroupValueRead);
        assert_eq!(Apci::from_command(0x0F), Apci::Other(0x0F));
        assert_eq!(Apci::GroupValueResponse.to_command(), 0x01);
    }

    #[test]
    fn test_ldata_write_group() {
        let ldata = LData::to_group(
            IndividualAddress::from_parts(1, 1, 250),
            GroupAddress::from_parts(1, 0, 1),
        );
        let mut out = FrameBuilder::new(ServiceType::RoutingIndication).unwrap();
        ldata
            .write(CemiMessageCode::LDataInd, &[0x00, 0x81], &mut out)
            .unwrap();
        let frame = out.finish().unwrap();
        assert_eq!(
            &frame[6..],
            &[0x29, 0x00, 0xBC, 0xE0, 0x11, 0xFA, 0x08, 0x01, 0x03, 0x00, 0x81]
        );
    }

    #[test]
    fn test_ldata_write_individual() {
        let ldata = LData::to_individual(
            IndividualAddress::from_parts(1, 1, 1),
            IndividualAddress::from_parts(1, 1, 2),
        );
        let mut out = FrameBuilder::new(ServiceType::RoutingIndication).unwrap();
        ldata.write(CemiMessageCode::LDataReq, &[0x00, 0x00], &mut out).unwrap();
        let frame = out.finish().unwrap();
        assert_eq!(frame[9], 0x60);
        assert_eq!(&frame[12..14], &[0x11, 0x02]);
    }
}
