//! KNXnet/IP wire constants, service types and cEMI message codes.

use crate::net::Ipv4Addr;

/// KNXnet/IP protocol version 1.0
pub const KNXNETIP_VERSION_10: u8 = 0x10;

/// Standard KNXnet/IP header length (6 bytes)
pub const HEADER_SIZE_10: u8 = 0x06;

/// Standard UDP port for KNXnet/IP communication
pub const KNXNETIP_DEFAULT_PORT: u16 = 3671;

/// KNXnet/IP multicast address for routing
pub const KNXNETIP_MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(224, 0, 23, 12);

/// Maximum size of an outbound KNXnet/IP frame
pub const MAX_FRAME_SIZE: usize = 256;

/// Maximum number of payload bytes kept on a parsed telegram
pub const MAX_PAYLOAD_SIZE: usize = 254;

/// Length of the tunneling connection header (`04 channel seq 00`)
pub const CONNECTION_HEADER_SIZE: u8 = 0x04;

// =============================================================================
// L_Data control fields and application layer
// =============================================================================

/// Control field 1 for outbound frames: standard frame, no repeat, broadcast, low priority
pub const CTRL1_DEFAULT: u8 = 0xBC;

/// Control field 2 for outbound frames: hop count 6
pub const CTRL2_HOP_COUNT_6: u8 = 0x60;

/// Control field 2 destination address type bit
pub const CTRL2_GROUP_ADDRESS: u8 = 0x80;

/// TPCI for unnumbered data (no transport control)
pub const TPCI_UNNUMBERED_DATA: u8 = 0x00;

/// APCI `A_GroupValue_Read`
pub const APCI_GROUP_VALUE_READ: u8 = 0x00;

/// APCI `A_GroupValue_Response`
pub const APCI_GROUP_VALUE_RESPONSE: u8 = 0x01;

/// APCI `A_GroupValue_Write`
pub const APCI_GROUP_VALUE_WRITE: u8 = 0x02;

/// Mask for the 6 bits of short data carried in the APCI byte
pub const SHORT_DATA_MASK: u8 = 0x3F;

// =============================================================================
// Service Type Identifiers
// =============================================================================

/// Service type constant for TUNNELING_REQUEST (0x0420)
pub const SERVICE_TUNNELING_REQUEST: u16 = 0x0420;
/// Service type constant for ROUTING_INDICATION (0x0530)
pub const SERVICE_ROUTING_INDICATION: u16 = 0x0530;

/// KNXnet/IP service type identifiers this crate understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum ServiceType {
    /// `TUNNELLING_REQUEST` - Tunnelling data request
    TunnellingRequest = 0x0420,
    /// `TUNNELLING_ACK` - Tunnelling acknowledgement
    TunnellingAck = 0x0421,
    /// `ROUTING_INDICATION` - Routing indication (multicast)
    RoutingIndication = 0x0530,
    /// `ROUTING_LOST_MESSAGE` - Routing lost message indication
    RoutingLostMessage = 0x0531,
    /// `ROUTING_BUSY` - Routing busy indication
    RoutingBusy = 0x0532,
}

impl ServiceType {
    /// Convert a u16 to `ServiceType`
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0420 => Some(Self::TunnellingRequest),
            0x0421 => Some(Self::TunnellingAck),
            0x0530 => Some(Self::RoutingIndication),
            0x0531 => Some(Self::RoutingLostMessage),
            0x0532 => Some(Self::RoutingBusy),
            _ => None,
        }
    }

    /// Convert `ServiceType` to u16
    pub const fn to_u16(self) -> u16 {
        self as u16
    }
}

// =============================================================================
// cEMI Message Codes
// =============================================================================

/// cEMI Message Codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CemiMessageCode {
    /// `L_Data.req` - Data request
    LDataReq = 0x11,
    /// `L_Data.ind` - Data indication
    LDataInd = 0x29,
    /// `L_Data.con` - Data confirmation
    LDataCon = 0x2E,
    /// `L_Busmon.ind` - Bus monitor indication
    LBusmonInd = 0x2B,
    /// `L_Raw.req` - Raw frame request
    LRawReq = 0x10,
}

impl CemiMessageCode {
    /// Convert u8 to `CemiMessageCode`
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x11 => Some(Self::LDataReq),
            0x29 => Some(Self::LDataInd),
            0x2E => Some(Self::LDataCon),
            0x2B => Some(Self::LBusmonInd),
            0x10 => Some(Self::LRawReq),
            _ => None,
        }
    }

    /// Convert `CemiMessageCode` to u8
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// `L_Data` service primitives carry an additional-info block before the
    /// control fields.
    pub const fn is_ldata(self) -> bool {
        matches!(self, Self::LDataReq | Self::LDataInd | Self::LDataCon)
    }
}

// =============================================================================
// KNX Priority
// =============================================================================

/// KNX message priority levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Priority {
    /// System priority
    System = 0b00,
    /// Normal priority
    #[default]
    Normal = 0b01,
    /// Urgent priority
    Urgent = 0b10,
    /// Low priority
    Low = 0b11,
}

impl Priority {
    /// Convert the low 2 bits of `value` to a priority
    pub const fn from_u8(value: u8) -> Self {
        match value & 0b11 {
            0b00 => Self::System,
            0b01 => Self::Normal,
            0b10 => Self::Urgent,
            _ => Self::Low,
        }
    }

    /// Convert Priority to u8
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}
