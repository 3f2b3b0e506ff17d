//! One local KNX device: outbound group writes and inbound dispatch.
//!
//! [`KnxEndpoint`] owns no socket. Frames returned by the `write*` methods are
//! sent by the caller to [`KnxEndpoint::destination`], and every datagram
//! received on the socket is handed to [`KnxEndpoint::handle_datagram`].
//!
//! ```rust
//! use knx_ipcore::{ga, DatapointType, EndpointConfig, KnxEndpoint, TransportMode};
//!
//! let config = EndpointConfig::default().with_mode(TransportMode::Routing);
//! let mut endpoint = KnxEndpoint::new(config);
//!
//! endpoint.register(ga!(3/2/1), |t| {
//!     let celsius = t.value(DatapointType::Float).unwrap_or(0.0f32.into());
//!     let _ = celsius;
//! });
//!
//! let frame = endpoint.write_float(ga!(3/2/1), 21.5)?;
//! // looped back, as a multicast socket would deliver it
//! assert_eq!(endpoint.handle_datagram(&frame), 1);
//! # Ok::<(), knx_ipcore::KnxError>(())
//! ```

use crate::addressing::GroupAddress;
use crate::configuration::EndpointConfig;
use crate::dispatch::GroupRegistry;
use crate::dpt::DatapointValue;
use crate::error::Result;
use crate::net::Endpoint;
use crate::protocol::cemi::LData;
use crate::protocol::constants::KNXNETIP_MULTICAST_ADDR;
use crate::protocol::frame::{build_frame, ConnectionHeader, Frame, TransportMode};
use crate::protocol::telegram::Telegram;

/// Configuration, tunneling sequence counter and handler registry.
#[derive(Debug)]
pub struct KnxEndpoint {
    config: EndpointConfig,
    sequence: u8,
    registry: GroupRegistry,
}

impl KnxEndpoint {
    /// Create an endpoint with an empty registry and sequence 0.
    pub fn new(config: EndpointConfig) -> Self {
        Self {
            config,
            sequence: 0,
            registry: GroupRegistry::new(),
        }
    }

    /// Active configuration
    pub const fn config(&self) -> &EndpointConfig {
        &self.config
    }

    /// Sequence number the next tunneling frame will carry.
    pub const fn sequence(&self) -> u8 {
        self.sequence
    }

    /// Where outbound frames go: the gateway for tunneling, the KNX multicast
    /// group for routing.
    pub fn destination(&self) -> Endpoint {
        match self.config.mode {
            TransportMode::Tunneling => Endpoint::new(self.config.gateway, self.config.port),
            TransportMode::Routing => Endpoint::new(KNXNETIP_MULTICAST_ADDR, self.config.port),
        }
    }

    /// Build a group value write for `address`.
    ///
    /// In tunneling mode the sequence counter advances (wrapping) once the
    /// frame has been built.
    ///
    /// # Errors
    ///
    /// Returns a DPT error for an out-of-range float, or a protocol error if
    /// the frame does not fit. The counter is untouched on error.
    pub fn write(
        &mut self,
        address: GroupAddress,
        value: impl Into<DatapointValue>,
    ) -> Result<Frame> {
        let value = value.into();
        let apdu = value.encode().inspect_err(|_| {
            knx_log!(warn, "rejected value for {}", address);
        })?;
        let ldata = LData::to_group(self.config.individual_address, address);
        let connection = ConnectionHeader::new(self.config.channel_id, self.sequence);
        let frame = build_frame(self.config.mode, connection, &ldata, &apdu)?;

        if self.config.mode == TransportMode::Tunneling {
            self.sequence = self.sequence.wrapping_add(1);
        }
        knx_log!(debug, "group write to {} ({} bytes)", address, frame.len());
        Ok(frame)
    }

    /// DPT 1 write
    ///
    /// # Errors
    ///
    /// See [`KnxEndpoint::write`].
    pub fn write_bool(&mut self, address: GroupAddress, value: bool) -> Result<Frame> {
        self.write(address, DatapointValue::Bool(value))
    }

    /// DPT 5 write
    ///
    /// # Errors
    ///
    /// See [`KnxEndpoint::write`].
    pub fn write_u8(&mut self, address: GroupAddress, value: u8) -> Result<Frame> {
        self.write(address, DatapointValue::U8(value))
    }

    /// DPT 9 write
    ///
    /// # Errors
    ///
    /// Fails for values outside the DPT 9 domain. See [`KnxEndpoint::write`].
    pub fn write_float(&mut self, address: GroupAddress, value: f32) -> Result<Frame> {
        self.write(address, DatapointValue::Float(value))
    }

    /// Parse a received datagram in the configured mode and dispatch it.
    ///
    /// Returns the number of handlers invoked; malformed input yields 0.
    pub fn handle_datagram(&mut self, data: &[u8]) -> usize {
        let telegram = Telegram::parse(data, self.config.mode);
        if telegram.is_empty() {
            return 0;
        }
        self.registry.dispatch(&telegram)
    }

    /// Register a handler for `address`; see [`GroupRegistry::register`].
    pub fn register<F>(&mut self, address: GroupAddress, handler: F)
    where
        F: FnMut(&Telegram) + 'static,
    {
        self.registry.register(address, handler);
    }

    /// Remove all handlers for `address`; see [`GroupRegistry::unregister`].
    pub fn unregister(&mut self, address: GroupAddress) -> usize {
        self.registry.unregister(address)
    }

    /// Handler registry
    pub const fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    /// Mutable handler registry
    pub fn registry_mut(&mut self) -> &mut GroupRegistry {
        &mut self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::addressing::IndividualAddress;
    use crate::error::KnxError;
    use crate::net::Ipv4Addr;
    use alloc::rc::Rc;
    use core::cell::RefCell;

    fn tunneling() -> KnxEndpoint {
        KnxEndpoint::new(
            EndpointConfig::default()
                .with_gateway([192, 168, 1, 10])
                .with_individual_address(IndividualAddress::from_parts(1, 1, 250))
                .with_channel_id(0x15),
        )
    }

    #[test]
    fn test_tunneling_write_layout_and_sequence() {
        let mut endpoint = tunneling();
        let addr = GroupAddress::from_parts(1, 0, 1);

        let first = endpoint.write_float(addr, 22.5).unwrap();
        assert_eq!(&first[6..10], &[0x04, 0x15, 0x00, 0x00]);
        assert_eq!(&first[first.len() - 4..], &[0x00, 0x80, 0x0C, 0x65]);

        let second = endpoint.write_bool(addr, true).unwrap();
        assert_eq!(second[8], 0x01);
        assert_eq!(endpoint.sequence(), 2);
    }

    #[test]
    fn test_sequence_wraps() {
        let mut endpoint = tunneling();
        for _ in 0..256 {
            endpoint.write_u8(GroupAddress::from_parts(0, 0, 1), 1).unwrap();
        }
        assert_eq!(endpoint.sequence(), 0);
    }

    #[test]
    fn test_rejected_value_keeps_sequence() {
        let mut endpoint = tunneling();
        let err = endpoint.write_float(GroupAddress::from_parts(1, 0, 1), 700_000.0).unwrap_err();
        assert!(matches!(err, KnxError::Dpt(ref e) if e.is_out_of_range()));
        assert_eq!(endpoint.sequence(), 0);
    }

    #[test]
    fn test_routing_does_not_count() {
        let mut endpoint =
            KnxEndpoint::new(EndpointConfig::default().with_mode(TransportMode::Routing));
        let frame = endpoint.write_u8(GroupAddress::from_parts(1, 0, 1), 42).unwrap();
        assert_eq!(&frame[2..4], &[0x05, 0x30]);
        assert_eq!(frame[6], 0x29);
        assert_eq!(endpoint.sequence(), 0);
    }

    #[test]
    fn test_destination() {
        let endpoint = tunneling();
        assert_eq!(endpoint.destination(), Endpoint::new(Ipv4Addr::new(192, 168, 1, 10), 3671));

        let routing = KnxEndpoint::new(EndpointConfig::default().with_mode(TransportMode::Routing));
        assert_eq!(routing.destination(), Endpoint::new(Ipv4Addr::new(224, 0, 23, 12), 3671));
    }

    #[test]
    fn test_handle_datagram_dispatches() {
        let mut endpoint = tunneling();
        let addr = GroupAddress::from_parts(1, 0, 1);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        endpoint.register(addr, move |t| sink.borrow_mut().push(t.source()));

        let frame = endpoint.write_bool(addr, true).unwrap();
        assert_eq!(endpoint.handle_datagram(&frame), 1);
        assert_eq!(*seen.borrow(), [IndividualAddress::from_parts(1, 1, 250)]);

        assert_eq!(endpoint.handle_datagram(&frame[..12]), 0);
        assert_eq!(endpoint.unregister(addr), 1);
        assert_eq!(endpoint.handle_datagram(&frame), 0);
        assert!(endpoint.registry().is_empty());
    }
}
