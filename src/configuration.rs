//! Endpoint configuration from a `KEY=VALUE` text block.
//!
//! Edit [`CONFIG`] to match your installation, or feed your own block to
//! [`EndpointConfig::from_config_str`]. Blank lines and lines starting with
//! `#` are ignored. Missing keys fall back to [`EndpointConfig::default`];
//! present but malformed values are an error naming the key.

use crate::addressing::IndividualAddress;
use crate::error::{KnxError, Result};
use crate::net::Ipv4Addr;
use crate::protocol::constants::KNXNETIP_DEFAULT_PORT;
use crate::protocol::frame::TransportMode;

/// Built-in configuration block.
pub const CONFIG: &str = r#"
KNX_MODE=tunneling
KNX_GATEWAY_IP=192.168.1.10
KNX_INDIVIDUAL_ADDRESS=1.1.0
KNX_CHANNEL_ID=1
"#;

/// Transport mode key (`tunneling` or `routing`)
pub const KEY_MODE: &str = "KNX_MODE";
/// Gateway IPv4 address key
pub const KEY_GATEWAY_IP: &str = "KNX_GATEWAY_IP";
/// Local individual address key (`area.line.device`)
pub const KEY_INDIVIDUAL_ADDRESS: &str = "KNX_INDIVIDUAL_ADDRESS";
/// Tunneling channel key (decimal or `0x` hex)
pub const KEY_CHANNEL_ID: &str = "KNX_CHANNEL_ID";

/// Look up the value for `key`, trimmed.
///
/// The first matching line wins.
pub fn get_value<'a>(config: &'a str, key: &str) -> Option<&'a str> {
    config
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .find_map(|line| {
            let (k, v) = line.split_once('=')?;
            (k.trim() == key).then(|| v.trim())
        })
}

fn parse_channel_id(value: &str) -> Option<u8> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => value.parse().ok(),
    }
}

/// Settings for one local KNX device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndpointConfig {
    /// Tunneling or routing
    pub mode: TransportMode,
    /// Gateway for tunneling; unused for routing
    pub gateway: Ipv4Addr,
    /// UDP port of the gateway or multicast group
    pub port: u16,
    /// Source address stamped on outbound frames
    pub individual_address: IndividualAddress,
    /// Tunneling channel assigned by the gateway
    pub channel_id: u8,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::Tunneling,
            gateway: Ipv4Addr::new(192, 168, 1, 10),
            port: KNXNETIP_DEFAULT_PORT,
            individual_address: IndividualAddress::from_parts(1, 1, 0),
            channel_id: 1,
        }
    }
}

impl EndpointConfig {
    /// Parse a `KEY=VALUE` block.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for the first malformed value.
    ///
    /// # Examples
    ///
    /// ```
    /// use knx_ipcore::{EndpointConfig, TransportMode};
    ///
    /// let config = EndpointConfig::from_config_str("KNX_MODE=routing\nKNX_INDIVIDUAL_ADDRESS=1.1.7")?;
    /// assert_eq!(config.mode, TransportMode::Routing);
    /// assert_eq!(config.individual_address.to_string(), "1.1.7");
    /// # Ok::<(), knx_ipcore::KnxError>(())
    /// ```
    pub fn from_config_str(config: &str) -> Result<Self> {
        let mut out = Self::default();

        match get_value(config, KEY_MODE) {
            Some(v) => out.mode = v.parse()?,
            None => knx_log!(warn, "{} missing, using {}", KEY_MODE, out.mode.as_str()),
        }

        match get_value(config, KEY_GATEWAY_IP) {
            Some(v) => out.gateway = v.parse().map_err(|_| KnxError::invalid_config_gateway())?,
            None => {
                if out.mode == TransportMode::Tunneling {
                    knx_log!(warn, "{} missing, using default gateway", KEY_GATEWAY_IP);
                }
            }
        }

        match get_value(config, KEY_INDIVIDUAL_ADDRESS) {
            Some(v) => {
                out.individual_address =
                    v.parse().map_err(|_| KnxError::invalid_config_address())?;
            }
            None => knx_log!(warn, "{} missing, using default address", KEY_INDIVIDUAL_ADDRESS),
        }

        if let Some(v) = get_value(config, KEY_CHANNEL_ID) {
            out.channel_id = parse_channel_id(v).ok_or_else(KnxError::invalid_config_channel)?;
        }

        Ok(out)
    }

    /// Parse the built-in [`CONFIG`] block.
    ///
    /// # Errors
    ///
    /// Only if [`CONFIG`] has been edited into something malformed.
    pub fn from_default_config() -> Result<Self> {
        Self::from_config_str(CONFIG)
    }

    /// Set the transport mode
    #[must_use]
    pub const fn with_mode(mut self, mode: TransportMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the gateway address
    #[must_use]
    pub fn with_gateway(mut self, gateway: impl Into<Ipv4Addr>) -> Self {
        self.gateway = gateway.into();
        self
    }

    /// Set the UDP port
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the local individual address
    #[must_use]
    pub const fn with_individual_address(mut self, address: IndividualAddress) -> Self {
        self.individual_address = address;
        self
    }

    /// Set the tunneling channel
    #[must_use]
    pub const fn with_channel_id(mut self, channel_id: u8) -> Self {
        self.channel_id = channel_id;
        self
    }
}
