//! Network address types usable without `std`.
//!
//! The crate never opens sockets. These types only describe where an
//! outbound frame should go; the transport turns them into real endpoints
//! (`std::net::SocketAddrV4` under the `std` feature).

use core::fmt;

use crate::error::{KnxError, Result};

/// IPv4 address representation.
///
/// A lightweight wrapper around a 4-byte array that provides
/// ergonomic conversions from various input types.
///
/// # Examples
///
/// ```
/// use knx_ipcore::net::Ipv4Addr;
///
/// let a = Ipv4Addr::from([192, 168, 1, 10]);
/// let b = Ipv4Addr::from((192, 168, 1, 10));
/// let c: Ipv4Addr = "192.168.1.10".parse().unwrap();
/// assert_eq!(a, b);
/// assert_eq!(b, c);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ipv4Addr {
    octets: [u8; 4],
}

impl Ipv4Addr {
    /// Create a new IPv4 address from individual octets.
    #[inline]
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self {
            octets: [a, b, c, d],
        }
    }

    /// Returns the four octets that make up this address.
    #[inline]
    pub const fn octets(&self) -> [u8; 4] {
        self.octets
    }

    /// Whether this is in 224.0.0.0/4.
    #[inline]
    pub const fn is_multicast(&self) -> bool {
        self.octets[0] >= 224 && self.octets[0] <= 239
    }

    /// The unspecified address (0.0.0.0).
    pub const UNSPECIFIED: Self = Self::new(0, 0, 0, 0);
}

impl From<[u8; 4]> for Ipv4Addr {
    #[inline]
    fn from(octets: [u8; 4]) -> Self {
        Self { octets }
    }
}

impl From<(u8, u8, u8, u8)> for Ipv4Addr {
    #[inline]
    fn from((a, b, c, d): (u8, u8, u8, u8)) -> Self {
        Self::new(a, b, c, d)
    }
}

impl From<Ipv4Addr> for [u8; 4] {
    #[inline]
    fn from(addr: Ipv4Addr) -> [u8; 4] {
        addr.octets
    }
}

impl From<u32> for Ipv4Addr {
    #[inline]
    fn from(ip: u32) -> Self {
        Self {
            octets: ip.to_be_bytes(),
        }
    }
}

impl From<Ipv4Addr> for u32 {
    #[inline]
    fn from(addr: Ipv4Addr) -> u32 {
        u32::from_be_bytes(addr.octets)
    }
}

#[cfg(feature = "std")]
impl From<Ipv4Addr> for std::net::Ipv4Addr {
    fn from(addr: Ipv4Addr) -> Self {
        let [a, b, c, d] = addr.octets;
        std::net::Ipv4Addr::new(a, b, c, d)
    }
}

#[cfg(feature = "std")]
impl From<std::net::Ipv4Addr> for Ipv4Addr {
    fn from(addr: std::net::Ipv4Addr) -> Self {
        Self {
            octets: addr.octets(),
        }
    }
}

impl fmt::Display for Ipv4Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets;
        write!(f, "{a}.{b}.{c}.{d}")
    }
}

impl core::str::FromStr for Ipv4Addr {
    type Err = KnxError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('.');
        let mut octets = [0u8; 4];

        for octet in &mut octets {
            *octet = parts
                .next()
                .and_then(|p| p.parse().ok())
                .ok_or_else(KnxError::invalid_ip_address)?;
        }

        if parts.next().is_some() {
            return Err(KnxError::invalid_ip_address());
        }

        Ok(Self { octets })
    }
}

/// UDP destination of an outbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Endpoint {
    /// Unicast gateway or multicast group
    pub ip: Ipv4Addr,
    /// UDP port
    pub port: u16,
}

impl Endpoint {
    /// Create an endpoint
    pub const fn new(ip: Ipv4Addr, port: u16) -> Self {
        Self { ip, port }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}

#[cfg(feature = "std")]
impl From<Endpoint> for std::net::SocketAddrV4 {
    fn from(ep: Endpoint) -> Self {
        std::net::SocketAddrV4::new(ep.ip.into(), ep.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversions() {
        let addr = Ipv4Addr::new(192, 168, 1, 10);
        assert_eq!(addr.octets(), [192, 168, 1, 10]);
        assert_eq!(Ipv4Addr::from(0xC0A8010A), addr);
        assert_eq!(u32::from(addr), 0xC0A8010A);
        assert_eq!(<[u8; 4]>::from(addr), [192, 168, 1, 10]);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Ipv4Addr::new(192, 168, 1, 10)), "192.168.1.10");
        let ep = Endpoint::new(Ipv4Addr::new(224, 0, 23, 12), 3671);
        assert_eq!(format!("{ep}"), "224.0.23.12:3671");
    }

    #[test]
    fn test_from_str_invalid() {
        for s in ["192.168.1", "192.168.1.256", "192.168.1.10.5", "a.b.c.d", ""] {
            let err = s.parse::<Ipv4Addr>().unwrap_err();
            assert!(matches!(err, KnxError::Addressing(ref e) if e.is_invalid_format()), "{s}");
        }
    }

    #[test]
    fn test_multicast() {
        assert!(Ipv4Addr::new(224, 0, 23, 12).is_multicast());
        assert!(!Ipv4Addr::new(192, 168, 1, 10).is_multicast());
        assert!(!Ipv4Addr::UNSPECIFIED.is_multicast());
    }
}
