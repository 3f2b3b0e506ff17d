#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![doc = include_str!("../README.md")]

//! # knx-ipcore
//!
//! KNXnet/IP frame codec and group telegram dispatch for devices that talk to
//! a KNX installation over UDP.
//!
//! The crate builds and parses datagrams; it never touches a socket. A small
//! driver loop sends what [`KnxEndpoint`] produces and feeds back what the
//! socket receives:
//!
//! ```rust
//! use knx_ipcore::{dpt, ga, DatapointType, EndpointConfig, KnxEndpoint, TransportMode};
//!
//! let mut endpoint = KnxEndpoint::new(EndpointConfig::default().with_mode(TransportMode::Routing));
//! endpoint.register(ga!(3/2/1), |t| {
//!     if let Ok(value) = t.value(DatapointType::Float) {
//!         let _ = value.as_f32();
//!     }
//! });
//!
//! let frame = endpoint.write_float(ga!(1/0/1), 22.5)?;
//! assert_eq!(&frame[frame.len() - 2..], &[0x0C, 0x65]);
//! assert_eq!(dpt::decode_float(&[0x00, 0x80, 0x0C, 0x65])?, 22.5);
//! # Ok::<(), knx_ipcore::KnxError>(())
//! ```
//!
//! Lower-level pieces are public too: [`protocol::build_frame`] for raw
//! frames, [`Telegram::parse`] for inbound datagrams and [`GroupRegistry`]
//! for dispatch without an endpoint.

extern crate alloc;

// Macro modules (must be declared before use)
#[macro_use]
mod logging;
#[macro_use]
pub mod macros;

pub mod addressing;
pub mod configuration;
pub mod dispatch;
pub mod dpt;
pub mod endpoint;
pub mod error;
pub mod net;
pub mod protocol;

// Re-export commonly used types
#[doc(inline)]
pub use addressing::{
    pack_group_address, pack_individual_address, unpack_group_address,
    unpack_individual_address, GroupAddress, IndividualAddress, PhysicalAddress,
};
#[doc(inline)]
pub use configuration::EndpointConfig;
#[doc(inline)]
pub use dispatch::GroupRegistry;
#[doc(inline)]
pub use dpt::{DatapointType, DatapointValue, Dpt1, Dpt5, Dpt9, DptDecode, DptEncode};
#[doc(inline)]
pub use endpoint::KnxEndpoint;
#[doc(inline)]
pub use error::{KnxError, Result};
#[doc(inline)]
pub use net::{Endpoint, Ipv4Addr};
#[doc(inline)]
pub use protocol::{Frame, Telegram, TransportMode};
