//! KNXnet/IP protocol layer.
//!
//! Frame construction ([`frame`]), the cEMI L_Data body ([`cemi`]) and
//! inbound telegram parsing ([`telegram`]). Wire constants live in
//! [`constants`].

pub mod cemi;
pub mod constants;
pub mod frame;
pub mod telegram;

pub use cemi::{Apci, ControlField1, ControlField2, LData};
pub use constants::*;
pub use frame::{build_frame, ConnectionHeader, Frame, FrameBuilder, KnxnetIpHeader, TransportMode};
pub use telegram::{Payload, Telegram};
