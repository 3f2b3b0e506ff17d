//! KNX addressing system.
//!
//! KNX uses two types of addresses:
//! - Individual (physical) addresses for devices (Area.Line.Device)
//! - Group addresses for logical grouping (Main/Middle/Sub or Main/Sub)
//!
//! The free `pack_*`/`unpack_*` functions are total: components wider than
//! their bit field are masked, never rejected.

pub mod group;
pub mod individual;

pub use group::{pack_group_address, unpack_group_address, GroupAddress};
pub use individual::{
    pack_individual_address, unpack_individual_address, IndividualAddress, PhysicalAddress,
};
