//! Convenience macros for working with KNX addresses and endpoints.

/// Creates a [`GroupAddress`](crate::addressing::GroupAddress) from 3-level notation.
///
/// # Syntax
///
/// ```text
/// ga!(main/middle/sub)
/// ```
///
/// # Examples
///
/// ```
/// use knx_ipcore::{ga, GroupAddress};
///
/// let light_switch = ga!(2/1/5);
/// assert_eq!(light_switch, GroupAddress::new(2, 1, 5).unwrap());
/// ```
///
/// # Compile-Time Validation
///
/// ```compile_fail
/// // main group > 31
/// let addr = knx_ipcore::ga!(32/0/0);
/// ```
///
/// ```compile_fail
/// // middle group > 7
/// let addr = knx_ipcore::ga!(1/8/0);
/// ```
#[macro_export]
macro_rules! ga {
    ($main:literal / $middle:literal / $sub:literal) => {{
        const _: () = {
            if $main > 31 {
                panic!("Main group must be 0-31");
            }
            if $middle > 7 {
                panic!("Middle group must be 0-7");
            }
            if $sub > 255 {
                panic!("Sub group must be 0-255");
            }
        };
        const ADDR: $crate::addressing::GroupAddress =
            $crate::addressing::GroupAddress::from_parts($main, $middle, $sub);
        ADDR
    }};
}

/// Creates an [`IndividualAddress`](crate::addressing::IndividualAddress) from
/// `area.line.device` notation.
///
/// The dotted form does not tokenize as three literals, so components are
/// separated by commas.
///
/// ```
/// use knx_ipcore::ia;
///
/// let device = ia!(1, 1, 250);
/// assert_eq!(device.to_string(), "1.1.250");
/// ```
///
/// ```compile_fail
/// // area > 15
/// let addr = knx_ipcore::ia!(16, 0, 0);
/// ```
#[macro_export]
macro_rules! ia {
    ($area:literal, $line:literal, $device:literal) => {{
        const _: () = {
            if $area > 15 {
                panic!("Area must be 0-15");
            }
            if $line > 15 {
                panic!("Line must be 0-15");
            }
            if $device > 255 {
                panic!("Device must be 0-255");
            }
        };
        const ADDR: $crate::addressing::IndividualAddress =
            $crate::addressing::IndividualAddress::from_parts($area, $line, $device);
        ADDR
    }};
}

/// Group write through a [`KnxEndpoint`](crate::endpoint::KnxEndpoint) with
/// inline address notation.
///
/// ```
/// use knx_ipcore::{knx_write, EndpointConfig, KnxEndpoint, TransportMode};
///
/// let mut endpoint = KnxEndpoint::new(EndpointConfig::default().with_mode(TransportMode::Routing));
/// let frame = knx_write!(endpoint, 1/0/1, 22.5f32)?;
/// assert_eq!(&frame[frame.len() - 4..], &[0x00, 0x80, 0x0C, 0x65]);
/// # Ok::<(), knx_ipcore::KnxError>(())
/// ```
///
/// Returns the same `Result` as `KnxEndpoint::write()`.
#[macro_export]
macro_rules! knx_write {
    ($endpoint:expr, $main:literal / $middle:literal / $sub:literal, $value:expr) => {
        $endpoint.write($crate::ga!($main / $middle / $sub), $value)
    };
}

/// Registers several handlers in one block.
///
/// ```
/// use knx_ipcore::{on_group, GroupRegistry};
///
/// let mut registry = GroupRegistry::new();
/// on_group! {
///     registry,
///     1/0/1 => |t| { let _ = t.payload(); },
///     1/0/2 => |_| {},
/// }
/// assert_eq!(registry.addresses().count(), 2);
/// ```
#[macro_export]
macro_rules! on_group {
    ($registry:expr, $($main:literal / $middle:literal / $sub:literal => $handler:expr),* $(,)?) => {{
        $(
            $registry.register($crate::ga!($main / $middle / $sub), $handler);
        )*
    }};
}
