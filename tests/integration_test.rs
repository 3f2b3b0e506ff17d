//! End-to-end tests through the public API: configuration, frame building,
//! parsing and dispatch, with no network involved.

use std::cell::RefCell;
use std::rc::Rc;

use knx_ipcore::dpt::{self, DatapointType, DatapointValue};
use knx_ipcore::protocol::{build_frame, ConnectionHeader, LData};
use knx_ipcore::{
    ga, ia, knx_write, on_group, EndpointConfig, GroupAddress, GroupRegistry, IndividualAddress,
    KnxEndpoint, KnxError, Telegram, TransportMode,
};

fn endpoint(mode: TransportMode) -> KnxEndpoint {
    KnxEndpoint::new(
        EndpointConfig::default()
            .with_mode(mode)
            .with_individual_address(ia!(1, 1, 250))
            .with_channel_id(0x15),
    )
}

#[test]
fn test_tunneling_temperature_end_to_end() {
    let mut sender = endpoint(TransportMode::Tunneling);
    let frame = sender.write_float(ga!(1 / 0 / 1), 22.5).unwrap();

    assert_eq!(
        frame.as_slice(),
        &[
            0x06, 0x10, 0x04, 0x20, 0x00, 0x17, // header
            0x04, 0x15, 0x00, 0x00, // connection header
            0x11, 0x00, 0xBC, 0xE0, 0x11, 0xFA, 0x08, 0x01, 0x05, 0x00, 0x80, 0x0C, 0x65,
        ][..]
    );

    let telegram = Telegram::parse(&frame, TransportMode::Tunneling);
    assert_eq!(telegram.source(), ia!(1, 1, 250));
    assert_eq!(telegram.group_address(), Some(ga!(1 / 0 / 1)));
    assert_eq!(telegram.routing_counter(), 6);
    assert_eq!(telegram.payload(), &[0x00, 0x0C, 0x65]);
    assert_eq!(telegram.value(DatapointType::Float).unwrap(), DatapointValue::Float(22.5));
}

#[test]
fn test_same_ldata_under_both_framings() {
    let ldata = LData::to_group(ia!(1, 1, 250), ga!(3 / 2 / 1));
    let apdu = dpt::encode_u8(200);

    let tunnel = build_frame(TransportMode::Tunneling, ConnectionHeader::new(1, 9), &ldata, &apdu)
        .unwrap();
    let routing =
        build_frame(TransportMode::Routing, ConnectionHeader::default(), &ldata, &apdu).unwrap();

    assert_eq!(tunnel.len(), routing.len() + 4);
    // cEMI bodies differ only in the message code
    assert_eq!(tunnel[10], 0x11);
    assert_eq!(routing[6], 0x29);
    assert_eq!(&tunnel[11..], &routing[7..]);

    let a = Telegram::parse(&tunnel, TransportMode::Tunneling);
    let b = Telegram::parse(&routing, TransportMode::Routing);
    assert_eq!(a, b);
    assert_eq!(Telegram::parse_frame(&tunnel), a);
    assert_eq!(Telegram::parse_frame(&routing), b);
    assert_eq!(a.value(DatapointType::U8).unwrap().as_u8(), Some(200));
}

#[test]
fn test_wrong_mode_does_not_panic() {
    let mut tunneling = endpoint(TransportMode::Tunneling);
    let mut routing = endpoint(TransportMode::Routing);
    let tunnel_frame = tunneling.write_bool(ga!(1 / 0 / 1), true).unwrap();
    let routing_frame = routing.write_bool(ga!(1 / 0 / 1), true).unwrap();

    // a routing frame is too short once a tunneling header is skipped
    assert!(Telegram::parse(&routing_frame, TransportMode::Tunneling).is_empty());
    // the other way round yields garbage, but no panic
    let _ = Telegram::parse(&tunnel_frame, TransportMode::Routing);
}

#[test]
fn test_truncated_frames_are_empty() {
    let mut sender = endpoint(TransportMode::Tunneling);
    let frame = sender.write_float(ga!(1 / 0 / 1), -22.5).unwrap();

    for len in 0..frame.len() {
        let telegram = Telegram::parse(&frame[..len], TransportMode::Tunneling);
        if len < 18 {
            assert!(telegram.is_empty(), "prefix of {len} bytes");
        }
    }
    let full = Telegram::parse(&frame, TransportMode::Tunneling);
    assert_eq!(dpt::decode_float(&[0x00, 0x80, 0x8B, 0x9B]).unwrap(), -22.5);
    assert_eq!(full.payload(), &[0x00, 0x8B, 0x9B]);
}

#[test]
fn test_loopback_dispatch_in_order() {
    let mut node = endpoint(TransportMode::Routing);
    let log = Rc::new(RefCell::new(Vec::new()));

    for tag in ["first", "second"] {
        let log = Rc::clone(&log);
        node.register(ga!(3 / 2 / 1), move |t| {
            let celsius = t.value(DatapointType::Float).ok().and_then(|v| v.as_f32());
            log.borrow_mut().push((tag, celsius));
        });
    }

    let frame = knx_write!(node, 3 / 2 / 1, 19.5f32).unwrap();
    assert_eq!(node.handle_datagram(&frame), 2);

    let other = node.write_bool(ga!(3 / 2 / 2), false).unwrap();
    assert_eq!(node.handle_datagram(&other), 0);

    assert_eq!(*log.borrow(), [("first", Some(19.5)), ("second", Some(19.5))]);
}

#[test]
fn test_individual_destination_not_dispatched() {
    let mut registry = GroupRegistry::new();
    let hits = Rc::new(RefCell::new(0u32));
    let counter = Rc::clone(&hits);
    on_group! { registry, 1/0/1 => move |_| *counter.borrow_mut() += 1 }

    let ldata = LData::to_individual(ia!(1, 1, 250), IndividualAddress::from(ga!(1 / 0 / 1).raw()));
    let frame =
        build_frame(TransportMode::Routing, ConnectionHeader::default(), &ldata, &[0x00, 0x81])
            .unwrap();
    let telegram = Telegram::parse(&frame, TransportMode::Routing);

    assert_eq!(telegram.individual_destination(), Some(IndividualAddress::from(0x0801)));
    assert_eq!(registry.dispatch(&telegram), 0);
    assert_eq!(*hits.borrow(), 0);
}

#[test]
fn test_sequence_counter_in_frames() {
    let mut sender = endpoint(TransportMode::Tunneling);
    for i in 0..300u32 {
        let frame = sender.write_u8(GroupAddress::from_parts(0, 0, 1), 0).unwrap();
        assert_eq!(u32::from(frame[8]), i % 256);
    }
    assert_eq!(sender.sequence(), 44);
}

#[test]
fn test_config_block_drives_endpoint() {
    let config = EndpointConfig::from_config_str(
        "# office gateway
         KNX_MODE=routing
         KNX_GATEWAY_IP=10.0.0.2
         KNX_INDIVIDUAL_ADDRESS=1.1.7",
    )
    .unwrap();
    let mut node = KnxEndpoint::new(config);
    assert_eq!(node.destination().to_string(), "224.0.23.12:3671");

    let frame = node.write_bool(ga!(1 / 0 / 7), true).unwrap();
    let telegram = Telegram::parse_frame(&frame);
    assert_eq!(telegram.source().to_string(), "1.1.7");
    assert_eq!(telegram.payload(), &[0x01]);

    match EndpointConfig::from_config_str("KNX_MODE=serial") {
        Err(KnxError::Config(e)) => assert_eq!(e.key(), "KNX_MODE"),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn test_out_of_range_float_rejected() {
    let mut sender = endpoint(TransportMode::Tunneling);
    for value in [f32::NAN, 670_800.0, -671_100.0] {
        assert!(sender.write_float(ga!(1 / 0 / 1), value).is_err());
    }
    assert_eq!(sender.sequence(), 0);
    assert!(dpt::encode_float(670_760.96).is_ok());
}
