// InterfaceRecord (de)serialization: lenient counters, optional attributes

use ifdrift::models::{DeviceInterfaces, InterfaceRecord};

#[test]
fn counters_accept_integers_and_numeric_strings() {
    let json = r#"{
        "oper_status": "up",
        "in_errors": 42,
        "in_crc_errors": "17",
        "out_errors": " 9 "
    }"#;
    let record: InterfaceRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.in_errors, 42);
    assert_eq!(record.in_crc_errors, 17);
    assert_eq!(record.out_errors, 9);
}

#[test]
fn missing_counters_default_to_zero() {
    let record: InterfaceRecord = serde_json::from_str(r#"{"description": "x"}"#).unwrap();
    assert_eq!(record.in_errors, 0);
    assert_eq!(record.in_crc_errors, 0);
    assert_eq!(record.out_errors, 0);
    assert_eq!(record.in_pkts, 0);
}

#[test]
fn unparseable_counters_normalize_to_zero() {
    let json = r#"{
        "in_errors": "garbage",
        "in_crc_errors": null,
        "out_errors": -5,
        "in_pkts": 3.7
    }"#;
    let record: InterfaceRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.in_errors, 0);
    assert_eq!(record.in_crc_errors, 0);
    assert_eq!(record.out_errors, 0);
    assert_eq!(record.in_pkts, 0);
}

#[test]
fn absent_descriptive_attributes_are_none() {
    let record: InterfaceRecord = serde_json::from_str(r#"{"in_errors": 1}"#).unwrap();
    assert!(record.oper_status.is_none());
    assert!(record.description.is_none());
    assert!(record.mtu.is_none());
    assert!(record.ipv4.is_none());
    assert_eq!(record.description_or_empty(), "");
}

#[test]
fn serialization_skips_absent_attributes() {
    let record = InterfaceRecord {
        oper_status: Some("up".into()),
        in_errors: 5,
        ..Default::default()
    };
    let json = serde_json::to_string(&record).unwrap();
    assert!(json.contains("\"oper_status\":\"up\""));
    assert!(json.contains("\"in_errors\":5"));
    assert!(!json.contains("description"));
    assert!(!json.contains("mac_address"));
}

#[test]
fn counter_lookup_by_name() {
    let record = InterfaceRecord {
        in_errors: 1,
        in_crc_errors: 2,
        out_errors: 3,
        in_pkts: 4,
        ..Default::default()
    };
    assert_eq!(record.counter("in_errors"), 1);
    assert_eq!(record.counter("in_crc_errors"), 2);
    assert_eq!(record.counter("out_errors"), 3);
    assert_eq!(record.counter("in_pkts"), 4);
    assert_eq!(record.counter("no_such_counter"), 0);
}

#[test]
fn device_file_roundtrip() {
    let mut interfaces = DeviceInterfaces::new();
    interfaces.insert(
        "Ethernet1".into(),
        InterfaceRecord {
            oper_status: Some("up".into()),
            description: Some("R1<>R2 core".into()),
            mtu: Some(9214),
            in_errors: 600,
            ..Default::default()
        },
    );
    let json = serde_json::to_string_pretty(&interfaces).unwrap();
    let back: DeviceInterfaces = serde_json::from_str(&json).unwrap();
    assert_eq!(back, interfaces);
}
