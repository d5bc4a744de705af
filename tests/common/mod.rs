// Shared test helpers
#![allow(dead_code)]

use ifdrift::models::{DeviceInterfaces, InterfaceRecord, Snapshot};
use std::collections::BTreeMap;

/// An up/up interface with the given description and tracked counters.
pub fn record(description: &str, in_errors: u64, in_crc_errors: u64, out_errors: u64) -> InterfaceRecord {
    InterfaceRecord {
        enabled: Some(true),
        oper_status: Some("up".into()),
        line_protocol: Some("up".into()),
        description: (!description.is_empty()).then(|| description.to_string()),
        mtu: Some(1500),
        mac_address: Some("aa:bb:cc:dd:ee:ff".into()),
        ipv4: Some("10.0.0.1/31".into()),
        in_pkts: 1000,
        out_pkts: 2000,
        in_runts: 0,
        in_giants: 0,
        in_errors,
        in_crc_errors,
        out_errors,
    }
}

pub fn snapshot(
    site: &str,
    date: &str,
    devices: Vec<(&str, Vec<(&str, InterfaceRecord)>)>,
) -> Snapshot {
    let devices: BTreeMap<String, DeviceInterfaces> = devices
        .into_iter()
        .map(|(device, interfaces)| {
            (
                device.to_string(),
                interfaces
                    .into_iter()
                    .map(|(name, record)| (name.to_string(), record))
                    .collect(),
            )
        })
        .collect();
    Snapshot {
        site: site.to_string(),
        date: date.to_string(),
        devices,
    }
}
