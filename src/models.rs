// Domain models for snapshots, degradations, and links.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Error counters compared between snapshots. Order matters: report columns
/// and degradation records follow this order.
pub const TRACKED_COUNTERS: [&str; 3] = ["in_errors", "in_crc_errors", "out_errors"];

/// One monitored interface: descriptive attributes are optional, counters
/// always carry a value (absent or unparseable counters normalize to 0 so
/// comparisons stay well-defined).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oper_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4: Option<String>,
    #[serde(default, deserialize_with = "lenient_counter")]
    pub in_pkts: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    pub out_pkts: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    pub in_runts: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    pub in_giants: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    pub in_errors: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    pub in_crc_errors: u64,
    #[serde(default, deserialize_with = "lenient_counter")]
    pub out_errors: u64,
}

impl InterfaceRecord {
    /// Look up a counter by its snapshot field name. Unknown names read as 0.
    pub fn counter(&self, name: &str) -> u64 {
        match name {
            "in_pkts" => self.in_pkts,
            "out_pkts" => self.out_pkts,
            "in_runts" => self.in_runts,
            "in_giants" => self.in_giants,
            "in_errors" => self.in_errors,
            "in_crc_errors" => self.in_crc_errors,
            "out_errors" => self.out_errors,
            _ => 0,
        }
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Accept a counter as a JSON integer or a numeric string. Anything else
/// (null, garbage text, negative) reads as 0, which can never satisfy the
/// strict degradation predicate.
fn lenient_counter<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(counter_from_value(&value))
}

/// Shared lenient numeric parse, also used when reducing raw parser output.
pub fn counter_from_value(value: &serde_json::Value) -> u64 {
    match value {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Interface name -> record, for one device.
pub type DeviceInterfaces = BTreeMap<String, InterfaceRecord>;

/// Point-in-time capture of every monitored interface for a site.
/// Immutable once loaded; identified by (site, date tag).
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub site: String,
    pub date: String,
    pub devices: BTreeMap<String, DeviceInterfaces>,
}

impl Snapshot {
    pub fn device(&self, name: &str) -> Option<&DeviceInterfaces> {
        self.devices.get(name)
    }
}

/// Old/new values of one counter across two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CounterPair {
    pub old: u64,
    pub new: u64,
}

impl CounterPair {
    pub fn delta(&self) -> i64 {
        self.new as i64 - self.old as i64
    }
}

/// Tracked counter name -> old/new pair for one degraded interface.
pub type DegradedStats = BTreeMap<String, CounterPair>;

/// Device -> interface -> degraded statistics. Produced by the detector,
/// consumed (entries removed as they pair up) by the link matcher.
pub type DegradedInterfaces = BTreeMap<String, BTreeMap<String, DegradedStats>>;

/// One end of a link: the interface's full record plus the old/new values
/// of its tracked counters.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkEnd {
    pub device: String,
    pub interface: String,
    pub record: InterfaceRecord,
    pub stats: DegradedStats,
}

impl LinkEnd {
    /// "DEVICE (Interface)" label used in reports.
    pub fn label(&self) -> String {
        format!("{} ({})", self.device, self.interface)
    }
}

/// A correlated physical connection: both ends degraded (Network), or a
/// degraded interface whose peer could not be identified (Host).
#[derive(Debug, Clone, PartialEq)]
pub enum Link {
    Network { key: String, ends: Box<[LinkEnd; 2]> },
    Host { key: String, end: LinkEnd },
}

impl Link {
    pub fn key(&self) -> &str {
        match self {
            Link::Network { key, .. } => key,
            Link::Host { key, .. } => key,
        }
    }
}
