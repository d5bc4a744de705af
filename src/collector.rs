// Capture side: inventory selection, per-device command output, and the
// reduction of platform-parser JSON into the canonical interface map.
//
// Session transport lives behind the CommandRunner trait; this crate ships a
// directory-backed runner that reads pre-collected parsed blobs. Inventory
// and credentials sit behind traits for the same reason.

use crate::config::CaptureConfig;
use crate::models::{DeviceInterfaces, InterfaceRecord, counter_from_value};
use crate::snapshot_repo::SnapshotRepo;
use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use serde::Deserialize;
use std::path::PathBuf;

pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub trait CredentialProvider {
    fn credentials(&self) -> anyhow::Result<Credentials>;
}

/// Credentials from the environment (the vault that feeds these variables is
/// outside this tool).
pub struct EnvCredentials;

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> anyhow::Result<Credentials> {
        let username = std::env::var("IFDRIFT_USERNAME")
            .map_err(|_| anyhow::anyhow!("IFDRIFT_USERNAME not set"))?;
        let password = std::env::var("IFDRIFT_PASSWORD")
            .map_err(|_| anyhow::anyhow!("IFDRIFT_PASSWORD not set"))?;
        Ok(Credentials { username, password })
    }
}

/// One fleet device as the inventory knows it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceEntry {
    pub name: String,
    pub site: String,
    pub role: String,
    #[serde(default)]
    pub platform: String,
}

/// Target selection: an explicit device list wins; otherwise site/role with
/// "all" as a wildcard on either axis, plus an optional platform filter.
#[derive(Debug, Clone, Default)]
pub struct TargetFilter {
    pub site: Option<String>,
    pub role: Option<String>,
    pub platform: Option<String>,
    pub devices: Option<Vec<String>>,
}

pub trait Inventory {
    fn targets(&self, filter: &TargetFilter) -> anyhow::Result<Vec<DeviceEntry>>;
}

/// Inventory backed by a JSON file holding an array of device entries.
pub struct FileInventory {
    devices: Vec<DeviceEntry>,
}

impl FileInventory {
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let raw = std::fs::read_to_string(&path)?;
        let devices: Vec<DeviceEntry> = serde_json::from_str(&raw)?;
        Ok(Self { devices })
    }

    pub fn from_devices(devices: Vec<DeviceEntry>) -> Self {
        Self { devices }
    }
}

impl Inventory for FileInventory {
    fn targets(&self, filter: &TargetFilter) -> anyhow::Result<Vec<DeviceEntry>> {
        if let Some(names) = &filter.devices {
            let wanted: Vec<String> = names.iter().map(|n| n.to_uppercase()).collect();
            return Ok(self
                .devices
                .iter()
                .filter(|d| wanted.contains(&d.name.to_uppercase()))
                .cloned()
                .collect());
        }

        let wildcard = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.eq_ignore_ascii_case("all"))
                .map(|v| v.to_uppercase())
        };
        let site = wildcard(&filter.site);
        let role = wildcard(&filter.role);
        let platform = filter.platform.as_deref().map(|p| p.to_lowercase());

        Ok(self
            .devices
            .iter()
            .filter(|d| site.as_deref().is_none_or(|s| d.site.to_uppercase() == s))
            .filter(|d| role.as_deref().is_none_or(|r| d.role.to_uppercase() == r))
            .filter(|d| {
                platform
                    .as_deref()
                    .is_none_or(|p| d.platform.to_lowercase() == p)
            })
            .cloned()
            .collect())
    }
}

/// Executes the interface command against one device and returns the
/// platform parser's JSON output.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn fetch_parsed(
        &self,
        device: &str,
        command: &str,
        credentials: &Credentials,
    ) -> anyhow::Result<serde_json::Value>;
}

/// Runner that reads pre-collected parsed blobs from {dir}/{device}.json,
/// for ingesting output gathered by an external session tool.
pub struct BlobDirRunner {
    dir: PathBuf,
}

impl BlobDirRunner {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl CommandRunner for BlobDirRunner {
    async fn fetch_parsed(
        &self,
        device: &str,
        _command: &str,
        _credentials: &Credentials,
    ) -> anyhow::Result<serde_json::Value> {
        let path = self.dir.join(format!("{device}.json"));
        let raw = tokio::fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Reduce a parsed "show interfaces" blob to the canonical interface map:
/// keep the descriptive attributes and counters the comparison cares about,
/// skip logical interfaces by name prefix.
pub fn parse_interfaces(raw: &serde_json::Value, ignore_prefixes: &[String]) -> DeviceInterfaces {
    let mut interfaces = DeviceInterfaces::new();
    let Some(entries) = raw.as_object() else {
        return interfaces;
    };

    for (name, body) in entries {
        if ignore_prefixes.iter().any(|p| name.starts_with(p.as_str())) {
            continue;
        }
        let text = |key: &str| body.get(key).and_then(|v| v.as_str()).map(str::to_string);
        let counters = body.get("counters");
        let counter = |key: &str| {
            counters
                .and_then(|c| c.get(key))
                .map(counter_from_value)
                .unwrap_or(0)
        };

        interfaces.insert(
            name.clone(),
            InterfaceRecord {
                enabled: body.get("enabled").and_then(|v| v.as_bool()),
                oper_status: text("oper_status"),
                line_protocol: text("line_protocol"),
                description: text("description"),
                mtu: body.get("mtu").map(counter_from_value).filter(|m| *m > 0),
                mac_address: text("mac_address"),
                // The parser nests the address under an object keyed by the
                // prefix itself; the first key is the address.
                ipv4: body
                    .get("ipv4")
                    .and_then(|v| v.as_object())
                    .and_then(|o| o.keys().next())
                    .cloned(),
                in_pkts: counter("in_pkts"),
                out_pkts: counter("out_pkts"),
                in_runts: counter("in_runts"),
                in_giants: counter("in_giants"),
                in_errors: counter("in_errors"),
                in_crc_errors: counter("in_crc_errors"),
                out_errors: counter("out_errors"),
            },
        );
    }

    interfaces
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub saved: usize,
    pub failed: usize,
}

/// Fetch every target with bounded concurrency and persist one snapshot file
/// per device. A device that fails to respond is logged and skipped; the
/// snapshot stays partial and later comparisons skip the gap.
pub async fn run_capture(
    targets: &[DeviceEntry],
    runner: &dyn CommandRunner,
    credentials: &Credentials,
    repo: &SnapshotRepo,
    site: &str,
    date: &str,
    config: &CaptureConfig,
) -> anyhow::Result<CaptureOutcome> {
    let fetches = stream::iter(targets.iter().map(|device| {
        let name = device.name.clone();
        async move {
            let parsed = runner
                .fetch_parsed(&name, &config.command, credentials)
                .await;
            (name, parsed)
        }
    }))
    .buffer_unordered(config.concurrency)
    .collect::<Vec<_>>()
    .await;

    let mut outcome = CaptureOutcome { saved: 0, failed: 0 };
    for (device, result) in fetches {
        match result {
            Ok(raw) => {
                let interfaces = parse_interfaces(&raw, &config.ignore_prefixes);
                repo.save_device(site, date, &device, &interfaces)?;
                outcome.saved += 1;
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    device = %device,
                    operation = "fetch_parsed",
                    "device capture failed, skipping"
                );
                outcome.failed += 1;
            }
        }
    }

    tracing::info!(
        saved = outcome.saved,
        failed = outcome.failed,
        site = %site,
        date = %date,
        "capture finished"
    );
    Ok(outcome)
}
