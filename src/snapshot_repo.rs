// Filesystem snapshot store.
// Layout: {root}/{site}/{date}/{device}.txt, one JSON object per device
// mapping interface name -> attributes/counters (flat schema). Snapshots are
// written once per capture run and never mutated afterwards; comparison runs
// only read them back.

use crate::models::{DeviceInterfaces, Snapshot};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("no snapshot stored for site {site} on {date}")]
    NotFound { site: String, date: String },
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct SnapshotRepo {
    root: PathBuf,
}

impl SnapshotRepo {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn snapshot_dir(&self, site: &str, date: &str) -> PathBuf {
        self.root.join(site).join(date)
    }

    /// Persist one device's interface map under (site, date), creating the
    /// directory on demand. Returns the written path.
    pub fn save_device(
        &self,
        site: &str,
        date: &str,
        device: &str,
        interfaces: &DeviceInterfaces,
    ) -> anyhow::Result<PathBuf> {
        let dir = self.snapshot_dir(site, date);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{device}.txt"));
        let json = serde_json::to_string_pretty(interfaces)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Load every device file under (site, date). A missing directory is
    /// `NotFound`; a directory with fewer devices than expected is fine
    /// (capture tolerates per-device failures, comparison skips the gaps).
    pub fn load(&self, site: &str, date: &str) -> Result<Snapshot, SnapshotError> {
        let dir = self.snapshot_dir(site, date);
        let entries = std::fs::read_dir(&dir).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SnapshotError::NotFound {
                    site: site.to_string(),
                    date: date.to_string(),
                }
            } else {
                SnapshotError::Io {
                    path: dir.clone(),
                    source: e,
                }
            }
        })?;

        let mut devices: BTreeMap<String, DeviceInterfaces> = BTreeMap::new();
        for entry in entries {
            let entry = entry.map_err(|e| SnapshotError::Io {
                path: dir.clone(),
                source: e,
            })?;
            let path = entry.path();
            let Some(device) = device_name(&path) else {
                continue;
            };
            let raw = std::fs::read_to_string(&path).map_err(|e| SnapshotError::Io {
                path: path.clone(),
                source: e,
            })?;
            let interfaces: DeviceInterfaces =
                serde_json::from_str(&raw).map_err(|e| SnapshotError::Malformed {
                    path: path.clone(),
                    source: e,
                })?;
            devices.insert(device, interfaces);
        }

        Ok(Snapshot {
            site: site.to_string(),
            date: date.to_string(),
            devices,
        })
    }

    /// Write the comparison report next to the date directories:
    /// {root}/{site}/Comparison_{old}_{new}.csv
    pub fn save_report(
        &self,
        site: &str,
        old_date: &str,
        new_date: &str,
        csv: &str,
    ) -> anyhow::Result<PathBuf> {
        let dir = self.root.join(site);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("Comparison_{old_date}_{new_date}.csv"));
        std::fs::write(&path, csv)?;
        Ok(path)
    }
}

/// Device name from a snapshot file path; only `.txt` files count.
fn device_name(path: &Path) -> Option<String> {
    if path.extension().and_then(|e| e.to_str()) != Some("txt") {
        return None;
    }
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
