// Comparison pipeline: load both snapshots, detect degradations, correlate
// links, render and persist the report. Runs synchronously over in-memory
// snapshot data; never share one run's working set across runs.

use crate::detector::find_degraded_interfaces;
use crate::matcher::{PeerResolver, match_links};
use crate::models::Link;
use crate::report::render_report;
use crate::snapshot_repo::SnapshotRepo;
use anyhow::Context;
use std::path::PathBuf;

#[derive(Debug)]
pub struct CompareOutcome {
    pub links: Vec<Link>,
    pub report_path: PathBuf,
}

/// Compare the (site, old_date) and (site, new_date) snapshots and write
/// `Comparison_{old}_{new}.csv`. A missing snapshot aborts with an error;
/// devices or interfaces present on only one side are skipped silently.
pub fn run_compare(
    repo: &SnapshotRepo,
    site: &str,
    old_date: &str,
    new_date: &str,
    threshold: u64,
    resolver: &dyn PeerResolver,
) -> anyhow::Result<CompareOutcome> {
    let old = repo
        .load(site, old_date)
        .with_context(|| format!("loading old snapshot {site}/{old_date}"))?;
    let new = repo
        .load(site, new_date)
        .with_context(|| format!("loading new snapshot {site}/{new_date}"))?;

    let degraded = find_degraded_interfaces(&old, &new, threshold);
    let degraded_count: usize = degraded.values().map(|ifs| ifs.len()).sum();
    tracing::info!(
        devices = degraded.len(),
        interfaces = degraded_count,
        threshold,
        "degradation detection finished"
    );

    let links = match_links(&new, degraded, resolver);
    let csv = render_report(&links);
    let report_path = repo.save_report(site, old_date, new_date, &csv)?;
    tracing::info!(links = links.len(), path = %report_path.display(), "comparison report saved");

    Ok(CompareOutcome { links, report_path })
}
