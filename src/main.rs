use anyhow::Result;
use clap::{Parser, Subcommand};
use ifdrift::collector::{CredentialProvider, Inventory};
use ifdrift::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[derive(Parser)]
#[command(name = "ifdrift", version, about = "Interface error-counter drift detection")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Ingest parsed per-device output into a dated snapshot
    Capture {
        /// Site the snapshot is stored under
        #[arg(short, long)]
        site: String,
        /// Device role filter (SPINE/LEAF/...); "all" matches everything
        #[arg(short, long, default_value = "all")]
        role: String,
        /// Explicit device list; overrides the site/role filter
        #[arg(short, long, num_args = 1..)]
        devices: Option<Vec<String>>,
        /// Platform filter (eos/iosxe/iosxr/nxos)
        #[arg(short, long)]
        platform: Option<String>,
        /// Inventory file (JSON array of devices)
        #[arg(long)]
        inventory: PathBuf,
        /// Directory of pre-collected parsed blobs, one {device}.json each
        #[arg(long)]
        from_dir: PathBuf,
        /// Date tag for the snapshot (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Compare two snapshots of a site and write the CSV report
    Compare {
        #[arg(short, long)]
        site: String,
        /// Date tag of the older snapshot (yyyy-mm-dd)
        #[arg(long)]
        old_date: String,
        /// Date tag of the newer snapshot (yyyy-mm-dd)
        #[arg(long)]
        new_date: String,
        /// Absolute floor a counter must exceed (as well as having increased)
        #[arg(short, long)]
        threshold: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    let app_config = config::AppConfig::load()?;
    let repo = snapshot_repo::SnapshotRepo::new(&app_config.storage.output_root);

    match cli.command {
        Command::Capture {
            site,
            role,
            devices,
            platform,
            inventory,
            from_dir,
            date,
        } => {
            let inventory = collector::FileInventory::load(&inventory)?;
            let filter = collector::TargetFilter {
                site: Some(site.clone()),
                role: Some(role),
                platform,
                devices,
            };
            let targets = inventory.targets(&filter)?;
            tracing::info!(hosts = targets.len(), site = %site, "targets selected");

            // The blob runner needs no session credentials; a transport
            // runner would, so missing env vars only log here.
            let credentials = match collector::EnvCredentials.credentials() {
                Ok(c) => c,
                Err(e) => {
                    tracing::debug!(error = %e, "no session credentials in environment");
                    collector::Credentials {
                        username: String::new(),
                        password: String::new(),
                    }
                }
            };

            let runner = collector::BlobDirRunner::new(&from_dir);
            let date =
                date.unwrap_or_else(|| chrono::Local::now().date_naive().to_string());
            let outcome = collector::run_capture(
                &targets,
                &runner,
                &credentials,
                &repo,
                &site,
                &date,
                &app_config.capture,
            )
            .await?;
            tracing::info!(
                saved = outcome.saved,
                failed = outcome.failed,
                "snapshot written to {}",
                repo.snapshot_dir(&site, &date).display()
            );
        }
        Command::Compare {
            site,
            old_date,
            new_date,
            threshold,
        } => {
            let outcome = compare::run_compare(
                &repo,
                &site,
                &old_date,
                &new_date,
                threshold,
                &matcher::DescriptionConvention,
            )?;
            tracing::info!(
                links = outcome.links.len(),
                "comparison saved to {}",
                outcome.report_path.display()
            );
        }
    }

    Ok(())
}
