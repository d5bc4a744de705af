use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub storage: StorageConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub output_root: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Interface name prefixes excluded from snapshots (logical interfaces
    /// carry no physical-link counters worth comparing).
    #[serde(default = "default_ignore_prefixes")]
    pub ignore_prefixes: Vec<String>,
}

fn default_command() -> String {
    "show interfaces".into()
}

fn default_concurrency() -> usize {
    10
}

fn default_ignore_prefixes() -> Vec<String> {
    vec!["Loop".into(), "Vlan".into(), "Port".into()]
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            concurrency: default_concurrency(),
            ignore_prefixes: default_ignore_prefixes(),
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.storage.output_root.is_empty(),
            "storage.output_root must be non-empty"
        );
        anyhow::ensure!(
            !self.capture.command.is_empty(),
            "capture.command must be non-empty"
        );
        anyhow::ensure!(
            self.capture.concurrency > 0,
            "capture.concurrency must be > 0, got {}",
            self.capture.concurrency
        );
        Ok(())
    }
}
