use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Tunables for one health-check pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatcherConfig {
    /// Per-node TCP probe deadline, in seconds.
    pub probe_timeout_secs: u64,
    /// Upper bound on node probes in flight at once.
    pub probe_concurrency: usize,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: 5,
            probe_concurrency: 16,
        }
    }
}

impl WatcherConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Load from a YAML file; unset fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read watcher config from {}", path.display()))?;
        let cfg: WatcherConfig =
            serde_yaml::from_str(&content).context("failed to parse watcher config YAML")?;
        Ok(cfg)
    }
}
