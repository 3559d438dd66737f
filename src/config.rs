//! Runtime configuration, loaded from an optional JSON file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Top-level configuration for the binary.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WatchConfig {
    pub engine: EngineConfig,
    pub sinks: SinkSettings,
}

/// Configuration consumed by the watch engine itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Shared poll interval for all sources, in whole minutes. Must be >= 1.
    pub poll_interval_minutes: u64,
    /// Allow registering more than one source instance under the same name.
    pub allow_duplicate_sources: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_minutes: 5,
            allow_duplicate_sources: false,
        }
    }
}

impl EngineConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_minutes * 60)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkSettings {
    pub log_enabled: bool,
    pub file: FileSinkSettings,
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            log_enabled: true,
            file: FileSinkSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSinkSettings {
    pub enabled: bool,
    pub output_dir: String,
}

impl Default for FileSinkSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            output_dir: "discovered_ads".to_string(),
        }
    }
}

impl WatchConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => {
                let config: WatchConfig = serde_json::from_str(&contents)
                    .with_context(|| format!("invalid config file {}", path.display()))?;
                info!("Loaded configuration from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No config file at {}, using defaults", path.display());
                Ok(WatchConfig::default())
            }
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = WatchConfig::default();
        assert_eq!(config.engine.poll_interval_minutes, 5);
        assert!(!config.engine.allow_duplicate_sources);
        assert!(config.sinks.log_enabled);
        assert!(config.sinks.file.enabled);
        assert_eq!(config.sinks.file.output_dir, "discovered_ads");
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config: WatchConfig =
            serde_json::from_str(r#"{"engine": {"poll_interval_minutes": 10}}"#).unwrap();
        assert_eq!(config.engine.poll_interval_minutes, 10);
        assert!(!config.engine.allow_duplicate_sources);
        assert!(config.sinks.log_enabled);
    }

    #[test]
    fn poll_interval_converts_minutes() {
        let config = EngineConfig {
            poll_interval_minutes: 2,
            ..Default::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(120));
    }
}
