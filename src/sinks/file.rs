//! Sink that writes every discovered ad to a JSON file.

use crate::config::FileSinkSettings;
use crate::error::SinkError;
use crate::models::AdRecord;
use crate::sinks::Sink;
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;
use tracing::info;

pub struct FileSink {
    enabled: bool,
    output_dir: PathBuf,
}

impl FileSink {
    pub fn new(settings: &FileSinkSettings) -> Self {
        Self {
            enabled: settings.enabled,
            output_dir: PathBuf::from(&settings.output_dir),
        }
    }

    async fn write_json(&self, filename: &str, json: String) -> Result<(), SinkError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| SinkError::new("file", e))?;
        let path = self.output_dir.join(filename);
        tokio::fs::write(&path, json)
            .await
            .map_err(|e| SinkError::new("file", e))?;
        Ok(())
    }
}

/// Stable filename stem derived from the record's identity key.
fn file_stem(record: &AdRecord) -> String {
    let mut hasher = DefaultHasher::new();
    record.identity().hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

#[async_trait]
impl Sink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn handle_initial_batch(&self, records: &[AdRecord]) -> Result<(), SinkError> {
        let json = serde_json::to_string_pretty(records).map_err(|e| SinkError::new("file", e))?;
        self.write_json("initial_snapshot.json", json).await?;
        info!(
            "💾 Saved initial snapshot of {} ads to {}",
            records.len(),
            self.output_dir.display()
        );
        Ok(())
    }

    async fn handle_new_record(&self, record: &AdRecord) -> Result<(), SinkError> {
        let json = serde_json::to_string_pretty(record).map_err(|e| SinkError::new("file", e))?;
        let filename = format!("ad_{}.json", file_stem(record));
        self.write_json(&filename, json).await?;
        info!("💾 Saved new ad to {}", self.output_dir.join(filename).display());
        Ok(())
    }
}
