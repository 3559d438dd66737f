//! Sink that reports discovered ads through the tracing output.

use crate::error::SinkError;
use crate::models::AdRecord;
use crate::sinks::Sink;
use async_trait::async_trait;
use tracing::info;

pub struct LogSink {
    enabled: bool,
}

impl LogSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

#[async_trait]
impl Sink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn handle_initial_batch(&self, records: &[AdRecord]) -> Result<(), SinkError> {
        info!("📋 Initial snapshot: {} ads currently listed", records.len());
        for record in records {
            info!(
                source = %record.source,
                layout = %record.layout,
                "  {} | {} {:?} | {}",
                record.title, record.price, record.currency, record.url
            );
        }
        Ok(())
    }

    async fn handle_new_record(&self, record: &AdRecord) -> Result<(), SinkError> {
        info!(
            source = %record.source,
            layout = %record.layout,
            address = %record.address,
            "🆕 New ad: {} | {} {:?} | {}",
            record.title, record.price, record.currency, record.url
        );
        Ok(())
    }
}
