pub mod file;
pub mod log;

pub use file::FileSink;
pub use log::LogSink;

use crate::error::SinkError;
use crate::models::AdRecord;
use async_trait::async_trait;

/// Delivery target for discovered ads.
///
/// Sinks fail independently: an error from one sink is logged by the engine
/// and never blocks other sinks or the poll cycle.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Stable name, used for registration dedup and log correlation.
    fn name(&self) -> &str;

    /// Disabled sinks are skipped by the engine entirely, so they incur no
    /// work and no failure surface.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Receives the full first-poll snapshot, exactly once, before any
    /// per-ad delivery.
    async fn handle_initial_batch(&self, records: &[AdRecord]) -> Result<(), SinkError>;

    /// Receives one newly discovered ad, at most once per process lifetime.
    async fn handle_new_record(&self, record: &AdRecord) -> Result<(), SinkError>;
}
