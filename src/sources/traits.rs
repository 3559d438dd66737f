use crate::error::SourceError;
use crate::models::AdRecord;
use async_trait::async_trait;

/// Common trait for all listing sources.
/// This allows easy addition of new portals without touching the engine.
#[async_trait]
pub trait AdSource: Send + Sync {
    /// Stable source name, used as the registration key and for log
    /// correlation.
    fn name(&self) -> &str;

    /// Run one fetch-and-parse cycle and return the full current snapshot,
    /// not a diff.
    ///
    /// A page with zero ads is an empty list, never an error. Transport and
    /// parse failures map to a single [`SourceError`] carrying the source
    /// name. Implementations must not retry internally; the next scheduled
    /// poll is the retry.
    async fn fetch_latest(&self) -> Result<Vec<AdRecord>, SourceError>;
}
