//! Typed errors for the watch engine and its collaborators.
//!
//! Library-level failures use `thiserror` so callers can match on them;
//! the binary wraps everything in `anyhow` at the top.

use thiserror::Error;

/// Cause carried by [`EngineError::StartFailed`].
pub type StartCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors surfaced by the engine's control surface (`start` / `stop`).
#[derive(Debug, Error)]
pub enum EngineError {
    /// An operation was attempted in the wrong lifecycle state.
    #[error("cannot {operation}: engine is {actual}, expected {expected}")]
    InvalidState {
        operation: &'static str,
        expected: &'static str,
        actual: &'static str,
    },

    /// Missing sources/sinks or an invalid poll interval.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// A source or sink failed during the initial snapshot phase.
    /// The engine rolls back to stopped; the caller may retry `start`.
    #[error("engine start failed: {0}")]
    StartFailed(#[source] StartCause),
}

/// Failure of a single page fetch, before any parsing happens.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected http status {0}")]
    Status(reqwest::StatusCode),

    #[error("browser fetch failed: {0}")]
    Browser(String),
}

/// Failure of one source's fetch-and-parse cycle.
///
/// Always carries the source name so tick logs can be correlated without
/// extra context from the caller.
#[derive(Debug, Error)]
#[error("source '{source}' failed: {kind}")]
pub struct SourceError {
    pub source: String,
    #[source]
    pub kind: SourceErrorKind,
}

#[derive(Debug, Error)]
pub enum SourceErrorKind {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("parse failed: {0}")]
    Parse(String),
}

impl SourceError {
    pub fn fetch(source: impl Into<String>, err: FetchError) -> Self {
        Self {
            source: source.into(),
            kind: SourceErrorKind::Fetch(err),
        }
    }

    pub fn parse(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind: SourceErrorKind::Parse(reason.into()),
        }
    }
}

/// Failure of a sink delivery. Carries the sink name; never fatal to a tick.
#[derive(Debug, Error)]
#[error("sink '{sink}' failed: {cause}")]
pub struct SinkError {
    pub sink: String,
    #[source]
    pub cause: Box<dyn std::error::Error + Send + Sync>,
}

impl SinkError {
    pub fn new(
        sink: impl Into<String>,
        cause: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            sink: sink.into(),
            cause: cause.into(),
        }
    }
}
