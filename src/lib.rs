//! Listing Scout: polls real-estate listing portals and reports newly
//! discovered ads to a set of notification sinks.

pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod sinks;
pub mod sources;

pub use config::{EngineConfig, WatchConfig};
pub use engine::{EngineState, SeenSet, WatchEngine};
pub use error::{EngineError, FetchError, SinkError, SourceError};
pub use models::{AdRecord, Currency, Layout};
