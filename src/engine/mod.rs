//! The watch engine: lifecycle state machine, poll scheduling and fan-out.
//!
//! ```text
//! WatchEngine::start()
//!     │
//!     ├─► poll all sources concurrently, union into the SeenSet
//!     ├─► deliver the initial batch to every enabled sink
//!     └─► spawn the periodic poll loop
//!
//! every tick:
//!     poll all sources ─► unseen records ─► SeenSet insert ─► sinks, in order
//! ```
//!
//! Source and sink failures during a tick are logged and isolated; failures
//! during the initial phase abort `start()` and roll the engine back to
//! stopped.

mod seen;

pub use seen::SeenSet;

use crate::config::EngineConfig;
use crate::error::{EngineError, SourceError, StartCause};
use crate::models::AdRecord;
use crate::sinks::Sink;
use crate::sources::AdSource;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Lifecycle states of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl EngineState {
    fn as_str(self) -> &'static str {
        match self {
            EngineState::Stopped => "stopped",
            EngineState::Starting => "starting",
            EngineState::Running => "running",
            EngineState::Stopping => "stopping",
        }
    }
}

/// Handle to the spawned poll loop.
struct Runner {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Orchestrates sources, the seen-set and sinks.
///
/// Owns all of its state; there are no process-wide registries. Registration
/// is only accepted while stopped, which keeps the registries free of races
/// with the poll loop.
pub struct WatchEngine {
    config: EngineConfig,
    sources: Vec<Arc<dyn AdSource>>,
    sinks: Vec<Arc<dyn Sink>>,
    seen: Arc<Mutex<SeenSet>>,
    state: EngineState,
    runner: Option<Runner>,
}

impl WatchEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            sources: Vec::new(),
            sinks: Vec::new(),
            seen: Arc::new(Mutex::new(SeenSet::new())),
            state: EngineState::Stopped,
            runner: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Register a listing source. Only accepted while stopped; a duplicate
    /// name is a no-op unless `allow_duplicate_sources` is set.
    pub fn register_source(&mut self, source: Arc<dyn AdSource>) {
        if self.state != EngineState::Stopped {
            warn!(
                source = source.name(),
                "Ignoring source registration while engine is {}",
                self.state.as_str()
            );
            return;
        }
        let duplicate = self.sources.iter().any(|s| s.name() == source.name());
        if duplicate && !self.config.allow_duplicate_sources {
            warn!(
                source = source.name(),
                "Ignoring duplicate source registration"
            );
            return;
        }
        info!(source = source.name(), "Registered source");
        self.sources.push(source);
    }

    /// Register a sink. Only accepted while stopped; duplicates (by name)
    /// are a no-op.
    pub fn register_sink(&mut self, sink: Arc<dyn Sink>) {
        if self.state != EngineState::Stopped {
            warn!(
                sink = sink.name(),
                "Ignoring sink registration while engine is {}",
                self.state.as_str()
            );
            return;
        }
        if self.sinks.iter().any(|s| s.name() == sink.name()) {
            warn!(sink = sink.name(), "Ignoring duplicate sink registration");
            return;
        }
        info!(sink = sink.name(), "Registered sink");
        self.sinks.push(sink);
    }

    /// Run the initial snapshot and arm the periodic poll loop.
    ///
    /// Any source or sink failure during the initial phase is fatal to this
    /// call: the seen-set is rolled back and the engine stays stopped, so a
    /// retried `start` behaves like the first one.
    pub async fn start(&mut self) -> Result<(), EngineError> {
        if self.state != EngineState::Stopped {
            return Err(EngineError::InvalidState {
                operation: "start",
                expected: "stopped",
                actual: self.state.as_str(),
            });
        }
        if self.sources.is_empty() {
            return Err(EngineError::InvalidConfig("no sources registered".into()));
        }
        if self.sinks.is_empty() {
            return Err(EngineError::InvalidConfig("no sinks registered".into()));
        }
        if self.config.poll_interval_minutes < 1 {
            return Err(EngineError::InvalidConfig(format!(
                "poll interval must be at least 1 minute, got {}",
                self.config.poll_interval_minutes
            )));
        }

        self.state = EngineState::Starting;
        info!(
            sources = self.sources.len(),
            sinks = self.sinks.len(),
            interval_minutes = self.config.poll_interval_minutes,
            "Starting watch engine"
        );

        let core = Arc::new(EngineCore {
            sources: self.sources.clone(),
            sinks: self.sinks.clone(),
            seen: self.seen.clone(),
        });

        if let Err(cause) = core.run_initial().await {
            self.seen.lock().await.clear();
            self.state = EngineState::Stopped;
            return Err(EngineError::StartFailed(cause));
        }

        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_loop(core, self.config.poll_interval(), shutdown_rx));
        self.runner = Some(Runner { shutdown, task });
        self.state = EngineState::Running;
        info!("Watch engine running");
        Ok(())
    }

    /// Disarm the poll loop and wait for an in-flight tick to finish.
    ///
    /// No new tick can start once this returns.
    pub async fn stop(&mut self) -> Result<(), EngineError> {
        if self.state != EngineState::Running {
            return Err(EngineError::InvalidState {
                operation: "stop",
                expected: "running",
                actual: self.state.as_str(),
            });
        }
        self.state = EngineState::Stopping;
        if let Some(runner) = self.runner.take() {
            // An in-flight tick is allowed to complete; awaiting the task
            // guarantees nothing runs after stop() returns.
            let _ = runner.shutdown.send(true);
            if let Err(e) = runner.task.await {
                warn!(error = %e, "Poll loop task ended abnormally");
            }
        }
        self.state = EngineState::Stopped;
        info!("Watch engine stopped");
        Ok(())
    }
}

/// The state shared with the poll loop task: registries frozen at start
/// plus the seen-set.
struct EngineCore {
    sources: Vec<Arc<dyn AdSource>>,
    sinks: Vec<Arc<dyn Sink>>,
    seen: Arc<Mutex<SeenSet>>,
}

impl EngineCore {
    /// Fan one fetch out across every source and wait for all of them.
    async fn poll_sources(&self) -> Vec<Result<Vec<AdRecord>, SourceError>> {
        join_all(self.sources.iter().map(|s| s.fetch_latest())).await
    }

    fn enabled_sinks(&self) -> impl Iterator<Item = &Arc<dyn Sink>> {
        self.sinks.iter().filter(|s| s.is_enabled())
    }

    /// The synchronous first poll: every source and every enabled sink must
    /// succeed, otherwise the whole start is abandoned.
    async fn run_initial(&self) -> Result<(), StartCause> {
        let results = self.poll_sources().await;
        let mut batch = Vec::new();
        {
            let mut seen = self.seen.lock().await;
            for result in results {
                for record in result? {
                    if seen.add(&record) {
                        batch.push(record);
                    }
                }
            }
        }
        info!(count = batch.len(), "Initial snapshot assembled");
        for sink in self.enabled_sinks() {
            sink.handle_initial_batch(&batch).await?;
        }
        Ok(())
    }

    /// One poll-diff-notify cycle. Source and sink failures are logged and
    /// never abort the remaining work of the tick.
    async fn run_tick(&self) {
        let results = self.poll_sources().await;
        let mut fresh = Vec::new();
        {
            // Seen-set insertion happens before any sink call, so a failure
            // mid-notification cannot re-report the record on the next tick.
            let mut seen = self.seen.lock().await;
            for result in results {
                match result {
                    Ok(records) => {
                        for record in records {
                            if seen.add(&record) {
                                fresh.push(record);
                            }
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Source poll failed, retrying on next tick");
                    }
                }
            }
        }
        if fresh.is_empty() {
            debug!("Tick complete, no new ads");
            return;
        }
        info!(count = fresh.len(), "Discovered new ads");
        for record in &fresh {
            // Sequential across sinks: per-record sink ordering stays
            // deterministic.
            for sink in self.enabled_sinks() {
                if let Err(e) = sink.handle_new_record(record).await {
                    warn!(error = %e, url = %record.url, "Sink delivery failed");
                }
            }
        }
    }
}

/// The periodic poll loop. Lives in its own task until the shutdown signal.
async fn run_loop(core: Arc<EngineCore>, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // An interval fires immediately; the initial snapshot already covered
    // that slot.
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {
                debug!("Poll tick");
                core.run_tick().await;
            }
        }
    }
    debug!("Poll loop stopped");
}
