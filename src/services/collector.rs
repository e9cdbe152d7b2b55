//! Collector Loop
//!
//! Orchestrates fetch → assemble → compact → persist, either on a fixed
//! cadence or on demand.
//!
//! ## Locking
//!
//! ```text
//! caller A ──fetch──┐                 caller B ──fetch──┐
//!                   ▼                                   ▼
//!            ┌─────────────── history lock ───────────────┐
//!            │ stamp → append → compact → save → publish  │  (one tick at a time)
//!            └────────────────────────────────────────────┘
//! ```
//!
//! The network fetch runs outside the lock so slow upstream responses never
//! queue other callers. A failed fetch never touches the history. The store
//! write is awaited under the lock so files land in tick order, but it runs on
//! the blocking pool with a timeout and never stalls a runtime worker.

use crate::constants::MS_PER_HOUR;
use crate::domain::history::{compact, recent};
use crate::domain::sample::Sample;
use crate::error::{Error, Result};
use crate::parsing::assemble;
use crate::services::events::CollectorEvent;
use crate::services::health::{HealthState, TickHealth};
use crate::services::store::CsvStore;
use crate::services::upstream::Source;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;

/// Capacity of the event channel; events are dropped when nobody drains it
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

type Clock = Box<dyn Fn() -> i64 + Send + Sync>;

/// Wall-clock time in milliseconds since the epoch
pub fn system_now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Owner of the in-memory history
pub struct Collector<S: Source> {
    source: S,
    store: CsvStore,
    retention_ms: i64,
    /// Compacted history, ordered by timestamp
    history: Mutex<Vec<Sample>>,
    health: TickHealth,
    clock: Clock,
    tx: Sender<CollectorEvent>,
    rx: Receiver<CollectorEvent>,
}

impl<S: Source> Collector<S> {
    /// Create a collector with an empty history
    pub fn new(source: S, store: CsvStore, retention_ms: i64) -> Self {
        let (tx, rx) = crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY);
        Self {
            source,
            store,
            retention_ms,
            history: Mutex::new(Vec::new()),
            health: TickHealth::new(),
            clock: Box::new(system_now_ms),
            tx,
            rx,
        }
    }

    /// Replace the wall clock (tests drive time explicitly)
    pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Create a collector seeded from the store
    pub fn open(source: S, store: CsvStore, retention_ms: i64) -> Result<Self> {
        Self::new(source, store, retention_ms).seed_from_store()
    }

    /// Load the store and compact it into the in-memory history
    ///
    /// A store that exists but cannot be read is an error; starting empty
    /// would overwrite it on the first tick.
    pub fn seed_from_store(mut self) -> Result<Self> {
        let loaded = self.store.load()?;
        let compacted = compact(&loaded, (self.clock)(), self.retention_ms);
        tracing::info!(
            "Seeded history with {} of {} stored samples",
            compacted.len(),
            loaded.len()
        );
        *self.history.get_mut() = compacted;
        Ok(self)
    }

    // ==================== Collection ====================

    /// Run one tick and return the compacted history
    ///
    /// A transport error leaves history and store untouched. A persistence
    /// error is returned after the in-memory history has been updated; the
    /// next tick rewrites the store in full.
    pub async fn collect_once(&self) -> Result<Vec<Sample>> {
        let tick = self.tick().await?;
        tick.saved.map(|()| tick.history)
    }

    /// On-demand trigger: run one tick and return the fresh sample
    ///
    /// The sample is returned even when the store write failed; that failure
    /// is logged and reported through events and health.
    pub async fn collect_now(&self) -> Result<Sample> {
        let tick = self.tick().await?;
        Ok(tick.sample)
    }

    async fn tick(&self) -> Result<Tick> {
        let fetched_at = (self.clock)();
        let raw = match self.source.fetch(fetched_at).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Fetch failed, tick abandoned: {}", e);
                self.report_failure("transport", &e);
                return Err(e);
            }
        };

        let mut history = self.history.lock().await;

        // Stamped under the lock so concurrent ticks append in time order
        let now_ms = (self.clock)();
        let sample = assemble(&raw, now_ms);

        let mut next = history.clone();
        let at = next.partition_point(|kept| kept.timestamp <= sample.timestamp);
        next.insert(at, sample);
        let compacted = compact(&next, now_ms, self.retention_ms);

        let saved = self.store.save(&compacted).await;
        *history = compacted.clone();

        self.publish(CollectorEvent::SampleCollected {
            sample,
            retained: compacted.len(),
        });
        match &saved {
            Ok(()) => {
                tracing::info!(
                    wind_avg = sample.wind_avg,
                    wind_max = sample.wind_max,
                    temperature = sample.temperature,
                    "Collected sample, {} retained",
                    compacted.len()
                );
                self.publish(CollectorEvent::HistorySaved {
                    rows: compacted.len(),
                });
                self.health.on_success();
            }
            Err(e) => {
                tracing::warn!("Collected sample but could not persist: {}", e);
                self.report_failure("persistence", e);
            }
        }
        drop(history);

        Ok(Tick {
            sample,
            history: compacted,
            saved,
        })
    }

    /// Tick every `interval` until `stop` flips to true or its sender drops
    ///
    /// Per-tick errors are logged and never end the loop.
    pub async fn run_periodic(&self, interval: Duration, mut stop: watch::Receiver<bool>) {
        if *stop.borrow() {
            return;
        }

        tracing::info!("Collecting every {}s", interval.as_secs_f64());
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // Errors are already logged and counted by the tick
                    let _ = self.collect_once().await;
                }
                changed = stop.changed() => {
                    if changed.is_err() || *stop.borrow() {
                        tracing::info!("Collector stopping");
                        break;
                    }
                }
            }
        }
    }

    // ==================== Queries ====================

    /// Snapshot of the compacted history
    pub async fn history(&self) -> Vec<Sample> {
        self.history.lock().await.clone()
    }

    /// Most recent sample, if any
    pub async fn latest(&self) -> Option<Sample> {
        self.history.lock().await.last().copied()
    }

    /// Samples from the last `hours` hours
    ///
    /// `hours` must be finite, positive and within the retention horizon.
    pub async fn recent_hours(&self, hours: f64) -> Result<Vec<Sample>> {
        let retention_hours = self.retention_ms as f64 / MS_PER_HOUR as f64;
        if !hours.is_finite() || hours <= 0.0 || hours > retention_hours {
            return Err(Error::Invalid {
                message: format!(
                    "hours must be in (0, {retention_hours}], got {hours}"
                ),
            });
        }

        let window_ms = (hours * MS_PER_HOUR as f64) as i64;
        let history = self.history.lock().await;
        Ok(recent(&history, (self.clock)(), window_ms).to_vec())
    }

    // ==================== Observability ====================

    /// Receiver for collector events
    ///
    /// Receivers share one queue: each event goes to exactly one receiver.
    pub fn events(&self) -> Receiver<CollectorEvent> {
        self.rx.clone()
    }

    pub fn health(&self) -> HealthState {
        self.health.state()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.health.consecutive_failures()
    }

    pub fn store(&self) -> &CsvStore {
        &self.store
    }

    fn report_failure(&self, stage: &str, error: &Error) {
        self.health.on_failure();
        self.publish(CollectorEvent::TickFailed {
            stage: stage.into(),
            detail: error.to_string().into(),
        });
    }

    fn publish(&self, event: CollectorEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                tracing::trace!("Event queue full, dropping {}", event.name());
            }
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

/// Result of one tick that reached the merge step
struct Tick {
    sample: Sample,
    history: Vec<Sample>,
    saved: Result<()>,
}

impl<S: Source> std::fmt::Debug for Collector<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collector")
            .field("store", &self.store)
            .field("retention_ms", &self.retention_ms)
            .field("health", &self.health)
            .finish()
    }
}
