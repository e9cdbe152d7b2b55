//! Tick Health
//!
//! Tracks consecutive tick failures so operators can tell a flaky upstream
//! from a dead one. The periodic cadence itself never changes.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Consecutive failures after which the collector reports itself as failing
pub const FAILING_AFTER: u32 = 10;

/// Health of the collection loop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthState {
    /// No tick has finished yet
    Starting,
    /// Last tick fetched and persisted
    Healthy,
    /// Last tick failed
    Degraded,
    /// At least [`FAILING_AFTER`] ticks in a row failed
    Failing,
}

/// Lock-free failure tracker shared by all callers of the collector
pub struct TickHealth {
    state: AtomicU8,
    consecutive_failures: AtomicU32,
}

impl TickHealth {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(HealthState::Starting as u8),
            consecutive_failures: AtomicU32::new(0),
        }
    }

    /// Get the current state
    pub fn state(&self) -> HealthState {
        match self.state.load(Ordering::SeqCst) {
            0 => HealthState::Starting,
            1 => HealthState::Healthy,
            2 => HealthState::Degraded,
            _ => HealthState::Failing,
        }
    }

    /// Record a fully successful tick
    pub fn on_success(&self) {
        let previous = self.consecutive_failures.swap(0, Ordering::SeqCst);
        if previous > 0 {
            tracing::info!("Collector recovered after {} failed ticks", previous);
        }
        self.state.store(HealthState::Healthy as u8, Ordering::SeqCst);
    }

    /// Record a failed tick
    pub fn on_failure(&self) {
        let failures = self.consecutive_failures.fetch_add(1, Ordering::SeqCst) + 1;
        let state = if failures >= FAILING_AFTER {
            HealthState::Failing
        } else {
            HealthState::Degraded
        };
        if failures == FAILING_AFTER {
            tracing::error!("Collector has failed {} ticks in a row", failures);
        }
        self.state.store(state as u8, Ordering::SeqCst);
    }

    /// Failures since the last successful tick
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures.load(Ordering::SeqCst)
    }
}

impl Default for TickHealth {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TickHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickHealth")
            .field("state", &self.state())
            .field("consecutive_failures", &self.consecutive_failures())
            .finish()
    }
}
