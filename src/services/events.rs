//! Collector Events
//!
//! Events emitted after each tick so that in-process consumers can follow the
//! history without polling the store file.

use crate::domain::sample::Sample;
use std::sync::Arc;

/// Events published by the collector
#[derive(Clone, Debug)]
pub enum CollectorEvent {
    /// A sample was assembled and merged into the history
    SampleCollected {
        sample: Sample,
        /// History length after compaction
        retained: usize,
    },
    /// The compacted history was written to the store
    HistorySaved { rows: usize },
    /// A tick was abandoned or could not be persisted
    TickFailed {
        /// Failure kind ("transport", "persistence", ...)
        stage: Arc<str>,
        detail: Arc<str>,
    },
}

impl CollectorEvent {
    /// Short event name for logging
    pub fn name(&self) -> &'static str {
        match self {
            CollectorEvent::SampleCollected { .. } => "sample_collected",
            CollectorEvent::HistorySaved { .. } => "history_saved",
            CollectorEvent::TickFailed { .. } => "tick_failed",
        }
    }
}
