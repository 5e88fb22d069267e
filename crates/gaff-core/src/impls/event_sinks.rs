//! EventSink implementations.
//!
//! - **TracingEventSink**: `tracing` に流す（CLI 用）
//! - **RecordingEventSink**: メモリに溜める（テスト・レポート用）

use std::sync::Mutex;

use crate::domain::SearchEvent;
use crate::ports::EventSink;

/// Forwards search milestones at `info` and per-cycle noise at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: SearchEvent) {
        match &event {
            SearchEvent::SearchStarted { .. } | SearchEvent::SearchFinished { .. } => {
                tracing::info!(event = event.name(), "{:?}", event);
            }
            SearchEvent::ResultEvaluated { .. } | SearchEvent::DecisionForced { .. } => {
                tracing::trace!(event = event.name(), "{:?}", event);
            }
            _ => {
                tracing::debug!(event = event.name(), "{:?}", event);
            }
        }
    }
}

/// Keeps every event in emission order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<SearchEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SearchEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(SearchEvent::name).collect()
    }
}

impl EventSink for RecordingEventSink {
    fn emit(&self, event: SearchEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
