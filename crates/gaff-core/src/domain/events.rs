//! Events - サーチ中に発生するイベント
//!
//! EventSink（ports）経由で UI やログに流す。

use serde::{Deserialize, Serialize};

use super::ids::{AttemptId, SearchId};
use super::state::StepConditionResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SearchEvent {
    SearchStarted {
        search_id: SearchId,
        sequence: String,
    },
    AttemptStarted {
        search_id: SearchId,
        attempt_id: AttemptId,
        number: u32,
    },
    ResultEvaluated {
        attempt_id: AttemptId,
        step_index: usize,
        cycle: u64,
        accepted: bool,
        verdict: StepConditionResult,
    },
    DecisionForced {
        attempt_id: AttemptId,
        context: String,
        selection: usize,
    },
    StepCompleted {
        attempt_id: AttemptId,
        step_index: usize,
        step_name: String,
        results: usize,
    },
    AttemptEnded {
        attempt_id: AttemptId,
        reason: String,
    },
    SearchFinished {
        search_id: SearchId,
        attempts: u32,
        found: bool,
    },
}

impl SearchEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SearchEvent::SearchStarted { .. } => "search_started",
            SearchEvent::AttemptStarted { .. } => "attempt_started",
            SearchEvent::ResultEvaluated { .. } => "result_evaluated",
            SearchEvent::DecisionForced { .. } => "decision_forced",
            SearchEvent::StepCompleted { .. } => "step_completed",
            SearchEvent::AttemptEnded { .. } => "attempt_ended",
            SearchEvent::SearchFinished { .. } => "search_finished",
        }
    }
}
