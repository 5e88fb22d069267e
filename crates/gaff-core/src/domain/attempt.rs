//! Attempt and Decision records for search history.

use serde::{Deserialize, Serialize};

use super::ids::AttemptId;
use super::outcome::DecisionOutcome;
use super::state::AttemptState;

/// One search attempt, from step 0 until it was found, failed or abandoned.
///
/// This is the foundation of "why did it take N attempts" reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub attempt_id: AttemptId,

    /// 1-based attempt number within the search.
    pub number: u32,

    pub state: AttemptState,

    /// Cycles played by the engine during this attempt.
    pub cycles: u64,

    /// Index of the step that was in progress when the attempt ended.
    pub reached_step: usize,

    /// Why the attempt ended without success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AttemptRecord {
    pub fn new(attempt_id: AttemptId, number: u32) -> Self {
        Self {
            attempt_id,
            number,
            state: AttemptState::Searching,
            cycles: 0,
            reached_step: 0,
            reason: None,
        }
    }

    pub fn mark_found(&mut self) {
        self.state = AttemptState::Found;
    }

    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.state = AttemptState::Failed;
        self.reason = Some(reason.into());
    }

    pub fn mark_abandoned(&mut self, reason: impl Into<String>) {
        self.state = AttemptState::Abandoned;
        self.reason = Some(reason.into());
    }
}

/// A decision maker's answer to one pending decision.
///
/// Records:
/// - Which decision was pending (context, cycle)
/// - Which maker answered
/// - What it produced (forced selection or rejection reason)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub attempt_id: AttemptId,
    pub step_index: usize,
    pub cycle: u64,
    pub context: String,

    /// `describe(RuleFormat::ScriptLine)` of the maker, e.g.
    /// `force_symbol {"context":"reel1 spin","symbol":"W"}`.
    pub maker: String,

    pub outcome: DecisionOutcome,

    /// Option label of the forced selection, when it exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}
