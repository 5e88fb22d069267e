//! State - step 判定とサーチ全体の状態
//!
//! # 状態遷移（attempt 単位）
//! - Searching: step を評価中
//! - Found: 全 step が完了
//! - Failed: いずれかの StepCondition が Fail を返した（最初から再開）
//! - Abandoned: cycle 予算切れ

use serde::{Deserialize, Serialize};

/// Three-valued verdict of a `StepCondition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepConditionResult {
    /// The condition is satisfied for this step.
    Found,

    /// Not satisfied yet; keep generating cycles for this step.
    KeepSearching,

    /// Can no longer be satisfied; restart the whole sequence.
    Fail,
}

impl StepConditionResult {
    /// Combine the verdicts of all step conditions of one step.
    ///
    /// Any `Fail` wins; the step is `Found` only when every condition is.
    /// No conditions at all counts as `Found`.
    pub fn combine(results: impl IntoIterator<Item = StepConditionResult>) -> Self {
        let mut combined = StepConditionResult::Found;
        for r in results {
            match r {
                StepConditionResult::Fail => return StepConditionResult::Fail,
                StepConditionResult::KeepSearching => combined = StepConditionResult::KeepSearching,
                StepConditionResult::Found => {}
            }
        }
        combined
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, StepConditionResult::Found | StepConditionResult::Fail)
    }
}

/// Final state of one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    Searching,
    Found,
    Failed,
    Abandoned,
}

impl AttemptState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, AttemptState::Searching)
    }
}
