//! StepCondition - step の完了・継続・失敗を判定
//!
//! # 学習ポイント
//! - Associated type (`type State`) で attempt ごとの状態を型付け
//! - Object-safe trait (`DynStepCondition`) への blanket impl で型消去

use std::any::type_name;
use std::fmt;

use crate::domain::{CycleResult, GaffError, RuleFormat, StepConditionResult};

use super::state::RuleState;

/// Decides whether the current step is complete.
///
/// `state` starts as `State::default()` at the beginning of every attempt and
/// is owned by the orchestrator; the condition only updates it. Given the same
/// inputs and the same prior state, `check` returns the same verdict and
/// leaves the same state behind.
pub trait StepCondition: Send + Sync {
    type State: Default + Clone + fmt::Debug + Send + 'static;

    fn check(
        &self,
        result: &CycleResult,
        initial: &CycleResult,
        sequence: &[CycleResult],
        state: &mut Self::State,
    ) -> StepConditionResult;

    fn describe(&self, format: RuleFormat) -> String;
}

/// Object-safe form of `StepCondition`; the state lives in a `RuleState`.
pub trait DynStepCondition: Send + Sync {
    fn new_state(&self) -> RuleState;

    fn check_dyn(
        &self,
        result: &CycleResult,
        initial: &CycleResult,
        sequence: &[CycleResult],
        state: &mut RuleState,
    ) -> Result<StepConditionResult, GaffError>;

    fn describe_dyn(&self, format: RuleFormat) -> String;

    fn format_with(&self, spec: &str) -> Result<String, GaffError> {
        Ok(self.describe_dyn(spec.parse()?))
    }
}

impl<C: StepCondition> DynStepCondition for C {
    fn new_state(&self) -> RuleState {
        RuleState::new(C::State::default())
    }

    fn check_dyn(
        &self,
        result: &CycleResult,
        initial: &CycleResult,
        sequence: &[CycleResult],
        state: &mut RuleState,
    ) -> Result<StepConditionResult, GaffError> {
        let state = state
            .downcast_mut::<C::State>()
            .ok_or_else(|| GaffError::StateMismatch {
                rule: type_name::<C>().to_string(),
            })?;
        Ok(self.check(result, initial, sequence, state))
    }

    fn describe_dyn(&self, format: RuleFormat) -> String {
        self.describe(format)
    }
}
