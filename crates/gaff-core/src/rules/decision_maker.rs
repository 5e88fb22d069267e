//! DecisionMaker - 保留中の乱数決定を上書きする
//!
//! `valid` は context だけで安く判定し、必要なときだけ定義を materialize する。
//! `create` は `valid` が true を返したときだけ呼ばれ、`valid` 直後の状態を
//! `&State` で受け取る（途中で書き換えられない）。

use std::any::type_name;
use std::fmt;

use crate::domain::{DecisionDefinition, DecisionOutcome, DeferredDefinition, GaffError, RuleFormat};

use super::state::RuleState;

/// Policy object that can force a pending logic decision.
///
/// `valid` returning true promises that `create` yields *some* outcome, a
/// forced decision or an explained failure, not that it succeeds.
pub trait DecisionMaker: Send + Sync {
    type State: Default + Clone + fmt::Debug + Send + 'static;

    fn valid(
        &self,
        context: &str,
        definition: &DeferredDefinition<'_>,
        state: &mut Self::State,
    ) -> bool;

    fn create(&self, definition: &DecisionDefinition, state: &Self::State) -> DecisionOutcome;

    fn describe(&self, format: RuleFormat) -> String;
}

/// Object-safe form of `DecisionMaker`.
pub trait DynDecisionMaker: Send + Sync {
    fn new_state(&self) -> RuleState;

    fn valid_dyn(
        &self,
        context: &str,
        definition: &DeferredDefinition<'_>,
        state: &mut RuleState,
    ) -> Result<bool, GaffError>;

    fn create_dyn(
        &self,
        definition: &DecisionDefinition,
        state: &RuleState,
    ) -> Result<DecisionOutcome, GaffError>;

    fn describe_dyn(&self, format: RuleFormat) -> String;

    fn format_with(&self, spec: &str) -> Result<String, GaffError> {
        Ok(self.describe_dyn(spec.parse()?))
    }
}

fn mismatch<M>() -> GaffError {
    GaffError::StateMismatch {
        rule: type_name::<M>().to_string(),
    }
}

impl<M: DecisionMaker> DynDecisionMaker for M {
    fn new_state(&self) -> RuleState {
        RuleState::new(M::State::default())
    }

    fn valid_dyn(
        &self,
        context: &str,
        definition: &DeferredDefinition<'_>,
        state: &mut RuleState,
    ) -> Result<bool, GaffError> {
        let state = state.downcast_mut::<M::State>().ok_or_else(mismatch::<M>)?;
        Ok(self.valid(context, definition, state))
    }

    fn create_dyn(
        &self,
        definition: &DecisionDefinition,
        state: &RuleState,
    ) -> Result<DecisionOutcome, GaffError> {
        let state = state.downcast_ref::<M::State>().ok_or_else(mismatch::<M>)?;
        Ok(self.create(definition, state))
    }

    fn describe_dyn(&self, format: RuleFormat) -> String {
        self.describe(format)
    }
}
