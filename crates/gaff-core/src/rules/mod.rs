//! Rules - ResultCondition / StepCondition / DecisionMaker
//!
//! # 二層構造
//! - **表層（Typed）**: `StepCondition`, `DecisionMaker` - `type State` で状態を型付け
//! - **内部（Dyn）**: `DynStepCondition`, `DynDecisionMaker` - object-safe, 状態は `RuleState` に型消去
//!
//! `ResultCondition` は状態を持たないので最初から object-safe。

pub mod decision_maker;
pub mod registry;
pub mod result_condition;
pub mod rule;
pub mod state;
pub mod step_condition;

pub use self::decision_maker::{DecisionMaker, DynDecisionMaker};
pub use self::registry::{RegistryError, RuleFamily, RuleRegistry};
pub use self::result_condition::ResultCondition;
pub use self::rule::{ConfigurableRule, describe_rule};
pub use self::state::RuleState;
pub use self::step_condition::{DynStepCondition, StepCondition};
