//! RuleRegistry - rule kind の登録と RuleConfig からの組み立て
//!
//! # 学習ポイント
//! - HashMap での型消去された factory の管理
//! - Generic methods での登録と型安全性（`R::KIND` がキー）
//! - Arc による共有所有権（組み立てたルールは attempt 間・スレッド間で共有）

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::domain::{GaffError, RuleConfig};

use super::decision_maker::{DecisionMaker, DynDecisionMaker};
use super::result_condition::ResultCondition;
use super::rule::ConfigurableRule;
use super::step_condition::{DynStepCondition, StepCondition};

type Factory<T> = Box<dyn Fn(&serde_json::Value) -> Result<T, GaffError> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleFamily {
    ResultCondition,
    StepCondition,
    DecisionMaker,
}

impl fmt::Display for RuleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleFamily::ResultCondition => "result condition",
            RuleFamily::StepCondition => "step condition",
            RuleFamily::DecisionMaker => "decision maker",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{family} kind '{kind}' is already registered")]
    AlreadyRegistered { family: RuleFamily, kind: String },

    #[error("unknown {family} kind '{kind}'")]
    UnknownKind { family: RuleFamily, kind: String },

    #[error(transparent)]
    Invalid(#[from] GaffError),
}

/// Maps rule kinds to factories, one table per rule family.
///
/// # 使用例
/// ```ignore
/// let mut registry = RuleRegistry::new();
/// registry.register_step_condition::<SymbolCount>()?;
///
/// let rule = registry.build_step_condition(&RuleConfig::new("symbol_count", params))?;
/// ```
#[derive(Default)]
pub struct RuleRegistry {
    result_conditions: HashMap<String, Factory<Arc<dyn ResultCondition>>>,
    step_conditions: HashMap<String, Factory<Arc<dyn DynStepCondition>>>,
    decision_makers: HashMap<String, Factory<Arc<dyn DynDecisionMaker>>>,
}

fn insert<T>(
    table: &mut HashMap<String, Factory<T>>,
    family: RuleFamily,
    kind: &str,
    factory: Factory<T>,
) -> Result<(), RegistryError> {
    if table.contains_key(kind) {
        return Err(RegistryError::AlreadyRegistered {
            family,
            kind: kind.to_string(),
        });
    }
    table.insert(kind.to_string(), factory);
    Ok(())
}

fn build<T>(
    table: &HashMap<String, Factory<T>>,
    family: RuleFamily,
    config: &RuleConfig,
) -> Result<T, RegistryError> {
    let factory = table
        .get(&config.kind)
        .ok_or_else(|| RegistryError::UnknownKind {
            family,
            kind: config.kind.clone(),
        })?;
    Ok(factory(&config.params)?)
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the rule kinds shipped in `impls`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::impls::register_builtins(&mut registry)
            .expect("builtin rule kinds must be unique.");
        registry
    }

    pub fn register_result_condition<R>(&mut self) -> Result<(), RegistryError>
    where
        R: ResultCondition + ConfigurableRule,
    {
        insert(
            &mut self.result_conditions,
            RuleFamily::ResultCondition,
            R::KIND,
            Box::new(|params: &serde_json::Value| {
                Ok(Arc::new(R::from_params(params)?) as Arc<dyn ResultCondition>)
            }),
        )
    }

    pub fn register_step_condition<R>(&mut self) -> Result<(), RegistryError>
    where
        R: StepCondition + ConfigurableRule,
    {
        insert(
            &mut self.step_conditions,
            RuleFamily::StepCondition,
            R::KIND,
            Box::new(|params: &serde_json::Value| {
                Ok(Arc::new(R::from_params(params)?) as Arc<dyn DynStepCondition>)
            }),
        )
    }

    pub fn register_decision_maker<R>(&mut self) -> Result<(), RegistryError>
    where
        R: DecisionMaker + ConfigurableRule,
    {
        insert(
            &mut self.decision_makers,
            RuleFamily::DecisionMaker,
            R::KIND,
            Box::new(|params: &serde_json::Value| {
                Ok(Arc::new(R::from_params(params)?) as Arc<dyn DynDecisionMaker>)
            }),
        )
    }

    pub fn build_result_condition(
        &self,
        config: &RuleConfig,
    ) -> Result<Arc<dyn ResultCondition>, RegistryError> {
        build(&self.result_conditions, RuleFamily::ResultCondition, config)
    }

    pub fn build_step_condition(
        &self,
        config: &RuleConfig,
    ) -> Result<Arc<dyn DynStepCondition>, RegistryError> {
        build(&self.step_conditions, RuleFamily::StepCondition, config)
    }

    pub fn build_decision_maker(
        &self,
        config: &RuleConfig,
    ) -> Result<Arc<dyn DynDecisionMaker>, RegistryError> {
        build(&self.decision_makers, RuleFamily::DecisionMaker, config)
    }

    /// Registered kinds of one family, sorted.
    pub fn registered_kinds(&self, family: RuleFamily) -> Vec<String> {
        let mut kinds: Vec<String> = match family {
            RuleFamily::ResultCondition => self.result_conditions.keys().cloned().collect(),
            RuleFamily::StepCondition => self.step_conditions.keys().cloned().collect(),
            RuleFamily::DecisionMaker => self.decision_makers.keys().cloned().collect(),
        };
        kinds.sort();
        kinds
    }
}
