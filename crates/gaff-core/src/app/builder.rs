//! SequenceBuilder - SequenceSpec から実行可能な GaffSequence を組み立てる
//!
//! # 学習ポイント
//! - Builder パターンの実装
//! - 起動時検証（Fail-fast 設計）: ルール設定の不備は探索を始める前にすべて弾く
//! - 開発体験の改善（どの step のどのルールが悪いかをエラーに含める）

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::{Budget, SequenceSpec, StepSpec};
use crate::rules::{
    ConfigurableRule, DecisionMaker, DynDecisionMaker, DynStepCondition, RegistryError,
    ResultCondition, RuleRegistry, StepCondition,
};

/// A built rule together with the kind it was configured as.
pub struct BoundRule<T: ?Sized> {
    pub kind: String,
    pub rule: Arc<T>,
}

impl<T: ?Sized> BoundRule<T> {
    pub fn new(kind: impl Into<String>, rule: Arc<T>) -> Self {
        Self {
            kind: kind.into(),
            rule,
        }
    }
}

impl<T: ?Sized> Clone for BoundRule<T> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            rule: Arc::clone(&self.rule),
        }
    }
}

/// One step of a built sequence.
#[derive(Clone)]
pub struct GaffStep {
    pub name: String,
    pub result_conditions: Vec<BoundRule<dyn ResultCondition>>,
    pub step_conditions: Vec<BoundRule<dyn DynStepCondition>>,
    pub decision_makers: Vec<BoundRule<dyn DynDecisionMaker>>,
}

impl GaffStep {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result_conditions: Vec::new(),
            step_conditions: Vec::new(),
            decision_makers: Vec::new(),
        }
    }

    pub fn with_result_condition(
        mut self,
        kind: impl Into<String>,
        rule: Arc<dyn ResultCondition>,
    ) -> Self {
        self.result_conditions.push(BoundRule::new(kind, rule));
        self
    }

    pub fn with_step_condition(
        mut self,
        kind: impl Into<String>,
        rule: Arc<dyn DynStepCondition>,
    ) -> Self {
        self.step_conditions.push(BoundRule::new(kind, rule));
        self
    }

    pub fn with_decision_maker(
        mut self,
        kind: impl Into<String>,
        rule: Arc<dyn DynDecisionMaker>,
    ) -> Self {
        self.decision_makers.push(BoundRule::new(kind, rule));
        self
    }
}

/// Validated, immutable gaff sequence. Shared across searches via `Arc`.
#[derive(Clone)]
pub struct GaffSequence {
    name: String,
    description: Option<String>,
    budget: Budget,
    steps: Vec<GaffStep>,
}

impl GaffSequence {
    /// # 検証
    /// - step が 1 つ以上あること
    /// - step 名が空でなく重複しないこと
    /// - budget の上限が 0 でないこと
    pub fn new(
        name: impl Into<String>,
        budget: Budget,
        steps: Vec<GaffStep>,
    ) -> Result<Self, BuildError> {
        let name = name.into();
        if steps.is_empty() {
            return Err(BuildError::EmptySequence(name));
        }
        if budget.max_attempts == 0 {
            return Err(BuildError::InvalidBudget("max_attempts must be at least 1"));
        }
        if budget.max_cycles_per_attempt == 0 {
            return Err(BuildError::InvalidBudget(
                "max_cycles_per_attempt must be at least 1",
            ));
        }

        let mut seen = HashSet::new();
        for (index, step) in steps.iter().enumerate() {
            if step.name.trim().is_empty() {
                return Err(BuildError::UnnamedStep(index));
            }
            if !seen.insert(step.name.as_str()) {
                return Err(BuildError::DuplicateStep(step.name.clone()));
            }
        }

        Ok(Self {
            name,
            description: None,
            budget,
            steps,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn steps(&self) -> &[GaffStep] {
        &self.steps
    }
}

/// BuildError はシーケンス構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("sequence '{0}' has no steps")]
    EmptySequence(String),

    #[error("step #{0} has no name")]
    UnnamedStep(usize),

    #[error("step name '{0}' is used more than once")]
    DuplicateStep(String),

    #[error("invalid budget: {0}")]
    InvalidBudget(&'static str),

    #[error("step '{step}': {source}")]
    Rule {
        step: String,
        #[source]
        source: RegistryError,
    },
}

/// SequenceBuilder は RuleRegistry を使って SequenceSpec を組み立てる
///
/// # 使用例
/// ```ignore
/// let sequence = SequenceBuilder::new()
///     .register_step_condition::<MyCondition>()?
///     .build(&spec)?;
/// ```
pub struct SequenceBuilder {
    registry: RuleRegistry,
}

impl SequenceBuilder {
    /// Builder with every built-in rule kind registered.
    pub fn new() -> Self {
        Self::with_registry(RuleRegistry::with_builtins())
    }

    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn register_result_condition<R>(mut self) -> Result<Self, RegistryError>
    where
        R: ResultCondition + ConfigurableRule,
    {
        self.registry.register_result_condition::<R>()?;
        Ok(self)
    }

    pub fn register_step_condition<R>(mut self) -> Result<Self, RegistryError>
    where
        R: StepCondition + ConfigurableRule,
    {
        self.registry.register_step_condition::<R>()?;
        Ok(self)
    }

    pub fn register_decision_maker<R>(mut self) -> Result<Self, RegistryError>
    where
        R: DecisionMaker + ConfigurableRule,
    {
        self.registry.register_decision_maker::<R>()?;
        Ok(self)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Build every rule of `spec` and validate the result.
    pub fn build(&self, spec: &SequenceSpec) -> Result<GaffSequence, BuildError> {
        let steps = spec
            .steps
            .iter()
            .map(|step| {
                self.build_step(step).map_err(|source| BuildError::Rule {
                    step: step.name.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let sequence = GaffSequence::new(&spec.name, spec.budget.clone(), steps)?;
        Ok(match &spec.description {
            Some(description) => sequence.with_description(description),
            None => sequence,
        })
    }

    fn build_step(&self, spec: &StepSpec) -> Result<GaffStep, RegistryError> {
        let mut step = GaffStep::new(&spec.name);
        for config in &spec.result_conditions {
            let rule = self.registry.build_result_condition(config)?;
            step = step.with_result_condition(config.kind.clone(), rule);
        }
        for config in &spec.step_conditions {
            let rule = self.registry.build_step_condition(config)?;
            step = step.with_step_condition(config.kind.clone(), rule);
        }
        for config in &spec.decision_makers {
            let rule = self.registry.build_decision_maker(config)?;
            step = step.with_decision_maker(config.kind.clone(), rule);
        }
        Ok(step)
    }
}

impl Default for SequenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}
