//! Input specs for a gaff sequence (Sequence / Step / Rule / Budget).
//!
//! Rule parameters stay `serde_json::Value` here; the `RuleRegistry` turns
//! them into typed rules when the sequence is built.

use serde::{Deserialize, Serialize};

/// A named gaff sequence: ordered steps plus the search budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub steps: Vec<StepSpec>,

    #[serde(default)]
    pub budget: Budget,
}

/// One phase of a sequence with its own completion conditions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSpec {
    pub name: String,

    #[serde(default)]
    pub result_conditions: Vec<RuleConfig>,

    #[serde(default)]
    pub step_conditions: Vec<RuleConfig>,

    #[serde(default)]
    pub decision_makers: Vec<RuleConfig>,
}

impl StepSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result_conditions: Vec::new(),
            step_conditions: Vec::new(),
            decision_makers: Vec::new(),
        }
    }

    pub fn with_result_condition(mut self, rule: RuleConfig) -> Self {
        self.result_conditions.push(rule);
        self
    }

    pub fn with_step_condition(mut self, rule: RuleConfig) -> Self {
        self.step_conditions.push(rule);
        self
    }

    pub fn with_decision_maker(mut self, rule: RuleConfig) -> Self {
        self.decision_makers.push(rule);
        self
    }
}

/// `{ "kind": "...", "params": { ... } }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub kind: String,

    #[serde(default)]
    pub params: serde_json::Value,
}

impl RuleConfig {
    pub fn new(kind: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            params,
        }
    }
}

/// Search budget / stop conditions.
///
/// The kernel itself never stops; these limits are what keep a sequence
/// whose conditions can never be jointly satisfied from running forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Budget {
    /// Maximum number of attempts (restarts from step 0) per search.
    pub max_attempts: u32,

    /// Maximum cycles one attempt may play before it is abandoned.
    pub max_cycles_per_attempt: u64,

    /// Optional wall-clock deadline for the whole search (milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
}

impl Default for Budget {
    fn default() -> Self {
        Self {
            max_attempts: 1_000,
            max_cycles_per_attempt: 500,
            deadline_ms: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_default_is_reasonable() {
        let b = Budget::default();
        assert_eq!(b.max_attempts, 1_000);
        assert_eq!(b.max_cycles_per_attempt, 500);
        assert_eq!(b.deadline_ms, None);
    }

    #[test]
    fn sequence_spec_without_budget_gets_default_budget() {
        let json = r#"
        {
          "name": "bonus",
          "steps": [
            {
              "name": "trigger",
              "step_conditions": [
                { "kind": "symbol_count", "params": { "symbol": "SC", "target": 3 } }
              ]
            }
          ]
        }"#;
        let spec: SequenceSpec = serde_json::from_str(json).expect("deserialize");
        assert_eq!(spec.budget, Budget::default());
        assert_eq!(spec.steps.len(), 1);
        assert!(spec.steps[0].result_conditions.is_empty());
        assert_eq!(spec.steps[0].step_conditions[0].kind, "symbol_count");
        assert_eq!(spec.steps[0].step_conditions[0].params["target"], 3);
    }

    #[test]
    fn rule_config_params_default_to_null() {
        let rule: RuleConfig = serde_json::from_str(r#"{ "kind": "cycle_count" }"#).unwrap();
        assert!(rule.params.is_null());
    }
}
