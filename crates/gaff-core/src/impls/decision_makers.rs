//! Built-in decision makers.

use serde::{Deserialize, Serialize};

use crate::domain::{Decision, DecisionDefinition, DecisionOutcome, DeferredDefinition, RuleFormat};
use crate::rules::{ConfigurableRule, DecisionMaker, describe_rule};

fn select_label(definition: &DecisionDefinition, symbol: &str) -> DecisionOutcome {
    match definition.position_of(symbol) {
        Some(pos) => DecisionOutcome::succeeded(Decision::select(pos)),
        None => DecisionOutcome::failed(format!(
            "symbol '{}' is not an option for '{}'",
            symbol, definition.context
        )),
    }
}

/// Forces `symbol` onto the decision whose context equals `context`.
///
/// `valid` looks at the context only; a strip without the symbol is reported
/// by `create` as a failed outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceSymbol {
    pub context: String,
    pub symbol: String,
}

impl ConfigurableRule for ForceSymbol {
    const KIND: &'static str = "force_symbol";

    fn prose(&self) -> String {
        format!("force {} on {}", self.symbol, self.context)
    }
}

impl DecisionMaker for ForceSymbol {
    type State = ();

    fn valid(&self, context: &str, _definition: &DeferredDefinition<'_>, _state: &mut ()) -> bool {
        context == self.context
    }

    fn create(&self, definition: &DecisionDefinition, _state: &()) -> DecisionOutcome {
        select_label(definition, &self.symbol)
    }

    fn describe(&self, format: RuleFormat) -> String {
        describe_rule(self, format)
    }
}

/// Forces `symbol` on every decision whose context starts with
/// `context_prefix` and whose options contain the symbol.
///
/// The prefix check rejects most decisions without building their definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceSymbolWherePresent {
    pub context_prefix: String,
    pub symbol: String,
}

impl ConfigurableRule for ForceSymbolWherePresent {
    const KIND: &'static str = "force_symbol_where_present";

    fn prose(&self) -> String {
        format!("force {} on {}* where present", self.symbol, self.context_prefix)
    }
}

impl DecisionMaker for ForceSymbolWherePresent {
    type State = ();

    fn valid(&self, context: &str, definition: &DeferredDefinition<'_>, _state: &mut ()) -> bool {
        context.starts_with(&self.context_prefix)
            && definition.get().position_of(&self.symbol).is_some()
    }

    fn create(&self, definition: &DecisionDefinition, _state: &()) -> DecisionOutcome {
        select_label(definition, &self.symbol)
    }

    fn describe(&self, format: RuleFormat) -> String {
        describe_rule(self, format)
    }
}

/// Forces option indices for `context`, cycling through `selections`.
///
/// The use count kept in the state picks the selection and enforces `limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForceSelection {
    pub context: String,
    pub selections: Vec<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ConfigurableRule for ForceSelection {
    const KIND: &'static str = "force_selection";

    fn validate(&self) -> Result<(), String> {
        if self.selections.is_empty() {
            return Err("selections must not be empty".to_string());
        }
        Ok(())
    }

    fn prose(&self) -> String {
        let picks: Vec<String> = self.selections.iter().map(|s| s.to_string()).collect();
        match self.limit {
            Some(limit) => format!("select [{}] on {} ({} times)", picks.join(", "), self.context, limit),
            None => format!("select [{}] on {}", picks.join(", "), self.context),
        }
    }
}

impl DecisionMaker for ForceSelection {
    /// Offers accepted so far in this attempt.
    type State = u32;

    fn valid(&self, context: &str, _definition: &DeferredDefinition<'_>, used: &mut u32) -> bool {
        if context != self.context || self.limit.is_some_and(|limit| *used >= limit) {
            return false;
        }
        *used += 1;
        true
    }

    fn create(&self, definition: &DecisionDefinition, used: &u32) -> DecisionOutcome {
        let turn = used.saturating_sub(1) as usize % self.selections.len();
        let selection = self.selections[turn];
        if selection < definition.options.len() {
            DecisionOutcome::succeeded(Decision::select(selection))
        } else {
            DecisionOutcome::failed(format!(
                "selection {} out of range for '{}' ({} options)",
                selection,
                definition.context,
                definition.options.len()
            ))
        }
    }

    fn describe(&self, format: RuleFormat) -> String {
        describe_rule(self, format)
    }
}
