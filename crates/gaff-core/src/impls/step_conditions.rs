//! Built-in step conditions.

use serde::{Deserialize, Serialize};

use crate::domain::{CycleResult, RuleFormat, StepConditionResult};
use crate::rules::{ConfigurableRule, StepCondition, describe_rule};

/// Found once `target` cells of `symbol` have been seen during the step.
///
/// Fails when `terminal_marker` shows up before the target is reached
/// (e.g. `bonus_end` with fewer than 3 scatters collected).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolCount {
    pub symbol: String,
    pub target: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_marker: Option<String>,
}

impl ConfigurableRule for SymbolCount {
    const KIND: &'static str = "symbol_count";

    fn validate(&self) -> Result<(), String> {
        if self.target == 0 {
            return Err("target must be at least 1".to_string());
        }
        Ok(())
    }

    fn prose(&self) -> String {
        match &self.terminal_marker {
            Some(m) => format!("{} x {} before {}", self.target, self.symbol, m),
            None => format!("{} x {}", self.target, self.symbol),
        }
    }
}

impl StepCondition for SymbolCount {
    /// Symbols seen so far.
    type State = u32;

    fn check(
        &self,
        result: &CycleResult,
        _initial: &CycleResult,
        _sequence: &[CycleResult],
        seen: &mut u32,
    ) -> StepConditionResult {
        *seen = seen.saturating_add(result.count_symbol(&self.symbol));
        if *seen >= self.target {
            return StepConditionResult::Found;
        }
        match &self.terminal_marker {
            Some(m) if result.has_marker(m) => StepConditionResult::Fail,
            _ => StepConditionResult::KeepSearching,
        }
    }

    fn describe(&self, format: RuleFormat) -> String {
        describe_rule(self, format)
    }
}

/// Found when a result carries `marker`; fails on `fail_on`.
///
/// With `ignore_initial`, the result that began the step does not count, so
/// only a marker raised after the step started (a retrigger) completes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerReached {
    pub marker: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    #[serde(default)]
    pub ignore_initial: bool,
}

impl ConfigurableRule for MarkerReached {
    const KIND: &'static str = "marker_reached";

    fn validate(&self) -> Result<(), String> {
        if self.fail_on.as_deref() == Some(self.marker.as_str()) {
            return Err(format!("marker '{}' cannot also be the failure marker", self.marker));
        }
        Ok(())
    }

    fn prose(&self) -> String {
        match &self.fail_on {
            Some(f) => format!("reach {} before {}", self.marker, f),
            None => format!("reach {}", self.marker),
        }
    }
}

impl StepCondition for MarkerReached {
    type State = ();

    fn check(
        &self,
        result: &CycleResult,
        initial: &CycleResult,
        _sequence: &[CycleResult],
        _state: &mut (),
    ) -> StepConditionResult {
        let is_initial = result.index == initial.index;
        if result.has_marker(&self.marker) && !(self.ignore_initial && is_initial) {
            return StepConditionResult::Found;
        }
        match &self.fail_on {
            Some(f) if result.has_marker(f) => StepConditionResult::Fail,
            _ => StepConditionResult::KeepSearching,
        }
    }

    fn describe(&self, format: RuleFormat) -> String {
        describe_rule(self, format)
    }
}

/// Found once the wins seen during the step add up to `min`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalWin {
    pub min: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_marker: Option<String>,
}

impl ConfigurableRule for TotalWin {
    const KIND: &'static str = "total_win";

    fn prose(&self) -> String {
        format!("total win at least {}", self.min)
    }
}

impl StepCondition for TotalWin {
    type State = u64;

    fn check(
        &self,
        result: &CycleResult,
        _initial: &CycleResult,
        _sequence: &[CycleResult],
        total: &mut u64,
    ) -> StepConditionResult {
        *total = total.saturating_add(result.win);
        if *total >= self.min {
            return StepConditionResult::Found;
        }
        match &self.terminal_marker {
            Some(m) if result.has_marker(m) => StepConditionResult::Fail,
            _ => StepConditionResult::KeepSearching,
        }
    }

    fn describe(&self, format: RuleFormat) -> String {
        describe_rule(self, format)
    }
}

/// Found after `count` cycles have been evaluated in the step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleCount {
    pub count: u64,
}

impl ConfigurableRule for CycleCount {
    const KIND: &'static str = "cycle_count";

    fn validate(&self) -> Result<(), String> {
        if self.count == 0 {
            return Err("count must be at least 1".to_string());
        }
        Ok(())
    }

    fn prose(&self) -> String {
        format!("{} cycles", self.count)
    }
}

impl StepCondition for CycleCount {
    type State = u64;

    fn check(
        &self,
        _result: &CycleResult,
        _initial: &CycleResult,
        _sequence: &[CycleResult],
        cycles: &mut u64,
    ) -> StepConditionResult {
        *cycles += 1;
        if *cycles >= self.count {
            StepConditionResult::Found
        } else {
            StepConditionResult::KeepSearching
        }
    }

    fn describe(&self, format: RuleFormat) -> String {
        describe_rule(self, format)
    }
}
