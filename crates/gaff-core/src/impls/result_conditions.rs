//! Built-in result conditions.

use serde::{Deserialize, Serialize};

use crate::domain::{CycleResult, RuleFormat};
use crate::rules::{ConfigurableRule, ResultCondition, describe_rule};

fn yes() -> bool {
    true
}

/// Accepts results whose win lies in `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinAmount {
    #[serde(default)]
    pub min: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
}

impl ConfigurableRule for WinAmount {
    const KIND: &'static str = "win_amount";

    fn validate(&self) -> Result<(), String> {
        match self.max {
            Some(max) if max < self.min => Err(format!("min {} > max {}", self.min, max)),
            _ => Ok(()),
        }
    }

    fn prose(&self) -> String {
        match self.max {
            Some(max) => format!("win amount between {} and {}", self.min, max),
            None => format!("win amount at least {}", self.min),
        }
    }
}

impl ResultCondition for WinAmount {
    fn check(&self, result: &CycleResult, _: &CycleResult, _: &[CycleResult]) -> bool {
        result.win >= self.min && self.max.is_none_or(|max| result.win <= max)
    }

    fn describe(&self, format: RuleFormat) -> String {
        describe_rule(self, format)
    }
}

/// Accepts results played in the given stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageIs {
    pub stage: String,
}

impl ConfigurableRule for StageIs {
    const KIND: &'static str = "stage_is";

    fn prose(&self) -> String {
        format!("stage is {}", self.stage)
    }
}

impl ResultCondition for StageIs {
    fn check(&self, result: &CycleResult, _: &CycleResult, _: &[CycleResult]) -> bool {
        result.stage == self.stage
    }

    fn describe(&self, format: RuleFormat) -> String {
        describe_rule(self, format)
    }
}

/// Accepts results that carry (or, with `present: false`, lack) a marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub marker: String,

    #[serde(default = "yes")]
    pub present: bool,
}

impl ConfigurableRule for Marker {
    const KIND: &'static str = "marker";

    fn prose(&self) -> String {
        if self.present {
            format!("marker {} present", self.marker)
        } else {
            format!("marker {} absent", self.marker)
        }
    }
}

impl ResultCondition for Marker {
    fn check(&self, result: &CycleResult, _: &CycleResult, _: &[CycleResult]) -> bool {
        result.has_marker(&self.marker) == self.present
    }

    fn describe(&self, format: RuleFormat) -> String {
        describe_rule(self, format)
    }
}

/// Rejects results whose grid already appears in the committed sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DistinctGrid {}

impl ConfigurableRule for DistinctGrid {
    const KIND: &'static str = "distinct_grid";

    fn prose(&self) -> String {
        "grid not seen earlier in the sequence".to_string()
    }
}

impl ResultCondition for DistinctGrid {
    fn check(&self, result: &CycleResult, _: &CycleResult, sequence: &[CycleResult]) -> bool {
        !sequence.iter().any(|earlier| earlier.grid == result.grid)
    }

    fn describe(&self, format: RuleFormat) -> String {
        describe_rule(self, format)
    }
}
