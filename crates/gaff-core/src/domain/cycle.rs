//! Cycle results and per-stage accumulations.
//!
//! This module is engine-agnostic: it does not assume a reel layout, a pay
//! model, or a bonus structure. It only defines the "shape" of one simulated
//! game cycle that conditions can inspect.

use serde::{Deserialize, Serialize};

/// Immutable snapshot of one simulated game cycle.
///
/// Produced by a `LogicEngine`; the search kernel only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleResult {
    /// Cycle number within the current attempt (0-based).
    pub index: u64,

    /// Game stage the cycle was played in (e.g. "base", "free").
    pub stage: String,

    /// Stop position per reel.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stops: Vec<usize>,

    /// Visible symbols, reel-major (`grid[reel][row]`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub grid: Vec<Vec<String>>,

    /// Total win of the cycle in credits.
    pub win: u64,

    /// Named events raised during the cycle (e.g. "bonus_trigger", "bonus_end").
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub markers: Vec<String>,

    /// Engine-specific payload the kernel never interprets.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub extra: serde_json::Value,
}

impl CycleResult {
    pub fn new(index: u64, stage: impl Into<String>) -> Self {
        Self {
            index,
            stage: stage.into(),
            stops: Vec::new(),
            grid: Vec::new(),
            win: 0,
            markers: Vec::new(),
            extra: serde_json::Value::Null,
        }
    }

    pub fn with_grid(mut self, grid: Vec<Vec<String>>) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_stops(mut self, stops: Vec<usize>) -> Self {
        self.stops = stops;
        self
    }

    pub fn with_win(mut self, win: u64) -> Self {
        self.win = win;
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.markers.push(marker.into());
        self
    }

    pub fn with_extra(mut self, extra: serde_json::Value) -> Self {
        self.extra = extra;
        self
    }

    /// Number of visible cells showing `symbol`.
    pub fn count_symbol(&self, symbol: &str) -> u32 {
        self.grid
            .iter()
            .flatten()
            .filter(|s| s.as_str() == symbol)
            .count() as u32
    }

    pub fn has_marker(&self, marker: &str) -> bool {
        self.markers.iter().any(|m| m == marker)
    }
}

/// Accepted results of one committed step.
///
/// Append-only while the step is in progress; read-only once committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageGaffResult {
    pub step_index: usize,
    pub step_name: String,
    pub results: Vec<CycleResult>,
}

impl StageGaffResult {
    pub fn new(step_index: usize, step_name: impl Into<String>) -> Self {
        Self {
            step_index,
            step_name: step_name.into(),
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, result: CycleResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn total_win(&self) -> u64 {
        self.results.iter().map(|r| r.win).sum()
    }
}
