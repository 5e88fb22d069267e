//! ReelStripEngine - デモ用の LogicEngine
//!
//! 各リールのストップ位置を 1 つの乱数決定（context `"reel<N> spin"`）として
//! `DecisionOverride` に提示し、override が無いときだけ自前の `StdRng` で決める。
//!
//! # ゲームルール
//! - 中央行のライン: リール 1 から同じシンボルが 3 つ以上続けば
//!   `paytable[symbol] * (run - 2)` を支払う（scatter は対象外）
//! - scatter が画面に 3 つ以上で `bonus_trigger`、free spins を付与
//! - free stage の最後の spin で `bonus_end`
//!
//! seed が同じなら同じ結果列になる（attempt をまたいでも乱数列は続く）。

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::{CycleResult, DecisionDefinition, EngineError};
use crate::ports::{DecisionOverride, LogicEngine};

pub const BONUS_TRIGGER: &str = "bonus_trigger";
pub const BONUS_END: &str = "bonus_end";

fn default_rows() -> usize {
    3
}

/// Reel layout, pays and bonus rules of the demo game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReelEngineConfig {
    /// One strip per reel, symbols in strip order.
    pub strips: Vec<Vec<String>>,

    /// Visible rows per reel. The stop position lands on the centre row.
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Credits per centre-line symbol for a run of 3.
    pub paytable: BTreeMap<String, u64>,

    pub scatter: String,

    pub free_spins_award: u32,
}

impl Default for ReelEngineConfig {
    fn default() -> Self {
        let strip = |symbols: &[&str]| symbols.iter().map(|s| s.to_string()).collect();
        Self {
            strips: vec![
                strip(&["A", "K", "Q", "SC", "J", "10", "W", "K", "Q", "J"]),
                strip(&["K", "A", "J", "Q", "10", "SC", "A", "W", "10", "Q"]),
                strip(&["Q", "J", "SC", "A", "K", "10", "J", "W", "A", "K"]),
                strip(&["J", "10", "A", "W", "K", "Q", "SC", "10", "J", "A"]),
                strip(&["10", "Q", "K", "J", "A", "W", "Q", "SC", "K", "10"]),
            ],
            rows: default_rows(),
            paytable: [("W", 100), ("A", 50), ("K", 40), ("Q", 30), ("J", 20), ("10", 10)]
                .into_iter()
                .map(|(s, pay)| (s.to_string(), pay))
                .collect(),
            scatter: "SC".to_string(),
            free_spins_award: 8,
        }
    }
}

impl ReelEngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.strips.is_empty() {
            return Err(EngineError::new("at least one reel strip is required"));
        }
        if let Some(reel) = self.strips.iter().position(Vec::is_empty) {
            return Err(EngineError::new(format!("reel {} has an empty strip", reel + 1)));
        }
        if self.rows == 0 {
            return Err(EngineError::new("rows must be at least 1"));
        }
        if self.paytable.contains_key(&self.scatter) {
            return Err(EngineError::new(format!(
                "scatter '{}' cannot also be a line symbol",
                self.scatter
            )));
        }
        Ok(())
    }
}

pub struct ReelStripEngine {
    config: ReelEngineConfig,
    rng: StdRng,
    next_index: u64,
    free_spins_left: u32,
}

impl ReelStripEngine {
    pub fn new(config: ReelEngineConfig, seed: u64) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            next_index: 0,
            free_spins_left: 0,
        })
    }

    pub fn config(&self) -> &ReelEngineConfig {
        &self.config
    }

    pub fn free_spins_left(&self) -> u32 {
        self.free_spins_left
    }

    fn window(&self, reel: usize, stop: usize) -> Vec<String> {
        let strip = &self.config.strips[reel];
        let len = strip.len();
        let rows = self.config.rows;
        (0..rows)
            .map(|r| strip[(stop + r + len * rows - rows / 2) % len].clone())
            .collect()
    }

    fn line_win(&self, grid: &[Vec<String>]) -> u64 {
        let centre = self.config.rows / 2;
        let first = &grid[0][centre];
        if *first == self.config.scatter {
            return 0;
        }
        let run = grid.iter().take_while(|reel| reel[centre] == *first).count();
        if run < 3 {
            return 0;
        }
        self.config
            .paytable
            .get(first)
            .map_or(0, |pay| pay * (run as u64 - 2))
    }
}

impl LogicEngine for ReelStripEngine {
    fn begin_attempt(&mut self) -> Result<(), EngineError> {
        self.next_index = 0;
        self.free_spins_left = 0;
        Ok(())
    }

    fn play_cycle(
        &mut self,
        overrides: &mut dyn DecisionOverride,
    ) -> Result<CycleResult, EngineError> {
        let in_free = self.free_spins_left > 0;
        let stage = if in_free { "free" } else { "base" };

        let mut stops = Vec::with_capacity(self.config.strips.len());
        for (reel, strip) in self.config.strips.iter().enumerate() {
            let context = format!("reel{} spin", reel + 1);
            let definition = || DecisionDefinition::new(context.clone(), strip.clone());
            let forced = overrides
                .decide(&context, &definition)
                .map(|d| d.selection)
                .filter(|&s| s < strip.len());
            let stop = match forced {
                Some(s) => s,
                None => self.rng.gen_range(0..strip.len()),
            };
            stops.push(stop);
        }

        let grid: Vec<Vec<String>> = stops
            .iter()
            .enumerate()
            .map(|(reel, &stop)| self.window(reel, stop))
            .collect();
        let win = self.line_win(&grid);

        let index = self.next_index;
        self.next_index += 1;
        let mut result = CycleResult::new(index, stage)
            .with_stops(stops)
            .with_grid(grid)
            .with_win(win);

        if in_free {
            self.free_spins_left -= 1;
        }
        if result.count_symbol(&self.config.scatter) >= 3 {
            self.free_spins_left += self.config.free_spins_award;
            result = result.with_marker(BONUS_TRIGGER);
        }
        if in_free && self.free_spins_left == 0 {
            result = result.with_marker(BONUS_END);
        }

        Ok(result.with_extra(serde_json::json!({ "free_spins_left": self.free_spins_left })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Decision;
    use crate::ports::NoOverride;

    /// Forces `symbol` on every reel, building the definition each time.
    struct ForceEverywhere(&'static str);

    impl DecisionOverride for ForceEverywhere {
        fn decide(
            &mut self,
            _context: &str,
            definition: &dyn Fn() -> DecisionDefinition,
        ) -> Option<Decision> {
            definition().position_of(self.0).map(Decision::select)
        }
    }

    /// Records contexts without touching definitions.
    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl DecisionOverride for Recorder {
        fn decide(&mut self, context: &str, _: &dyn Fn() -> DecisionDefinition) -> Option<Decision> {
            self.0.push(context.to_string());
            None
        }
    }

    fn engine(seed: u64) -> ReelStripEngine {
        ReelStripEngine::new(ReelEngineConfig::default(), seed).unwrap()
    }

    #[test]
    fn same_seed_same_cycles() {
        let (mut a, mut b) = (engine(7), engine(7));
        for _ in 0..20 {
            assert_eq!(
                a.play_cycle(&mut NoOverride).unwrap(),
                b.play_cycle(&mut NoOverride).unwrap()
            );
        }
    }

    #[test]
    fn one_decision_per_reel_in_order() {
        let mut e = engine(1);
        let mut rec = Recorder::default();
        e.play_cycle(&mut rec).unwrap();
        assert_eq!(
            rec.0,
            vec!["reel1 spin", "reel2 spin", "reel3 spin", "reel4 spin", "reel5 spin"]
        );
    }

    #[test]
    fn forced_stop_lands_on_centre_row() {
        let mut e = engine(3);
        let r = e.play_cycle(&mut ForceEverywhere("W")).unwrap();
        assert!(r.grid.iter().all(|reel| reel[1] == "W"));
        // 5 x W on the centre line
        assert_eq!(r.win, 100 * 3);
    }

    #[test]
    fn out_of_range_selection_falls_back_to_rng() {
        struct Wild;
        impl DecisionOverride for Wild {
            fn decide(&mut self, _: &str, _: &dyn Fn() -> DecisionDefinition) -> Option<Decision> {
                Some(Decision::select(999))
            }
        }
        let mut e = engine(5);
        let r = e.play_cycle(&mut Wild).unwrap();
        assert!(r.stops.iter().all(|&s| s < 10));
    }

    #[test]
    fn scatters_trigger_free_spins_until_bonus_end() {
        let mut config = ReelEngineConfig::default();
        config.free_spins_award = 2;
        let mut e = ReelStripEngine::new(config, 11).unwrap();

        let trigger = e.play_cycle(&mut ForceEverywhere("SC")).unwrap();
        assert_eq!(trigger.stage, "base");
        assert!(trigger.has_marker(BONUS_TRIGGER));
        assert_eq!(trigger.win, 0);
        assert_eq!(trigger.extra["free_spins_left"], 2);

        let first = e.play_cycle(&mut ForceEverywhere("A")).unwrap();
        assert_eq!(first.stage, "free");
        assert!(!first.has_marker(BONUS_END));

        let last = e.play_cycle(&mut ForceEverywhere("A")).unwrap();
        assert_eq!(last.stage, "free");
        assert!(last.has_marker(BONUS_END));
        assert_eq!(e.free_spins_left(), 0);

        let after = e.play_cycle(&mut NoOverride).unwrap();
        assert_eq!(after.stage, "base");
    }

    #[test]
    fn begin_attempt_resets_game_state() {
        let mut e = engine(2);
        e.play_cycle(&mut ForceEverywhere("SC")).unwrap();
        assert!(e.free_spins_left() > 0);

        e.begin_attempt().unwrap();
        assert_eq!(e.free_spins_left(), 0);
        assert_eq!(e.play_cycle(&mut NoOverride).unwrap().index, 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ReelEngineConfig::default();
        config.strips[2].clear();
        let err = ReelStripEngine::new(config, 0).err().unwrap();
        assert_eq!(err.message, "reel 3 has an empty strip");
    }
}
