//! LogicEngine port - cycle result を生成するゲームロジック
//!
//! エンジンは乱数決定のたびに `DecisionOverride` に問い合わせる。
//! `None` が返ればエンジン自身の乱数で決める。

use crate::domain::{CycleResult, Decision, DecisionDefinition, EngineError};

/// Hook the engine calls for every pending random decision.
pub trait DecisionOverride {
    /// `definition` is only invoked when an override needs the full definition.
    fn decide(
        &mut self,
        context: &str,
        definition: &dyn Fn() -> DecisionDefinition,
    ) -> Option<Decision>;
}

/// Leaves every decision to the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOverride;

impl DecisionOverride for NoOverride {
    fn decide(&mut self, _: &str, _: &dyn Fn() -> DecisionDefinition) -> Option<Decision> {
        None
    }
}

/// Source of simulated game cycles.
///
/// # 設計原則
/// - `begin_attempt` でゲーム状態（free spins 残数など）を初期化する
/// - 乱数列は attempt をまたいで進める（同じ結果を繰り返さないため）
pub trait LogicEngine {
    fn begin_attempt(&mut self) -> Result<(), EngineError>;

    fn play_cycle(
        &mut self,
        overrides: &mut dyn DecisionOverride,
    ) -> Result<CycleResult, EngineError>;
}

impl<E: LogicEngine + ?Sized> LogicEngine for Box<E> {
    fn begin_attempt(&mut self) -> Result<(), EngineError> {
        (**self).begin_attempt()
    }

    fn play_cycle(
        &mut self,
        overrides: &mut dyn DecisionOverride,
    ) -> Result<CycleResult, EngineError> {
        (**self).play_cycle(overrides)
    }
}
