//! Impls - 実装
//!
//! # 含まれる実装
//! - **result_conditions / step_conditions / decision_makers**: 組み込みルール
//! - **ReelStripEngine**: デモ用の LogicEngine
//! - **TracingEventSink / RecordingEventSink**: EventSink
//!
//! 組み込みルールは `register_builtins` で `RuleRegistry` に登録する。

pub mod decision_makers;
pub mod event_sinks;
pub mod reel_engine;
pub mod result_conditions;
pub mod step_conditions;

pub use self::decision_makers::{ForceSelection, ForceSymbol, ForceSymbolWherePresent};
pub use self::event_sinks::{RecordingEventSink, TracingEventSink};
pub use self::reel_engine::{BONUS_END, BONUS_TRIGGER, ReelEngineConfig, ReelStripEngine};
pub use self::result_conditions::{DistinctGrid, Marker, StageIs, WinAmount};
pub use self::step_conditions::{CycleCount, MarkerReached, SymbolCount, TotalWin};

use crate::rules::{RegistryError, RuleRegistry};

/// Register every built-in rule kind.
pub fn register_builtins(registry: &mut RuleRegistry) -> Result<(), RegistryError> {
    registry.register_result_condition::<WinAmount>()?;
    registry.register_result_condition::<StageIs>()?;
    registry.register_result_condition::<Marker>()?;
    registry.register_result_condition::<DistinctGrid>()?;

    registry.register_step_condition::<SymbolCount>()?;
    registry.register_step_condition::<MarkerReached>()?;
    registry.register_step_condition::<TotalWin>()?;
    registry.register_step_condition::<CycleCount>()?;

    registry.register_decision_maker::<ForceSymbol>()?;
    registry.register_decision_maker::<ForceSymbolWherePresent>()?;
    registry.register_decision_maker::<ForceSelection>()?;
    Ok(())
}
