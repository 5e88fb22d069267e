//! gaff-core
//!
//! Decision/condition kernel for searching simulated game cycles that
//! satisfy a "gaff sequence" (e.g. "trigger the bonus, then collect 3
//! scatters before it ends").
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（cycle, decision, outcome, spec, state, errors, events, ids）
//! - **rules**: ResultCondition / StepCondition / DecisionMaker と RuleRegistry
//! - **ports**: 抽象化レイヤー（LogicEngine, Clock, IdGenerator, EventSink）
//! - **app**: SequenceBuilder と GaffSearch
//! - **impls**: 組み込みルール、デモ用 ReelStripEngine、EventSink 実装

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod rules;

pub use app::{BuildError, GaffReport, GaffSearch, GaffSequence, SequenceBuilder};
pub use domain::{CycleResult, GaffError, SequenceSpec};
pub use rules::RuleRegistry;
