//! Ports - 抽象化レイヤー
//!
//! kernel の外側にいる協力者（ゲームロジック、時計、ID 生成、イベント出力）への
//! インターフェースを定義します。

pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod logic_engine;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::logic_engine::{DecisionOverride, LogicEngine, NoOverride};
