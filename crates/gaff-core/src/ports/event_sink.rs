//! EventSink port - SearchEvent の送信先
//!
//! 実装は impls/event_sinks.rs（tracing 出力・メモリ記録）。

use crate::domain::SearchEvent;

pub trait EventSink: Send + Sync {
    fn emit(&self, event: SearchEvent);
}
