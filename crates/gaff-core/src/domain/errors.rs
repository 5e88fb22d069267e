//! Errors - エラー型と分類
//!
//! Fail / DecisionOutcome::Failed は探索中の想定内の結果なのでここには含めない。
//! ここにあるのは設定ミス（リリース前に直すもの）と探索の打ち切りだけ。

use thiserror::Error;

/// ErrorKind は運用上の分類
///
/// - Configuration: ルール設定の不備（実行時に回復しない）
/// - Exhausted: 予算（attempt 数・期限）切れ
/// - Engine: LogicEngine 側の障害
/// - Internal: kernel 内部の不整合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Exhausted,
    Engine,
    Internal,
}

/// Failure reported by a `LogicEngine` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("logic engine failure: {message}")]
pub struct EngineError {
    pub message: String,
}

impl EngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GaffError {
    #[error("invalid {kind} rule: {message}")]
    InvalidRule { kind: String, message: String },

    #[error("unknown rule format specifier '{0}'")]
    UnknownFormat(String),

    #[error("no attempt satisfied sequence '{sequence}' within {attempts} attempts")]
    AttemptsExhausted { sequence: String, attempts: u32 },

    #[error("sequence '{sequence}' exceeded its deadline of {deadline_ms}ms")]
    DeadlineExceeded { sequence: String, deadline_ms: u64 },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("rule state for '{rule}' does not match the rule's state type")]
    StateMismatch { rule: String },
}

impl GaffError {
    pub fn invalid_rule(kind: impl Into<String>, message: impl Into<String>) -> Self {
        GaffError::InvalidRule {
            kind: kind.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GaffError::InvalidRule { .. } | GaffError::UnknownFormat(_) => {
                ErrorKind::Configuration
            }
            GaffError::AttemptsExhausted { .. } | GaffError::DeadlineExceeded { .. } => {
                ErrorKind::Exhausted
            }
            GaffError::Engine(_) => ErrorKind::Engine,
            GaffError::StateMismatch { .. } => ErrorKind::Internal,
        }
    }
}
