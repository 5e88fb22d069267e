//! Outcome model: result of asking a decision maker to force a decision.
//!
//! A failed outcome is an expected answer ("cannot force this one"), not an
//! error. The two shapes are separate enum variants so a success without a
//! decision (or a failure carrying one) cannot be built.

use serde::{Deserialize, Serialize};

use super::decision::Decision;

/// Result of `DecisionMaker::create`.
///
/// Serialized as SUCCEEDED / FAILED to match the report format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionOutcome {
    Succeeded { decision: Decision },
    Failed { reason: String },
}

impl DecisionOutcome {
    pub fn succeeded(decision: Decision) -> Self {
        Self::Succeeded { decision }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn decision(&self) -> Option<&Decision> {
        match self {
            Self::Succeeded { decision } => Some(decision),
            Self::Failed { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Succeeded { .. } => None,
            Self::Failed { reason } => Some(reason),
        }
    }
}
