//! Domain model (cycle results, decisions, outcomes, specs, records, ...).

pub mod attempt;
pub mod cycle;
pub mod decision;
pub mod errors;
pub mod events;
pub mod format;
pub mod ids;
pub mod outcome;
pub mod spec;
pub mod state;

pub use attempt::{AttemptRecord, DecisionRecord};
pub use cycle::{CycleResult, StageGaffResult};
pub use decision::{Decision, DecisionDefinition, DeferredDefinition};
pub use errors::{EngineError, ErrorKind, GaffError};
pub use events::SearchEvent;
pub use format::RuleFormat;
pub use ids::{AttemptId, SearchId};
pub use outcome::DecisionOutcome;
pub use spec::{Budget, RuleConfig, SequenceSpec, StepSpec};
pub use state::{AttemptState, StepConditionResult};
