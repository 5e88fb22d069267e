//! ResultCondition - 新しい cycle result を step の結果に含めるかを判定

use crate::domain::{CycleResult, GaffError, RuleFormat};

/// Decides whether a newly generated cycle result joins the current step.
///
/// # Arguments
/// * `result` - the newest candidate
/// * `initial` - the cycle result that began the current step
/// * `sequence` - results of the steps already committed (may be empty)
///
/// # Returns
/// `true` to accept `result`, `false` to discard it and keep searching.
///
/// Implementations are pure: no interior mutability, same answer for the
/// same inputs.
pub trait ResultCondition: Send + Sync {
    fn check(
        &self,
        result: &CycleResult,
        initial: &CycleResult,
        sequence: &[CycleResult],
    ) -> bool;

    fn describe(&self, format: RuleFormat) -> String;

    /// `describe` driven by a format specifier string (`"SL"`, `"G"`, `""`).
    fn format_with(&self, spec: &str) -> Result<String, GaffError> {
        Ok(self.describe(spec.parse()?))
    }
}
