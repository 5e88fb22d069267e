//! ConfigurableRule - rule kind と設定型の対応付け
//!
//! # 使用例
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct WinAmount {
//!     min: u64,
//! }
//!
//! impl ConfigurableRule for WinAmount {
//!     const KIND: &'static str = "win_amount";
//!     fn prose(&self) -> String { format!("win amount at least {}", self.min) }
//! }
//! ```

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{GaffError, RuleFormat};

/// A rule whose configuration is its own serde representation.
///
/// # Trait Bounds
/// - `DeserializeOwned`: `RuleConfig::params` から組み立てるため
/// - `Serialize`: "SL" 形式で設定をそのまま書き出すため
/// - `Send + Sync + 'static`: `Arc` に入れて attempt 間・スレッド間で共有するため
pub trait ConfigurableRule: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Registry key, e.g. `symbol_count`.
    const KIND: &'static str;

    /// Reject parameter combinations the rule cannot evaluate.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    fn prose(&self) -> String;

    /// Build from `RuleConfig::params`; `null` params mean "all defaults".
    fn from_params(params: &serde_json::Value) -> Result<Self, GaffError> {
        let params = if params.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            params.clone()
        };
        let rule: Self = serde_json::from_value(params)
            .map_err(|e| GaffError::invalid_rule(Self::KIND, e.to_string()))?;
        rule.validate()
            .map_err(|msg| GaffError::invalid_rule(Self::KIND, msg))?;
        Ok(rule)
    }
}

/// Shared `describe` implementation for configurable rules.
pub fn describe_rule<R: ConfigurableRule>(rule: &R, format: RuleFormat) -> String {
    match format {
        RuleFormat::Prose => rule.prose(),
        RuleFormat::ScriptLine => {
            let params = serde_json::to_string(rule).unwrap_or_else(|_| "{}".to_string());
            format!("{} {}", R::KIND, params)
        }
    }
}
