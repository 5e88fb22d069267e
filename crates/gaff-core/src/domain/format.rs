//! Display formats for rule descriptions (editor / log output only).

use std::str::FromStr;

use super::errors::GaffError;

/// How a rule describes its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RuleFormat {
    /// Human-readable prose, e.g. "win amount at least 10".
    #[default]
    Prose,

    /// Script line `kind {json params}`, parseable back into a `RuleConfig`.
    ScriptLine,
}

impl FromStr for RuleFormat {
    type Err = GaffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "G" => Ok(RuleFormat::Prose),
            "SL" => Ok(RuleFormat::ScriptLine),
            other => Err(GaffError::UnknownFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::empty("", RuleFormat::Prose)]
    #[case::general("G", RuleFormat::Prose)]
    #[case::script_line("SL", RuleFormat::ScriptLine)]
    fn known_specifiers_parse(#[case] spec: &str, #[case] expected: RuleFormat) {
        assert_eq!(spec.parse::<RuleFormat>().unwrap(), expected);
    }

    #[test]
    fn unknown_specifier_is_rejected() {
        let err = "XML".parse::<RuleFormat>().unwrap_err();
        assert!(matches!(err, GaffError::UnknownFormat(s) if s == "XML"));
    }
}
