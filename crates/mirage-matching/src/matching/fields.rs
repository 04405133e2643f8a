//! Per-field verdicts produced by the evaluator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The request fields a stored matcher can constrain, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Destination,
    Path,
    Method,
    Scheme,
    Query,
    Body,
    Headers,
    State,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::Destination,
        Field::Path,
        Field::Method,
        Field::Scheme,
        Field::Query,
        Field::Body,
        Field::Headers,
        Field::State,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::Destination => "destination",
            Field::Path => "path",
            Field::Method => "method",
            Field::Scheme => "scheme",
            Field::Query => "query",
            Field::Body => "body",
            Field::Headers => "headers",
            Field::State => "state",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of evaluating one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A matcher was present and satisfied.
    PassConstrained,
    /// No matcher was present; the field is ignored.
    PassUnconstrained,
    /// A matcher was present and not satisfied.
    Fail,
}

impl Verdict {
    pub fn passed(self) -> bool {
        self != Verdict::Fail
    }
}

/// One field's verdict, with a reason when it failed.
#[derive(Debug, Clone)]
pub struct FieldVerdict {
    pub field: Field,
    pub verdict: Verdict,
    /// Human-readable failure reason; `None` unless the verdict is `Fail`.
    pub reason: Option<String>,
}

impl FieldVerdict {
    pub(crate) fn passed_constrained(field: Field) -> Self {
        Self {
            field,
            verdict: Verdict::PassConstrained,
            reason: None,
        }
    }

    pub(crate) fn unconstrained(field: Field) -> Self {
        Self {
            field,
            verdict: Verdict::PassUnconstrained,
            reason: None,
        }
    }

    pub(crate) fn failed(field: Field, reason: String) -> Self {
        Self {
            field,
            verdict: Verdict::Fail,
            reason: Some(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order_matches_evaluation_order() {
        assert_eq!(Field::ALL[0], Field::Destination);
        assert_eq!(Field::ALL[7], Field::State);
    }

    #[test]
    fn test_field_serializes_to_camel_case_name() {
        assert_eq!(
            serde_json::to_value(Field::Destination).unwrap(),
            serde_json::json!("destination")
        );
        assert_eq!(Field::Headers.to_string(), "headers");
    }

    #[test]
    fn test_verdict_passed() {
        assert!(Verdict::PassConstrained.passed());
        assert!(Verdict::PassUnconstrained.passed());
        assert!(!Verdict::Fail.passed());
    }
}
