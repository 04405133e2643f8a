//! The result envelope returned by a lookup.

use super::evaluator::Evaluation;
use super::fields::Field;
use crate::error::MatchError;
use crate::models::{Pair, RequestDetails, RequestMatcher, ResponseDetails};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Per-field entry of the near-miss diff report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDiff {
    pub field: Field,
    pub matched: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// The stored matcher that came closest to matching a failed lookup.
///
/// Diagnostic only: echoes the concrete request, the closest matcher, the
/// response it would have produced, and a per-field diff. Safe to log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosestMiss {
    pub request: RequestDetails,
    pub request_matcher: RequestMatcher,
    pub response: ResponseDetails,
    pub missed_fields: Vec<Field>,
    pub field_report: Vec<FieldDiff>,
    /// Count of constrained fields the matcher did satisfy.
    matched_field_count: usize,
}

impl ClosestMiss {
    pub(crate) fn new(request: &RequestDetails, pair: &Pair, evaluation: &Evaluation) -> Self {
        let field_report = evaluation
            .verdicts()
            .iter()
            .map(|entry| FieldDiff {
                field: entry.field,
                matched: entry.verdict.passed(),
                reason: entry.reason.clone(),
            })
            .collect();

        Self {
            request: request.clone(),
            request_matcher: pair.request_matcher().clone(),
            response: pair.response().clone(),
            missed_fields: evaluation.failed_fields(),
            field_report,
            matched_field_count: evaluation.constrained_passes(),
        }
    }

    /// Count of constrained fields the closest matcher did satisfy.
    pub fn matched_fields(&self) -> usize {
        self.matched_field_count
    }
}

fn pretty<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "<unrenderable>".to_string())
}

impl fmt::Display for ClosestMiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "The following request was made, but no pair in the simulation matched it:"
        )?;
        writeln!(f, "\n{}\n", pretty(&self.request))?;
        writeln!(f, "The matcher which came closest was:")?;
        writeln!(f, "\n{}\n", pretty(&self.request_matcher))?;
        write!(f, "But it did not match on the following fields: [")?;
        for (index, field) in self.missed_fields.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{field}")?;
        }
        writeln!(f, "]")?;
        for diff in &self.field_report {
            if let Some(reason) = &diff.reason {
                writeln!(f, "  {}: {reason}", diff.field)?;
            }
        }
        writeln!(f, "\nHad it matched, the response would have been:")?;
        write!(f, "\n{}", pretty(&self.response))
    }
}

/// Outcome of one lookup.
#[derive(Debug)]
pub struct MatchResult {
    /// The winning pair, or `None` on a miss.
    pub pair: Option<Arc<Pair>>,
    /// Populated exactly when `pair` is absent.
    pub error: Option<MatchError>,
    /// Whether the caller may memoize this outcome under a request
    /// fingerprint that excludes headers and state.
    pub cachable: bool,
    /// The best near-miss observed during a failed lookup, when one exists.
    pub closest_miss: Option<ClosestMiss>,
    /// Degradation warnings from malformed patterns exercised during the
    /// lookup.
    pub warnings: Vec<String>,
}

impl MatchResult {
    pub(crate) fn matched(pair: Arc<Pair>, cachable: bool, warnings: Vec<String>) -> Self {
        Self {
            pair: Some(pair),
            error: None,
            cachable,
            closest_miss: None,
            warnings,
        }
    }

    pub(crate) fn missed(
        closest_miss: Option<ClosestMiss>,
        cachable: bool,
        warnings: Vec<String>,
    ) -> Self {
        let error = match &closest_miss {
            Some(miss) => MatchError::NoMatch(Box::new(miss.clone())),
            None => MatchError::EmptySimulation,
        };
        Self {
            pair: None,
            error: Some(error),
            cachable,
            closest_miss,
            warnings,
        }
    }

    pub fn is_match(&self) -> bool {
        self.pair.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::evaluate;
    use crate::models::{RequestFieldMatchers, RequestMatcher};
    use std::collections::HashMap;

    fn near_miss() -> ClosestMiss {
        let pair = Pair::new(
            RequestMatcher {
                method: Some(RequestFieldMatchers::exact("POST")),
                path: Some(RequestFieldMatchers::exact("/a/1")),
                ..RequestMatcher::default()
            },
            ResponseDetails::with_body("request matched"),
        );
        let request = RequestDetails {
            method: "GET".to_string(),
            path: "/a/1".to_string(),
            ..RequestDetails::default()
        };
        let evaluation = evaluate(
            pair.matcher(),
            &request,
            false,
            &HashMap::<String, String>::new(),
        );
        ClosestMiss::new(&request, &pair, &evaluation)
    }

    #[test]
    fn test_closest_miss_reports_missed_fields_and_score() {
        let miss = near_miss();
        assert_eq!(miss.missed_fields, vec![Field::Method]);
        assert_eq!(miss.matched_fields(), 1);
    }

    #[test]
    fn test_closest_miss_rendering_is_loggable() {
        let rendered = near_miss().to_string();
        assert!(rendered.contains("came closest"));
        assert!(rendered.contains("method"));
        assert!(rendered.contains("request matched"));
    }

    #[test]
    fn test_missed_result_without_closest_miss_reports_empty_simulation() {
        let result = MatchResult::missed(None, true, Vec::new());
        assert!(!result.is_match());
        assert!(matches!(result.error, Some(MatchError::EmptySimulation)));
    }
}
