//! Evaluation of one stored matcher against one concrete request.

use super::fields::{Field, FieldVerdict, Verdict};
use crate::models::{CompiledFieldMatchers, CompiledRequestMatcher, RequestDetails};
use crate::state::StateView;

/// The full verdict vector for one matcher/request pairing.
///
/// Fields are always evaluated in [`Field::ALL`] order and never
/// short-circuited across fields: the strategy needs every verdict to score
/// near-misses and to tell a "missed only on headers" pair from an ordinary
/// miss.
#[derive(Debug, Clone)]
pub struct Evaluation {
    verdicts: Vec<FieldVerdict>,
    warnings: Vec<String>,
}

impl Evaluation {
    /// `true` iff every field verdict is a pass.
    pub fn is_match(&self) -> bool {
        self.verdicts.iter().all(|entry| entry.verdict.passed())
    }

    /// The fields whose matchers were present and not satisfied.
    pub fn failed_fields(&self) -> Vec<Field> {
        self.verdicts
            .iter()
            .filter(|entry| entry.verdict == Verdict::Fail)
            .map(|entry| entry.field)
            .collect()
    }

    /// Whether this is a miss whose only failing field is `field`.
    pub fn failed_only_on(&self, field: Field) -> bool {
        let mut failed_any = false;
        for entry in &self.verdicts {
            if entry.verdict == Verdict::Fail {
                if entry.field != field {
                    return false;
                }
                failed_any = true;
            }
        }
        failed_any
    }

    /// Number of constrained fields that passed; this is the near-miss
    /// closeness score.
    pub fn constrained_passes(&self) -> usize {
        self.verdicts
            .iter()
            .filter(|entry| entry.verdict == Verdict::PassConstrained)
            .count()
    }

    pub fn verdicts(&self) -> &[FieldVerdict] {
        &self.verdicts
    }

    /// Degradation warnings from malformed patterns exercised during this
    /// evaluation.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Evaluate `matcher` against `request` and `state`.
///
/// In webserver mode the proxy is acting as an origin, so the destination
/// field carries no information: its matcher is ignored outright and the
/// field reported as unconstrained.
pub fn evaluate(
    matcher: &CompiledRequestMatcher,
    request: &RequestDetails,
    webserver_mode: bool,
    state: &dyn StateView,
) -> Evaluation {
    let mut verdicts = Vec::with_capacity(Field::ALL.len());
    let mut warnings = Vec::new();

    let destination = if webserver_mode {
        FieldVerdict::unconstrained(Field::Destination)
    } else {
        string_field(
            Field::Destination,
            matcher.destination.as_ref(),
            &request.destination,
            &mut warnings,
        )
    };
    verdicts.push(destination);

    verdicts.push(string_field(
        Field::Path,
        matcher.path.as_ref(),
        &request.path,
        &mut warnings,
    ));
    verdicts.push(string_field(
        Field::Method,
        matcher.method.as_ref(),
        &request.method,
        &mut warnings,
    ));
    verdicts.push(string_field(
        Field::Scheme,
        matcher.scheme.as_ref(),
        &request.scheme,
        &mut warnings,
    ));
    verdicts.push(string_field(
        Field::Query,
        matcher.query.as_ref(),
        &request.query_string(),
        &mut warnings,
    ));
    verdicts.push(string_field(
        Field::Body,
        matcher.body.as_ref(),
        &request.body,
        &mut warnings,
    ));
    verdicts.push(headers_field(matcher, request, &mut warnings));
    verdicts.push(state_field(matcher, state));

    Evaluation { verdicts, warnings }
}

fn string_field(
    field: Field,
    matchers: Option<&CompiledFieldMatchers>,
    subject: &str,
    warnings: &mut Vec<String>,
) -> FieldVerdict {
    let Some(matchers) = matchers else {
        return FieldVerdict::unconstrained(field);
    };

    let (matched, mut field_warnings) = matchers.evaluate(subject);
    warnings.append(&mut field_warnings);

    if matched {
        FieldVerdict::passed_constrained(field)
    } else {
        FieldVerdict::failed(
            field,
            format!("request value {subject:?} did not satisfy the matcher"),
        )
    }
}

fn headers_field(
    matcher: &CompiledRequestMatcher,
    request: &RequestDetails,
    warnings: &mut Vec<String>,
) -> FieldVerdict {
    if matcher.headers.is_empty() {
        return FieldVerdict::unconstrained(Field::Headers);
    }

    let mut reasons = Vec::new();
    for header in &matcher.headers {
        let Some(values) = request.header_values(&header.name) else {
            reasons.push(format!("header {:?} is missing", header.name));
            continue;
        };

        for pattern in &header.patterns {
            if let Some(warning) = pattern.warning() {
                warnings.push(warning);
            }
            if !values.iter().any(|value| pattern.matches(value)) {
                reasons.push(format!(
                    "no value of header {:?} matched the declared patterns",
                    header.name
                ));
                break;
            }
        }
    }

    if reasons.is_empty() {
        FieldVerdict::passed_constrained(Field::Headers)
    } else {
        FieldVerdict::failed(Field::Headers, reasons.join("; "))
    }
}

fn state_field(matcher: &CompiledRequestMatcher, state: &dyn StateView) -> FieldVerdict {
    if matcher.requires_state.is_empty() {
        return FieldVerdict::unconstrained(Field::State);
    }

    let mut reasons = Vec::new();
    for (key, required) in &matcher.requires_state {
        match state.value(key) {
            Some(actual) if &actual == required => {}
            Some(actual) => reasons.push(format!(
                "state key {key:?} has value {actual:?}, required {required:?}"
            )),
            None => reasons.push(format!("state key {key:?} is not set")),
        }
    }

    if reasons.is_empty() {
        FieldVerdict::passed_constrained(Field::State)
    } else {
        reasons.sort();
        FieldVerdict::failed(Field::State, reasons.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RequestFieldMatchers, RequestMatcher};
    use std::collections::HashMap;

    fn no_state() -> HashMap<String, String> {
        HashMap::new()
    }

    #[test]
    fn test_empty_matcher_is_unconstrained_everywhere() {
        let matcher = RequestMatcher::default().compile();
        let request = RequestDetails {
            method: "GET".to_string(),
            destination: "somehost.com".to_string(),
            ..RequestDetails::default()
        };

        let evaluation = evaluate(&matcher, &request, false, &no_state());
        assert!(evaluation.is_match());
        assert_eq!(evaluation.constrained_passes(), 0);
        assert!(evaluation
            .verdicts()
            .iter()
            .all(|entry| entry.verdict == Verdict::PassUnconstrained));
    }

    #[test]
    fn test_verdicts_follow_field_order() {
        let matcher = RequestMatcher::default().compile();
        let evaluation = evaluate(&matcher, &RequestDetails::default(), false, &no_state());

        let order: Vec<Field> = evaluation.verdicts().iter().map(|entry| entry.field).collect();
        assert_eq!(order, Field::ALL.to_vec());
    }

    #[test]
    fn test_constrained_fields_are_conjoined() {
        let matcher = RequestMatcher {
            method: Some(RequestFieldMatchers::exact("GET")),
            path: Some(RequestFieldMatchers::exact("/a/1")),
            ..RequestMatcher::default()
        }
        .compile();

        let mut request = RequestDetails {
            method: "GET".to_string(),
            path: "/a/1".to_string(),
            ..RequestDetails::default()
        };
        let evaluation = evaluate(&matcher, &request, false, &no_state());
        assert!(evaluation.is_match());
        assert_eq!(evaluation.constrained_passes(), 2);

        request.method = "POST".to_string();
        let evaluation = evaluate(&matcher, &request, false, &no_state());
        assert!(!evaluation.is_match());
        assert_eq!(evaluation.failed_fields(), vec![Field::Method]);
        assert_eq!(evaluation.constrained_passes(), 1);
    }

    #[test]
    fn test_query_is_matched_against_canonical_form() {
        let matcher = RequestMatcher {
            query: Some(RequestFieldMatchers::exact("q=test")),
            ..RequestMatcher::default()
        }
        .compile();

        let mut request = RequestDetails::default();
        request.query.insert("q".to_string(), vec!["test".to_string()]);
        assert!(evaluate(&matcher, &request, false, &no_state()).is_match());

        // The canonical form carries no leading question mark.
        let prefixed = RequestMatcher {
            query: Some(RequestFieldMatchers::exact("?q=test")),
            ..RequestMatcher::default()
        }
        .compile();
        assert!(!evaluate(&prefixed, &request, false, &no_state()).is_match());
    }

    #[test]
    fn test_header_names_are_case_insensitive_and_values_glob() {
        let mut config = RequestMatcher::default();
        config
            .headers
            .insert("Unique-Header".to_string(), vec!["*".to_string()]);
        let matcher = config.compile();

        let mut request = RequestDetails::default();
        request.headers.insert(
            "unique-header".to_string(),
            vec!["totally-unique".to_string()],
        );
        assert!(evaluate(&matcher, &request, false, &no_state()).is_match());
    }

    #[test]
    fn test_every_header_pattern_must_match_some_value() {
        let mut config = RequestMatcher::default();
        config.headers.insert(
            "header1".to_string(),
            vec!["val1-a".to_string(), "val1-b".to_string()],
        );
        let matcher = config.compile();

        let mut request = RequestDetails::default();
        request.headers.insert(
            "header1".to_string(),
            vec!["val1-a".to_string(), "val1-b".to_string()],
        );
        assert!(evaluate(&matcher, &request, false, &no_state()).is_match());

        request.headers.insert(
            "header1".to_string(),
            vec!["val1-a".to_string(), "val1-different".to_string()],
        );
        let evaluation = evaluate(&matcher, &request, false, &no_state());
        assert_eq!(evaluation.failed_fields(), vec![Field::Headers]);
    }

    #[test]
    fn test_missing_header_fails_the_headers_field() {
        let mut config = RequestMatcher::default();
        config
            .headers
            .insert("header1".to_string(), vec!["val1".to_string()]);
        config
            .headers
            .insert("header2".to_string(), vec!["val2".to_string()]);
        let matcher = config.compile();

        let mut request = RequestDetails::default();
        request
            .headers
            .insert("header1".to_string(), vec!["val1".to_string()]);

        let evaluation = evaluate(&matcher, &request, false, &no_state());
        assert!(evaluation.failed_only_on(Field::Headers));
        let reason = evaluation.verdicts()[6].reason.as_deref().unwrap();
        assert!(reason.contains("header2"));
    }

    #[test]
    fn test_state_requires_every_key_with_exact_value() {
        let mut config = RequestMatcher::default();
        config
            .requires_state
            .insert("key1".to_string(), "value1".to_string());
        config
            .requires_state
            .insert("key2".to_string(), "value2".to_string());
        let matcher = config.compile();

        let mut state = HashMap::new();
        state.insert("key1".to_string(), "value1".to_string());
        state.insert("key2".to_string(), "value2".to_string());
        assert!(evaluate(&matcher, &RequestDetails::default(), false, &state).is_match());

        state.insert("key2".to_string(), "other".to_string());
        let evaluation = evaluate(&matcher, &RequestDetails::default(), false, &state);
        assert!(evaluation.failed_only_on(Field::State));

        state.remove("key2");
        let evaluation = evaluate(&matcher, &RequestDetails::default(), false, &state);
        assert!(evaluation.failed_only_on(Field::State));
    }

    #[test]
    fn test_webserver_mode_ignores_destination() {
        let matcher = RequestMatcher {
            destination: Some(RequestFieldMatchers::exact("stored.com")),
            ..RequestMatcher::default()
        }
        .compile();

        let request = RequestDetails {
            destination: "different.com".to_string(),
            ..RequestDetails::default()
        };

        assert!(!evaluate(&matcher, &request, false, &no_state()).is_match());

        let evaluation = evaluate(&matcher, &request, true, &no_state());
        assert!(evaluation.is_match());
        assert_eq!(evaluation.verdicts()[0].verdict, Verdict::PassUnconstrained);
        assert_eq!(evaluation.constrained_passes(), 0);
    }

    #[test]
    fn test_present_but_empty_matcher_counts_as_constrained() {
        let matcher = RequestMatcher {
            method: Some(RequestFieldMatchers::default()),
            ..RequestMatcher::default()
        }
        .compile();

        let evaluation = evaluate(&matcher, &RequestDetails::default(), false, &no_state());
        assert!(evaluation.is_match());
        assert_eq!(evaluation.constrained_passes(), 1);
    }

    #[test]
    fn test_malformed_pattern_warnings_surface() {
        let matcher = RequestMatcher {
            body: Some(RequestFieldMatchers::regex("(unclosed")),
            ..RequestMatcher::default()
        }
        .compile();

        let evaluation = evaluate(&matcher, &RequestDetails::default(), false, &no_state());
        assert!(!evaluation.is_match());
        assert_eq!(evaluation.warnings().len(), 1);
        assert!(evaluation.warnings()[0].contains("regexMatch"));
    }
}
