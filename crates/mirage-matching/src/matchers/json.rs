//! JSON equality and JSONPath selection.

use jsonpath_rust::JsonPath;
use serde_json::Value;

/// Parse a JSON pattern. Returns `None` when the pattern itself is not
/// well-formed JSON, in which case the matcher can never succeed.
pub(crate) fn parse(pattern: &str) -> Option<Value> {
    serde_json::from_str(pattern).ok()
}

/// Canonical JSON equality: parse the subject and compare trees. Object key
/// order and insignificant whitespace do not affect the outcome. A subject
/// that fails to parse does not match.
pub(crate) fn canonical_eq(pattern: &Value, subject: &str) -> bool {
    match serde_json::from_str::<Value>(subject) {
        Ok(parsed) => &parsed == pattern,
        Err(_) => false,
    }
}

/// Validate a JSONPath expression without evaluating it.
pub(crate) fn validate_path(expression: &str) -> Result<(), String> {
    let parsed: Result<JsonPath, _> = JsonPath::try_from(expression);
    parsed.map(|_| ()).map_err(|err| err.to_string())
}

/// Evaluate a JSONPath expression against a JSON subject. True iff the
/// expression selects at least one node; parse or evaluation failure on
/// either side is a plain no-match.
pub(crate) fn select(subject: &str, expression: &str) -> bool {
    let json: Value = match serde_json::from_str(subject) {
        Ok(json) => json,
        Err(_) => return false,
    };
    let path: JsonPath = match JsonPath::try_from(expression) {
        Ok(path) => path,
        Err(_) => return false,
    };
    match path.find(&json) {
        Value::Null => false,
        Value::Array(found) => !found.is_empty(),
        _ => true,
    }
}
