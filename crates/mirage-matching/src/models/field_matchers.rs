//! Per-field pattern product and its compiled form.

use crate::matchers::{glob, json, xml};
use globset::GlobMatcher;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// The sub-predicate stored for one request field.
///
/// Any subset of the pattern kinds may be populated; populated kinds are
/// conjoined, so a matcher carrying both `globMatch` and `regexMatch` only
/// passes when the subject satisfies both. A matcher with no kind populated
/// is still a *constrained* field (it passes trivially); the unconstrained
/// case is an absent matcher on [`super::RequestMatcher`], and that
/// distinction survives a serde round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestFieldMatchers {
    /// Byte-for-byte equality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_match: Option<String>,

    /// Shell-style glob, anchored at both ends, case-insensitive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glob_match: Option<String>,

    /// Regular expression; the full subject must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex_match: Option<String>,

    /// Canonical XML equality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xml_match: Option<String>,

    /// XPath expression that must select at least one node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xpath_match: Option<String>,

    /// Canonical JSON equality.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_match: Option<String>,

    /// JSONPath expression that must select at least one node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_path_match: Option<String>,
}

impl RequestFieldMatchers {
    /// Shorthand for a single exact-match constraint.
    pub fn exact(value: impl Into<String>) -> Self {
        Self {
            exact_match: Some(value.into()),
            ..Self::default()
        }
    }

    /// Shorthand for a single glob constraint.
    pub fn glob(pattern: impl Into<String>) -> Self {
        Self {
            glob_match: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// Shorthand for a single regex constraint.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            regex_match: Some(pattern.into()),
            ..Self::default()
        }
    }

    /// True when no pattern kind is populated.
    pub fn is_empty(&self) -> bool {
        self.exact_match.is_none()
            && self.glob_match.is_none()
            && self.regex_match.is_none()
            && self.xml_match.is_none()
            && self.xpath_match.is_none()
            && self.json_match.is_none()
            && self.json_path_match.is_none()
    }
}

/// Pattern kinds, used to label degradation warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PatternKind {
    Glob,
    Regex,
    XPath,
    JsonPath,
}

impl PatternKind {
    fn name(self) -> &'static str {
        match self {
            PatternKind::Glob => "globMatch",
            PatternKind::Regex => "regexMatch",
            PatternKind::XPath => "xpathMatch",
            PatternKind::JsonPath => "jsonPathMatch",
        }
    }
}

/// One compiled pattern kind.
///
/// Regex and glob automata are pre-built; XPath and JSONPath expressions are
/// validated here and evaluated from source text per lookup, which keeps the
/// compiled matcher `Send + Sync` without caching evaluator state. A pattern
/// that fails to compile degrades to [`CompiledPattern::Invalid`]: it never
/// matches and surfaces a warning each time it is exercised, but it cannot
/// poison the rest of the lookup.
#[derive(Debug, Clone)]
pub(crate) enum CompiledPattern {
    Exact(String),
    Glob(GlobMatcher),
    Regex(Regex),
    /// Canonical form of the XML pattern; `None` when the pattern itself is
    /// not well-formed, which never matches.
    Xml(Option<String>),
    XPath(String),
    /// Parsed JSON pattern; `None` when the pattern itself is not
    /// well-formed, which never matches.
    Json(Option<Value>),
    JsonPath(String),
    Invalid {
        kind: PatternKind,
        detail: String,
    },
}

impl CompiledPattern {
    pub(crate) fn matches(&self, subject: &str) -> bool {
        match self {
            CompiledPattern::Exact(value) => subject == value,
            CompiledPattern::Glob(matcher) => matcher.is_match(subject),
            CompiledPattern::Regex(regex) => regex.is_match(subject),
            CompiledPattern::Xml(Some(canonical)) => {
                xml::canonical(subject).as_deref() == Some(canonical.as_str())
            }
            CompiledPattern::Xml(None) => false,
            CompiledPattern::XPath(expression) => xml::select(subject, expression),
            CompiledPattern::Json(Some(pattern)) => json::canonical_eq(pattern, subject),
            CompiledPattern::Json(None) => false,
            CompiledPattern::JsonPath(expression) => json::select(subject, expression),
            CompiledPattern::Invalid { .. } => false,
        }
    }

    /// Degradation warning, present only for patterns that failed to compile.
    pub(crate) fn warning(&self) -> Option<String> {
        match self {
            CompiledPattern::Invalid { kind, detail } => {
                Some(format!("{} pattern is invalid: {detail}", kind.name()))
            }
            _ => None,
        }
    }

    pub(crate) fn compile_glob(pattern: &str) -> Self {
        match glob::compile(pattern) {
            Ok(matcher) => CompiledPattern::Glob(matcher),
            Err(err) => invalid(PatternKind::Glob, pattern, err.to_string()),
        }
    }

    fn compile_regex(pattern: &str) -> Self {
        // Anchor the pattern so partial matches do not count.
        match Regex::new(&format!(r"\A(?:{pattern})\z")) {
            Ok(regex) => CompiledPattern::Regex(regex),
            Err(err) => invalid(PatternKind::Regex, pattern, err.to_string()),
        }
    }

    fn compile_xpath(expression: &str) -> Self {
        match xml::validate_xpath(expression) {
            Ok(()) => CompiledPattern::XPath(expression.to_string()),
            Err(err) => invalid(PatternKind::XPath, expression, err),
        }
    }

    fn compile_json_path(expression: &str) -> Self {
        match json::validate_path(expression) {
            Ok(()) => CompiledPattern::JsonPath(expression.to_string()),
            Err(err) => invalid(PatternKind::JsonPath, expression, err),
        }
    }
}

fn invalid(kind: PatternKind, pattern: &str, detail: String) -> CompiledPattern {
    warn!(
        kind = kind.name(),
        pattern, %detail,
        "pattern failed to compile; matcher degrades to never-matching"
    );
    CompiledPattern::Invalid { kind, detail }
}

/// Compiled form of [`RequestFieldMatchers`]: every populated kind, in the
/// declaration order of the record.
#[derive(Debug, Clone, Default)]
pub struct CompiledFieldMatchers {
    patterns: Vec<CompiledPattern>,
}

impl CompiledFieldMatchers {
    /// Compile every populated pattern kind. Compilation cannot fail:
    /// malformed patterns degrade to never-matching entries that report a
    /// warning when exercised.
    pub fn compile(config: &RequestFieldMatchers) -> Self {
        let mut patterns = Vec::new();
        if let Some(value) = &config.exact_match {
            patterns.push(CompiledPattern::Exact(value.clone()));
        }
        if let Some(pattern) = &config.glob_match {
            patterns.push(CompiledPattern::compile_glob(pattern));
        }
        if let Some(pattern) = &config.regex_match {
            patterns.push(CompiledPattern::compile_regex(pattern));
        }
        if let Some(pattern) = &config.xml_match {
            patterns.push(CompiledPattern::Xml(xml::canonical(pattern)));
        }
        if let Some(expression) = &config.xpath_match {
            patterns.push(CompiledPattern::compile_xpath(expression));
        }
        if let Some(pattern) = &config.json_match {
            patterns.push(CompiledPattern::Json(json::parse(pattern)));
        }
        if let Some(expression) = &config.json_path_match {
            patterns.push(CompiledPattern::compile_json_path(expression));
        }
        Self { patterns }
    }

    /// Evaluate the conjunction of populated kinds against `subject`.
    ///
    /// Short-circuits on the first failing kind; warnings are reported only
    /// for degraded patterns that were actually exercised. A matcher with no
    /// populated kind passes trivially.
    pub(crate) fn evaluate(&self, subject: &str) -> (bool, Vec<String>) {
        let mut warnings = Vec::new();
        for pattern in &self.patterns {
            if let Some(warning) = pattern.warning() {
                warnings.push(warning);
            }
            if !pattern.matches(subject) {
                return (false, warnings);
            }
        }
        (true, warnings)
    }
}
