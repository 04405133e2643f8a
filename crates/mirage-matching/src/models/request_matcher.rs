//! Stored request matcher and its compiled form.

use super::field_matchers::{CompiledFieldMatchers, CompiledPattern, RequestFieldMatchers};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One stored matcher: an optional sub-predicate per request field, a header
/// block, and the state flags the pair requires.
///
/// An absent field matcher means "do not constrain this field" and is
/// distinct from a present matcher with no pattern kinds; only the former is
/// reported as unconstrained by the evaluator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestMatcher {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<RequestFieldMatchers>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheme: Option<RequestFieldMatchers>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<RequestFieldMatchers>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<RequestFieldMatchers>,

    /// Matched against the request's canonical query string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<RequestFieldMatchers>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestFieldMatchers>,

    /// Header name → value glob patterns. Names are looked up
    /// case-insensitively; every pattern must match some value of the
    /// request's sequence for that name.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, Vec<String>>,

    /// State key → required exact value.
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub requires_state: HashMap<String, String>,
}

impl RequestMatcher {
    pub fn compile(&self) -> CompiledRequestMatcher {
        CompiledRequestMatcher::compile(self)
    }
}

/// One compiled header constraint: the declared name (kept for diagnostics),
/// its lowercase lookup form, and the compiled value globs.
#[derive(Debug, Clone)]
pub(crate) struct CompiledHeaderMatcher {
    pub(crate) name: String,
    pub(crate) patterns: Vec<CompiledPattern>,
}

/// Compiled form of [`RequestMatcher`], built once at catalog-load time.
///
/// Keeps the source record for serialization and for the near-miss report.
#[derive(Debug, Clone)]
pub struct CompiledRequestMatcher {
    source: RequestMatcher,
    pub(crate) method: Option<CompiledFieldMatchers>,
    pub(crate) scheme: Option<CompiledFieldMatchers>,
    pub(crate) destination: Option<CompiledFieldMatchers>,
    pub(crate) path: Option<CompiledFieldMatchers>,
    pub(crate) query: Option<CompiledFieldMatchers>,
    pub(crate) body: Option<CompiledFieldMatchers>,
    pub(crate) headers: Vec<CompiledHeaderMatcher>,
    pub(crate) requires_state: HashMap<String, String>,
}

impl CompiledRequestMatcher {
    pub fn compile(config: &RequestMatcher) -> Self {
        let field = |matchers: &Option<RequestFieldMatchers>| {
            matchers.as_ref().map(CompiledFieldMatchers::compile)
        };

        let mut headers: Vec<CompiledHeaderMatcher> = config
            .headers
            .iter()
            .map(|(name, patterns)| CompiledHeaderMatcher {
                name: name.clone(),
                patterns: patterns
                    .iter()
                    .map(|pattern| CompiledPattern::compile_glob(pattern))
                    .collect(),
            })
            .collect();
        // Deterministic evaluation order regardless of map iteration order.
        headers.sort_by(|a, b| a.name.cmp(&b.name));

        Self {
            source: config.clone(),
            method: field(&config.method),
            scheme: field(&config.scheme),
            destination: field(&config.destination),
            path: field(&config.path),
            query: field(&config.query),
            body: field(&config.body),
            headers,
            requires_state: config.requires_state.clone(),
        }
    }

    /// The configuration this matcher was compiled from.
    pub fn source(&self) -> &RequestMatcher {
        &self.source
    }

    /// Whether the matcher constrains the request's headers. Constraining
    /// headers makes a winning pair unsafe to memoize under a fingerprint
    /// that excludes them.
    pub fn constrains_headers(&self) -> bool {
        !self.headers.is_empty()
    }

    /// Whether the matcher requires state flags; same cacheability caveat as
    /// [`Self::constrains_headers`].
    pub fn constrains_state(&self) -> bool {
        !self.requires_state.is_empty()
    }
}
