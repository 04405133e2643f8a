//! Matcher/response pairs stored in the catalog.

use super::request_matcher::{CompiledRequestMatcher, RequestMatcher};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_status() -> u16 {
    200
}

/// The pre-recorded response surfaced when a pair matches. Opaque to the
/// matcher itself; carried so the catalog, serialization, and the near-miss
/// report have something concrete to echo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseDetails {
    pub status: u16,
    pub body: String,
    pub headers: HashMap<String, Vec<String>>,
}

impl Default for ResponseDetails {
    fn default() -> Self {
        Self {
            status: default_status(),
            body: String::new(),
            headers: HashMap::new(),
        }
    }
}

impl ResponseDetails {
    /// Shorthand for a 200 response with the given body.
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }
}

/// One stored `(matcher, response)` pair. The matcher is compiled on
/// construction and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "PairView", into = "PairView")]
pub struct Pair {
    matcher: CompiledRequestMatcher,
    response: ResponseDetails,
}

impl Pair {
    pub fn new(matcher: RequestMatcher, response: ResponseDetails) -> Self {
        Self {
            matcher: matcher.compile(),
            response,
        }
    }

    pub fn matcher(&self) -> &CompiledRequestMatcher {
        &self.matcher
    }

    /// The matcher configuration this pair was built from.
    pub fn request_matcher(&self) -> &RequestMatcher {
        self.matcher.source()
    }

    pub fn response(&self) -> &ResponseDetails {
        &self.response
    }
}

/// Wire view of a pair: the raw matcher record plus the response, in the
/// camelCase shape simulation import/export collaborators speak.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PairView {
    request_matcher: RequestMatcher,
    response: ResponseDetails,
}

impl From<PairView> for Pair {
    fn from(view: PairView) -> Self {
        Pair::new(view.request_matcher, view.response)
    }
}

impl From<Pair> for PairView {
    fn from(pair: Pair) -> Self {
        PairView {
            request_matcher: pair.matcher.source().clone(),
            response: pair.response,
        }
    }
}
