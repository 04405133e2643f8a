//! Concrete request record consumed by a lookup.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// An observed HTTP-shaped request.
///
/// All fields are optional in the sense that the empty string / empty mapping
/// is a legal value; the matcher treats them like any other value. The
/// `destination` is opaque to the core (conventionally a host or host:port)
/// and is compared verbatim; normalizing away URL noise such as an
/// `http://` prefix is the transport boundary's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestDetails {
    pub method: String,
    pub scheme: String,
    pub destination: String,
    pub path: String,
    /// Query parameters, ordered by key. Per-key values keep the order they
    /// arrived in.
    pub query: BTreeMap<String, Vec<String>>,
    pub body: String,
    pub headers: HashMap<String, Vec<String>>,
}

impl RequestDetails {
    /// Canonical query form matched against a query field matcher:
    /// `k1=v1&k1=v2&k2=v3`, keys in lexicographic order, per-key values in
    /// insertion order, no leading `?`.
    pub fn query_string(&self) -> String {
        let mut parts = Vec::new();
        for (key, values) in &self.query {
            for value in values {
                parts.push(format!("{key}={value}"));
            }
        }
        parts.join("&")
    }

    /// Header values for `name`, looked up case-insensitively.
    pub(crate) fn header_values(&self, name: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }
}
