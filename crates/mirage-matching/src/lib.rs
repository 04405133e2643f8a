//! Request matching core for the Mirage service-virtualization proxy.
//!
//! Given an observed HTTP-shaped request, the core selects a pre-recorded
//! response pair from a [`Simulation`] catalog, reports how close the best
//! near-miss came when nothing matched, and decides whether the outcome is
//! safe to memoize under a request fingerprint that excludes headers and
//! state.
//!
//! The surrounding proxy (transport, persistence, admin API, response
//! transformation) lives elsewhere; this crate is a pure, synchronous
//! library surface. A lookup reads the catalog and the caller's state
//! mapping, mutates neither, and returns a fresh [`MatchResult`].
//!
//! ```
//! use mirage_matching::{
//!     first_match, Pair, RequestDetails, RequestFieldMatchers, RequestMatcher, ResponseDetails,
//!     Simulation,
//! };
//! use std::collections::HashMap;
//!
//! let simulation = Simulation::new();
//! simulation.add_pair(Pair::new(
//!     RequestMatcher {
//!         destination: Some(RequestFieldMatchers::glob("*.example.com")),
//!         ..RequestMatcher::default()
//!     },
//!     ResponseDetails::with_body("recorded"),
//! ));
//!
//! let request = RequestDetails {
//!     method: "GET".to_string(),
//!     destination: "api.example.com".to_string(),
//!     ..RequestDetails::default()
//! };
//!
//! let state: HashMap<String, String> = HashMap::new();
//! let result = first_match(&request, false, &simulation, &state);
//! assert_eq!(result.pair.unwrap().response().body, "recorded");
//! assert!(result.cachable);
//! ```

pub mod error;
mod matchers;
pub mod matching;
pub mod models;
pub mod state;

pub use error::MatchError;
pub use matching::{
    evaluate, first_match, ClosestMiss, Evaluation, Field, FieldDiff, FieldVerdict, MatchResult,
    Verdict,
};
pub use models::{
    CompiledFieldMatchers, CompiledRequestMatcher, Pair, RequestDetails, RequestFieldMatchers,
    RequestMatcher, ResponseDetails, Simulation,
};
pub use state::{InMemoryState, StateView};
