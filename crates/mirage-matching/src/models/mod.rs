//! Data model for the matching core.
//!
//! Configuration types (`RequestFieldMatchers`, `RequestMatcher`) are the
//! serde-facing records collaborators load from simulation files; each has a
//! compiled counterpart built once at catalog-load time and immutable
//! thereafter. `RequestDetails` and `ResponseDetails` are the concrete
//! request/response records a lookup consumes and produces.

mod field_matchers;
mod pair;
mod request;
mod request_matcher;
mod simulation;

pub use field_matchers::{CompiledFieldMatchers, RequestFieldMatchers};
pub use pair::{Pair, ResponseDetails};
pub use request::RequestDetails;
pub use request_matcher::{CompiledRequestMatcher, RequestMatcher};
pub use simulation::Simulation;
