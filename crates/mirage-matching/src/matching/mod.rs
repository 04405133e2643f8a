//! Request-matcher evaluation and the first-match strategy.

mod evaluator;
mod fields;
mod first_match;
mod result;

pub use evaluator::{evaluate, Evaluation};
pub use fields::{Field, FieldVerdict, Verdict};
pub use first_match::first_match;
pub use result::{ClosestMiss, FieldDiff, MatchResult};
