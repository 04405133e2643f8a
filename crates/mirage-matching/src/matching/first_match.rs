//! First-match strategy: the earliest fully-matching pair wins.

use super::evaluator::evaluate;
use super::fields::Field;
use super::result::{ClosestMiss, MatchResult};
use crate::models::{Pair, RequestDetails, Simulation};
use crate::state::StateView;
use std::sync::Arc;
use tracing::debug;

/// Walk the simulation in insertion order and return the first pair whose
/// matcher fully matches `request`.
///
/// On a miss the result carries the closest near-miss (the evaluated matcher
/// with the most satisfied constrained fields; ties keep the earlier pair)
/// and its cacheability verdict: a miss must not be memoized when any pair
/// failed solely on headers or solely on state, because a later request with
/// the same fingerprint could legitimately hit that pair. A match must not
/// be memoized when the winner itself constrains headers or state.
///
/// `webserver_mode` marks the proxy as acting as an origin, where the
/// request's destination carries no information and destination matchers
/// are ignored.
pub fn first_match(
    request: &RequestDetails,
    webserver_mode: bool,
    simulation: &Simulation,
    state: &dyn StateView,
) -> MatchResult {
    let pairs = simulation.snapshot();
    if pairs.is_empty() {
        debug!("lookup against empty simulation");
        return MatchResult::missed(None, true, Vec::new());
    }

    let mut best: Option<(usize, &Arc<Pair>, super::Evaluation)> = None;
    let mut missed_only_on_headers = 0usize;
    let mut missed_only_on_state = 0usize;
    let mut warnings = Vec::new();

    for (index, pair) in pairs.iter().enumerate() {
        let evaluation = evaluate(pair.matcher(), request, webserver_mode, state);
        warnings.extend_from_slice(evaluation.warnings());

        if evaluation.is_match() {
            let cachable =
                !pair.matcher().constrains_headers() && !pair.matcher().constrains_state();
            debug!(pair = index, cachable, "request matched");
            return MatchResult::matched(Arc::clone(pair), cachable, warnings);
        }

        if evaluation.failed_only_on(Field::Headers) {
            missed_only_on_headers += 1;
        }
        if evaluation.failed_only_on(Field::State) {
            missed_only_on_state += 1;
        }

        let score = evaluation.constrained_passes();
        if best
            .as_ref()
            .map_or(true, |(best_score, _, _)| score > *best_score)
        {
            best = Some((score, pair, evaluation));
        }
    }

    let cachable = missed_only_on_headers == 0 && missed_only_on_state == 0;
    debug!(
        pairs = pairs.len(),
        missed_only_on_headers, missed_only_on_state, cachable, "no pair matched"
    );
    let closest_miss =
        best.map(|(_, pair, evaluation)| ClosestMiss::new(request, pair.as_ref(), &evaluation));
    MatchResult::missed(closest_miss, cachable, warnings)
}
