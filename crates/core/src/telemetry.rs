//! Metric names and recorders for the resolver.
//!
//! Counters are no-ops unless the host installs a `metrics` recorder. Label
//! values come from fixed enums only.

use crate::dispatch::Outcome;

/// Tokens fed, by outcome and abort reason.
pub const METRIC_FEED_OUTCOMES: &str = "keychord_feed_outcomes_total";

/// Dispatches delivered to actions.
pub const METRIC_DISPATCHES: &str = "keychord_dispatches_total";

/// Active-context changes.
pub const METRIC_CONTEXT_SWITCHES: &str = "keychord_context_switches_total";

pub(crate) fn record_outcome(outcome: &Outcome) {
    let reason = match outcome {
        Outcome::Aborted(reason) => reason.as_str(),
        _ => "none",
    };
    metrics::counter!(
        METRIC_FEED_OUTCOMES,
        "outcome" => outcome.label(),
        "reason" => reason,
    )
    .increment(1);

    if matches!(outcome, Outcome::Dispatched(_)) {
        metrics::counter!(METRIC_DISPATCHES).increment(1);
    }
}

pub(crate) fn record_context_switch() {
    metrics::counter!(METRIC_CONTEXT_SWITCHES).increment(1);
}
