// self
use crate::{
	_prelude::*,
	obs::{Phase, PhaseOutcome},
};

/// Increments `sts_fetch_phase_total{phase, outcome}` (when enabled).
pub fn record_phase_outcome(phase: Phase, outcome: PhaseOutcome) {
	#[cfg(feature = "metrics")]
	metrics::counter!(
		"sts_fetch_phase_total",
		"phase" => phase.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);

	#[cfg(not(feature = "metrics"))]
	let _ = (phase, outcome);
}

/// Records how long a settled phase took in `sts_fetch_phase_duration_seconds{phase, outcome}`.
///
/// Cancelled phases are recorded with the time spent until the abort.
pub fn record_phase_duration(phase: Phase, outcome: PhaseOutcome, elapsed: Duration) {
	#[cfg(feature = "metrics")]
	metrics::histogram!(
		"sts_fetch_phase_duration_seconds",
		"phase" => phase.as_str(),
		"outcome" => outcome.as_str()
	)
	.record(elapsed.as_secs_f64());

	#[cfg(not(feature = "metrics"))]
	let _ = (phase, outcome, elapsed);
}
