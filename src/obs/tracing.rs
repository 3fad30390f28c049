// self
use crate::{
	_prelude::*,
	config::Endpoint,
	obs::{Phase, PhaseOutcome},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedPhase<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedPhase<F> = F;

/// Span covering one phase against one endpoint.
///
/// Fields: `phase`, `stage`, `endpoint` (configured URL), `server_name` (name verified on
/// the peer certificate), and `outcome`, which stays empty until
/// [`record_outcome`](Self::record_outcome) is called.
#[derive(Clone, Debug)]
pub struct PhaseSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl PhaseSpan {
	/// Opens the span for `phase` talking to `endpoint`.
	pub fn new(phase: Phase, stage: &'static str, endpoint: &Endpoint) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"sts_fetch.phase",
				phase = phase.as_str(),
				stage,
				endpoint = %endpoint.url(),
				server_name = endpoint.server_name(),
				outcome = tracing::field::Empty
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (phase, stage, endpoint);

			Self {}
		}
	}

	/// Fills the `outcome` field once the phase has settled.
	pub fn record_outcome(&self, outcome: PhaseOutcome) {
		#[cfg(feature = "tracing")]
		self.span.record("outcome", outcome.as_str());
		#[cfg(not(feature = "tracing"))]
		let _ = outcome;
	}

	/// Runs `fut` inside the span; no guard is held across `.await`.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedPhase<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}
