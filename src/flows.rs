//! Orchestrates the strictly sequential exchange-then-fetch workflow.
//!
//! ```text
//! Init -> TokenExchangeInFlight -> { TokenExchangeFailed | TokenObtained }
//!      -> AuthenticatedFetchInFlight -> { FetchFailed | FetchSucceeded }
//! ```
//!
//! Phase B is only entered with a decoded [`TokenResponse`]. An optional overall deadline and
//! an optional cancellation future are threaded through both phases; either one aborts the
//! in-flight call with [`Error::Cancelled`].

// std
use std::pin::pin;
// crates.io
use tokio::time::{Instant, sleep_until};
// self
use crate::{
	_prelude::*,
	config::{Endpoint, FetcherConfig},
	error::Cancellation,
	exchange::{self, TokenExchangeRequest, TokenResponse},
	fetch::{self, ResourceResponse},
	http::Channel,
	obs::{self, Phase, PhaseOutcome, PhaseSpan},
	tls::TlsMaterial,
};

/// Workflow states; every failure state and `FetchSucceeded` are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowState {
	/// Nothing sent yet.
	Init,
	/// Token exchange request outstanding.
	TokenExchangeInFlight,
	/// Token exchange failed; the run stops here.
	TokenExchangeFailed,
	/// A usable token response was decoded.
	TokenObtained,
	/// Bearer-authenticated request outstanding.
	AuthenticatedFetchInFlight,
	/// Resource fetch failed; the run stops here.
	FetchFailed,
	/// Resource body obtained.
	FetchSucceeded,
}
impl FlowState {
	/// Returns a stable label suitable for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowState::Init => "init",
			FlowState::TokenExchangeInFlight => "token_exchange_in_flight",
			FlowState::TokenExchangeFailed => "token_exchange_failed",
			FlowState::TokenObtained => "token_obtained",
			FlowState::AuthenticatedFetchInFlight => "authenticated_fetch_in_flight",
			FlowState::FetchFailed => "fetch_failed",
			FlowState::FetchSucceeded => "fetch_succeeded",
		}
	}

	/// True for states a run ends in.
	pub const fn is_terminal(self) -> bool {
		matches!(
			self,
			FlowState::TokenExchangeFailed | FlowState::FetchFailed | FlowState::FetchSucceeded
		)
	}

	fn enter(self, next: FlowState) -> FlowState {
		debug_assert!(!self.is_terminal(), "no transition leaves a terminal state");

		#[cfg(feature = "tracing")]
		tracing::debug!(from = self.as_str(), to = next.as_str(), "state transition");

		next
	}
}
impl Display for FlowState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Result of a successful run.
#[derive(Clone, Debug)]
pub struct FetchOutcome {
	/// Token returned by the STS.
	pub token: TokenResponse,
	/// Resource server answer obtained with that token.
	pub resource: ResourceResponse,
}

/// Runs the token exchange followed by the authenticated fetch.
///
/// The fetcher owns one channel per target; channels are built from the same
/// [`TlsMaterial`] but never shared, since each verifies its own server name.
#[derive(Clone, Debug)]
pub struct Fetcher {
	sts: Channel,
	resource: Channel,
	request: TokenExchangeRequest,
	deadline: Option<Duration>,
}
impl Fetcher {
	/// Loads TLS material and builds both mutually authenticated channels.
	///
	/// Fails with [`Error::Config`] before any network traffic when a TLS input is missing
	/// or invalid.
	pub fn from_config(config: &FetcherConfig) -> Result<Self> {
		let material = TlsMaterial::load(&config.tls)?;
		let sts = Channel::mutual_tls(config.sts.clone(), &material, config.timeouts)?;
		let resource = Channel::mutual_tls(config.resource.clone(), &material, config.timeouts)?;

		Ok(Self::with_channels(sts, resource, config.exchange_request()).with_deadline(config.deadline))
	}

	/// Creates a fetcher around caller-built channels.
	pub fn with_channels(sts: Channel, resource: Channel, request: TokenExchangeRequest) -> Self {
		Self { sts, resource, request, deadline: None }
	}

	/// Sets or clears the overall deadline spanning both phases.
	pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
		self.deadline = deadline;

		self
	}

	/// STS channel.
	pub fn sts_channel(&self) -> &Channel {
		&self.sts
	}

	/// Resource channel.
	pub fn resource_channel(&self) -> &Channel {
		&self.resource
	}

	/// Runs both phases without an external cancellation signal.
	pub async fn run(&self) -> Result<FetchOutcome> {
		self.run_until(std::future::pending()).await
	}

	/// Runs both phases, aborting the in-flight phase when `cancel` completes.
	pub async fn run_until<F>(&self, cancel: F) -> Result<FetchOutcome>
	where
		F: Future<Output = ()>,
	{
		let mut cancel = pin!(cancel);
		let deadline = self.deadline.map(|limit| Instant::now() + limit);
		let mut state = FlowState::Init.enter(FlowState::TokenExchangeInFlight);

		#[cfg(feature = "tracing")]
		tracing::info!(sts = %self.sts.endpoint(), audience = self.request.audience(), "exchanging token");

		let exchange = exchange::exchange_token(&self.sts, &self.request);
		let token = match run_phase(
			Phase::TokenExchange,
			"exchange_token",
			self.sts.endpoint(),
			deadline,
			cancel.as_mut(),
			exchange,
		)
		.await
		{
			Ok(token) => {
				state = state.enter(FlowState::TokenObtained);

				token
			},
			Err(e) => {
				state.enter(FlowState::TokenExchangeFailed);

				return Err(e);
			},
		};

		state = state.enter(FlowState::AuthenticatedFetchInFlight);

		#[cfg(feature = "tracing")]
		tracing::info!(resource = %self.resource.endpoint(), "fetching resource");

		let fetch = fetch::fetch_resource(&self.resource, &token.access_token);

		match run_phase(
			Phase::ResourceFetch,
			"fetch_resource",
			self.resource.endpoint(),
			deadline,
			cancel.as_mut(),
			fetch,
		)
		.await
		{
			Ok(resource) => {
				state.enter(FlowState::FetchSucceeded);

				Ok(FetchOutcome { token, resource })
			},
			Err(e) => {
				state.enter(FlowState::FetchFailed);

				Err(e)
			},
		}
	}
}

async fn run_phase<T, C, Fut>(
	phase: Phase,
	stage: &'static str,
	endpoint: &Endpoint,
	deadline: Option<Instant>,
	cancel: Pin<&mut C>,
	fut: Fut,
) -> Result<T>
where
	C: Future<Output = ()>,
	Fut: Future<Output = Result<T>>,
{
	let span = PhaseSpan::new(phase, stage, endpoint);
	let started = Instant::now();

	obs::record_phase_outcome(phase, PhaseOutcome::Attempt);

	let expired = async {
		match deadline {
			Some(at) => sleep_until(at).await,
			None => std::future::pending().await,
		}
	};
	let result = span
		.instrument(async move {
			tokio::select! {
				biased;
				result = fut => result,
				_ = cancel => Err(Error::Cancelled { phase, cause: Cancellation::Interrupted }),
				_ = expired => Err(Error::Cancelled { phase, cause: Cancellation::DeadlineExceeded }),
			}
		})
		.await;

	let outcome = if result.is_ok() { PhaseOutcome::Success } else { PhaseOutcome::Failure };

	span.record_outcome(outcome);
	obs::record_phase_outcome(phase, outcome);
	obs::record_phase_duration(phase, outcome, started.elapsed());

	result
}
