//! Observability helpers for the two fetcher phases.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `sts_fetch.phase` carrying the phase,
//!   call site, endpoint, verified server name, and final outcome.
//! - Enable `metrics` to increment the `sts_fetch_phase_total` counter for every
//!   attempt/success/failure, labeled by `phase` + `outcome`, and to record
//!   `sts_fetch_phase_duration_seconds` once a phase settles.
//! - Enable `cli` to install a stderr subscriber via [`install_subscriber`].

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Sequential phases of a fetcher run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
	/// Phase A: RFC 8693 token exchange against the STS.
	TokenExchange,
	/// Phase B: bearer-authenticated GET against the resource server.
	ResourceFetch,
}
impl Phase {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Phase::TokenExchange => "token_exchange",
			Phase::ResourceFetch => "resource_fetch",
		}
	}
}
impl Display for Phase {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(match self {
			Phase::TokenExchange => "Token exchange",
			Phase::ResourceFetch => "Resource fetch",
		})
	}
}

/// Outcome labels recorded for each phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseOutcome {
	/// Entry to a phase.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl PhaseOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PhaseOutcome::Attempt => "attempt",
			PhaseOutcome::Success => "success",
			PhaseOutcome::Failure => "failure",
		}
	}
}
impl Display for PhaseOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Installs the global stderr subscriber used by the binary.
///
/// The filter honors `RUST_LOG` and falls back to `info`. Returns `false` when a global
/// subscriber was already installed.
#[cfg(feature = "cli")]
pub fn install_subscriber(json: bool) -> bool {
	use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let registry = tracing_subscriber::registry().with(filter);

	if json {
		registry.with(fmt::layer().json().with_writer(std::io::stderr)).try_init().is_ok()
	} else {
		registry.with(fmt::layer().with_writer(std::io::stderr)).try_init().is_ok()
	}
}
