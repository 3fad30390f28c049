//! Fetcher error types and their process exit codes.

// std
use std::path::PathBuf;
// self
use crate::{_prelude::*, obs::Phase};

/// Fetcher-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical fetcher error exposed by public APIs.
///
/// Every variant is terminal for the run; nothing is retried.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem detected before any network call.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// TLS handshake or transport failure on either channel.
	#[error("{phase} failed: could not reach {endpoint}.")]
	Connection {
		/// Phase that owned the failing channel.
		phase: Phase,
		/// Endpoint URL that was being called.
		endpoint: String,
		/// Underlying transport failure.
		#[source]
		source: ReqwestError,
	},
	/// STS answered with a status other than 200.
	#[error("STS rejected the token exchange with HTTP {status}: {body}")]
	ExchangeRejected {
		/// HTTP status returned by the STS.
		status: u16,
		/// Raw response body, kept for diagnostics.
		body: String,
	},
	/// STS answered 200 with a body that is not a usable token response.
	#[error(transparent)]
	MalformedResponse(#[from] ResponseError),
	/// Resource response body could not be read.
	#[error("Resource fetch failed while reading the response body.")]
	Fetch {
		/// Underlying transport failure.
		#[source]
		source: ReqwestError,
	},
	/// Resource server answered with a non-2xx status.
	#[error("Resource server rejected the request with HTTP {status}: {body}")]
	ResourceRejected {
		/// HTTP status returned by the resource server.
		status: u16,
		/// Raw response body, kept for diagnostics.
		body: String,
	},
	/// The run was aborted while a phase was in flight.
	#[error("{phase} was cancelled: {cause}.")]
	Cancelled {
		/// Phase that was in flight.
		phase: Phase,
		/// Why the run was aborted.
		cause: Cancellation,
	},
}
impl Error {
	/// Exit code reported by the binary for this error kind.
	pub fn exit_code(&self) -> u8 {
		match self {
			Error::Config(_) => 3,
			Error::Connection { .. } => 4,
			Error::ExchangeRejected { .. } => 5,
			Error::MalformedResponse(_) => 6,
			Error::Fetch { .. } => 7,
			Error::ResourceRejected { .. } => 8,
			Error::Cancelled { .. } => 9,
		}
	}

	/// Phase the error belongs to; `None` for configuration failures.
	pub fn phase(&self) -> Option<Phase> {
		match self {
			Error::Config(_) => None,
			Error::Connection { phase, .. } | Error::Cancelled { phase, .. } => Some(*phase),
			Error::ExchangeRejected { .. } | Error::MalformedResponse(_) =>
				Some(Phase::TokenExchange),
			Error::Fetch { .. } | Error::ResourceRejected { .. } => Some(Phase::ResourceFetch),
		}
	}
}

/// Reasons an in-flight phase can be aborted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cancellation {
	/// The configured overall deadline elapsed.
	DeadlineExceeded,
	/// The caller's cancellation signal fired (e.g. Ctrl-C).
	Interrupted,
}
impl Display for Cancellation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(match self {
			Cancellation::DeadlineExceeded => "deadline exceeded",
			Cancellation::Interrupted => "interrupted",
		})
	}
}

/// Configuration and validation failures raised before any request is sent.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A TLS input file could not be read.
	#[error("Unable to read {what} from {}.", path.display())]
	ReadFile {
		/// Human label of the file (CA bundle, client certificate, client key).
		what: &'static str,
		/// Path that was read.
		path: PathBuf,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// A PEM file does not contain the expected block.
	#[error("{what} at {} contains no {label} PEM block.", path.display())]
	MissingPemBlock {
		/// Human label of the file.
		what: &'static str,
		/// Path that was read.
		path: PathBuf,
		/// Expected PEM label.
		label: &'static str,
	},
	/// CA bundle could not be parsed.
	#[error("CA bundle at {} is invalid.", path.display())]
	InvalidTrustRoot {
		/// Path that was read.
		path: PathBuf,
		/// Underlying parsing failure.
		#[source]
		source: ReqwestError,
	},
	/// Client certificate and key do not form a usable identity.
	#[error("Client identity from {} and {} is invalid.", cert.display(), key.display())]
	InvalidIdentity {
		/// Certificate chain path.
		cert: PathBuf,
		/// Private key path.
		key: PathBuf,
		/// Underlying parsing failure.
		#[source]
		source: ReqwestError,
	},
	/// Endpoint URL cannot be parsed.
	#[error("The {endpoint} address is not a valid URL.")]
	InvalidUrl {
		/// Endpoint label.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Endpoint must use HTTPS.
	#[error("The {endpoint} address must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Endpoint label.
		endpoint: &'static str,
		/// Offending URL.
		url: String,
	},
	/// Endpoint URL has no host component.
	#[error("The {endpoint} address has no host: {url}.")]
	MissingHost {
		/// Endpoint label.
		endpoint: &'static str,
		/// Offending URL.
		url: String,
	},
	/// Server name cannot be used as a TLS name or URL host.
	#[error("The {endpoint} server name is invalid: {name:?}.")]
	InvalidServerName {
		/// Endpoint label.
		endpoint: &'static str,
		/// Offending server name.
		name: String,
	},
	/// Timeouts must be positive.
	#[error("The {which} timeout must be greater than zero.")]
	ZeroTimeout {
		/// Timeout label.
		which: &'static str,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client for the {endpoint} channel could not be constructed.")]
	HttpClientBuild {
		/// Endpoint label.
		endpoint: &'static str,
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(
		endpoint: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::HttpClientBuild { endpoint, source: Box::new(src) }
	}
}

/// Token responses that decode but cannot be used, or do not decode at all.
#[derive(Debug, ThisError)]
pub enum ResponseError {
	/// STS responded with JSON that could not be parsed into a token response.
	#[error("STS returned a malformed token response.")]
	Json {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token response carried an empty `access_token`.
	#[error("STS returned an empty access_token.")]
	EmptyAccessToken,
	/// Access token contains bytes that cannot travel in an HTTP header.
	#[error("STS returned an access_token that is not a valid header value.")]
	InvalidAccessToken,
}
