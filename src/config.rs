//! Immutable run configuration shared by both phases.
//!
//! A [`FetcherConfig`] is built once at startup (from flags via the `cli` feature, or
//! programmatically through [`FetcherConfig::builder`]) and then passed by reference into
//! every phase. Nothing in it changes after [`FetcherConfigBuilder::build`] returns.

pub mod endpoint;

pub use endpoint::*;

// std
use std::path::PathBuf;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError, exchange::TokenExchangeRequest};

/// Default resource server URL.
pub const DEFAULT_RESOURCE_ADDRESS: &str = "https://server.domain.com:8443";
/// Default server name verified for the resource server.
pub const DEFAULT_RESOURCE_SNI: &str = "server.domain.com";
/// Default CA bundle path.
pub const DEFAULT_TLS_CA: &str = "tls-ca.crt";
/// Default client certificate path.
pub const DEFAULT_TLS_CERT: &str = "alice.crt";
/// Default client key path.
pub const DEFAULT_TLS_KEY: &str = "alice.key";
/// Default server name verified for the STS.
pub const DEFAULT_STS_SNI: &str = "sts.domain.com";
/// Default STS token endpoint.
pub const DEFAULT_STS_ADDRESS: &str = "https://sts.domain.com:8081";
/// Default `audience`/`resource` value.
pub const DEFAULT_STS_AUDIENCE: &str = "https://server.domain.com:8443";
/// Default `scope` value.
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
/// Default inline subject credential.
pub const DEFAULT_STS_CRED: &str = "iamtheeggman";

/// Paths of the PEM files that make up the TLS material.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TlsPaths {
	/// CA bundle used as the trust root for both channels.
	pub ca: PathBuf,
	/// Client certificate chain presented on both channels.
	pub cert: PathBuf,
	/// Private key matching [`cert`](Self::cert).
	pub key: PathBuf,
}
impl Default for TlsPaths {
	fn default() -> Self {
		Self {
			ca: DEFAULT_TLS_CA.into(),
			cert: DEFAULT_TLS_CERT.into(),
			key: DEFAULT_TLS_KEY.into(),
		}
	}
}

/// Per-request network timeouts applied to each channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeouts {
	/// Limit for establishing the TCP + TLS connection.
	pub connect: Duration,
	/// Limit for the whole request, from connect to the last body byte.
	pub request: Duration,
}
impl Timeouts {
	/// Default connect timeout.
	pub const DEFAULT_CONNECT: Duration = Duration::from_secs(10);
	/// Default whole-request timeout.
	pub const DEFAULT_REQUEST: Duration = Duration::from_secs(30);

	fn validate(self) -> Result<Self, ConfigError> {
		if self.connect.is_zero() {
			return Err(ConfigError::ZeroTimeout { which: "connect" });
		}
		if self.request.is_zero() {
			return Err(ConfigError::ZeroTimeout { which: "request" });
		}

		Ok(self)
	}
}
impl Default for Timeouts {
	fn default() -> Self {
		Self { connect: Self::DEFAULT_CONNECT, request: Self::DEFAULT_REQUEST }
	}
}

/// Everything a fetcher run needs, validated.
#[derive(Clone, Debug)]
pub struct FetcherConfig {
	/// STS token endpoint and its server name.
	pub sts: Endpoint,
	/// Resource server endpoint and its server name.
	pub resource: Endpoint,
	/// Value sent as both `resource` and `audience`.
	pub audience: String,
	/// Value sent as `scope`.
	pub scope: String,
	/// Value sent as `subject_token`.
	pub subject_token: TokenSecret,
	/// TLS input files.
	pub tls: TlsPaths,
	/// Per-request timeouts.
	pub timeouts: Timeouts,
	/// Optional overall limit spanning both phases.
	pub deadline: Option<Duration>,
}
impl FetcherConfig {
	/// Returns a builder seeded with the documented defaults.
	pub fn builder() -> FetcherConfigBuilder {
		FetcherConfigBuilder::default()
	}

	/// Token-exchange form for this configuration.
	pub fn exchange_request(&self) -> TokenExchangeRequest {
		TokenExchangeRequest::new(&self.audience, &self.scope, self.subject_token.clone())
	}
}

/// Builder for [`FetcherConfig`] values.
#[derive(Clone, Debug)]
pub struct FetcherConfigBuilder {
	resource_address: String,
	resource_sni: String,
	sts_address: String,
	sts_sni: String,
	audience: String,
	scope: String,
	subject_token: String,
	tls: TlsPaths,
	timeouts: Timeouts,
	deadline: Option<Duration>,
}
impl FetcherConfigBuilder {
	/// Sets the resource server URL.
	pub fn resource_address(mut self, address: impl Into<String>) -> Self {
		self.resource_address = address.into();

		self
	}

	/// Sets the server name verified for the resource server.
	pub fn resource_sni(mut self, name: impl Into<String>) -> Self {
		self.resource_sni = name.into();

		self
	}

	/// Sets the STS token endpoint URL.
	pub fn sts_address(mut self, address: impl Into<String>) -> Self {
		self.sts_address = address.into();

		self
	}

	/// Sets the server name verified for the STS.
	pub fn sts_sni(mut self, name: impl Into<String>) -> Self {
		self.sts_sni = name.into();

		self
	}

	/// Sets the `audience`/`resource` value.
	pub fn audience(mut self, audience: impl Into<String>) -> Self {
		self.audience = audience.into();

		self
	}

	/// Sets the `scope` value.
	pub fn scope(mut self, scope: impl Into<String>) -> Self {
		self.scope = scope.into();

		self
	}

	/// Sets the inline subject credential.
	pub fn subject_token(mut self, token: impl Into<String>) -> Self {
		self.subject_token = token.into();

		self
	}

	/// Sets the CA bundle path.
	pub fn tls_ca(mut self, path: impl Into<PathBuf>) -> Self {
		self.tls.ca = path.into();

		self
	}

	/// Sets the client certificate and key paths.
	pub fn tls_identity(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
		self.tls.cert = cert.into();
		self.tls.key = key.into();

		self
	}

	/// Overrides the per-request timeouts.
	pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
		self.timeouts = timeouts;

		self
	}

	/// Sets an overall deadline spanning both phases.
	pub fn deadline(mut self, deadline: Option<Duration>) -> Self {
		self.deadline = deadline;

		self
	}

	/// Validates the collected values and produces a [`FetcherConfig`].
	pub fn build(self) -> Result<FetcherConfig, ConfigError> {
		let sts = Endpoint::parse("STS", &self.sts_address, &self.sts_sni)?;
		let resource = Endpoint::parse("resource", &self.resource_address, &self.resource_sni)?;
		let timeouts = self.timeouts.validate()?;

		if self.deadline.is_some_and(|deadline| deadline.is_zero()) {
			return Err(ConfigError::ZeroTimeout { which: "deadline" });
		}

		Ok(FetcherConfig {
			sts,
			resource,
			audience: self.audience,
			scope: self.scope,
			subject_token: TokenSecret::new(self.subject_token),
			tls: self.tls,
			timeouts,
			deadline: self.deadline,
		})
	}
}
impl Default for FetcherConfigBuilder {
	fn default() -> Self {
		Self {
			resource_address: DEFAULT_RESOURCE_ADDRESS.into(),
			resource_sni: DEFAULT_RESOURCE_SNI.into(),
			sts_address: DEFAULT_STS_ADDRESS.into(),
			sts_sni: DEFAULT_STS_SNI.into(),
			audience: DEFAULT_STS_AUDIENCE.into(),
			scope: DEFAULT_SCOPE.into(),
			subject_token: DEFAULT_STS_CRED.into(),
			tls: TlsPaths::default(),
			timeouts: Timeouts::default(),
			deadline: None,
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_build() {
		let config = FetcherConfig::builder().build().expect("Defaults should validate.");

		assert_eq!(config.sts.url().as_str(), "https://sts.domain.com:8081/");
		assert_eq!(config.sts.server_name(), "sts.domain.com");
		assert_eq!(config.resource.server_name(), "server.domain.com");
		assert_eq!(config.audience, DEFAULT_STS_AUDIENCE);
		assert_eq!(config.subject_token.expose(), DEFAULT_STS_CRED);
		assert_eq!(config.tls, TlsPaths::default());
		assert_eq!(config.timeouts, Timeouts::default());
		assert!(config.deadline.is_none());
	}

	#[test]
	fn zero_timeouts_are_rejected() {
		let err = FetcherConfig::builder()
			.timeouts(Timeouts { connect: Duration::ZERO, ..Timeouts::default() })
			.build()
			.expect_err("A zero connect timeout must be rejected.");

		assert!(matches!(err, ConfigError::ZeroTimeout { which: "connect" }));

		let err = FetcherConfig::builder()
			.deadline(Some(Duration::ZERO))
			.build()
			.expect_err("A zero deadline must be rejected.");

		assert!(matches!(err, ConfigError::ZeroTimeout { which: "deadline" }));
	}

	#[test]
	fn debug_output_redacts_subject_token() {
		let config = FetcherConfig::builder()
			.subject_token("very-secret-credential")
			.build()
			.expect("Config should validate.");

		assert!(!format!("{config:?}").contains("very-secret-credential"));
	}
}
