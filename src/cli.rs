//! Command-line flags.
//!
//! Flag names keep their historical camel case (`--stsaddress`, `--tlsCA`, ...) so existing
//! scripts keep working; each flag can also be supplied through an `STS_FETCH_*` variable.

// std
use std::path::PathBuf;
// crates.io
use clap::Parser;
// self
use crate::{
	_prelude::*,
	config::{self, FetcherConfig, Timeouts},
	error::ConfigError,
};

/// Exchange a credential at an STS, then fetch a resource with the issued token.
#[derive(Clone, Debug, Parser)]
#[command(name = "sts-fetch", version, about, long_about = None)]
pub struct Args {
	/// Resource server URL.
	#[arg(long = "resourceAddress", env = "STS_FETCH_RESOURCE_ADDRESS", default_value = config::DEFAULT_RESOURCE_ADDRESS)]
	pub resource_address: String,
	/// TLS server name verified for the resource server.
	#[arg(long = "resourceSNI", env = "STS_FETCH_RESOURCE_SNI", default_value = config::DEFAULT_RESOURCE_SNI)]
	pub resource_sni: String,
	/// PEM file with the CA certificate(s) trusted for both servers.
	#[arg(long = "tlsCA", env = "STS_FETCH_TLS_CA", default_value = config::DEFAULT_TLS_CA)]
	pub tls_ca: PathBuf,
	/// PEM client certificate presented to both servers.
	#[arg(long = "tlsCert", env = "STS_FETCH_TLS_CERT", default_value = config::DEFAULT_TLS_CERT)]
	pub tls_cert: PathBuf,
	/// PEM private key for the client certificate.
	#[arg(long = "tlsKey", env = "STS_FETCH_TLS_KEY", default_value = config::DEFAULT_TLS_KEY)]
	pub tls_key: PathBuf,
	/// TLS server name verified for the STS.
	#[arg(long = "stsSNI", env = "STS_FETCH_STS_SNI", default_value = config::DEFAULT_STS_SNI)]
	pub sts_sni: String,
	/// STS token endpoint URL.
	#[arg(long = "stsaddress", env = "STS_FETCH_STS_ADDRESS", default_value = config::DEFAULT_STS_ADDRESS)]
	pub sts_address: String,
	/// Value sent as both `audience` and `resource`.
	#[arg(long = "stsaudience", env = "STS_FETCH_STS_AUDIENCE", default_value = config::DEFAULT_STS_AUDIENCE)]
	pub sts_audience: String,
	/// Value sent as `scope`.
	#[arg(long = "scope", env = "STS_FETCH_SCOPE", default_value = config::DEFAULT_SCOPE)]
	pub scope: String,
	/// Subject credential sent inline as `subject_token`.
	#[arg(long = "stsCred", env = "STS_FETCH_STS_CRED", default_value = config::DEFAULT_STS_CRED, hide_env_values = true)]
	pub sts_cred: String,
	/// Connect timeout in seconds, per request.
	#[arg(long = "connectTimeout", env = "STS_FETCH_CONNECT_TIMEOUT", default_value_t = Timeouts::DEFAULT_CONNECT.as_secs())]
	pub connect_timeout: u64,
	/// Whole-request timeout in seconds, per request.
	#[arg(long = "requestTimeout", env = "STS_FETCH_REQUEST_TIMEOUT", default_value_t = Timeouts::DEFAULT_REQUEST.as_secs())]
	pub request_timeout: u64,
	/// Overall deadline in seconds spanning both phases.
	#[arg(long = "deadline", env = "STS_FETCH_DEADLINE")]
	pub deadline: Option<u64>,
	/// Emit logs as JSON lines on stderr.
	#[arg(long = "jsonLogs", env = "STS_FETCH_JSON_LOGS")]
	pub json_logs: bool,
}
impl Args {
	/// Validates the flags into an immutable [`FetcherConfig`].
	pub fn into_config(self) -> Result<FetcherConfig, ConfigError> {
		FetcherConfig::builder()
			.resource_address(self.resource_address)
			.resource_sni(self.resource_sni)
			.sts_address(self.sts_address)
			.sts_sni(self.sts_sni)
			.audience(self.sts_audience)
			.scope(self.scope)
			.subject_token(self.sts_cred)
			.tls_ca(self.tls_ca)
			.tls_identity(self.tls_cert, self.tls_key)
			.timeouts(Timeouts {
				connect: Duration::from_secs(self.connect_timeout),
				request: Duration::from_secs(self.request_timeout),
			})
			.deadline(self.deadline.map(Duration::from_secs))
			.build()
	}
}
