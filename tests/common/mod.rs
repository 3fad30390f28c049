//! Helpers shared by the integration tests.

#![allow(dead_code)]

// std
use std::path::PathBuf;
// crates.io
use httpmock::MockServer;
// self
use sts_fetch::{
	auth::TokenSecret,
	config::{Endpoint, TlsPaths},
	exchange::TokenExchangeRequest,
	http::{Channel, TrustPolicy},
};

pub const AUDIENCE: &str = "https://server.domain.com:8443";
pub const SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub const SUBJECT_TOKEN: &str = "iamtheeggman";

pub fn fixture(name: &str) -> PathBuf {
	PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures")).join(name)
}

pub fn fixture_tls_paths() -> TlsPaths {
	TlsPaths { ca: fixture("tls-ca.crt"), cert: fixture("alice.crt"), key: fixture("alice.key") }
}

/// Endpoint pointing at the mock server's socket while presenting `server_name`.
pub fn pinned_endpoint(
	label: &'static str,
	server: &MockServer,
	path: &str,
	server_name: &str,
) -> Endpoint {
	Endpoint::parse(label, &server.url(path), server_name)
		.expect("Mock endpoint should validate.")
}

/// Channel that accepts the self-signed certificates produced by `httpmock`.
pub fn stub_channel(
	label: &'static str,
	server: &MockServer,
	path: &str,
	server_name: &str,
) -> Channel {
	Channel::builder(pinned_endpoint(label, server, path, server_name), TrustPolicy::DangerAcceptAny)
		.build()
		.expect("Stub channel should build.")
}

pub fn exchange_request() -> TokenExchangeRequest {
	TokenExchangeRequest::new(AUDIENCE, SCOPE, TokenSecret::new(SUBJECT_TOKEN))
}

/// The exact form body a token exchange for [`exchange_request`] must carry.
pub fn expected_form_body() -> String {
	serde_urlencoded::to_string(
		&[
			("grant_type", "urn:ietf:params:oauth:grant-type:token-exchange"),
			("resource", AUDIENCE),
			("audience", AUDIENCE),
			("subject_token_type", "urn:ietf:params:oauth:token-type:access_token"),
			("requested_token_type", "urn:ietf:params:oauth:token-type:jwt"),
			("scope", SCOPE),
			("subject_token", SUBJECT_TOKEN),
		][..],
	)
	.expect("Form body should encode.")
}
