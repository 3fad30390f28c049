//! Phase B: bearer-authenticated GET against the resource server.

// crates.io
use reqwest::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth::{self, TokenSecret},
	http::Channel,
	obs::Phase,
};

/// Resource server answer, read once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
}
impl ResourceResponse {
	/// Body rendered as text, replacing invalid UTF-8.
	pub fn text(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.body)
	}
}

/// Sends `GET` with `Authorization: Bearer <token>` and returns the body.
///
/// Non-2xx answers are reported as [`Error::ResourceRejected`] so authorization failures
/// (401/403) are never mistaken for success.
pub async fn fetch_resource(channel: &Channel, token: &TokenSecret) -> Result<ResourceResponse> {
	let authorization = auth::bearer_header(token)?;
	let response = channel.get().header(AUTHORIZATION, authorization).send().await.map_err(
		|source| Error::Connection {
			phase: Phase::ResourceFetch,
			endpoint: channel.endpoint().url().to_string(),
			source,
		},
	)?;
	let status = response.status();
	let body = response.bytes().await.map_err(|source| Error::Fetch { source })?.to_vec();

	#[cfg(feature = "tracing")]
	tracing::info!(status = status.as_u16(), body_len = body.len(), "resource server responded");

	if !status.is_success() {
		return Err(Error::ResourceRejected {
			status: status.as_u16(),
			body: String::from_utf8_lossy(&body).into_owned(),
		});
	}

	Ok(ResourceResponse { status: status.as_u16(), body })
}
