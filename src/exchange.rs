//! Phase A: RFC 8693 token exchange against the STS.
//!
//! [`exchange_token`] posts the form built by [`TokenExchangeRequest`] over the STS
//! [`Channel`], reads the body exactly once, and only then branches on the status: 200 is
//! decoded into a [`TokenResponse`], anything else becomes [`Error::ExchangeRejected`]
//! carrying that same body.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

// self
use crate::{_prelude::*, http::Channel, obs::Phase};

/// Performs the token exchange and decodes the STS response.
pub async fn exchange_token(channel: &Channel, request: &TokenExchangeRequest) -> Result<TokenResponse> {
	let connection_error = |source| Error::Connection {
		phase: Phase::TokenExchange,
		endpoint: channel.endpoint().url().to_string(),
		source,
	};
	let response =
		channel.post().form(&request.form_pairs()[..]).send().await.map_err(connection_error)?;
	let status = response.status();
	let body = response.bytes().await.map_err(connection_error)?;

	#[cfg(feature = "tracing")]
	tracing::info!(status = status.as_u16(), body_len = body.len(), "STS responded");

	if status != reqwest::StatusCode::OK {
		return Err(Error::ExchangeRejected {
			status: status.as_u16(),
			body: String::from_utf8_lossy(&body).into_owned(),
		});
	}

	let token = TokenResponse::from_json(&body)?;

	#[cfg(feature = "tracing")]
	tracing::info!(
		token = %token.access_token.fingerprint(),
		token_type = token.token_type.as_deref().unwrap_or("-"),
		issued_token_type = token.issued_token_type.as_deref().unwrap_or("-"),
		expires_in = token.expires_in,
		"STS token obtained"
	);

	Ok(token)
}
