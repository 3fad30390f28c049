//! `Authorization: Bearer` header construction.

// crates.io
use reqwest::header::HeaderValue;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ResponseError};

/// Authentication scheme prefix, including the separating space.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Builds the `Authorization` header value for `token`.
///
/// The value is exactly [`BEARER_PREFIX`] followed by the token and is flagged sensitive so
/// the HTTP stack never prints it.
pub fn bearer_header(token: &TokenSecret) -> Result<HeaderValue> {
	if token.is_empty() {
		return Err(ResponseError::EmptyAccessToken.into());
	}

	let mut value = HeaderValue::try_from(format!("{BEARER_PREFIX}{}", token.expose()))
		.map_err(|_| ResponseError::InvalidAccessToken)?;

	value.set_sensitive(true);

	Ok(value)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn header_is_prefix_plus_token() {
		let value = bearer_header(&TokenSecret::new("TKN123"))
			.expect("Printable tokens should form a header value.");

		assert_eq!(value.to_str().expect("Header should be ASCII."), "Bearer TKN123");
		assert!(value.is_sensitive());
	}

	#[test]
	fn rejects_empty_and_unprintable_tokens() {
		assert!(matches!(
			bearer_header(&TokenSecret::new("")),
			Err(Error::MalformedResponse(ResponseError::EmptyAccessToken))
		));
		assert!(matches!(
			bearer_header(&TokenSecret::new("line\nbreak")),
			Err(Error::MalformedResponse(ResponseError::InvalidAccessToken))
		));
	}
}
