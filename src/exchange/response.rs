//! Token response decoding (RFC 8693 §2.2.1).

// crates.io
use time::OffsetDateTime;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ResponseError, exchange::TokenType};

/// Decoded token-exchange response.
///
/// Optional members stay `None` when the STS omits them; they are never defaulted.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	/// Issued token; required and non-empty.
	pub access_token: TokenSecret,
	/// Type of the issued token (a token type URN).
	#[serde(default)]
	pub issued_token_type: Option<String>,
	/// How the token is used, typically `Bearer` or `N_A`.
	#[serde(default)]
	pub token_type: Option<String>,
	/// Lifetime in seconds.
	#[serde(default)]
	pub expires_in: Option<i64>,
	/// Granted scope when it differs from the requested one.
	#[serde(default)]
	pub scope: Option<String>,
	/// Refresh token, if the STS issued one.
	#[serde(default)]
	pub refresh_token: Option<TokenSecret>,
}
impl TokenResponse {
	/// Decodes a JSON body, reporting the failing path on error.
	pub fn from_json(body: &[u8]) -> Result<Self> {
		let mut de = serde_json::Deserializer::from_slice(body);
		let response: Self = serde_path_to_error::deserialize(&mut de)
			.map_err(|source| ResponseError::Json { source })?;

		if response.access_token.is_empty() {
			return Err(ResponseError::EmptyAccessToken.into());
		}

		Ok(response)
	}

	/// Issued token type as a known [`TokenType`], if recognized.
	pub fn issued_token_type(&self) -> Option<TokenType> {
		self.issued_token_type.as_deref().and_then(TokenType::from_urn)
	}

	/// Absolute expiry computed from `issued_at`, when `expires_in` was supplied.
	pub fn expires_at(&self, issued_at: OffsetDateTime) -> Option<OffsetDateTime> {
		self.expires_in.map(|secs| issued_at + time::Duration::seconds(secs))
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn minimal_response_keeps_optional_fields_absent() {
		let response = TokenResponse::from_json(br#"{"access_token":"TKN123","token_type":"Bearer"}"#)
			.expect("Minimal responses should decode.");

		assert_eq!(response.access_token.expose(), "TKN123");
		assert_eq!(response.token_type.as_deref(), Some("Bearer"));
		assert_eq!(response.expires_in, None);
		assert_eq!(response.scope, None);
		assert!(response.refresh_token.is_none());
		assert!(response.issued_token_type.is_none());
		assert_eq!(response.expires_at(macros::datetime!(2025-01-01 00:00 UTC)), None);
	}

	#[test]
	fn full_response_decodes_every_field() {
		let response = TokenResponse::from_json(
			br#"{
				"access_token":"eyJ.payload.sig",
				"issued_token_type":"urn:ietf:params:oauth:token-type:jwt",
				"token_type":"N_A",
				"expires_in":0,
				"scope":"read",
				"refresh_token":"r-1",
				"unknown":true
			}"#,
		)
		.expect("Full responses should decode.");

		assert_eq!(response.issued_token_type(), Some(TokenType::Jwt));
		assert_eq!(response.expires_in, Some(0));
		assert_eq!(response.scope.as_deref(), Some("read"));
		assert_eq!(response.refresh_token.as_ref().map(TokenSecret::expose), Some("r-1"));
		assert_eq!(
			response.expires_at(macros::datetime!(2025-01-01 00:00 UTC)),
			Some(macros::datetime!(2025-01-01 00:00 UTC))
		);
	}

	#[test]
	fn malformed_bodies_report_the_failing_path() {
		let err = TokenResponse::from_json(br#"{"access_token":"x","expires_in":"soon"}"#)
			.expect_err("String lifetimes must be rejected.");

		match err {
			Error::MalformedResponse(ResponseError::Json { source }) =>
				assert_eq!(source.path().to_string(), "expires_in"),
			other => panic!("Unexpected error variant: {other:?}."),
		}

		assert!(matches!(
			TokenResponse::from_json(b"not json"),
			Err(Error::MalformedResponse(ResponseError::Json { .. }))
		));
		assert!(matches!(
			TokenResponse::from_json(br#"{"token_type":"Bearer"}"#),
			Err(Error::MalformedResponse(ResponseError::Json { .. }))
		));
		assert!(matches!(
			TokenResponse::from_json(br#"{"access_token":""}"#),
			Err(Error::MalformedResponse(ResponseError::EmptyAccessToken))
		));
	}
}
