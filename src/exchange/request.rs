//! RFC 8693 token-exchange request form.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// `grant_type` value for token exchange (RFC 8693 §2.1).
pub const TOKEN_EXCHANGE_GRANT: &str = "urn:ietf:params:oauth:grant-type:token-exchange";

/// Token type identifiers from RFC 8693 §3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
	/// `urn:ietf:params:oauth:token-type:access_token`
	AccessToken,
	/// `urn:ietf:params:oauth:token-type:refresh_token`
	RefreshToken,
	/// `urn:ietf:params:oauth:token-type:id_token`
	IdToken,
	/// `urn:ietf:params:oauth:token-type:jwt`
	Jwt,
}
impl TokenType {
	/// Returns the URN identifying this token type.
	pub const fn as_urn(self) -> &'static str {
		match self {
			TokenType::AccessToken => "urn:ietf:params:oauth:token-type:access_token",
			TokenType::RefreshToken => "urn:ietf:params:oauth:token-type:refresh_token",
			TokenType::IdToken => "urn:ietf:params:oauth:token-type:id_token",
			TokenType::Jwt => "urn:ietf:params:oauth:token-type:jwt",
		}
	}

	/// Parses a token type URN.
	pub fn from_urn(urn: &str) -> Option<Self> {
		[Self::AccessToken, Self::RefreshToken, Self::IdToken, Self::Jwt]
			.into_iter()
			.find(|kind| kind.as_urn() == urn)
	}
}
impl Display for TokenType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_urn())
	}
}

/// Form fields of one token-exchange call.
///
/// The audience is sent as both `resource` and `audience`. The subject token type is always
/// an access token and the requested token type is always a JWT.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenExchangeRequest {
	audience: String,
	scope: String,
	subject_token: TokenSecret,
}
impl TokenExchangeRequest {
	/// Type of the credential presented as `subject_token`.
	pub const SUBJECT_TOKEN_TYPE: TokenType = TokenType::AccessToken;
	/// Type of the token asked for.
	pub const REQUESTED_TOKEN_TYPE: TokenType = TokenType::Jwt;

	/// Creates a request for the given audience, scope, and subject credential.
	pub fn new(
		audience: impl Into<String>,
		scope: impl Into<String>,
		subject_token: TokenSecret,
	) -> Self {
		Self { audience: audience.into(), scope: scope.into(), subject_token }
	}

	/// Audience (and resource) value.
	pub fn audience(&self) -> &str {
		&self.audience
	}

	/// Requested scope.
	pub fn scope(&self) -> &str {
		&self.scope
	}

	/// Form fields in wire order.
	pub fn form_pairs(&self) -> [(&'static str, &str); 7] {
		[
			("grant_type", TOKEN_EXCHANGE_GRANT),
			("resource", &self.audience),
			("audience", &self.audience),
			("subject_token_type", Self::SUBJECT_TOKEN_TYPE.as_urn()),
			("requested_token_type", Self::REQUESTED_TOKEN_TYPE.as_urn()),
			("scope", &self.scope),
			("subject_token", self.subject_token.expose()),
		]
	}
}
impl Debug for TokenExchangeRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenExchangeRequest")
			.field("audience", &self.audience)
			.field("scope", &self.scope)
			.field("subject_token", &"<redacted>")
			.finish()
	}
}
