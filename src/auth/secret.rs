//! Secure token secret wrapper that redacts sensitive material.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TokenSecret(String);
impl TokenSecret {
	const FINGERPRINT_LEN: usize = 12;

	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner token value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns true when the wrapped value is empty.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Short, log-safe identifier derived from a SHA-256 digest of the secret.
	///
	/// The value is the first characters of the base64 (no padding) digest, enough to
	/// correlate a token across log lines without revealing it.
	pub fn fingerprint(&self) -> String {
		let digest = Sha256::digest(self.0.as_bytes());
		let mut encoded = STANDARD_NO_PAD.encode(digest);

		encoded.truncate(Self::FINGERPRINT_LEN);

		encoded
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn secret_formatters_redact() {
		let secret = TokenSecret::new("super-secret");

		assert_eq!(format!("{secret:?}"), "TokenSecret(\"<redacted>\")");
		assert_eq!(format!("{secret}"), "<redacted>");
	}

	#[test]
	fn fingerprint_is_stable_and_does_not_leak() {
		let lhs = TokenSecret::new("TKN123");
		let rhs = TokenSecret::new("TKN123");
		let other = TokenSecret::new("TKN124");

		assert_eq!(lhs.fingerprint(), rhs.fingerprint());
		assert_ne!(lhs.fingerprint(), other.fingerprint());
		assert_eq!(lhs.fingerprint().len(), 12);
		assert!(!lhs.fingerprint().contains("TKN123"));
	}

	#[test]
	fn deserializes_from_plain_string() {
		let secret: TokenSecret =
			serde_json::from_str("\"abc\"").expect("Plain JSON strings should deserialize.");

		assert_eq!(secret.expose(), "abc");
		assert!(!secret.is_empty());
	}
}
