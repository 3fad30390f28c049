//! Client certificate + key presented for mutual TLS.

// std
use std::path::{Path, PathBuf};
// crates.io
use reqwest::Identity;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	tls::{read_pem, require_block},
};

/// Certificate chain and private key used on both channels.
///
/// Parsed once; each channel receives its own clone of the underlying identity.
#[derive(Clone)]
pub struct ClientIdentity {
	identity: Identity,
	cert_path: PathBuf,
}
impl ClientIdentity {
	/// Loads a PEM certificate chain and a PEM private key.
	pub fn load(cert: impl AsRef<Path>, key: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let (cert, key) = (cert.as_ref(), key.as_ref());
		let cert_pem = read_pem("client certificate", cert)?;
		let key_pem = read_pem("client key", key)?;

		require_block("client certificate", cert, &cert_pem, "CERTIFICATE")?;
		["PRIVATE KEY", "EC PRIVATE KEY", "RSA PRIVATE KEY"]
			.into_iter()
			.find_map(|label| require_block("client key", key, &key_pem, label).ok())
			.ok_or_else(|| ConfigError::MissingPemBlock {
				what: "client key",
				path: key.to_owned(),
				label: "PRIVATE KEY",
			})?;

		let mut bundle = cert_pem;

		if !bundle.ends_with(b"\n") {
			bundle.push(b'\n');
		}

		bundle.extend_from_slice(&key_pem);

		let identity = Identity::from_pem(&bundle).map_err(|source| ConfigError::InvalidIdentity {
			cert: cert.to_owned(),
			key: key.to_owned(),
			source,
		})?;

		Ok(Self { identity, cert_path: cert.to_owned() })
	}

	/// Identity handed to reqwest when building a channel.
	pub(crate) fn reqwest_identity(&self) -> Identity {
		self.identity.clone()
	}
}
impl Debug for ClientIdentity {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ClientIdentity").field("cert", &self.cert_path).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::env;
	// self
	use super::*;

	fn scratch(name: &str, contents: &str) -> PathBuf {
		let path = env::temp_dir().join(format!("sts-fetch-identity-{}-{name}", std::process::id()));

		std::fs::write(&path, contents).expect("Scratch file should be writable.");

		path
	}

	#[test]
	fn key_file_without_key_block_is_rejected() {
		let cert = scratch("cert.pem", "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n");
		let key = scratch("key.pem", "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n");
		let err = ClientIdentity::load(&cert, &key).expect_err("Keys must contain a key block.");

		assert!(matches!(err, ConfigError::MissingPemBlock { what: "client key", .. }));
	}

	#[test]
	fn missing_key_is_a_read_error() {
		let cert = scratch("cert-only.pem", "-----BEGIN CERTIFICATE-----\n");
		let err = ClientIdentity::load(&cert, "/nonexistent/sts-fetch/alice.key")
			.expect_err("Missing keys must be rejected.");

		assert!(matches!(err, ConfigError::ReadFile { what: "client key", .. }));
	}
}
