//! Client TLS material loaded once at startup and shared read-only by both channels.

pub mod identity;
pub mod trust;

pub use identity::*;
pub use trust::*;

// std
use std::path::Path;
// self
use crate::{_prelude::*, config::TlsPaths, error::ConfigError};

/// Client identity plus trust root, as used for every mutually authenticated channel.
#[derive(Clone, Debug)]
pub struct TlsMaterial {
	/// Certificate chain + key presented to servers.
	pub identity: ClientIdentity,
	/// CA certificates that validate servers.
	pub trust: TrustRoot,
}
impl TlsMaterial {
	/// Loads all TLS inputs, failing on the first unreadable or invalid file.
	pub fn load(paths: &TlsPaths) -> Result<Self, ConfigError> {
		let trust = TrustRoot::load(&paths.ca)?;
		let identity = ClientIdentity::load(&paths.cert, &paths.key)?;

		#[cfg(feature = "tracing")]
		tracing::debug!(
			ca = %paths.ca.display(),
			ca_certificates = trust.len(),
			cert = %paths.cert.display(),
			"loaded TLS material"
		);

		Ok(Self { identity, trust })
	}
}

fn read_pem(what: &'static str, path: &Path) -> Result<Vec<u8>, ConfigError> {
	std::fs::read(path).map_err(|source| ConfigError::ReadFile { what, path: path.to_owned(), source })
}

fn require_block(
	what: &'static str,
	path: &Path,
	pem: &[u8],
	label: &'static str,
) -> Result<(), ConfigError> {
	let needle = format!("-----BEGIN {label}-----");
	let found = pem.windows(needle.len()).any(|window| window == needle.as_bytes());

	if found { Ok(()) } else { Err(ConfigError::MissingPemBlock { what, path: path.to_owned(), label }) }
}
