//! CA trust roots.

// std
use std::path::Path;
// crates.io
use reqwest::Certificate;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	tls::{read_pem, require_block},
};

/// CA certificates used to validate server certificates on every channel.
#[derive(Clone)]
pub struct TrustRoot {
	certificates: Arc<[Certificate]>,
}
impl TrustRoot {
	/// Loads a PEM bundle holding one or more CA certificates.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let pem = read_pem("CA bundle", path)?;

		Self::from_pem(path, &pem)
	}

	fn from_pem(path: &Path, pem: &[u8]) -> Result<Self, ConfigError> {
		require_block("CA bundle", path, pem, "CERTIFICATE")?;

		let certificates = Certificate::from_pem_bundle(pem)
			.map_err(|source| ConfigError::InvalidTrustRoot { path: path.to_owned(), source })?;

		if certificates.is_empty() {
			return Err(ConfigError::MissingPemBlock {
				what: "CA bundle",
				path: path.to_owned(),
				label: "CERTIFICATE",
			});
		}

		Ok(Self { certificates: certificates.into() })
	}

	/// Number of CA certificates in the bundle.
	pub fn len(&self) -> usize {
		self.certificates.len()
	}

	/// True when the bundle holds no CA certificates.
	pub fn is_empty(&self) -> bool {
		self.certificates.is_empty()
	}

	/// Iterator over the CA certificates.
	pub fn certificates(&self) -> impl Iterator<Item = &Certificate> {
		self.certificates.iter()
	}
}
impl Debug for TrustRoot {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TrustRoot").field("certificates", &self.certificates.len()).finish()
	}
}
