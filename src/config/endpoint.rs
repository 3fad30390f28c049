//! Target endpoints and the server name each one is verified against.

// std
use std::net::{IpAddr, SocketAddr};
// crates.io
use url::Host;
// self
use crate::{_prelude::*, error::ConfigError};

/// A target URL paired with the TLS server name presented (SNI) and verified for it.
///
/// When the server name differs from the URL host, requests are addressed to the server
/// name and a pinned resolver maps that name back to the URL's original host. This lets a
/// caller connect to an address (IP or alias) while validating a different logical name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
	label: &'static str,
	url: Url,
	server_name: String,
}
impl Endpoint {
	/// Parses and validates an endpoint.
	///
	/// `label` names the endpoint in error messages (`"STS"`, `"resource"`).
	pub fn parse(label: &'static str, address: &str, server_name: &str) -> Result<Self, ConfigError> {
		let url = Url::parse(address)
			.map_err(|source| ConfigError::InvalidUrl { endpoint: label, source })?;

		Self::new(label, url, server_name)
	}

	/// Validates an already parsed URL against the endpoint rules.
	pub fn new(label: &'static str, url: Url, server_name: &str) -> Result<Self, ConfigError> {
		if url.scheme() != "https" {
			return Err(ConfigError::InsecureEndpoint { endpoint: label, url: url.to_string() });
		}
		if url.host().is_none() {
			return Err(ConfigError::MissingHost { endpoint: label, url: url.to_string() });
		}

		let server_name = validate_server_name(label, server_name)?;

		Ok(Self { label, url, server_name })
	}

	/// Label used in logs and errors.
	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Configured target URL.
	pub fn url(&self) -> &Url {
		&self.url
	}

	/// Server name presented via SNI and verified against the peer certificate.
	pub fn server_name(&self) -> &str {
		&self.server_name
	}

	/// True when the URL host differs from the server name.
	pub fn overrides_host(&self) -> bool {
		match self.url.host() {
			Some(Host::Domain(domain)) => !domain.eq_ignore_ascii_case(&self.server_name),
			Some(Host::Ipv4(ip)) => self.server_ip() != Some(IpAddr::V4(ip)),
			Some(Host::Ipv6(ip)) => self.server_ip() != Some(IpAddr::V6(ip)),
			None => false,
		}
	}

	fn server_ip(&self) -> Option<IpAddr> {
		self.server_name.parse().ok()
	}

	/// URL the request is actually sent to.
	///
	/// Identical to [`url`](Self::url) unless the host is overridden, in which case the host
	/// is replaced by the server name and scheme, port, path, and query are kept.
	pub fn request_url(&self) -> Result<Url, ConfigError> {
		if !self.overrides_host() {
			return Ok(self.url.clone());
		}

		let mut url = self.url.clone();

		url.set_host(Some(&self.server_name)).map_err(|_| ConfigError::InvalidServerName {
			endpoint: self.label,
			name: self.server_name.clone(),
		})?;

		Ok(url)
	}

	/// Host + port the pinned resolver must connect to when the host is overridden.
	pub(crate) fn connect_target(&self) -> ConnectTarget {
		let port = self.url.port_or_known_default().unwrap_or(443);

		match self.url.host() {
			Some(Host::Ipv4(ip)) => ConnectTarget::Addr(SocketAddr::new(IpAddr::V4(ip), port)),
			Some(Host::Ipv6(ip)) => ConnectTarget::Addr(SocketAddr::new(IpAddr::V6(ip), port)),
			Some(Host::Domain(domain)) => ConnectTarget::Lookup(domain.to_owned(), port),
			None => ConnectTarget::Lookup(self.server_name.clone(), port),
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{} (as {})", self.url, self.server_name)
	}
}

/// Where a pinned server name really lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ConnectTarget {
	/// Literal socket address taken from the URL.
	Addr(SocketAddr),
	/// Host name that still needs a DNS lookup.
	Lookup(String, u16),
}

fn validate_server_name(label: &'static str, name: &str) -> Result<String, ConfigError> {
	let invalid = || ConfigError::InvalidServerName { endpoint: label, name: name.to_owned() };

	if name.is_empty() || name.len() > 253 {
		return Err(invalid());
	}
	if name.parse::<IpAddr>().is_ok() {
		return Ok(name.to_owned());
	}
	if !name
		.split('.')
		.all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'))
	{
		return Err(invalid());
	}

	Ok(name.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn same_host_keeps_url() {
		let endpoint = Endpoint::parse("STS", "https://sts.domain.com:8081/token", "sts.domain.com")
			.expect("Matching host and server name should validate.");

		assert!(!endpoint.overrides_host());
		assert_eq!(
			endpoint.request_url().expect("Request URL should build.").as_str(),
			"https://sts.domain.com:8081/token"
		);
	}

	#[test]
	fn ip_host_is_rewritten_to_server_name() {
		let endpoint = Endpoint::parse("resource", "https://10.0.0.7:8443/data?x=1", "server.domain.com")
			.expect("IP hosts with a server name should validate.");

		assert!(endpoint.overrides_host());
		assert_eq!(
			endpoint.request_url().expect("Request URL should build.").as_str(),
			"https://server.domain.com:8443/data?x=1"
		);
		assert_eq!(
			endpoint.connect_target(),
			ConnectTarget::Addr("10.0.0.7:8443".parse().expect("Literal should parse."))
		);
	}

	#[test]
	fn ip_literal_matching_its_server_name_is_not_overridden() {
		for (address, name) in
			[("https://[::1]:8081/token", "::1"), ("https://127.0.0.1:8081/token", "127.0.0.1")]
		{
			let endpoint =
				Endpoint::parse("STS", address, name).expect("IP server names should validate.");

			assert!(!endpoint.overrides_host(), "{address} should keep its host.");
			assert_eq!(
				endpoint.request_url().expect("Request URL should build.").as_str(),
				address
			);
		}

		let endpoint = Endpoint::parse("STS", "https://[::1]:8081/token", "::2")
			.expect("Differing IP server names should validate.");

		assert!(endpoint.overrides_host());
	}

	#[test]
	fn alias_host_resolves_through_original_name() {
		let endpoint = Endpoint::parse("STS", "https://localhost:8081", "sts.domain.com")
			.expect("Alias hosts should validate.");

		assert_eq!(endpoint.connect_target(), ConnectTarget::Lookup("localhost".into(), 8081));
		assert_eq!(endpoint.to_string(), "https://localhost:8081/ (as sts.domain.com)");
	}

	#[test]
	fn rejects_plain_http_and_bad_names() {
		assert!(matches!(
			Endpoint::parse("STS", "http://sts.domain.com", "sts.domain.com"),
			Err(ConfigError::InsecureEndpoint { endpoint: "STS", .. })
		));
		assert!(matches!(
			Endpoint::parse("STS", "not a url", "sts.domain.com"),
			Err(ConfigError::InvalidUrl { .. })
		));
		assert!(matches!(
			Endpoint::parse("resource", "https://server.domain.com", "bad name"),
			Err(ConfigError::InvalidServerName { .. })
		));
		assert!(matches!(
			Endpoint::parse("resource", "https://server.domain.com", ""),
			Err(ConfigError::InvalidServerName { .. })
		));
	}
}
