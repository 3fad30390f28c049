//! Transport primitives: one independently configured HTTP channel per target server.
//!
//! A [`Channel`] owns its own [`ReqwestClient`] (and therefore its own connection pool,
//! resolver, and TLS configuration) so the STS and resource channels can never route a
//! request to the wrong peer name. Channels are built with [`ChannelBuilder`], which applies
//! the trust policy, the explicit timeouts, and the server-name pinning described on
//! [`Endpoint`].

// std
use std::net::SocketAddr;
// crates.io
use reqwest::{
	RequestBuilder,
	dns::{Addrs, Name, Resolve, Resolving},
	redirect::Policy,
};
// self
use crate::{
	_prelude::*,
	config::{ConnectTarget, Endpoint, Timeouts},
	error::ConfigError,
	tls::TlsMaterial,
};

type BoxError = Box<dyn StdError + Send + Sync>;

/// How a channel authenticates itself and validates its peer.
#[derive(Clone, Debug)]
pub enum TrustPolicy {
	/// Present the client identity and accept only peers chaining to the trust root and
	/// matching the endpoint's server name. Built-in web roots are disabled.
	Mutual(TlsMaterial),
	/// Accept any server certificate and host name without presenting a client identity.
	///
	/// Only meant for local stub servers that use throwaway self-signed certificates.
	DangerAcceptAny,
}

/// A mutually authenticated HTTP channel bound to a single [`Endpoint`].
///
/// Redirects are never followed: the token endpoint must answer directly and a bearer
/// token must not be replayed against another origin.
#[derive(Clone, Debug)]
pub struct Channel {
	client: ReqwestClient,
	endpoint: Endpoint,
	request_url: Url,
}
impl Channel {
	/// Starts building a channel for `endpoint` under the given trust policy.
	pub fn builder(endpoint: Endpoint, trust: TrustPolicy) -> ChannelBuilder {
		ChannelBuilder::new(endpoint, trust)
	}

	/// Mutually authenticated channel for `endpoint`.
	pub fn mutual_tls(
		endpoint: Endpoint,
		material: &TlsMaterial,
		timeouts: Timeouts,
	) -> Result<Self, ConfigError> {
		Self::builder(endpoint, TrustPolicy::Mutual(material.clone())).timeouts(timeouts).build()
	}

	/// Endpoint this channel talks to.
	pub fn endpoint(&self) -> &Endpoint {
		&self.endpoint
	}

	/// URL requests are addressed to (host replaced by the server name when pinned).
	pub fn request_url(&self) -> &Url {
		&self.request_url
	}

	pub(crate) fn post(&self) -> RequestBuilder {
		self.client.post(self.request_url.clone())
	}

	pub(crate) fn get(&self) -> RequestBuilder {
		self.client.get(self.request_url.clone())
	}
}

/// Builder for [`Channel`] values.
#[derive(Debug)]
pub struct ChannelBuilder {
	endpoint: Endpoint,
	trust: TrustPolicy,
	timeouts: Timeouts,
}
impl ChannelBuilder {
	fn new(endpoint: Endpoint, trust: TrustPolicy) -> Self {
		Self { endpoint, trust, timeouts: Timeouts::default() }
	}

	/// Overrides the per-request timeouts.
	pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
		self.timeouts = timeouts;

		self
	}

	/// Builds the underlying reqwest client.
	pub fn build(self) -> Result<Channel, ConfigError> {
		let Self { endpoint, trust, timeouts } = self;
		let request_url = endpoint.request_url()?;
		let mut builder = ReqwestClient::builder()
			.redirect(Policy::none())
			.https_only(true)
			.connect_timeout(timeouts.connect)
			.timeout(timeouts.request);

		match trust {
			TrustPolicy::Mutual(material) => {
				builder = builder
					.tls_built_in_root_certs(false)
					.identity(material.identity.reqwest_identity());

				for certificate in material.trust.certificates() {
					builder = builder.add_root_certificate(certificate.clone());
				}
			},
			TrustPolicy::DangerAcceptAny => {
				builder =
					builder.danger_accept_invalid_certs(true).danger_accept_invalid_hostnames(true);
			},
		}

		if endpoint.overrides_host() {
			builder = builder.dns_resolver(Arc::new(PinnedResolver::new(&endpoint)));
		}

		let client = builder
			.build()
			.map_err(|source| ConfigError::http_client_build(endpoint.label(), source))?;

		Ok(Channel { client, endpoint, request_url })
	}
}

/// Resolver that sends the endpoint's server name to the URL's original host.
#[derive(Debug)]
struct PinnedResolver {
	server_name: String,
	target: ConnectTarget,
}
impl PinnedResolver {
	fn new(endpoint: &Endpoint) -> Self {
		Self { server_name: endpoint.server_name().to_owned(), target: endpoint.connect_target() }
	}

	fn target_for(&self, name: &str) -> ConnectTarget {
		if name.eq_ignore_ascii_case(&self.server_name) {
			self.target.clone()
		} else {
			// Port is taken from the request URL by the connector.
			ConnectTarget::Lookup(name.to_owned(), 0)
		}
	}
}
impl Resolve for PinnedResolver {
	fn resolve(&self, name: Name) -> Resolving {
		Box::pin(lookup(self.target_for(name.as_str())))
	}
}

async fn lookup(target: ConnectTarget) -> Result<Addrs, BoxError> {
	let addrs: Vec<SocketAddr> = match target {
		ConnectTarget::Addr(addr) => vec![addr],
		ConnectTarget::Lookup(host, port) =>
			tokio::net::lookup_host((host.as_str(), port)).await?.collect(),
	};

	Ok(Box::new(addrs.into_iter()))
}
