//! Exchange a credential for a JWT at a Security Token Service over mutual TLS, then fetch a
//! protected resource with that token over a second, independently pinned mutual TLS channel.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
#[cfg(feature = "cli")] pub mod cli;
pub mod config;
pub mod error;
pub mod exchange;
pub mod fetch;
pub mod flows;
pub mod http;
pub mod obs;
pub mod tls;

mod _prelude {
	pub use std::{
		borrow::Cow,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
		time::Duration,
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::Deserialize;
	pub use thiserror::Error as ThisError;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, rcgen as _, rustls as _, tokio_rustls as _};
