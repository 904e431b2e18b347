//! Framework-agnostic security mediation core—authenticate, authorize,
//! challenge, and renew sessions safely behind any HTTP front end.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod authorize;
pub mod client;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod http;
pub mod matcher;
pub mod session;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Request/client fixtures for integration tests; enabled via `cfg(test)`
	//! or the `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{ClientName, Credentials, Profile},
		client::{IdentityClient, Retrieval},
		config::{Config, ConfigBuilder},
		context::{Cookie, WebContext},
		http::HttpAction,
	};

	/// Fully in-memory [`WebContext`] recording everything written to it.
	#[derive(Clone, Debug, Default)]
	pub struct TestWebContext {
		/// Inbound query/form parameters.
		pub parameters: HashMap<String, String>,
		/// Inbound headers, matched case-insensitively.
		pub headers: HashMap<String, String>,
		/// Inbound cookies.
		pub cookies: HashMap<String, String>,
		/// Full reconstructed request URL.
		pub url: String,
		/// Per-request attributes.
		pub attributes: HashMap<String, Value>,
		/// Status written by the engine, if any.
		pub response_status: Option<u16>,
		/// Headers written by the engine.
		pub response_headers: Vec<(String, String)>,
		/// Cookies written by the engine.
		pub response_cookies: Vec<Cookie>,
		/// Cookies evicted by the engine.
		pub removed_cookies: Vec<String>,
	}
	impl TestWebContext {
		/// Creates a context for the given request URL.
		pub fn new(url: impl Into<String>) -> Self {
			Self { url: url.into(), ..Default::default() }
		}

		/// Adds an inbound parameter.
		pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
			self.parameters.insert(name.into(), value.into());

			self
		}

		/// Adds an inbound header.
		pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
			self.headers.insert(name.into().to_ascii_lowercase(), value.into());

			self
		}

		/// Adds an inbound cookie.
		pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
			self.cookies.insert(name.into(), value.into());

			self
		}

		/// The last session cookie the engine issued, if any.
		pub fn issued_cookie(&self, name: &str) -> Option<&Cookie> {
			self.response_cookies.iter().rev().find(|cookie| cookie.name == name)
		}
	}
	impl WebContext for TestWebContext {
		fn request_parameter(&self, name: &str) -> Option<String> {
			self.parameters.get(name).cloned()
		}

		fn request_header(&self, name: &str) -> Option<String> {
			self.headers.get(&name.to_ascii_lowercase()).cloned()
		}

		fn request_cookie(&self, name: &str) -> Option<String> {
			self.cookies.get(name).cloned()
		}

		fn full_request_url(&self) -> String {
			self.url.clone()
		}

		fn request_attribute(&self, name: &str) -> Option<Value> {
			self.attributes.get(name).cloned()
		}

		fn set_request_attribute(&mut self, name: &str, value: Option<Value>) {
			match value {
				Some(value) => {
					self.attributes.insert(name.to_owned(), value);
				},
				None => {
					self.attributes.remove(name);
				},
			}
		}

		fn set_response_status(&mut self, status: u16) {
			self.response_status = Some(status);
		}

		fn set_response_header(&mut self, name: &str, value: &str) {
			self.response_headers.push((name.to_owned(), value.to_owned()));
		}

		fn set_cookie(&mut self, cookie: Cookie) {
			self.response_cookies.push(cookie);
		}

		fn remove_cookie(&mut self, name: &str) {
			self.removed_cookies.push(name.to_owned());
		}
	}

	/// Indirect client stub: redirects to a fixed login URL and accepts a
	/// `code` callback parameter, mapping token `t` to profile id `t-user`.
	pub struct StubIndirectClient {
		name: ClientName,
		login_url: String,
	}
	impl StubIndirectClient {
		/// Creates the stub.
		pub fn new(name: &str, login_url: impl Into<String>) -> Self {
			Self {
				name: ClientName::new(name).expect("Stub client name should be valid."),
				login_url: login_url.into(),
			}
		}
	}
	impl IdentityClient for StubIndirectClient {
		fn name(&self) -> &ClientName {
			&self.name
		}

		fn is_indirect(&self) -> bool {
			true
		}

		fn credentials(&self, ctx: &mut dyn WebContext) -> Result<Retrieval<Credentials>> {
			Ok(match ctx.request_parameter("code") {
				Some(code) => Retrieval::Found(Credentials::new(code)),
				None => Retrieval::Missing,
			})
		}

		fn user_profile(
			&self,
			credentials: &Credentials,
			_: &mut dyn WebContext,
		) -> Result<Option<Profile>> {
			Ok(Some(Profile::new(format!("{}-user", credentials.token()))))
		}

		fn initiate_redirect(&self, _: &mut dyn WebContext) -> Result<HttpAction> {
			Ok(HttpAction::redirect(self.login_url.clone()))
		}
	}

	/// Direct client stub validating a fixed bearer token.
	pub fn bearer_client(name: &str, token: &str, profile: Profile) -> Arc<dyn IdentityClient> {
		let expected = token.to_owned();

		Arc::new(crate::client::HeaderClient::bearer(
			ClientName::new(name).expect("Stub client name should be valid."),
			Arc::new(move |credentials| {
				Ok((credentials.token() == expected).then(|| profile.clone()))
			}),
		))
	}

	/// Starts a configuration builder seeded with the given clients.
	pub fn config_with_clients(
		clients: impl IntoIterator<Item = Arc<dyn IdentityClient>>,
	) -> ConfigBuilder {
		let mut builder = Config::builder();

		for client in clients {
			builder = builder.client(client);
		}

		builder
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use url;
#[cfg(test)] use authgate as _;
