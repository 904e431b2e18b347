//! Built-in direct client that validates a token carried in a request header.

// self
use crate::{
	_prelude::*,
	auth::{ClientName, Credentials, Profile},
	client::{IdentityClient, Retrieval},
	context::WebContext,
	error::ConfigError,
	http::HttpAction,
};

/// Validation hook turning raw credentials into a profile.
///
/// Implementations may block on I/O (introspection endpoints, key lookups);
/// `Ok(None)` means the token did not resolve to an identity.
pub type CredentialsAuthenticator =
	dyn Fn(&Credentials) -> Result<Option<Profile>> + Send + Sync;

/// Direct client extracting a (typically bearer) token from a header.
///
/// Stateless by construction: it never issues a redirect and never touches
/// session state. The validation logic is injected, keeping provider wire
/// protocols out of this crate.
#[derive(Clone)]
pub struct HeaderClient {
	name: ClientName,
	header: String,
	prefix: String,
	authenticator: Arc<CredentialsAuthenticator>,
}
impl HeaderClient {
	/// Creates a client reading `Authorization: Bearer <token>`.
	pub fn bearer(name: ClientName, authenticator: Arc<CredentialsAuthenticator>) -> Self {
		Self::new(name, "Authorization", "Bearer ", authenticator)
	}

	/// Creates a client reading `<header>: <prefix><token>`.
	///
	/// An empty prefix matches the whole header value.
	pub fn new(
		name: ClientName,
		header: impl Into<String>,
		prefix: impl Into<String>,
		authenticator: Arc<CredentialsAuthenticator>,
	) -> Self {
		Self { name, header: header.into(), prefix: prefix.into(), authenticator }
	}
}
impl IdentityClient for HeaderClient {
	fn name(&self) -> &ClientName {
		&self.name
	}

	fn is_indirect(&self) -> bool {
		false
	}

	fn credentials(&self, ctx: &mut dyn WebContext) -> Result<Retrieval<Credentials>> {
		let Some(value) = ctx.request_header(&self.header) else {
			return Ok(Retrieval::Missing);
		};
		let Some(token) = value.strip_prefix(&self.prefix) else {
			return Ok(Retrieval::Missing);
		};

		if token.is_empty() {
			return Ok(Retrieval::Missing);
		}

		Ok(Retrieval::Found(Credentials::new(token)))
	}

	fn user_profile(
		&self,
		credentials: &Credentials,
		_ctx: &mut dyn WebContext,
	) -> Result<Option<Profile>> {
		(self.authenticator)(credentials)
	}

	fn initiate_redirect(&self, _ctx: &mut dyn WebContext) -> Result<HttpAction> {
		Err(ConfigError::RedirectUnsupported { client: self.name.to_string() }.into())
	}
}
impl Debug for HeaderClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("HeaderClient")
			.field("name", &self.name)
			.field("header", &self.header)
			.field("prefix", &self.prefix)
			.finish()
	}
}
