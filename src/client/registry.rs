//! Configured client set and request-time client resolution.

// self
use crate::{_prelude::*, client::IdentityClient, context::WebContext, error::ConfigError};

/// Request parameter narrowing resolution to a single named client.
pub const CLIENT_NAME_PARAMETER: &str = "client_name";

/// Immutable, configuration-ordered set of identity-provider clients.
///
/// Built once at configuration time; resolution is a pure function of the
/// registry, the optional comma-separated allow-list, and the request hint.
#[derive(Clone)]
pub struct ClientRegistry(Vec<Arc<dyn IdentityClient>>);
impl ClientRegistry {
	/// Builds a registry, rejecting duplicate client names.
	pub fn new(clients: Vec<Arc<dyn IdentityClient>>) -> Result<Self, ConfigError> {
		for (index, client) in clients.iter().enumerate() {
			if clients[..index].iter().any(|other| other.name() == client.name()) {
				return Err(ConfigError::DuplicateClient { name: client.name().to_string() });
			}
		}

		Ok(Self(clients))
	}

	/// Returns the client registered under `name`.
	pub fn get(&self, name: &str) -> Option<Arc<dyn IdentityClient>> {
		self.0.iter().find(|client| client.name().as_ref() == name).cloned()
	}

	/// All clients in configuration order.
	pub fn all(&self) -> &[Arc<dyn IdentityClient>] {
		&self.0
	}

	/// Resolves the clients applicable to the current request.
	///
	/// Candidates are the configured clients filtered by the optional
	/// comma-separated `requested_names` allow-list, in configuration order.
	/// An allow-list entry naming an unregistered client is a configuration
	/// error. A `client_name` request parameter narrows the candidates to
	/// that single client when it is among them; a hint naming a
	/// non-candidate is ignored.
	pub fn find(
		&self,
		ctx: &dyn WebContext,
		requested_names: Option<&str>,
	) -> Result<Vec<Arc<dyn IdentityClient>>, ConfigError> {
		let allowed: Option<Vec<&str>> = requested_names.map(|names| {
			names.split(',').map(str::trim).filter(|name| !name.is_empty()).collect()
		});

		if let Some(names) = &allowed {
			for name in names {
				if self.get(name).is_none() {
					return Err(ConfigError::UnknownClient { name: (*name).to_owned() });
				}
			}
		}

		let candidates: Vec<Arc<dyn IdentityClient>> = self
			.0
			.iter()
			.filter(|client| match &allowed {
				Some(names) => names.iter().any(|name| *name == client.name().as_ref()),
				None => true,
			})
			.cloned()
			.collect();

		if let Some(hint) = ctx.request_parameter(CLIENT_NAME_PARAMETER)
			&& let Some(selected) =
				candidates.iter().find(|client| client.name().as_ref() == hint)
		{
			tracing::debug!(client = %hint, "request hint narrowed client resolution");

			return Ok(vec![selected.clone()]);
		}

		Ok(candidates)
	}
}
impl Debug for ClientRegistry {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let names: Vec<&str> = self.0.iter().map(|client| client.name().as_ref()).collect();

		f.debug_tuple("ClientRegistry").field(&names).finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		_preludet::TestWebContext,
		auth::{ClientName, Credentials, Profile},
		client::Retrieval,
		http::HttpAction,
	};

	struct NamedClient {
		name: ClientName,
		indirect: bool,
	}
	impl NamedClient {
		fn new(name: &str, indirect: bool) -> Arc<dyn IdentityClient> {
			Arc::new(Self {
				name: ClientName::new(name).expect("Client name fixture should be valid."),
				indirect,
			})
		}
	}
	impl IdentityClient for NamedClient {
		fn name(&self) -> &ClientName {
			&self.name
		}

		fn is_indirect(&self) -> bool {
			self.indirect
		}

		fn credentials(&self, _: &mut dyn WebContext) -> Result<Retrieval<Credentials>> {
			Ok(Retrieval::Missing)
		}

		fn user_profile(
			&self,
			_: &Credentials,
			_: &mut dyn WebContext,
		) -> Result<Option<Profile>> {
			Ok(None)
		}

		fn initiate_redirect(&self, _: &mut dyn WebContext) -> Result<HttpAction> {
			Ok(HttpAction::redirect("https://idp.example.com/login"))
		}
	}

	fn registry() -> ClientRegistry {
		ClientRegistry::new(vec![
			NamedClient::new("oidc", true),
			NamedClient::new("token", false),
			NamedClient::new("saml", true),
		])
		.expect("Registry fixture should build.")
	}

	#[test]
	fn duplicate_names_are_rejected() {
		let result =
			ClientRegistry::new(vec![NamedClient::new("x", true), NamedClient::new("x", false)]);

		assert!(matches!(result, Err(ConfigError::DuplicateClient { .. })));
	}

	#[test]
	fn allow_list_filters_in_configuration_order() {
		let ctx = TestWebContext::new("http://localhost/secure");
		let found = registry()
			.find(&ctx, Some("saml, token"))
			.expect("Resolution with a valid allow-list should succeed.");
		let names: Vec<&str> = found.iter().map(|client| client.name().as_ref()).collect();

		// Configuration order wins over allow-list order.
		assert_eq!(names, vec!["token", "saml"]);
	}

	#[test]
	fn unknown_allow_list_entry_is_a_configuration_error() {
		let ctx = TestWebContext::new("http://localhost/secure");
		let result = registry().find(&ctx, Some("token,ghost"));

		assert!(matches!(result, Err(ConfigError::UnknownClient { name }) if name == "ghost"));
	}

	#[test]
	fn request_hint_narrows_to_a_single_candidate() {
		let ctx = TestWebContext::new("http://localhost/secure")
			.with_parameter(CLIENT_NAME_PARAMETER, "saml");
		let found = registry().find(&ctx, None).expect("Resolution should succeed.");

		assert_eq!(found.len(), 1);
		assert_eq!(found[0].name().as_ref(), "saml");
	}

	#[test]
	fn hint_outside_the_allow_list_is_ignored() {
		let ctx = TestWebContext::new("http://localhost/secure")
			.with_parameter(CLIENT_NAME_PARAMETER, "saml");
		let found = registry()
			.find(&ctx, Some("token"))
			.expect("Resolution with an out-of-list hint should succeed.");
		let names: Vec<&str> = found.iter().map(|client| client.name().as_ref()).collect();

		assert_eq!(names, vec!["token"]);
	}
}
