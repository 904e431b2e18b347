//! Immutable security configuration: clients, authorizers, matchers.
//!
//! Built once at startup and shared read-only across requests. All wiring is
//! explicit dependency injection; there is no process-wide mutable registry.

// self
use crate::{
	_prelude::*,
	auth::{AuthorizerName, MatcherName},
	authorize::Authorizer,
	client::{ClientRegistry, IdentityClient},
	error::ConfigError,
	matcher::Matcher,
};

/// The configuration object consumed by the engine mediators.
#[derive(Clone)]
pub struct Config {
	clients: ClientRegistry,
	authorizers: BTreeMap<AuthorizerName, Arc<dyn Authorizer>>,
	matchers: BTreeMap<MatcherName, Arc<dyn Matcher>>,
}
impl Config {
	/// Starts building a configuration.
	pub fn builder() -> ConfigBuilder {
		ConfigBuilder::default()
	}

	/// The configured client registry.
	pub fn clients(&self) -> &ClientRegistry {
		&self.clients
	}

	/// The configured named authorizers.
	pub fn authorizers(&self) -> &BTreeMap<AuthorizerName, Arc<dyn Authorizer>> {
		&self.authorizers
	}

	/// The configured named matchers.
	pub fn matchers(&self) -> &BTreeMap<MatcherName, Arc<dyn Matcher>> {
		&self.matchers
	}
}
impl Debug for Config {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Config")
			.field("clients", &self.clients)
			.field("authorizers", &self.authorizers.keys().collect::<Vec<_>>())
			.field("matchers", &self.matchers.keys().collect::<Vec<_>>())
			.finish()
	}
}

/// Builder collecting clients, authorizers, and matchers.
#[derive(Default)]
pub struct ConfigBuilder {
	clients: Vec<Arc<dyn IdentityClient>>,
	authorizers: Vec<(String, Arc<dyn Authorizer>)>,
	matchers: Vec<(String, Arc<dyn Matcher>)>,
}
impl ConfigBuilder {
	/// Registers an identity-provider client; configuration order is
	/// resolution order.
	pub fn client(mut self, client: Arc<dyn IdentityClient>) -> Self {
		self.clients.push(client);

		self
	}

	/// Registers a named authorizer.
	pub fn authorizer(mut self, name: impl Into<String>, authorizer: Arc<dyn Authorizer>) -> Self {
		self.authorizers.push((name.into(), authorizer));

		self
	}

	/// Registers a named matcher.
	pub fn matcher(mut self, name: impl Into<String>, matcher: Arc<dyn Matcher>) -> Self {
		self.matchers.push((name.into(), matcher));

		self
	}

	/// Validates names and builds the immutable configuration.
	pub fn build(self) -> Result<Config, ConfigError> {
		let clients = ClientRegistry::new(self.clients)?;
		let mut authorizers = BTreeMap::new();

		for (name, authorizer) in self.authorizers {
			authorizers.insert(AuthorizerName::new(name)?, authorizer);
		}

		let mut matchers = BTreeMap::new();

		for (name, matcher) in self.matchers {
			matchers.insert(MatcherName::new(name)?, matcher);
		}

		Ok(Config { clients, authorizers, matchers })
	}
}
