//! The authenticate → authorize → challenge state machine guarding a
//! protected resource.

// self
use crate::{
	_prelude::*,
	auth::SecurityAccount,
	authorize,
	client::Retrieval,
	config::Config,
	context::WebContext,
	error::ConfigError,
	http::HttpAction,
	session::{self, SessionStore},
	store::ProfileStore,
};

/// Result of the authentication phase alone.
#[derive(Clone, Debug)]
pub enum Authentication {
	/// A profile was resolved, from the store or from inline validation.
	Authenticated(SecurityAccount),
	/// No profile could be resolved on this request.
	Unauthenticated,
	/// A client required an HTTP action mid-validation; authentication could
	/// not complete this turn.
	Interrupted(HttpAction),
}

/// Terminal decision for one mediated request.
#[derive(Clone, Debug)]
pub enum SecurityDecision {
	/// No configured matcher applied; the request passes through untouched.
	Bypassed,
	/// Authenticated and authorized; delegate to the protected resource.
	Authorized(SecurityAccount),
	/// Authenticated but not permitted; 403, no redirect.
	Forbidden(HttpAction),
	/// Unauthenticated with an indirect client available; redirect into the
	/// external authentication flow.
	Challenge(HttpAction),
	/// Unauthenticated with nothing to redirect to; 401 terminal.
	Unauthorized(HttpAction),
	/// A provider-raised action interrupted validation; terminal.
	Other(HttpAction),
}
impl SecurityDecision {
	/// Whether the wrapped resource should be invoked.
	pub fn grants_access(&self) -> bool {
		matches!(self, Self::Bypassed | Self::Authorized(_))
	}

	/// The HTTP action to realize, when the decision is terminal.
	pub fn action(&self) -> Option<&HttpAction> {
		match self {
			Self::Bypassed | Self::Authorized(_) => None,
			Self::Forbidden(action)
			| Self::Challenge(action)
			| Self::Unauthorized(action)
			| Self::Other(action) => Some(action),
		}
	}
}

/// Mediates access to one protected resource.
///
/// Stateless and safely shared: all request state lives in the context and
/// the session backend. Collaborators arrive through the constructor; there
/// is no global registry.
#[derive(Clone)]
pub struct SecurityMediator {
	config: Arc<Config>,
	session: Arc<dyn SessionStore>,
	clients: Option<String>,
	authorizers: Option<String>,
	matchers: Option<String>,
	multi_profile: bool,
}
impl SecurityMediator {
	/// Creates a mediator over the given configuration and session store.
	pub fn new(config: Arc<Config>, session: Arc<dyn SessionStore>) -> Self {
		Self {
			config,
			session,
			clients: None,
			authorizers: None,
			matchers: None,
			multi_profile: false,
		}
	}

	/// Restricts candidate clients to a comma-separated allow-list.
	pub fn with_clients(mut self, clients: impl Into<String>) -> Self {
		self.clients = Some(clients.into());

		self
	}

	/// Requires the named authorizers (comma-separated, AND-ed).
	pub fn with_authorizers(mut self, authorizers: impl Into<String>) -> Self {
		self.authorizers = Some(authorizers.into());

		self
	}

	/// Applies the named matchers before engaging security.
	pub fn with_matchers(mut self, matchers: impl Into<String>) -> Self {
		self.matchers = Some(matchers.into());

		self
	}

	/// Keeps one profile per client instead of replacing the whole set.
	pub fn with_multi_profile(mut self, multi_profile: bool) -> Self {
		self.multi_profile = multi_profile;

		self
	}

	/// Runs the full state machine for one request.
	pub fn check(&self, ctx: &mut dyn WebContext) -> Result<SecurityDecision> {
		if !self.applies(&*ctx)? {
			tracing::debug!("no matcher applied; bypassing security");

			return Ok(SecurityDecision::Bypassed);
		}

		match self.authenticate(ctx)? {
			Authentication::Interrupted(action) => {
				tracing::debug!(status = action.status, "validation interrupted by client action");

				Ok(SecurityDecision::Other(action))
			},
			Authentication::Authenticated(account) => {
				tracing::debug!(principal = account.principal(), "authenticated");

				if authorize::check(
					&*ctx,
					account.profiles(),
					self.authorizers.as_deref(),
					self.config.authorizers(),
				)? {
					Ok(SecurityDecision::Authorized(account))
				} else {
					// The caller proved an identity that is simply not
					// permitted; no redirect.
					Ok(SecurityDecision::Forbidden(HttpAction::forbidden()))
				}
			},
			Authentication::Unauthenticated => {
				let action = self.challenge(ctx)?;

				if action.is_redirect() {
					Ok(SecurityDecision::Challenge(action))
				} else {
					Ok(SecurityDecision::Unauthorized(action))
				}
			},
		}
	}

	/// Resolves an existing profile or performs inline direct validation.
	///
	/// Indirect clients are never probed here; they cannot validate without
	/// the external round trip having occurred.
	pub fn authenticate(&self, ctx: &mut dyn WebContext) -> Result<Authentication> {
		let candidates = self.config.clients().find(&*ctx, self.clients.as_deref())?;
		let names: Vec<&str> = candidates.iter().map(|client| client.name().as_ref()).collect();
		let use_session = ProfileStore::use_session(&candidates);

		tracing::debug!(candidates = ?names, use_session, "resolved candidate clients");

		let store = ProfileStore::new(self.session.clone());
		let mut profiles = store.get(ctx, use_session)?;

		if profiles.is_empty() {
			for client in &candidates {
				if client.is_indirect() {
					continue;
				}

				tracing::debug!(client = %client.name(), "probing direct client");

				let credentials = match client.credentials(ctx)? {
					Retrieval::Found(credentials) => credentials,
					Retrieval::Missing => continue,
					Retrieval::Action(action) => return Ok(Authentication::Interrupted(action)),
				};
				let Some(profile) = client.user_profile(&credentials, ctx)? else {
					continue;
				};

				store.save(
					ctx,
					use_session,
					client.name().clone(),
					profile.clone(),
					self.multi_profile,
				)?;
				profiles.insert(client.name().clone(), profile);

				break;
			}
		}

		match SecurityAccount::from_profiles(&profiles) {
			Some(account) => Ok(Authentication::Authenticated(account)),
			None => Ok(Authentication::Unauthenticated),
		}
	}

	/// Starts the external authentication flow, or denies terminally.
	///
	/// Only the first candidate determines challenge behavior: simultaneous
	/// multi-client challenges are not supported.
	pub fn challenge(&self, ctx: &mut dyn WebContext) -> Result<HttpAction> {
		let candidates = self.config.clients().find(&*ctx, self.clients.as_deref())?;
		let Some(first) = candidates.first() else {
			return Ok(HttpAction::unauthorized());
		};

		if !first.is_indirect() {
			return Ok(HttpAction::unauthorized());
		}

		let requested_url = ctx.full_request_url();

		self.session.set(ctx, session::REQUESTED_URL_KEY, Some(Value::from(requested_url)))?;

		tracing::debug!(client = %first.name(), "issuing authentication challenge");

		first.initiate_redirect(ctx)
	}

	fn applies(&self, ctx: &dyn WebContext) -> Result<bool> {
		let names = self
			.matchers
			.as_deref()
			.unwrap_or_default()
			.split(',')
			.map(str::trim)
			.filter(|name| !name.is_empty());

		for name in names {
			let Some(matcher) = self.config.matchers().get(name) else {
				return Err(ConfigError::UnknownMatcher { name: name.to_owned() }.into());
			};

			if !matcher.matches(ctx) {
				return Ok(false);
			}
		}

		Ok(true)
	}
}
impl Debug for SecurityMediator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SecurityMediator")
			.field("clients", &self.clients)
			.field("authorizers", &self.authorizers)
			.field("matchers", &self.matchers)
			.field("multi_profile", &self.multi_profile)
			.finish()
	}
}
