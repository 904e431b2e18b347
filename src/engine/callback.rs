//! Login-completion flow for indirect clients.
//!
//! The external provider redirects the caller back here with callback
//! credentials. The mediator validates them, renews the session (the
//! session-fixation defense), saves the profile session-scoped, and sends the
//! caller back to the URL that originally triggered the challenge.

// self
use crate::{
	_prelude::*,
	client::{CLIENT_NAME_PARAMETER, IdentityClient, Retrieval},
	config::Config,
	context::WebContext,
	error::ConfigError,
	http::HttpAction,
	session::{self, SessionStore},
	store::ProfileStore,
};

/// Finishes the redirect-based authentication round trip.
#[derive(Clone)]
pub struct CallbackMediator {
	config: Arc<Config>,
	session: Arc<dyn SessionStore>,
	default_url: String,
	default_client: Option<String>,
	multi_profile: bool,
	renew_session: bool,
}
impl CallbackMediator {
	/// Creates a callback mediator redirecting to `/` by default.
	pub fn new(config: Arc<Config>, session: Arc<dyn SessionStore>) -> Self {
		Self {
			config,
			session,
			default_url: "/".into(),
			default_client: None,
			multi_profile: false,
			renew_session: true,
		}
	}

	/// Overrides the post-login redirect target used when no requested URL
	/// was saved.
	pub fn with_default_url(mut self, url: impl Into<String>) -> Self {
		self.default_url = url.into();

		self
	}

	/// Names the client handling callbacks when the request carries no
	/// `client_name` parameter.
	pub fn with_default_client(mut self, client: impl Into<String>) -> Self {
		self.default_client = Some(client.into());

		self
	}

	/// Keeps one profile per client instead of replacing the whole set.
	pub fn with_multi_profile(mut self, multi_profile: bool) -> Self {
		self.multi_profile = multi_profile;

		self
	}

	/// Disables session renewal on login (enabled by default; disabling
	/// forfeits the fixation defense).
	pub fn with_renew_session(mut self, renew_session: bool) -> Self {
		self.renew_session = renew_session;

		self
	}

	/// Handles one callback request and returns the terminal action.
	pub fn handle(&self, ctx: &mut dyn WebContext) -> Result<HttpAction> {
		let client = self.resolve_client(&*ctx)?;

		tracing::debug!(client = %client.name(), "handling authentication callback");

		let credentials = match client.credentials(ctx)? {
			Retrieval::Found(credentials) => Some(credentials),
			Retrieval::Missing => None,
			Retrieval::Action(action) => return Ok(action),
		};

		if let Some(credentials) = credentials
			&& let Some(profile) = client.user_profile(&credentials, ctx)?
		{
			// Renew before saving so the profile only ever lives in the
			// fresh session; an attacker-fixed id never holds it.
			if self.renew_session {
				self.session.renew(ctx)?;
			}

			ProfileStore::new(self.session.clone()).save(
				ctx,
				true,
				client.name().clone(),
				profile,
				self.multi_profile,
			)?;
		}

		let requested_url = self
			.session
			.get(ctx, session::REQUESTED_URL_KEY)?
			.and_then(|value| value.as_str().map(str::to_owned));

		self.session.set(ctx, session::REQUESTED_URL_KEY, None)?;

		let target = requested_url.unwrap_or_else(|| self.default_url.clone());

		tracing::debug!(target = %target, "callback complete; redirecting");

		Ok(HttpAction::redirect(target))
	}

	fn resolve_client(&self, ctx: &dyn WebContext) -> Result<Arc<dyn IdentityClient>> {
		let hinted = ctx.request_parameter(CLIENT_NAME_PARAMETER);
		let name = hinted.as_deref().or(self.default_client.as_deref());
		let client = match name {
			Some(name) => self
				.config
				.clients()
				.get(name)
				.ok_or(ConfigError::UnknownClient { name: name.to_owned() })?,
			// With exactly one indirect client configured, callbacks are
			// unambiguous without a hint.
			None => {
				let mut indirect =
					self.config.clients().all().iter().filter(|client| client.is_indirect());
				let sole = indirect.next().cloned();

				match (sole, indirect.next()) {
					(Some(client), None) => client,
					_ =>
						return Err(ConfigError::UnknownClient {
							name: CLIENT_NAME_PARAMETER.to_owned(),
						}
						.into()),
				}
			},
		};

		if !client.is_indirect() {
			return Err(
				ConfigError::IndirectClientRequired { client: client.name().to_string() }.into()
			);
		}

		Ok(client)
	}
}
impl Debug for CallbackMediator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CallbackMediator")
			.field("default_url", &self.default_url)
			.field("default_client", &self.default_client)
			.field("multi_profile", &self.multi_profile)
			.field("renew_session", &self.renew_session)
			.finish()
	}
}
