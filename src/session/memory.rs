//! Thread-safe in-memory [`SessionStore`] for local development and tests.

// crates.io
use rand::{Rng, distr::Alphanumeric};
// self
use crate::{
	_prelude::*,
	context::{Cookie, WebContext},
	session::{SessionError, SessionId, SessionStore, SessionToken, SessionValue},
};

/// Default name of the cookie carrying the session identifier.
pub const SESSION_COOKIE: &str = "authgate_session";

// Sessions created mid-request are recorded here, because the inbound cookie
// map never reflects a cookie set on the response of the same exchange.
const SESSION_ID_ATTRIBUTE: &str = "authgate.session_id";

const SESSION_ID_LEN: usize = 32;

type Sessions = Arc<RwLock<HashMap<SessionId, BTreeMap<String, SessionValue>>>>;

/// In-process session backend keyed by a random identifier cookie.
///
/// Cloning shares the underlying session map, so one backend can serve every
/// request worker. A store produced by [`from_trackable`](SessionStore::from_trackable)
/// is bound to a fixed identifier and ignores the transport entirely.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
	sessions: Sessions,
	cookie_name: Option<String>,
	bound: Option<SessionId>,
}
impl MemorySessionStore {
	/// Creates a backend using the default cookie name.
	pub fn new() -> Self {
		Self::default()
	}

	/// Overrides the session cookie name.
	pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
		self.cookie_name = Some(name.into());

		self
	}

	fn cookie_name(&self) -> &str {
		self.cookie_name.as_deref().unwrap_or(SESSION_COOKIE)
	}

	fn fresh_id() -> SessionId {
		let id: String =
			rand::rng().sample_iter(&Alphanumeric).take(SESSION_ID_LEN).map(char::from).collect();

		SessionId::new(id)
	}

	fn exists(&self, id: &SessionId) -> bool {
		self.sessions.read().contains_key(id)
	}

	/// Resolves the session the current exchange refers to.
	fn resolve(&self, ctx: &mut dyn WebContext, create: bool) -> Option<SessionId> {
		if let Some(bound) = &self.bound {
			// A bound store never creates; its session either still exists
			// or the handle is stale.
			return self.exists(bound).then(|| bound.clone());
		}

		let from_attribute = ctx
			.request_attribute(SESSION_ID_ATTRIBUTE)
			.and_then(|value| value.as_str().map(|s| SessionId::new(s.to_owned())));

		if let Some(id) = from_attribute
			&& self.exists(&id)
		{
			return Some(id);
		}

		let from_cookie = ctx.request_cookie(self.cookie_name()).map(SessionId::new);

		if let Some(id) = from_cookie
			&& self.exists(&id)
		{
			return Some(id);
		}

		create.then(|| self.create(ctx))
	}

	fn create(&self, ctx: &mut dyn WebContext) -> SessionId {
		let id = Self::fresh_id();

		self.sessions.write().insert(id.clone(), BTreeMap::new());
		self.attach_transport(ctx, &id);

		id
	}

	fn attach_transport(&self, ctx: &mut dyn WebContext, id: &SessionId) {
		ctx.set_cookie(Cookie::new(self.cookie_name(), id.as_str()));
		ctx.set_request_attribute(SESSION_ID_ATTRIBUTE, Some(Value::from(id.as_str())));
	}

	fn detach_transport(&self, ctx: &mut dyn WebContext) {
		ctx.remove_cookie(self.cookie_name());
		ctx.set_request_attribute(SESSION_ID_ATTRIBUTE, None);
	}
}
impl SessionStore for MemorySessionStore {
	fn id(
		&self,
		ctx: &mut dyn WebContext,
		create: bool,
	) -> Result<Option<SessionId>, SessionError> {
		Ok(self.resolve(ctx, create))
	}

	fn get(
		&self,
		ctx: &mut dyn WebContext,
		key: &str,
	) -> Result<Option<SessionValue>, SessionError> {
		let Some(id) = self.resolve(ctx, false) else {
			return Ok(None);
		};

		Ok(self.sessions.read().get(&id).and_then(|attributes| attributes.get(key).cloned()))
	}

	fn set(
		&self,
		ctx: &mut dyn WebContext,
		key: &str,
		value: Option<SessionValue>,
	) -> Result<(), SessionError> {
		// Removals never create a session; there is nothing to remove from.
		let Some(id) = self.resolve(ctx, value.is_some()) else {
			return match value {
				None => Ok(()),
				// Only reachable through a stale bound handle.
				Some(_) => Err(SessionError::Backend {
					message: "bound session no longer exists".into(),
				}),
			};
		};
		let mut sessions = self.sessions.write();
		let Some(attributes) = sessions.get_mut(&id) else {
			return Err(SessionError::Backend { message: "session vanished during write".into() });
		};

		match value {
			Some(value) => {
				attributes.insert(key.to_owned(), value);
			},
			None => {
				attributes.remove(key);
			},
		}

		Ok(())
	}

	fn destroy(&self, ctx: &mut dyn WebContext) -> Result<bool, SessionError> {
		let Some(id) = self.resolve(ctx, false) else {
			return Ok(false);
		};

		self.sessions.write().remove(&id);
		self.detach_transport(ctx);

		Ok(true)
	}

	fn renew(&self, ctx: &mut dyn WebContext) -> Result<bool, SessionError> {
		let Some(old) = self.resolve(ctx, false) else {
			// No prior session: the contract still ends with a valid fresh one.
			self.create(ctx);

			return Ok(true);
		};
		let snapshot = self.sessions.read().get(&old).cloned().unwrap_or_default();

		// Evict the transport reference before invalidating, so the old
		// identifier cannot be honored while the swap is in flight.
		self.detach_transport(ctx);

		let fresh = Self::fresh_id();
		{
			let mut sessions = self.sessions.write();

			sessions.remove(&old);
			sessions.insert(fresh.clone(), snapshot);
		}
		self.attach_transport(ctx, &fresh);

		tracing::debug!(old = %old, new = %fresh, "session renewed");

		Ok(true)
	}

	fn trackable(
		&self,
		ctx: &mut dyn WebContext,
	) -> Result<Option<SessionToken>, SessionError> {
		Ok(self.resolve(ctx, false).map(|id| SessionToken::encode(id.as_str().as_bytes())))
	}

	fn from_trackable(
		&self,
		token: &SessionToken,
	) -> Result<Option<Arc<dyn SessionStore>>, SessionError> {
		let payload = token.decode()?;
		let id = String::from_utf8(payload)
			.map_err(|e| SessionError::MalformedToken { message: e.to_string() })?;
		let store = Self {
			sessions: self.sessions.clone(),
			cookie_name: self.cookie_name.clone(),
			bound: Some(SessionId::new(id)),
		};

		Ok(Some(Arc::new(store)))
	}
}
impl Debug for MemorySessionStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MemorySessionStore")
			.field("cookie_name", &self.cookie_name())
			.field("bound", &self.bound)
			.field("sessions", &self.sessions.read().len())
			.finish()
	}
}
