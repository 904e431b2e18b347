//! Session storage contract, reserved keys, and the trackable session handle.

pub mod memory;

pub use memory::MemorySessionStore;

// self
use crate::{_prelude::*, context::WebContext};

/// Reserved session key holding the serialized profile set.
///
/// Namespaced so it cannot collide with application-chosen attributes.
pub const PROFILES_KEY: &str = "authgate.profiles";
/// Reserved session key holding the URL to return to after authentication.
pub const REQUESTED_URL_KEY: &str = "authgate.requested_url";

/// Value type stored under session keys.
pub type SessionValue = Value;

/// Opaque session identifier round-tripped to the caller via a cookie.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(String);
impl SessionId {
	/// Wraps a backend-issued identifier.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// The raw identifier string.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Debug for SessionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "SessionId({})", self.0)
	}
}
impl Display for SessionId {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}

/// Opaque, serializable handle to the current underlying session.
///
/// Lets a later-constructed store instance rebind to the same session without
/// re-resolving it from the transport layer. The payload is an implementation
/// detail of the issuing store; callers only move the string around.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken(String);
impl SessionToken {
	/// Encodes a backend payload into an opaque token.
	pub fn encode(payload: &[u8]) -> Self {
		use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

		Self(URL_SAFE_NO_PAD.encode(payload))
	}

	/// Decodes the backend payload.
	pub fn decode(&self) -> Result<Vec<u8>, SessionError> {
		use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

		URL_SAFE_NO_PAD
			.decode(&self.0)
			.map_err(|e| SessionError::MalformedToken { message: e.to_string() })
	}

	/// The token's wire representation.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl From<String> for SessionToken {
	fn from(value: String) -> Self {
		Self(value)
	}
}

/// Error type produced by [`SessionStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum SessionError {
	/// Attribute (de)serialization failed.
	#[error("Session serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure (network, storage engine).
	#[error("Session backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// A trackable token could not be decoded.
	#[error("Malformed session token: {message}.")]
	MalformedToken {
		/// Human-readable error payload.
		message: String,
	},
}

/// Key-value storage scoped to the caller's session.
///
/// The session is addressed implicitly through the request's transport-level
/// cookie (or a bound handle); every call may hit a network-backed store and
/// must be treated as blocking I/O. Concurrent operations on a single session
/// id are expected to be serialized by the backend.
pub trait SessionStore
where
	Self: Send + Sync,
{
	/// Returns the session id, creating a session first when `create` is set.
	fn id(&self, ctx: &mut dyn WebContext, create: bool)
	-> Result<Option<SessionId>, SessionError>;

	/// Reads an attribute; never creates a session.
	fn get(&self, ctx: &mut dyn WebContext, key: &str)
	-> Result<Option<SessionValue>, SessionError>;

	/// Writes an attribute (removes it on `None`), creating the session on
	/// demand.
	fn set(
		&self,
		ctx: &mut dyn WebContext,
		key: &str,
		value: Option<SessionValue>,
	) -> Result<(), SessionError>;

	/// Invalidates the underlying session; idempotent. Returns whether a
	/// session existed.
	fn destroy(&self, ctx: &mut dyn WebContext) -> Result<bool, SessionError>;

	/// Renews the session id while preserving every attribute.
	///
	/// The transport-level session reference is evicted *before* the old
	/// session is invalidated, so the old identifier can no longer be
	/// honored. With no prior session the call still ends with a valid fresh
	/// one. This is the session-fixation defense invoked on login completion.
	fn renew(&self, ctx: &mut dyn WebContext) -> Result<bool, SessionError>;

	/// Produces an opaque handle to the current session, if one exists.
	fn trackable(&self, ctx: &mut dyn WebContext)
	-> Result<Option<SessionToken>, SessionError>;

	/// Rebinds a fresh store instance to the session behind `token`.
	fn from_trackable(
		&self,
		token: &SessionToken,
	) -> Result<Option<Arc<dyn SessionStore>>, SessionError>;
}
