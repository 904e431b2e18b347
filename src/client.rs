//! Identity-provider client abstraction: the capability seam between the
//! engine and concrete provider protocols.
//!
//! A client is either *direct* (stateless: credentials arrive with every
//! request, no redirect ever issued) or *indirect* (stateful: authentication
//! requires a redirect to an external provider and a later callback). The
//! engine checks [`IdentityClient::is_indirect`] once per decision point and
//! never downcasts. Provider wire protocols live entirely behind this trait.

pub mod header;
pub mod registry;

pub use header::*;
pub use registry::*;

// self
use crate::{_prelude::*, auth::{ClientName, Credentials, Profile}, context::WebContext, http::HttpAction};

/// Outcome of asking a client for a request-scoped value.
///
/// Replaces exception-as-control-flow: a client that needs the caller to
/// perform an HTTP step returns [`Retrieval::Action`] instead of raising, and
/// the engine collapses the action into a terminal response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Retrieval<T> {
	/// The value was present on the request.
	Found(T),
	/// The request carries no such value; not an error.
	Missing,
	/// The client requires an HTTP action (redirect, challenge header, ...)
	/// before it can produce a value.
	Action(HttpAction),
}
impl<T> Retrieval<T> {
	/// Returns the contained value, if any.
	pub fn found(self) -> Option<T> {
		match self {
			Self::Found(value) => Some(value),
			_ => None,
		}
	}
}

/// Capability set implemented by every identity-provider adapter.
///
/// Constructed once at configuration time and shared read-only across all
/// requests; implementations must not keep per-request state.
pub trait IdentityClient
where
	Self: Send + Sync,
{
	/// Stable name used for registry lookup and `client_name` resolution.
	fn name(&self) -> &ClientName;

	/// Whether authentication requires the external redirect round trip.
	fn is_indirect(&self) -> bool;

	/// Extracts credentials from the current request.
	///
	/// Direct clients read them off the request itself (header, parameter).
	/// Indirect clients only find credentials on the callback leg; on any
	/// other request they return [`Retrieval::Missing`] or an action.
	fn credentials(&self, ctx: &mut dyn WebContext) -> Result<Retrieval<Credentials>>;

	/// Validates credentials and produces the authenticated profile.
	///
	/// May perform blocking I/O (e.g. token introspection); failures are
	/// propagated, never retried here. `None` means the credentials did not
	/// resolve to an identity.
	fn user_profile(
		&self,
		credentials: &Credentials,
		ctx: &mut dyn WebContext,
	) -> Result<Option<Profile>>;

	/// Starts the external authentication round trip.
	///
	/// Only meaningful for indirect clients; direct clients fail with
	/// [`ConfigError::RedirectUnsupported`](crate::error::ConfigError::RedirectUnsupported).
	fn initiate_redirect(&self, ctx: &mut dyn WebContext) -> Result<HttpAction>;
}
