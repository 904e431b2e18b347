//! Terminal HTTP outcomes expressed as plain values.
//!
//! Every decision that must reach the transport (401, 403, 302 + `Location`)
//! is an [`HttpAction`]. Actions are produced deep inside the engine and
//! collapse into a concrete server response at exactly one seam, the
//! [`HttpActionAdapter`]. No control flow in this crate relies on exceptions
//! or errors to carry a redirect.

// self
use crate::{_prelude::*, context::WebContext};

/// Well-known status codes used by the engine.
pub mod status {
	/// Plain success with no auth artifact.
	pub const OK: u16 = 200;
	/// Temporary redirect used for challenges and post-login redirects.
	pub const FOUND: u16 = 302;
	/// Authentication required and no redirect target exists.
	pub const UNAUTHORIZED: u16 = 401;
	/// Authenticated but not permitted.
	pub const FORBIDDEN: u16 = 403;
}

const LOCATION: &str = "Location";

/// An abstract HTTP response: a status code plus optional headers and body.
///
/// Constructed by the engine and by [`IdentityClient`](crate::client::IdentityClient)
/// implementations, translated by an [`HttpActionAdapter`] at the boundary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpAction {
	/// Response status code.
	pub status: u16,
	/// Response headers in write order.
	pub headers: Vec<(String, String)>,
	/// Optional response body.
	pub body: Option<String>,
}
impl HttpAction {
	/// Creates an action carrying only a status code.
	pub fn with_status(status: u16) -> Self {
		Self { status, headers: Vec::new(), body: None }
	}

	/// Creates a 200 action with no body.
	pub fn ok() -> Self {
		Self::with_status(status::OK)
	}

	/// Creates a 401 terminal action.
	pub fn unauthorized() -> Self {
		Self::with_status(status::UNAUTHORIZED)
	}

	/// Creates a 403 terminal action.
	pub fn forbidden() -> Self {
		Self::with_status(status::FORBIDDEN)
	}

	/// Creates a 302 action pointing at `location`.
	pub fn redirect(location: impl Into<String>) -> Self {
		Self::with_status(status::FOUND).with_header(LOCATION, location)
	}

	/// Appends a response header.
	pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Attaches a response body.
	pub fn with_body(mut self, body: impl Into<String>) -> Self {
		self.body = Some(body.into());

		self
	}

	/// Returns the `Location` header value, if the action is a redirect.
	pub fn location(&self) -> Option<&str> {
		self.headers
			.iter()
			.find(|(name, _)| name.eq_ignore_ascii_case(LOCATION))
			.map(|(_, value)| value.as_str())
	}

	/// Whether the action is a redirect-class response.
	pub fn is_redirect(&self) -> bool {
		(300..400).contains(&self.status)
	}
}

/// The single seam through which terminal outcomes reach the transport.
///
/// Implementations translate an abstract action into the concrete server's
/// response type. [`WebContextActionAdapter`] covers servers whose response is
/// written through the [`WebContext`] itself.
pub trait HttpActionAdapter
where
	Self: Send + Sync,
{
	/// Concrete response produced by the transport.
	type Response;

	/// Realizes `action` against the live request/response context.
	fn adapt(&self, action: &HttpAction, ctx: &mut dyn WebContext) -> Self::Response;
}

/// Adapter that writes the action straight into the [`WebContext`].
#[derive(Clone, Copy, Debug, Default)]
pub struct WebContextActionAdapter;
impl HttpActionAdapter for WebContextActionAdapter {
	type Response = ();

	fn adapt(&self, action: &HttpAction, ctx: &mut dyn WebContext) {
		ctx.set_response_status(action.status);

		for (name, value) in &action.headers {
			ctx.set_response_header(name, value);
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::TestWebContext;

	#[test]
	fn adapter_writes_status_and_headers_into_the_context() {
		let action = HttpAction::unauthorized().with_header("WWW-Authenticate", "Bearer");
		let mut ctx = TestWebContext::new("http://localhost/secure");

		WebContextActionAdapter.adapt(&action, &mut ctx);

		assert_eq!(ctx.response_status, Some(status::UNAUTHORIZED));
		assert_eq!(
			ctx.response_headers,
			vec![("WWW-Authenticate".to_owned(), "Bearer".to_owned())]
		);
	}

	#[test]
	fn redirect_actions_expose_their_location() {
		let action = HttpAction::redirect("https://idp.example.com/login");

		assert_eq!(action.status, status::FOUND);
		assert!(action.is_redirect());
		assert_eq!(action.location(), Some("https://idp.example.com/login"));
	}

	#[test]
	fn terminal_actions_carry_no_location() {
		assert_eq!(HttpAction::unauthorized().location(), None);
		assert_eq!(HttpAction::forbidden().status, status::FORBIDDEN);
		assert!(!HttpAction::ok().is_redirect());
	}
}
