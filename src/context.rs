//! The request/response collaborator boundary.
//!
//! The engine never talks to a concrete HTTP server. It reads parameters,
//! headers, and cookies and writes responses through [`WebContext`], which a
//! framework binding implements once per server. Request attributes double as
//! the request-scoped cache used by stateless flows.

// self
use crate::_prelude::*;

/// A cookie written back to the caller.
///
/// Parsing of inbound cookies is the transport's job; this crate only needs
/// the name/value pair plus the flags a session cookie must carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cookie {
	/// Cookie name.
	pub name: String,
	/// Cookie value.
	pub value: String,
	/// Path scope, defaulting to `/`.
	pub path: String,
	/// Whether the cookie is hidden from client-side scripts.
	pub http_only: bool,
	/// Whether the cookie is restricted to TLS transports.
	pub secure: bool,
}
impl Cookie {
	/// Creates a `/`-scoped, HTTP-only cookie.
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			path: "/".into(),
			http_only: true,
			secure: false,
		}
	}

	/// Marks the cookie as TLS-only.
	pub fn secure(mut self) -> Self {
		self.secure = true;

		self
	}
}

/// Read/write view over one in-flight HTTP exchange.
///
/// Implementations are owned by a single request worker; nothing here is
/// shared across requests, so no method requires internal synchronization.
pub trait WebContext {
	/// Returns a query or form parameter by name.
	fn request_parameter(&self, name: &str) -> Option<String>;

	/// Returns a request header by name (case-insensitive).
	fn request_header(&self, name: &str) -> Option<String>;

	/// Returns the value of an inbound cookie.
	fn request_cookie(&self, name: &str) -> Option<String>;

	/// Returns the full reconstructed request URL, including the query string.
	fn full_request_url(&self) -> String;

	/// Returns an arbitrary per-request attribute.
	fn request_attribute(&self, name: &str) -> Option<Value>;

	/// Sets (or removes, on `None`) a per-request attribute.
	fn set_request_attribute(&mut self, name: &str, value: Option<Value>);

	/// Sets the response status code.
	fn set_response_status(&mut self, status: u16);

	/// Sets a response header.
	fn set_response_header(&mut self, name: &str, value: &str);

	/// Writes a cookie onto the response.
	fn set_cookie(&mut self, cookie: Cookie);

	/// Evicts a cookie: the caller must stop presenting its current value.
	fn remove_cookie(&mut self, name: &str);
}
