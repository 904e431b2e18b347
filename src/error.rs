//! Crate-level error types shared across the registry, stores, and engine.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Expected outcomes (redirects, denials, 401/403 responses) are never errors;
/// they travel as [`HttpAction`](crate::http::HttpAction) values. Only broken
/// configuration, failing session backends, and failing client implementations
/// surface here.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; fatal, never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Session-backend failure; surfaced as a 5xx-class outcome, never
	/// silently treated as "no session".
	#[error("{0}")]
	Session(
		#[from]
		#[source]
		crate::session::SessionError,
	),
	/// An identity-provider client implementation failed (e.g. token
	/// introspection I/O); propagated, never retried here.
	#[error("Identity client `{client}` failed.")]
	Client {
		/// Name of the failing client.
		client: String,
		/// Underlying client failure.
		#[source]
		source: BoxError,
	},
}
impl Error {
	/// Wraps a client-implementation failure.
	pub fn client(
		client: impl Into<String>,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Client { client: client.into(), source: Box::new(src) }
	}
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A requested client name is not present in the registry.
	#[error("Client `{name}` is not registered.")]
	UnknownClient {
		/// Requested client name.
		name: String,
	},
	/// A requested authorizer name is not present in the configuration.
	#[error("Authorizer `{name}` is not registered.")]
	UnknownAuthorizer {
		/// Requested authorizer name.
		name: String,
	},
	/// A requested matcher name is not present in the configuration.
	#[error("Matcher `{name}` is not registered.")]
	UnknownMatcher {
		/// Requested matcher name.
		name: String,
	},
	/// Two clients were registered under the same name.
	#[error("Client `{name}` is registered twice.")]
	DuplicateClient {
		/// Conflicting client name.
		name: String,
	},
	/// A redirect was requested from a client that never redirects.
	#[error("Client `{client}` is a direct client and cannot initiate a redirect.")]
	RedirectUnsupported {
		/// Name of the direct client.
		client: String,
	},
	/// A callback was routed to a client that does not participate in
	/// redirect-based authentication.
	#[error("Client `{client}` is not an indirect client; callbacks do not apply.")]
	IndirectClientRequired {
		/// Name of the offending client.
		client: String,
	},
	/// A configured name failed identifier validation.
	#[error(transparent)]
	InvalidName(#[from] crate::auth::NameError),
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::session::SessionError;

	#[test]
	fn session_error_converts_into_crate_error_with_source() {
		let session_error = SessionError::Backend { message: "session backend unreachable".into() };
		let error: Error = session_error.clone().into();

		assert!(matches!(error, Error::Session(_)));
		assert!(error.to_string().contains("session backend unreachable"));

		let source = std::error::Error::source(&error)
			.expect("Crate error should expose the original session error as its source.");

		assert_eq!(source.to_string(), session_error.to_string());
	}

	#[test]
	fn config_error_is_fatal_and_descriptive() {
		let error: Error = ConfigError::UnknownAuthorizer { name: "admin".into() }.into();

		assert_eq!(error.to_string(), "Authorizer `admin` is not registered.");
	}
}
