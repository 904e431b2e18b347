//! Ephemeral credentials extracted from a single request.

// self
use crate::_prelude::*;

/// Credentials carried by one request, opaque beyond their validation instant.
///
/// Values never outlive the request that produced them and are never written
/// to any store; only the [`Profile`](crate::auth::Profile) a client derives
/// from them is persisted. There is deliberately no `Serialize` impl.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	token: String,
	extracted_at: OffsetDateTime,
}
impl Credentials {
	/// Wraps a raw token extracted from the current request.
	pub fn new(token: impl Into<String>) -> Self {
		Self { token: token.into(), extracted_at: OffsetDateTime::now_utc() }
	}

	/// Returns the raw token value.
	pub fn token(&self) -> &str {
		&self.token
	}

	/// Returns the instant the credentials were pulled off the request.
	pub fn extracted_at(&self) -> OffsetDateTime {
		self.extracted_at
	}
}
// The token must not leak into logs.
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("token", &"<redacted>")
			.field("extracted_at", &self.extracted_at)
			.finish()
	}
}
