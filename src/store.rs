//! Profile persistence: session-scoped for stateful flows, request-scoped for
//! stateless ones.

// self
use crate::{
	_prelude::*,
	auth::{ClientName, Profile, profile::ProfileSet},
	client::IdentityClient,
	context::WebContext,
	session::{self, SessionError, SessionStore},
};

/// Retrieves and saves authenticated profile sets.
///
/// With `use_session == false` the store only touches the request-attribute
/// cache, which is what keeps direct-client flows free of session writes.
#[derive(Clone)]
pub struct ProfileStore(Arc<dyn SessionStore>);
impl ProfileStore {
	/// Creates a store backed by the given session store.
	pub fn new(session: Arc<dyn SessionStore>) -> Self {
		Self(session)
	}

	/// The `use_session` decision rule: true unless the resolved candidate
	/// list is non-empty and its first entry is a direct client.
	pub fn use_session(candidates: &[Arc<dyn IdentityClient>]) -> bool {
		candidates.first().map(|client| client.is_indirect()).unwrap_or(true)
	}

	/// Returns the current profile set for the chosen scope.
	pub fn get(&self, ctx: &mut dyn WebContext, use_session: bool) -> Result<ProfileSet> {
		let raw = if use_session {
			self.0.get(ctx, session::PROFILES_KEY)?
		} else {
			ctx.request_attribute(session::PROFILES_KEY)
		};
		let Some(raw) = raw else {
			return Ok(ProfileSet::new());
		};
		let profiles = serde_json::from_value(raw)
			.map_err(|e| SessionError::Serialization { message: e.to_string() })?;

		Ok(profiles)
	}

	/// Saves a profile under its producing client's name.
	///
	/// Without `multi_profile` the incoming profile replaces the whole set;
	/// with it, the profile is merged in, preserving insertion order and
	/// overwriting only the same key.
	pub fn save(
		&self,
		ctx: &mut dyn WebContext,
		use_session: bool,
		client: ClientName,
		profile: Profile,
		multi_profile: bool,
	) -> Result<()> {
		let profiles = if multi_profile {
			let mut existing = self.get(ctx, use_session)?;

			existing.insert(client, profile);

			existing
		} else {
			ProfileSet::single(client, profile)
		};
		let raw = serde_json::to_value(&profiles)
			.map_err(|e| SessionError::Serialization { message: e.to_string() })?;

		if use_session {
			self.0.set(ctx, session::PROFILES_KEY, Some(raw))?;
		} else {
			ctx.set_request_attribute(session::PROFILES_KEY, Some(raw));
		}

		Ok(())
	}

	/// Clears the profile set from the chosen scope.
	pub fn remove(&self, ctx: &mut dyn WebContext, use_session: bool) -> Result<()> {
		if use_session {
			self.0.set(ctx, session::PROFILES_KEY, None)?;
		} else {
			ctx.set_request_attribute(session::PROFILES_KEY, None);
		}

		Ok(())
	}
}
impl Debug for ProfileStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ProfileStore(..)")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::TestWebContext, session::MemorySessionStore};

	fn client(name: &str) -> ClientName {
		ClientName::new(name).expect("Client name fixture should be valid.")
	}

	fn store() -> ProfileStore {
		ProfileStore::new(Arc::new(MemorySessionStore::new()))
	}

	#[test]
	fn use_session_follows_the_first_candidate() {
		let indirect = Arc::new(crate::_preludet::StubIndirectClient::new(
			"oidc",
			"https://idp.example.com/login",
		)) as Arc<dyn IdentityClient>;
		let direct = crate::_preludet::bearer_client("token", "letmein", Profile::new("u1"));

		// An empty candidate list keeps the session in play.
		assert!(ProfileStore::use_session(&[]));
		assert!(ProfileStore::use_session(&[indirect.clone(), direct.clone()]));
		assert!(!ProfileStore::use_session(&[direct, indirect]));
	}

	#[test]
	fn request_scope_round_trip_touches_no_session() {
		let store = store();
		let mut ctx = TestWebContext::new("http://localhost/secure");

		store
			.save(&mut ctx, false, client("token"), Profile::new("u1"), false)
			.expect("Request-scoped save should succeed.");

		let profiles =
			store.get(&mut ctx, false).expect("Request-scoped read should succeed.");

		assert_eq!(profiles.get("token").map(|p| p.id.as_str()), Some("u1"));
		// No session was created, so no session cookie was issued.
		assert!(ctx.response_cookies.is_empty());
	}

	#[test]
	fn session_scope_round_trip() {
		let store = store();
		let mut ctx = TestWebContext::new("http://localhost/secure");

		store
			.save(&mut ctx, true, client("oidc"), Profile::new("u2").with_role("user"), false)
			.expect("Session-scoped save should succeed.");

		let profiles = store.get(&mut ctx, true).expect("Session-scoped read should succeed.");

		assert_eq!(profiles.get("oidc").map(|p| p.id.as_str()), Some("u2"));
		// Scopes never bleed into each other.
		assert!(store.get(&mut ctx, false).expect("Read should succeed.").is_empty());
	}

	#[test]
	fn multi_profile_merges_and_single_replaces() {
		let store = store();
		let mut ctx = TestWebContext::new("http://localhost/secure");

		store
			.save(&mut ctx, true, client("oidc"), Profile::new("u1"), true)
			.expect("First multi-profile save should succeed.");
		store
			.save(&mut ctx, true, client("token"), Profile::new("u2"), true)
			.expect("Second multi-profile save should succeed.");

		let merged = store.get(&mut ctx, true).expect("Read should succeed.");

		assert_eq!(merged.len(), 2);
		assert_eq!(merged.first().map(|p| p.id.as_str()), Some("u1"));

		store
			.save(&mut ctx, true, client("saml"), Profile::new("u3"), false)
			.expect("Single-profile save should succeed.");

		let replaced = store.get(&mut ctx, true).expect("Read should succeed.");

		assert_eq!(replaced.len(), 1);
		assert_eq!(replaced.get("saml").map(|p| p.id.as_str()), Some("u3"));
	}

	#[test]
	fn remove_clears_the_chosen_scope() {
		let store = store();
		let mut ctx = TestWebContext::new("http://localhost/secure");

		store
			.save(&mut ctx, true, client("oidc"), Profile::new("u1"), false)
			.expect("Save should succeed.");
		store.remove(&mut ctx, true).expect("Removal should succeed.");

		assert!(store.get(&mut ctx, true).expect("Read should succeed.").is_empty());
	}
}
