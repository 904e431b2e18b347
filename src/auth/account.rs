//! The read view over resolved profiles handed to the protected resource.

// self
use crate::{_prelude::*, auth::profile::ProfileSet};

/// Security context built from the resolved profile set.
///
/// Exposes the principal name (id of the first profile in insertion order)
/// and the union of all roles. Owned by the request for its duration; never
/// persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecurityAccount {
	principal: String,
	roles: Vec<String>,
	profiles: ProfileSet,
}
impl SecurityAccount {
	/// Builds the account view, or `None` when no profile was resolved.
	pub fn from_profiles(profiles: &ProfileSet) -> Option<Self> {
		let principal = profiles.first()?.id.clone();
		let mut roles = Vec::new();

		for (_, profile) in profiles.iter() {
			for role in &profile.roles {
				if !roles.iter().any(|existing: &String| existing == role) {
					roles.push(role.clone());
				}
			}
		}

		Some(Self { principal, roles, profiles: profiles.clone() })
	}

	/// Principal name, taken from the first resolved profile.
	pub fn principal(&self) -> &str {
		&self.principal
	}

	/// Union of all roles across the profile set, insertion-ordered.
	pub fn roles(&self) -> &[String] {
		&self.roles
	}

	/// Whether any resolved profile carries the role.
	pub fn has_role(&self, role: &str) -> bool {
		self.roles.iter().any(|existing| existing == role)
	}

	/// The underlying profile set.
	pub fn profiles(&self) -> &ProfileSet {
		&self.profiles
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{ClientName, Profile};

	fn client(name: &str) -> ClientName {
		ClientName::new(name).expect("Client name fixture should be valid.")
	}

	#[test]
	fn empty_profile_set_yields_no_account() {
		assert!(SecurityAccount::from_profiles(&ProfileSet::new()).is_none());
	}

	#[test]
	fn account_unions_roles_and_takes_first_principal() {
		let mut set = ProfileSet::new();

		set.insert(client("oidc"), Profile::new("u1").with_role("user").with_role("admin"));
		set.insert(client("token"), Profile::new("u2").with_role("admin").with_role("audit"));

		let account = SecurityAccount::from_profiles(&set)
			.expect("Non-empty profile set should yield an account.");

		assert_eq!(account.principal(), "u1");
		assert_eq!(account.roles(), &["user", "admin", "audit"]);
		assert!(account.has_role("audit"));
		assert!(!account.has_role("superadmin"));
	}
}
