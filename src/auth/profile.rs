//! Authenticated identity snapshots and the insertion-ordered profile set.

// self
use crate::{_prelude::*, auth::ClientName};

/// A resolved authenticated identity: stable id, roles, open attribute map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	/// Stable identifier of the authenticated subject.
	pub id: String,
	/// Role names, insertion-ordered, without duplicates.
	pub roles: Vec<String>,
	/// Open attribute map for provider-specific data.
	pub attributes: BTreeMap<String, Value>,
}
impl Profile {
	/// Creates a profile with no roles or attributes.
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into(), roles: Vec::new(), attributes: BTreeMap::new() }
	}

	/// Adds a role, ignoring duplicates.
	pub fn with_role(mut self, role: impl Into<String>) -> Self {
		self.add_role(role);

		self
	}

	/// Adds an attribute.
	pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
		self.attributes.insert(name.into(), value);

		self
	}

	/// Adds a role in place, ignoring duplicates.
	pub fn add_role(&mut self, role: impl Into<String>) {
		let role = role.into();

		if !self.roles.iter().any(|existing| existing == &role) {
			self.roles.push(role);
		}
	}

	/// Whether the profile carries the given role.
	pub fn has_role(&self, role: &str) -> bool {
		self.roles.iter().any(|existing| existing == role)
	}
}

/// Insertion-ordered map of profiles keyed by the client that produced them.
///
/// One request may carry zero, one, or many profiles (multi-profile mode).
/// Re-inserting under an existing key overwrites the value but preserves the
/// original position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSet(Vec<(ClientName, Profile)>);
impl ProfileSet {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a set holding a single profile.
	pub fn single(client: ClientName, profile: Profile) -> Self {
		Self(vec![(client, profile)])
	}

	/// Inserts or replaces the profile produced by `client`.
	pub fn insert(&mut self, client: ClientName, profile: Profile) {
		if let Some(slot) = self.0.iter_mut().find(|(existing, _)| existing == &client) {
			slot.1 = profile;
		} else {
			self.0.push((client, profile));
		}
	}

	/// Returns the profile produced by `client`.
	pub fn get(&self, client: &str) -> Option<&Profile> {
		self.0.iter().find(|(existing, _)| existing.as_ref() == client).map(|(_, p)| p)
	}

	/// Returns the first profile in insertion order.
	pub fn first(&self) -> Option<&Profile> {
		self.0.first().map(|(_, p)| p)
	}

	/// Iterates entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&ClientName, &Profile)> {
		self.0.iter().map(|(name, profile)| (name, profile))
	}

	/// Number of profiles in the set.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the set holds no profile.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn client(name: &str) -> ClientName {
		ClientName::new(name).expect("Client name fixture should be valid.")
	}

	#[test]
	fn roles_deduplicate_but_keep_order() {
		let profile = Profile::new("u1").with_role("admin").with_role("user").with_role("admin");

		assert_eq!(profile.roles, vec!["admin", "user"]);
		assert!(profile.has_role("user"));
		assert!(!profile.has_role("superadmin"));
	}

	#[test]
	fn profile_set_preserves_insertion_order_on_overwrite() {
		let mut set = ProfileSet::new();

		set.insert(client("oidc"), Profile::new("u1"));
		set.insert(client("token"), Profile::new("u2"));
		set.insert(client("oidc"), Profile::new("u3"));

		let order: Vec<_> = set.iter().map(|(name, profile)| (name.as_ref(), profile.id.as_str())).collect();

		assert_eq!(order, vec![("oidc", "u3"), ("token", "u2")]);
		assert_eq!(set.first().map(|p| p.id.as_str()), Some("u3"));
	}

	#[test]
	fn profile_set_serde_round_trip_keeps_order() {
		let mut set = ProfileSet::new();

		set.insert(client("b"), Profile::new("u-b"));
		set.insert(client("a"), Profile::new("u-a").with_role("admin"));

		let payload = serde_json::to_value(&set).expect("Profile set should serialize.");
		let round_trip: ProfileSet =
			serde_json::from_value(payload).expect("Profile set should deserialize.");

		assert_eq!(round_trip, set);
		assert_eq!(round_trip.first().map(|p| p.id.as_str()), Some("u-b"));
	}
}
