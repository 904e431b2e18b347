//! Validated name newtypes used for registry and configuration lookups.

// std
use std::borrow::Borrow;
// self
use crate::_prelude::*;

macro_rules! def_name {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new name after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, NameError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = NameError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

const NAME_MAX_LEN: usize = 64;

/// Error returned when name validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum NameError {
	/// The name was empty.
	#[error("{kind} name cannot be empty.")]
	Empty {
		/// Kind of name (client, authorizer, matcher).
		kind: &'static str,
	},
	/// The name contains whitespace or a comma.
	#[error("{kind} name contains whitespace or a comma.")]
	ContainsSeparator {
		/// Kind of name (client, authorizer, matcher).
		kind: &'static str,
	},
	/// The name exceeded the allowed character count.
	#[error("{kind} name exceeds {max} characters.")]
	TooLong {
		/// Kind of name (client, authorizer, matcher).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_name! { ClientName, "Stable name of a configured identity-provider client.", "Client" }
def_name! { AuthorizerName, "Name of a configured authorization rule.", "Authorizer" }
def_name! { MatcherName, "Name of a configured applicability matcher.", "Matcher" }

// Commas are forbidden because names travel through comma-separated filters.
fn validate_view(kind: &'static str, view: &str) -> Result<(), NameError> {
	if view.is_empty() {
		return Err(NameError::Empty { kind });
	}
	if view.chars().any(|c| c.is_whitespace() || c == ',') {
		return Err(NameError::ContainsSeparator { kind });
	}
	if view.len() > NAME_MAX_LEN {
		return Err(NameError::TooLong { kind, max: NAME_MAX_LEN });
	}

	Ok(())
}
