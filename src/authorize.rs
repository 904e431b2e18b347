//! Named authorization rules and the checker that composes them.

// self
use crate::{
	_prelude::*,
	auth::{AuthorizerName, profile::ProfileSet},
	context::WebContext,
	error::ConfigError,
};

/// A named pure predicate over the request context and the resolved profiles.
///
/// Authorizers grant or deny access beyond mere authentication. They are
/// registered once at configuration time and shared read-only; evaluation
/// must have no side effects.
pub trait Authorizer
where
	Self: Send + Sync,
{
	/// Whether the resolved profiles are permitted.
	fn is_authorized(&self, ctx: &dyn WebContext, profiles: &ProfileSet) -> Result<bool>;
}

/// Grants access to any authenticated caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsAuthenticated;
impl Authorizer for IsAuthenticated {
	fn is_authorized(&self, _: &dyn WebContext, profiles: &ProfileSet) -> Result<bool> {
		Ok(!profiles.is_empty())
	}
}

/// Grants access when any resolved profile carries at least one of the roles.
#[derive(Clone, Debug)]
pub struct RequireAnyRole(Vec<String>);
impl RequireAnyRole {
	/// Creates the rule from the accepted role names.
	pub fn new<I, S>(roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(roles.into_iter().map(Into::into).collect())
	}
}
impl Authorizer for RequireAnyRole {
	fn is_authorized(&self, _: &dyn WebContext, profiles: &ProfileSet) -> Result<bool> {
		Ok(profiles
			.iter()
			.any(|(_, profile)| self.0.iter().any(|role| profile.has_role(role))))
	}
}

/// Grants access when every listed role is carried by some resolved profile.
#[derive(Clone, Debug)]
pub struct RequireAllRoles(Vec<String>);
impl RequireAllRoles {
	/// Creates the rule from the required role names.
	pub fn new<I, S>(roles: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(roles.into_iter().map(Into::into).collect())
	}
}
impl Authorizer for RequireAllRoles {
	fn is_authorized(&self, _: &dyn WebContext, profiles: &ProfileSet) -> Result<bool> {
		Ok(self
			.0
			.iter()
			.all(|role| profiles.iter().any(|(_, profile)| profile.has_role(role))))
	}
}

/// Evaluates the comma-separated authorizer filter against the configuration.
///
/// An empty filter reduces to "is authenticated": access is granted whenever
/// a profile was resolved. Named authorizers are AND-ed and the first failing
/// predicate short-circuits. An unregistered name is a configuration error.
pub fn check(
	ctx: &dyn WebContext,
	profiles: &ProfileSet,
	requested_names: Option<&str>,
	configured: &BTreeMap<AuthorizerName, Arc<dyn Authorizer>>,
) -> Result<bool> {
	let names: Vec<&str> = requested_names
		.unwrap_or_default()
		.split(',')
		.map(str::trim)
		.filter(|name| !name.is_empty())
		.collect();

	if names.is_empty() {
		return Ok(!profiles.is_empty());
	}

	for name in names {
		let Some(authorizer) = configured.get(name) else {
			return Err(ConfigError::UnknownAuthorizer { name: name.to_owned() }.into());
		};

		if !authorizer.is_authorized(ctx, profiles)? {
			tracing::debug!(authorizer = name, "authorization denied");

			return Ok(false);
		}
	}

	Ok(true)
}
