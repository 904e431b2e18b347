//! Named applicability matchers: do the security rules apply to this request?

// self
use crate::{_prelude::*, context::WebContext};

/// A named pure predicate deciding whether security mediation applies.
///
/// When a configured matcher declines, the mediator bypasses authentication
/// entirely and lets the request through anonymously. Matchers never deny
/// access.
pub trait Matcher
where
	Self: Send + Sync,
{
	/// Whether mediation applies to this request.
	fn matches(&self, ctx: &dyn WebContext) -> bool;
}

/// Matches requests whose URL path starts with a fixed prefix.
#[derive(Clone, Debug)]
pub struct PathPrefixMatcher(String);
impl PathPrefixMatcher {
	/// Creates a matcher for the given path prefix.
	pub fn new(prefix: impl Into<String>) -> Self {
		Self(prefix.into())
	}
}
impl Matcher for PathPrefixMatcher {
	fn matches(&self, ctx: &dyn WebContext) -> bool {
		Url::parse(&ctx.full_request_url())
			.map(|url| url.path().starts_with(&self.0))
			.unwrap_or(false)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet::TestWebContext;

	#[test]
	fn path_prefix_matcher_inspects_the_url_path() {
		let matcher = PathPrefixMatcher::new("/api");

		assert!(matcher.matches(&TestWebContext::new("http://localhost/api/users?x=1")));
		assert!(!matcher.matches(&TestWebContext::new("http://localhost/public")));
		assert!(!matcher.matches(&TestWebContext::new("not a url")));
	}
}
