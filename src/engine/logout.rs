//! Local logout flow: drop the profiles, kill the session, redirect.

// self
use crate::{
	_prelude::*,
	context::WebContext,
	http::HttpAction,
	session::SessionStore,
	store::ProfileStore,
};

/// Parameter naming the post-logout redirect target.
pub const URL_PARAMETER: &str = "url";

/// Terminates the caller's authenticated state.
#[derive(Clone)]
pub struct LogoutMediator {
	session: Arc<dyn SessionStore>,
	default_url: Option<String>,
	destroy_session: bool,
}
impl LogoutMediator {
	/// Creates a logout mediator that destroys the session by default.
	pub fn new(session: Arc<dyn SessionStore>) -> Self {
		Self { session, default_url: None, destroy_session: true }
	}

	/// Sets the redirect target used when the request names none.
	pub fn with_default_url(mut self, url: impl Into<String>) -> Self {
		self.default_url = Some(url.into());

		self
	}

	/// Keeps the session alive, removing only the profiles.
	pub fn with_destroy_session(mut self, destroy_session: bool) -> Self {
		self.destroy_session = destroy_session;

		self
	}

	/// Handles one logout request and returns the terminal action.
	pub fn handle(&self, ctx: &mut dyn WebContext) -> Result<HttpAction> {
		let store = ProfileStore::new(self.session.clone());

		store.remove(ctx, false)?;
		store.remove(ctx, true)?;

		if self.destroy_session {
			let existed = self.session.destroy(ctx)?;

			tracing::debug!(existed, "session destroyed on logout");
		}

		let requested = ctx.request_parameter(URL_PARAMETER).filter(|url| is_relative(url));
		let target = requested.or_else(|| self.default_url.clone());

		match target {
			Some(target) => Ok(HttpAction::redirect(target)),
			None => Ok(HttpAction::ok()),
		}
	}
}
impl Debug for LogoutMediator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("LogoutMediator")
			.field("default_url", &self.default_url)
			.field("destroy_session", &self.destroy_session)
			.finish()
	}
}

// Only same-site relative targets are honored; an absolute URL in the `url`
// parameter is an open-redirect vector.
fn is_relative(url: &str) -> bool {
	if Url::parse(url).is_ok() {
		return false;
	}

	url.starts_with('/') && !url.starts_with("//")
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn absolute_and_scheme_relative_targets_are_rejected() {
		assert!(is_relative("/home"));
		assert!(is_relative("/a/b?c=d"));
		assert!(!is_relative("https://evil.example.com/"));
		assert!(!is_relative("//evil.example.com/"));
		assert!(!is_relative("javascript:alert(1)"));
		assert!(!is_relative("relative-without-slash"));
	}
}
