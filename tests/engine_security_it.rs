// self
use authgate::{
	_preludet::*,
	auth::{ClientName, Credentials, Profile},
	authorize::RequireAnyRole,
	client::{IdentityClient, Retrieval},
	config::Config,
	context::WebContext,
	engine::{SecurityDecision, SecurityMediator},
	error::ConfigError,
	http::{HttpAction, status},
	matcher::PathPrefixMatcher,
	session::{self, MemorySessionStore, SessionStore},
	store::ProfileStore,
};

fn mediator(config: Config) -> (SecurityMediator, Arc<MemorySessionStore>) {
	let session = Arc::new(MemorySessionStore::new());

	(SecurityMediator::new(Arc::new(config), session.clone()), session)
}

// Direct client that answers every credentials probe with an HTTP action,
// the way a negotiate-style scheme demands a round trip before validating.
struct NegotiatingClient(ClientName);
impl NegotiatingClient {
	fn new(name: &str) -> Arc<dyn IdentityClient> {
		Arc::new(Self(ClientName::new(name).expect("Client name fixture should be valid.")))
	}
}
impl IdentityClient for NegotiatingClient {
	fn name(&self) -> &ClientName {
		&self.0
	}

	fn is_indirect(&self) -> bool {
		false
	}

	fn credentials(&self, _: &mut dyn WebContext) -> Result<Retrieval<Credentials>> {
		Ok(Retrieval::Action(
			HttpAction::unauthorized().with_header("WWW-Authenticate", "Negotiate"),
		))
	}

	fn user_profile(
		&self,
		_: &Credentials,
		_: &mut dyn WebContext,
	) -> Result<Option<Profile>> {
		Ok(None)
	}

	fn initiate_redirect(&self, _: &mut dyn WebContext) -> Result<HttpAction> {
		Err(ConfigError::RedirectUnsupported { client: self.0.to_string() }.into())
	}
}

#[test]
fn valid_bearer_token_is_authorized_without_touching_the_session() {
	let config = config_with_clients([bearer_client(
		"token",
		"letmein",
		Profile::new("u1").with_role("user"),
	)])
	.build()
	.expect("Configuration should build.");
	let (mediator, _) = mediator(config);
	let mut ctx = TestWebContext::new("http://localhost/secure")
		.with_header("Authorization", "Bearer letmein");
	let decision = mediator.check(&mut ctx).expect("Mediation should succeed.");

	assert!(decision.grants_access());

	let SecurityDecision::Authorized(account) = decision else {
		panic!("valid direct credentials should authorize");
	};

	assert_eq!(account.principal(), "u1");
	// A direct-only candidate list keeps the whole exchange stateless.
	assert!(ctx.response_cookies.is_empty());
}

#[test]
fn direct_only_flow_without_credentials_ends_in_401() {
	let config = config_with_clients([bearer_client("token", "letmein", Profile::new("u1"))])
		.build()
		.expect("Configuration should build.");
	let (mediator, _) = mediator(config);
	let mut ctx = TestWebContext::new("http://localhost/secure");
	let decision = mediator.check(&mut ctx).expect("Mediation should succeed.");

	let SecurityDecision::Unauthorized(action) = decision else {
		panic!("a direct client cannot challenge; denial must be terminal");
	};

	assert_eq!(action.status, status::UNAUTHORIZED);
	assert!(ctx.response_cookies.is_empty());
}

#[test]
fn indirect_first_candidate_challenges_and_saves_the_requested_url() {
	let config = config_with_clients([Arc::new(StubIndirectClient::new(
		"oidc",
		"https://idp.example.com/login",
	)) as Arc<dyn IdentityClient>])
	.build()
	.expect("Configuration should build.");
	let (mediator, session) = mediator(config);
	let mut ctx = TestWebContext::new("http://localhost/secure");
	let decision = mediator.check(&mut ctx).expect("Mediation should succeed.");

	let SecurityDecision::Challenge(action) = decision else {
		panic!("an unauthenticated request with an indirect client should challenge");
	};

	assert_eq!(action.status, status::FOUND);
	assert_eq!(action.location(), Some("https://idp.example.com/login"));
	// The original target is parked in the session for the callback.
	assert_eq!(
		session
			.get(&mut ctx, session::REQUESTED_URL_KEY)
			.expect("Session read should succeed."),
		Some(Value::from("http://localhost/secure"))
	);
	assert!(!ctx.response_cookies.is_empty());
}

#[test]
fn session_held_profile_authenticates_without_probing_clients() {
	let config = config_with_clients([Arc::new(StubIndirectClient::new(
		"oidc",
		"https://idp.example.com/login",
	)) as Arc<dyn IdentityClient>])
	.build()
	.expect("Configuration should build.");
	let (mediator, session) = mediator(config);

	// Seed the session the way a completed callback would.
	let mut login = TestWebContext::new("http://localhost/callback");

	ProfileStore::new(session.clone())
		.save(
			&mut login,
			true,
			ClientName::new("oidc").expect("Name fixture should be valid."),
			Profile::new("alice"),
			false,
		)
		.expect("Seeding the profile should succeed.");

	let cookie = login
		.response_cookies
		.last()
		.expect("Seeding the session should issue a cookie.")
		.clone();
	let mut ctx = TestWebContext::new("http://localhost/secure")
		.with_cookie(cookie.name, cookie.value);
	let decision = mediator.check(&mut ctx).expect("Mediation should succeed.");

	let SecurityDecision::Authorized(account) = decision else {
		panic!("a session-held profile should authenticate the request");
	};

	assert_eq!(account.principal(), "alice");
}

#[test]
fn no_configured_clients_ends_in_401() {
	let config = Config::builder().build().expect("Empty configuration should build.");
	let (mediator, _) = mediator(config);
	let mut ctx = TestWebContext::new("http://localhost/secure");
	let decision = mediator.check(&mut ctx).expect("Mediation should succeed.");

	let SecurityDecision::Unauthorized(action) = decision else {
		panic!("nothing to authenticate with and nothing to redirect to");
	};

	assert_eq!(action.status, status::UNAUTHORIZED);
}

#[test]
fn role_authorizers_gate_authenticated_callers() {
	let build = || {
		config_with_clients([bearer_client(
			"token",
			"letmein",
			Profile::new("u1").with_role("admin"),
		)])
		.authorizer("admin", Arc::new(RequireAnyRole::new(["admin"])))
		.authorizer("superadmin", Arc::new(RequireAnyRole::new(["superadmin"])))
		.build()
		.expect("Configuration should build.")
	};
	let (granted, _) = mediator(build());
	let granted = granted.with_authorizers("admin");
	let mut ctx = TestWebContext::new("http://localhost/admin")
		.with_header("Authorization", "Bearer letmein");

	assert!(
		granted.check(&mut ctx).expect("Mediation should succeed.").grants_access(),
		"an admin-role caller passes the admin authorizer"
	);
	// Authorization over a direct-client profile stays session-free too.
	assert!(ctx.response_cookies.is_empty());

	let (denied, _) = mediator(build());
	let denied = denied.with_authorizers("superadmin");
	let mut ctx = TestWebContext::new("http://localhost/admin")
		.with_header("Authorization", "Bearer letmein");
	let decision = denied.check(&mut ctx).expect("Mediation should succeed.");

	let SecurityDecision::Forbidden(action) = decision else {
		panic!("an authenticated but unpermitted caller is forbidden, not challenged");
	};

	assert_eq!(action.status, status::FORBIDDEN);
}

#[test]
fn client_raised_action_is_terminal_and_stops_probing() {
	let config = config_with_clients([
		NegotiatingClient::new("spnego"),
		bearer_client("token", "letmein", Profile::new("u1")),
	])
	.build()
	.expect("Configuration should build.");
	let (mediator, _) = mediator(config);
	// The later candidate could validate this request, but the earlier one
	// raises an action first.
	let mut ctx = TestWebContext::new("http://localhost/secure")
		.with_header("Authorization", "Bearer letmein");
	let decision = mediator.check(&mut ctx).expect("Mediation should succeed.");

	let SecurityDecision::Other(action) = decision else {
		panic!("a client-raised action must end the exchange, not fall through");
	};

	assert_eq!(action.status, status::UNAUTHORIZED);
	assert_eq!(
		action.headers,
		vec![("WWW-Authenticate".to_owned(), "Negotiate".to_owned())]
	);
	assert!(!decision_probed_later_candidate(&ctx));
}

// The bearer candidate saves a request-scoped profile set when probed; its
// absence proves probing stopped at the action.
fn decision_probed_later_candidate(ctx: &TestWebContext) -> bool {
	ctx.attributes.contains_key(session::PROFILES_KEY)
}

#[test]
fn declining_matcher_bypasses_security_entirely() {
	let config = config_with_clients([bearer_client("token", "letmein", Profile::new("u1"))])
		.matcher("api", Arc::new(PathPrefixMatcher::new("/api")))
		.build()
		.expect("Configuration should build.");
	let (mediator, _) = mediator(config);
	let mediator = mediator.with_matchers("api");
	let mut ctx = TestWebContext::new("http://localhost/public/index.html");
	let decision = mediator.check(&mut ctx).expect("Mediation should succeed.");

	assert!(matches!(decision, SecurityDecision::Bypassed));
	assert!(decision.grants_access());
	assert!(decision.action().is_none());
}

#[test]
fn client_allow_list_restricts_the_candidates() {
	let config = config_with_clients([
		Arc::new(StubIndirectClient::new("oidc", "https://idp.example.com/login"))
			as Arc<dyn IdentityClient>,
		bearer_client("token", "letmein", Profile::new("u1")),
	])
	.build()
	.expect("Configuration should build.");
	let (mediator, _) = mediator(config);
	let mediator = mediator.with_clients("token");
	let mut ctx = TestWebContext::new("http://localhost/secure");
	let decision = mediator.check(&mut ctx).expect("Mediation should succeed.");

	// With the indirect client filtered out, there is nothing to redirect to.
	let SecurityDecision::Unauthorized(action) = decision else {
		panic!("the allow-list should remove the challenge option");
	};

	assert_eq!(action.status, status::UNAUTHORIZED);
}
