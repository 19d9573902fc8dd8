//! Authentication routing.
//!
//! The target tenant alone picks the verification path. The reserved session
//! tenant has no identity-provider accounts, so a bad credential on that path
//! is a session failure and never falls through to the external verifier.

use std::sync::Arc;

use async_trait::async_trait;
use classgate_sdk::ExternalVerifier;
use classgate_security::{ClaimsNormalizer, Principal};

use super::context::{GateRequest, RequestContext};
use super::error::{GateError, Rejection};
use super::pipeline::{Outcome, Stage};
use super::session::SessionTokenVerifier;

/// Verification path chosen for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthnRoute<'a> {
    /// Reserved session tenant. `bearer` is `None` when the header is missing
    /// or does not use the bearer scheme.
    Session {
        bearer: Option<&'a str>,
        member: Option<&'a str>,
    },
    /// Any other tenant: delegated to the identity-provider verifier.
    External { bearer: Option<&'a str> },
}

pub struct AuthenticationRouter {
    session_tenant: String,
    session: SessionTokenVerifier,
    external: Arc<dyn ExternalVerifier>,
    normalizer: ClaimsNormalizer,
}

impl AuthenticationRouter {
    #[must_use]
    pub fn new(
        session_tenant: impl Into<String>,
        session: SessionTokenVerifier,
        external: Arc<dyn ExternalVerifier>,
        normalizer: ClaimsNormalizer,
    ) -> Self {
        Self {
            session_tenant: session_tenant.into(),
            session,
            external,
            normalizer,
        }
    }

    /// Select the verification path for `request`.
    #[must_use]
    pub fn route<'a>(&self, request: &'a GateRequest) -> AuthnRoute<'a> {
        let bearer = request.bearer_token();
        if request.tenant_segment() == Some(self.session_tenant.as_str()) {
            AuthnRoute::Session {
                bearer,
                member: request.member_segment(),
            }
        } else {
            AuthnRoute::External { bearer }
        }
    }

    /// Authenticate `request` on its selected path.
    ///
    /// # Errors
    ///
    /// - `Rejected(Unauthenticated)` for a missing, malformed, or unverifiable credential
    /// - `Fault` when the session store or the external verifier fails
    #[tracing::instrument(skip_all, fields(tenant = request.tenant_segment()))]
    pub async fn authenticate(&self, request: &GateRequest) -> Result<Principal, GateError> {
        match self.route(request) {
            AuthnRoute::Session { bearer, member } => {
                let (Some(token), Some(member)) = (bearer, member) else {
                    tracing::debug!("session path without bearer credential or member segment");
                    return Err(Rejection::Unauthenticated.into());
                };
                self.session
                    .verify(token, member)
                    .await?
                    .ok_or_else(|| Rejection::Unauthenticated.into())
            }
            AuthnRoute::External { bearer } => {
                let Some(token) = bearer else {
                    tracing::debug!("missing bearer credential");
                    return Err(Rejection::Unauthenticated.into());
                };
                let raw = self.external.verify(token).await?;
                Ok(self.normalizer.normalize(raw))
            }
        }
    }
}

#[async_trait]
impl Stage for AuthenticationRouter {
    fn name(&self) -> &'static str {
        "authenticate"
    }

    async fn run(&self, request: &GateRequest, ctx: &mut RequestContext) -> Outcome {
        let result = match self.authenticate(request).await {
            Ok(principal) => ctx.attach_principal(principal).map_err(GateError::from),
            Err(err) => Err(err),
        };
        result.into()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use classgate_sdk::VerifierError;
    use classgate_security::{RawClaims, Role};
    use serde_json::{Map, Value, json};
    use tracing_test::traced_test;

    use super::*;
    use crate::domain::error::GateFault;
    use crate::domain::pipeline::Pipeline;
    use crate::domain::session::tests::{MockSessionStore, envelope};

    pub const ROLE_CLAIM: &str = "https://classgate.dev/role";
    pub const TENANT_CLAIM: &str = "https://classgate.dev/tenant";

    /// Accepts exactly one token and returns fixed namespaced claims for it.
    pub struct MockExternalVerifier {
        pub accepted: String,
        pub claims: Value,
        pub outage: bool,
        pub calls: AtomicUsize,
    }

    impl MockExternalVerifier {
        pub fn accepting(token: &str, claims: Value) -> Self {
            Self {
                accepted: token.to_owned(),
                claims,
                outage: false,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExternalVerifier for MockExternalVerifier {
        async fn verify(&self, bearer_token: &str) -> Result<RawClaims, VerifierError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.outage {
                return Err(VerifierError::Unavailable("jwks endpoint down".to_owned()));
            }
            if bearer_token != self.accepted {
                return Err(VerifierError::Rejected("bad signature".to_owned()));
            }
            let map: Map<String, Value> = self.claims.as_object().cloned().unwrap_or_default();
            RawClaims::from_claim_map(map).map_err(|e| VerifierError::Rejected(e.to_string()))
        }
    }

    struct Fixture {
        router: AuthenticationRouter,
        sessions: Arc<MockSessionStore>,
        external: Arc<MockExternalVerifier>,
    }

    fn fixture(sessions: MockSessionStore, external: MockExternalVerifier) -> Fixture {
        let sessions = Arc::new(sessions);
        let external = Arc::new(external);
        let router = AuthenticationRouter::new(
            "open",
            SessionTokenVerifier::new(sessions.clone(), "open"),
            external.clone(),
            ClaimsNormalizer::new(ROLE_CLAIM, TENANT_CLAIM),
        );
        Fixture {
            router,
            sessions,
            external,
        }
    }

    fn supervisor_claims() -> Value {
        json!({
            "sub": "auth0|sam",
            ROLE_CLAIM: "supervisor",
            TENANT_CLAIM: "class-1",
        })
    }

    #[test]
    fn route_is_selected_by_tenant() {
        let f = fixture(
            MockSessionStore::default(),
            MockExternalVerifier::accepting("idp-token", supervisor_claims()),
        );

        let session_req = GateRequest::new()
            .tenant("open")
            .member("student-1")
            .authorization("Bearer s.t.u");
        assert_eq!(
            f.router.route(&session_req),
            AuthnRoute::Session {
                bearer: Some("s.t.u"),
                member: Some("student-1"),
            }
        );

        let missing = GateRequest::new().tenant("open");
        assert_eq!(
            f.router.route(&missing),
            AuthnRoute::Session {
                bearer: None,
                member: None,
            }
        );

        let external_req = GateRequest::new()
            .tenant("class-1")
            .authorization("Bearer idp-token");
        assert_eq!(
            f.router.route(&external_req),
            AuthnRoute::External {
                bearer: Some("idp-token"),
            }
        );
    }

    #[tokio::test]
    async fn session_path_builds_student_principal() {
        let f = fixture(
            MockSessionStore::with_session("student-1", "tok-1"),
            MockExternalVerifier::accepting("idp-token", supervisor_claims()),
        );
        let request = GateRequest::new()
            .tenant("open")
            .member("student-1")
            .authorization(format!("Bearer {}", envelope("sess-1", "tok-1")));

        let principal = f.router.authenticate(&request).await.unwrap();

        assert_eq!(principal.role(), Some(Role::Student));
        assert_eq!(principal.tenant(), Some("open"));
        assert_eq!(f.external.calls(), 0);
    }

    #[tokio::test]
    async fn session_path_never_falls_through_to_external() {
        let f = fixture(
            MockSessionStore::default(),
            MockExternalVerifier::accepting("idp-token", supervisor_claims()),
        );

        for authorization in [None, Some("Basic dXNlcg=="), Some("Bearer idp-token")] {
            let mut request = GateRequest::new().tenant("open").member("student-1");
            if let Some(value) = authorization {
                request = request.authorization(value);
            }

            let err = f.router.authenticate(&request).await.unwrap_err();
            assert_eq!(err.rejection(), Some(Rejection::Unauthenticated));
        }

        assert_eq!(f.external.calls(), 0);
    }

    #[tokio::test]
    async fn session_path_without_member_segment_is_unauthenticated() {
        let f = fixture(
            MockSessionStore::with_session("student-1", "tok-1"),
            MockExternalVerifier::accepting("idp-token", supervisor_claims()),
        );
        let request = GateRequest::new()
            .tenant("open")
            .authorization(format!("Bearer {}", envelope("sess-1", "tok-1")));

        let err = f.router.authenticate(&request).await.unwrap_err();

        assert_eq!(err.rejection(), Some(Rejection::Unauthenticated));
        assert_eq!(f.sessions.calls(), 0);
    }

    #[tokio::test]
    async fn session_store_fault_propagates() {
        let f = fixture(
            MockSessionStore::failing(),
            MockExternalVerifier::accepting("idp-token", supervisor_claims()),
        );
        let request = GateRequest::new()
            .tenant("open")
            .member("student-1")
            .authorization(format!("Bearer {}", envelope("sess-1", "tok-1")));

        let err = f.router.authenticate(&request).await.unwrap_err();

        assert!(matches!(err, GateError::Fault(GateFault::Store(_))));
    }

    #[tokio::test]
    async fn external_path_normalizes_claims() {
        let f = fixture(
            MockSessionStore::default(),
            MockExternalVerifier::accepting("idp-token", supervisor_claims()),
        );
        let request = GateRequest::new()
            .tenant("class-1")
            .authorization("Bearer idp-token");

        let principal = f.router.authenticate(&request).await.unwrap();

        assert_eq!(principal.subject(), "auth0|sam");
        assert_eq!(principal.role(), Some(Role::Supervisor));
        assert_eq!(principal.tenant(), Some("class-1"));
        assert_eq!(f.sessions.calls(), 0);
    }

    #[tokio::test]
    async fn external_path_does_not_accept_session_tokens() {
        let f = fixture(
            MockSessionStore::with_session("student-1", "tok-1"),
            MockExternalVerifier::accepting("idp-token", supervisor_claims()),
        );
        let request = GateRequest::new()
            .tenant("class-1")
            .member("student-1")
            .authorization(format!("Bearer {}", envelope("sess-1", "tok-1")));

        let err = f.router.authenticate(&request).await.unwrap_err();

        assert_eq!(err.rejection(), Some(Rejection::Unauthenticated));
        assert_eq!(f.sessions.calls(), 0);
    }

    #[tokio::test]
    async fn external_path_without_credential_skips_verifier() {
        let f = fixture(
            MockSessionStore::default(),
            MockExternalVerifier::accepting("idp-token", supervisor_claims()),
        );

        let err = f
            .router
            .authenticate(&GateRequest::new().tenant("class-1"))
            .await
            .unwrap_err();

        assert_eq!(err.rejection(), Some(Rejection::Unauthenticated));
        assert_eq!(f.external.calls(), 0);
    }

    #[tokio::test]
    async fn external_outage_is_a_fault() {
        let mut external = MockExternalVerifier::accepting("idp-token", supervisor_claims());
        external.outage = true;
        let f = fixture(MockSessionStore::default(), external);
        let request = GateRequest::new()
            .tenant("class-1")
            .authorization("Bearer idp-token");

        let err = f.router.authenticate(&request).await.unwrap_err();

        assert!(matches!(err, GateError::Fault(GateFault::Verifier(_))));
    }

    #[tokio::test]
    async fn stage_attaches_principal() {
        let f = fixture(
            MockSessionStore::default(),
            MockExternalVerifier::accepting("idp-token", supervisor_claims()),
        );
        let request = GateRequest::new()
            .tenant("class-1")
            .authorization("Bearer idp-token");
        let mut ctx = RequestContext::default();

        let outcome = f.router.run(&request, &mut ctx).await;

        assert!(matches!(outcome, Outcome::Continue));
        assert_eq!(ctx.principal().unwrap().subject(), "auth0|sam");
    }

    #[tokio::test]
    #[traced_test]
    async fn undecodable_session_token_is_a_quiet_rejection() {
        let f = fixture(
            MockSessionStore::with_session("student-1", "tok-1"),
            MockExternalVerifier::accepting("idp-token", supervisor_claims()),
        );
        let pipeline = Pipeline::default().then(Arc::new(f.router));
        let request = GateRequest::new()
            .tenant("open")
            .member("student-1")
            .authorization("Bearer not-a-session-token");
        let mut ctx = RequestContext::default();

        let err = pipeline.run(&request, &mut ctx).await.unwrap_err();

        assert_eq!(err.rejection(), Some(Rejection::Unauthenticated));
        assert!(logs_contain("undecodable session token"));
        assert!(logs_contain("request rejected"));
        assert!(!logs_contain("gate stage faulted"));
        assert!(ctx.principal().is_none());
    }
}
