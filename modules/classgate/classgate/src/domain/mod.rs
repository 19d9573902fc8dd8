pub mod authn;
pub mod authz;
pub mod context;
pub mod error;
pub mod pipeline;
pub mod project_access;
pub mod session;

pub use authn::{AuthenticationRouter, AuthnRoute};
pub use authz::{SiteAdminOnly, SupervisorOnly, TenantMatch, UnmanagedTenantRequired};
pub use context::{GateRequest, RequestContext};
pub use error::{ForbiddenReason, GateError, GateFault, Rejection};
pub use pipeline::{Outcome, Pipeline, Stage};
pub use project_access::{ProjectAccessController, SharedAccess};
pub use session::{DecodeError, SessionTokenVerifier, decode_session_token};
