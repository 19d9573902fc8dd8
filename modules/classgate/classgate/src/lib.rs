//! classgate
//!
//! Per-request authentication and authorization for multi-tenant class
//! workspaces. A request is authenticated on exactly one of two paths,
//! chosen by the tenant it addresses:
//!
//! - the reserved session tenant, whose members present locally issued
//!   session tokens checked against the session store
//! - every other tenant, whose callers present RS256 tokens from the
//!   configured identity provider
//!
//! Authorization stages (tenant match, role gates, managed-tenant policy,
//! project ownership) then run in the order a route chains them.
//!
//! ```ignore
//! let gate = Gate::new(&config, stores, verifier)?;
//! let router = Router::new()
//!     .route(
//!         "/classes/{class_id}/students/{student_id}/projects/{project_id}",
//!         get(show_project),
//!     )
//!     .route_layer(gate.chain().authenticate().tenant_match().owner_or_shared().layer());
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
pub mod gate;
pub mod infra;

pub use api::rest::{Authenticated, GateLayer, Problem, ResolvedProject};
pub use config::{ClassGateConfig, ConfigError};
pub use domain::{GateError, GateFault, Rejection};
pub use gate::{Gate, GateChain, GateStores};
