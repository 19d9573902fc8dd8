#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Identity types shared by every classgate stage.
//!
//! - [`Principal`] - the authenticated caller attached to one request
//! - [`Role`] - the closed set of roles a caller may hold
//! - [`RawClaims`] - claims as they come off a verified token
//! - [`ClaimsNormalizer`] - turns [`RawClaims`] into a [`Principal`]

pub mod claims;
pub mod principal;
pub mod role;

pub use claims::{ClaimsError, ClaimsNormalizer, RawClaims};
pub use principal::{Principal, PrincipalBuilder, SessionInfo};
pub use role::{Role, UnknownRole};
