#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static stores plugin
//!
//! Serves session records, projects and tenant policies from configuration.
//! Intended for development servers and end-to-end tests.
//!
//! ## Configuration
//!
//! ```yaml
//! stores:
//!   sessions:
//!     - member_id: "stu-1"
//!       token: "c1d2e3"
//!   projects:
//!     - id: "p-1"
//!       tenant: "open"
//!       owner_id: "stu-1"
//!       is_crowd_sourced: true
//!   tenants:
//!     - tenant: "class-1"
//!       is_managed: false
//! ```

pub mod config;
pub mod domain;

pub use config::{SessionRecord, StaticStoresConfig};
pub use domain::StaticStores;
