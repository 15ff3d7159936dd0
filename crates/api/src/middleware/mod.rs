//! Identity and authorization middleware extractors.
//!
//! - [`context::TenantContext`] -- Extracts the proxy-provided caller identity.
//! - [`context::RequireAdmin`] -- Requires the `admin` role.

pub mod context;
