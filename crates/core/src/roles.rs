//! Role names carried in the identity context.
//!
//! Identity and session handling live in an upstream provider; requests
//! arrive with an already-validated caller id, tenant id, and one of these
//! role names. The api crate compares against these constants.

/// Full administrative access within a tenant (settings, provisioning,
/// sweeps).
pub const ROLE_ADMIN: &str = "admin";

/// Teaches turmas; may drive lesson lifecycle and view own dashboards.
pub const ROLE_INSTRUCTOR: &str = "instructor";

/// Front-desk staff; may manage students and record check-ins.
pub const ROLE_STAFF: &str = "staff";

/// All role names the identity provider may send.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_INSTRUCTOR, ROLE_STAFF];
