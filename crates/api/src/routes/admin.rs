//! Route definitions for the `/admin` surface.
//!
//! Everything here requires the admin role, enforced per handler via the
//! [`crate::middleware::context::RequireAdmin`] extractor.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{sweep, tenants};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /tenants               -> list
/// POST   /tenants               -> create
/// POST   /sweep/auto-complete   -> auto_complete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tenants", get(tenants::list).post(tenants::create))
        .route("/sweep/auto-complete", post(sweep::auto_complete))
}
