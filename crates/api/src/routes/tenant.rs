//! Route definitions for the caller-tenant settings surface.

use axum::routing::get;
use axum::Router;

use crate::handlers::tenants;
use crate::state::AppState;

/// Routes mounted at `/tenant`.
///
/// ```text
/// GET    /settings   -> get_settings
/// PUT    /settings   -> update_settings (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/settings",
        get(tenants::get_settings).put(tenants::update_settings),
    )
}
