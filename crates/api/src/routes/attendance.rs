//! Route definitions for the `/attendance` surface.

use axum::routing::post;
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Routes mounted at `/attendance`.
///
/// ```text
/// POST   /check-in   -> check_in
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/check-in", post(attendance::check_in))
}
