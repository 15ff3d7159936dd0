//! Route definitions for instructor-scoped lesson resolution.

use axum::routing::get;
use axum::Router;

use crate::handlers::lessons;
use crate::state::AppState;

/// Routes mounted at `/instructors`.
///
/// ```text
/// GET    /{id}/lessons/current   -> current_for_instructor
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}/lessons/current",
        get(lessons::current_for_instructor),
    )
}
