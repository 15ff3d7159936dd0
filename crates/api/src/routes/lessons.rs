//! Route definitions for the `/lessons` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{attendance, lessons};
use crate::state::AppState;

/// Routes mounted at `/lessons`.
///
/// ```text
/// GET    /{id}              -> get_by_id
/// PATCH  /{id}              -> update (lesson plan assignment)
/// POST   /{id}/start        -> start
/// POST   /{id}/finish       -> finish
/// POST   /{id}/cancel       -> cancel
/// GET    /{id}/attendance   -> list_for_lesson
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(lessons::get_by_id).patch(lessons::update))
        .route("/{id}/start", post(lessons::start))
        .route("/{id}/finish", post(lessons::finish))
        .route("/{id}/cancel", post(lessons::cancel))
        .route("/{id}/attendance", get(attendance::list_for_lesson))
}
