//! Route definitions for the `/students` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::students;
use crate::state::AppState;

/// Routes mounted at `/students`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// GET    /{id}    -> get_by_id
/// PUT    /{id}    -> update
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(students::list).post(students::create))
        .route("/{id}", get(students::get_by_id).put(students::update))
}
