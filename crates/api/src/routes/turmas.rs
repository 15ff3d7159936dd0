//! Route definitions for the `/turmas` resource.
//!
//! Also mounts the turma-scoped schedule and lesson routes under
//! `/turmas/{id}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{lessons, schedule, turmas};
use crate::state::AppState;

/// Routes mounted at `/turmas`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id
/// PUT    /{id}                    -> update
///
/// GET    /{id}/schedule           -> get_schedule
/// PUT    /{id}/schedule           -> put_schedule (replace + reconcile)
///
/// GET    /{id}/lessons            -> list_for_turma
/// POST   /{id}/lessons/generate   -> generate
/// GET    /{id}/lessons/current    -> current_for_turma
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(turmas::list).post(turmas::create))
        .route("/{id}", get(turmas::get_by_id).put(turmas::update))
        .route(
            "/{id}/schedule",
            get(schedule::get_schedule).put(schedule::put_schedule),
        )
        .route("/{id}/lessons", get(lessons::list_for_turma))
        .route("/{id}/lessons/generate", post(lessons::generate))
        .route("/{id}/lessons/current", get(lessons::current_for_turma))
}
