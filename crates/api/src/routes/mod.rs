pub mod admin;
pub mod attendance;
pub mod health;
pub mod instructors;
pub mod lessons;
pub mod students;
pub mod tenant;
pub mod turmas;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /admin/tenants                       list, provision (admin only)
/// /admin/sweep/auto-complete           trigger sweep (POST, admin only)
///
/// /tenant/settings                     get, update policy settings (PUT admin only)
///
/// /students                            list, create
/// /students/{id}                       get, update
///
/// /turmas                              list, create
/// /turmas/{id}                         get, update
/// /turmas/{id}/schedule                get, replace (PUT reconciles lessons)
/// /turmas/{id}/lessons                 list (?from, to, status, limit, offset)
/// /turmas/{id}/lessons/generate        materialize occurrences (POST)
/// /turmas/{id}/lessons/current         current/next resolution (GET, ?at)
///
/// /instructors/{id}/lessons/current    current/next across the instructor's turmas
///
/// /lessons/{id}                        get, patch (lesson plan assignment)
/// /lessons/{id}/start                  Scheduled -> InProgress (POST)
/// /lessons/{id}/finish                 InProgress -> Completed (POST)
/// /lessons/{id}/cancel                 -> Cancelled (POST)
/// /lessons/{id}/attendance             list check-ins (GET)
///
/// /attendance/check-in                 record a student check-in (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Tenant provisioning and the sweep trigger (admin only).
        .nest("/admin", admin::router())
        // Caller-tenant policy settings.
        .nest("/tenant", tenant::router())
        // Student roster.
        .nest("/students", students::router())
        // Turmas (also nests schedule and turma-scoped lesson routes).
        .nest("/turmas", turmas::router())
        // Instructor-scoped resolution.
        .nest("/instructors", instructors::router())
        // Lesson detail and lifecycle transitions.
        .nest("/lessons", lessons::router())
        // Attendance check-in.
        .nest("/attendance", attendance::router())
}
