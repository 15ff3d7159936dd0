//! HTTP-level integration tests for the auto-completion sweep endpoint.
//!
//! The daily 10:00-11:00 schedule plus the stock 120-minute grace means a
//! lesson on date D becomes overdue at D 13:00. Tests drive the sweep with
//! an explicit `at` instant instead of waiting for wall-clock time.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, NaiveDate, Utc};
use common::{body_json, get_as, post_as, post_json_as, put_json_as};
use sqlx::PgPool;

use academy_core::types::DbId;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Provision a UTC tenant, one turma with a daily 10:00 schedule, and
/// return `(tenant_id, turma_id, lesson_ids)` with lessons in date order.
async fn seed_class(pool: &PgPool, name: &str) -> (DbId, DbId, Vec<DbId>) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_as(
        app,
        "/api/v1/admin/tenants",
        1,
        "admin",
        serde_json::json!({ "name": name, "timezone": "UTC" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let tenant_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_json_as(
        app,
        "/api/v1/turmas",
        tenant_id,
        "admin",
        serde_json::json!({ "name": "Swept Class", "instructor_id": 301 }),
    )
    .await;
    let turma_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let today = Utc::now().date_naive();
    let slots: Vec<serde_json::Value> = (0..7)
        .map(|day| {
            serde_json::json!({
                "day_of_week": day,
                "start_time": "10:00:00",
                "duration_minutes": 60
            })
        })
        .collect();

    let app = common::build_test_app(pool.clone());
    let response = put_json_as(
        app,
        &format!("/api/v1/turmas/{turma_id}/schedule"),
        tenant_id,
        "admin",
        serde_json::json!({
            "effective_from": today.to_string(),
            "effective_until": null,
            "slots": slots
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let lesson_ids = json["data"]["generation"]["created"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect();

    (tenant_id, turma_id, lesson_ids)
}

/// Trigger the sweep as the tenant's admin at an explicit instant.
async fn sweep_at(pool: &PgPool, tenant_id: DbId, date: NaiveDate, time: &str) -> Vec<DbId> {
    let app = common::build_test_app(pool.clone());
    let response = post_json_as(
        app,
        "/api/v1/admin/sweep/auto-complete",
        tenant_id,
        "admin",
        serde_json::json!({ "at": format!("{date}T{time}Z") }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["auto_completed"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_i64().unwrap())
        .collect()
}

/// Fetch one lesson as JSON.
async fn get_lesson(pool: &PgPool, tenant_id: DbId, lesson_id: DbId) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = get_as(
        app,
        &format!("/api/v1/lessons/{lesson_id}"),
        tenant_id,
        "staff",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Overdue completion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_completes_overdue_lessons(pool: PgPool) {
    let (tenant_id, _, lessons) = seed_class(&pool, "Sweep Tenant").await;
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    // At tomorrow 14:00, today's and tomorrow's lessons are both past
    // their 13:00 cutoff; the rest of the horizon is not.
    let mut swept = sweep_at(&pool, tenant_id, tomorrow, "14:00:00").await;
    swept.sort_unstable();
    let mut expected = vec![lessons[0], lessons[1]];
    expected.sort_unstable();
    assert_eq!(swept, expected);

    let lesson = get_lesson(&pool, tenant_id, lessons[0]).await;
    assert_eq!(lesson["status_id"], 3);
    assert_eq!(lesson["auto_completed"], true);
    assert!(lesson["completed_at"].is_string());
    // Nobody checked in, so the frozen count is zero.
    assert_eq!(lesson["attendance_count"], 0);

    // Later lessons are untouched.
    let lesson = get_lesson(&pool, tenant_id, lessons[2]).await;
    assert_eq!(lesson["status_id"], 1);
    assert_eq!(lesson["auto_completed"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_honours_the_grace_period(pool: PgPool) {
    let (tenant_id, _, lessons) = seed_class(&pool, "Grace Tenant").await;
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    // At tomorrow 12:30, tomorrow's lesson has ended but its grace has
    // not elapsed; only today's lesson is overdue.
    let swept = sweep_at(&pool, tenant_id, tomorrow, "12:30:00").await;
    assert_eq!(swept, vec![lessons[0]]);

    // Once the grace elapses, a later sweep picks it up.
    let swept = sweep_at(&pool, tenant_id, tomorrow, "14:00:00").await;
    assert_eq!(swept, vec![lessons[1]]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_is_idempotent(pool: PgPool) {
    let (tenant_id, _, _) = seed_class(&pool, "Idempotent Tenant").await;
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    let first = sweep_at(&pool, tenant_id, tomorrow, "14:00:00").await;
    assert_eq!(first.len(), 2);

    let second = sweep_at(&pool, tenant_id, tomorrow, "14:00:00").await;
    assert_eq!(second, Vec::<DbId>::new());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_completes_lessons_left_in_progress(pool: PgPool) {
    let (tenant_id, _, lessons) = seed_class(&pool, "Forgotten Tenant").await;
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    // The instructor started tomorrow's lesson and never finished it.
    let app = common::build_test_app(pool.clone());
    let response = post_as(
        app,
        &format!("/api/v1/lessons/{}/start", lessons[1]),
        tenant_id,
        "instructor",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let swept = sweep_at(&pool, tenant_id, tomorrow, "14:00:00").await;
    assert!(swept.contains(&lessons[1]));

    let lesson = get_lesson(&pool, tenant_id, lessons[1]).await;
    assert_eq!(lesson["status_id"], 3);
    assert_eq!(lesson["auto_completed"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_never_touches_cancelled_lessons(pool: PgPool) {
    let (tenant_id, _, lessons) = seed_class(&pool, "Cancelled Tenant").await;
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    let app = common::build_test_app(pool.clone());
    let response = post_as(
        app,
        &format!("/api/v1/lessons/{}/cancel", lessons[1]),
        tenant_id,
        "instructor",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let swept = sweep_at(&pool, tenant_id, tomorrow, "14:00:00").await;
    assert_eq!(swept, vec![lessons[0]]);

    let lesson = get_lesson(&pool, tenant_id, lessons[1]).await;
    assert_eq!(lesson["status_id"], 4);
    assert_eq!(lesson["auto_completed"], false);
}

// ---------------------------------------------------------------------------
// Scope and access
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_only_touches_the_callers_tenant(pool: PgPool) {
    let (tenant_a, _, lessons_a) = seed_class(&pool, "Tenant A").await;
    let (tenant_b, _, lessons_b) = seed_class(&pool, "Tenant B").await;
    let tomorrow = Utc::now().date_naive() + Duration::days(1);

    let swept = sweep_at(&pool, tenant_a, tomorrow, "14:00:00").await;
    assert!(swept.contains(&lessons_a[0]));
    assert!(!swept.contains(&lessons_b[0]));

    // Tenant B's overdue lesson is still open.
    let lesson = get_lesson(&pool, tenant_b, lessons_b[0]).await;
    assert_eq!(lesson["status_id"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_requires_admin_role(pool: PgPool) {
    let (tenant_id, _, _) = seed_class(&pool, "Role Tenant").await;

    let app = common::build_test_app(pool);
    let response = post_as(app, "/api/v1/admin/sweep/auto-complete", tenant_id, "staff").await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sweep_without_body_uses_the_server_clock(pool: PgPool) {
    let (tenant_id, _, _) = seed_class(&pool, "Clock Tenant").await;

    let app = common::build_test_app(pool);
    let response = post_as(app, "/api/v1/admin/sweep/auto-complete", tenant_id, "admin").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    // The count depends on the wall clock; the shape does not.
    assert!(json["data"]["auto_completed"].is_array());
}
