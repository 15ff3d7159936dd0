//! HTTP-level integration tests for the student and turma resources.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_as, post_json_as, put_json_as};
use sqlx::PgPool;

use academy_core::types::DbId;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn provision_tenant(pool: &PgPool, name: &str) -> DbId {
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
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Student CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_student_returns_201_with_defaults(pool: PgPool) {
    let tenant_id = provision_tenant(&pool, "Roster Tenant").await;

    let app = common::build_test_app(pool);
    let response = post_json_as(
        app,
        "/api/v1/students",
        tenant_id,
        "staff",
        serde_json::json!({ "name": "Ana Souza", "email": "ana@example.com" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Ana Souza");
    assert_eq!(json["data"]["email"], "ana@example.com");
    assert_eq!(json["data"]["tenant_id"], tenant_id);
    // Omitted subscription flag defaults to active.
    assert_eq!(json["data"]["subscription_active"], true);
    assert!(json["data"]["id"].is_number());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_student_rejects_bad_email(pool: PgPool) {
    let tenant_id = provision_tenant(&pool, "Roster Tenant").await;

    let app = common::build_test_app(pool);
    let response = post_json_as(
        app,
        "/api/v1/students",
        tenant_id,
        "staff",
        serde_json::json!({ "name": "Typo", "email": "not-an-email" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_student_by_id(pool: PgPool) {
    let tenant_id = provision_tenant(&pool, "Roster Tenant").await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_as(
            app,
            "/api/v1/students",
            tenant_id,
            "staff",
            serde_json::json!({ "name": "Get Me" }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get_as(app, &format!("/api/v1/students/{id}"), tenant_id, "staff").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Get Me");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_nonexistent_student_returns_404(pool: PgPool) {
    let tenant_id = provision_tenant(&pool, "Roster Tenant").await;

    let app = common::build_test_app(pool);
    let response = get_as(app, "/api/v1/students/999999", tenant_id, "staff").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn student_is_invisible_to_other_tenants(pool: PgPool) {
    let tenant_a = provision_tenant(&pool, "Tenant A").await;
    let tenant_b = provision_tenant(&pool, "Tenant B").await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_as(
            app,
            "/api/v1/students",
            tenant_a,
            "staff",
            serde_json::json!({ "name": "Fenced In" }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get_as(app, &format!("/api/v1/students/{id}"), tenant_b, "staff").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_student_patches_only_present_fields(pool: PgPool) {
    let tenant_id = provision_tenant(&pool, "Roster Tenant").await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_as(
            app,
            "/api/v1/students",
            tenant_id,
            "staff",
            serde_json::json!({ "name": "Original", "email": "orig@example.com" }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json_as(
        app,
        &format!("/api/v1/students/{id}"),
        tenant_id,
        "staff",
        serde_json::json!({ "subscription_active": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["subscription_active"], false);
    assert_eq!(json["data"]["name"], "Original");
    assert_eq!(json["data"]["email"], "orig@example.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_students_filters_by_subscription(pool: PgPool) {
    let tenant_id = provision_tenant(&pool, "Roster Tenant").await;

    for (name, active) in [("Active One", true), ("Active Two", true), ("Lapsed", false)] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_as(
            app,
            "/api/v1/students",
            tenant_id,
            "staff",
            serde_json::json!({ "name": name, "subscription_active": active }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        get_as(
            app,
            "/api/v1/students?subscription_active=false",
            tenant_id,
            "staff",
        )
        .await,
    )
    .await;
    let students = json["data"].as_array().unwrap();
    assert_eq!(students.len(), 1);
    assert_eq!(students[0]["name"], "Lapsed");

    let app = common::build_test_app(pool);
    let json = body_json(get_as(app, "/api/v1/students", tenant_id, "staff").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Turma CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_turma_returns_201(pool: PgPool) {
    let tenant_id = provision_tenant(&pool, "Turma Tenant").await;

    let app = common::build_test_app(pool);
    let response = post_json_as(
        app,
        "/api/v1/turmas",
        tenant_id,
        "admin",
        serde_json::json!({ "name": "Karate Kids", "instructor_id": 42 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Karate Kids");
    assert_eq!(json["data"]["instructor_id"], 42);
    assert_eq!(json["data"]["archived"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_turma_can_swap_instructor_and_archive(pool: PgPool) {
    let tenant_id = provision_tenant(&pool, "Turma Tenant").await;

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_as(
            app,
            "/api/v1/turmas",
            tenant_id,
            "admin",
            serde_json::json!({ "name": "Old Name", "instructor_id": 42 }),
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = put_json_as(
        app,
        &format!("/api/v1/turmas/{id}"),
        tenant_id,
        "admin",
        serde_json::json!({ "name": "New Name", "instructor_id": 43, "archived": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "New Name");
    assert_eq!(json["data"]["instructor_id"], 43);
    assert_eq!(json["data"]["archived"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_turmas_hides_archived_by_default(pool: PgPool) {
    let tenant_id = provision_tenant(&pool, "Turma Tenant").await;

    let app = common::build_test_app(pool.clone());
    let kept = body_json(
        post_json_as(
            app,
            "/api/v1/turmas",
            tenant_id,
            "admin",
            serde_json::json!({ "name": "Kept", "instructor_id": 1 }),
        )
        .await,
    )
    .await;
    let kept_id = kept["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let archived = body_json(
        post_json_as(
            app,
            "/api/v1/turmas",
            tenant_id,
            "admin",
            serde_json::json!({ "name": "Shelved", "instructor_id": 1 }),
        )
        .await,
    )
    .await;
    let archived_id = archived["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    put_json_as(
        app,
        &format!("/api/v1/turmas/{archived_id}"),
        tenant_id,
        "admin",
        serde_json::json!({ "archived": true }),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_as(app, "/api/v1/turmas", tenant_id, "staff").await).await;
    let turmas = json["data"].as_array().unwrap();
    assert_eq!(turmas.len(), 1);
    assert_eq!(turmas[0]["id"], kept_id);

    let app = common::build_test_app(pool);
    let json = body_json(
        get_as(
            app,
            "/api/v1/turmas?include_archived=true",
            tenant_id,
            "staff",
        )
        .await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_nonexistent_turma_returns_404(pool: PgPool) {
    let tenant_id = provision_tenant(&pool, "Turma Tenant").await;

    let app = common::build_test_app(pool);
    let response = get_as(app, "/api/v1/turmas/999999", tenant_id, "staff").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
