use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;

use academy_core::types::DbId;
use academy_db::repositories::tenant_settings_repo::SettingsDefaults;
use academy_api::config::ServerConfig;
use academy_api::router::build_app_router;
use academy_api::state::AppState;

/// Caller id stamped on identity-carrying requests. Handlers only log it,
/// so any numeric value works.
pub const CALLER_ID: DbId = 7;

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout, and the stock settings seeds so tests can
/// assert against known policy values.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        settings_defaults: SettingsDefaults {
            checkin_early_minutes: 15,
            checkin_late_minutes: 15,
            autocomplete_grace_minutes: 120,
            horizon_days: 30,
            require_active_subscription: false,
        },
        sweep_interval_secs: 300,
        horizon_interval_secs: 3600,
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Delegates to [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Send a request and return the response. `identity` carries the
/// `(tenant_id, role)` pair forwarded by the proxy headers; `None` sends
/// the request anonymously.
async fn send(
    app: Router,
    method: Method,
    path: &str,
    identity: Option<(DbId, &str)>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some((tenant_id, role)) = identity {
        builder = builder
            .header("x-caller-id", CALLER_ID.to_string())
            .header("x-tenant-id", tenant_id.to_string())
            .header("x-role", role);
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// GET without identity headers (health checks, rejection tests).
pub async fn get(app: Router, path: &str) -> Response {
    send(app, Method::GET, path, None, None).await
}

/// GET as a caller in `tenant_id` with `role`.
pub async fn get_as(app: Router, path: &str, tenant_id: DbId, role: &str) -> Response {
    send(app, Method::GET, path, Some((tenant_id, role)), None).await
}

/// POST with an empty body as a caller in `tenant_id` with `role`.
/// Lifecycle transitions and default-window generation take no body.
pub async fn post_as(app: Router, path: &str, tenant_id: DbId, role: &str) -> Response {
    send(app, Method::POST, path, Some((tenant_id, role)), None).await
}

/// POST a JSON body as a caller in `tenant_id` with `role`.
pub async fn post_json_as(
    app: Router,
    path: &str,
    tenant_id: DbId,
    role: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, path, Some((tenant_id, role)), Some(body)).await
}

/// PUT a JSON body as a caller in `tenant_id` with `role`.
pub async fn put_json_as(
    app: Router,
    path: &str,
    tenant_id: DbId,
    role: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, path, Some((tenant_id, role)), Some(body)).await
}

/// PATCH a JSON body as a caller in `tenant_id` with `role`.
pub async fn patch_json_as(
    app: Router,
    path: &str,
    tenant_id: DbId,
    role: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PATCH, path, Some((tenant_id, role)), Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    use http_body_util::BodyExt;
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
