//! Periodic auto-completion sweep.
//!
//! Closes out lessons whose window ended more than the tenant's grace
//! period ago without anyone finishing or cancelling them. Runs on a
//! fixed interval using `tokio::time::interval`; the manual trigger at
//! `POST /api/v1/admin/sweep/auto-complete` shares the same engine code.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::engine::sweep::sweep_all_tenants;

/// Run the auto-completion sweep loop until `cancel` is triggered.
pub async fn run(pool: PgPool, config: Arc<ServerConfig>, cancel: CancellationToken) {
    let interval_secs = config.sweep_interval_secs;
    tracing::info!(interval_secs, "Auto-completion sweep job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Auto-completion sweep job stopping");
                break;
            }
            _ = interval.tick() => {
                match sweep_all_tenants(&pool, &config.settings_defaults, Utc::now()).await {
                    Ok(completed) => {
                        if completed > 0 {
                            tracing::info!(completed, "Sweep pass auto-completed lessons");
                        } else {
                            tracing::debug!("Sweep pass found nothing overdue");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Sweep pass failed");
                    }
                }
            }
        }
    }
}
