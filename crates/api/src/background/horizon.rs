//! Periodic horizon generation.
//!
//! Keeps every active turma's lesson calendar materialized up to its
//! tenant's horizon without waiting for a schedule edit or a manual
//! generate call. Archived turmas and turmas without a current schedule
//! definition are skipped at the query level.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use academy_db::repositories::{TenantRepo, TurmaRepo};

use crate::config::ServerConfig;
use crate::engine::generation::ensure_lessons_generated;

/// Run the horizon generation loop until `cancel` is triggered.
pub async fn run(pool: PgPool, config: Arc<ServerConfig>, cancel: CancellationToken) {
    let interval_secs = config.horizon_interval_secs;
    tracing::info!(interval_secs, "Horizon generation job started");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Horizon generation job stopping");
                break;
            }
            _ = interval.tick() => {
                run_pass(&pool, &config).await;
            }
        }
    }
}

/// One pass over every tenant's generation candidates. Failures are
/// isolated per turma so one bad schedule never stalls the rest.
async fn run_pass(pool: &PgPool, config: &ServerConfig) {
    let tenants = match TenantRepo::list(pool).await {
        Ok(tenants) => tenants,
        Err(e) => {
            tracing::error!(error = %e, "Horizon pass could not list tenants");
            return;
        }
    };

    let now = Utc::now();
    let mut created = 0usize;
    for tenant in tenants {
        let turmas = match TurmaRepo::list_generation_candidates(pool, tenant.id).await {
            Ok(turmas) => turmas,
            Err(e) => {
                tracing::warn!(
                    tenant_id = tenant.id,
                    error = %e,
                    "Horizon pass could not list turmas"
                );
                continue;
            }
        };
        for turma in turmas {
            match ensure_lessons_generated(
                pool,
                tenant.id,
                turma.id,
                None,
                &config.settings_defaults,
                now,
            )
            .await
            {
                Ok(result) => created += result.created.len(),
                Err(e) => {
                    tracing::warn!(
                        tenant_id = tenant.id,
                        turma_id = turma.id,
                        error = %e,
                        "Horizon generation failed for turma"
                    );
                }
            }
        }
    }

    if created > 0 {
        tracing::info!(created, "Horizon pass materialized lessons");
    } else {
        tracing::debug!("Horizon pass created nothing new");
    }
}
