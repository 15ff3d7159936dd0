//! Current/next lesson resolution over stored rows.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use academy_core::error::CoreError;
use academy_core::resolver;
use academy_core::types::DbId;
use academy_db::models::lesson::Lesson;
use academy_db::repositories::{LessonRepo, TurmaRepo};

use crate::error::AppError;

use super::{load_tenant, tenant_local};

/// Resolution of an instant against a set of lessons, carrying full rows.
///
/// Both sides are independent: mid-lesson there is usually a `current` and
/// a `next`, between lessons only a `next`, after the last lesson neither.
#[derive(Debug, Serialize)]
pub struct ResolutionPayload {
    pub current: Option<Lesson>,
    pub next: Option<Lesson>,
}

/// Resolve the current and next lesson of a turma at `at`.
pub async fn resolve_for_turma(
    pool: &PgPool,
    tenant_id: DbId,
    turma_id: DbId,
    at: DateTime<Utc>,
) -> Result<ResolutionPayload, AppError> {
    let tenant = load_tenant(pool, tenant_id).await?;
    TurmaRepo::find_by_id(pool, tenant_id, turma_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Turma",
            id: turma_id,
        }))?;

    let local = tenant_local(&tenant, at)?;
    let candidates = LessonRepo::open_for_turma(pool, tenant_id, turma_id, local.date()).await?;
    resolve_rows(candidates, local)
}

/// Resolve the current and next lesson across every turma an instructor
/// teaches.
///
/// Instructors are external principals with no row here, so an unknown id
/// resolves to an empty payload rather than 404.
pub async fn resolve_for_instructor(
    pool: &PgPool,
    tenant_id: DbId,
    instructor_id: DbId,
    at: DateTime<Utc>,
) -> Result<ResolutionPayload, AppError> {
    let tenant = load_tenant(pool, tenant_id).await?;
    let local = tenant_local(&tenant, at)?;
    let candidates =
        LessonRepo::open_for_instructor(pool, tenant_id, instructor_id, local.date()).await?;
    resolve_rows(candidates, local)
}

fn resolve_rows(rows: Vec<Lesson>, local: NaiveDateTime) -> Result<ResolutionPayload, AppError> {
    let windows = rows
        .iter()
        .map(Lesson::to_window)
        .collect::<Result<Vec<_>, _>>()?;
    let resolution = resolver::resolve(&windows, local);

    // Current and next are disjoint: a lesson starting after `local` cannot
    // also contain it.
    let mut by_id: HashMap<DbId, Lesson> = rows.into_iter().map(|l| (l.id, l)).collect();
    let current = resolution.current.and_then(|w| by_id.remove(&w.id));
    let next = resolution.next.and_then(|w| by_id.remove(&w.id));
    Ok(ResolutionPayload { current, next })
}
