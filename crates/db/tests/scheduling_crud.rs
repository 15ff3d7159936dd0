//! Integration tests for tenant, student, turma and schedule repositories.
//!
//! Exercises the repository layer against a real database:
//! - Tenant provisioning and settings seeding
//! - Student and turma CRUD with tenant scoping
//! - Schedule replacement stamping the previous definition
//! - Generation candidate selection

use academy_db::models::student::{CreateStudent, StudentListQuery, UpdateStudent};
use academy_db::models::turma::{CreateTurma, TurmaListQuery, UpdateTurma};
use academy_db::models::schedule::{ReplaceSchedule, SlotInput};
use academy_db::models::tenant::UpdateTenantSettings;
use academy_db::repositories::tenant_settings_repo::SettingsDefaults;
use academy_db::repositories::{
    ScheduleRepo, StudentRepo, TenantRepo, TenantSettingsRepo, TurmaRepo,
};
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn defaults() -> SettingsDefaults {
    SettingsDefaults {
        checkin_early_minutes: 15,
        checkin_late_minutes: 15,
        autocomplete_grace_minutes: 120,
        horizon_days: 30,
        require_active_subscription: false,
    }
}

fn new_student(name: &str) -> CreateStudent {
    CreateStudent {
        name: name.to_string(),
        email: None,
        subscription_active: None,
    }
}

fn new_turma(name: &str) -> CreateTurma {
    CreateTurma {
        name: name.to_string(),
        instructor_id: 42,
    }
}

fn weekly_tuesday() -> ReplaceSchedule {
    ReplaceSchedule {
        effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        effective_until: None,
        slots: vec![SlotInput {
            day_of_week: 2,
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            duration_minutes: 60,
        }],
    }
}

// ---------------------------------------------------------------------------
// Test: Tenant provisioning with settings seed
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tenant_create_and_seed_settings(pool: PgPool) {
    let tenant = TenantRepo::create(&pool, "North Dojo", "America/Sao_Paulo")
        .await
        .unwrap();
    assert_eq!(tenant.name, "North Dojo");
    assert_eq!(tenant.timezone, "America/Sao_Paulo");

    TenantSettingsRepo::seed(&pool, tenant.id, &defaults())
        .await
        .unwrap();
    let settings = TenantSettingsRepo::find_for_tenant(&pool, tenant.id)
        .await
        .unwrap()
        .expect("Seeded settings should exist");
    assert_eq!(settings.checkin_early_minutes, 15);
    assert_eq!(settings.horizon_days, 30);

    // Re-seeding must not clobber anything.
    TenantSettingsRepo::update(
        &pool,
        tenant.id,
        &UpdateTenantSettings {
            horizon_days: Some(60),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .expect("Settings row should exist");
    TenantSettingsRepo::seed(&pool, tenant.id, &defaults())
        .await
        .unwrap();
    let settings = TenantSettingsRepo::find_for_tenant(&pool, tenant.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(settings.horizon_days, 60, "Seed must not overwrite updates");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_settings_patch_leaves_absent_fields(pool: PgPool) {
    let tenant = TenantRepo::create(&pool, "T", "UTC").await.unwrap();
    TenantSettingsRepo::seed(&pool, tenant.id, &defaults())
        .await
        .unwrap();

    let updated = TenantSettingsRepo::update(
        &pool,
        tenant.id,
        &UpdateTenantSettings {
            checkin_late_minutes: Some(30),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.checkin_late_minutes, 30);
    assert_eq!(updated.checkin_early_minutes, 15, "Absent field changed");
    assert_eq!(updated.autocomplete_grace_minutes, 120);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_settings_update_without_row_returns_none(pool: PgPool) {
    let tenant = TenantRepo::create(&pool, "T", "UTC").await.unwrap();
    let result = TenantSettingsRepo::update(
        &pool,
        tenant.id,
        &UpdateTenantSettings {
            horizon_days: Some(10),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: Student CRUD and tenant scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_student_crud(pool: PgPool) {
    let tenant = TenantRepo::create(&pool, "T", "UTC").await.unwrap();

    let student = StudentRepo::create(&pool, tenant.id, &new_student("Ana"))
        .await
        .unwrap();
    assert_eq!(student.name, "Ana");
    assert!(student.subscription_active, "Subscription defaults to active");

    let updated = StudentRepo::update(
        &pool,
        tenant.id,
        student.id,
        &UpdateStudent {
            subscription_active: Some(false),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert!(!updated.subscription_active);
    assert_eq!(updated.name, "Ana", "Absent field changed");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_student_lookup_is_tenant_scoped(pool: PgPool) {
    let t1 = TenantRepo::create(&pool, "A", "UTC").await.unwrap();
    let t2 = TenantRepo::create(&pool, "B", "UTC").await.unwrap();
    let student = StudentRepo::create(&pool, t1.id, &new_student("Ana"))
        .await
        .unwrap();

    let found = StudentRepo::find_by_id(&pool, t2.id, student.id)
        .await
        .unwrap();
    assert!(found.is_none(), "Foreign tenant must not see the student");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_student_list_subscription_filter(pool: PgPool) {
    let tenant = TenantRepo::create(&pool, "T", "UTC").await.unwrap();
    StudentRepo::create(&pool, tenant.id, &new_student("Active"))
        .await
        .unwrap();
    StudentRepo::create(
        &pool,
        tenant.id,
        &CreateStudent {
            name: "Lapsed".to_string(),
            email: None,
            subscription_active: Some(false),
        },
    )
    .await
    .unwrap();

    let active = StudentRepo::list(
        &pool,
        tenant.id,
        &StudentListQuery {
            subscription_active: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Active");

    let all = StudentRepo::list(&pool, tenant.id, &StudentListQuery::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

// ---------------------------------------------------------------------------
// Test: Turma CRUD and archiving
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_turma_crud_and_archive(pool: PgPool) {
    let tenant = TenantRepo::create(&pool, "T", "UTC").await.unwrap();
    let turma = TurmaRepo::create(&pool, tenant.id, &new_turma("Evening Adults"))
        .await
        .unwrap();
    assert_eq!(turma.instructor_id, 42);
    assert!(!turma.archived);

    TurmaRepo::update(
        &pool,
        tenant.id,
        turma.id,
        &UpdateTurma {
            archived: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    let visible = TurmaRepo::list(&pool, tenant.id, &TurmaListQuery::default())
        .await
        .unwrap();
    assert!(visible.is_empty(), "Archived turmas hidden by default");

    let all = TurmaRepo::list(
        &pool,
        tenant.id,
        &TurmaListQuery {
            include_archived: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(all.len(), 1);
}

// ---------------------------------------------------------------------------
// Test: Schedule replacement stamps the previous definition
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_schedule_replace_keeps_history(pool: PgPool) {
    let tenant = TenantRepo::create(&pool, "T", "UTC").await.unwrap();
    let turma = TurmaRepo::create(&pool, tenant.id, &new_turma("G"))
        .await
        .unwrap();

    let (first, slots) = ScheduleRepo::replace(&pool, tenant.id, turma.id, &weekly_tuesday())
        .await
        .unwrap();
    assert!(first.replaced_at.is_none());
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].day_of_week, 2);
    assert_eq!(slots[0].position, 0);

    let replacement = ReplaceSchedule {
        effective_from: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        effective_until: None,
        slots: vec![
            SlotInput {
                day_of_week: 4,
                start_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
                duration_minutes: 90,
            },
            SlotInput {
                day_of_week: 6,
                start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
                duration_minutes: 60,
            },
        ],
    };
    let (second, slots) = ScheduleRepo::replace(&pool, tenant.id, turma.id, &replacement)
        .await
        .unwrap();
    assert_ne!(second.id, first.id);
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[1].position, 1, "Position follows array order");

    // The current definition is the replacement; the old row survives
    // with replaced_at stamped.
    let current = ScheduleRepo::current_for_turma(&pool, tenant.id, turma.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.id, second.id);

    let stamped: Option<chrono::DateTime<chrono::Utc>> = sqlx::query_scalar(
        "SELECT replaced_at FROM schedule_definitions WHERE id = $1",
    )
    .bind(first.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(stamped.is_some(), "Old definition must be stamped, not deleted");
}

// ---------------------------------------------------------------------------
// Test: Generation candidates require a current schedule
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_generation_candidates(pool: PgPool) {
    let tenant = TenantRepo::create(&pool, "T", "UTC").await.unwrap();
    let scheduled = TurmaRepo::create(&pool, tenant.id, &new_turma("Scheduled"))
        .await
        .unwrap();
    let bare = TurmaRepo::create(&pool, tenant.id, &new_turma("Bare"))
        .await
        .unwrap();
    let archived = TurmaRepo::create(&pool, tenant.id, &new_turma("Archived"))
        .await
        .unwrap();

    ScheduleRepo::replace(&pool, tenant.id, scheduled.id, &weekly_tuesday())
        .await
        .unwrap();
    ScheduleRepo::replace(&pool, tenant.id, archived.id, &weekly_tuesday())
        .await
        .unwrap();
    TurmaRepo::update(
        &pool,
        tenant.id,
        archived.id,
        &UpdateTurma {
            archived: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let candidates = TurmaRepo::list_generation_candidates(&pool, tenant.id)
        .await
        .unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].id, scheduled.id);
    assert_ne!(candidates[0].id, bare.id, "No schedule, no generation");
}
