//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods on tenant-owned
//! tables take the `tenant_id` explicitly and scope every statement by it.

pub mod attendance_repo;
pub mod lesson_repo;
pub mod schedule_repo;
pub mod student_repo;
pub mod tenant_repo;
pub mod tenant_settings_repo;
pub mod turma_repo;

pub use attendance_repo::AttendanceRepo;
pub use lesson_repo::LessonRepo;
pub use schedule_repo::ScheduleRepo;
pub use student_repo::StudentRepo;
pub use tenant_repo::TenantRepo;
pub use tenant_settings_repo::TenantSettingsRepo;
pub use turma_repo::TurmaRepo;
