//! HTTP request handlers, grouped by resource.

pub mod attendance;
pub mod lessons;
pub mod schedule;
pub mod students;
pub mod sweep;
pub mod tenants;
pub mod turmas;
