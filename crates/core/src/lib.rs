//! Pure domain logic for the academy scheduling engine.
//!
//! This crate has no database or HTTP dependencies; every function computes
//! over pre-loaded data passed in by the caller. The `academy-api` crate
//! loads rows, invokes these functions, and persists the outcome. All
//! date/time values here are tenant-local wall clock; callers convert from
//! UTC before crossing into this crate.

pub mod checkin;
pub mod error;
pub mod expander;
pub mod generation;
pub mod lesson;
pub mod lifecycle;
pub mod resolver;
pub mod roles;
pub mod schedule;
pub mod sweep;
pub mod types;
