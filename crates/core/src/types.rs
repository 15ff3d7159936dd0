/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All instant-in-time values are UTC. Wall-clock fields (lesson dates and
/// times) use `chrono::NaiveDate` / `chrono::NaiveTime` instead.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
