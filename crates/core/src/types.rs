/// Company primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Collections are keyed by UUID.
pub type CollectionId = uuid::Uuid;

/// Bulk jobs are keyed by UUID, generated at launch.
pub type JobId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
