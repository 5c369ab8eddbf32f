/// All primary keys are PostgreSQL UUIDs generated by `gen_random_uuid()`.
pub type RecordId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
