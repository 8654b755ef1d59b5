/// All database primary keys are PostgreSQL UUIDs (`gen_random_uuid()`).
///
/// Ids are opaque to clients and stable across archive/restore: restoring
/// an archived note re-inserts the row under its original id.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC, serialized as RFC 3339 strings.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
