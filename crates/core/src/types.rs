/// Primary key of every table (`BIGSERIAL`).
pub type DbId = i64;

/// UTC instant, mapped to `TIMESTAMPTZ`.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Position in a queue session. Numbering starts at 1; 0 means "none yet".
pub type QueueNumber = i32;
