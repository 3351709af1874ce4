/// Staff and session primary keys are UUIDs.
pub type StaffId = uuid::Uuid;

/// Roles are small fixed integers (see [`crate::roles`]).
pub type RoleId = i32;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
