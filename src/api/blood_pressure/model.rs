// Blood pressure entity and its transfer object

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name used in alert headers and error payloads
pub const ENTITY_NAME: &str = "bloodPressure";

/// Accounts every installation starts with; `schema_init.sql` seeds the same rows
pub const DEFAULT_USERS: &[(i64, &str)] = &[
    (1, "system"),
    (2, "anonymoususer"),
    (3, "admin"),
    (4, "user"),
];

/// Owning user of a reading; the login is only known when loaded from storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: i64,
    pub login: Option<String>,
}

/// A stored blood pressure reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloodPressure {
    pub id: Option<i64>,
    pub timestamp: DateTime<Utc>,
    pub systolic: i32,
    pub diastolic: i32,
    pub user: Option<UserRef>,
}

/// Wire representation of a reading. Required fields are optional here so that a missing value
/// is reported as a field error instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BloodPressureDto {
    pub id: Option<i64>,
    pub timestamp: Option<DateTime<Utc>>,
    pub systolic: Option<i32>,
    pub diastolic: Option<i32>,
    pub user_id: Option<i64>,
    pub user_login: Option<String>,
}
