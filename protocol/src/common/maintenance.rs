//! Maintenance task records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTask {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub category_id: i64,
    pub bike_id: i64,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(with = "crate::common::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::common::timestamp")]
    pub updated_at: DateTime<Utc>,
}
