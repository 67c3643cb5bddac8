//! User records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier used for the locally synthesized guest user
pub const GUEST_USER_ID: i64 = 99_999_999;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub unique_user_id: String,
    pub nickname: String,
    pub display_email: String,
    #[serde(with = "crate::common::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::common::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Local stand-in for guest sessions whose login response carries no user
    pub fn guest(now: DateTime<Utc>) -> Self {
        Self {
            id: GUEST_USER_ID,
            unique_user_id: "guest-user".to_string(),
            nickname: "Guest".to_string(),
            display_email: "guest@example.com".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_guest(&self) -> bool {
        self.id == GUEST_USER_ID
    }
}
