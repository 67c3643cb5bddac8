//! AI question/answer records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier carried by the client-only placeholder while an answer is generated
pub const PLACEHOLDER_ID: i64 = -1;

/// Answer text shown while the server is still generating
pub const PLACEHOLDER_ANSWER: &str = "Generating an answer from the AI...";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiQuestion {
    pub id: i64,
    pub user_id: i64,
    pub bike_id: i64,
    pub category_id: i64,
    pub question: String,
    pub answer: String,
    #[serde(with = "crate::common::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::common::timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_deleted: bool,
}

impl AiQuestion {
    /// Placeholder shown between submission and the server's answer
    pub fn placeholder(
        user_id: i64,
        bike_id: i64,
        category_id: i64,
        question: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: PLACEHOLDER_ID,
            user_id,
            bike_id,
            category_id,
            question: question.into(),
            answer: PLACEHOLDER_ANSWER.to_string(),
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ID
    }
}
