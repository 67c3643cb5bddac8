//! Maintenance task API DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::AiQuestion;

/// Marker the AI prepends to its safety notes; dropped before display or reuse
pub const SAFETY_NOTICE_MARKER: &str = "【注意事項(安全関連のみ)】";

/// Create maintenance task request (`POST /maintenance-task`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceTaskRequest {
    #[validate(length(min = 1, message = "Task name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(range(min = 1, message = "Select a category"))]
    pub category_id: i64,
    #[validate(range(min = 1, message = "Select a bike"))]
    pub bike_id: i64,
}

impl MaintenanceTaskRequest {
    /// Build a task from an accepted AI answer
    ///
    /// `answer` is the (possibly user-edited) answer text; the safety notice
    /// marker is stripped before it becomes the task description.
    pub fn from_ai_answer(question: &AiQuestion, answer: &str) -> Self {
        Self {
            name: format!("AI question: {}", question.question),
            description: strip_safety_marker(answer).trim().to_string(),
            category_id: question.category_id,
            bike_id: question.bike_id,
        }
    }
}

/// Update maintenance task request (`PATCH /maintenance-task/{id}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct MaintenanceTaskUpdateRequest {
    #[validate(length(min = 1, message = "Task name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

/// Remove the safety notice marker from an AI answer
pub fn strip_safety_marker(answer: &str) -> String {
    answer.replace(SAFETY_NOTICE_MARKER, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_request_serializes_camel_case() {
        let request = MaintenanceTaskRequest {
            name: "Chain".to_string(),
            description: "Lubed".to_string(),
            category_id: 2,
            bike_id: 7,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"name": "Chain", "description": "Lubed", "categoryId": 2, "bikeId": 7})
        );
    }

    #[test]
    fn test_unselected_ids_rejected() {
        let request = MaintenanceTaskRequest {
            name: "Chain".to_string(),
            description: "Lubed".to_string(),
            category_id: 0,
            bike_id: 0,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("category_id"));
        assert!(errors.field_errors().contains_key("bike_id"));
    }

    #[test]
    fn test_from_ai_answer_strips_marker() {
        let question = AiQuestion {
            id: 4,
            user_id: 1,
            bike_id: 3,
            category_id: 9,
            question: "How often should I change oil?".to_string(),
            answer: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_deleted: false,
        };
        let answer = format!("Every 3000 km. {}Wear gloves.", SAFETY_NOTICE_MARKER);
        let task = MaintenanceTaskRequest::from_ai_answer(&question, &answer);

        assert_eq!(task.name, "AI question: How often should I change oil?");
        assert_eq!(task.description, "Every 3000 km. Wear gloves.");
        assert_eq!(task.bike_id, 3);
        assert_eq!(task.category_id, 9);
    }
}
