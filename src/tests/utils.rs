//! Test utilities and helpers for unit tests
//!
//! This module provides common testing utilities including:
//! - Server records in wire format
//! - Helper functions for creating test fixtures

#[cfg(test)]
pub mod test_helpers {
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    use revox_protocol::common::AiQuestion;

    const CREATED_AT: &str = "2024-05-01T09:30:00";

    pub fn sample_user(id: i64) -> Value {
        json!({
            "id": id,
            "uniqueUserId": format!("google-{}", id),
            "nickname": "Rider",
            "displayEmail": "rider@example.com",
            "createdAt": CREATED_AT,
            "updatedAt": CREATED_AT,
        })
    }

    pub fn sample_bike(id: i64, user_id: i64, manufacturer: &str, model_name: &str) -> Value {
        json!({
            "id": id,
            "userId": user_id,
            "manufacturer": manufacturer,
            "modelName": model_name,
            "createdAt": CREATED_AT,
            "updatedAt": CREATED_AT,
        })
    }

    pub fn sample_task(id: i64, bike_id: i64, category_id: i64, name: &str) -> Value {
        json!({
            "id": id,
            "name": name,
            "description": format!("{} done", name),
            "categoryId": category_id,
            "bikeId": bike_id,
            "isCompleted": false,
            "isDeleted": false,
            "createdAt": CREATED_AT,
            "updatedAt": CREATED_AT,
        })
    }

    pub fn sample_question(id: i64, bike_id: i64, category_id: i64) -> AiQuestion {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        AiQuestion {
            id,
            user_id: 1,
            bike_id,
            category_id,
            question: "How do I adjust the chain slack?".to_string(),
            answer: "Loosen the axle nut and turn the adjusters evenly.".to_string(),
            created_at: at,
            updated_at: at,
            is_deleted: false,
        }
    }
}
