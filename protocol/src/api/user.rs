use serde::{Deserialize, Serialize};
use validator::Validate;

/// Profile update request (`PATCH /users/{id}`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserUpdateRequest {
    #[validate(length(min = 1, max = 50, message = "Nickname is required (50 characters max)"))]
    pub nickname: String,
}
