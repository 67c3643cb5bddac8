//! Authentication API DTOs
//!
//! Google sign-in exchanges an ID token for an access token plus the user
//! record. Guest sign-in returns a token and, depending on the server
//! version, a user record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::User;

/// Google ID-token login request (`POST /auth/google`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GoogleLoginRequest {
    #[validate(length(min = 1, message = "Google ID token is required"))]
    pub id_token: String,
}

/// Login response containing the access token and user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    pub user: User,
    #[serde(default, with = "crate::common::timestamp::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::common::timestamp::option")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Guest login response (`POST /auth/guest`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestLoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: Option<User>,
}
