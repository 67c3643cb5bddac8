//! Wire types for the REVOX maintenance API
//!
//! - `common`: records returned by the server (users, bikes, categories, tasks, AI questions)
//! - `api`: request and response bodies, with their validation rules
//!
//! Both modules have a `user` submodule, so items are reached through
//! `api::` or `common::` rather than from the crate root.

pub mod api;
pub mod common;

#[cfg(test)]
mod tests {
    use super::{api, common};

    #[test]
    fn test_user_modules_stay_separate() {
        let request = api::user::UserUpdateRequest {
            nickname: "Rider".to_string(),
        };
        let guest = common::user::User::guest(chrono::Utc::now());
        assert_eq!(request.nickname, "Rider");
        assert!(guest.is_guest());
    }
}
