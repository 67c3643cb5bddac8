//! Sign-in and account operations

use serde::de::IgnoredAny;

use revox_protocol::api::{GoogleLoginRequest, GuestLoginResponse, LoginResponse, UserUpdateRequest};
use revox_protocol::common::User;

use crate::client::ApiClient;
use crate::error::Result;

pub struct AuthService<'a, C: ApiClient + ?Sized> {
    client: &'a C,
}

impl<'a, C: ApiClient + ?Sized> AuthService<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Exchange a Google ID token for an access token and user
    pub async fn login_with_google(&self, id_token: &str) -> Result<LoginResponse> {
        let request = GoogleLoginRequest {
            id_token: id_token.to_string(),
        };
        self.client.post("/auth/google", Some(&request)).await
    }

    /// Start a guest session
    ///
    /// The body is `{"token": ...}`; newer servers also send the user.
    pub async fn login_as_guest(&self) -> Result<GuestLoginResponse> {
        self.client.post::<(), _>("/auth/guest", None).await
    }

    pub async fn update_user(&self, user_id: i64, request: &UserUpdateRequest) -> Result<User> {
        self.client
            .patch(&format!("/users/{}", user_id), Some(request))
            .await
    }

    /// Soft-delete the account
    pub async fn delete_user(&self, user_id: i64) -> Result<()> {
        let _: IgnoredAny = self
            .client
            .patch::<(), _>(&format!("/users/{}/softDelete", user_id), None)
            .await?;
        Ok(())
    }
}
