//! Sign-in, sign-out and profile operations

use chrono::Utc;

use revox_protocol::api::{GoogleLoginRequest, UserUpdateRequest};
use revox_protocol::common::User;

use super::{App, OperationKind, Outcome};
use crate::client::ApiClient;
use crate::error::RevoxError;
use crate::navigation::Route;
use crate::query::QueryKey;
use crate::services::AuthService;
use crate::validation;

impl<C: ApiClient> App<C> {
    /// Exchange a Google ID token for a session and go to the dashboard
    pub async fn login_with_google(&self, id_token: &str) -> Outcome<User> {
        let kind = OperationKind::GoogleLogin;
        let request = GoogleLoginRequest {
            id_token: id_token.trim().to_string(),
        };
        let errors = validation::check(&request);
        if !errors.is_empty() {
            return Outcome::Invalid(errors);
        }

        let client = &self.client;
        let auth = &self.auth;
        let id_token = &request.id_token;
        self.mutate(
            kind,
            || async move {
                let response = AuthService::new(client).login_with_google(id_token).await?;
                if response.access_token.trim().is_empty() {
                    return Err(RevoxError::authentication("The server returned no access token"));
                }
                auth.login(&response.access_token, response.user.clone())?;
                Ok(response.user)
            },
            |_| self.navigator.navigate(Route::Dashboard),
        )
        .await
    }

    /// Start a guest session
    ///
    /// Servers that only return a token get a locally built guest user.
    pub async fn login_as_guest(&self) -> Outcome<User> {
        let client = &self.client;
        let auth = &self.auth;
        self.mutate(
            OperationKind::GuestLogin,
            || async move {
                let response = AuthService::new(client).login_as_guest().await?;
                let user = response.user.unwrap_or_else(|| User::guest(Utc::now()));
                auth.login(&response.token, user.clone())?;
                Ok(user)
            },
            |_| self.navigator.navigate(Route::Dashboard),
        )
        .await
    }

    /// Drop the session, every cached read and all mirrored state
    pub fn logout(&self) {
        self.auth.logout();
        self.clear_local_state();
        self.notifier.success("Signed out");
        self.navigator.navigate(Route::Home);
    }

    pub async fn update_profile(&self, nickname: &str) -> Outcome<User> {
        let kind = OperationKind::UpdateProfile;
        let request = UserUpdateRequest {
            nickname: nickname.trim().to_string(),
        };
        let errors = validation::check(&request);
        if !errors.is_empty() {
            return Outcome::Invalid(errors);
        }
        let user_id = match self.require_user(kind) {
            Ok(user) => user.id,
            Err(e) => return Outcome::Failed(e),
        };

        let client = &self.client;
        let auth = &self.auth;
        let request = &request;
        self.mutate(
            kind,
            || async move {
                let updated = AuthService::new(client)
                    .update_user(user_id, request)
                    .await?;
                auth.update_user(updated.clone())?;
                Ok(updated)
            },
            |_| {
                self.queries.invalidate(&QueryKey::user());
            },
        )
        .await
    }

    /// Soft-delete the account, then sign out and return home
    pub async fn delete_account(&self) -> Outcome<()> {
        let kind = OperationKind::DeleteAccount;
        let user_id = match self.require_user(kind) {
            Ok(user) => user.id,
            Err(e) => return Outcome::Failed(e),
        };

        let client = &self.client;
        self.mutate(
            kind,
            || async move { AuthService::new(client).delete_user(user_id).await },
            |_| {
                self.auth.logout();
                self.clear_local_state();
                self.navigator.navigate(Route::Home);
            },
        )
        .await
    }

    pub(crate) fn clear_local_state(&self) {
        self.queries.clear();
        self.bikes.clear();
        self.maintenance.clear();
        self.ai.clear();
        self.ai_slot.update(|slot| *slot = super::AiAnswerSlot::Idle);
    }
}
