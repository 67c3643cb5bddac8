//! Signed-in user and bearer token, mirrored to persistent storage

use std::sync::Arc;

use revox_protocol::common::User;

use super::StateCell;
use crate::error::Result;
use crate::storage::{KeyValueStorage, AUTH_TOKEN_KEY, USER_DATA_KEY};
use crate::token;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

pub struct AuthStore {
    state: StateCell<AuthState>,
    storage: Arc<dyn KeyValueStorage>,
}

impl AuthStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            state: StateCell::new(AuthState::default()),
            storage,
        }
    }

    pub fn snapshot(&self) -> AuthState {
        self.state.snapshot()
    }

    pub fn token(&self) -> Option<String> {
        self.state.read(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.state.read(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read(|s| s.is_authenticated)
    }

    /// Persist and adopt a new session
    pub fn login(&self, token: &str, user: User) -> Result<()> {
        let user_json = serde_json::to_string(&user)?;
        self.storage.set(AUTH_TOKEN_KEY, token)?;
        self.storage.set(USER_DATA_KEY, &user_json)?;

        tracing::info!("Signed in as user {}", user.id);
        self.state.update(|s| {
            *s = AuthState {
                user: Some(user),
                token: Some(token.to_string()),
                is_authenticated: true,
                is_loading: false,
                error: None,
            }
        });
        Ok(())
    }

    /// Forget the session in memory and in storage
    ///
    /// Storage failures are logged, never returned: a logout must always
    /// leave the in-memory state signed out.
    pub fn logout(&self) {
        for key in [AUTH_TOKEN_KEY, USER_DATA_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!("Failed to clear {} from session storage: {}", key, e);
            }
        }

        let was_signed_in = self.state.update(|s| {
            let was = s.is_authenticated;
            *s = AuthState::default();
            was
        });
        if was_signed_in {
            tracing::info!("Signed out");
        }
    }

    pub fn update_user(&self, user: User) -> Result<()> {
        let user_json = serde_json::to_string(&user)?;
        self.storage.set(USER_DATA_KEY, &user_json)?;
        self.state.update(|s| s.user = Some(user));
        Ok(())
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.update(|s| s.is_loading = loading);
    }

    pub fn set_error(&self, error: Option<String>) {
        self.state.update(|s| s.error = error);
    }

    /// Rebuild the session from storage without touching the network
    ///
    /// A present, decodable, unexpired token plus a readable user restores
    /// the session. Anything else clears storage and leaves the store
    /// signed out. Returns whether a session was restored.
    pub fn restore(&self) -> bool {
        match self.read_persisted() {
            Some((token, user)) if !token::is_token_expired(&token) => {
                tracing::debug!("Restored session for user {}", user.id);
                self.state.update(|s| {
                    *s = AuthState {
                        user: Some(user),
                        token: Some(token),
                        is_authenticated: true,
                        is_loading: false,
                        error: None,
                    }
                });
                true
            }
            Some(_) => {
                tracing::info!("Persisted session has expired");
                self.logout();
                false
            }
            None => {
                self.logout();
                false
            }
        }
    }

    fn read_persisted(&self) -> Option<(String, User)> {
        let token = self.storage.get(AUTH_TOKEN_KEY).ok().flatten()?;
        let user_json = self.storage.get(USER_DATA_KEY).ok().flatten()?;
        match serde_json::from_str::<User>(&user_json) {
            Ok(user) => Some((token, user)),
            Err(e) => {
                tracing::warn!("Persisted user record is unreadable: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::token::encode_test_token;
    use chrono::{Duration, Utc};

    fn rider() -> User {
        User {
            id: 7,
            unique_user_id: "google-7".to_string(),
            nickname: "Rider".to_string(),
            display_email: "rider@example.com".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn live_token() -> String {
        encode_test_token("7", (Utc::now() + Duration::hours(1)).timestamp())
    }

    #[test]
    fn test_login_persists_both_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let store = AuthStore::new(storage.clone());
        store.login("tok", rider()).unwrap();

        assert!(store.is_authenticated());
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap().as_deref(), Some("tok"));
        let saved: User =
            serde_json::from_str(&storage.get(USER_DATA_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved.id, 7);
    }

    #[test]
    fn test_logout_clears_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let store = AuthStore::new(storage.clone());
        store.login("tok", rider()).unwrap();
        store.logout();

        assert_eq!(store.snapshot(), AuthState::default());
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_DATA_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_valid_session() {
        let storage = Arc::new(MemoryStorage::new());
        let token = live_token();
        AuthStore::new(storage.clone()).login(&token, rider()).unwrap();

        let fresh = AuthStore::new(storage);
        assert!(fresh.restore());
        assert!(fresh.is_authenticated());
        assert_eq!(fresh.token(), Some(token));
        assert_eq!(fresh.user().map(|u| u.nickname), Some("Rider".to_string()));
    }

    #[test]
    fn test_restore_expired_session_clears_storage() {
        let storage = Arc::new(MemoryStorage::new());
        let expired = encode_test_token("7", (Utc::now() - Duration::minutes(1)).timestamp());
        AuthStore::new(storage.clone()).login(&expired, rider()).unwrap();

        let fresh = AuthStore::new(storage.clone());
        assert!(!fresh.restore());
        assert!(!fresh.is_authenticated());
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_DATA_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_malformed_session() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(AUTH_TOKEN_KEY, "not-a-jwt").unwrap();
        storage.set(USER_DATA_KEY, "{}").unwrap();

        let store = AuthStore::new(storage.clone());
        assert!(!store.restore());
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);

        storage.set(AUTH_TOKEN_KEY, &live_token()).unwrap();
        storage.set(USER_DATA_KEY, "not json").unwrap();
        assert!(!store.restore());
        assert_eq!(storage.get(USER_DATA_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_requires_user() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(AUTH_TOKEN_KEY, &live_token()).unwrap();

        let store = AuthStore::new(storage.clone());
        assert!(!store.restore());
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_update_user_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let store = AuthStore::new(storage.clone());
        store.login("tok", rider()).unwrap();

        let renamed = User {
            nickname: "Night Rider".to_string(),
            ..rider()
        };
        store.update_user(renamed).unwrap();

        assert_eq!(store.user().map(|u| u.nickname), Some("Night Rider".to_string()));
        assert!(storage.get(USER_DATA_KEY).unwrap().unwrap().contains("Night Rider"));
    }
}
