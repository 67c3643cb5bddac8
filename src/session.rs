//! Bridges the HTTP client to the auth store and navigator

use std::sync::Arc;

use crate::client::SessionHook;
use crate::navigation::{Navigator, Route};
use crate::stores::AuthStore;

/// Session hook backed by the auth store
///
/// The bearer token is read fresh on every request. A 401 drops the session
/// and sends the user to the login view.
pub struct Session {
    auth: Arc<AuthStore>,
    navigator: Arc<Navigator>,
}

impl Session {
    pub fn new(auth: Arc<AuthStore>, navigator: Arc<Navigator>) -> Self {
        Self { auth, navigator }
    }
}

impl SessionHook for Session {
    fn bearer_token(&self) -> Option<String> {
        self.auth.token()
    }

    fn on_unauthorized(&self) {
        self.auth.logout();
        self.navigator.navigate(Route::Login);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage, AUTH_TOKEN_KEY};
    use chrono::Utc;
    use revox_protocol::common::User;

    #[test]
    fn test_unauthorized_logs_out_and_redirects() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = Arc::new(AuthStore::new(storage.clone()));
        let navigator = Arc::new(Navigator::new(Route::Bikes));
        auth.login("tok", User::guest(Utc::now())).unwrap();

        let session = Session::new(auth.clone(), navigator.clone());
        assert_eq!(session.bearer_token().as_deref(), Some("tok"));

        session.on_unauthorized();

        assert!(!auth.is_authenticated());
        assert_eq!(session.bearer_token(), None);
        assert_eq!(storage.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert_eq!(navigator.current(), Route::Login);
    }
}
