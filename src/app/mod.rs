//! Application operations
//!
//! `App` owns the API client and the shared state (stores, query cache,
//! navigator, notifier). Each operation validates its input, calls one
//! service, reconciles the affected store, invalidates dependent queries and
//! emits exactly one notification.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use revox_protocol::common::User;

use crate::client::{ApiClient, HttpClient};
use crate::config::Config;
use crate::error::{Result, RevoxError};
use crate::navigation::{self, Navigator, Route};
use crate::notify::Notifier;
use crate::query::{MutationRegistry, QueryClient, QueryKey};
use crate::session::Session;
use crate::storage::KeyValueStorage;
use crate::stores::{AiStore, AuthStore, BikeStore, MaintenanceStore, StateCell};

pub mod ai;
pub mod auth;
pub mod bikes;
pub mod categories;
pub mod maintenance;
pub mod operation;

pub use ai::{AiAnswerSlot, AskQuestion};
pub use operation::{OperationKind, Outcome};

pub struct App<C: ApiClient> {
    client: C,
    config: Config,
    auth: Arc<AuthStore>,
    bikes: Arc<BikeStore>,
    maintenance: Arc<MaintenanceStore>,
    ai: Arc<AiStore>,
    queries: QueryClient,
    mutations: MutationRegistry,
    navigator: Arc<Navigator>,
    notifier: Arc<dyn Notifier>,
    ai_slot: StateCell<AiAnswerSlot>,
}

impl App<HttpClient> {
    /// Wire the HTTP client to a fresh auth store over `storage`
    pub fn connect(
        config: Config,
        storage: Arc<dyn KeyValueStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let auth = Arc::new(AuthStore::new(storage));
        let navigator = Arc::new(Navigator::default());
        let session = Arc::new(Session::new(auth.clone(), navigator.clone()));
        let client = HttpClient::new(config.clone(), session)?;
        Ok(Self::new(client, config, auth, navigator, notifier))
    }
}

impl<C: ApiClient> App<C> {
    /// Assemble an app around an existing client
    ///
    /// `auth` and `navigator` must be the same instances the client's
    /// session hook holds, so a 401 seen by the client is visible here.
    pub fn new(
        client: C,
        config: Config,
        auth: Arc<AuthStore>,
        navigator: Arc<Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let queries = QueryClient::from_config(&config);
        Self {
            client,
            config,
            auth,
            bikes: Arc::new(BikeStore::new()),
            maintenance: Arc::new(MaintenanceStore::new()),
            ai: Arc::new(AiStore::new()),
            queries,
            mutations: MutationRegistry::new(),
            navigator,
            notifier,
            ai_slot: StateCell::new(AiAnswerSlot::Idle),
        }
    }

    /// Replace the query cache, e.g. to shorten retry delays
    pub fn with_queries(mut self, queries: QueryClient) -> Self {
        self.queries = queries;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    pub fn bikes(&self) -> &BikeStore {
        &self.bikes
    }

    pub fn maintenance(&self) -> &MaintenanceStore {
        &self.maintenance
    }

    pub fn ai(&self) -> &AiStore {
        &self.ai
    }

    pub fn queries(&self) -> &QueryClient {
        &self.queries
    }

    pub fn mutations(&self) -> &MutationRegistry {
        &self.mutations
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn ai_slot(&self) -> AiAnswerSlot {
        self.ai_slot.snapshot()
    }

    /// Restore the persisted session; no network involved
    pub fn restore_session(&self) -> bool {
        let restored = self.auth.restore();
        if restored {
            tracing::info!("Session restored");
        }
        restored
    }

    /// Navigate to `path` through the route guard and return where we landed
    pub fn open(&self, path: &str) -> Route {
        let route = navigation::resolve(path, self.auth.is_authenticated());
        self.navigator.navigate(route);
        route
    }

    /// Signed-in user, or a session error when there is none
    pub fn current_user(&self) -> Result<User> {
        self.auth.user().ok_or_else(RevoxError::session_not_found)
    }

    fn require_user(&self, kind: OperationKind) -> Result<User> {
        self.current_user().inspect_err(|e| self.report(kind, e))
    }

    /// Notify one failure; a rejected session also drops everything mirrored
    /// from the server
    fn report(&self, kind: OperationKind, error: &RevoxError) {
        tracing::debug!("{:?} failed: {}", kind, error);
        if error.is_unauthorized() {
            self.clear_local_state();
        }
        self.notifier.error(&error.user_message(kind.failure_message()));
    }

    fn announce(&self, kind: OperationKind) {
        if let Some(message) = kind.success_message() {
            self.notifier.success(message);
        }
    }

    /// Cached read with the configured stale time; failures notify once
    async fn read<T, F, Fut>(&self, kind: OperationKind, key: QueryKey, fetcher: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.read_with(kind, key, self.config.stale_time(), fetcher)
            .await
    }

    async fn read_with<T, F, Fut>(
        &self,
        kind: OperationKind,
        key: QueryKey,
        stale_time: Duration,
        fetcher: F,
    ) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.queries
            .fetch_with(key, stale_time, fetcher)
            .await
            .inspect_err(|e| self.report(kind, e))
    }

    /// Run one mutation under the pending guard for `kind`
    ///
    /// `reconcile` runs only on success, before the success notification.
    /// Mutations are sent once; there is no retry.
    async fn mutate<T, F, Fut>(
        &self,
        kind: OperationKind,
        call: F,
        reconcile: impl FnOnce(&T),
    ) -> Outcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(_guard) = self.mutations.begin(kind) else {
            tracing::debug!("{:?} already pending, skipping", kind);
            return Outcome::Skipped;
        };

        match call().await {
            Ok(value) => {
                reconcile(&value);
                self.announce(kind);
                Outcome::Applied(value)
            }
            Err(error) => {
                self.report(kind, &error);
                Outcome::Failed(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{Level, RecordingNotifier};
    use crate::storage::MemoryStorage;
    use crate::tests::mocks::MockApiClient;
    use chrono::Utc;

    fn app() -> (App<MockApiClient>, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let auth = Arc::new(AuthStore::new(Arc::new(MemoryStorage::new())));
        let app = App::new(
            MockApiClient::new(),
            Config::default(),
            auth,
            Arc::new(Navigator::default()),
            notifier.clone(),
        );
        (app, notifier)
    }

    #[test]
    fn test_open_guards_protected_routes() {
        let (app, _) = app();
        assert_eq!(app.open("/bikes"), Route::Login);
        assert_eq!(app.navigator().current(), Route::Login);

        app.auth().login("tok", User::guest(Utc::now())).unwrap();
        assert_eq!(app.open("/bikes"), Route::Bikes);
        assert_eq!(app.open("/nowhere"), Route::Dashboard);
    }

    #[tokio::test]
    async fn test_operations_without_session_fail_once() {
        let (app, notifier) = app();

        let result = app.load_bikes().await;

        assert!(matches!(result, Err(RevoxError::Session { .. })));
        assert_eq!(notifier.messages(Level::Error).len(), 1);
        assert!(app.client().requests().is_empty());
    }
}
