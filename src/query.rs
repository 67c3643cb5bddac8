//! Keyed read cache and mutation bookkeeping
//!
//! `QueryClient` caches read results per key with a stale time, retries a
//! failed read a bounded number of times, and lets mutations mark key
//! prefixes stale. `MutationRegistry` tracks which operation kinds are in
//! flight so a second submission can be skipped.

use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::app::OperationKind;
use crate::config::Config;
use crate::error::Result;

/// Hierarchical cache key such as `["maintenance-tasks", "3", "2"]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn bikes(user_id: i64) -> Self {
        Self::new(["bikes".to_string(), user_id.to_string()])
    }

    pub fn bike(user_id: i64, bike_id: i64) -> Self {
        Self::new(["bike".to_string(), user_id.to_string(), bike_id.to_string()])
    }

    pub fn categories() -> Self {
        Self::new(["categories"])
    }

    /// Tasks of one bike, optionally narrowed to a category
    ///
    /// With no category the key is the bike prefix itself, so invalidating
    /// a bike also covers every category under it.
    pub fn maintenance_tasks(bike_id: Option<i64>, category_id: Option<i64>) -> Self {
        let mut parts = vec!["maintenance-tasks".to_string()];
        if let Some(bike_id) = bike_id {
            parts.push(bike_id.to_string());
            if let Some(category_id) = category_id {
                parts.push(category_id.to_string());
            }
        }
        Self(parts)
    }

    pub fn latest_tasks(user_id: i64) -> Self {
        Self::new(["latest-tasks".to_string(), user_id.to_string()])
    }

    pub fn ai_questions(user_id: i64) -> Self {
        Self::new(["ai-questions".to_string(), user_id.to_string()])
    }

    pub fn user() -> Self {
        Self::new(["user"])
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(", "))
    }
}

struct Entry {
    data: Option<Arc<dyn Any + Send + Sync>>,
    fetched_at: Option<Instant>,
    stale_time: Duration,
    invalidated: bool,
    fetching: bool,
    error: Option<String>,
}

impl Entry {
    fn empty(stale_time: Duration) -> Self {
        Self {
            data: None,
            fetched_at: None,
            stale_time,
            invalidated: false,
            fetching: false,
            error: None,
        }
    }

    fn is_fresh(&self) -> bool {
        match self.fetched_at {
            Some(at) => !self.invalidated && at.elapsed() < self.stale_time,
            None => false,
        }
    }
}

/// Observable state of one key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryStatus {
    pub has_data: bool,
    pub is_fetching: bool,
    pub is_stale: bool,
    pub error: Option<String>,
}

impl QueryStatus {
    /// First load with nothing to show yet
    pub fn is_loading(&self) -> bool {
        self.is_fetching && !self.has_data
    }
}

pub struct QueryClient {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    stale_time: Duration,
    retry: u32,
    retry_delay: Duration,
}

impl QueryClient {
    pub fn new(stale_time: Duration, retry: u32) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            stale_time,
            retry,
            retry_delay: Duration::from_secs(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.stale_time(), config.query_retry)
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Cached value when fresh, otherwise run `fetcher` with the default stale time
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.fetch_with(key, self.stale_time, fetcher).await
    }

    pub async fn fetch_with<T, F, Fut>(
        &self,
        key: QueryKey,
        stale_time: Duration,
        mut fetcher: F,
    ) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        {
            let mut entries = self.lock();
            let entry = entries
                .entry(key.clone())
                .or_insert_with(|| Entry::empty(stale_time));
            entry.stale_time = stale_time;

            if entry.is_fresh() {
                if let Some(value) = entry.data.as_ref().and_then(|d| d.downcast_ref::<T>()) {
                    tracing::debug!("Query {} served from cache", key);
                    return Ok(value.clone());
                }
            }
            entry.fetching = true;
        }

        let mut attempt = 0;
        let outcome = loop {
            match fetcher().await {
                Ok(value) => break Ok(value),
                Err(e) if attempt < self.retry && e.is_retryable() => {
                    attempt += 1;
                    tracing::warn!("Query {} failed ({}), retry {}/{}", key, e, attempt, self.retry);
                    if !self.retry_delay.is_zero() {
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
                Err(e) => break Err(e),
            }
        };

        let mut entries = self.lock();
        let entry = entries
            .entry(key)
            .or_insert_with(|| Entry::empty(stale_time));
        entry.fetching = false;
        match &outcome {
            Ok(value) => {
                entry.data = Some(Arc::new(value.clone()));
                entry.fetched_at = Some(Instant::now());
                entry.invalidated = false;
                entry.error = None;
            }
            Err(e) => {
                entry.error = Some(e.to_string());
            }
        }
        outcome
    }

    /// Last value stored under `key`, fresh or not
    pub fn get_cached<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.lock()
            .get(key)
            .and_then(|e| e.data.as_ref())
            .and_then(|d| d.downcast_ref::<T>())
            .cloned()
    }

    pub fn set_data<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        let mut entries = self.lock();
        let entry = entries
            .entry(key)
            .or_insert_with(|| Entry::empty(self.stale_time));
        entry.data = Some(Arc::new(value));
        entry.fetched_at = Some(Instant::now());
        entry.invalidated = false;
        entry.error = None;
    }

    /// Mark every key under `prefix` stale; returns how many were hit
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut entries = self.lock();
        let mut hit = 0;
        for (key, entry) in entries.iter_mut() {
            if key.starts_with(prefix) {
                entry.invalidated = true;
                hit += 1;
            }
        }
        tracing::debug!("Invalidated {} queries under {}", hit, prefix);
        hit
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        match self.lock().get(key) {
            Some(entry) => QueryStatus {
                has_data: entry.data.is_some(),
                is_fetching: entry.fetching,
                is_stale: !entry.is_fresh(),
                error: entry.error.clone(),
            },
            None => QueryStatus {
                is_stale: true,
                ..QueryStatus::default()
            },
        }
    }

    /// Drop every cached entry, used on sign-out
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// In-flight mutations by kind
#[derive(Debug, Default)]
pub struct MutationRegistry {
    pending: Mutex<HashSet<OperationKind>>,
}

impl MutationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `kind`; `None` when a mutation of that kind is already running
    pub fn begin(&self, kind: OperationKind) -> Option<MutationGuard<'_>> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if pending.insert(kind) {
            Some(MutationGuard {
                registry: self,
                kind,
            })
        } else {
            None
        }
    }

    pub fn is_pending(&self, kind: OperationKind) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&kind)
    }
}

/// Releases its kind when dropped, whatever the outcome
pub struct MutationGuard<'a> {
    registry: &'a MutationRegistry,
    kind: OperationKind,
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.registry
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&self.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RevoxError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn client() -> QueryClient {
        QueryClient::new(Duration::from_secs(300), 1).with_retry_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_fresh_value_is_cached() {
        let queries = client();
        let calls = &AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Vec<i64> = queries
                .fetch(QueryKey::bikes(1), move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![1, 2])
                })
                .await
                .unwrap();
            assert_eq!(value, vec![1, 2]);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let queries = client();
        let calls = &AtomicUsize::new(0);
        let fetch = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, RevoxError>(calls.load(Ordering::SeqCst))
        };

        queries
            .fetch(QueryKey::maintenance_tasks(Some(3), Some(2)), fetch)
            .await
            .unwrap();
        assert_eq!(
            queries.invalidate(&QueryKey::maintenance_tasks(Some(3), None)),
            1
        );
        assert!(queries.status(&QueryKey::maintenance_tasks(Some(3), Some(2))).is_stale);

        let second = queries
            .fetch(QueryKey::maintenance_tasks(Some(3), Some(2)), fetch)
            .await
            .unwrap();
        assert_eq!(second, 2);
    }

    #[tokio::test]
    async fn test_prefix_does_not_cross_bikes() {
        let queries = client();
        queries.set_data(QueryKey::maintenance_tasks(Some(31), None), 1usize);
        queries.set_data(QueryKey::maintenance_tasks(Some(3), None), 1usize);

        assert_eq!(
            queries.invalidate(&QueryKey::maintenance_tasks(Some(3), None)),
            1
        );
        assert!(!queries.status(&QueryKey::maintenance_tasks(Some(31), None)).is_stale);
    }

    #[tokio::test]
    async fn test_retries_once_on_server_error() {
        let queries = client();
        let calls = &AtomicUsize::new(0);

        let result: Result<u8> = queries
            .fetch(QueryKey::categories(), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(RevoxError::http(500, None))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(queries.status(&QueryKey::categories()).error.is_some());
    }

    #[tokio::test]
    async fn test_no_retry_on_not_found() {
        let queries = client();
        let calls = &AtomicUsize::new(0);

        let result: Result<u8> = queries
            .fetch(QueryKey::bike(1, 9), move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(RevoxError::http(404, None))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_stale_time_always_fetches() {
        let queries = client();
        let calls = &AtomicUsize::new(0);

        for _ in 0..2 {
            let _: u8 = queries
                .fetch_with(QueryKey::user(), Duration::ZERO, move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(1)
                })
                .await
                .unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clear_drops_everything() {
        let queries = client();
        queries.set_data(QueryKey::bikes(1), vec![1i64]);
        queries.clear();
        assert_eq!(queries.get_cached::<Vec<i64>>(&QueryKey::bikes(1)), None);
        assert!(!queries.status(&QueryKey::bikes(1)).has_data);
    }

    #[test]
    fn test_mutation_guard_releases() {
        let registry = MutationRegistry::new();
        let guard = registry.begin(OperationKind::CreateBike);
        assert!(guard.is_some());
        assert!(registry.is_pending(OperationKind::CreateBike));
        assert!(registry.begin(OperationKind::CreateBike).is_none());
        assert!(registry.begin(OperationKind::DeleteBike).is_some());

        drop(guard);
        assert!(!registry.is_pending(OperationKind::CreateBike));
    }
}
