//! Client-side state containers
//!
//! Each store mirrors a slice of server data for display. Every action is a
//! single locked update, so readers never observe a half-applied change.
//! Stores are plain values; share them with `Arc`.

use std::sync::RwLock;

pub mod ai;
pub mod auth;
pub mod bikes;
pub mod maintenance;

pub use ai::{AiState, AiStore};
pub use auth::{AuthState, AuthStore};
pub use bikes::{BikeState, BikeStore};
pub use maintenance::{MaintenanceState, MaintenanceStore};

/// Snapshot-on-read, update-under-lock cell
#[derive(Debug, Default)]
pub struct StateCell<S> {
    inner: RwLock<S>,
}

impl<S: Clone> StateCell<S> {
    pub fn new(state: S) -> Self {
        Self {
            inner: RwLock::new(state),
        }
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> S {
        self.read(Clone::clone)
    }

    pub fn read<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }

    pub fn update<T>(&self, f: impl FnOnce(&mut S) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }
}

/// Records that can be reconciled by server id
pub(crate) trait Identified {
    fn id(&self) -> i64;
}

impl Identified for revox_protocol::common::Bike {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for revox_protocol::common::MaintenanceTask {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for revox_protocol::common::AiQuestion {
    fn id(&self) -> i64 {
        self.id
    }
}

/// Replace the entry with the same id, or append when absent
pub(crate) fn upsert<T: Identified>(items: &mut Vec<T>, item: T) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item,
        None => items.push(item),
    }
}

/// Replace the entry with the same id; returns false when absent
pub(crate) fn replace<T: Identified>(items: &mut [T], item: T) -> bool {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => {
            *existing = item;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(i64, &'static str);

    impl Identified for Row {
        fn id(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_upsert_never_duplicates() {
        let mut rows = vec![Row(1, "a")];
        upsert(&mut rows, Row(2, "b"));
        upsert(&mut rows, Row(2, "c"));
        assert_eq!(rows, vec![Row(1, "a"), Row(2, "c")]);
    }

    #[test]
    fn test_replace_missing_is_noop() {
        let mut rows = vec![Row(1, "a")];
        assert!(!replace(&mut rows, Row(9, "z")));
        assert_eq!(rows, vec![Row(1, "a")]);
    }

    #[test]
    fn test_state_cell_update_and_snapshot() {
        let cell = StateCell::new(vec![1, 2]);
        let len = cell.update(|v| {
            v.push(3);
            v.len()
        });
        assert_eq!(len, 3);
        assert_eq!(cell.snapshot(), vec![1, 2, 3]);
    }
}
