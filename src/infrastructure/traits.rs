//! Store boundary traits for testability
//!
//! The resolver never talks to a backing store directly; it goes through
//! [`ContainerStore`], allowing services to be tested with fake stores.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::domain::{ContainerRef, OrganizingPolicy};

/// Failure to answer a store lookup (backing resource unavailable etc.).
///
/// Not raised for unknown containers; those are simply not organizing.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("lookup failed for container '{container}': {reason}")]
    Unavailable { container: String, reason: String },

    #[error("backend error for container '{container}'")]
    Backend {
        container: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for store lookups.
pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only view of the container hierarchy during resolution.
pub trait ContainerStore: Send + Sync {
    /// Return the organizing policy attached to `container`, if any.
    ///
    /// `Ok(None)` means the container is plain or the reference does not
    /// address a known container. Revision tags on the reference are ignored.
    fn organizing_policy(
        &self,
        container: &ContainerRef,
    ) -> StoreResult<Option<Arc<dyn OrganizingPolicy>>>;
}

/// In-memory store implementation.
///
/// Keyed by container id; revision tags never participate in lookups.
#[derive(Default)]
pub struct InMemoryStore {
    containers: HashMap<String, Option<Arc<dyn OrganizingPolicy>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plain (non-organizing) container.
    pub fn insert_plain(&mut self, id: impl Into<String>) {
        self.containers.insert(id.into(), None);
    }

    /// Register an organizing container with its policy.
    pub fn insert_organizing(&mut self, id: impl Into<String>, policy: Arc<dyn OrganizingPolicy>) {
        self.containers.insert(id.into(), Some(policy));
    }

    /// Whether a container id is registered at all.
    pub fn contains(&self, id: &str) -> bool {
        self.containers.contains_key(id)
    }

    /// Registered container ids, sorted.
    pub fn container_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.containers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Policy kind for a container id, if it is organizing.
    pub fn policy_kind(&self, id: &str) -> Option<&'static str> {
        self.containers
            .get(id)
            .and_then(|p| p.as_ref())
            .map(|p| p.kind())
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Policies are trait objects without Debug; show ids with policy kinds.
        let mut map = f.debug_map();
        for id in self.container_ids() {
            map.entry(&id, &self.policy_kind(id));
        }
        map.finish()
    }
}

impl ContainerStore for InMemoryStore {
    fn organizing_policy(
        &self,
        container: &ContainerRef,
    ) -> StoreResult<Option<Arc<dyn OrganizingPolicy>>> {
        Ok(self
            .containers
            .get(&container.id)
            .and_then(|policy| policy.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RedirectPolicy;

    #[test]
    fn given_unknown_container_when_looked_up_then_not_organizing() {
        let store = InMemoryStore::new();
        let policy = store
            .organizing_policy(&ContainerRef::new("nowhere"))
            .unwrap();
        assert!(policy.is_none());
    }

    #[test]
    fn given_revision_tagged_ref_when_looked_up_then_revision_is_ignored() {
        let mut store = InMemoryStore::new();
        store.insert_organizing("news", Arc::new(RedirectPolicy::new("archive")));

        let policy = store
            .organizing_policy(&ContainerRef::with_revision("news", 42))
            .unwrap();

        assert!(policy.is_some());
    }

    #[test]
    fn given_mixed_store_when_listing_then_ids_sorted_and_kinds_reported() {
        let mut store = InMemoryStore::new();
        store.insert_plain("inbox");
        store.insert_organizing("archive", Arc::new(RedirectPolicy::new("deep/archive")));

        assert_eq!(store.container_ids(), vec!["archive", "inbox"]);
        assert_eq!(store.policy_kind("archive"), Some("redirect"));
        assert_eq!(store.policy_kind("inbox"), None);
    }
}
