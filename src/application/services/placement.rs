//! Placement resolution service
//!
//! Follows organizing delegations from a requested container to the
//! container that should actually hold the item. Cycles and policies that
//! fail to supply a usable replacement terminate the walk; they are not
//! errors. Only store lookup failures and policy evaluation failures
//! surface to the caller.

use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{ContainerRef, Item, PlacementDecision};
use crate::infrastructure::traits::ContainerStore;

/// Service resolving the effective parent container for an item.
pub struct PlacementService {
    store: Arc<dyn ContainerStore>,
}

impl PlacementService {
    /// Create a new placement service over a store.
    pub fn new(store: Arc<dyn ContainerStore>) -> Self {
        Self { store }
    }

    /// Resolve the container that should hold `item` when insertion under
    /// `requested` was asked for.
    ///
    /// The walk re-queries the current container for an organizing policy
    /// each round and stops as soon as the container is not organizing or
    /// has already been consulted in this call (by id, ignoring revision
    /// tags). The revisit check runs before the container is consulted, so
    /// a policy that keeps returning its own container, or no container at
    /// all, is stopped one round later with that container as the result.
    ///
    /// `None` in means `None` out: no requested container, nothing to do.
    ///
    /// Read-only with respect to the store; the actual move/create is the
    /// caller's job.
    pub fn resolve(
        &self,
        requested: Option<&ContainerRef>,
        item: &Item,
    ) -> ApplicationResult<Option<ContainerRef>> {
        let Some(requested) = requested else {
            return Ok(None);
        };

        let mut current = requested.clone();
        let mut visited: Vec<ContainerRef> = Vec::new();

        loop {
            let policy = self
                .store
                .organizing_policy(&current)
                .map_err(|e| ApplicationError::LookupFailed {
                    container: current.id.clone(),
                    source: e,
                })?;

            let Some(policy) = policy else {
                debug!("resolve: '{}' is not organizing, done", current);
                return Ok(Some(current));
            };

            // Membership check before consulting the policy; this is what
            // breaks cycles and non-progressing containers.
            if visited.iter().any(|seen| seen.equivalent(&current)) {
                debug!("resolve: '{}' already consulted, stopping here", current);
                return Ok(Some(current));
            }
            visited.push(current.clone());

            let candidate = policy.target_container(item)?;
            match candidate {
                Some(candidate) if candidate.is_valid() => {
                    debug!("resolve: '{}' -> '{}'", current, candidate);
                    current = candidate;
                }
                _ => {
                    // No usable replacement this round; keep current and
                    // loop, the membership check above ends it next pass.
                    debug!("resolve: '{}' offered no replacement", current);
                }
            }
        }
    }

    /// Resolve and report whether the placement actually changed.
    ///
    /// "Changed" uses reference equivalence: a result differing from the
    /// request only in its revision tag counts as unchanged, so callers can
    /// skip the store mutation.
    pub fn decide(
        &self,
        requested: Option<&ContainerRef>,
        item: &Item,
    ) -> ApplicationResult<PlacementDecision> {
        let resolved = self.resolve(requested, item)?;
        let changed = match (requested, &resolved) {
            (Some(req), Some(res)) => !req.equivalent(res),
            (None, None) => false,
            _ => true,
        };
        Ok(PlacementDecision {
            requested: requested.cloned(),
            resolved,
            changed,
        })
    }
}
