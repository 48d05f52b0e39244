//! Domain entities: core data structures

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

/// Reference to a container position in the hierarchy.
///
/// Identity is carried by `id`. The optional `revision` is a secondary tag
/// (store-internal versioning) that must be ignored when deciding whether two
/// references point at the same container; use [`ContainerRef::equivalent`]
/// for that. Derived equality compares the full struct including revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerRef {
    /// Container identity, e.g. "news/2024/05"
    pub id: String,
    /// Store-internal version tag, irrelevant for identity
    pub revision: Option<u64>,
}

impl ContainerRef {
    /// Create a reference without a revision tag.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            revision: None,
        }
    }

    /// Create a reference carrying a revision tag.
    pub fn with_revision(id: impl Into<String>, revision: u64) -> Self {
        Self {
            id: id.into(),
            revision: Some(revision),
        }
    }

    /// Same logical container, ignoring the revision tag.
    pub fn equivalent(&self, other: &ContainerRef) -> bool {
        self.id == other.id
    }

    /// A reference with an empty id cannot address anything.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
    }
}

impl fmt::Display for ContainerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.revision {
            Some(rev) => write!(f, "{}@{}", self.id, rev),
            None => write!(f, "{}", self.id),
        }
    }
}

/// The entity being placed.
///
/// Opaque to the resolver; organizing policies read name, attributes and
/// timestamp to compute a target container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Item name (file name, title, ...)
    pub name: String,
    /// Free-form key/value attributes, e.g. category=press
    pub attributes: BTreeMap<String, String>,
    /// Creation timestamp, if known
    pub created_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Create an item with just a name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
            created_at: None,
        }
    }

    /// Set an attribute (builder style).
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set the creation timestamp (builder style).
    pub fn with_created_at(mut self, ts: DateTime<Utc>) -> Self {
        self.created_at = Some(ts);
        self
    }
}

/// Outcome of a placement resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementDecision {
    /// Container the caller originally asked for
    pub requested: Option<ContainerRef>,
    /// Container the item should actually land in
    pub resolved: Option<ContainerRef>,
    /// Whether resolved differs from requested, by equivalence
    /// (a revision-only difference counts as unchanged)
    pub changed: bool,
}
