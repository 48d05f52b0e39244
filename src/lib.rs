//! rehome: auto-organizing placement for hierarchical item stores
//!
//! Some containers are organizing: when an item is about to be inserted
//! under them, they compute a different effective container from the item's
//! attributes (date buckets, category routing, name patterns). The
//! [`application::PlacementService`] follows those delegations from a
//! requested container to a stable final container, terminating on cycles
//! and non-progressing policies instead of erroring.
//!
//! The resolver never mutates the store; it answers "where should this item
//! go", the caller performs the actual move or create.
//!
//! ```rust
//! use std::sync::Arc;
//! use rehome::application::PlacementService;
//! use rehome::domain::{ContainerRef, DateBucketPolicy, Item};
//! use rehome::infrastructure::InMemoryStore;
//! use chrono::{TimeZone, Utc};
//!
//! let mut store = InMemoryStore::new();
//! store.insert_plain("root");
//! store.insert_organizing("news", Arc::new(DateBucketPolicy::new("news", "%Y/%m").unwrap()));
//! store.insert_plain("news/2024/05");
//!
//! let service = PlacementService::new(Arc::new(store));
//! let item = Item::new("press-release.txt")
//!     .with_created_at(Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap());
//!
//! let resolved = service.resolve(Some(&ContainerRef::new("news")), &item).unwrap();
//! assert_eq!(resolved, Some(ContainerRef::new("news/2024/05")));
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::PlacementService;
pub use domain::{ContainerRef, Item, PlacementDecision};
pub use infrastructure::{ContainerStore, InMemoryStore};
