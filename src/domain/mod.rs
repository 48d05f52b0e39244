//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod policy;

pub use entities::{ContainerRef, Item, PlacementDecision};
pub use error::{DomainError, DomainResult};
pub use policy::{
    AttributeRoutePolicy, DateBucketPolicy, OrganizingPolicy, PatternRoutePolicy, RedirectPolicy,
};
