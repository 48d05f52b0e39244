//! Infrastructure layer: store implementations and catalog loading
//!
//! This layer implements the store boundary trait and wires up stores
//! from catalog files.

pub mod catalog;
pub mod error;
pub mod traits;

pub use catalog::{load_catalog, load_catalog_with_format, parse_catalog};
pub use error::{InfraError, InfraResult};
pub use traits::{ContainerStore, InMemoryStore, StoreError, StoreResult};
