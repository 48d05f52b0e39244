//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on the store boundary trait (ContainerStore) but are
//! themselves concrete structs, not traits.

mod placement;

pub use placement::PlacementService;
