//! Storage backends implementing the EntityStore contract

pub mod in_memory;

pub use in_memory::{InMemoryStore, RelationHydrator};
