//! Entity state the rules engine reads and writes.
//!
//! Everything here is plain data. Ownership stays with the host's
//! [`EntityStore`](crate::env::EntityStore); only the effect resolver and the
//! cost gate mutate it, once per applied step.
pub mod types;

pub use types::{
    Debuff, DebuffStack, Entity, EntityId, EntityType, EntityTypeSet, FieldPath,
    Position, ResourceKind, Resources, StateKey, StateValue,
};
