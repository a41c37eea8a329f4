pub mod common;
pub mod debuff;
pub mod entity;
pub mod value;

pub use common::{EntityId, Position};
pub use debuff::{Debuff, DebuffStack};
pub use entity::{Entity, EntityType, EntityTypeSet, FieldPath, ResourceKind, Resources};
pub use value::{StateKey, StateValue};
