//! Event types for different topics.

use rules_core::{Debuff, EntityId};
use serde::{Deserialize, Serialize};

/// Events related to turn management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// Every caster's tick budget was reset.
    Started { turn: u64 },

    /// The end-of-turn sweep removed debuff instances from an entity.
    DebuffsExpired {
        entity: EntityId,
        removed: Vec<Debuff>,
    },
}
