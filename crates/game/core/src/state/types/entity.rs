//! Entities the engine reads and mutates.
//!
//! The engine never owns entities; it borrows them from an
//! [`EntityStore`](crate::env::EntityStore) for the duration of one cast.

use std::collections::BTreeMap;

use super::common::{EntityId, Position};
use super::debuff::DebuffStack;
use super::value::{StateKey, StateValue};

// ============================================================================
// Entity Type
// ============================================================================

/// Coarse category of an entity, used by ability predicates.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EntityType {
    Player,
    Monster,
    Item,
}

impl EntityType {
    pub const fn flag(self) -> EntityTypeSet {
        match self {
            Self::Player => EntityTypeSet::PLAYER,
            Self::Monster => EntityTypeSet::MONSTER,
            Self::Item => EntityTypeSet::ITEM,
        }
    }
}

bitflags::bitflags! {
    /// Set of entity types allowed by a predicate.
    ///
    /// Serialized as a list (`[Player, Monster]`) rather than raw bits.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(from = "Vec<EntityType>", into = "Vec<EntityType>"))]
    pub struct EntityTypeSet: u8 {
        const PLAYER  = 1 << 0;
        const MONSTER = 1 << 1;
        const ITEM    = 1 << 2;
    }
}

impl EntityTypeSet {
    /// Players and monsters: anything that can act.
    pub const CREATURES: Self = Self::PLAYER.union(Self::MONSTER);

    pub fn allows(self, kind: EntityType) -> bool {
        self.contains(kind.flag())
    }

    pub fn types(self) -> Vec<EntityType> {
        [EntityType::Player, EntityType::Monster, EntityType::Item]
            .into_iter()
            .filter(|kind| self.allows(*kind))
            .collect()
    }
}

impl From<Vec<EntityType>> for EntityTypeSet {
    fn from(types: Vec<EntityType>) -> Self {
        types.into_iter().map(EntityType::flag).collect()
    }
}

impl From<EntityTypeSet> for Vec<EntityType> {
    fn from(set: EntityTypeSet) -> Self {
        set.types()
    }
}

impl FromIterator<EntityType> for EntityTypeSet {
    fn from_iter<T: IntoIterator<Item = EntityType>>(iter: T) -> Self {
        iter.into_iter().map(EntityType::flag).collect()
    }
}

// ============================================================================
// Resources
// ============================================================================

/// The four gated resource pools.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceKind {
    ActionPoints,
    Stamina,
    Health,
    Mana,
}

/// Values for all four resource pools (current values or maximums).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Resources {
    pub ap: u32,
    pub st: u32,
    pub hp: u32,
    pub mp: u32,
}

impl Resources {
    pub const fn new(ap: u32, st: u32, hp: u32, mp: u32) -> Self {
        Self { ap, st, hp, mp }
    }

    pub const fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::ActionPoints => self.ap,
            ResourceKind::Stamina => self.st,
            ResourceKind::Health => self.hp,
            ResourceKind::Mana => self.mp,
        }
    }
}

// ============================================================================
// Field Paths
// ============================================================================

/// A readable field on an entity, named by a template reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FieldPath {
    Location,
    Health,
    Mana,
    Stamina,
    ActionPoints,
    /// An entry of the named-state map.
    State(StateKey),
}

// ============================================================================
// Entity
// ============================================================================

/// Live game entity: a player, a monster or an item.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityType,
    pub resources: Resources,
    pub maximums: Resources,
    pub location: Position,
    pub debuffs: DebuffStack,
    pub state: BTreeMap<StateKey, StateValue>,
}

impl Entity {
    /// Creates an entity with full resource pools.
    pub fn new(id: EntityId, kind: EntityType, maximums: Resources, location: Position) -> Self {
        Self {
            id,
            kind,
            resources: maximums,
            maximums,
            location,
            debuffs: DebuffStack::new(),
            state: BTreeMap::new(),
        }
    }

    /// Overrides current resource values (builder pattern).
    #[must_use]
    pub fn with_resources(mut self, resources: Resources) -> Self {
        self.resources = resources;
        self
    }

    #[must_use]
    pub fn with_state(mut self, key: impl Into<StateKey>, value: StateValue) -> Self {
        self.state.insert(key.into(), value);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.resources.hp > 0
    }

    /// Reads the value a template reference points at.
    ///
    /// Returns `None` for a named-state key that was never set.
    pub fn field(&self, path: &FieldPath) -> Option<StateValue> {
        match path {
            FieldPath::Location => Some(StateValue::Location(self.location)),
            FieldPath::Health => Some(StateValue::Int(i64::from(self.resources.hp))),
            FieldPath::Mana => Some(StateValue::Int(i64::from(self.resources.mp))),
            FieldPath::Stamina => Some(StateValue::Int(i64::from(self.resources.st))),
            FieldPath::ActionPoints => Some(StateValue::Int(i64::from(self.resources.ap))),
            FieldPath::State(key) if key.is_location() => {
                Some(StateValue::Location(self.location))
            }
            FieldPath::State(key) => self.state.get(key).cloned(),
        }
    }

    /// Applies a signed health delta (positive damages, negative heals),
    /// clamped to `[0, max hp]`. Returns `(before, after)`.
    pub fn apply_health_delta(&mut self, amount: i32) -> (u32, u32) {
        let before = self.resources.hp;
        let max = i64::from(self.maximums.hp);
        let after = (i64::from(before) - i64::from(amount)).clamp(0, max);
        self.resources.hp = after as u32;
        (before, self.resources.hp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn goblin() -> Entity {
        Entity::new(
            EntityId(7),
            EntityType::Monster,
            Resources::new(4, 4, 10, 2),
            Position::new(3, 3),
        )
    }

    #[test]
    fn health_delta_clamps_at_zero_and_max() {
        let mut entity = goblin();

        assert_eq!(entity.apply_health_delta(25), (10, 0));
        assert!(!entity.is_alive());

        assert_eq!(entity.apply_health_delta(-4), (0, 4));
        assert_eq!(entity.apply_health_delta(-100), (4, 10));
    }

    #[test]
    fn field_reads_location_resources_and_named_state() {
        let entity = goblin().with_state("mood", StateValue::Text("angry".into()));

        assert_eq!(
            entity.field(&FieldPath::Location),
            Some(StateValue::Location(Position::new(3, 3)))
        );
        assert_eq!(
            entity.field(&FieldPath::State(StateKey::location())),
            Some(StateValue::Location(Position::new(3, 3)))
        );
        assert_eq!(entity.field(&FieldPath::Health), Some(StateValue::Int(10)));
        assert_eq!(
            entity.field(&FieldPath::State("mood".into())),
            Some(StateValue::Text("angry".into()))
        );
        assert_eq!(entity.field(&FieldPath::State("missing".into())), None);
    }

    #[test]
    fn type_set_round_trips_through_lists() {
        let set = EntityTypeSet::from(vec![EntityType::Monster, EntityType::Player]);

        assert_eq!(set, EntityTypeSet::CREATURES);
        assert!(set.allows(EntityType::Player));
        assert!(!set.allows(EntityType::Item));
        assert_eq!(set.types(), vec![EntityType::Player, EntityType::Monster]);
        assert!(EntityTypeSet::from(Vec::new()).is_empty());
    }
}
