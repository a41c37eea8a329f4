//! Area-of-effect target selection.

use crate::ability::Ability;
use crate::config::AreaOrigin;
use crate::env::{EntityStore, LocationGraph};
use crate::state::{Entity, EntityId};

use super::validation::validate_secondary;

/// Every entity a cast affects: the primary target, then area secondaries.
///
/// Secondaries are the entities within `ability.aoe` of the configured origin,
/// minus the primary, that pass the type and self rules. They are returned in
/// ascending id order so effects land in a deterministic sequence.
pub fn select_targets(
    ability: &Ability,
    caster: &Entity,
    primary: &Entity,
    store: &dyn EntityStore,
    graph: &dyn LocationGraph,
    origin: AreaOrigin,
) -> Vec<EntityId> {
    let mut affected = vec![primary.id];
    if !ability.is_area() {
        return affected;
    }

    let center = match origin {
        AreaOrigin::Target => primary.location,
        AreaOrigin::Caster => caster.location,
    };

    let mut secondaries: Vec<EntityId> = graph
        .entities_within_radius(store, center, ability.aoe)
        .into_iter()
        .filter(|id| *id != primary.id)
        .filter(|id| {
            store
                .get(*id)
                .is_some_and(|candidate| validate_secondary(ability, caster, candidate).is_ok())
        })
        .collect();
    secondaries.sort_unstable();
    secondaries.dedup();

    tracing::trace!(
        ability = %ability.id,
        primary = %primary.id,
        secondaries = secondaries.len(),
        "area targets selected"
    );

    affected.extend(secondaries);
    affected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{AbilityCost, AbilityId, AbilityKind, AbilityRange, TargetPredicate};
    use crate::env::{ChebyshevGrid, EntityMap};
    use crate::state::{EntityType, EntityTypeSet, Position, Resources};

    fn breath(aoe: u32) -> Ability {
        Ability {
            id: AbilityId::new("breath"),
            kind: AbilityKind::Offensive,
            description: String::new(),
            cost: AbilityCost::default(),
            range: AbilityRange::Within(1),
            aoe,
            predicate: TargetPredicate {
                caster: EntityTypeSet::CREATURES,
                target: EntityTypeSet::CREATURES,
                target_self_allowed: false,
            },
            procedures: Vec::new(),
        }
    }

    fn world() -> EntityMap {
        [
            (1, EntityType::Player, 0, 0),
            (2, EntityType::Monster, 1, 0),
            (3, EntityType::Item, 2, 0),
            (4, EntityType::Monster, 2, 1),
            (5, EntityType::Monster, 9, 9),
        ]
        .into_iter()
        .map(|(id, kind, x, y)| {
            Entity::new(EntityId(id), kind, Resources::default(), Position::new(x, y))
        })
        .collect()
    }

    #[test]
    fn single_target_abilities_affect_only_the_primary() {
        let store = world();
        let caster = store.get(EntityId(1)).unwrap();
        let primary = store.get(EntityId(2)).unwrap();

        let affected =
            select_targets(&breath(0), caster, primary, &store, &ChebyshevGrid, AreaOrigin::Target);
        assert_eq!(affected, vec![EntityId(2)]);
    }

    #[test]
    fn secondaries_pass_predicate_and_exclude_caster() {
        let store = world();
        let caster = store.get(EntityId(1)).unwrap();
        let primary = store.get(EntityId(2)).unwrap();

        // Around the target: caster (self not allowed) and item (wrong type) drop out.
        let affected =
            select_targets(&breath(1), caster, primary, &store, &ChebyshevGrid, AreaOrigin::Target);
        assert_eq!(affected, vec![EntityId(2), EntityId(4)]);

        // Around the caster only the primary is in reach.
        let affected =
            select_targets(&breath(1), caster, primary, &store, &ChebyshevGrid, AreaOrigin::Caster);
        assert_eq!(affected, vec![EntityId(2)]);
    }
}
