//! Resource cost gate.
//!
//! Costs are checked field by field in a fixed order (action points, stamina,
//! health, mana) and deducted all at once. A failed check leaves the caster
//! untouched; a paid cost is never refunded.

use crate::ability::AbilityCost;
use crate::state::{Entity, ResourceKind};

use super::error::CostError;

const ORDER: [ResourceKind; 4] = [
    ResourceKind::ActionPoints,
    ResourceKind::Stamina,
    ResourceKind::Health,
    ResourceKind::Mana,
];

/// Reports the first resource the entity cannot pay for.
pub fn check(entity: &Entity, cost: &AbilityCost) -> Result<(), CostError> {
    for resource in ORDER {
        let required = cost.get(resource);
        let available = entity.resources.get(resource);
        if available < required {
            return Err(CostError {
                resource,
                required,
                available,
            });
        }
    }
    Ok(())
}

/// Checks and deducts the full cost, or nothing.
pub fn reserve(entity: &mut Entity, cost: &AbilityCost) -> Result<(), CostError> {
    check(entity, cost)?;

    let pools = &mut entity.resources;
    pools.ap -= cost.ap;
    pools.st -= cost.st;
    pools.hp -= cost.hp;
    pools.mp -= cost.mp;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EntityId, EntityType, Position, Resources};

    fn caster(resources: Resources) -> Entity {
        Entity::new(
            EntityId(1),
            EntityType::Player,
            Resources::new(10, 10, 10, 10),
            Position::ORIGIN,
        )
        .with_resources(resources)
    }

    #[test]
    fn deducts_every_field_on_success() {
        let mut entity = caster(Resources::new(4, 4, 10, 20));

        reserve(&mut entity, &AbilityCost::new(4, 0, 1, 20)).unwrap();
        assert_eq!(entity.resources, Resources::new(0, 4, 9, 0));
    }

    #[test]
    fn shortfall_deducts_nothing() {
        let mut entity = caster(Resources::new(4, 4, 10, 1));
        let before = entity.resources;

        let err = reserve(&mut entity, &AbilityCost::new(2, 1, 0, 2)).unwrap_err();
        assert_eq!(
            err,
            CostError {
                resource: ResourceKind::Mana,
                required: 2,
                available: 1,
            }
        );
        assert_eq!(entity.resources, before);
    }

    #[test]
    fn reports_first_short_field_in_order() {
        let entity = caster(Resources::new(0, 0, 10, 0));

        let err = check(&entity, &AbilityCost::new(1, 1, 0, 1)).unwrap_err();
        assert_eq!(err.resource, ResourceKind::ActionPoints);
    }
}
