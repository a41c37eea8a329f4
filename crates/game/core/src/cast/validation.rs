//! Target predicate gate.
//!
//! Rules run in a fixed order and the first failure wins:
//! 1. the caster's type is allowed
//! 2. the target's type is allowed
//! 3. self-targeting is allowed when caster and target are the same entity
//! 4. the target is within range (skipped for unbounded abilities)

use crate::ability::{Ability, AbilityRange};
use crate::env::LocationGraph;
use crate::state::Entity;

use super::error::TargetError;

/// Validates the primary target of a cast.
pub fn validate(
    ability: &Ability,
    caster: &Entity,
    target: &Entity,
    graph: &dyn LocationGraph,
) -> Result<(), TargetError> {
    validate_secondary(ability, caster, target)?;

    if let AbilityRange::Within(range) = ability.range {
        let distance = graph.distance(caster.location, target.location);
        if distance > range {
            return Err(TargetError::OutOfRange { distance, range });
        }
    }

    Ok(())
}

/// Validates an area secondary: type and self rules only.
///
/// Area candidates are already bounded by the radius query, so range is not
/// re-checked.
pub fn validate_secondary(
    ability: &Ability,
    caster: &Entity,
    target: &Entity,
) -> Result<(), TargetError> {
    let predicate = &ability.predicate;

    if !predicate.caster.allows(caster.kind) {
        return Err(TargetError::CasterType(caster.kind));
    }
    if !predicate.target.allows(target.kind) {
        return Err(TargetError::TargetType(target.kind));
    }
    if caster.id == target.id && !predicate.target_self_allowed {
        return Err(TargetError::SelfTarget);
    }

    Ok(())
}
