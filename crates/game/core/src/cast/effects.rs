//! Effect resolution.
//!
//! Turns one effect payload into a concrete change on one entity. References
//! (`target.loc`) are resolved against the bindings at application time, so
//! a step sees every change made by the steps before it.

use crate::ability::{DebuffOp, EffectPayload, StateOp, TemplateRef, ValueSource};
use crate::env::EntityStore;
use crate::state::{EntityId, StateKey, StateValue};

use super::error::MalformedEffect;
use super::types::{AppliedEffect, Bindings};

/// Applies an action payload to `entity`.
pub fn resolve(
    payload: &EffectPayload,
    entity: EntityId,
    bindings: Bindings,
    store: &mut dyn EntityStore,
) -> Result<AppliedEffect, MalformedEffect> {
    match payload {
        EffectPayload::Damage {
            amount,
            damage_type,
        } => {
            let target = store
                .get_mut(entity)
                .ok_or(MalformedEffect::MissingEntity(entity))?;
            let (health_before, health_after) = target.apply_health_delta(*amount);
            Ok(AppliedEffect::Damage {
                entity,
                damage_type: *damage_type,
                amount: *amount,
                health_before,
                health_after,
            })
        }

        EffectPayload::Debuff { debuff, op } => {
            let target = store
                .get_mut(entity)
                .ok_or(MalformedEffect::MissingEntity(entity))?;
            match op {
                DebuffOp::Push => {
                    target.debuffs.push(*debuff);
                    Ok(AppliedEffect::DebuffPushed {
                        entity,
                        debuff: *debuff,
                    })
                }
                DebuffOp::Pop => Ok(AppliedEffect::DebuffPopped {
                    entity,
                    debuff: *debuff,
                    removed: target.debuffs.pop(*debuff),
                }),
                DebuffOp::Contains | DebuffOp::DoesNotContain => {
                    Err(MalformedEffect::QueryAsAction(*op))
                }
            }
        }

        EffectPayload::State { state, op, value } => {
            let value = resolve_value(value, bindings, store)?;
            match op {
                StateOp::Change => change_state(entity, state, value, store),
            }
        }
    }
}

/// Evaluates a check payload against `entity` without mutating anything.
pub fn evaluate_check(
    payload: &EffectPayload,
    entity: EntityId,
    store: &dyn EntityStore,
) -> Result<AppliedEffect, MalformedEffect> {
    let EffectPayload::Debuff { debuff, op } = payload else {
        return Err(MalformedEffect::NotAQuery);
    };

    let target = store
        .get(entity)
        .ok_or(MalformedEffect::MissingEntity(entity))?;
    let present = target.debuffs.contains(*debuff);
    let passed = match op {
        DebuffOp::Contains => present,
        DebuffOp::DoesNotContain => !present,
        DebuffOp::Push | DebuffOp::Pop => return Err(MalformedEffect::NotAQuery),
    };

    Ok(AppliedEffect::Checked {
        entity,
        debuff: *debuff,
        op: *op,
        passed,
    })
}

/// Resolves a value source against the current bindings.
pub fn resolve_value(
    source: &ValueSource,
    bindings: Bindings,
    store: &dyn EntityStore,
) -> Result<StateValue, MalformedEffect> {
    match source {
        ValueSource::Literal(value) => Ok(value.clone()),
        ValueSource::Ref(reference) => resolve_reference(reference, bindings, store),
    }
}

fn resolve_reference(
    reference: &TemplateRef,
    bindings: Bindings,
    store: &dyn EntityStore,
) -> Result<StateValue, MalformedEffect> {
    let id = bindings.resolve(reference.entity);
    let entity = store.get(id).ok_or(MalformedEffect::MissingEntity(id))?;
    entity
        .field(&reference.field)
        .ok_or_else(|| MalformedEffect::UnresolvedReference {
            reference: reference.clone(),
        })
}

fn change_state(
    entity: EntityId,
    state: &StateKey,
    value: StateValue,
    store: &mut dyn EntityStore,
) -> Result<AppliedEffect, MalformedEffect> {
    let target = store
        .get_mut(entity)
        .ok_or(MalformedEffect::MissingEntity(entity))?;

    if state.is_location() {
        let Some(location) = value.as_location() else {
            return Err(MalformedEffect::TypeMismatch {
                state: state.clone(),
                expected: "location".to_string(),
                found: value.type_name().to_string(),
            });
        };
        target.location = location;
    } else {
        // A key keeps the value type it was first written with.
        if let Some(existing) = target.state.get(state)
            && existing.type_name() != value.type_name()
        {
            return Err(MalformedEffect::TypeMismatch {
                state: state.clone(),
                expected: existing.type_name().to_string(),
                found: value.type_name().to_string(),
            });
        }
        target.state.insert(state.clone(), value.clone());
    }

    Ok(AppliedEffect::StateChanged {
        entity,
        state: state.clone(),
        value,
    })
}
