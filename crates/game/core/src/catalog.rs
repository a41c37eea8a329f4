//! Immutable ability registry.
//!
//! The catalog is built once during initialization, validated as a whole,
//! and then shared by reference with every component that needs abilities.
//! There is no global table and no mutation after [`AbilityCatalog::build`].

use std::collections::BTreeMap;

use crate::ability::{Ability, AbilityId, AbilityKind, Step};
use crate::cast::CastError;
use crate::config::RulesConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::EntityTypeSet;

/// Which side of a predicate an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PredicateRole {
    Caster,
    Target,
}

/// Content errors detected while building the catalog.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("ability id must not be empty")]
    EmptyId,

    #[error("ability `{0}` is defined more than once")]
    DuplicateId(AbilityId),

    #[error("ability `{0}` has no procedures")]
    NoProcedures(AbilityId),

    #[error("ability `{ability}` procedure {procedure} has no steps")]
    EmptyProcedure { ability: AbilityId, procedure: usize },

    #[error("ability `{ability}` allows no {role} types")]
    EmptyTypeSet {
        ability: AbilityId,
        role: PredicateRole,
    },

    #[error("ability `{ability}` {role} types contain unknown bits {bits:#04b}")]
    UnknownTypeBits {
        ability: AbilityId,
        role: PredicateRole,
        bits: u8,
    },

    #[error(
        "ability `{ability}` procedure {procedure} costs {ticks} ticks, more than the {limit} available per turn"
    )]
    ProcedureTooLong {
        ability: AbilityId,
        procedure: usize,
        ticks: u64,
        limit: u32,
    },

    #[error("ability `{ability}` procedure {procedure} step {step}: checks must query a debuff")]
    CheckWithoutQuery {
        ability: AbilityId,
        procedure: usize,
        step: usize,
    },

    #[error(
        "ability `{ability}` procedure {procedure} step {step}: debuff queries are only valid in checks"
    )]
    QueryAsAction {
        ability: AbilityId,
        procedure: usize,
        step: usize,
    },
}

impl GameError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        use CatalogError::*;
        match self {
            EmptyId => "CATALOG_EMPTY_ID",
            DuplicateId(_) => "CATALOG_DUPLICATE_ID",
            NoProcedures(_) => "CATALOG_NO_PROCEDURES",
            EmptyProcedure { .. } => "CATALOG_EMPTY_PROCEDURE",
            EmptyTypeSet { .. } => "CATALOG_EMPTY_TYPE_SET",
            UnknownTypeBits { .. } => "CATALOG_UNKNOWN_TYPE_BITS",
            ProcedureTooLong { .. } => "CATALOG_PROCEDURE_TOO_LONG",
            CheckWithoutQuery { .. } => "CATALOG_CHECK_WITHOUT_QUERY",
            QueryAsAction { .. } => "CATALOG_QUERY_AS_ACTION",
        }
    }
}

/// Registry of validated abilities, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct AbilityCatalog {
    abilities: BTreeMap<AbilityId, Ability>,
    ticks_per_turn: u32,
}

impl AbilityCatalog {
    /// Validates every ability and builds the registry.
    ///
    /// Fails on the first invalid ability; a catalog is either fully valid or
    /// not built at all.
    pub fn build(
        abilities: impl IntoIterator<Item = Ability>,
        config: &RulesConfig,
    ) -> Result<Self, CatalogError> {
        let mut registry = BTreeMap::new();

        for ability in abilities {
            validate_ability(&ability, config.ticks_per_turn)?;
            if registry.contains_key(&ability.id) {
                return Err(CatalogError::DuplicateId(ability.id));
            }
            registry.insert(ability.id.clone(), ability);
        }

        tracing::debug!(
            abilities = registry.len(),
            ticks_per_turn = config.ticks_per_turn,
            "ability catalog built"
        );

        Ok(Self {
            abilities: registry,
            ticks_per_turn: config.ticks_per_turn,
        })
    }

    /// Looks up an ability, failing with `NotFound` for unknown ids.
    pub fn lookup(&self, id: &AbilityId) -> Result<&Ability, CastError> {
        self.abilities
            .get(id)
            .ok_or_else(|| CastError::NotFound { ability: id.clone() })
    }

    pub fn get(&self, id: &str) -> Option<&Ability> {
        self.abilities.get(&AbilityId::new(id))
    }

    /// Tick budget the catalog was validated against.
    pub fn ticks_per_turn(&self) -> u32 {
        self.ticks_per_turn
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ability> {
        self.abilities.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &AbilityId> {
        self.abilities.keys()
    }

    pub fn of_kind(&self, kind: AbilityKind) -> impl Iterator<Item = &Ability> {
        self.abilities.values().filter(move |a| a.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.abilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.abilities.is_empty()
    }
}

fn validate_ability(ability: &Ability, ticks_per_turn: u32) -> Result<(), CatalogError> {
    let id = &ability.id;
    if id.as_str().is_empty() {
        return Err(CatalogError::EmptyId);
    }

    validate_type_set(id, PredicateRole::Caster, ability.predicate.caster)?;
    validate_type_set(id, PredicateRole::Target, ability.predicate.target)?;

    if ability.procedures.is_empty() {
        return Err(CatalogError::NoProcedures(id.clone()));
    }

    for (procedure_index, procedure) in ability.procedures.iter().enumerate() {
        if procedure.is_empty() {
            return Err(CatalogError::EmptyProcedure {
                ability: id.clone(),
                procedure: procedure_index,
            });
        }

        let ticks = procedure.total_ticks();
        if ticks > u64::from(ticks_per_turn) {
            return Err(CatalogError::ProcedureTooLong {
                ability: id.clone(),
                procedure: procedure_index,
                ticks,
                limit: ticks_per_turn,
            });
        }

        for (step_index, step) in procedure.steps.iter().enumerate() {
            match step {
                Step::Check(effect) if !effect.effect.is_query() => {
                    return Err(CatalogError::CheckWithoutQuery {
                        ability: id.clone(),
                        procedure: procedure_index,
                        step: step_index,
                    });
                }
                Step::Action(effect) if effect.effect.is_query() => {
                    return Err(CatalogError::QueryAsAction {
                        ability: id.clone(),
                        procedure: procedure_index,
                        step: step_index,
                    });
                }
                _ => {}
            }
        }
    }

    Ok(())
}

fn validate_type_set(
    ability: &AbilityId,
    role: PredicateRole,
    set: EntityTypeSet,
) -> Result<(), CatalogError> {
    if set.is_empty() {
        return Err(CatalogError::EmptyTypeSet {
            ability: ability.clone(),
            role,
        });
    }
    let unknown = set.bits() & !EntityTypeSet::all().bits();
    if unknown != 0 {
        return Err(CatalogError::UnknownTypeBits {
            ability: ability.clone(),
            role,
            bits: unknown,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ability::{
        AbilityCost, AbilityRange, DamageType, DebuffOp, EffectPayload, Procedure,
        ProcedureEffect, TargetPredicate, TargetSelector,
    };
    use crate::state::Debuff;

    fn strike(id: &str, ticks: u32) -> Ability {
        Ability {
            id: AbilityId::new(id),
            kind: AbilityKind::Offensive,
            description: "test strike".into(),
            cost: AbilityCost::new(1, 1, 0, 0),
            range: AbilityRange::Within(1),
            aoe: 0,
            predicate: TargetPredicate {
                caster: EntityTypeSet::CREATURES,
                target: EntityTypeSet::CREATURES,
                target_self_allowed: false,
            },
            procedures: vec![Procedure::new(vec![Step::action(ProcedureEffect::new(
                TargetSelector::Target,
                ticks,
                EffectPayload::damage(1, DamageType::Slashing),
            ))])],
        }
    }

    #[test]
    fn builds_and_looks_up() {
        let catalog =
            AbilityCatalog::build([strike("scratch", 2), strike("bite", 2)], &RulesConfig::new())
                .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.lookup(&"bite".into()).unwrap().id.as_str(), "bite");
        assert!(matches!(
            catalog.lookup(&"fly".into()),
            Err(CastError::NotFound { .. })
        ));
        assert_eq!(catalog.of_kind(AbilityKind::Offensive).count(), 2);
    }

    #[test]
    fn rejects_procedure_longer_than_a_turn() {
        let err = AbilityCatalog::build([strike("slow", 5)], &RulesConfig::new()).unwrap_err();
        assert_eq!(
            err,
            CatalogError::ProcedureTooLong {
                ability: "slow".into(),
                procedure: 0,
                ticks: 5,
                limit: 4,
            }
        );

        let relaxed = RulesConfig::new().with_ticks_per_turn(8);
        assert!(AbilityCatalog::build([strike("slow", 5)], &relaxed).is_ok());
    }

    #[test]
    fn rejects_duplicates_and_empty_type_sets() {
        let err = AbilityCatalog::build([strike("bite", 1), strike("bite", 1)], &RulesConfig::new())
            .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId("bite".into()));

        let mut nobody = strike("ghost", 1);
        nobody.predicate.caster = EntityTypeSet::empty();
        let err = AbilityCatalog::build([nobody], &RulesConfig::new()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::EmptyTypeSet {
                role: PredicateRole::Caster,
                ..
            }
        ));
    }

    #[test]
    fn rejects_misplaced_queries() {
        let mut checks_damage = strike("odd", 1);
        checks_damage.procedures[0]
            .steps
            .push(Step::check(ProcedureEffect::new(
                TargetSelector::Target,
                0,
                EffectPayload::damage(1, DamageType::Blunt),
            )));
        assert!(matches!(
            AbilityCatalog::build([checks_damage], &RulesConfig::new()),
            Err(CatalogError::CheckWithoutQuery { step: 1, .. })
        ));

        let mut acts_query = strike("odd", 1);
        acts_query.procedures[0].steps[0] = Step::action(ProcedureEffect::new(
            TargetSelector::Target,
            0,
            EffectPayload::debuff(Debuff::Wet, DebuffOp::Contains),
        ));
        assert!(matches!(
            AbilityCatalog::build([acts_query], &RulesConfig::new()),
            Err(CatalogError::QueryAsAction { step: 0, .. })
        ));
    }

    #[test]
    fn rejects_empty_procedures() {
        let mut hollow = strike("hollow", 1);
        hollow.procedures.push(Procedure::default());
        assert!(matches!(
            AbilityCatalog::build([hollow], &RulesConfig::new()),
            Err(CatalogError::EmptyProcedure { procedure: 1, .. })
        ));

        let mut nothing = strike("nothing", 1);
        nothing.procedures.clear();
        assert!(matches!(
            AbilityCatalog::build([nothing], &RulesConfig::new()),
            Err(CatalogError::NoProcedures(_))
        ));
    }
}
