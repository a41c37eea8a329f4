//! Cast requests, per-step records and the execution result.

use std::fmt;

use crate::ability::{AbilityId, DamageType, DebuffOp, StepKind, TargetSelector};
use crate::state::{Debuff, EntityId, StateKey, StateValue};

use super::error::{CastError, MalformedEffect};

// ============================================================================
// Request & Bindings
// ============================================================================

/// A request to cast one ability.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastRequest {
    pub ability: AbilityId,
    pub caster: EntityId,
    /// `None` casts on the caster itself.
    pub target: Option<EntityId>,
    /// Skips the cost gate (scripted and system casts).
    pub ignore_cost: bool,
}

impl CastRequest {
    pub fn new(ability: impl Into<AbilityId>, caster: EntityId) -> Self {
        Self {
            ability: ability.into(),
            caster,
            target: None,
            ignore_cost: false,
        }
    }

    #[must_use]
    pub fn on(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    #[must_use]
    pub fn ignoring_cost(mut self) -> Self {
        self.ignore_cost = true;
        self
    }
}

/// Entities the `self` and `target` selectors resolve to for one application.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bindings {
    pub caster: EntityId,
    pub target: EntityId,
}

impl Bindings {
    pub fn new(caster: EntityId, target: EntityId) -> Self {
        Self { caster, target }
    }

    pub fn resolve(&self, selector: TargetSelector) -> EntityId {
        match selector {
            TargetSelector::Caster => self.caster,
            TargetSelector::Target => self.target,
        }
    }
}

// ============================================================================
// Step Records
// ============================================================================

/// Position of a step inside an ability: procedure index, then step index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepIndex {
    pub procedure: usize,
    pub step: usize,
}

impl StepIndex {
    pub const fn new(procedure: usize, step: usize) -> Self {
        Self { procedure, step }
    }
}

impl fmt::Display for StepIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.procedure, self.step)
    }
}

/// One concrete change (or check evaluation) on one entity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppliedEffect {
    Damage {
        entity: EntityId,
        damage_type: DamageType,
        amount: i32,
        health_before: u32,
        health_after: u32,
    },
    DebuffPushed {
        entity: EntityId,
        debuff: Debuff,
    },
    /// `removed` is false when the entity had no instance to pop.
    DebuffPopped {
        entity: EntityId,
        debuff: Debuff,
        removed: bool,
    },
    StateChanged {
        entity: EntityId,
        state: StateKey,
        value: StateValue,
    },
    Checked {
        entity: EntityId,
        debuff: Debuff,
        op: DebuffOp,
        passed: bool,
    },
}

impl AppliedEffect {
    pub fn entity(&self) -> EntityId {
        match self {
            Self::Damage { entity, .. }
            | Self::DebuffPushed { entity, .. }
            | Self::DebuffPopped { entity, .. }
            | Self::StateChanged { entity, .. }
            | Self::Checked { entity, .. } => *entity,
        }
    }

    /// Health actually removed (negative when healed).
    pub fn health_delta(&self) -> i64 {
        match self {
            Self::Damage {
                health_before,
                health_after,
                ..
            } => i64::from(*health_before) - i64::from(*health_after),
            _ => 0,
        }
    }
}

/// Everything one step did.
///
/// A step aborted by a malformed effect is recorded with `ticks == 0` and
/// whatever it applied before the failure.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepRecord {
    pub index: StepIndex,
    pub kind: StepKind,
    pub ticks: u32,
    pub effects: Vec<AppliedEffect>,
}

/// How a procedure ended.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProcedureOutcome {
    /// Every step ran.
    Completed,
    /// A check at `step` left nothing to continue with.
    CheckFailed { step: usize },
    /// Step `step` carried an effect that could not be applied.
    Aborted { step: usize, error: MalformedEffect },
    /// The caster ran out of ticks before `step`.
    Interrupted { step: usize },
    /// An earlier procedure was interrupted.
    NotStarted,
}

impl ProcedureOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

// ============================================================================
// Execution Result
// ============================================================================

/// Outcome of a cast that passed its gates.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionResult {
    pub ability: AbilityId,
    pub caster: EntityId,
    pub target: EntityId,
    /// Primary target first, then area secondaries by ascending id.
    pub affected: Vec<EntityId>,
    pub steps: Vec<StepRecord>,
    /// One entry per procedure of the ability, in order.
    pub procedures: Vec<ProcedureOutcome>,
    pub ticks_consumed: u32,
    pub cost_charged: bool,
}

impl ExecutionResult {
    pub fn new(
        ability: AbilityId,
        caster: EntityId,
        target: EntityId,
        affected: Vec<EntityId>,
        cost_charged: bool,
    ) -> Self {
        Self {
            ability,
            caster,
            target,
            affected,
            steps: Vec::new(),
            procedures: Vec::new(),
            ticks_consumed: 0,
            cost_charged,
        }
    }

    /// Every applied effect, in application order.
    pub fn effects(&self) -> impl Iterator<Item = &AppliedEffect> {
        self.steps.iter().flat_map(|step| step.effects.iter())
    }

    /// Effects applied to one entity.
    pub fn effects_on(&self, entity: EntityId) -> impl Iterator<Item = &AppliedEffect> {
        self.effects().filter(move |effect| effect.entity() == entity)
    }

    /// Net health removed from `entity` across the cast.
    pub fn damage_dealt(&self, entity: EntityId) -> i64 {
        self.effects_on(entity).map(AppliedEffect::health_delta).sum()
    }

    /// True when every procedure ran to its last step.
    pub fn is_complete(&self) -> bool {
        self.procedures.iter().all(ProcedureOutcome::is_completed)
    }
}

// ============================================================================
// Events
// ============================================================================

/// Published once per cast attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastEvent {
    Executed(ExecutionResult),
    Failed {
        ability: AbilityId,
        caster: EntityId,
        target: Option<EntityId>,
        error: CastError,
    },
}

impl CastEvent {
    pub fn ability(&self) -> &AbilityId {
        match self {
            Self::Executed(result) => &result.ability,
            Self::Failed { ability, .. } => ability,
        }
    }

    pub fn caster(&self) -> EntityId {
        match self {
            Self::Executed(result) => result.caster,
            Self::Failed { caster, .. } => *caster,
        }
    }
}
