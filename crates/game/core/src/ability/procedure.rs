//! Procedures, steps and effect payloads.
//!
//! A procedure is one independent effect chain of an ability ("one hit").
//! Its steps are causally ordered: a failed check stops the rest of that
//! chain, while sibling procedures keep running.

use crate::state::{Debuff, FieldPath, StateKey, StateValue};

// ============================================================================
// Procedure & Step
// ============================================================================

/// Ordered sequence of steps forming one effect chain.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Procedure {
    pub steps: Vec<Step>,
}

impl Procedure {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Tick cost of the procedure when every check passes.
    ///
    /// Summed in `u64` so authored content cannot overflow it.
    pub fn total_ticks(&self) -> u64 {
        self.steps
            .iter()
            .map(|step| u64::from(step.effect().ticks))
            .sum()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl From<Vec<Step>> for Procedure {
    fn from(steps: Vec<Step>) -> Self {
        Self::new(steps)
    }
}

/// Whether a step mutates state or gates continuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StepKind {
    Action,
    Check,
}

/// One step of a procedure.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Step {
    /// Unconditionally applied.
    Action(ProcedureEffect),
    /// Evaluated read-only; a false result stops the rest of the procedure.
    Check(ProcedureEffect),
}

impl Step {
    pub fn action(effect: ProcedureEffect) -> Self {
        Self::Action(effect)
    }

    pub fn check(effect: ProcedureEffect) -> Self {
        Self::Check(effect)
    }

    pub const fn kind(&self) -> StepKind {
        match self {
            Self::Action(_) => StepKind::Action,
            Self::Check(_) => StepKind::Check,
        }
    }

    pub const fn effect(&self) -> &ProcedureEffect {
        match self {
            Self::Action(effect) | Self::Check(effect) => effect,
        }
    }
}

// ============================================================================
// Procedure Effect
// ============================================================================

/// Which bound entity a step (or a template reference) points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum TargetSelector {
    /// The caster ("self").
    Caster,
    /// The cast's target (each affected entity for area abilities).
    Target,
}

/// Effect carried by a step: who it binds to, how long it takes, what it does.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProcedureEffect {
    pub target: TargetSelector,
    pub ticks: u32,
    pub effect: EffectPayload,
}

impl ProcedureEffect {
    pub fn new(target: TargetSelector, ticks: u32, effect: EffectPayload) -> Self {
        Self {
            target,
            ticks,
            effect,
        }
    }
}

/// Exactly one concrete effect.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectPayload {
    /// Health change; a negative amount heals.
    Damage { amount: i32, damage_type: DamageType },

    /// Debuff stack operation or query.
    Debuff { debuff: Debuff, op: DebuffOp },

    /// Named-state mutation.
    State {
        state: StateKey,
        op: StateOp,
        value: ValueSource,
    },
}

impl EffectPayload {
    pub fn damage(amount: i32, damage_type: DamageType) -> Self {
        Self::Damage {
            amount,
            damage_type,
        }
    }

    pub fn debuff(debuff: Debuff, op: DebuffOp) -> Self {
        Self::Debuff { debuff, op }
    }

    pub fn change_state(state: impl Into<StateKey>, value: ValueSource) -> Self {
        Self::State {
            state: state.into(),
            op: StateOp::Change,
            value,
        }
    }

    /// True for payloads a check step can evaluate.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Self::Debuff {
                op: DebuffOp::Contains | DebuffOp::DoesNotContain,
                ..
            }
        )
    }
}

/// Damage categories carried through for future resistance rules.
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
pub enum DamageType {
    Slashing,
    Blunt,
    Piercing,
    Fire,
    Ice,
    Lightning,
    Poison,
    Necrotic,
    Radiant,
    Healing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DebuffOp {
    Push,
    Pop,
    Contains,
    DoesNotContain,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum StateOp {
    Change,
}

// ============================================================================
// Value Sources
// ============================================================================

/// Value written by a state change: a literal, or a reference resolved at
/// application time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueSource {
    Literal(StateValue),
    Ref(TemplateRef),
}

/// Reference to a field on a bound entity ("target's location").
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TemplateRef {
    pub entity: TargetSelector,
    pub field: FieldPath,
}

impl TemplateRef {
    pub fn new(entity: TargetSelector, field: FieldPath) -> Self {
        Self { entity, field }
    }
}

impl core::fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}.{:?}", self.entity, self.field)
    }
}
