//! Cast errors.
//!
//! Gate failures (`NotFound`, `InvalidTarget`, `InsufficientResource`,
//! `EntityNotFound`) are raised before any mutation. `OutOfTime` aborts a cast
//! midway and carries the partial result; everything applied before the
//! offending step stays applied. [`MalformedEffect`] never escapes a cast: it
//! ends the current procedure and is recorded in the result.

use crate::ability::{AbilityId, DebuffOp, TemplateRef};
use crate::engine::OutOfTime;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{EntityId, EntityType, ResourceKind, StateKey};

use super::types::{ExecutionResult, StepIndex};

// ============================================================================
// Cast Errors
// ============================================================================

/// Errors returned to the caller of a cast.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastError {
    /// Ability id is not in the catalog.
    #[error("ability `{ability}` not found")]
    NotFound { ability: AbilityId },

    /// Caster or target is not in the entity store.
    #[error("entity {entity} not found")]
    EntityNotFound { entity: EntityId },

    /// Predicate or range check failed.
    #[error("{caster} cannot cast `{ability}` on {target}: {reason}")]
    InvalidTarget {
        ability: AbilityId,
        caster: EntityId,
        target: EntityId,
        reason: TargetError,
    },

    /// The caster cannot pay for the ability.
    #[error("{caster} cannot afford `{ability}`: {shortfall}")]
    InsufficientResource {
        ability: AbilityId,
        caster: EntityId,
        shortfall: CostError,
    },

    /// The caster ran out of ticks at `step`; earlier steps remain applied.
    #[error("`{ability}` interrupted at step {step}: {source}")]
    OutOfTime {
        ability: AbilityId,
        step: StepIndex,
        source: OutOfTime,
        partial: Box<ExecutionResult>,
    },
}

impl CastError {
    /// Partial result of a cast interrupted by `OutOfTime`.
    pub fn partial(&self) -> Option<&ExecutionResult> {
        match self {
            Self::OutOfTime { partial, .. } => Some(partial),
            _ => None,
        }
    }

    /// True when the error was raised before any entity was mutated.
    pub fn is_gate_failure(&self) -> bool {
        !matches!(self, Self::OutOfTime { .. })
    }
}

impl GameError for CastError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFound { .. } | Self::EntityNotFound { .. } => ErrorSeverity::Validation,
            Self::InvalidTarget { .. } => ErrorSeverity::Validation,
            Self::InsufficientResource { .. } | Self::OutOfTime { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "CAST_NOT_FOUND",
            Self::EntityNotFound { .. } => "CAST_ENTITY_NOT_FOUND",
            Self::InvalidTarget { .. } => "CAST_INVALID_TARGET",
            Self::InsufficientResource { .. } => "CAST_INSUFFICIENT_RESOURCE",
            Self::OutOfTime { .. } => "CAST_OUT_OF_TIME",
        }
    }
}

// ============================================================================
// Gate Errors
// ============================================================================

/// Which targeting rule rejected the cast.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetError {
    #[error("a {0} cannot cast this ability")]
    CasterType(EntityType),

    #[error("a {0} is not a valid target")]
    TargetType(EntityType),

    #[error("the ability cannot target its caster")]
    SelfTarget,

    #[error("the ability requires a target")]
    TargetRequired,

    #[error("target is {distance} away but range is {range}")]
    OutOfRange { distance: u32, range: u32 },
}

/// First resource the caster is short on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("needs {required} {resource}, has {available}")]
pub struct CostError {
    pub resource: ResourceKind,
    pub required: u32,
    pub available: u32,
}

// ============================================================================
// Malformed Effects
// ============================================================================

/// Effect data that cannot be applied as written.
///
/// Ends the in-flight procedure; later procedures still run.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MalformedEffect {
    /// A template reference names a field the entity does not have.
    #[error("reference {reference} does not resolve")]
    UnresolvedReference { reference: TemplateRef },

    /// A bound entity is missing from the store.
    #[error("bound entity {0} is not available")]
    MissingEntity(EntityId),

    /// The resolved value cannot be stored under this key.
    #[error("state `{state}` expects a {expected} value, got {found}")]
    TypeMismatch {
        state: StateKey,
        expected: String,
        found: String,
    },

    /// `contains`/`doesNotContain` used as an action.
    #[error("debuff query `{0}` cannot be applied as an action")]
    QueryAsAction(DebuffOp),

    /// A check step whose payload is not a debuff query.
    #[error("check step does not query a debuff")]
    NotAQuery,
}

impl GameError for MalformedEffect {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnresolvedReference { .. } => "EFFECT_UNRESOLVED_REFERENCE",
            Self::MissingEntity(_) => "EFFECT_MISSING_ENTITY",
            Self::TypeMismatch { .. } => "EFFECT_TYPE_MISMATCH",
            Self::QueryAsAction(_) => "EFFECT_QUERY_AS_ACTION",
            Self::NotAQuery => "EFFECT_NOT_A_QUERY",
        }
    }
}
