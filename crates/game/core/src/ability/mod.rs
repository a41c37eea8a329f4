//! Ability definitions.
//!
//! An [`Ability`] is immutable content: cost, targeting rules and an ordered
//! list of [`Procedure`]s. Abilities are loaded once into an
//! [`AbilityCatalog`](crate::catalog::AbilityCatalog) and shared by reference.
//!
//! # Module Structure
//!
//! - `procedure`: Procedures, steps and effect payloads

pub mod procedure;

pub use procedure::{
    DamageType, DebuffOp, EffectPayload, Procedure, ProcedureEffect, StateOp, Step, StepKind,
    TargetSelector, TemplateRef, ValueSource,
};

use std::fmt;

use crate::state::{EntityTypeSet, ResourceKind};

// ============================================================================
// Identity & Kind
// ============================================================================

/// Catalog key of an ability (`"doubleSlash"`, `"teleport"`).
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AbilityId(String);

impl AbilityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AbilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AbilityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AbilityId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AbilityKind {
    Offensive,
    Defensive,
    Healing,
    Neutral,
}

// ============================================================================
// Cost, Range, Predicate
// ============================================================================

/// Resources deducted from the caster when a cast passes the gates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityCost {
    pub ap: u32,
    pub st: u32,
    pub hp: u32,
    pub mp: u32,
}

impl AbilityCost {
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

/// Maximum caster-to-target distance.
///
/// Authored as an integer: `-1` means the ability defines its own spatial
/// semantics (teleport) and is never distance-gated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i64", into = "i64"))]
pub enum AbilityRange {
    Within(u32),
    Unbounded,
}

impl AbilityRange {
    pub const UNBOUNDED_SENTINEL: i64 = -1;
}

/// A negative range other than the `-1` sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid ability range {0}: expected a distance in 0..=4294967295 or -1")]
pub struct InvalidRange(pub i64);

impl TryFrom<i64> for AbilityRange {
    type Error = InvalidRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value == Self::UNBOUNDED_SENTINEL {
            return Ok(Self::Unbounded);
        }
        u32::try_from(value)
            .map(Self::Within)
            .map_err(|_| InvalidRange(value))
    }
}

impl From<AbilityRange> for i64 {
    fn from(range: AbilityRange) -> Self {
        match range {
            AbilityRange::Within(distance) => i64::from(distance),
            AbilityRange::Unbounded => AbilityRange::UNBOUNDED_SENTINEL,
        }
    }
}

/// Who may cast the ability and on whom.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetPredicate {
    pub caster: EntityTypeSet,
    pub target: EntityTypeSet,
    pub target_self_allowed: bool,
}

// ============================================================================
// Ability
// ============================================================================

/// Immutable ability definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    /// Filled from the catalog key when loaded from content.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing))]
    pub id: AbilityId,
    pub kind: AbilityKind,
    pub description: String,
    pub cost: AbilityCost,
    pub range: AbilityRange,
    pub aoe: u32,
    pub predicate: TargetPredicate,
    pub procedures: Vec<Procedure>,
}

impl Ability {
    /// Number of steps across all procedures.
    pub fn step_count(&self) -> usize {
        self.procedures.iter().map(Procedure::len).sum()
    }

    pub fn is_area(&self) -> bool {
        self.aoe > 0
    }
}
