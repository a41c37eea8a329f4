//! Deterministic ability rules shared by every host.
//!
//! `rules-core` turns declarative ability definitions into state changes on
//! players, monsters and items. Casts are gated (target predicate, resource
//! cost), then interpreted step by step inside a per-turn tick budget. The
//! crate performs no I/O and owns no world state: entities, geometry and
//! event delivery are supplied through the traits in [`env`].
//!
//! All casts flow through [`engine::AbilityEngine`], and supporting crates
//! depend on the types re-exported here.
pub mod ability;
pub mod cast;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

pub use ability::{
    Ability, AbilityCost, AbilityId, AbilityKind, AbilityRange, DamageType, DebuffOp,
    EffectPayload, InvalidRange, Procedure, ProcedureEffect, StateOp, Step, StepKind,
    TargetPredicate, TargetSelector, TemplateRef, ValueSource,
};
pub use cast::{
    AppliedEffect, Bindings, CastError, CastEvent, CastOptions, CastRequest, CostError,
    ExecutionResult, MalformedEffect, ProcedureInterpreter, ProcedureOutcome, StepIndex,
    StepRecord, TargetError,
};
pub use catalog::{AbilityCatalog, CatalogError, PredicateRole};
pub use config::{AreaOrigin, RulesConfig, TICKS_PER_TURN};
pub use engine::{AbilityEngine, OutOfTime, TickScheduler};
pub use env::{
    CastEnv, ChebyshevGrid, EntityMap, EntityStore, EventSink, LocationGraph, NullSink,
    RecordingSink,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    Debuff, DebuffStack, Entity, EntityId, EntityType, EntityTypeSet, FieldPath,
    Position, ResourceKind, Resources, StateKey, StateValue,
};
