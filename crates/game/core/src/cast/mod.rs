//! Casting abilities.
//!
//! A cast passes two gates before anything changes (target predicate, then
//! cost) and is then interpreted procedure by procedure. Effects persist as
//! they are applied: a check that fails halfway through an ability leaves the
//! earlier steps in place.
//!
//! # Module Structure
//!
//! - `validation`: Target predicate gate
//! - `cost`: All-or-nothing resource gate
//! - `area`: Area-of-effect target selection
//! - `effects`: Effect resolution and check evaluation
//! - `pipeline`: Procedure interpreter
//! - `types`: Requests, step records, results and events
//! - `error`: Cast, gate and malformed-effect errors

pub mod area;
pub mod cost;
pub mod effects;
mod error;
mod pipeline;
mod types;
pub mod validation;

pub use error::{CastError, CostError, MalformedEffect, TargetError};
pub use pipeline::{CastOptions, ProcedureInterpreter};
pub use types::{
    AppliedEffect, Bindings, CastEvent, CastRequest, ExecutionResult, ProcedureOutcome, StepIndex,
    StepRecord,
};
