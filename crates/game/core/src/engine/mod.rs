//! Cast entry point and turn budgets.
//!
//! [`AbilityEngine`] looks an ability up in the catalog, resolves the target
//! of the request, runs the [`ProcedureInterpreter`] and reports the outcome
//! to the [`EventSink`](crate::env::EventSink). Every cast, successful or not,
//! produces exactly one [`CastEvent`].

mod ticks;

pub use ticks::{OutOfTime, TickScheduler};

use crate::ability::Ability;
use crate::cast::{
    CastError, CastEvent, CastOptions, CastRequest, ExecutionResult, ProcedureInterpreter,
    TargetError,
};
use crate::catalog::AbilityCatalog;
use crate::config::RulesConfig;
use crate::env::{CastEnv, EntityStore};
use crate::state::EntityId;

/// Stateless cast executor over a shared catalog.
#[derive(Clone, Copy, Debug)]
pub struct AbilityEngine<'a> {
    catalog: &'a AbilityCatalog,
    config: &'a RulesConfig,
}

impl<'a> AbilityEngine<'a> {
    pub fn new(catalog: &'a AbilityCatalog, config: &'a RulesConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'a AbilityCatalog {
        self.catalog
    }

    pub fn config(&self) -> &'a RulesConfig {
        self.config
    }

    /// Runs one cast and publishes its outcome.
    pub fn cast(
        &self,
        request: &CastRequest,
        store: &mut dyn EntityStore,
        ticks: &mut TickScheduler,
        env: CastEnv<'_>,
    ) -> Result<ExecutionResult, CastError> {
        let outcome = self.run(request, store, ticks, env);

        let event = match &outcome {
            Ok(result) => CastEvent::Executed(result.clone()),
            Err(error) => CastEvent::Failed {
                ability: request.ability.clone(),
                caster: request.caster,
                target: request.target,
                error: error.clone(),
            },
        };
        env.events.publish(event);

        outcome
    }

    fn run(
        &self,
        request: &CastRequest,
        store: &mut dyn EntityStore,
        ticks: &mut TickScheduler,
        env: CastEnv<'_>,
    ) -> Result<ExecutionResult, CastError> {
        let ability = self.catalog.lookup(&request.ability)?;
        let target = resolve_target(ability, request)?;

        tracing::debug!(
            ability = %ability.id,
            caster = %request.caster,
            %target,
            ignore_cost = request.ignore_cost,
            "cast requested"
        );

        ProcedureInterpreter::new(env.graph, self.config).execute(
            ability,
            request.caster,
            target,
            store,
            ticks,
            CastOptions {
                ignore_cost: request.ignore_cost,
            },
        )
    }
}

/// A request without a target is a self-cast; abilities that cannot target
/// their caster reject it as missing a target.
fn resolve_target(ability: &Ability, request: &CastRequest) -> Result<EntityId, CastError> {
    match request.target {
        Some(target) => Ok(target),
        None if ability.predicate.target_self_allowed => Ok(request.caster),
        None => Err(CastError::InvalidTarget {
            ability: ability.id.clone(),
            caster: request.caster,
            target: request.caster,
            reason: TargetError::TargetRequired,
        }),
    }
}
