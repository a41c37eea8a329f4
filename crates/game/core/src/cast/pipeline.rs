//! Procedure interpreter.
//!
//! Runs a gated cast step by step:
//! 1. Validate the target predicate (no mutation on failure)
//! 2. Select affected entities (primary + area secondaries)
//! 3. Reserve the cost (no mutation on failure)
//! 4. Walk every procedure in order
//!
//! ## Procedures
//!
//! Each procedure starts with the full affected set as its live chain. Steps
//! bound to `target` apply to every entity still in the chain; steps bound to
//! `self` apply to the caster. A check removes the entities it fails for, and
//! the procedure stops when nothing is left (or when a `self` check fails).
//! Applied steps are never rolled back.
//!
//! ## Ticks
//!
//! Before every step the caster's remaining budget is checked against the
//! step's ticks. A shortfall interrupts the whole ability with
//! [`CastError::OutOfTime`] carrying the partial result; nothing of that step
//! is applied. Ticks are charged once per step, after it ran.
//!
//! ## Malformed effects
//!
//! Content that cannot be applied ends the current procedure only. The step
//! is recorded with zero ticks and whatever it applied before failing.

use crate::ability::{Ability, Procedure, Step, TargetSelector};
use crate::config::RulesConfig;
use crate::engine::{OutOfTime, TickScheduler};
use crate::env::{EntityStore, LocationGraph};
use crate::state::EntityId;

use super::area::select_targets;
use super::cost;
use super::effects::{evaluate_check, resolve};
use super::error::{CastError, MalformedEffect};
use super::types::{
    AppliedEffect, Bindings, ExecutionResult, ProcedureOutcome, StepIndex, StepRecord,
};
use super::validation::validate;

/// Per-cast switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CastOptions {
    pub ignore_cost: bool,
}

/// Executes abilities against an entity store.
///
/// Stateless apart from borrowed configuration; one interpreter can serve any
/// number of casts.
#[derive(Clone, Copy)]
pub struct ProcedureInterpreter<'a> {
    graph: &'a dyn LocationGraph,
    config: &'a RulesConfig,
}

impl<'a> ProcedureInterpreter<'a> {
    pub fn new(graph: &'a dyn LocationGraph, config: &'a RulesConfig) -> Self {
        Self { graph, config }
    }

    /// Gates and runs `ability` from `caster` on `target`.
    pub fn execute(
        &self,
        ability: &Ability,
        caster: EntityId,
        target: EntityId,
        store: &mut dyn EntityStore,
        ticks: &mut TickScheduler,
        options: CastOptions,
    ) -> Result<ExecutionResult, CastError> {
        // 1-2. Gates that only read.
        let affected = {
            let caster_entity = store
                .get(caster)
                .ok_or(CastError::EntityNotFound { entity: caster })?;
            let target_entity = store
                .get(target)
                .ok_or(CastError::EntityNotFound { entity: target })?;

            validate(ability, caster_entity, target_entity, self.graph).map_err(|reason| {
                tracing::debug!(ability = %ability.id, %caster, %target, %reason, "target rejected");
                CastError::InvalidTarget {
                    ability: ability.id.clone(),
                    caster,
                    target,
                    reason,
                }
            })?;

            select_targets(
                ability,
                caster_entity,
                target_entity,
                &*store,
                self.graph,
                self.config.area_origin,
            )
        };

        // 3. Cost.
        if !options.ignore_cost {
            let caster_entity = store
                .get_mut(caster)
                .ok_or(CastError::EntityNotFound { entity: caster })?;
            cost::reserve(caster_entity, &ability.cost).map_err(|shortfall| {
                tracing::debug!(ability = %ability.id, %caster, %shortfall, "cost rejected");
                CastError::InsufficientResource {
                    ability: ability.id.clone(),
                    caster,
                    shortfall,
                }
            })?;
        }

        let mut result = ExecutionResult::new(
            ability.id.clone(),
            caster,
            target,
            affected,
            !options.ignore_cost,
        );

        // 4. Procedures.
        for (index, procedure) in ability.procedures.iter().enumerate() {
            let run = ProcedureRun {
                index,
                caster,
                chain: result.affected.clone(),
            };

            match run.execute(procedure, store, ticks, &mut result) {
                Ok(outcome) => result.procedures.push(outcome),
                Err(interrupt) => {
                    result.procedures.push(ProcedureOutcome::Interrupted {
                        step: interrupt.step.step,
                    });
                    let remaining = ability.procedures.len() - result.procedures.len();
                    result
                        .procedures
                        .extend(std::iter::repeat_n(ProcedureOutcome::NotStarted, remaining));

                    tracing::debug!(
                        ability = %ability.id,
                        %caster,
                        step = %interrupt.step,
                        ticks_consumed = result.ticks_consumed,
                        "cast interrupted: out of time"
                    );

                    return Err(CastError::OutOfTime {
                        ability: ability.id.clone(),
                        step: interrupt.step,
                        source: interrupt.source,
                        partial: Box::new(result),
                    });
                }
            }
        }

        tracing::debug!(
            ability = %ability.id,
            %caster,
            %target,
            affected = result.affected.len(),
            ticks_consumed = result.ticks_consumed,
            "cast executed"
        );

        Ok(result)
    }
}

// ============================================================================
// Procedure Run
// ============================================================================

struct Interrupt {
    step: StepIndex,
    source: OutOfTime,
}

/// Live state of one procedure.
struct ProcedureRun {
    index: usize,
    caster: EntityId,
    chain: Vec<EntityId>,
}

enum StepFlow {
    Continue,
    Stop(ProcedureOutcome),
}

impl ProcedureRun {
    fn execute(
        mut self,
        procedure: &Procedure,
        store: &mut dyn EntityStore,
        ticks: &mut TickScheduler,
        result: &mut ExecutionResult,
    ) -> Result<ProcedureOutcome, Interrupt> {
        for (position, step) in procedure.steps.iter().enumerate() {
            let index = StepIndex::new(self.index, position);
            let cost = step.effect().ticks;

            ticks
                .check(self.caster, cost)
                .map_err(|source| Interrupt { step: index, source })?;

            let (flow, record) = self.run_step(step, index, store);
            let charged = record.ticks;
            result.steps.push(record);

            if charged > 0 {
                ticks
                    .accrue(self.caster, charged)
                    .map_err(|source| Interrupt { step: index, source })?;
                result.ticks_consumed += charged;
            }

            if let StepFlow::Stop(outcome) = flow {
                return Ok(outcome);
            }
        }

        Ok(ProcedureOutcome::Completed)
    }

    fn bound(&self, selector: TargetSelector) -> Vec<EntityId> {
        match selector {
            TargetSelector::Caster => vec![self.caster],
            TargetSelector::Target => self.chain.clone(),
        }
    }

    fn run_step(
        &mut self,
        step: &Step,
        index: StepIndex,
        store: &mut dyn EntityStore,
    ) -> (StepFlow, StepRecord) {
        let effect = step.effect();
        let mut record = StepRecord {
            index,
            kind: step.kind(),
            ticks: effect.ticks,
            effects: Vec::new(),
        };

        let outcome = match step {
            Step::Action(_) => self.apply_action(step, store, &mut record.effects),
            Step::Check(_) => self.apply_check(step, index, store, &mut record.effects),
        };

        match outcome {
            Ok(flow) => {
                tracing::trace!(step = %index, kind = %record.kind, effects = record.effects.len(), "step applied");
                (flow, record)
            }
            Err(error) => {
                tracing::debug!(step = %index, %error, "procedure aborted: malformed effect");
                record.ticks = 0;
                (
                    StepFlow::Stop(ProcedureOutcome::Aborted {
                        step: index.step,
                        error,
                    }),
                    record,
                )
            }
        }
    }

    fn apply_action(
        &self,
        step: &Step,
        store: &mut dyn EntityStore,
        applied: &mut Vec<AppliedEffect>,
    ) -> Result<StepFlow, MalformedEffect> {
        let effect = step.effect();
        for entity in self.bound(effect.target) {
            let bindings = self.bindings_for(effect.target, entity);
            applied.push(resolve(&effect.effect, entity, bindings, store)?);
        }
        Ok(StepFlow::Continue)
    }

    fn apply_check(
        &mut self,
        step: &Step,
        index: StepIndex,
        store: &dyn EntityStore,
        applied: &mut Vec<AppliedEffect>,
    ) -> Result<StepFlow, MalformedEffect> {
        let effect = step.effect();
        let mut passing = Vec::new();

        for entity in self.bound(effect.target) {
            let checked = evaluate_check(&effect.effect, entity, store)?;
            if matches!(checked, AppliedEffect::Checked { passed: true, .. }) {
                passing.push(entity);
            }
            applied.push(checked);
        }

        if passing.is_empty() {
            return Ok(StepFlow::Stop(ProcedureOutcome::CheckFailed { step: index.step }));
        }
        if effect.target == TargetSelector::Target {
            self.chain = passing;
        }

        Ok(StepFlow::Continue)
    }

    /// `target` binds to the entity being processed; a `self` step keeps the
    /// head of the chain as its target for references.
    fn bindings_for(&self, selector: TargetSelector, entity: EntityId) -> Bindings {
        match selector {
            TargetSelector::Target => Bindings::new(self.caster, entity),
            TargetSelector::Caster => {
                Bindings::new(self.caster, self.chain.first().copied().unwrap_or(self.caster))
            }
        }
    }
}
