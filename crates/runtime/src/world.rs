//! Shared, thread-safe entity world.
//!
//! Every entity sits behind its own mutex. A cast locks exactly the entities
//! it may touch, in ascending id order, so casts on disjoint entities run in
//! parallel and casts sharing an entity serialize without deadlocking. The
//! engine then runs against a [`LockedEntities`] view that exposes only the
//! locked entities.
//!
//! ## Lock Set
//!
//! - single-target abilities: caster and target
//! - area abilities: every entity, since positions can change between
//!   choosing candidates and acquiring their locks
//!
//! ## Tick Budgets
//!
//! Budgets live in one shared [`TickScheduler`]. A cast forks its caster's
//! budget while it holds the caster's lock and writes it back afterwards; in
//! between, the shared entry still reports the budget the cast started with.
//! A budget forked before [`World::begin_turn`] is discarded on return.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use rules_content::Content;
use rules_core::{
    AbilityCatalog, AbilityEngine, CastEnv, CastRequest, ChebyshevGrid, Debuff, Entity,
    EntityId, EntityStore, ExecutionResult, LocationGraph, RulesConfig, TickScheduler,
};
use tokio::sync::broadcast;

use crate::error::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic, TurnEvent};

// ============================================================================
// Locked View
// ============================================================================

/// Entity store over a set of held entity locks.
pub struct LockedEntities<'a> {
    guards: BTreeMap<EntityId, MutexGuard<'a, Entity>>,
}

impl EntityStore for LockedEntities<'_> {
    fn get(&self, id: EntityId) -> Option<&Entity> {
        self.guards.get(&id).map(|guard| &**guard)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.guards.get_mut(&id).map(|guard| &mut **guard)
    }

    fn ids(&self) -> Vec<EntityId> {
        self.guards.keys().copied().collect()
    }
}

// ============================================================================
// Turn State
// ============================================================================

struct TurnState {
    number: u64,
    ticks: TickScheduler,
}

/// A caster's budget checked out for the duration of one cast.
struct Budget {
    turn: u64,
    ticks: TickScheduler,
}

// ============================================================================
// World
// ============================================================================

type Graph = dyn LocationGraph + Send + Sync;

/// In-memory world that runs casts concurrently.
pub struct World {
    entities: RwLock<BTreeMap<EntityId, Arc<Mutex<Entity>>>>,
    turn: Mutex<TurnState>,
    catalog: Arc<AbilityCatalog>,
    config: RulesConfig,
    graph: Box<Graph>,
    events: EventBus,
}

impl World {
    pub fn new(catalog: Arc<AbilityCatalog>, config: RulesConfig) -> Self {
        Self {
            entities: RwLock::new(BTreeMap::new()),
            turn: Mutex::new(TurnState {
                number: 0,
                ticks: TickScheduler::new(config.ticks_per_turn),
            }),
            catalog,
            events: EventBus::with_capacity(config.event_capacity),
            config,
            graph: Box::new(ChebyshevGrid),
        }
    }

    pub fn from_content(content: Content) -> Self {
        Self::new(Arc::new(content.catalog), content.config)
    }

    /// Replaces the default Chebyshev grid.
    #[must_use]
    pub fn with_graph(mut self, graph: impl LocationGraph + Send + Sync + 'static) -> Self {
        self.graph = Box::new(graph);
        self
    }

    pub fn catalog(&self) -> &AbilityCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.events.subscribe(topic)
    }

    // ===== entities =====

    pub fn spawn(&self, entity: Entity) -> Result<()> {
        let mut entities = self
            .entities
            .write()
            .map_err(|_| RuntimeError::Poisoned("entity table"))?;
        if entities.contains_key(&entity.id) {
            return Err(RuntimeError::DuplicateEntity(entity.id));
        }
        tracing::debug!(entity = %entity.id, kind = %entity.kind, "entity spawned");
        entities.insert(entity.id, Arc::new(Mutex::new(entity)));
        Ok(())
    }

    pub fn despawn(&self, id: EntityId) -> Result<Entity> {
        let handle = self
            .entities
            .write()
            .map_err(|_| RuntimeError::Poisoned("entity table"))?
            .remove(&id)
            .ok_or(RuntimeError::UnknownEntity(id))?;
        let entity = lock(&handle)?.clone();
        Ok(entity)
    }

    /// Snapshot of one entity.
    pub fn entity(&self, id: EntityId) -> Result<Entity> {
        let handle = self
            .handles(|candidate| candidate == id)?
            .pop()
            .ok_or(RuntimeError::UnknownEntity(id))?;
        let entity = lock(&handle.1)?.clone();
        Ok(entity)
    }

    /// Snapshot of every entity, ascending by id.
    pub fn snapshot(&self) -> Result<Vec<Entity>> {
        self.handles(|_| true)?
            .iter()
            .map(|(_, handle)| lock(handle).map(|entity| entity.clone()))
            .collect()
    }

    // ===== turns =====

    /// Current turn number (0 before the first [`begin_turn`](Self::begin_turn)).
    pub fn turn(&self) -> Result<u64> {
        Ok(self.turn_state()?.number)
    }

    /// Resets every caster's tick budget.
    pub fn begin_turn(&self) -> Result<u64> {
        let number = {
            let mut state = self.turn_state()?;
            state.number += 1;
            state.ticks.begin_turn();
            state.number
        };
        tracing::debug!(turn = number, "turn started");
        self.events
            .publish(Event::Turn(TurnEvent::Started { turn: number }));
        Ok(number)
    }

    /// Ticks `caster` has left this turn. While one of its casts is in
    /// flight this is the budget that cast started with.
    pub fn remaining_ticks(&self, caster: EntityId) -> Result<u32> {
        Ok(self.turn_state()?.ticks.remaining(caster))
    }

    /// End-of-turn sweep: removes every debuff instance `expire` selects.
    ///
    /// Entities are visited one at a time in ascending id order; `expire`
    /// sees each instance oldest first. Returns what was removed per entity.
    pub fn expire_debuffs<F>(&self, mut expire: F) -> Result<Vec<(EntityId, Vec<Debuff>)>>
    where
        F: FnMut(&Entity, Debuff) -> bool,
    {
        let mut expired = Vec::new();

        for (id, handle) in self.handles(|_| true)? {
            let mut entity = lock(&handle)?;
            let doomed: Vec<usize> = entity
                .debuffs
                .list()
                .iter()
                .enumerate()
                .filter(|(_, debuff)| expire(&*entity, **debuff))
                .map(|(index, _)| index)
                .collect();
            if doomed.is_empty() {
                continue;
            }

            // Highest index first so earlier indices stay valid.
            let mut removed: Vec<Debuff> = doomed
                .into_iter()
                .rev()
                .filter_map(|index| entity.debuffs.remove(index))
                .collect();
            removed.reverse();
            drop(entity);

            tracing::debug!(entity = %id, removed = removed.len(), "debuffs expired");
            self.events.publish(Event::Turn(TurnEvent::DebuffsExpired {
                entity: id,
                removed: removed.clone(),
            }));
            expired.push((id, removed));
        }

        Ok(expired)
    }

    // ===== casting =====

    /// Runs one cast with its entities locked.
    pub fn cast(&self, request: &CastRequest) -> Result<ExecutionResult> {
        let target = request.target.unwrap_or(request.caster);
        let lock_all = self
            .catalog
            .get(request.ability.as_str())
            .is_some_and(|ability| ability.is_area());

        let handles = self.handles(|id| lock_all || id == request.caster || id == target)?;

        // Ascending id order; `handles` comes from an ordered map.
        let mut guards = BTreeMap::new();
        for (id, handle) in &handles {
            guards.insert(*id, lock(handle)?);
        }
        let mut store = LockedEntities { guards };

        let mut budget = self.checkout(request.caster)?;
        let engine = AbilityEngine::new(&self.catalog, &self.config);
        let env = CastEnv::new(self.graph.as_ref(), &self.events);
        let outcome = engine.cast(request, &mut store, &mut budget.ticks, env);
        self.checkin(budget)?;

        drop(store);
        Ok(outcome?)
    }

    // ===== internals =====

    fn turn_state(&self) -> Result<MutexGuard<'_, TurnState>> {
        self.turn.lock().map_err(|_| RuntimeError::Poisoned("turn"))
    }

    fn handles(
        &self,
        mut wanted: impl FnMut(EntityId) -> bool,
    ) -> Result<Vec<(EntityId, Arc<Mutex<Entity>>)>> {
        let entities = self
            .entities
            .read()
            .map_err(|_| RuntimeError::Poisoned("entity table"))?;
        Ok(entities
            .iter()
            .filter(|(id, _)| wanted(**id))
            .map(|(id, handle)| (*id, Arc::clone(handle)))
            .collect())
    }

    fn checkout(&self, caster: EntityId) -> Result<Budget> {
        let state = self.turn_state()?;
        Ok(Budget {
            turn: state.number,
            ticks: state.ticks.fork(caster),
        })
    }

    fn checkin(&self, budget: Budget) -> Result<()> {
        let mut state = self.turn_state()?;
        if state.number == budget.turn {
            state.ticks.restore(budget.ticks);
        }
        Ok(())
    }
}

fn lock(handle: &Mutex<Entity>) -> Result<MutexGuard<'_, Entity>> {
    handle.lock().map_err(|_| RuntimeError::Poisoned("entity"))
}
