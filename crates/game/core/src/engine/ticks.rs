//! Per-caster tick budgets within the current turn.
//!
//! Every caster starts a turn with `ticks_per_turn` ticks. Ability steps spend
//! them one step at a time, so a long ability is interrupted exactly at the
//! step that would overrun the turn. Turn boundaries are driven by the host
//! through [`TickScheduler::begin_turn`].

use std::collections::BTreeMap;

use crate::state::EntityId;

/// The caster cannot afford the requested ticks this turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{caster} needs {required} ticks but has {remaining} left this turn")]
pub struct OutOfTime {
    pub caster: EntityId,
    pub required: u32,
    pub remaining: u32,
}

/// Tracks each caster's remaining ticks in the current turn.
///
/// Casters that have not spent anything yet are implicitly at the full budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickScheduler {
    ticks_per_turn: u32,
    spent: BTreeMap<EntityId, u32>,
}

impl TickScheduler {
    pub fn new(ticks_per_turn: u32) -> Self {
        Self {
            ticks_per_turn,
            spent: BTreeMap::new(),
        }
    }

    pub fn ticks_per_turn(&self) -> u32 {
        self.ticks_per_turn
    }

    /// Resets every caster to a full budget.
    pub fn begin_turn(&mut self) {
        self.spent.clear();
    }

    /// Resets a single caster to a full budget.
    pub fn begin_turn_for(&mut self, caster: EntityId) {
        self.spent.remove(&caster);
    }

    pub fn remaining(&self, caster: EntityId) -> u32 {
        let spent = self.spent.get(&caster).copied().unwrap_or(0);
        self.ticks_per_turn.saturating_sub(spent)
    }

    /// Pre-flight check: can `caster` afford `ticks` right now?
    pub fn check(&self, caster: EntityId, ticks: u32) -> Result<(), OutOfTime> {
        let remaining = self.remaining(caster);
        if ticks > remaining {
            return Err(OutOfTime {
                caster,
                required: ticks,
                remaining,
            });
        }
        Ok(())
    }

    /// Spends `ticks`, returning the budget left afterwards.
    pub fn accrue(&mut self, caster: EntityId, ticks: u32) -> Result<u32, OutOfTime> {
        self.check(caster, ticks)?;
        if ticks > 0 {
            *self.spent.entry(caster).or_insert(0) += ticks;
        }
        Ok(self.remaining(caster))
    }

    /// Copies one caster's budget into a standalone scheduler.
    ///
    /// Lets a concurrent host spend that caster's ticks while the caster is
    /// locked; the shared entry keeps reporting the pre-cast budget until
    /// [`restore`](Self::restore) writes the result back.
    pub fn fork(&self, caster: EntityId) -> TickScheduler {
        let mut own = TickScheduler::new(self.ticks_per_turn);
        if let Some(spent) = self.spent.get(&caster) {
            own.spent.insert(caster, *spent);
        }
        own
    }

    /// Writes back budgets previously split off with [`fork`](Self::fork).
    pub fn restore(&mut self, other: TickScheduler) {
        self.spent.extend(other.spent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accrue_spends_until_budget_is_gone() {
        let mut ticks = TickScheduler::new(4);
        let caster = EntityId(1);

        assert_eq!(ticks.accrue(caster, 2), Ok(2));
        assert_eq!(ticks.accrue(caster, 2), Ok(0));
        assert_eq!(
            ticks.accrue(caster, 1),
            Err(OutOfTime {
                caster,
                required: 1,
                remaining: 0,
            })
        );
        assert_eq!(ticks.accrue(caster, 0), Ok(0));
    }

    #[test]
    fn failed_accrue_spends_nothing() {
        let mut ticks = TickScheduler::new(4);
        let caster = EntityId(1);
        ticks.accrue(caster, 3).unwrap();

        assert!(ticks.accrue(caster, 2).is_err());
        assert_eq!(ticks.remaining(caster), 1);
    }

    #[test]
    fn budgets_are_per_caster_and_reset_each_turn() {
        let mut ticks = TickScheduler::new(4);
        ticks.accrue(EntityId(1), 4).unwrap();

        assert_eq!(ticks.remaining(EntityId(1)), 0);
        assert_eq!(ticks.remaining(EntityId(2)), 4);

        ticks.begin_turn();
        assert_eq!(ticks.remaining(EntityId(1)), 4);
    }

    #[test]
    fn fork_and_restore_round_trip_a_budget() {
        let mut shared = TickScheduler::new(4);
        shared.accrue(EntityId(1), 1).unwrap();
        shared.accrue(EntityId(2), 3).unwrap();

        let mut own = shared.fork(EntityId(1));
        assert_eq!(own.remaining(EntityId(1)), 3);
        own.accrue(EntityId(1), 2).unwrap();
        assert_eq!(shared.remaining(EntityId(1)), 3);

        shared.restore(own);
        assert_eq!(shared.remaining(EntityId(1)), 1);
        assert_eq!(shared.remaining(EntityId(2)), 1);
    }
}
