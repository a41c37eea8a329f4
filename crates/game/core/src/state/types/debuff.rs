//! Debuff stack carried by every entity.
//!
//! Debuffs are stackable status conditions. The stack keeps every instance in
//! push order: pushing `Burning` twice leaves two entries. Nothing here expires
//! on its own; an end-of-turn sweep owned by the host consumes [`list`] and
//! [`remove`] to drop instances.
//!
//! [`list`]: DebuffStack::list
//! [`remove`]: DebuffStack::remove

/// Stackable status conditions an ability can push onto an entity.
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
pub enum Debuff {
    // ========================================================================
    // Crowd Control
    // ========================================================================
    Paralyzed,
    Stunned,
    Frozen,
    Confused,
    Charmed,
    Frightened,
    Silenced,
    Blinded,

    // ========================================================================
    // Elemental
    // ========================================================================
    Wet,
    Burning,

    // ========================================================================
    // Attrition
    // ========================================================================
    Poisoned,
    Bleeding,
    Exhausted,
    Diseased,
}

/// Ordered collection of active debuff instances on one entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DebuffStack {
    entries: Vec<Debuff>,
}

impl DebuffStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one instance of `debuff` on top of the stack.
    pub fn push(&mut self, debuff: Debuff) {
        self.entries.push(debuff);
    }

    /// Removes the most recently pushed instance of `debuff`.
    ///
    /// Returns `false` (and leaves the stack untouched) when no instance exists.
    pub fn pop(&mut self, debuff: Debuff) -> bool {
        match self.entries.iter().rposition(|d| *d == debuff) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes the top of the stack regardless of kind.
    pub fn pop_latest(&mut self) -> Option<Debuff> {
        self.entries.pop()
    }

    pub fn contains(&self, debuff: Debuff) -> bool {
        self.entries.contains(&debuff)
    }

    /// Number of stacked instances of `debuff`.
    pub fn count(&self, debuff: Debuff) -> usize {
        self.entries.iter().filter(|d| **d == debuff).count()
    }

    /// All instances, oldest first.
    pub fn list(&self) -> &[Debuff] {
        &self.entries
    }

    /// Removes the instance at `index` (as reported by [`list`](Self::list)).
    pub fn remove(&mut self, index: usize) -> Option<Debuff> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_duplicates_in_order() {
        let mut stack = DebuffStack::new();
        stack.push(Debuff::Burning);
        stack.push(Debuff::Wet);
        stack.push(Debuff::Burning);

        assert_eq!(
            stack.list(),
            &[Debuff::Burning, Debuff::Wet, Debuff::Burning]
        );
        assert_eq!(stack.count(Debuff::Burning), 2);
        assert!(stack.contains(Debuff::Wet));
        assert!(!stack.contains(Debuff::Frozen));
    }

    #[test]
    fn pop_removes_most_recent_instance_of_kind() {
        let mut stack = DebuffStack::new();
        stack.push(Debuff::Burning);
        stack.push(Debuff::Wet);
        stack.push(Debuff::Burning);
        stack.push(Debuff::Blinded);

        assert!(stack.pop(Debuff::Burning));
        assert_eq!(
            stack.list(),
            &[Debuff::Burning, Debuff::Wet, Debuff::Blinded]
        );
    }

    #[test]
    fn pop_on_missing_kind_is_noop() {
        let mut stack = DebuffStack::new();
        stack.push(Debuff::Wet);

        assert!(!stack.pop(Debuff::Burning));
        assert_eq!(stack.list(), &[Debuff::Wet]);

        let mut empty = DebuffStack::new();
        assert!(!empty.pop(Debuff::Wet));
        assert!(empty.is_empty());
    }

    #[test]
    fn push_never_runs_out_of_room() {
        let mut stack = DebuffStack::new();
        for _ in 0..64 {
            stack.push(Debuff::Poisoned);
        }
        stack.push(Debuff::Wet);

        assert_eq!(stack.len(), 65);
        assert_eq!(stack.count(Debuff::Poisoned), 64);
        assert_eq!(stack.list().last(), Some(&Debuff::Wet));
    }

    #[test]
    fn remove_by_index_supports_expiry_sweeps() {
        let mut stack = DebuffStack::new();
        stack.push(Debuff::Stunned);
        stack.push(Debuff::Bleeding);

        assert_eq!(stack.remove(0), Some(Debuff::Stunned));
        assert_eq!(stack.remove(5), None);
        assert_eq!(stack.pop_latest(), Some(Debuff::Bleeding));
        assert!(stack.is_empty());
    }
}
