//! Shared roster of live creatures.
//!
//! The `Roster` wraps an [`Arena`] in a readers-writer lock and exposes
//! exactly three ways in:
//!
//! - [`Roster::snapshot`]: copy every live entity under the shared lock
//! - [`Roster::read_locked`]: run a read-only closure under the shared lock
//! - [`Roster::mutate`]: run a mutating closure under the exclusive lock
//!
//! No iterator over live entities escapes a lock scope, so a scan can never
//! observe a half-applied removal.
//!
//! # Poisoning
//!
//! A worker that panics while holding the lock poisons it. The roster takes
//! the guard out of the poison error and carries on: every mutation the
//! arena performs is complete before it returns, so the data is consistent
//! even when the closure that follows panicked.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::arena::{Arena, Census};
use crate::entity::{Creature, Entity, EntityId};

/// Readers-writer guarded arena shared by the mover, scanner and resolver.
///
/// # Example
///
/// ```
/// use skirmish_core::roster::Roster;
/// use skirmish_core::entity::{Creature, Kind};
///
/// let roster = Roster::new();
/// let id = roster.insert(Creature::new("R1", Kind::Ranger, 5, 5).unwrap());
///
/// let names: Vec<String> = roster.snapshot().iter().map(|e| e.name().to_string()).collect();
/// assert_eq!(names, vec!["R1"]);
///
/// roster.mutate(|arena| arena.bury(id));
/// assert!(roster.is_empty());
/// assert_eq!(roster.fallen().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Roster {
    arena: RwLock<Arena>,
}

impl Roster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a roster populated with `creatures`, in order.
    #[must_use]
    pub fn with_creatures(creatures: impl IntoIterator<Item = Creature>) -> Self {
        let mut arena = Arena::new();
        for creature in creatures {
            arena.spawn(creature);
        }
        Self {
            arena: RwLock::new(arena),
        }
    }

    /// Point-in-time copy of every live entity.
    ///
    /// The copy is taken under the shared lock and is free to iterate after
    /// the lock is gone. It may already be stale by then.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Entity> {
        self.read_locked(|arena| arena.iter().cloned().collect())
    }

    /// Runs `f` with shared access. Any number of readers may run at once.
    pub fn read_locked<R>(&self, f: impl FnOnce(&Arena) -> R) -> R {
        f(&self.read_guard())
    }

    /// Runs `f` with exclusive access.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut Arena) -> R) -> R {
        f(&mut self.write_guard())
    }

    /// Admits a creature and returns its id.
    pub fn insert(&self, creature: Creature) -> EntityId {
        self.mutate(|arena| arena.spawn(creature))
    }

    /// Returns `true` if `id` is alive.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.read_locked(|arena| arena.contains(id))
    }

    /// Number of live creatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_locked(Arena::len)
    }

    /// Returns `true` if nobody is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_locked(Arena::is_empty)
    }

    /// Live creatures, in insertion order.
    #[must_use]
    pub fn survivors(&self) -> Vec<Entity> {
        self.snapshot()
    }

    /// Dead creatures, in order of death.
    #[must_use]
    pub fn fallen(&self) -> Vec<Entity> {
        self.read_locked(|arena| arena.graveyard().to_vec())
    }

    /// Number of dead creatures.
    #[must_use]
    pub fn fallen_count(&self) -> usize {
        self.read_locked(|arena| arena.graveyard().len())
    }

    /// Per-kind head count of live creatures.
    #[must_use]
    pub fn census(&self) -> Census {
        self.read_locked(Arena::census)
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, Arena> {
        self.arena.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, Arena> {
        self.arena.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Kind;
    use std::sync::Arc;
    use std::thread;

    fn ranger(name: &str) -> Creature {
        Creature::new(name, Kind::Ranger, 10, 10).unwrap()
    }

    #[test]
    fn with_creatures_preserves_order() {
        let roster = Roster::with_creatures(vec![ranger("a"), ranger("b")]);
        let names: Vec<_> = roster
            .snapshot()
            .iter()
            .map(|e| e.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn snapshot_is_detached_from_later_writes() {
        let roster = Roster::new();
        let id = roster.insert(ranger("a"));

        let snapshot = roster.snapshot();
        roster.mutate(|arena| arena.bury(id));

        assert_eq!(snapshot.len(), 1);
        assert!(roster.is_empty());
        assert!(!roster.contains(id));
    }

    #[test]
    fn mutate_returns_closure_value() {
        let roster = Roster::new();
        let id = roster.insert(ranger("a"));
        let buried = roster.mutate(|arena| arena.bury(id));
        assert!(buried);
        assert_eq!(roster.fallen_count(), 1);
        assert_eq!(roster.fallen()[0].name(), "a");
    }

    #[test]
    fn census_reflects_live_set() {
        let roster = Roster::with_creatures(vec![
            ranger("a"),
            Creature::new("b", Kind::Marauder, 1, 1).unwrap(),
        ]);
        let census = roster.census();
        assert_eq!(census.rangers, 1);
        assert_eq!(census.marauders, 1);
        assert_eq!(census.total(), roster.len());
    }

    #[test]
    fn survives_poisoned_lock() {
        let roster = Arc::new(Roster::with_creatures(vec![ranger("a")]));

        let poisoner = Arc::clone(&roster);
        let result = thread::spawn(move || {
            poisoner.mutate(|_| panic!("worker died while holding the lock"));
        })
        .join();
        assert!(result.is_err());

        assert_eq!(roster.len(), 1);
        roster.insert(ranger("b"));
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn concurrent_readers_and_writer() {
        let roster = Arc::new(Roster::new());
        let writer = {
            let roster = Arc::clone(&roster);
            thread::spawn(move || {
                for i in 0..200 {
                    let id = roster.insert(ranger(&format!("c{i}")));
                    if i % 2 == 0 {
                        roster.mutate(|arena| arena.bury(id));
                    }
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let roster = Arc::clone(&roster);
                thread::spawn(move || {
                    for _ in 0..200 {
                        roster.read_locked(|arena| {
                            assert_eq!(arena.iter().count(), arena.len());
                            for entity in arena.iter() {
                                assert!(arena.contains(entity.id()));
                            }
                        });
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }

        assert_eq!(roster.len(), 100);
        assert_eq!(roster.fallen_count(), 100);
    }
}
