//! Arena module: storage behind the roster lock.
//!
//! The Arena owns every creature of a run, alive or dead. It provides:
//! - Generation-checked slots so stale ids are detected in O(1)
//! - An insertion-ordered live list used for iteration and rendering
//! - The graveyard, where removed creatures end up exactly once
//!
//! # Architecture
//!
//! Live creatures sit in slots indexed by [`EntityId::index`]. Each slot
//! carries a generation that is bumped whenever its occupant dies, so any id
//! issued before the death stops resolving. Slots are recycled through a
//! free list.
//!
//! Iteration order is kept separately in `order`. Removing two creatures at
//! once from `order` locates both positions first and erases the higher one
//! first, so the lower position is still valid for the second erase.
//!
//! The Arena does no locking of its own. [`Roster`](crate::roster::Roster)
//! wraps it in a readers-writer lock and is the only way the workers reach it.
//!
//! # Example
//!
//! ```
//! use skirmish_core::arena::Arena;
//! use skirmish_core::entity::{Creature, Kind};
//!
//! let mut arena = Arena::new();
//! let a = arena.spawn(Creature::new("A", Kind::Ranger, 1, 1).unwrap());
//! let b = arena.spawn(Creature::new("B", Kind::Predator, 2, 2).unwrap());
//!
//! assert!(arena.bury(a));
//! assert!(!arena.contains(a));
//! assert_eq!(arena.graveyard()[0].name(), "A");
//!
//! // A recycled slot hands out a new generation.
//! let c = arena.spawn(Creature::new("C", Kind::Marauder, 3, 3).unwrap());
//! assert_eq!(c.index(), a.index());
//! assert_ne!(c, a);
//! assert!(arena.contains(b));
//! ```

use serde::{Deserialize, Serialize};

use crate::entity::{Creature, Entity, EntityId, Kind};

// =============================================================================
// Census
// =============================================================================

/// Head count of live creatures per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    /// Live predators.
    pub predators: usize,
    /// Live rangers.
    pub rangers: usize,
    /// Live marauders.
    pub marauders: usize,
}

impl Census {
    /// Adds one creature of `kind`.
    pub fn count(&mut self, kind: Kind) {
        match kind {
            Kind::Predator => self.predators += 1,
            Kind::Ranger => self.rangers += 1,
            Kind::Marauder => self.marauders += 1,
        }
    }

    /// Live creatures of `kind`.
    #[must_use]
    pub const fn count_of(&self, kind: Kind) -> usize {
        match kind {
            Kind::Predator => self.predators,
            Kind::Ranger => self.rangers,
            Kind::Marauder => self.marauders,
        }
    }

    /// Total live creatures.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.predators + self.rangers + self.marauders
    }
}

// =============================================================================
// Arena
// =============================================================================

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    entity: Option<Entity>,
}

/// Storage for all creatures of a run.
///
/// # Invariants
///
/// - A live id resolves to exactly one slot whose generation matches
/// - `order` lists every live id exactly once
/// - A creature is in the live set or in the graveyard, never both
#[derive(Debug, Clone, Default)]
pub struct Arena {
    /// Slot storage, indexed by `EntityId::index`.
    slots: Vec<Slot>,
    /// Indices of empty slots available for reuse.
    free: Vec<u32>,
    /// Live ids in insertion order.
    order: Vec<EntityId>,
    /// Dead creatures in order of death.
    graveyard: Vec<Entity>,
}

impl Arena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Admits a creature and returns its id.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` slots are allocated.
    pub fn spawn(&mut self, creature: Creature) -> EntityId {
        let index = match self.free.pop() {
            Some(index) => index,
            None => {
                let index = u32::try_from(self.slots.len()).expect("arena slot count exceeds u32");
                self.slots.push(Slot::default());
                index
            }
        };

        let slot = &mut self.slots[index as usize];
        let id = EntityId::new(index, slot.generation);
        slot.entity = Some(Entity::new(id, creature));
        self.order.push(id);
        id
    }

    /// Returns `true` if `id` refers to a live creature.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the live entity for `id`, if any.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entity.as_ref()
    }

    /// Returns the live entity for `id` mutably, if any.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entity.as_mut()
    }

    /// Number of live creatures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` when no creature is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.order.iter().copied()
    }

    /// Live entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.order.iter().filter_map(|id| self.get(*id))
    }

    /// Moves one live creature to the graveyard.
    ///
    /// Returns `false` if `id` is not live; nothing changes in that case.
    pub fn bury(&mut self, id: EntityId) -> bool {
        let Some(pos) = self.order.iter().position(|live| *live == id) else {
            return false;
        };
        self.order.remove(pos);
        self.release(id);
        true
    }

    /// Moves two live creatures to the graveyard in one step.
    ///
    /// Both positions in the live list are found before anything is erased,
    /// then the higher position goes first. The graveyard receives `first`
    /// then `second`. Returns `false`, changing nothing, unless both ids are
    /// live and distinct.
    pub fn bury_pair(&mut self, first: EntityId, second: EntityId) -> bool {
        if first == second {
            return false;
        }
        let pos_first = self.order.iter().position(|live| *live == first);
        let pos_second = self.order.iter().position(|live| *live == second);
        let (Some(pos_first), Some(pos_second)) = (pos_first, pos_second) else {
            return false;
        };

        let (high, low) = if pos_first > pos_second {
            (pos_first, pos_second)
        } else {
            (pos_second, pos_first)
        };
        self.order.remove(high);
        self.order.remove(low);

        self.release(first);
        self.release(second);
        true
    }

    /// Dead creatures in order of death.
    #[must_use]
    pub fn graveyard(&self) -> &[Entity] {
        &self.graveyard
    }

    /// Per-kind head count of live creatures.
    #[must_use]
    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for entity in self.iter() {
            census.count(entity.kind());
        }
        census
    }

    /// Empties the slot for `id`, bumps its generation and records the death.
    fn release(&mut self, id: EntityId) {
        let Some(slot) = self.slots.get_mut(id.index() as usize) else {
            return;
        };
        if slot.generation != id.generation() {
            return;
        }
        if let Some(entity) = slot.entity.take() {
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index());
            self.graveyard.push(entity);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
