//! Test helper functions for building rosters and reading them back.

use crate::entity::{CombatStats, Creature, EntityId, Kind};
use crate::roster::Roster;

/// Creature at `(x, y)` with explicit stats.
pub fn fighter(name: &str, kind: Kind, x: i32, y: i32, attack: i32, defense: i32) -> Creature {
    Creature::with_stats(name, kind, x, y, CombatStats::new(attack, defense))
        .expect("test coordinates must be on the map")
}

/// Inserts each creature and returns the ids in the same order.
pub fn admit(roster: &Roster, creatures: impl IntoIterator<Item = Creature>) -> Vec<EntityId> {
    creatures.into_iter().map(|c| roster.insert(c)).collect()
}

/// Stats of a live creature, or `None` if it is dead.
pub fn stats_of(roster: &Roster, id: EntityId) -> Option<CombatStats> {
    roster.read_locked(|arena| arena.get(id).map(|e| e.stats()))
}

/// Names of live creatures in roster order.
pub fn survivor_names(roster: &Roster) -> Vec<String> {
    roster.survivors().iter().map(|e| e.name().to_string()).collect()
}

/// Names of dead creatures in order of death.
pub fn fallen_names(roster: &Roster) -> Vec<String> {
    roster.fallen().iter().map(|e| e.name().to_string()).collect()
}

/// A crowd of `count` creatures packed into a `side` by `side` corner,
/// cycling through every kind.
pub fn crowd(count: usize, side: i32) -> Vec<Creature> {
    (0..count)
        .map(|i| {
            let n = i32::try_from(i).expect("crowd size fits i32");
            let kind = Kind::ALL[i % Kind::ALL.len()];
            fighter(
                &format!("C{i}"),
                kind,
                1 + n % side,
                1 + (n / side) % side,
                10 + n % 7,
                10 + n % 5,
            )
        })
        .collect()
}
