//! Proximity scan over the live set.
//!
//! Every live pair is tested once with an inclusive Euclidean distance check
//! on integer coordinates. Pairs come out in insertion order, `first` always
//! ahead of `second`. The scan is quadratic, which is fine at tens of
//! creatures.

use tracing::trace;

use crate::arena::Arena;
use crate::entity::{EntityId, Position};
use crate::queue::{Candidate, FightQueue};
use crate::roster::Roster;

/// Default engagement distance in map cells.
pub const DEFAULT_ENGAGEMENT_DISTANCE: f64 = 1.0;

/// All pairs of live creatures at most `distance` apart.
///
/// # Example
///
/// ```
/// use skirmish_core::arena::Arena;
/// use skirmish_core::entity::{Creature, Kind};
/// use skirmish_core::scanner::find_candidates;
///
/// let mut arena = Arena::new();
/// let a = arena.spawn(Creature::new("a", Kind::Ranger, 5, 5).unwrap());
/// let b = arena.spawn(Creature::new("b", Kind::Marauder, 5, 6).unwrap());
/// arena.spawn(Creature::new("c", Kind::Predator, 50, 50).unwrap());
///
/// let pairs = find_candidates(&arena, 1.0);
/// assert_eq!(pairs.len(), 1);
/// assert_eq!((pairs[0].first, pairs[0].second), (a, b));
/// ```
#[must_use]
pub fn find_candidates(arena: &Arena, distance: f64) -> Vec<Candidate> {
    let live: Vec<(EntityId, Position)> = arena.iter().map(|e| (e.id(), e.position())).collect();

    let mut candidates = Vec::new();
    for (i, &(first, first_pos)) in live.iter().enumerate() {
        for &(second, second_pos) in &live[i + 1..] {
            if first_pos.is_within(second_pos, distance) {
                candidates.push(Candidate::new(first, second));
            }
        }
    }
    candidates
}

/// Scans `roster` under the shared lock.
#[must_use]
pub fn scan(roster: &Roster, distance: f64) -> Vec<Candidate> {
    roster.read_locked(|arena| find_candidates(arena, distance))
}

/// Scans `roster` and hands every candidate to `queue`.
///
/// Returns the number of candidates queued. The roster lock is released
/// before the queue lock is taken.
pub fn scan_into(roster: &Roster, queue: &FightQueue, distance: f64) -> usize {
    let candidates = scan(roster, distance);
    if candidates.is_empty() {
        return 0;
    }
    let queued = queue.push_batch(candidates);
    trace!(queued, "candidates queued");
    queued
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Creature, Kind};

    fn arena_at(points: &[(i32, i32)]) -> (Arena, Vec<EntityId>) {
        let mut arena = Arena::new();
        let ids = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| arena.spawn(Creature::new(format!("c{i}"), Kind::Predator, x, y).unwrap()))
            .collect();
        (arena, ids)
    }

    #[test]
    fn empty_and_single_yield_nothing() {
        assert!(find_candidates(&Arena::new(), 1.0).is_empty());
        let (arena, _) = arena_at(&[(3, 3)]);
        assert!(find_candidates(&arena, 1.0).is_empty());
    }

    #[test]
    fn distance_is_inclusive() {
        let (arena, ids) = arena_at(&[(5, 5), (5, 6)]);
        assert_eq!(find_candidates(&arena, 1.0), vec![Candidate::new(ids[0], ids[1])]);
    }

    #[test]
    fn diagonal_neighbours_are_out_of_unit_range() {
        let (arena, _) = arena_at(&[(5, 5), (6, 6)]);
        assert!(find_candidates(&arena, 1.0).is_empty());
        assert_eq!(find_candidates(&arena, 1.5).len(), 1);
    }

    #[test]
    fn shared_cell_is_a_candidate() {
        let (arena, _) = arena_at(&[(1, 1), (1, 1)]);
        assert_eq!(find_candidates(&arena, 1.0).len(), 1);
    }

    #[test]
    fn every_close_pair_once_in_insertion_order() {
        let (arena, ids) = arena_at(&[(1, 1), (1, 2), (2, 2), (90, 90)]);
        let pairs = find_candidates(&arena, 1.0);
        assert_eq!(
            pairs,
            vec![Candidate::new(ids[0], ids[1]), Candidate::new(ids[1], ids[2])]
        );
    }

    #[test]
    fn dead_creatures_are_not_scanned() {
        let (mut arena, ids) = arena_at(&[(1, 1), (1, 2)]);
        arena.bury(ids[1]);
        assert!(find_candidates(&arena, 1.0).is_empty());
    }

    #[test]
    fn scan_into_queues_without_dedup() {
        let roster = Roster::with_creatures(vec![
            Creature::new("a", Kind::Ranger, 1, 1).unwrap(),
            Creature::new("b", Kind::Ranger, 1, 1).unwrap(),
        ]);
        let queue = FightQueue::new();

        assert_eq!(scan_into(&roster, &queue, 1.0), 1);
        assert_eq!(scan_into(&roster, &queue, 1.0), 1);
        assert_eq!(queue.len(), 2);
    }
}
