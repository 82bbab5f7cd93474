//! Creature construction with randomized stats.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::entity::{CombatStats, Creature, Kind, MAP_LIMIT};
use crate::error::PositionError;

/// Attack drawn for a freshly created creature.
pub const ATTACK_RANGE: RangeInclusive<i32> = 15..=35;
/// Defense drawn for a freshly created creature.
pub const DEFENSE_RANGE: RangeInclusive<i32> = 10..=30;

/// Creates a creature of `kind` with randomized stats.
///
/// # Errors
///
/// Returns [`PositionError`] if `(x, y)` is outside `(0, MAP_LIMIT]`.
pub fn create<R: Rng + ?Sized>(
    kind: Kind,
    name: impl Into<String>,
    x: i32,
    y: i32,
    rng: &mut R,
) -> Result<Creature, PositionError> {
    let stats = CombatStats::new(rng.gen_range(ATTACK_RANGE), rng.gen_range(DEFENSE_RANGE));
    Creature::with_stats(name, kind, x, y, stats)
}

/// Creates a creature with explicit stats.
///
/// # Errors
///
/// Returns [`PositionError`] if `(x, y)` is outside `(0, MAP_LIMIT]`.
pub fn create_with(
    kind: Kind,
    name: impl Into<String>,
    x: i32,
    y: i32,
    attack: i32,
    defense: i32,
) -> Result<Creature, PositionError> {
    Creature::with_stats(name, kind, x, y, CombatStats::new(attack, defense))
}

/// Creates a creature of a uniformly chosen kind with randomized stats.
///
/// # Errors
///
/// Returns [`PositionError`] if `(x, y)` is outside `(0, MAP_LIMIT]`.
pub fn create_random<R: Rng + ?Sized>(
    name: impl Into<String>,
    x: i32,
    y: i32,
    rng: &mut R,
) -> Result<Creature, PositionError> {
    let kind = Kind::ALL[rng.gen_range(0..Kind::ALL.len())];
    create(kind, name, x, y, rng)
}

/// Builds `count` random creatures named `NPC_1` to `NPC_<count>`, placed
/// uniformly in `1..=map_size` on both axes.
///
/// # Errors
///
/// Returns [`PositionError`] if `map_size` exceeds [`MAP_LIMIT`] or is not
/// positive.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use skirmish_core::factory::populate;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let creatures = populate(3, 100, &mut rng).unwrap();
/// let names: Vec<_> = creatures.iter().map(|c| c.name()).collect();
/// assert_eq!(names, ["NPC_1", "NPC_2", "NPC_3"]);
/// ```
pub fn populate<R: Rng + ?Sized>(
    count: usize,
    map_size: i32,
    rng: &mut R,
) -> Result<Vec<Creature>, PositionError> {
    if !(1..=MAP_LIMIT).contains(&map_size) {
        return Err(PositionError::OutOfBounds {
            x: map_size,
            y: map_size,
            limit: MAP_LIMIT,
        });
    }
    (1..=count)
        .map(|n| {
            let x = rng.gen_range(1..=map_size);
            let y = rng.gen_range(1..=map_size);
            create_random(format!("NPC_{n}"), x, y, rng)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn create_draws_stats_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        for _ in 0..100 {
            let c = create(Kind::Predator, "p", 1, 1, &mut rng).unwrap();
            assert!(ATTACK_RANGE.contains(&c.stats().attack));
            assert!(DEFENSE_RANGE.contains(&c.stats().defense));
        }
    }

    #[test]
    fn create_with_uses_given_stats() {
        let c = create_with(Kind::Ranger, "R1", 5, 5, 7, 9).unwrap();
        assert_eq!(c.stats(), CombatStats::new(7, 9));
        assert_eq!(c.kind(), Kind::Ranger);
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        assert!(create(Kind::Ranger, "x", 0, 5, &mut rng).is_err());
        assert!(create_with(Kind::Ranger, "x", 5, 501, 1, 1).is_err());
        assert!(create_random("x", -3, 5, &mut rng).is_err());
    }

    #[test]
    fn create_random_covers_every_kind() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let kinds: std::collections::HashSet<_> = (0..200)
            .map(|_| create_random("x", 1, 1, &mut rng).unwrap().kind())
            .collect();
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn populate_places_within_map() {
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let creatures = populate(50, 20, &mut rng).unwrap();
        assert_eq!(creatures.len(), 50);
        assert_eq!(creatures[49].name(), "NPC_50");
        for c in &creatures {
            assert!((1..=20).contains(&c.position().x()));
            assert!((1..=20).contains(&c.position().y()));
        }
    }

    #[test]
    fn populate_rejects_oversized_map() {
        let mut rng = ChaCha8Rng::seed_from_u64(14);
        assert!(populate(1, 501, &mut rng).is_err());
        assert!(populate(1, 0, &mut rng).is_err());
        assert!(populate(0, 501, &mut rng).unwrap_or_default().is_empty());
    }

    #[test]
    fn same_seed_same_population() {
        let a = populate(10, 100, &mut ChaCha8Rng::seed_from_u64(15)).unwrap();
        let b = populate(10, 100, &mut ChaCha8Rng::seed_from_u64(15)).unwrap();
        assert_eq!(a, b);
    }
}
