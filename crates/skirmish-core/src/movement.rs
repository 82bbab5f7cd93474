//! Random-walk movement.
//!
//! Each pass snapshots the live set, draws a step for every creature and
//! applies accepted steps one at a time under the write lock. A creature
//! killed between the snapshot and its turn is skipped. A step that would
//! leave the map is dropped, never clamped.

use rand::Rng;
use tracing::trace;

use crate::config::SimulationConfig;
use crate::entity::Kind;
use crate::roster::Roster;

/// How far and how often each kind moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementPolicy {
    /// Step length of a ranger. Rangers move every pass.
    pub ranger_step: i32,
    /// Step length of predators and marauders.
    pub roamer_step: i32,
    /// Probability that a predator or marauder moves in a pass.
    pub roam_chance: f64,
    /// Coordinates stay in `1..=bound`.
    pub bound: i32,
}

impl Default for MovementPolicy {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl MovementPolicy {
    /// Extracts the movement tunables from `config`.
    #[must_use]
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            ranger_step: config.ranger_step,
            roamer_step: config.roamer_step,
            roam_chance: config.roam_chance,
            bound: config.map_size,
        }
    }

    /// Draws this pass's offset for a creature of `kind`, or `None` if it
    /// stays put.
    ///
    /// Each axis direction is drawn independently from `{-1, 0, 1}`.
    pub fn choose_step<R: Rng + ?Sized>(&self, kind: Kind, rng: &mut R) -> Option<(i32, i32)> {
        let step = match kind {
            Kind::Ranger => self.ranger_step,
            Kind::Predator | Kind::Marauder => {
                if !rng.gen_bool(self.roam_chance.clamp(0.0, 1.0)) {
                    return None;
                }
                self.roamer_step
            }
        };
        let dx = rng.gen_range(-1..=1) * step;
        let dy = rng.gen_range(-1..=1) * step;
        Some((dx, dy))
    }
}

/// Outcome counters of one movement pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveReport {
    /// Steps applied.
    pub moved: usize,
    /// Steps dropped because they would leave the map.
    pub blocked: usize,
    /// Creatures that died after the snapshot was taken.
    pub vanished: usize,
}

/// Runs one movement pass over `roster`.
pub fn movement_tick<R: Rng + ?Sized>(roster: &Roster, policy: &MovementPolicy, rng: &mut R) -> MoveReport {
    let mut report = MoveReport::default();

    for entity in roster.snapshot() {
        let Some((dx, dy)) = policy.choose_step(entity.kind(), rng) else {
            continue;
        };

        let applied = roster.mutate(|arena| {
            arena
                .get_mut(entity.id())
                .map(|live| live.creature_mut().move_by(dx, dy, policy.bound))
        });

        match applied {
            Some(Ok(())) => report.moved += 1,
            Some(Err(err)) => {
                trace!(creature = %entity.name(), %err, "move dropped");
                report.blocked += 1;
            }
            None => report.vanished += 1,
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Creature;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn policy() -> MovementPolicy {
        MovementPolicy::default()
    }

    mod choose_step_tests {
        use super::*;

        #[test]
        fn ranger_always_moves_full_step() {
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            for _ in 0..200 {
                let (dx, dy) = policy().choose_step(Kind::Ranger, &mut rng).unwrap();
                assert!([-10, 0, 10].contains(&dx));
                assert!([-10, 0, 10].contains(&dy));
            }
        }

        #[test]
        fn roamers_never_move_at_zero_chance() {
            let still = MovementPolicy {
                roam_chance: 0.0,
                ..policy()
            };
            let mut rng = ChaCha8Rng::seed_from_u64(2);
            for _ in 0..200 {
                assert_eq!(still.choose_step(Kind::Predator, &mut rng), None);
                assert_eq!(still.choose_step(Kind::Marauder, &mut rng), None);
            }
        }

        #[test]
        fn roamers_use_roamer_step() {
            let eager = MovementPolicy {
                roam_chance: 1.0,
                ..policy()
            };
            let mut rng = ChaCha8Rng::seed_from_u64(3);
            for _ in 0..200 {
                let (dx, dy) = eager.choose_step(Kind::Marauder, &mut rng).unwrap();
                assert!([-5, 0, 5].contains(&dx));
                assert!([-5, 0, 5].contains(&dy));
            }
        }

        #[test]
        fn same_seed_same_steps() {
            let mut a = ChaCha8Rng::seed_from_u64(99);
            let mut b = ChaCha8Rng::seed_from_u64(99);
            for kind in Kind::ALL.iter().cycle().take(60) {
                assert_eq!(policy().choose_step(*kind, &mut a), policy().choose_step(*kind, &mut b));
            }
        }
    }

    mod movement_tick_tests {
        use super::*;

        #[test]
        fn rangers_at_corner_stay_on_map() {
            let roster = Roster::with_creatures(vec![Creature::new("r", Kind::Ranger, 1, 1).unwrap()]);
            let mut rng = ChaCha8Rng::seed_from_u64(4);
            for _ in 0..100 {
                movement_tick(&roster, &policy(), &mut rng);
                let pos = roster.snapshot()[0].position();
                assert!((1..=100).contains(&pos.x()));
                assert!((1..=100).contains(&pos.y()));
            }
        }

        #[test]
        fn counts_every_ranger_attempt() {
            let roster = Roster::with_creatures(vec![
                Creature::new("a", Kind::Ranger, 50, 50).unwrap(),
                Creature::new("b", Kind::Ranger, 50, 50).unwrap(),
            ]);
            let mut rng = ChaCha8Rng::seed_from_u64(5);
            let report = movement_tick(&roster, &policy(), &mut rng);
            assert_eq!(report.moved + report.blocked, 2);
            assert_eq!(report.vanished, 0);
        }

        #[test]
        fn stationary_policy_changes_nothing() {
            let frozen = MovementPolicy {
                ranger_step: 0,
                roam_chance: 0.0,
                ..policy()
            };
            let roster = Roster::with_creatures(vec![
                Creature::new("r", Kind::Ranger, 7, 7).unwrap(),
                Creature::new("p", Kind::Predator, 8, 8).unwrap(),
            ]);
            let before = roster.snapshot();
            movement_tick(&roster, &frozen, &mut ChaCha8Rng::seed_from_u64(6));
            assert_eq!(roster.snapshot(), before);
        }
    }

    proptest! {
        #[test]
        fn prop_moves_stay_within_bound(seed in any::<u64>(), x in 1i32..=100, y in 1i32..=100) {
            let roster = Roster::with_creatures(vec![
                Creature::new("r", Kind::Ranger, x, y).unwrap(),
                Creature::new("m", Kind::Marauder, x, y).unwrap(),
            ]);
            let eager = MovementPolicy { roam_chance: 1.0, ..policy() };
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..10 {
                movement_tick(&roster, &eager, &mut rng);
            }
            for entity in roster.snapshot() {
                prop_assert!((1..=100).contains(&entity.position().x()));
                prop_assert!((1..=100).contains(&entity.position().y()));
            }
        }
    }
}
