//! Matchup table and power fallback.
//!
//! [`judge`] is a pure function of the two combatants' kinds and stats.
//! It never touches the roster; [`CombatResolver`](super::CombatResolver)
//! applies the verdict.
//!
//! # Evaluation Order
//!
//! 1. The ordered kind pair is looked up in the matchup table
//!    ([`matchup`]). A hit decides the fight regardless of stats.
//! 2. Otherwise both sides compare attack against the other's defense:
//!    both succeed → mutual kill, one succeeds → that side wins,
//!    neither → standoff.

use serde::{Deserialize, Serialize};

use crate::entity::{CombatStats, Entity, Kind};

/// What the rule engine sees of one side of a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Combatant {
    /// Creature kind.
    pub kind: Kind,
    /// Attack and defense at the time of the fight.
    pub stats: CombatStats,
}

impl Combatant {
    /// Creates a combatant from raw values.
    #[must_use]
    pub const fn new(kind: Kind, attack: i32, defense: i32) -> Self {
        Self {
            kind,
            stats: CombatStats::new(attack, defense),
        }
    }

    /// Reads kind and stats off a live entity.
    #[must_use]
    pub const fn of(entity: &Entity) -> Self {
        Self {
            kind: entity.kind(),
            stats: entity.stats(),
        }
    }
}

/// Outcome of one fight, relative to the ordered pair `(first, second)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// `first` survives, `second` dies.
    FirstWins,
    /// `second` survives, `first` dies.
    SecondWins,
    /// Both die.
    MutualKill,
    /// Nobody dies.
    Standoff,
}

impl Verdict {
    /// Number of creatures this verdict kills.
    #[must_use]
    pub const fn deaths(self) -> usize {
        match self {
            Self::FirstWins | Self::SecondWins => 1,
            Self::MutualKill => 2,
            Self::Standoff => 0,
        }
    }
}

/// Kind-pair overrides, evaluated before any stat comparison.
///
/// Returns `None` when the pair is not covered and the power fallback
/// applies.
#[must_use]
pub const fn matchup(first: Kind, second: Kind) -> Option<Verdict> {
    match (first, second) {
        (Kind::Ranger, Kind::Marauder) | (Kind::Predator, Kind::Ranger) => {
            Some(Verdict::FirstWins)
        }
        (Kind::Marauder, Kind::Ranger) | (Kind::Ranger, Kind::Predator) => {
            Some(Verdict::SecondWins)
        }
        (Kind::Marauder, Kind::Marauder) => Some(Verdict::Standoff),
        _ => None,
    }
}

/// Symmetric power comparison used when no override applies.
#[must_use]
pub const fn power_contest(first: CombatStats, second: CombatStats) -> Verdict {
    let first_breaks = first.attack > second.defense;
    let second_breaks = second.attack > first.defense;
    match (first_breaks, second_breaks) {
        (true, true) => Verdict::MutualKill,
        (true, false) => Verdict::FirstWins,
        (false, true) => Verdict::SecondWins,
        (false, false) => Verdict::Standoff,
    }
}

/// Decides a fight between `first` and `second`.
///
/// # Example
///
/// ```
/// use skirmish_core::entity::Kind;
/// use skirmish_core::resolver::{judge, Combatant, Verdict};
///
/// // Overrides ignore stats entirely.
/// let ranger = Combatant::new(Kind::Ranger, 1, 1);
/// let marauder = Combatant::new(Kind::Marauder, 99, 99);
/// assert_eq!(judge(ranger, marauder), Verdict::FirstWins);
///
/// // Otherwise attack is compared against defense both ways.
/// let a = Combatant::new(Kind::Predator, 30, 10);
/// let b = Combatant::new(Kind::Predator, 20, 25);
/// assert_eq!(judge(a, b), Verdict::MutualKill);
/// ```
#[must_use]
pub const fn judge(first: Combatant, second: Combatant) -> Verdict {
    match matchup(first.kind, second.kind) {
        Some(verdict) => verdict,
        None => power_contest(first.stats, second.stats),
    }
}
