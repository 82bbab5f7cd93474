//! Combat resolver: turns a fight candidate into roster changes.
//!
//! The `CombatResolver` handles one [`Candidate`] at a time:
//! - Re-validates that both creatures are still alive
//! - Asks [`judge`] for a verdict
//! - Reinforces the survivor and moves the dead to the graveyard
//!
//! # Locking
//!
//! Re-validation and mutation happen inside a single
//! [`Roster::mutate`] call, so two resolver threads can never both act on
//! the same creature. Sinks are called after the lock is released.

use tracing::{debug, trace};

use crate::arena::Arena;
use crate::entity::EntityId;
use crate::queue::Candidate;
use crate::roster::Roster;

use super::event::{CombatEvent, EventSink};
use super::rules::{judge, Combatant, Verdict};

/// Default attack and defense gained by the survivor of a kill.
pub const DEFAULT_WIN_BONUS: i32 = 5;

/// A creature as it was when the fight was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fighter {
    /// Id of the creature. No longer live if the creature died.
    pub id: EntityId,
    /// Name of the creature.
    pub name: String,
}

impl Fighter {
    fn new(id: EntityId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

/// What resolving one candidate did to the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// At least one creature was already gone. Nothing changed.
    Stale,
    /// `winner` was reinforced and `loser` buried.
    Kill {
        /// The survivor.
        winner: Fighter,
        /// The creature moved to the graveyard.
        loser: Fighter,
    },
    /// Both creatures were buried.
    MutualKill {
        /// First creature of the candidate.
        first: Fighter,
        /// Second creature of the candidate.
        second: Fighter,
    },
    /// Nobody died. Nothing changed.
    Standoff {
        /// First creature of the candidate.
        first: Fighter,
        /// Second creature of the candidate.
        second: Fighter,
    },
}

impl Resolution {
    /// Number of creatures that died.
    #[must_use]
    pub const fn deaths(&self) -> usize {
        match self {
            Self::Stale | Self::Standoff { .. } => 0,
            Self::Kill { .. } => 1,
            Self::MutualKill { .. } => 2,
        }
    }

    /// The death event to report, if anyone died.
    #[must_use]
    pub fn event(&self) -> Option<CombatEvent> {
        match self {
            Self::Kill { winner, loser } => Some(CombatEvent::kill(&winner.name, &loser.name)),
            Self::MutualKill { first, second } => {
                Some(CombatEvent::mutual_death(&first.name, &second.name))
            }
            Self::Stale | Self::Standoff { .. } => None,
        }
    }

    /// Forwards this resolution to `sink`. Stale and standoff results are
    /// not reported.
    pub fn notify(&self, sink: &dyn EventSink) {
        if let Some(event) = self.event() {
            sink.record(&event);
        }
    }
}

/// Resolver for fight candidates.
///
/// # Example
///
/// ```
/// use skirmish_core::entity::{Creature, Kind};
/// use skirmish_core::queue::Candidate;
/// use skirmish_core::resolver::{CombatResolver, EventLog, Resolution};
/// use skirmish_core::roster::Roster;
///
/// let roster = Roster::new();
/// let r1 = roster.insert(Creature::new("R1", Kind::Ranger, 5, 5).unwrap());
/// let m1 = roster.insert(Creature::new("M1", Kind::Marauder, 5, 6).unwrap());
///
/// let log = EventLog::new();
/// let resolution = CombatResolver::new().resolve(Candidate::new(r1, m1), &roster, &log);
///
/// assert!(matches!(resolution, Resolution::Kill { .. }));
/// assert_eq!(log.event_count(), 1);
/// assert_eq!(roster.len(), 1);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CombatResolver {
    win_bonus: i32,
}

impl Default for CombatResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatResolver {
    /// Creates a resolver with the default win bonus.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_win_bonus(DEFAULT_WIN_BONUS)
    }

    /// Creates a resolver that adds `win_bonus` to a survivor's attack and
    /// defense.
    #[must_use]
    pub const fn with_win_bonus(win_bonus: i32) -> Self {
        Self { win_bonus }
    }

    /// Attack and defense gained by the survivor of a kill.
    #[must_use]
    pub const fn win_bonus(&self) -> i32 {
        self.win_bonus
    }

    /// Resolves one candidate against `roster` and reports deaths to `sink`.
    pub fn resolve(&self, candidate: Candidate, roster: &Roster, sink: &dyn EventSink) -> Resolution {
        let resolution = roster.mutate(|arena| self.apply(candidate, arena));

        match &resolution {
            Resolution::Stale => {
                trace!(first = %candidate.first, second = %candidate.second, "stale candidate dropped");
            }
            Resolution::Standoff { first, second } => {
                debug!(first = %first.name, second = %second.name, "standoff");
            }
            Resolution::Kill { winner, loser } => {
                debug!(winner = %winner.name, loser = %loser.name, "kill");
            }
            Resolution::MutualKill { first, second } => {
                debug!(first = %first.name, second = %second.name, "mutual kill");
            }
        }

        resolution.notify(sink);
        resolution
    }

    /// Judges and applies a candidate with the arena already locked.
    ///
    /// Callers holding the roster's write lock use this directly; it never
    /// calls a sink.
    pub fn apply(&self, candidate: Candidate, arena: &mut Arena) -> Resolution {
        if candidate.first == candidate.second {
            return Resolution::Stale;
        }
        let (Some(first), Some(second)) = (arena.get(candidate.first), arena.get(candidate.second))
        else {
            return Resolution::Stale;
        };

        let verdict = judge(Combatant::of(first), Combatant::of(second));
        let first = Fighter::new(candidate.first, first.name());
        let second = Fighter::new(candidate.second, second.name());

        match verdict {
            Verdict::FirstWins => self.finish_kill(arena, first, second),
            Verdict::SecondWins => self.finish_kill(arena, second, first),
            Verdict::MutualKill => {
                arena.bury_pair(first.id, second.id);
                Resolution::MutualKill { first, second }
            }
            Verdict::Standoff => Resolution::Standoff { first, second },
        }
    }

    fn finish_kill(&self, arena: &mut Arena, winner: Fighter, loser: Fighter) -> Resolution {
        if let Some(entity) = arena.get_mut(winner.id) {
            entity.creature_mut().reinforce(self.win_bonus);
        }
        arena.bury(loser.id);
        Resolution::Kill { winner, loser }
    }
}
