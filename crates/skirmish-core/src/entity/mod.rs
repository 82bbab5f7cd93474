//! Entity module for the combat simulation.
//!
//! This module provides the core creature types:
//! - [`EntityId`]: Generation-checked handle assigned by the roster
//! - [`Kind`]: Closed set of creature kinds driving matchups and movement
//! - [`Creature`]: Name, kind, position and combat stats
//! - [`Entity`]: A creature together with the id the roster gave it
//!
//! # Example
//!
//! ```
//! use skirmish_core::entity::{Creature, Kind};
//!
//! let ranger = Creature::new("R1", Kind::Ranger, 5, 5).unwrap();
//! assert_eq!(ranger.kind(), Kind::Ranger);
//! assert_eq!(ranger.stats().attack, 25);
//! assert_eq!(ranger.to_row(), "ranger R1 5 5 25 20");
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{KindParseError, PositionError};

pub use components::{CombatStats, Position, MAP_LIMIT};

/// Generation-checked handle to a roster slot.
///
/// The roster reuses slots after a creature dies, bumping the slot's
/// generation each time. An id whose generation no longer matches its slot
/// refers to a dead creature, so re-validating a fight candidate is a single
/// comparison rather than a search.
///
/// # Ordering
///
/// Ids order by `(index, generation)`. This is only used for stable output,
/// never for simulation semantics.
///
/// # Example
///
/// ```
/// use skirmish_core::entity::EntityId;
///
/// let id = EntityId::new(3, 1);
/// assert_eq!(id.index(), 3);
/// assert_eq!(id.generation(), 1);
/// assert_eq!(id.to_string(), "3v1");
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    /// Creates an id from a slot index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index inside the roster arena.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this id was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Creature kind.
///
/// `Kind` is fixed at construction. It selects the matchup overrides used by
/// the rule engine and the movement bias used by the mover.
///
/// # Variants
///
/// - `Predator`: heavy, slow. Beats a Ranger outright.
/// - `Ranger`: light, always on the move. Beats a Marauder outright.
/// - `Marauder`: never kills another Marauder.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Heavy hunter. Legacy row name: `bear`.
    Predator,
    /// Fast scout. Legacy row name: `elf`.
    Ranger,
    /// Opportunist. Legacy row name: `robber`.
    Marauder,
}

impl Kind {
    /// Every kind, in a fixed order.
    pub const ALL: [Kind; 3] = [Kind::Predator, Kind::Ranger, Kind::Marauder];

    /// Lowercase name used in text rows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Predator => "predator",
            Self::Ranger => "ranger",
            Self::Marauder => "marauder",
        }
    }

    /// Single-character symbol used on the console map.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Predator => 'P',
            Self::Ranger => 'R',
            Self::Marauder => 'M',
        }
    }

    /// Stats given to a creature of this kind when none are supplied.
    #[must_use]
    pub const fn default_stats(self) -> CombatStats {
        match self {
            Self::Predator => CombatStats::new(30, 40),
            Self::Ranger => CombatStats::new(25, 20),
            Self::Marauder => CombatStats::new(20, 15),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predator => write!(f, "Predator"),
            Self::Ranger => write!(f, "Ranger"),
            Self::Marauder => write!(f, "Marauder"),
        }
    }
}

impl FromStr for Kind {
    type Err = KindParseError;

    /// Parses a lowercase kind name. The legacy names `bear`, `elf` and
    /// `robber` are accepted as aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "predator" | "bear" => Ok(Self::Predator),
            "ranger" | "elf" => Ok(Self::Ranger),
            "marauder" | "robber" => Ok(Self::Marauder),
            other => Err(KindParseError(other.to_string())),
        }
    }
}

/// A creature before and after it joins the roster.
///
/// `Creature` holds all mutable simulation state. Position changes go
/// through [`Creature::move_by`] / [`Creature::set_position`], which validate
/// before writing; stats only grow through [`Creature::reinforce`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    name: String,
    kind: Kind,
    position: Position,
    stats: CombatStats,
}

impl Creature {
    /// Creates a creature with its kind's default stats.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] if `(x, y)` is outside `(0, MAP_LIMIT]`.
    pub fn new(name: impl Into<String>, kind: Kind, x: i32, y: i32) -> Result<Self, PositionError> {
        Self::with_stats(name, kind, x, y, kind.default_stats())
    }

    /// Creates a creature with explicit stats.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] if `(x, y)` is outside `(0, MAP_LIMIT]`.
    pub fn with_stats(
        name: impl Into<String>,
        kind: Kind,
        x: i32,
        y: i32,
        stats: CombatStats,
    ) -> Result<Self, PositionError> {
        Ok(Self {
            name: name.into(),
            kind,
            position: Position::new(x, y)?,
            stats,
        })
    }

    /// Display name. Not required to be unique.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Kind tag.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.kind
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Current attack and defense.
    #[must_use]
    pub const fn stats(&self) -> CombatStats {
        self.stats
    }

    /// Moves by `(dx, dy)` if the result stays in `(0, limit]`.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] and leaves the position unchanged when the
    /// move would leave the range.
    pub fn move_by(&mut self, dx: i32, dy: i32, limit: i32) -> Result<(), PositionError> {
        self.position = self.position.offset(dx, dy, limit)?;
        Ok(())
    }

    /// Teleports to `(x, y)`.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError`] and leaves the position unchanged when
    /// `(x, y)` is outside `(0, MAP_LIMIT]`.
    pub fn set_position(&mut self, x: i32, y: i32) -> Result<(), PositionError> {
        self.position = Position::new(x, y)?;
        Ok(())
    }

    /// Grows attack and defense by `bonus` after a win.
    pub fn reinforce(&mut self, bonus: i32) {
        self.stats.reinforce(bonus);
    }

    /// Text row `kind name x y attack defense`.
    #[must_use]
    pub fn to_row(&self) -> String {
        format!(
            "{} {} {} {} {} {}",
            self.kind.as_str(),
            self.name,
            self.position.x(),
            self.position.y(),
            self.stats.attack,
            self.stats.defense
        )
    }
}

/// A creature that has been admitted to a roster.
///
/// # Invariants
///
/// - The `EntityId` is unique among live entities of one roster
/// - Once an entity is moved to the graveyard its id is never live again
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    creature: Creature,
}

impl Entity {
    /// Pairs an id with a creature.
    #[must_use]
    pub const fn new(id: EntityId, creature: Creature) -> Self {
        Self { id, creature }
    }

    /// Roster-assigned id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Creature state.
    #[must_use]
    pub const fn creature(&self) -> &Creature {
        &self.creature
    }

    /// Mutable creature state.
    #[must_use]
    pub fn creature_mut(&mut self) -> &mut Creature {
        &mut self.creature
    }

    /// Shortcut for `creature().name()`.
    #[must_use]
    pub fn name(&self) -> &str {
        self.creature.name()
    }

    /// Shortcut for `creature().kind()`.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        self.creature.kind()
    }

    /// Shortcut for `creature().position()`.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.creature.position()
    }

    /// Shortcut for `creature().stats()`.
    #[must_use]
    pub const fn stats(&self) -> CombatStats {
        self.creature.stats()
    }

    /// Drops the id and returns the creature.
    #[must_use]
    pub fn into_creature(self) -> Creature {
        self.creature
    }
}
