//! Value components carried by every creature.
//!
//! - [`Position`]: integer grid coordinates, validated on every mutation
//! - [`CombatStats`]: attack and defense power, only ever increased

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::error::PositionError;

/// Largest coordinate any creature may ever occupy.
///
/// Valid coordinates lie in the half-open range `(0, MAP_LIMIT]` on both axes.
pub const MAP_LIMIT: i32 = 500;

/// Integer grid position of a creature.
///
/// A `Position` can only be built through [`Position::new`],
/// [`Position::offset`] or deserialization, all of which reject coordinates
/// outside `(0, limit]`. A rejected mutation never produces a partially
/// applied position.
///
/// # Example
///
/// ```
/// use skirmish_core::entity::Position;
///
/// let pos = Position::new(5, 5).unwrap();
/// let moved = pos.offset(3, -2, 100).unwrap();
/// assert_eq!((moved.x(), moved.y()), (8, 3));
///
/// assert!(pos.offset(-5, 0, 100).is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IVec2", into = "IVec2")]
pub struct Position(IVec2);

impl Position {
    /// Creates a position, validating against [`MAP_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::OutOfBounds`] if either coordinate is outside
    /// `(0, MAP_LIMIT]`.
    pub fn new(x: i32, y: i32) -> Result<Self, PositionError> {
        Self::within(x, y, MAP_LIMIT)
    }

    /// Creates a position, validating against a custom upper bound.
    ///
    /// The bound is capped at [`MAP_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::OutOfBounds`] if either coordinate is outside
    /// `(0, limit]`.
    pub fn within(x: i32, y: i32, limit: i32) -> Result<Self, PositionError> {
        let limit = limit.min(MAP_LIMIT);
        if x <= 0 || x > limit || y <= 0 || y > limit {
            return Err(PositionError::OutOfBounds { x, y, limit });
        }
        Ok(Self(IVec2::new(x, y)))
    }

    /// Returns the position shifted by `(dx, dy)` if it stays in `(0, limit]`.
    ///
    /// # Errors
    ///
    /// Returns [`PositionError::OutOfBounds`] when the shifted coordinates
    /// leave the range. `self` is never modified.
    pub fn offset(self, dx: i32, dy: i32, limit: i32) -> Result<Self, PositionError> {
        Self::within(
            self.0.x.saturating_add(dx),
            self.0.y.saturating_add(dy),
            limit,
        )
    }

    /// X coordinate.
    #[must_use]
    pub const fn x(self) -> i32 {
        self.0.x
    }

    /// Y coordinate.
    #[must_use]
    pub const fn y(self) -> i32 {
        self.0.y
    }

    /// Underlying vector.
    #[must_use]
    pub const fn as_ivec2(self) -> IVec2 {
        self.0
    }

    /// Squared Euclidean distance to another position.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> i64 {
        let d = (self.0 - other.0).as_i64vec2();
        d.length_squared()
    }

    /// Returns `true` if `other` lies within Euclidean `distance` of `self`.
    ///
    /// The boundary is inclusive. Comparison happens on squared values so
    /// integer positions are exact.
    #[must_use]
    pub fn is_within(self, other: Self, distance: f64) -> bool {
        if distance < 0.0 {
            return false;
        }
        #[allow(clippy::cast_precision_loss)]
        let dist_sq = self.distance_squared(other) as f64;
        dist_sq <= distance * distance
    }
}

impl TryFrom<IVec2> for Position {
    type Error = PositionError;

    fn try_from(v: IVec2) -> Result<Self, Self::Error> {
        Self::new(v.x, v.y)
    }
}

impl From<Position> for IVec2 {
    fn from(pos: Position) -> Self {
        pos.as_ivec2()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{}]", self.0.x, self.0.y)
    }
}

/// Attack and defense power of a creature.
///
/// Both values are monotonically non-decreasing: the only mutation is
/// [`CombatStats::reinforce`], which adds a non-negative bonus.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatStats {
    /// Offensive power compared against the opponent's defense.
    pub attack: i32,
    /// Defensive power compared against the opponent's attack.
    pub defense: i32,
}

impl CombatStats {
    /// Creates stats with the given attack and defense.
    #[must_use]
    pub const fn new(attack: i32, defense: i32) -> Self {
        Self { attack, defense }
    }

    /// Adds `bonus` to both attack and defense.
    ///
    /// Negative bonuses are ignored so the stats never decrease.
    pub fn reinforce(&mut self, bonus: i32) {
        let bonus = bonus.max(0);
        self.attack = self.attack.saturating_add(bonus);
        self.defense = self.defense.saturating_add(bonus);
    }
}
