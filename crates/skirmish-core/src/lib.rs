//! # Skirmish Core
//!
//! Concurrent creature combat simulation.
//!
//! Creatures of three kinds wander a square map. Whenever two come within
//! engagement distance a fight is queued and resolved by a fixed matchup
//! table with a power fallback. Survivors grow stronger, the dead go to the
//! graveyard, and every death is reported to pluggable event sinks.
//!
//! ## Architecture
//!
//! - **Roster**: arena of live and dead creatures behind a readers-writer lock
//! - **Scanner**: all-pairs proximity scan producing fight candidates
//! - **Fight queue**: mutex and condvar hand-off to the resolvers
//! - **Resolver**: pure rule engine plus atomic apply under the write lock
//! - **Simulation**: worker threads, cancellation and shutdown
//!
//! ## Usage
//!
//! ```
//! use std::time::Duration;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use skirmish_core::config::SimulationConfig;
//! use skirmish_core::factory::populate;
//! use skirmish_core::simulation::Simulation;
//!
//! let config = SimulationConfig { seed: Some(3), ..SimulationConfig::default() };
//! let mut rng = ChaCha8Rng::seed_from_u64(3);
//! let creatures = populate(20, config.map_size, &mut rng).unwrap();
//!
//! let mut sim = Simulation::new(config, creatures).unwrap();
//! sim.run_for(Duration::from_millis(30)).unwrap();
//! assert_eq!(sim.roster().len() + sim.roster().fallen_count(), 20);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod config;
pub mod entity;
pub mod error;
pub mod factory;
pub mod movement;
pub mod persistence;
pub mod queue;
pub mod resolver;
pub mod roster;
pub mod scanner;
pub mod simulation;

#[cfg(test)]
mod tests;

pub use arena::{Arena, Census};
pub use config::SimulationConfig;
pub use entity::{CombatStats, Creature, Entity, EntityId, Kind, Position};
pub use error::{ConfigError, PersistenceError, PositionError, SimulationError};
pub use queue::{Candidate, FightQueue};
pub use resolver::{CombatEvent, CombatResolver, EventLog, EventSink, Resolution, SinkSet};
pub use roster::Roster;
pub use simulation::{FightTally, Simulation};
