//! Simulation configuration.
//!
//! [`SimulationConfig`] collects every tunable of a run. All fields have
//! defaults, so a TOML file only needs to name what it changes:
//!
//! ```toml
//! map_size = 60
//! resolver_threads = 2
//! seed = 42
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entity::MAP_LIMIT;
use crate::error::ConfigError;
use crate::resolver::DEFAULT_WIN_BONUS;
use crate::scanner::DEFAULT_ENGAGEMENT_DISTANCE;

/// Tunables for one simulation run.
///
/// # Example
///
/// ```
/// use skirmish_core::config::SimulationConfig;
///
/// let config = SimulationConfig::from_toml_str("map_size = 40\nseed = 7").unwrap();
/// assert_eq!(config.map_size, 40);
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.resolver_threads, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Side of the square map. Creatures spawn and move within `1..=map_size`.
    pub map_size: i32,
    /// Maximum Euclidean distance at which two creatures fight.
    pub engagement_distance: f64,
    /// Milliseconds between movement passes.
    pub move_interval_ms: u64,
    /// Milliseconds between proximity scans.
    pub scan_interval_ms: u64,
    /// Step length of a ranger. Rangers move every pass.
    pub ranger_step: i32,
    /// Step length of predators and marauders when they move.
    pub roamer_step: i32,
    /// Probability that a predator or marauder moves in a given pass.
    pub roam_chance: f64,
    /// Number of resolver worker threads.
    pub resolver_threads: usize,
    /// Attack and defense gained by the survivor of a kill.
    pub win_bonus: i32,
    /// Seed for movement and spawning. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            map_size: 100,
            engagement_distance: DEFAULT_ENGAGEMENT_DISTANCE,
            move_interval_ms: 200,
            scan_interval_ms: 100,
            ranger_step: 10,
            roamer_step: 5,
            roam_chance: 0.30,
            resolver_threads: 1,
            win_bonus: DEFAULT_WIN_BONUS,
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and
    /// [`ConfigError::Invalid`] when a value fails [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Checks every field for a value the simulation can run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAP_LIMIT).contains(&self.map_size) {
            return Err(invalid("map_size", format!("{} is outside 1..={MAP_LIMIT}", self.map_size)));
        }
        if !self.engagement_distance.is_finite() || self.engagement_distance < 0.0 {
            return Err(invalid(
                "engagement_distance",
                format!("{} is not a non-negative distance", self.engagement_distance),
            ));
        }
        if self.move_interval_ms == 0 {
            return Err(invalid("move_interval_ms", "must be positive".to_string()));
        }
        if self.scan_interval_ms == 0 {
            return Err(invalid("scan_interval_ms", "must be positive".to_string()));
        }
        if self.ranger_step < 0 {
            return Err(invalid("ranger_step", "must not be negative".to_string()));
        }
        if self.roamer_step < 0 {
            return Err(invalid("roamer_step", "must not be negative".to_string()));
        }
        if !(0.0..=1.0).contains(&self.roam_chance) {
            return Err(invalid("roam_chance", format!("{} is outside [0, 1]", self.roam_chance)));
        }
        if self.resolver_threads == 0 {
            return Err(invalid("resolver_threads", "at least one resolver is required".to_string()));
        }
        if self.win_bonus < 0 {
            return Err(invalid("win_bonus", "must not be negative".to_string()));
        }
        Ok(())
    }

    /// Period of the movement worker.
    #[must_use]
    pub const fn move_interval(&self) -> Duration {
        Duration::from_millis(self.move_interval_ms)
    }

    /// Period of the scan worker.
    #[must_use]
    pub const fn scan_interval(&self) -> Duration {
        Duration::from_millis(self.scan_interval_ms)
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
