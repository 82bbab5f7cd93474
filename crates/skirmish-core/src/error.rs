//! Error types for the Skirmish core.
//!
//! Everything here is recoverable. Position validation failures leave the
//! entity untouched, parse failures skip a row, and I/O failures are handed
//! back to the caller. Nothing in the core aborts the simulation.

use std::path::PathBuf;

use thiserror::Error;

/// A coordinate pair fell outside the permitted map range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PositionError {
    /// Either coordinate is `<= 0` or `> limit`.
    #[error("coordinates ({x}, {y}) must lie in (0, {limit}]")]
    OutOfBounds {
        /// Rejected x coordinate.
        x: i32,
        /// Rejected y coordinate.
        y: i32,
        /// Upper bound that was applied.
        limit: i32,
    },
}

/// A kind name did not match any known creature kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown creature kind: {0:?}")]
pub struct KindParseError(pub String);

/// Errors produced while loading or validating a [`SimulationConfig`].
///
/// [`SimulationConfig`]: crate::config::SimulationConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for this schema.
    #[error("invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value the simulation cannot run with.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Offending field name.
        field: &'static str,
        /// Human readable reason.
        reason: String,
    },
}

/// Errors produced by the text-row persistence layer.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Opening, reading or writing the file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A creature name cannot be written as a single row field.
    #[error("creature name {name:?} is empty or contains whitespace")]
    UnwritableName {
        /// Offending name.
        name: String,
    },
}

/// Errors produced by the simulation coordinator.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// `start` was called on a simulation that has already run.
    #[error("simulation has already been started")]
    AlreadyStarted,

    /// The operating system refused to create a worker thread.
    #[error("failed to spawn worker thread {name}: {source}")]
    Spawn {
        /// Name of the worker that could not be started.
        name: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
