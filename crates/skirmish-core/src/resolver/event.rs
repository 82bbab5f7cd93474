//! Combat events and the sinks that receive them.
//!
//! The resolver reports every death through the [`EventSink`] trait. Sinks
//! are called after the roster lock is released, from whichever resolver
//! thread produced the event, so they must be `Send + Sync` and must not
//! assume any ordering between threads.
//!
//! # Available Sinks
//!
//! - [`EventLog`]: Records events in memory for reports and tests
//! - [`SinkSet`]: Fans one event out to any number of sinks
//!
//! Console and file sinks live in the binary.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

/// Receiver of combat outcomes.
///
/// # Example
///
/// ```
/// use skirmish_core::resolver::EventSink;
///
/// struct Printer;
///
/// impl EventSink for Printer {
///     fn on_kill(&self, killer: &str, victim: &str) {
///         println!("{killer} killed {victim}");
///     }
///
///     fn on_mutual_death(&self, first: &str, second: &str) {
///         println!("{first} and {second} killed each other");
///     }
/// }
/// ```
pub trait EventSink: Send + Sync {
    /// `killer` survived a fight in which `victim` died.
    fn on_kill(&self, killer: &str, victim: &str);

    /// `first` and `second` killed each other.
    fn on_mutual_death(&self, first: &str, second: &str);

    /// Dispatches a recorded event to the matching callback.
    fn record(&self, event: &CombatEvent) {
        match event {
            CombatEvent::Kill { killer, victim } => self.on_kill(killer, victim),
            CombatEvent::MutualDeath { first, second } => self.on_mutual_death(first, second),
        }
    }
}

/// One reported death outcome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CombatEvent {
    /// One creature died, the other survived.
    Kill {
        /// Name of the survivor.
        killer: String,
        /// Name of the dead creature.
        victim: String,
    },
    /// Both creatures died.
    MutualDeath {
        /// First creature of the pair, in detection order.
        first: String,
        /// Second creature of the pair, in detection order.
        second: String,
    },
}

impl CombatEvent {
    /// Creates a kill event.
    #[must_use]
    pub fn kill(killer: impl Into<String>, victim: impl Into<String>) -> Self {
        Self::Kill {
            killer: killer.into(),
            victim: victim.into(),
        }
    }

    /// Creates a mutual death event.
    #[must_use]
    pub fn mutual_death(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::MutualDeath {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Returns `true` if `name` died in this event.
    #[must_use]
    pub fn is_death_of(&self, name: &str) -> bool {
        match self {
            Self::Kill { victim, .. } => victim == name,
            Self::MutualDeath { first, second } => first == name || second == name,
        }
    }
}

impl fmt::Display for CombatEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kill { killer, victim } => write!(f, "{killer} killed {victim}"),
            Self::MutualDeath { first, second } => {
                write!(f, "{first} and {second} killed each other")
            }
        }
    }
}

// =============================================================================
// EventLog
// =============================================================================

/// Sink that keeps every event in memory.
///
/// # Example
///
/// ```
/// use skirmish_core::resolver::{CombatEvent, EventLog, EventSink};
///
/// let log = EventLog::new();
/// log.on_kill("R1", "M1");
///
/// assert_eq!(log.take_events(), vec![CombatEvent::kill("R1", "M1")]);
/// assert!(log.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<CombatEvent>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains and returns all recorded events, oldest first.
    pub fn take_events(&self) -> Vec<CombatEvent> {
        std::mem::take(&mut *self.lock())
    }

    /// Copies the recorded events without draining them.
    #[must_use]
    pub fn events(&self) -> Vec<CombatEvent> {
        self.lock().clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CombatEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for EventLog {
    fn on_kill(&self, killer: &str, victim: &str) {
        self.lock().push(CombatEvent::kill(killer, victim));
    }

    fn on_mutual_death(&self, first: &str, second: &str) {
        self.lock().push(CombatEvent::mutual_death(first, second));
    }
}

// =============================================================================
// SinkSet
// =============================================================================

/// Ordered collection of sinks. Every event goes to every sink.
///
/// An empty set is valid and drops events.
#[derive(Clone, Default)]
pub struct SinkSet {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl SinkSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sink. Sinks are called in registration order.
    pub fn push(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Number of registered sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Returns `true` if no sink is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl fmt::Debug for SinkSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkSet")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl EventSink for SinkSet {
    fn on_kill(&self, killer: &str, victim: &str) {
        for sink in &self.sinks {
            sink.on_kill(killer, victim);
        }
    }

    fn on_mutual_death(&self, first: &str, second: &str) {
        for sink in &self.sinks {
            sink.on_mutual_death(first, second);
        }
    }
}
