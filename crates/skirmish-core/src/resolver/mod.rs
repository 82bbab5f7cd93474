//! Resolver module: deciding fights and applying their outcome.
//!
//! Resolution is split in two layers:
//!
//! - [`judge`] is the pure rule engine. It sees two [`Combatant`]s and
//!   returns a [`Verdict`] without touching shared state.
//! - [`CombatResolver`] takes a queued candidate, re-validates it under the
//!   roster's write lock, applies the verdict and reports the outcome to an
//!   [`EventSink`].
//!
//! # Invariants
//!
//! - A candidate whose creatures are not both alive changes nothing
//! - A resolution kills zero, one or two creatures, never more
//! - A dead creature is recorded in the graveyard exactly once
//! - Sinks only hear about deaths, never standoffs or stale candidates

mod combat;
mod event;
mod rules;

pub use combat::{CombatResolver, Fighter, Resolution, DEFAULT_WIN_BONUS};
pub use event::{CombatEvent, EventLog, EventSink, SinkSet};
pub use rules::{judge, matchup, power_contest, Combatant, Verdict};
