//! Integration tests for scan, queue and resolution working together.
//!
//! These tests drive a roster through the same path the workers take:
//! - Scanner finds candidates
//! - Fight queue hands them over
//! - Resolver applies verdicts and reports to sinks

use std::sync::Arc;

use crate::entity::{CombatStats, Kind};
use crate::queue::{Candidate, FightQueue};
use crate::resolver::{CombatEvent, CombatResolver, EventLog, EventSink, Resolution, SinkSet};
use crate::roster::Roster;
use crate::scanner::{scan, scan_into};

use super::helpers::{admit, fallen_names, fighter, stats_of, survivor_names};

/// Pops everything currently queued and resolves it.
fn drain(queue: &FightQueue, roster: &Roster, sink: &dyn EventSink) -> Vec<Resolution> {
    let resolver = CombatResolver::new();
    let mut resolutions = Vec::new();
    while !queue.is_empty() {
        if let Some(candidate) = queue.pop_blocking() {
            resolutions.push(resolver.resolve(candidate, roster, sink));
        }
    }
    resolutions
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn ranger_meets_marauder() {
    let roster = Roster::new();
    let ids = admit(
        &roster,
        [fighter("R1", Kind::Ranger, 5, 5, 25, 20), fighter("M1", Kind::Marauder, 5, 6, 20, 15)],
    );
    let queue = FightQueue::new();
    let log = EventLog::new();

    assert_eq!(scan_into(&roster, &queue, 1.0), 1);
    drain(&queue, &roster, &log);

    assert_eq!(survivor_names(&roster), vec!["R1"]);
    assert_eq!(fallen_names(&roster), vec!["M1"]);
    assert_eq!(stats_of(&roster, ids[0]), Some(CombatStats::new(30, 25)));
    assert_eq!(log.take_events(), vec![CombatEvent::kill("R1", "M1")]);
}

#[test]
fn even_same_kind_pair_is_a_standoff() {
    let roster = Roster::new();
    admit(
        &roster,
        [fighter("A", Kind::Ranger, 1, 1, 10, 10), fighter("B", Kind::Ranger, 1, 1, 10, 10)],
    );
    let queue = FightQueue::new();
    let log = EventLog::new();

    scan_into(&roster, &queue, 1.0);
    let resolutions = drain(&queue, &roster, &log);

    assert_eq!(resolutions.len(), 1);
    assert!(matches!(resolutions[0], Resolution::Standoff { .. }));
    assert_eq!(roster.len(), 2);
    assert!(log.is_empty());
}

#[test]
fn mutual_kill_buries_each_once() {
    let roster = Roster::new();
    admit(
        &roster,
        [
            fighter("X", Kind::Marauder, 50, 50, 5, 5),
            fighter("A", Kind::Predator, 1, 1, 30, 10),
            fighter("Y", Kind::Marauder, 80, 80, 5, 5),
            fighter("B", Kind::Predator, 1, 2, 30, 10),
        ],
    );
    let queue = FightQueue::new();
    let log = EventLog::new();

    scan_into(&roster, &queue, 1.0);
    scan_into(&roster, &queue, 1.0);
    let resolutions = drain(&queue, &roster, &log);

    assert_eq!(resolutions[0].deaths(), 2);
    assert_eq!(resolutions[1], Resolution::Stale);
    assert_eq!(fallen_names(&roster), vec!["A", "B"]);
    assert_eq!(survivor_names(&roster), vec!["X", "Y"]);
    assert_eq!(log.take_events(), vec![CombatEvent::mutual_death("A", "B")]);
}

#[test]
fn alive_count_drops_by_at_most_two() {
    let roster = Roster::new();
    admit(&roster, super::helpers::crowd(60, 4));
    let resolver = CombatResolver::new();
    let log = EventLog::new();

    for candidate in scan(&roster, 1.5) {
        let before = roster.len();
        let resolution = resolver.resolve(candidate, &roster, &log);
        let dropped = before - roster.len();
        assert!(dropped <= 2);
        assert_eq!(dropped, resolution.deaths());
    }
    assert_eq!(roster.len() + roster.fallen_count(), 60);
}

#[test]
fn stale_candidate_is_idempotent() {
    let roster = Roster::new();
    let ids = admit(
        &roster,
        [fighter("P", Kind::Predator, 3, 3, 30, 40), fighter("R", Kind::Ranger, 3, 4, 25, 20)],
    );
    let resolver = CombatResolver::new();
    let log = EventLog::new();
    let candidate = Candidate::new(ids[0], ids[1]);

    resolver.resolve(candidate, &roster, &log);
    let after_first = roster.snapshot();
    let fallen_first = roster.fallen_count();

    for _ in 0..3 {
        assert_eq!(resolver.resolve(candidate, &roster, &log), Resolution::Stale);
    }
    assert_eq!(roster.snapshot(), after_first);
    assert_eq!(roster.fallen_count(), fallen_first);
    assert_eq!(log.event_count(), 1);
}

#[test]
fn every_sink_hears_every_death() {
    let roster = Roster::new();
    admit(
        &roster,
        [
            fighter("R1", Kind::Ranger, 9, 9, 1, 1),
            fighter("M1", Kind::Marauder, 9, 10, 1, 1),
            fighter("P1", Kind::Predator, 40, 40, 1, 1),
            fighter("R2", Kind::Ranger, 40, 41, 1, 1),
        ],
    );
    let first = Arc::new(EventLog::new());
    let second = Arc::new(EventLog::new());
    let mut sinks = SinkSet::new();
    sinks.push(first.clone());
    sinks.push(second.clone());

    let queue = FightQueue::new();
    scan_into(&roster, &queue, 1.0);
    drain(&queue, &roster, &sinks);

    let expected = vec![CombatEvent::kill("R1", "M1"), CombatEvent::kill("P1", "R2")];
    assert_eq!(first.take_events(), expected);
    assert_eq!(second.take_events(), expected);
}

#[test]
fn zero_sinks_is_valid() {
    let roster = Roster::new();
    admit(
        &roster,
        [fighter("R1", Kind::Ranger, 2, 2, 1, 1), fighter("M1", Kind::Marauder, 2, 2, 1, 1)],
    );
    let queue = FightQueue::new();
    scan_into(&roster, &queue, 1.0);
    let resolutions = drain(&queue, &roster, &SinkSet::new());
    assert_eq!(resolutions[0].deaths(), 1);
}
