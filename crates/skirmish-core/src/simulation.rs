//! Simulation coordinator with long-lived worker threads.
//!
//! The `Simulation` struct owns the shared state of a run and the threads
//! that act on it:
//!
//! 1. **MOVER**: every `move_interval` take a snapshot and random-walk it
//! 2. **SCANNER**: every `scan_interval` queue every pair within
//!    engagement distance
//! 3. **RESOLVER** (one or more): block on the fight queue and resolve
//!    candidates as they arrive
//!
//! The coordinating thread starts the workers, watches the roster and
//! finally stops and joins them before reading the outcome.
//!
//! # Cancellation
//!
//! One atomic stop flag is checked at the top of every worker loop.
//! Periodic workers sleep in short slices so the flag is seen promptly, and
//! stopping also closes the fight queue, which wakes every blocked resolver.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use skirmish_core::config::SimulationConfig;
//! use skirmish_core::entity::{Creature, Kind};
//! use skirmish_core::resolver::EventLog;
//! use skirmish_core::simulation::Simulation;
//!
//! let creatures = vec![
//!     Creature::new("R1", Kind::Ranger, 5, 5).unwrap(),
//!     Creature::new("M1", Kind::Marauder, 5, 6).unwrap(),
//! ];
//! let config = SimulationConfig { seed: Some(1), ..SimulationConfig::default() };
//! let mut sim = Simulation::new(config, creatures).unwrap();
//! let log = Arc::new(EventLog::new());
//! sim.add_sink(log.clone());
//!
//! sim.run_for(Duration::from_millis(50)).unwrap();
//! assert!(sim.roster().len() + sim.roster().fallen_count() == 2);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::entity::Creature;
use crate::error::SimulationError;
use crate::movement::{movement_tick, MovementPolicy};
use crate::queue::FightQueue;
use crate::resolver::{CombatResolver, EventSink, Resolution, SinkSet};
use crate::roster::Roster;
use crate::scanner::{scan, scan_into};

/// Longest uninterrupted sleep of a periodic worker.
const PAUSE_SLICE: Duration = Duration::from_millis(10);

// =============================================================================
// FightTally
// =============================================================================

/// Counts of resolution outcomes over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FightTally {
    /// Fights with one survivor.
    pub kills: usize,
    /// Fights in which both died.
    pub mutual_kills: usize,
    /// Fights in which nobody died.
    pub standoffs: usize,
    /// Candidates dropped because a creature was already dead.
    pub stale: usize,
}

impl FightTally {
    /// Fights that actually took place.
    #[must_use]
    pub const fn fights(&self) -> usize {
        self.kills + self.mutual_kills + self.standoffs
    }
}

#[derive(Debug, Default)]
struct TallyCounters {
    kills: AtomicUsize,
    mutual_kills: AtomicUsize,
    standoffs: AtomicUsize,
    stale: AtomicUsize,
}

impl TallyCounters {
    fn record(&self, resolution: &Resolution) {
        let counter = match resolution {
            Resolution::Stale => &self.stale,
            Resolution::Kill { .. } => &self.kills,
            Resolution::MutualKill { .. } => &self.mutual_kills,
            Resolution::Standoff { .. } => &self.standoffs,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn load(&self) -> FightTally {
        FightTally {
            kills: self.kills.load(Ordering::Relaxed),
            mutual_kills: self.mutual_kills.load(Ordering::Relaxed),
            standoffs: self.standoffs.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
        }
    }
}

// =============================================================================
// Shared state
// =============================================================================

/// State reachable from every worker.
struct Shared {
    roster: Roster,
    queue: FightQueue,
    stop: AtomicBool,
    tally: TallyCounters,
}

impl Shared {
    fn stopping(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Sleeps for `period`, waking early once the stop flag is raised.
    fn pause(&self, period: Duration) {
        let deadline = Instant::now() + period;
        loop {
            if self.stopping() {
                return;
            }
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            thread::sleep((deadline - now).min(PAUSE_SLICE));
        }
    }
}

// =============================================================================
// Simulation
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Ready,
    Running,
    Finished,
}

/// Owner of a run's shared state and worker threads.
///
/// A simulation runs once: [`start`](Self::start) spawns the workers,
/// [`stop`](Self::stop) joins them, and the final roster stays readable
/// afterwards. Dropping a running simulation stops it.
pub struct Simulation {
    config: SimulationConfig,
    shared: Arc<Shared>,
    sinks: SinkSet,
    rng: ChaCha8Rng,
    workers: Vec<JoinHandle<()>>,
    phase: Phase,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("config", &self.config)
            .field("alive", &self.shared.roster.len())
            .field("sinks", &self.sinks)
            .field("workers", &format!("[{} workers]", self.workers.len()))
            .field("phase", &self.phase)
            .finish()
    }
}

impl Simulation {
    /// Validates `config` and admits `creatures` in order.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Config`] if the configuration is invalid.
    pub fn new(
        config: SimulationConfig,
        creatures: impl IntoIterator<Item = Creature>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self {
            config,
            shared: Arc::new(Shared {
                roster: Roster::with_creatures(creatures),
                queue: FightQueue::new(),
                stop: AtomicBool::new(false),
                tally: TallyCounters::default(),
            }),
            sinks: SinkSet::new(),
            rng,
            workers: Vec::new(),
            phase: Phase::Ready,
        })
    }

    /// Registers a sink. Sinks registered after [`start`](Self::start) only
    /// hear about fights resolved through [`step`](Self::step).
    pub fn add_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Configuration of this run.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The shared roster.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.shared.roster
    }

    /// Outcome counts so far.
    #[must_use]
    pub fn tally(&self) -> FightTally {
        self.shared.tally.load()
    }

    /// Returns `true` while worker threads are running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    /// Spawns the mover, the scanner and `resolver_threads` resolvers.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AlreadyStarted`] on a second call and
    /// [`SimulationError::Spawn`] if a thread cannot be created. Workers
    /// already spawned are stopped again before the error is returned.
    pub fn start(&mut self) -> Result<(), SimulationError> {
        if self.phase != Phase::Ready {
            return Err(SimulationError::AlreadyStarted);
        }
        self.phase = Phase::Running;

        if let Err(err) = self.spawn_workers() {
            self.stop();
            return Err(err);
        }
        info!(
            alive = self.shared.roster.len(),
            workers = self.workers.len(),
            "simulation started"
        );
        Ok(())
    }

    fn spawn_workers(&mut self) -> Result<(), SimulationError> {
        let policy = MovementPolicy::from_config(&self.config);
        let move_interval = self.config.move_interval();
        let mut rng = self.rng.clone();
        // Keep the coordinator's stream independent of the mover's.
        self.rng.set_stream(1);
        self.spawn_worker("mover".to_string(), move |shared| {
            while !shared.stopping() {
                let report = movement_tick(&shared.roster, &policy, &mut rng);
                debug!(
                    moved = report.moved,
                    blocked = report.blocked,
                    vanished = report.vanished,
                    "movement pass"
                );
                shared.pause(move_interval);
            }
        })?;

        let distance = self.config.engagement_distance;
        let scan_interval = self.config.scan_interval();
        self.spawn_worker("scanner".to_string(), move |shared| {
            while !shared.stopping() {
                scan_into(&shared.roster, &shared.queue, distance);
                shared.pause(scan_interval);
            }
        })?;

        let sinks = Arc::new(self.sinks.clone());
        for n in 0..self.config.resolver_threads {
            let resolver = CombatResolver::with_win_bonus(self.config.win_bonus);
            let sinks = Arc::clone(&sinks);
            self.spawn_worker(format!("resolver-{n}"), move |shared| {
                while !shared.stopping() {
                    let Some(candidate) = shared.queue.pop_blocking() else {
                        break;
                    };
                    let resolution = resolver.resolve(candidate, &shared.roster, &*sinks);
                    shared.tally.record(&resolution);
                }
            })?;
        }
        Ok(())
    }

    fn spawn_worker(
        &mut self,
        name: String,
        body: impl FnOnce(&Shared) + Send + 'static,
    ) -> Result<(), SimulationError> {
        let shared = Arc::clone(&self.shared);
        let label = name.clone();
        let handle = thread::Builder::new()
            .name(format!("skirmish-{name}"))
            .spawn(move || {
                debug!(worker = %label, "worker started");
                body(&shared);
                debug!(worker = %label, "worker stopped");
            })
            .map_err(|source| SimulationError::Spawn { name, source })?;
        self.workers.push(handle);
        Ok(())
    }

    /// Raises the stop flag, closes the queue and joins every worker.
    ///
    /// Safe to call more than once. After it returns no worker touches the
    /// roster again.
    pub fn stop(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.shared.stop.store(true, Ordering::Release);
        self.shared.queue.stop();

        for handle in self.workers.drain(..) {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                warn!(worker = %name, "worker panicked");
            }
        }
        self.phase = Phase::Finished;

        let tally = self.tally();
        info!(
            alive = self.shared.roster.len(),
            fallen = self.shared.roster.fallen_count(),
            kills = tally.kills,
            mutual_kills = tally.mutual_kills,
            standoffs = tally.standoffs,
            "simulation stopped"
        );
    }

    /// Starts, lets the workers run for `duration`, then stops.
    ///
    /// # Errors
    ///
    /// As [`start`](Self::start).
    pub fn run_for(&mut self, duration: Duration) -> Result<(), SimulationError> {
        self.start()?;
        thread::sleep(duration);
        self.stop();
        Ok(())
    }

    /// Runs one movement pass, one scan and resolves every candidate on the
    /// calling thread.
    ///
    /// Uses the simulation's own random stream, so with a fixed seed and no
    /// workers running the sequence of steps is reproducible.
    pub fn step(&mut self) -> Vec<Resolution> {
        let policy = MovementPolicy::from_config(&self.config);
        movement_tick(&self.shared.roster, &policy, &mut self.rng);

        let resolver = CombatResolver::with_win_bonus(self.config.win_bonus);
        scan(&self.shared.roster, self.config.engagement_distance)
            .into_iter()
            .map(|candidate| {
                let resolution = resolver.resolve(candidate, &self.shared.roster, &self.sinks);
                self.shared.tally.record(&resolution);
                resolution
            })
            .collect()
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// Tests
// =============================================================================
