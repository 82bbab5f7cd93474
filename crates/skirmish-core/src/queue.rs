//! Fight queue: FIFO hand-off between the scanner and the resolvers.
//!
//! The queue is a `VecDeque` behind a `Mutex` paired with a `Condvar`.
//! Consumers block in [`FightQueue::pop_blocking`] until a candidate arrives
//! or the queue is stopped; they never spin.
//!
//! Stopping is sticky. Once [`FightQueue::stop`] has been called every
//! blocked and future `pop_blocking` returns `None`, even if candidates are
//! still queued, so consumers exit within one wake-up.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Two creatures detected within engagement distance.
///
/// The pair is unordered as far as detection goes, but the order is kept
/// because the matchup table is evaluated on the ordered pair and events
/// report names in detection order. A candidate is only a hint: either
/// creature may be dead by the time it is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    /// Creature listed first by the scanner.
    pub first: EntityId,
    /// Creature listed second by the scanner.
    pub second: EntityId,
}

impl Candidate {
    /// Creates a candidate pair.
    #[must_use]
    pub const fn new(first: EntityId, second: EntityId) -> Self {
        Self { first, second }
    }
}

#[derive(Debug, Default)]
struct QueueState {
    pending: VecDeque<Candidate>,
    stopped: bool,
}

/// Unbounded FIFO of fight candidates with blocking pop.
///
/// # Example
///
/// ```
/// use skirmish_core::queue::{Candidate, FightQueue};
/// use skirmish_core::entity::EntityId;
///
/// let queue = FightQueue::new();
/// let pair = Candidate::new(EntityId::new(0, 0), EntityId::new(1, 0));
/// queue.push(pair);
/// assert_eq!(queue.pop_blocking(), Some(pair));
///
/// queue.stop();
/// assert_eq!(queue.pop_blocking(), None);
/// ```
#[derive(Debug, Default)]
pub struct FightQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
}

impl FightQueue {
    /// Creates an empty, running queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a candidate and wakes one waiting consumer.
    ///
    /// Candidates pushed after [`stop`](Self::stop) are discarded.
    pub fn push(&self, candidate: Candidate) {
        let mut state = self.lock();
        if state.stopped {
            return;
        }
        state.pending.push_back(candidate);
        drop(state);
        self.ready.notify_one();
    }

    /// Appends every candidate in order and wakes all waiting consumers.
    ///
    /// Returns the number of candidates accepted.
    pub fn push_batch(&self, candidates: impl IntoIterator<Item = Candidate>) -> usize {
        let mut state = self.lock();
        if state.stopped {
            return 0;
        }
        let before = state.pending.len();
        state.pending.extend(candidates);
        let added = state.pending.len() - before;
        drop(state);
        if added > 0 {
            self.ready.notify_all();
        }
        added
    }

    /// Blocks until a candidate is available or the queue is stopped.
    ///
    /// Returns `None` once stopped, without handing out queued candidates.
    pub fn pop_blocking(&self) -> Option<Candidate> {
        let mut state = self
            .ready
            .wait_while(self.lock(), |state| {
                !state.stopped && state.pending.is_empty()
            })
            .unwrap_or_else(PoisonError::into_inner);
        if state.stopped {
            return None;
        }
        state.pending.pop_front()
    }

    /// Stops the queue and wakes every waiting consumer.
    pub fn stop(&self) {
        self.lock().stopped = true;
        self.ready.notify_all();
    }

    /// Returns `true` once [`stop`](Self::stop) has been called.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Number of queued candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().pending.len()
    }

    /// Returns `true` if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().pending.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
