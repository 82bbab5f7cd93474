//! Console and file event sinks.
//!
//! Both write one timestamped line per event through a mutex-guarded writer.
//! Timestamps are seconds since the sink was created. A failed write is
//! logged once and the sink goes quiet; it never takes the run down.

use std::fs::{File, OpenOptions};
use std::io::{self, Stdout, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use skirmish_core::resolver::{CombatEvent, EventSink};
use tracing::warn;

/// Event sink writing text lines to any writer.
#[derive(Debug)]
pub struct LineSink<W: Write + Send> {
    out: Mutex<W>,
    started: Instant,
    failed: AtomicBool,
}

/// Sink printing events to standard output.
pub type ConsoleSink = LineSink<Stdout>;

/// Sink appending events to a log file.
pub type FileSink = LineSink<File>;

impl<W: Write + Send> LineSink<W> {
    /// Wraps `out`. The clock starts now.
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            started: Instant::now(),
            failed: AtomicBool::new(false),
        }
    }

    /// Consumes the sink and returns the writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_event(&self, event: &CombatEvent) {
        if self.failed.load(Ordering::Relaxed) {
            return;
        }
        let elapsed = self.started.elapsed().as_secs_f64();
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let result = writeln!(out, "[{elapsed:>8.3}s] {event}").and_then(|()| out.flush());
        if let Err(err) = result {
            self.failed.store(true, Ordering::Relaxed);
            warn!(%err, "event sink write failed, disabling sink");
        }
    }
}

impl ConsoleSink {
    /// Sink on standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl FileSink {
    /// Opens `path` for appending and writes a session header.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be opened or the header
    /// cannot be written.
    pub fn append(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        writeln!(file)?;
        writeln!(file, "=== session start (unix time {since_epoch}) ===")?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> EventSink for LineSink<W> {
    fn on_kill(&self, killer: &str, victim: &str) {
        self.write_event(&CombatEvent::kill(killer, victim));
    }

    fn on_mutual_death(&self, first: &str, second: &str) {
        self.write_event(&CombatEvent::mutual_death(first, second));
    }
}
