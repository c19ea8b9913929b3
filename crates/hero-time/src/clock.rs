//! Pausable animation clock
//!
//! The clock is the only writer of elapsed animation time. A visibility
//! collaborator starts it when the diagram is on screen and stops it
//! otherwise; stopping freezes progress and starting resumes from it.

use hero_core::ElapsedMs;
use tracing::{debug, warn};

use crate::{MonotonicSource, TimeSource};

/// Snapshot of clock state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockState {
    pub elapsed: ElapsedMs,
    pub running: bool,
}

/// Animation clock
/// INVARIANT: elapsed MUST be non-decreasing, NEVER jumps on resume
pub struct Clock<S: TimeSource = MonotonicSource> {
    /// Timestamp source, only read while running
    source: S,
    /// Accumulated animation time
    elapsed: ElapsedMs,
    /// Source timestamp at which elapsed would have been zero for this run.
    /// None while stopped.
    anchor: Option<f64>,
    /// Started while the source reported a non-finite timestamp; anchors on
    /// the next finite sample
    pending_start: bool,
}

impl Clock<MonotonicSource> {
    /// Stopped clock backed by the OS monotonic clock
    pub fn monotonic() -> Self {
        Clock::new(MonotonicSource::new())
    }
}

impl Default for Clock<MonotonicSource> {
    fn default() -> Self {
        Self::monotonic()
    }
}

impl<S: TimeSource> Clock<S> {
    /// Create a stopped clock at zero
    pub fn new(source: S) -> Self {
        Clock {
            source,
            elapsed: ElapsedMs::ZERO,
            anchor: None,
            pending_start: false,
        }
    }

    /// Begin advancing from the current elapsed value. No-op if running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.pending_start = true;
        self.try_anchor();
    }

    /// Freeze elapsed at its current value. No-op if stopped.
    pub fn stop(&mut self) {
        if !self.is_running() {
            return;
        }
        self.sample();
        self.anchor = None;
        self.pending_start = false;
        debug!(elapsed = %self.elapsed, "clock stopped");
    }

    /// Sample the source (when running) and return elapsed time
    pub fn tick(&mut self) -> ElapsedMs {
        if self.pending_start {
            self.try_anchor();
        } else if self.anchor.is_some() {
            self.sample();
        }
        self.elapsed
    }

    /// Last sampled elapsed time, without reading the source
    pub fn elapsed(&self) -> ElapsedMs {
        self.elapsed
    }

    /// True between `start()` and `stop()`, including a start still
    /// waiting for a finite timestamp
    pub fn is_running(&self) -> bool {
        self.anchor.is_some() || self.pending_start
    }

    pub fn state(&self) -> ClockState {
        ClockState {
            elapsed: self.elapsed,
            running: self.is_running(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn try_anchor(&mut self) {
        let now = self.source.now_ms();
        if !now.is_finite() {
            warn!(now, "time source returned non-finite timestamp, start deferred");
            return;
        }
        self.anchor = Some(now - self.elapsed.as_millis());
        self.pending_start = false;
        debug!(elapsed = %self.elapsed, "clock started");
    }

    fn sample(&mut self) {
        let Some(anchor) = self.anchor else {
            return;
        };

        let now = self.source.now_ms();
        if !now.is_finite() {
            warn!(now, "time source returned non-finite timestamp, holding");
            return;
        }

        let candidate = now - anchor;
        if candidate.is_nan() || candidate < self.elapsed.as_millis() {
            // Source went backwards: hold and re-anchor so later ticks stay continuous
            warn!(
                candidate,
                elapsed = %self.elapsed,
                "time source regressed, holding elapsed"
            );
            self.anchor = Some(now - self.elapsed.as_millis());
            return;
        }

        self.elapsed = ElapsedMs::from_millis(candidate);
    }
}
