//! Timestamp sources feeding the animation clock

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Source of monotonically non-decreasing timestamps in milliseconds
///
/// The absolute value is meaningless; only differences are used.
pub trait TimeSource {
    fn now_ms(&self) -> f64;
}

impl<T: TimeSource + ?Sized> TimeSource for Box<T> {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// Monotonic OS clock
#[derive(Debug, Clone, Copy)]
pub struct MonotonicSource {
    origin: Instant,
}

impl MonotonicSource {
    pub fn new() -> Self {
        MonotonicSource {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicSource {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Externally driven timestamps
///
/// Clones share the same underlying value, so a host can keep one handle
/// and feed frame timestamps while the clock reads through another.
#[derive(Debug, Clone, Default)]
pub struct ManualSource {
    now: Rc<Cell<f64>>,
}

impl ManualSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Source starting at a given timestamp
    pub fn at(millis: f64) -> Self {
        let source = Self::new();
        source.set(millis);
        source
    }

    pub fn set(&self, millis: f64) {
        self.now.set(millis);
    }

    pub fn advance(&self, millis: f64) {
        self.now.set(self.now.get() + millis);
    }

    pub fn get(&self) -> f64 {
        self.now.get()
    }
}

impl TimeSource for ManualSource {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
