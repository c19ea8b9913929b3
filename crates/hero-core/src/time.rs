//! Time primitives for the hero animation
//!
//! Animation time is a single non-negative scalar of milliseconds since the
//! clock was first started. It only moves forward while the clock runs.

use std::ops::{Add, Sub};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Elapsed animation time in milliseconds
/// INVARIANT: always finite and >= 0
#[derive(Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct ElapsedMs(f64);

impl ElapsedMs {
    pub const ZERO: ElapsedMs = ElapsedMs(0.0);

    /// Build from raw milliseconds. Negative or non-finite input collapses to zero.
    #[inline]
    pub fn from_millis(millis: f64) -> Self {
        if millis.is_finite() && millis > 0.0 {
            ElapsedMs(millis)
        } else {
            ElapsedMs::ZERO
        }
    }

    #[inline]
    pub fn from_duration(duration: Duration) -> Self {
        Self::from_millis(duration.as_secs_f64() * 1000.0)
    }

    #[inline]
    pub fn as_millis(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn as_duration(self) -> Duration {
        Duration::from_secs_f64(self.0 / 1000.0)
    }

    /// The later of two times
    #[inline]
    pub fn max(self, other: ElapsedMs) -> ElapsedMs {
        if other.0 > self.0 {
            other
        } else {
            self
        }
    }
}

impl Add<f64> for ElapsedMs {
    type Output = ElapsedMs;

    #[inline]
    fn add(self, rhs: f64) -> Self::Output {
        ElapsedMs::from_millis(self.0 + rhs)
    }
}

impl Add<Duration> for ElapsedMs {
    type Output = ElapsedMs;

    #[inline]
    fn add(self, rhs: Duration) -> Self::Output {
        self + rhs.as_secs_f64() * 1000.0
    }
}

impl Sub<ElapsedMs> for ElapsedMs {
    type Output = f64;

    /// Difference in milliseconds, saturating at zero
    #[inline]
    fn sub(self, rhs: ElapsedMs) -> Self::Output {
        (self.0 - rhs.0).max(0.0)
    }
}

impl From<f64> for ElapsedMs {
    fn from(millis: f64) -> Self {
        ElapsedMs::from_millis(millis)
    }
}

impl From<ElapsedMs> for f64 {
    fn from(elapsed: ElapsedMs) -> Self {
        elapsed.0
    }
}

impl std::fmt::Debug for ElapsedMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "τa({:.3}ms)", self.0)
    }
}

impl std::fmt::Display for ElapsedMs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}ms", self.0)
    }
}
