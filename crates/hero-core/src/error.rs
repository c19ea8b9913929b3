//! Error types for the hero animation
//!
//! Every error is a configuration error caught at construction time.
//! Nothing fails once a driver, engine or resolver exists.

use thiserror::Error;

use crate::Phase;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HeroError {
    // Timing errors
    #[error("Invalid duration for {phase} phase: {millis}ms")]
    InvalidPhaseDuration { phase: Phase, millis: f64 },

    #[error("Cycle length must be positive, got {0}ms")]
    ZeroCycleLength(f64),

    // Round-robin errors
    #[error("Empty {0} order")]
    EmptyOrder(&'static str),

    #[error("{kind} order entry {slot} out of range (have {available} slots)")]
    SlotOutOfRange {
        kind: &'static str,
        slot: usize,
        available: usize,
    },

    // Tuning errors
    #[error("Tuning value {name} = {value} outside [0, 1]")]
    FractionOutOfRange { name: &'static str, value: f64 },

    #[error("Invalid check pulse {name}: {value}")]
    InvalidCheckPulse { name: &'static str, value: f64 },

    // Layout errors
    #[error("Non-finite coordinate in {0}")]
    NonFiniteGeometry(&'static str),
}

/// Result type for hero operations
pub type HeroResult<T> = Result<T, HeroError>;
