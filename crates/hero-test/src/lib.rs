//! Hero Test Harness - Frame loop simulation and invariant checking
//!
//! This crate provides:
//! - Randomized frame cadence and visibility flicker
//! - Host clock regression injection
//! - Per-frame invariant checks over resolved frames
//! - Scripted timelines for integration tests

pub mod simulator;

pub use simulator::*;

use tracing_subscriber::EnvFilter;

/// Install a test subscriber honoring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
