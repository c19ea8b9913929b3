//! Governor Hero Time - Animation clock and phase engine
//!
//! This crate implements the time side of the hero diagram:
//! - Pausable clock that never loses or repeats progress
//! - Pluggable timestamp sources (OS monotonic, host driven)
//! - Phase engine splitting elapsed time into cycles and phases

pub mod clock;
pub mod cycle;
pub mod source;

pub use clock::*;
pub use cycle::*;
pub use source::*;
