//! Governor Hero Core - Fundamental types and configuration
//!
//! This crate defines the types shared by every layer of the hero diagram:
//! - Animation time (ElapsedMs)
//! - Geometry (Point, Curve, TextAnchor)
//! - Cycle phases
//! - Configuration and construction-time validation

pub mod config;
pub mod error;
pub mod geometry;
pub mod phase;
pub mod time;

pub use config::*;
pub use error::*;
pub use geometry::*;
pub use phase::*;
pub use time::*;
