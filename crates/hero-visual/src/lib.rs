//! Governor Hero Visual - Derived visual state of the hero diagram
//!
//! Nothing here paints pixels. The resolver turns elapsed animation time
//! into a `VisualFrame` holding every position, opacity and glow value the
//! rendering surface needs.
//!
//! # Pipeline
//!
//! elapsed → Phase Engine → Cycle Selector → Resolver → VisualFrame
//!
//! The easing helpers are used at every stage.

pub mod easing;
pub mod frame;
pub mod resolver;
pub mod selector;

pub use easing::*;
pub use frame::*;
pub use resolver::*;
pub use selector::*;
