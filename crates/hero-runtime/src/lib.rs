//! Governor Hero Runtime - Frame driver for the hero diagram
//!
//! Composes the clock and the resolver behind the surface a rendering host
//! consumes: visibility and hover signals in, one `VisualFrame` per frame out.

pub mod driver;

pub use driver::*;
