//! Animation phases
//!
//! One cycle is partitioned into four ordered phases:
//! Request → Evaluate → Route → Reset → (next cycle) Request

use serde::{Deserialize, Serialize};

/// Phase of the hero animation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Phase {
    /// Packet travels from the active agent into the decision engine
    Request = 0,
    /// Packet sits in the decision engine while checks fire
    Evaluate = 1,
    /// Packet travels from the decision engine down the active rail
    Route = 2,
    /// Packet hidden, diagram breathes before the next cycle
    Reset = 3,
}

impl Phase {
    /// All phases in cycle order
    pub fn all() -> &'static [Phase] {
        &[Phase::Request, Phase::Evaluate, Phase::Route, Phase::Reset]
    }

    pub fn count() -> usize {
        4
    }

    /// Position in cycle order
    #[inline]
    pub fn ordinal(self) -> usize {
        self as usize
    }

    /// Phase that follows this one (Reset wraps to Request)
    pub fn next(self) -> Phase {
        match self {
            Phase::Request => Phase::Evaluate,
            Phase::Evaluate => Phase::Route,
            Phase::Route => Phase::Reset,
            Phase::Reset => Phase::Request,
        }
    }

    /// Whether the moving packet is drawn in this phase
    pub fn shows_packet(self) -> bool {
        !matches!(self, Phase::Reset)
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::Request => "request",
            Phase::Evaluate => "evaluate",
            Phase::Route => "route",
            Phase::Reset => "reset",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
