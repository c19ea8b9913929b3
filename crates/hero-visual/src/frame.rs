//! Visual Frame - the render-ready snapshot for one instant
//!
//! This is NOT a bitmap. It is every parameter the renderer needs to paint
//! the diagram: positions, opacities, glow and label visibility. A frame is
//! derived from elapsed time and the hover flag, never mutated.

use hero_core::{ElapsedMs, Phase, Point, TextAnchor, AGENT_COUNT, CHECK_COUNT, RAIL_COUNT};
use serde::Serialize;

use crate::ActiveSlots;

/// Moving packet marker
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Packet {
    pub position: Point,
    pub opacity: f64,
}

/// One agent node and its curve into the decision engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AgentVisual {
    pub active: bool,
    /// Curve stroke opacity (dimmed)
    pub track_opacity: f64,
    /// Dot drawn part-way along the curve
    pub node: Point,
    pub node_opacity: f64,
    /// Node box opacity (dimmed)
    pub box_opacity: f64,
    /// Accent overlay on the active node
    pub highlight: f64,
}

/// One payment rail and its curve out of the decision engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RailVisual {
    pub active: bool,
    /// Curve stroke opacity (dimmed)
    pub track_opacity: f64,
}

/// Positioned text label
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelVisual {
    pub position: Point,
    pub anchor: TextAnchor,
    pub opacity: f64,
}

impl LabelVisual {
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Arrival ripple at the destination rail
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ripple {
    pub center: Point,
    pub ring_radius: f64,
    pub ring_opacity: f64,
    pub dot_radius: f64,
    pub dot_opacity: f64,
}

/// Complete derived state of the diagram at one instant
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualFrame {
    pub elapsed: ElapsedMs,
    pub cycle_index: u64,
    pub phase: Phase,
    /// Local progress within `phase`
    pub progress: f64,
    pub active: ActiveSlots,

    /// Global breathing scalar, 1 outside Reset
    pub dim: f64,
    /// Decision engine glow before dimming, hover boost included
    pub glow: f64,

    /// None during Reset
    pub packet: Option<Packet>,
    pub agents: [AgentVisual; AGENT_COUNT],
    pub rails: [RailVisual; RAIL_COUNT],
    /// Check label opacities (dimmed)
    pub checks: [f64; CHECK_COUNT],
    pub request_label: LabelVisual,
    pub rail_label: LabelVisual,
    pub ripple: Option<Ripple>,
}

impl VisualFrame {
    /// Glow overlay opacity as painted
    pub fn glow_opacity(&self) -> f64 {
        self.glow * self.dim
    }

    /// Opacity of static chrome (engine box, captions, rail boxes)
    pub fn chrome_opacity(&self) -> f64 {
        self.dim
    }

    pub fn active_agent(&self) -> &AgentVisual {
        &self.agents[self.active.agent]
    }

    pub fn active_rail(&self) -> &RailVisual {
        &self.rails[self.active.rail]
    }

    /// Every opacity in the frame, for range checks
    pub fn opacities(&self) -> Vec<f64> {
        let mut all = vec![self.dim, self.glow_opacity()];
        if let Some(packet) = &self.packet {
            all.push(packet.opacity);
        }
        for agent in &self.agents {
            all.extend([
                agent.track_opacity,
                agent.node_opacity,
                agent.box_opacity,
                agent.highlight,
            ]);
        }
        all.extend(self.rails.iter().map(|r| r.track_opacity));
        all.extend(self.checks);
        all.push(self.request_label.opacity);
        all.push(self.rail_label.opacity);
        if let Some(ripple) = &self.ripple {
            all.extend([ripple.ring_opacity, ripple.dot_opacity]);
        }
        all
    }
}
