//! Hero diagram configuration
//!
//! Everything the animation consumes is fixed data supplied at construction:
//! phase durations, diagram geometry, round-robin orders and the tuning
//! scalars that shape opacity and glow. `Default` carries production values.

use serde::{Deserialize, Serialize};

use crate::{Curve, HeroError, HeroResult, Phase, Point, TextAnchor};

/// Number of agent slots (top row)
pub const AGENT_COUNT: usize = 3;
/// Number of payment rail slots (bottom row)
pub const RAIL_COUNT: usize = 2;
/// Number of check labels under the decision engine
pub const CHECK_COUNT: usize = 3;

/// Agent visited on each cycle, round-robin
pub const AGENT_ORDER: [usize; AGENT_COUNT] = [1, 2, 0];
/// Rail used on each cycle, round-robin
pub const RAIL_ORDER: [usize; RAIL_COUNT] = [0, 1];

/// Start of each check pulse, measured from the start of Evaluate
pub const CHECK_PULSE_OFFSETS_MS: [f64; CHECK_COUNT] = [700.0, 920.0, 1140.0];
/// Width of each check pulse window
pub const CHECK_PULSE_WIDTH_MS: f64 = 280.0;

pub const CHECK_LABELS: [&str; CHECK_COUNT] = ["limits", "policy", "risk"];
pub const RAIL_LABELS: [&str; RAIL_COUNT] = ["VCN issued", "USDC transfer"];
pub const REQUEST_LABEL: &str = "POST /spend";

/// Fixed phase durations in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimings {
    pub request: f64,
    pub evaluate: f64,
    pub route: f64,
    pub reset: f64,
}

impl Default for PhaseTimings {
    fn default() -> Self {
        PhaseTimings {
            request: 1500.0,
            evaluate: 1500.0,
            route: 2000.0,
            reset: 2000.0,
        }
    }
}

impl PhaseTimings {
    pub const fn new(request: f64, evaluate: f64, route: f64, reset: f64) -> Self {
        PhaseTimings {
            request,
            evaluate,
            route,
            reset,
        }
    }

    /// Half-length loop for previews and tests
    pub fn brisk() -> Self {
        PhaseTimings::new(750.0, 750.0, 1000.0, 1000.0)
    }

    /// Duration of one phase
    pub fn duration(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Request => self.request,
            Phase::Evaluate => self.evaluate,
            Phase::Route => self.route,
            Phase::Reset => self.reset,
        }
    }

    /// Offset of a phase from the start of the cycle
    pub fn start_of(&self, phase: Phase) -> f64 {
        Phase::all()
            .iter()
            .take_while(|p| **p != phase)
            .map(|p| self.duration(*p))
            .sum()
    }

    /// Sum of all phase durations
    pub fn cycle_length(&self) -> f64 {
        self.request + self.evaluate + self.route + self.reset
    }

    pub fn validate(&self) -> HeroResult<()> {
        for &phase in Phase::all() {
            let millis = self.duration(phase);
            if !millis.is_finite() || millis < 0.0 {
                return Err(HeroError::InvalidPhaseDuration { phase, millis });
            }
        }

        let cycle = self.cycle_length();
        if !cycle.is_finite() || cycle <= 0.0 {
            return Err(HeroError::ZeroCycleLength(cycle));
        }

        Ok(())
    }
}

/// Where the request label sits relative to the active agent curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacement {
    pub dx: f64,
    pub dy: f64,
    pub anchor: TextAnchor,
}

impl LabelPlacement {
    pub const fn new(dx: f64, dy: f64, anchor: TextAnchor) -> Self {
        Self { dx, dy, anchor }
    }
}

/// Static diagram geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramLayout {
    pub width: f64,
    pub height: f64,
    pub agent_centers: [Point; AGENT_COUNT],
    pub rail_centers: [Point; RAIL_COUNT],
    /// Decision engine center, where the packet rests during Evaluate
    pub engine_center: Point,
    pub agent_curves: [Curve; AGENT_COUNT],
    pub rail_curves: [Curve; RAIL_COUNT],
    /// Request label offset per agent
    pub request_label: [LabelPlacement; AGENT_COUNT],
    /// Baseline of the rail label under the rail boxes
    pub rail_label_y: f64,
}

impl Default for DiagramLayout {
    fn default() -> Self {
        DiagramLayout {
            width: 420.0,
            height: 320.0,
            agent_centers: [
                Point::new(84.0, 58.0),
                Point::new(210.0, 58.0),
                Point::new(336.0, 58.0),
            ],
            rail_centers: [Point::new(131.0, 273.0), Point::new(293.0, 273.0)],
            engine_center: Point::new(210.0, 169.0),
            agent_curves: [
                Curve::new(
                    Point::new(84.0, 74.0),
                    Point::new(132.0, 108.0),
                    Point::new(174.0, 128.0),
                ),
                Curve::new(
                    Point::new(210.0, 74.0),
                    Point::new(210.0, 101.0),
                    Point::new(210.0, 128.0),
                ),
                Curve::new(
                    Point::new(336.0, 74.0),
                    Point::new(288.0, 108.0),
                    Point::new(246.0, 128.0),
                ),
            ],
            rail_curves: [
                Curve::new(
                    Point::new(190.0, 210.0),
                    Point::new(170.0, 238.0),
                    Point::new(138.0, 258.0),
                ),
                Curve::new(
                    Point::new(230.0, 210.0),
                    Point::new(250.0, 238.0),
                    Point::new(282.0, 258.0),
                ),
            ],
            request_label: [
                LabelPlacement::new(-40.0, -13.0, TextAnchor::End),
                LabelPlacement::new(11.0, -9.0, TextAnchor::Start),
                LabelPlacement::new(40.0, -13.0, TextAnchor::Start),
            ],
            rail_label_y: 302.0,
        }
    }
}

impl DiagramLayout {
    pub fn validate(&self) -> HeroResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() || !self.rail_label_y.is_finite() {
            return Err(HeroError::NonFiniteGeometry("canvas"));
        }
        if !self.engine_center.is_finite() {
            return Err(HeroError::NonFiniteGeometry("engine center"));
        }
        if !self.agent_centers.iter().all(Point::is_finite) {
            return Err(HeroError::NonFiniteGeometry("agent centers"));
        }
        if !self.rail_centers.iter().all(Point::is_finite) {
            return Err(HeroError::NonFiniteGeometry("rail centers"));
        }
        if !self.agent_curves.iter().all(Curve::is_finite) {
            return Err(HeroError::NonFiniteGeometry("agent curves"));
        }
        if !self.rail_curves.iter().all(Curve::is_finite) {
            return Err(HeroError::NonFiniteGeometry("rail curves"));
        }
        if !self
            .request_label
            .iter()
            .all(|p| p.dx.is_finite() && p.dy.is_finite())
        {
            return Err(HeroError::NonFiniteGeometry("request label"));
        }
        Ok(())
    }
}

/// Staggered check pulses fired during Evaluate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckPulses {
    /// Window start per label, relative to the start of Evaluate
    pub offsets_ms: [f64; CHECK_COUNT],
    pub width_ms: f64,
}

impl Default for CheckPulses {
    fn default() -> Self {
        CheckPulses {
            offsets_ms: CHECK_PULSE_OFFSETS_MS,
            width_ms: CHECK_PULSE_WIDTH_MS,
        }
    }
}

impl CheckPulses {
    pub fn validate(&self) -> HeroResult<()> {
        if !self.width_ms.is_finite() || self.width_ms <= 0.0 {
            return Err(HeroError::InvalidCheckPulse {
                name: "width_ms",
                value: self.width_ms,
            });
        }
        for &offset in &self.offsets_ms {
            if !offset.is_finite() || offset < 0.0 {
                return Err(HeroError::InvalidCheckPulse {
                    name: "offsets_ms",
                    value: offset,
                });
            }
        }
        Ok(())
    }
}

/// Opacity profile for one family of tracks (agent curves or rail curves)
///
/// A selected track is on `standby` before the phase in which the packet
/// travels it, ramps from `travel_base` by up to `travel_gain` while the
/// packet travels, sits at `hold` until Reset, then fades from `fade_from`
/// by up to `fade_by`. Tracks not selected this cycle stay at `idle`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackOpacity {
    pub idle: f64,
    pub standby: f64,
    pub travel_base: f64,
    pub travel_gain: f64,
    pub hold: f64,
    pub fade_from: f64,
    pub fade_by: f64,
}

impl TrackOpacity {
    pub fn agents() -> Self {
        TrackOpacity {
            idle: 0.44,
            standby: 0.44,
            travel_base: 0.58,
            travel_gain: 0.38,
            hold: 0.95,
            fade_from: 0.92,
            fade_by: 0.5,
        }
    }

    pub fn rails() -> Self {
        TrackOpacity {
            idle: 0.36,
            standby: 0.45,
            travel_base: 0.48,
            travel_gain: 0.5,
            hold: 0.98,
            fade_from: 0.78,
            fade_by: 0.45,
        }
    }

    fn validate(&self, prefix: &'static str) -> HeroResult<()> {
        check_fraction(prefix, self.idle)?;
        check_fraction(prefix, self.standby)?;
        check_fraction(prefix, self.travel_base)?;
        check_fraction(prefix, self.travel_base + self.travel_gain)?;
        check_fraction(prefix, self.hold)?;
        check_fraction(prefix, self.fade_from)?;
        check_fraction(prefix, self.fade_from - self.fade_by)?;
        Ok(())
    }
}

/// Decision engine glow per phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlowLevels {
    pub request: f64,
    pub evaluate: f64,
    pub route: f64,
    pub reset: f64,
    /// Added while the host reports hover/focus
    pub hover_boost: f64,
}

impl Default for GlowLevels {
    fn default() -> Self {
        GlowLevels {
            request: 0.26,
            evaluate: 0.56,
            route: 0.42,
            reset: 0.26,
            hover_boost: 0.12,
        }
    }
}

impl GlowLevels {
    pub fn for_phase(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Request => self.request,
            Phase::Evaluate => self.evaluate,
            Phase::Route => self.route,
            Phase::Reset => self.reset,
        }
    }
}

/// Arrival ripple drawn at the destination rail near the end of Route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RippleStyle {
    /// Route progress at which the ripple starts
    pub start: f64,
    /// Route progress over which the ripple grows
    pub span: f64,
    pub ring_radius: f64,
    pub ring_growth: f64,
    pub ring_opacity: f64,
    pub dot_radius: f64,
    pub dot_growth: f64,
    pub dot_opacity: f64,
    /// Share of dot opacity lost by the end of the ripple
    pub dot_fade: f64,
}

impl Default for RippleStyle {
    fn default() -> Self {
        RippleStyle {
            start: 0.82,
            span: 0.18,
            ring_radius: 5.0,
            ring_growth: 8.0,
            ring_opacity: 0.65,
            dot_radius: 2.2,
            dot_growth: 1.4,
            dot_opacity: 0.7,
            dot_fade: 0.7,
        }
    }
}

/// Scalars shaping every derived opacity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolverTuning {
    pub agent_track: TrackOpacity,
    pub rail_track: TrackOpacity,
    /// Lowest dim factor, reached at the middle of Reset
    pub dim_floor: f64,
    pub glow: GlowLevels,
    /// Check label opacity outside Evaluate
    pub check_idle: f64,
    /// Check label opacity during Evaluate before its pulse
    pub check_floor: f64,
    /// Peak opacity of the active agent highlight
    pub highlight: f64,
    /// How much faster than Reset the highlight fades
    pub highlight_fade_rate: f64,
    /// Curve parameter of the node dot drawn on each agent curve
    pub node_position: f64,
    pub node_opacity: f64,
    pub node_box_opacity: f64,
    pub packet_opacity: f64,
    /// Curve parameter the request label hangs from
    pub request_label_position: f64,
    pub request_label_fade_in_start: f64,
    pub request_label_fade_in_span: f64,
    pub request_label_fade_out_ms: f64,
    pub rail_label_fade_in_start: f64,
    pub rail_label_fade_in_span: f64,
    /// Rail label fades out by `1 / rate` of Reset
    pub rail_label_fade_out_rate: f64,
    pub ripple: RippleStyle,
}

impl Default for ResolverTuning {
    fn default() -> Self {
        ResolverTuning {
            agent_track: TrackOpacity::agents(),
            rail_track: TrackOpacity::rails(),
            dim_floor: 0.66,
            glow: GlowLevels::default(),
            check_idle: 0.15,
            check_floor: 0.22,
            highlight: 0.28,
            highlight_fade_rate: 1.2,
            node_position: 0.56,
            node_opacity: 0.35,
            node_box_opacity: 0.96,
            packet_opacity: 0.98,
            request_label_position: 0.47,
            request_label_fade_in_start: 0.12,
            request_label_fade_in_span: 0.42,
            request_label_fade_out_ms: 260.0,
            rail_label_fade_in_start: 0.72,
            rail_label_fade_in_span: 0.2,
            rail_label_fade_out_rate: 2.4,
            ripple: RippleStyle::default(),
        }
    }
}

impl ResolverTuning {
    pub fn validate(&self) -> HeroResult<()> {
        self.agent_track.validate("agent_track")?;
        self.rail_track.validate("rail_track")?;

        check_fraction("dim_floor", self.dim_floor)?;
        check_fraction("glow.request", self.glow.request)?;
        check_fraction("glow.evaluate", self.glow.evaluate)?;
        check_fraction("glow.route", self.glow.route)?;
        check_fraction("glow.reset", self.glow.reset)?;
        check_fraction("glow.hover_boost", self.glow.hover_boost)?;
        // Hover adds on top of every phase level
        for &phase in Phase::all() {
            check_fraction("glow.hovered", self.glow.for_phase(phase) + self.glow.hover_boost)?;
        }
        check_fraction("check_idle", self.check_idle)?;
        check_fraction("check_floor", self.check_floor)?;
        check_fraction("highlight", self.highlight)?;
        check_fraction("node_position", self.node_position)?;
        check_fraction("node_opacity", self.node_opacity)?;
        check_fraction("node_box_opacity", self.node_box_opacity)?;
        check_fraction("packet_opacity", self.packet_opacity)?;
        check_fraction("request_label_position", self.request_label_position)?;
        check_fraction("request_label_fade_in_start", self.request_label_fade_in_start)?;
        check_fraction("rail_label_fade_in_start", self.rail_label_fade_in_start)?;
        check_fraction("ripple.start", self.ripple.start)?;
        check_fraction("ripple.ring_opacity", self.ripple.ring_opacity)?;
        check_fraction("ripple.dot_opacity", self.ripple.dot_opacity)?;
        check_fraction("ripple.dot_fade", self.ripple.dot_fade)?;

        // Divisors
        check_positive("request_label_fade_in_span", self.request_label_fade_in_span)?;
        check_positive("request_label_fade_out_ms", self.request_label_fade_out_ms)?;
        check_positive("rail_label_fade_in_span", self.rail_label_fade_in_span)?;
        check_positive("rail_label_fade_out_rate", self.rail_label_fade_out_rate)?;
        check_positive("highlight_fade_rate", self.highlight_fade_rate)?;
        check_positive("ripple.span", self.ripple.span)?;

        Ok(())
    }
}

fn check_fraction(name: &'static str, value: f64) -> HeroResult<()> {
    // Slack for rounding in summed bounds
    if value.is_finite() && (-1e-9..=1.0 + 1e-9).contains(&value) {
        Ok(())
    } else {
        Err(HeroError::FractionOutOfRange { name, value })
    }
}

fn check_positive(name: &'static str, value: f64) -> HeroResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(HeroError::FractionOutOfRange { name, value })
    }
}

/// Complete hero diagram configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub timings: PhaseTimings,
    pub layout: DiagramLayout,
    /// Agent slot per cycle, indexed by `cycle % len`
    pub agent_order: Vec<usize>,
    /// Rail slot per cycle, indexed by `cycle % len`
    pub rail_order: Vec<usize>,
    pub checks: CheckPulses,
    pub tuning: ResolverTuning,
}

impl Default for HeroConfig {
    fn default() -> Self {
        HeroConfig {
            timings: PhaseTimings::default(),
            layout: DiagramLayout::default(),
            agent_order: AGENT_ORDER.to_vec(),
            rail_order: RAIL_ORDER.to_vec(),
            checks: CheckPulses::default(),
            tuning: ResolverTuning::default(),
        }
    }
}

impl HeroConfig {
    /// Default diagram on the brisk loop
    pub fn brisk() -> Self {
        HeroConfig {
            timings: PhaseTimings::brisk(),
            checks: CheckPulses {
                offsets_ms: CHECK_PULSE_OFFSETS_MS.map(|offset| offset / 2.0),
                width_ms: CHECK_PULSE_WIDTH_MS / 2.0,
            },
            ..HeroConfig::default()
        }
    }

    pub fn with_timings(mut self, timings: PhaseTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Reject anything that could divide by zero or index out of bounds later
    pub fn validate(&self) -> HeroResult<()> {
        self.timings.validate()?;
        self.layout.validate()?;
        validate_order("agent", &self.agent_order, AGENT_COUNT)?;
        validate_order("rail", &self.rail_order, RAIL_COUNT)?;
        self.checks.validate()?;
        self.tuning.validate()?;
        Ok(())
    }
}

/// Round-robin orders must be non-empty and reference existing slots
pub fn validate_order(kind: &'static str, order: &[usize], available: usize) -> HeroResult<()> {
    if order.is_empty() {
        return Err(HeroError::EmptyOrder(kind));
    }
    if let Some(&slot) = order.iter().find(|&&slot| slot >= available) {
        return Err(HeroError::SlotOutOfRange {
            kind,
            slot,
            available,
        });
    }
    Ok(())
}
