//! Visual Parameter Resolver
//!
//! Combines phase, local progress and the active slots into a complete
//! `VisualFrame`. Pure: the same elapsed time and hover flag always
//! reproduce the same frame.

use hero_core::{
    ElapsedMs, HeroConfig, HeroResult, Phase, Point, ResolverTuning, TextAnchor, TrackOpacity,
    AGENT_COUNT, CHECK_COUNT, RAIL_COUNT,
};
use hero_time::{CyclePosition, PhaseEngine};
use tracing::debug;

use crate::{
    clamp01, ease_in_out_quad, point_on_curve, pulse, ramp, ActiveSlots, AgentVisual,
    CycleSelector, LabelVisual, Packet, RailVisual, Ripple, VisualFrame,
};

/// Phase progress and per-phase clocks for one instant
///
/// Progress of a phase is 0 before it and 1 after it within the cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseProgress {
    pub phase: Phase,
    pub request: f64,
    pub route: f64,
    pub reset: f64,
    /// Milliseconds into Evaluate, clamped to its duration
    pub evaluate_ms: f64,
}

impl PhaseProgress {
    pub fn from_position(engine: &PhaseEngine, position: &CyclePosition) -> Self {
        PhaseProgress {
            phase: position.phase,
            request: engine.progress_in(position, Phase::Request),
            route: engine.progress_in(position, Phase::Route),
            reset: engine.progress_in(position, Phase::Reset),
            evaluate_ms: engine.elapsed_in(position, Phase::Evaluate),
        }
    }
}

/// Resolver for one validated configuration
#[derive(Debug, Clone)]
pub struct Resolver {
    config: HeroConfig,
    engine: PhaseEngine,
    selector: CycleSelector,
}

impl Resolver {
    /// Validate configuration; fails fast on anything that could break resolve
    pub fn new(config: HeroConfig) -> HeroResult<Self> {
        config.validate()?;
        let engine = PhaseEngine::new(config.timings)?;
        let selector = CycleSelector::from_config(&config)?;
        debug!(
            cycle_ms = engine.cycle_length(),
            pairing_period = selector.period(),
            "hero resolver configured"
        );
        Ok(Resolver {
            config,
            engine,
            selector,
        })
    }

    pub fn config(&self) -> &HeroConfig {
        &self.config
    }

    pub fn engine(&self) -> &PhaseEngine {
        &self.engine
    }

    pub fn selector(&self) -> &CycleSelector {
        &self.selector
    }

    /// Locate an instant within the loop
    pub fn locate(&self, elapsed: ElapsedMs) -> CyclePosition {
        self.engine.locate(elapsed)
    }

    /// Resolve the full frame for an instant
    pub fn resolve(&self, elapsed: ElapsedMs, hovered: bool) -> VisualFrame {
        let position = self.engine.locate(elapsed);
        self.resolve_position(elapsed, &position, hovered)
    }

    /// Resolve from an already located position
    pub fn resolve_position(
        &self,
        elapsed: ElapsedMs,
        position: &CyclePosition,
        hovered: bool,
    ) -> VisualFrame {
        let active = self.selector.select(position.cycle_index);
        let progress = PhaseProgress::from_position(&self.engine, position);
        let tuning = &self.config.tuning;
        let layout = &self.config.layout;
        let phase = progress.phase;
        let dim = dim_factor(tuning, phase, progress.reset);

        let highlight_strength = if phase == Phase::Reset {
            1.0 - ease_in_out_quad(clamp01(progress.reset * tuning.highlight_fade_rate))
        } else {
            1.0
        };

        let agents: [AgentVisual; AGENT_COUNT] = std::array::from_fn(|i| {
            let is_active = i == active.agent;
            AgentVisual {
                active: is_active,
                track_opacity: dim
                    * track_opacity(
                        &tuning.agent_track,
                        Phase::Request,
                        is_active,
                        phase,
                        progress.request,
                        progress.reset,
                    ),
                node: point_on_curve(&layout.agent_curves[i], tuning.node_position),
                node_opacity: tuning.node_opacity * dim,
                box_opacity: tuning.node_box_opacity * dim,
                highlight: if is_active {
                    tuning.highlight * highlight_strength
                } else {
                    0.0
                },
            }
        });

        let rails: [RailVisual; RAIL_COUNT] = std::array::from_fn(|i| {
            let is_active = i == active.rail;
            RailVisual {
                active: is_active,
                track_opacity: dim
                    * track_opacity(
                        &tuning.rail_track,
                        Phase::Route,
                        is_active,
                        phase,
                        progress.route,
                        progress.reset,
                    ),
            }
        });

        let checks: [f64; CHECK_COUNT] = std::array::from_fn(|i| {
            let opacity = if phase == Phase::Evaluate {
                let wave = pulse(
                    progress.evaluate_ms,
                    self.config.checks.offsets_ms[i],
                    self.config.checks.width_ms,
                );
                tuning.check_floor + (1.0 - tuning.check_floor) * wave
            } else {
                tuning.check_idle
            };
            opacity * dim
        });

        let packet = match phase {
            Phase::Request => Some(point_on_curve(
                &layout.agent_curves[active.agent],
                ease_in_out_quad(progress.request),
            )),
            Phase::Evaluate => Some(layout.engine_center),
            Phase::Route => Some(point_on_curve(
                &layout.rail_curves[active.rail],
                ease_in_out_quad(progress.route),
            )),
            Phase::Reset => None,
        }
        .map(|at| Packet {
            position: at,
            opacity: tuning.packet_opacity,
        });

        let placement = layout.request_label[active.agent];
        let request_label = LabelVisual {
            position: point_on_curve(
                &layout.agent_curves[active.agent],
                tuning.request_label_position,
            )
            .offset(placement.dx, placement.dy),
            anchor: placement.anchor,
            opacity: request_label_opacity(tuning, &progress),
        };

        let rail_center = layout.rail_centers[active.rail];
        let rail_label = LabelVisual {
            position: Point::new(rail_center.x, layout.rail_label_y),
            anchor: TextAnchor::Middle,
            opacity: rail_label_opacity(tuning, &progress),
        };

        let ripple = if phase == Phase::Route {
            let q = ramp(progress.route, tuning.ripple.start, tuning.ripple.span);
            (q > 0.0).then(|| {
                let style = &tuning.ripple;
                Ripple {
                    center: rail_center,
                    ring_radius: style.ring_radius + q * style.ring_growth,
                    ring_opacity: style.ring_opacity * (1.0 - q),
                    dot_radius: style.dot_radius + q * style.dot_growth,
                    dot_opacity: style.dot_opacity * (1.0 - q * style.dot_fade),
                }
            })
        } else {
            None
        };

        VisualFrame {
            elapsed,
            cycle_index: position.cycle_index,
            phase,
            progress: position.progress,
            active,
            dim,
            glow: glow(tuning, phase, hovered),
            packet,
            agents,
            rails,
            checks,
            request_label,
            rail_label,
            ripple,
        }
    }
}

/// Global breathing scalar
///
/// 1 outside Reset. During Reset it falls linearly to `dim_floor` at the
/// midpoint and climbs back to 1 by the end.
pub fn dim_factor(tuning: &ResolverTuning, phase: Phase, reset_progress: f64) -> f64 {
    if phase != Phase::Reset {
        return 1.0;
    }
    let p = clamp01(reset_progress);
    let depth = 1.0 - tuning.dim_floor;
    if p < 0.5 {
        1.0 - depth * (p / 0.5)
    } else {
        tuning.dim_floor + depth * ((p - 0.5) / 0.5)
    }
}

/// Undimmed opacity of one track
///
/// `travel_phase` is the phase in which the packet moves along this family
/// of tracks; `travel_progress` is that phase's progress.
pub fn track_opacity(
    profile: &TrackOpacity,
    travel_phase: Phase,
    active: bool,
    phase: Phase,
    travel_progress: f64,
    reset_progress: f64,
) -> f64 {
    if !active {
        return profile.idle;
    }
    if phase == Phase::Reset {
        return profile.fade_from - profile.fade_by * ease_in_out_quad(reset_progress);
    }
    if phase == travel_phase {
        profile.travel_base + profile.travel_gain * ease_in_out_quad(travel_progress)
    } else if phase < travel_phase {
        profile.standby
    } else {
        profile.hold
    }
}

/// Decision engine glow before dimming
pub fn glow(tuning: &ResolverTuning, phase: Phase, hovered: bool) -> f64 {
    let boost = if hovered { tuning.glow.hover_boost } else { 0.0 };
    tuning.glow.for_phase(phase) + boost
}

/// Request label fades in through Request and out early in Evaluate
pub fn request_label_opacity(tuning: &ResolverTuning, progress: &PhaseProgress) -> f64 {
    match progress.phase {
        Phase::Request => ramp(
            progress.request,
            tuning.request_label_fade_in_start,
            tuning.request_label_fade_in_span,
        ),
        Phase::Evaluate => clamp01(1.0 - progress.evaluate_ms / tuning.request_label_fade_out_ms),
        _ => 0.0,
    }
}

/// Rail label fades in at the tail of Route and out early in Reset
pub fn rail_label_opacity(tuning: &ResolverTuning, progress: &PhaseProgress) -> f64 {
    match progress.phase {
        Phase::Route => ramp(
            progress.route,
            tuning.rail_label_fade_in_start,
            tuning.rail_label_fade_in_span,
        ),
        Phase::Reset => clamp01(1.0 - progress.reset * tuning.rail_label_fade_out_rate),
        _ => 0.0,
    }
}
