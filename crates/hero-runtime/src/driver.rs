//! Hero driver - frame loop wiring clock, external signals and resolver
//!
//! The host calls `frame()` once per animation frame, one call at a time.
//! Visibility and hover are owned by the host and pushed in; the driver
//! never polls for them.

use hero_core::{ElapsedMs, HeroConfig, HeroResult, Phase};
use hero_time::{Clock, ClockState, CyclePosition, MonotonicSource, TimeSource};
use hero_visual::{Resolver, VisualFrame};
use tracing::{debug, trace, warn};

/// Share of the diagram that must be on screen for the clock to run
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.45;

/// Driver counters
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DriverStats {
    pub frames: u64,
    pub cycles_completed: u64,
    pub starts: u64,
    pub stops: u64,
    pub phase_changes: u64,
    pub last_phase: Option<Phase>,
}

/// Hero diagram driver
pub struct HeroDriver<S: TimeSource = MonotonicSource> {
    clock: Clock<S>,
    resolver: Resolver,
    visible: bool,
    hovered: bool,
    visibility_threshold: f64,
    last_position: Option<CyclePosition>,
    stats: DriverStats,
}

impl HeroDriver<MonotonicSource> {
    /// Driver on the OS monotonic clock
    pub fn monotonic(config: HeroConfig) -> HeroResult<Self> {
        Self::new(config, MonotonicSource::new())
    }
}

impl<S: TimeSource> HeroDriver<S> {
    /// Create a hidden, stopped driver. Fails on invalid configuration.
    pub fn new(config: HeroConfig, source: S) -> HeroResult<Self> {
        let resolver = Resolver::new(config)?;
        Ok(HeroDriver {
            clock: Clock::new(source),
            resolver,
            visible: false,
            hovered: false,
            visibility_threshold: DEFAULT_VISIBILITY_THRESHOLD,
            last_position: None,
            stats: DriverStats::default(),
        })
    }

    /// Override the visible share. Non-finite input keeps the default.
    pub fn with_visibility_threshold(mut self, threshold: f64) -> Self {
        self.visibility_threshold = if threshold.is_finite() {
            threshold.clamp(0.0, 1.0)
        } else {
            warn!(threshold, "non-finite visibility threshold, using default");
            DEFAULT_VISIBILITY_THRESHOLD
        };
        self
    }

    /// Visibility signal: visible starts the clock, hidden stops it
    pub fn set_visible(&mut self, visible: bool) {
        if visible == self.visible {
            return;
        }
        self.visible = visible;

        if visible {
            self.clock.start();
            self.stats.starts += 1;
        } else {
            self.clock.stop();
            self.stats.stops += 1;
        }
        debug!(visible, elapsed = %self.clock.elapsed(), "hero visibility changed");
    }

    /// Visibility signal as an on-screen fraction in [0, 1]
    pub fn set_visible_fraction(&mut self, fraction: f64) {
        self.set_visible(fraction >= self.visibility_threshold);
    }

    /// Hover/focus signal; affects only the decision engine glow
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Advance the clock (if running) and resolve the current frame
    pub fn frame(&mut self) -> VisualFrame {
        let elapsed = self.clock.tick();
        let position = self.resolver.locate(elapsed);
        self.observe(&position);
        self.stats.frames += 1;
        self.resolver.resolve_position(elapsed, &position, self.hovered)
    }

    /// Resolve the frame at the last sampled time without advancing
    pub fn peek(&self) -> VisualFrame {
        self.resolver.resolve(self.clock.elapsed(), self.hovered)
    }

    pub fn elapsed(&self) -> ElapsedMs {
        self.clock.elapsed()
    }

    pub fn clock_state(&self) -> ClockState {
        self.clock.state()
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    pub fn stats(&self) -> &DriverStats {
        &self.stats
    }

    fn observe(&mut self, position: &CyclePosition) {
        if let Some(last) = self.last_position {
            if position.sequence() != last.sequence() {
                self.stats.phase_changes += 1;
                trace!(
                    from = %last.phase,
                    to = %position.phase,
                    cycle = position.cycle_index,
                    "hero phase transition"
                );
            }
            self.stats.cycles_completed += position.cycle_index.saturating_sub(last.cycle_index);
        }
        self.stats.last_phase = Some(position.phase);
        self.last_position = Some(*position);
    }
}
