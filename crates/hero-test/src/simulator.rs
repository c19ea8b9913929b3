//! Hero Simulator - Frame loop harness over a manual host clock
//!
//! Simulates:
//! - Irregular frame cadence (jitter, dropped frames, background stalls)
//! - Visibility flicker while the page scrolls
//! - Hover toggles
//! - Host clock regressions
//!
//! Every resolved frame is checked against the driver's invariants and
//! failures are collected rather than panicking, so a run reports all of
//! them at once.

use hero_core::{HeroConfig, HeroResult, Phase};
use hero_runtime::{DriverStats, HeroDriver};
use hero_time::ManualSource;
use hero_visual::VisualFrame;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

/// Host timestamp at which every simulation begins
pub const HOST_EPOCH_MS: f64 = 10_000.0;

/// Smallest gap between two simulated frames (ms)
const MIN_FRAME_MS: f64 = 1.0;

const OPACITY_EPSILON: f64 = 1e-9;
const STEP_EPSILON: f64 = 1e-6;

/// Frame delivery model
#[derive(Clone, Debug)]
pub struct FrameCadence {
    /// Nominal frame interval (ms)
    pub interval_ms: f64,
    /// Uniform jitter added to each interval (ms)
    pub jitter_ms: f64,
    /// Probability a frame is dropped, doubling the interval
    pub drop_rate: f64,
    /// Probability of a long stall, as in a throttled background tab
    pub stall_rate: f64,
    /// Stall length (ms)
    pub stall_ms: f64,
}

impl FrameCadence {
    pub fn new(interval_ms: f64, jitter_ms: f64, drop_rate: f64) -> Self {
        FrameCadence {
            interval_ms,
            jitter_ms,
            drop_rate,
            stall_rate: 0.0,
            stall_ms: 0.0,
        }
    }

    /// Perfect 60fps
    pub fn steady_60fps() -> Self {
        Self::new(1000.0 / 60.0, 0.0, 0.0)
    }

    /// 60fps with jitter and frequent drops
    pub fn janky() -> Self {
        Self::new(1000.0 / 60.0, 6.0, 0.1)
    }

    /// Mostly smooth with occasional second-long stalls
    pub fn throttled() -> Self {
        FrameCadence {
            stall_rate: 0.01,
            stall_ms: 1_000.0,
            ..Self::new(1000.0 / 60.0, 2.0, 0.02)
        }
    }

    /// Draw the next frame interval
    pub fn next_interval(&self, rng: &mut StdRng) -> f64 {
        let mut dt = self.interval_ms;
        if self.jitter_ms > 0.0 {
            dt += rng.gen_range(-self.jitter_ms..=self.jitter_ms);
        }
        if chance(rng, self.drop_rate) {
            dt += self.interval_ms;
        }
        if chance(rng, self.stall_rate) {
            dt += self.stall_ms;
        }
        dt.max(MIN_FRAME_MS)
    }
}

impl Default for FrameCadence {
    fn default() -> Self {
        Self::steady_60fps()
    }
}

/// External signal and host clock disturbance model
#[derive(Clone, Debug, Default)]
pub struct SignalModel {
    /// Per-frame probability the on-screen fraction is resampled
    pub scroll_rate: f64,
    /// Per-frame probability hover flips
    pub hover_rate: f64,
    /// Per-frame probability the host clock steps backwards
    pub regression_rate: f64,
    /// Size of a host clock regression (ms)
    pub regression_ms: f64,
}

impl SignalModel {
    /// Always visible, never hovered, monotonic host
    pub fn quiet() -> Self {
        SignalModel::default()
    }

    /// User scrolling past the diagram and hovering it
    pub fn scrolling() -> Self {
        SignalModel {
            scroll_rate: 0.02,
            hover_rate: 0.01,
            ..Default::default()
        }
    }

    /// Scrolling plus a misbehaving host clock
    pub fn hostile() -> Self {
        SignalModel {
            scroll_rate: 0.05,
            hover_rate: 0.05,
            regression_rate: 0.01,
            regression_ms: 250.0,
        }
    }
}

/// Invariant failure observed on one frame
#[derive(Clone, Debug, PartialEq)]
pub enum Violation {
    ElapsedRegressed { frame: u64, from: f64, to: f64 },
    SequenceRegressed { frame: u64, from: u64, to: u64 },
    HiddenAdvance { frame: u64, step: f64 },
    StepExceedsHost { frame: u64, step: f64, host: f64 },
    OpacityOutOfRange { frame: u64, value: f64 },
    NonFinitePosition { frame: u64 },
}

/// Position in the global phase sequence
pub fn frame_sequence(frame: &VisualFrame) -> u64 {
    frame
        .cycle_index
        .saturating_mul(Phase::count() as u64)
        .saturating_add(frame.phase.ordinal() as u64)
}

/// Every position a renderer would place something at
fn frame_positions_finite(frame: &VisualFrame) -> bool {
    let packet = frame.packet.map_or(true, |p| p.position.is_finite());
    let ripple = frame.ripple.map_or(true, |r| {
        r.center.is_finite() && r.ring_radius.is_finite() && r.dot_radius.is_finite()
    });
    packet
        && ripple
        && frame.agents.iter().all(|a| a.node.is_finite())
        && frame.request_label.position.is_finite()
        && frame.rail_label.position.is_finite()
}

/// Simulation result and statistics
#[derive(Debug, Default)]
pub struct SimulationResult {
    /// Frames resolved
    pub frames: u64,
    /// Frames resolved while the driver was hidden
    pub hidden_frames: u64,
    /// Frames per phase, indexed by ordinal
    pub phase_frames: [u64; 4],
    /// Largest elapsed step between consecutive frames (ms)
    pub max_step_ms: f64,
    /// Elapsed animation time at the last frame (ms)
    pub final_elapsed_ms: f64,
    /// Highest cycle index reached
    pub max_cycle: u64,
    pub violations: Vec<Violation>,
    /// Driver counters at the end of the run
    pub stats: DriverStats,
    /// Elapsed and sequence of the previous frame
    last: Option<(f64, u64)>,
}

impl SimulationResult {
    pub fn new() -> Self {
        SimulationResult::default()
    }

    /// Check one frame. `host_dt` is the host clock delta since the
    /// previous frame and `visible` the driver state while it elapsed.
    pub fn record(&mut self, frame: &VisualFrame, host_dt: f64, visible: bool) {
        let index = self.frames;
        self.frames += 1;
        if !visible {
            self.hidden_frames += 1;
        }
        self.phase_frames[frame.phase.ordinal()] += 1;
        self.max_cycle = self.max_cycle.max(frame.cycle_index);

        let elapsed = frame.elapsed.as_millis();
        let sequence = frame_sequence(frame);

        if let Some((last_elapsed, last_sequence)) = self.last {
            let step = elapsed - last_elapsed;
            if step < 0.0 {
                self.violations.push(Violation::ElapsedRegressed {
                    frame: index,
                    from: last_elapsed,
                    to: elapsed,
                });
            }
            if sequence < last_sequence {
                self.violations.push(Violation::SequenceRegressed {
                    frame: index,
                    from: last_sequence,
                    to: sequence,
                });
            }
            if !visible && step.abs() > STEP_EPSILON {
                self.violations
                    .push(Violation::HiddenAdvance { frame: index, step });
            }
            if step > host_dt.max(0.0) + STEP_EPSILON {
                self.violations.push(Violation::StepExceedsHost {
                    frame: index,
                    step,
                    host: host_dt,
                });
            }
            self.max_step_ms = self.max_step_ms.max(step);
        }

        for value in frame.opacities() {
            if !(-OPACITY_EPSILON..=1.0 + OPACITY_EPSILON).contains(&value) {
                self.violations
                    .push(Violation::OpacityOutOfRange { frame: index, value });
            }
        }
        if !frame_positions_finite(frame) {
            self.violations
                .push(Violation::NonFinitePosition { frame: index });
        }

        self.final_elapsed_ms = elapsed;
        self.last = Some((elapsed, sequence));
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Frames spent in `phase`
    pub fn frames_in(&self, phase: Phase) -> u64 {
        self.phase_frames[phase.ordinal()]
    }
}

/// Hero diagram simulation
pub struct HeroSimulator {
    host: ManualSource,
    driver: HeroDriver<ManualSource>,
    cadence: FrameCadence,
    signals: SignalModel,
    rng: StdRng,
    /// Simulated wall time, unaffected by host regressions
    wall_ms: f64,
}

impl HeroSimulator {
    pub fn new(
        config: HeroConfig,
        cadence: FrameCadence,
        signals: SignalModel,
        seed: u64,
    ) -> HeroResult<Self> {
        let host = ManualSource::at(HOST_EPOCH_MS);
        let driver = HeroDriver::new(config, host.clone())?;
        Ok(HeroSimulator {
            host,
            driver,
            cadence,
            signals,
            rng: StdRng::seed_from_u64(seed),
            wall_ms: 0.0,
        })
    }

    pub fn driver(&self) -> &HeroDriver<ManualSource> {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut HeroDriver<ManualSource> {
        &mut self.driver
    }

    pub fn host(&self) -> &ManualSource {
        &self.host
    }

    /// Simulated wall time since the simulator was created (ms)
    pub fn wall_ms(&self) -> f64 {
        self.wall_ms
    }

    /// Show the diagram and run frames for `duration_ms` of wall time
    pub fn run(&mut self, duration_ms: f64) -> SimulationResult {
        let mut result = SimulationResult::new();

        self.driver.set_visible(true);
        let first = self.driver.frame();
        result.record(&first, 0.0, true);

        let end = self.wall_ms + duration_ms.max(0.0);
        while self.wall_ms < end {
            self.step(&mut result);
        }

        result.stats = self.driver.stats().clone();
        debug!(
            frames = result.frames,
            cycles = result.max_cycle,
            violations = result.violations.len(),
            "hero simulation finished"
        );
        result
    }

    /// Deliver one frame
    fn step(&mut self, result: &mut SimulationResult) {
        self.apply_signals();

        let dt = self.cadence.next_interval(&mut self.rng);
        self.wall_ms += dt;

        let mut host_dt = dt;
        if chance(&mut self.rng, self.signals.regression_rate) {
            host_dt -= self.signals.regression_ms;
            trace!(host_dt, "injecting host clock regression");
        }
        self.host.advance(host_dt);

        let visible = self.driver.is_visible();
        let frame = self.driver.frame();
        result.record(&frame, host_dt, visible);
    }

    fn apply_signals(&mut self) {
        if chance(&mut self.rng, self.signals.scroll_rate) {
            let fraction = self.rng.gen_range(0.0..=1.0);
            self.driver.set_visible_fraction(fraction);
        }
        if chance(&mut self.rng, self.signals.hover_rate) {
            let hovered = !self.driver.is_hovered();
            self.driver.set_hovered(hovered);
        }
    }
}

fn chance(rng: &mut StdRng, probability: f64) -> bool {
    probability > 0.0 && rng.gen_bool(probability.min(1.0))
}

/// One scripted host action
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Step {
    /// Advance the host clock (ms)
    Advance(f64),
    Show,
    Hide,
    Hover(bool),
    /// Resolve and keep a frame
    Frame,
}

/// Run a fixed script against a fresh driver, returning the kept frames
pub fn run_script(config: HeroConfig, steps: &[Step]) -> HeroResult<Vec<VisualFrame>> {
    let host = ManualSource::at(HOST_EPOCH_MS);
    let mut driver = HeroDriver::new(config, host.clone())?;
    let mut frames = Vec::new();

    for step in steps {
        match *step {
            Step::Advance(ms) => host.advance(ms),
            Step::Show => driver.set_visible(true),
            Step::Hide => driver.set_visible(false),
            Step::Hover(hovered) => driver.set_hovered(hovered),
            Step::Frame => frames.push(driver.frame()),
        }
    }

    Ok(frames)
}

/// Predefined simulation scenarios
pub mod scenarios {
    use super::*;

    /// Always on screen at a perfect 60fps
    pub fn steady(seed: u64) -> HeroResult<HeroSimulator> {
        HeroSimulator::new(
            HeroConfig::default(),
            FrameCadence::steady_60fps(),
            SignalModel::quiet(),
            seed,
        )
    }

    /// Janky frames while the user scrolls past
    pub fn scrolling(seed: u64) -> HeroResult<HeroSimulator> {
        HeroSimulator::new(
            HeroConfig::default(),
            FrameCadence::janky(),
            SignalModel::scrolling(),
            seed,
        )
    }

    /// Stalls, flicker and a host clock that steps backwards
    pub fn hostile(seed: u64) -> HeroResult<HeroSimulator> {
        HeroSimulator::new(
            HeroConfig::brisk(),
            FrameCadence::throttled(),
            SignalModel::hostile(),
            seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_core::ElapsedMs;

    #[test]
    fn test_steady_run() {
        crate::init_tracing();
        let mut sim = scenarios::steady(1).unwrap();
        let result = sim.run(70_000.0);

        assert!(result.is_clean(), "{:?}", result.violations);
        assert_eq!(result.hidden_frames, 0);
        assert!((result.final_elapsed_ms - sim.wall_ms()).abs() < 1e-3);
        assert!(result.max_cycle >= 9);
        assert_eq!(result.stats.cycles_completed, result.max_cycle);
        for phase in Phase::all() {
            assert!(result.frames_in(*phase) > 0, "{phase} never resolved");
        }
    }

    #[test]
    fn test_scrolling_run() {
        crate::init_tracing();
        let mut sim = scenarios::scrolling(7).unwrap();
        let result = sim.run(120_000.0);

        assert!(result.is_clean(), "{:?}", result.violations);
        assert!(result.hidden_frames > 0);
        // Time spent hidden is never replayed
        assert!(result.final_elapsed_ms <= sim.wall_ms() + 1e-3);
    }

    #[test]
    fn test_hostile_run() {
        crate::init_tracing();
        for seed in 0..8 {
            let mut sim = scenarios::hostile(seed).unwrap();
            let result = sim.run(60_000.0);
            assert!(result.is_clean(), "seed {seed}: {:?}", result.violations);
        }
    }

    #[test]
    fn test_runs_are_deterministic() {
        let a = scenarios::scrolling(42).unwrap().run(30_000.0);
        let b = scenarios::scrolling(42).unwrap().run(30_000.0);
        assert_eq!(a.frames, b.frames);
        assert_eq!(a.hidden_frames, b.hidden_frames);
        assert_eq!(a.final_elapsed_ms, b.final_elapsed_ms);
        assert_eq!(a.stats, b.stats);
    }

    #[test]
    fn test_record_flags_regression() {
        let frames = run_script(
            HeroConfig::default(),
            &[Step::Show, Step::Advance(2_000.0), Step::Frame, Step::Frame],
        )
        .unwrap();

        let mut result = SimulationResult::new();
        result.record(&frames[0], 0.0, true);
        let mut earlier = frames[1].clone();
        earlier.elapsed = ElapsedMs::from_millis(100.0);
        result.record(&earlier, 16.0, true);

        assert!(matches!(
            result.violations.first(),
            Some(Violation::ElapsedRegressed { frame: 1, .. })
        ));
    }

    #[test]
    fn test_record_flags_hidden_advance() {
        let frames = run_script(
            HeroConfig::default(),
            &[Step::Show, Step::Frame, Step::Advance(500.0), Step::Frame],
        )
        .unwrap();

        let mut result = SimulationResult::new();
        result.record(&frames[0], 0.0, true);
        result.record(&frames[1], 500.0, false);
        assert_eq!(
            result.violations,
            vec![Violation::HiddenAdvance {
                frame: 1,
                step: 500.0
            }]
        );
    }

    #[test]
    fn test_script_pause_resume() {
        let frames = run_script(
            HeroConfig::default(),
            &[
                Step::Show,
                Step::Advance(1_000.0),
                Step::Frame,
                Step::Hide,
                Step::Advance(60_000.0),
                Step::Frame,
                Step::Show,
                Step::Frame,
            ],
        )
        .unwrap();

        assert_eq!(frames[0].elapsed.as_millis(), 1_000.0);
        assert_eq!(frames[1].elapsed.as_millis(), 1_000.0);
        assert_eq!(frames[2].elapsed.as_millis(), 1_000.0);
    }

    #[test]
    fn test_cadence_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let cadence = FrameCadence::janky();
        for _ in 0..1_000 {
            let dt = cadence.next_interval(&mut rng);
            assert!(dt >= MIN_FRAME_MS);
            assert!(dt <= 2.0 * cadence.interval_ms + cadence.jitter_ms);
        }
    }
}
