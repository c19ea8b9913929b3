//! Phase Engine - maps elapsed time onto the repeating four-phase cycle
//!
//! Phase is derived algebraically from the time within the cycle, never by
//! stepping, so no phase is skipped however coarse the ticks are.

use hero_core::{ElapsedMs, HeroResult, Phase, PhaseTimings};

/// Where an instant falls within the animation loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclePosition {
    /// floor(elapsed / cycle length)
    pub cycle_index: u64,
    /// elapsed mod cycle length, in [0, cycle length)
    pub cycle_time: f64,
    pub phase: Phase,
    /// Normalized progress within `phase`, in [0, 1]
    pub progress: f64,
    /// Milliseconds since `phase` began
    pub phase_elapsed: f64,
}

impl CyclePosition {
    /// Total order over (cycle, phase); never decreases as time moves forward
    pub fn sequence(&self) -> u64 {
        self.cycle_index
            .saturating_mul(Phase::count() as u64)
            .saturating_add(self.phase.ordinal() as u64)
    }
}

/// Phase engine configured with fixed durations
#[derive(Debug, Clone)]
pub struct PhaseEngine {
    timings: PhaseTimings,
    /// Cycle offset at which each phase ends
    ends: [f64; 4],
    cycle_length: f64,
}

impl PhaseEngine {
    /// Validate timings and precompute phase boundaries
    pub fn new(timings: PhaseTimings) -> HeroResult<Self> {
        timings.validate()?;

        let mut ends = [0.0; 4];
        let mut acc = 0.0;
        for (end, &phase) in ends.iter_mut().zip(Phase::all()) {
            acc += timings.duration(phase);
            *end = acc;
        }

        Ok(PhaseEngine {
            timings,
            ends,
            cycle_length: acc,
        })
    }

    pub fn timings(&self) -> &PhaseTimings {
        &self.timings
    }

    pub fn cycle_length(&self) -> f64 {
        self.cycle_length
    }

    /// Cycle offset where a phase begins
    pub fn phase_start(&self, phase: Phase) -> f64 {
        match phase.ordinal() {
            0 => 0.0,
            i => self.ends[i - 1],
        }
    }

    /// Cycle offset where a phase ends
    pub fn phase_end(&self, phase: Phase) -> f64 {
        self.ends[phase.ordinal()]
    }

    /// Split elapsed time into (cycle index, time within cycle)
    pub fn split(&self, elapsed: ElapsedMs) -> (u64, f64) {
        let ms = elapsed.as_millis();
        let index = (ms / self.cycle_length).floor();
        let mut cycle_time = ms - index * self.cycle_length;
        let mut cycle_index = index as u64;

        // Rounding can land exactly on either edge
        if cycle_time >= self.cycle_length {
            cycle_time -= self.cycle_length;
            cycle_index = cycle_index.saturating_add(1);
        }
        if cycle_time < 0.0 {
            cycle_time = 0.0;
        }

        (cycle_index, cycle_time)
    }

    pub fn cycle_index(&self, elapsed: ElapsedMs) -> u64 {
        self.split(elapsed).0
    }

    pub fn cycle_time(&self, elapsed: ElapsedMs) -> f64 {
        self.split(elapsed).1
    }

    /// Phase containing a time within the cycle
    pub fn phase_at(&self, cycle_time: f64) -> Phase {
        Phase::all()
            .iter()
            .copied()
            .find(|phase| cycle_time < self.phase_end(*phase))
            .unwrap_or(Phase::Reset)
    }

    /// Locate an instant within the loop
    pub fn locate(&self, elapsed: ElapsedMs) -> CyclePosition {
        let (cycle_index, cycle_time) = self.split(elapsed);
        let phase = self.phase_at(cycle_time);
        let phase_elapsed = cycle_time - self.phase_start(phase);

        CyclePosition {
            cycle_index,
            cycle_time,
            phase,
            progress: self.normalize(phase, phase_elapsed),
            phase_elapsed,
        }
    }

    /// Milliseconds spent in `phase` so far this cycle, clamped to its duration.
    /// Zero before the phase, the full duration after it.
    pub fn elapsed_in(&self, position: &CyclePosition, phase: Phase) -> f64 {
        let into = position.cycle_time - self.phase_start(phase);
        into.clamp(0.0, self.timings.duration(phase))
    }

    /// Progress of `phase` this cycle: 0 before it, 1 after it
    pub fn progress_in(&self, position: &CyclePosition, phase: Phase) -> f64 {
        if position.phase == phase {
            return position.progress;
        }
        if position.phase < phase {
            0.0
        } else {
            1.0
        }
    }

    fn normalize(&self, phase: Phase, phase_elapsed: f64) -> f64 {
        let duration = self.timings.duration(phase);
        if duration > 0.0 {
            (phase_elapsed / duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_core::HeroError;
    use proptest::prelude::*;

    fn engine() -> PhaseEngine {
        PhaseEngine::new(PhaseTimings::default()).unwrap()
    }

    fn at(engine: &PhaseEngine, ms: f64) -> CyclePosition {
        engine.locate(ElapsedMs::from_millis(ms))
    }

    #[test]
    fn test_phase_boundaries() {
        let engine = engine();
        assert_eq!(engine.cycle_length(), 7000.0);

        let cases = [
            (0.0, Phase::Request, 0),
            (1500.0, Phase::Evaluate, 0),
            (3000.0, Phase::Route, 0),
            (5000.0, Phase::Reset, 0),
            (7000.0, Phase::Request, 1),
        ];
        for (ms, phase, cycle) in cases {
            let pos = at(&engine, ms);
            assert_eq!(pos.phase, phase, "at {ms}ms");
            assert_eq!(pos.cycle_index, cycle, "at {ms}ms");
            assert_eq!(pos.progress, 0.0, "at {ms}ms");
        }
    }

    #[test]
    fn test_local_progress() {
        let engine = engine();

        assert_eq!(at(&engine, 750.0).progress, 0.5);
        assert_eq!(at(&engine, 2250.0).progress, 0.5);
        assert_eq!(at(&engine, 4000.0).progress, 0.5);
        assert_eq!(at(&engine, 6000.0).progress, 0.5);

        let pos = at(&engine, 6999.0);
        assert_eq!(pos.phase, Phase::Reset);
        assert!(pos.progress < 1.0 && pos.progress > 0.99);
    }

    #[test]
    fn test_phase_elapsed() {
        let engine = engine();
        let pos = at(&engine, 7000.0 * 3.0 + 2200.0);

        assert_eq!(pos.cycle_index, 3);
        assert_eq!(pos.phase, Phase::Evaluate);
        assert_eq!(pos.phase_elapsed, 700.0);
    }

    #[test]
    fn test_progress_in_other_phases() {
        let engine = engine();
        let pos = at(&engine, 4000.0); // middle of Route

        assert_eq!(engine.progress_in(&pos, Phase::Request), 1.0);
        assert_eq!(engine.progress_in(&pos, Phase::Evaluate), 1.0);
        assert_eq!(engine.progress_in(&pos, Phase::Route), 0.5);
        assert_eq!(engine.progress_in(&pos, Phase::Reset), 0.0);

        assert_eq!(engine.elapsed_in(&pos, Phase::Evaluate), 1500.0);
        assert_eq!(engine.elapsed_in(&pos, Phase::Reset), 0.0);
    }

    #[test]
    fn test_zero_length_phase_is_never_entered() {
        let engine = PhaseEngine::new(PhaseTimings::new(1000.0, 0.0, 1000.0, 1000.0)).unwrap();

        let pos = at(&engine, 1000.0);
        assert_eq!(pos.phase, Phase::Route);
        assert_eq!(engine.progress_in(&pos, Phase::Evaluate), 1.0);
        assert_eq!(engine.elapsed_in(&pos, Phase::Evaluate), 0.0);
    }

    #[test]
    fn test_invalid_timings_rejected() {
        assert_eq!(
            PhaseEngine::new(PhaseTimings::new(0.0, 0.0, 0.0, 0.0)).unwrap_err(),
            HeroError::ZeroCycleLength(0.0)
        );
        assert!(PhaseEngine::new(PhaseTimings::new(1.0, 1.0, -1.0, 1.0)).is_err());
    }

    #[test]
    fn test_sequence_orders_phases_across_cycles() {
        let engine = engine();
        let reset = at(&engine, 6500.0);
        let next_request = at(&engine, 7001.0);
        assert!(next_request.sequence() > reset.sequence());
        assert_eq!(next_request.sequence(), reset.sequence() + 1);
    }

    proptest! {
        #[test]
        fn prop_position_in_range(ms in 0.0f64..1.0e9) {
            let engine = engine();
            let pos = at(&engine, ms);

            prop_assert!(pos.cycle_time >= 0.0);
            prop_assert!(pos.cycle_time < engine.cycle_length());
            prop_assert!((0.0..=1.0).contains(&pos.progress));
            prop_assert!(pos.cycle_time >= engine.phase_start(pos.phase));
            prop_assert!(pos.cycle_time < engine.phase_end(pos.phase));
        }

        #[test]
        fn prop_sequence_never_goes_backward(a in 0.0f64..1.0e7, b in 0.0f64..1.0e7) {
            let engine = engine();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(at(&engine, lo).sequence() <= at(&engine, hi).sequence());
        }

        #[test]
        fn prop_arbitrary_timings_partition_cycle(
            req in 0.0f64..5000.0,
            eval in 0.0f64..5000.0,
            route in 0.0f64..5000.0,
            reset in 1.0f64..5000.0,
            ms in 0.0f64..1.0e6,
        ) {
            let engine = PhaseEngine::new(PhaseTimings::new(req, eval, route, reset)).unwrap();
            let pos = at(&engine, ms);

            prop_assert!(engine.timings().duration(pos.phase) > 0.0);
            prop_assert!(pos.phase_elapsed >= 0.0);
            prop_assert!(pos.phase_elapsed <= engine.timings().duration(pos.phase) + 1e-6);
        }
    }
}
