//! End-to-end timeline checks through the driver

use hero_core::{HeroConfig, Phase, PhaseTimings};
use hero_test::{run_script, Step};
use hero_visual::VisualFrame;
use proptest::prelude::*;

fn frames_at(times: &[f64]) -> Vec<VisualFrame> {
    let mut steps = vec![Step::Show];
    let mut now = 0.0;
    for &t in times {
        steps.push(Step::Advance(t - now));
        steps.push(Step::Frame);
        now = t;
    }
    run_script(HeroConfig::default(), &steps).unwrap()
}

#[test]
fn test_phase_boundaries() {
    let frames = frames_at(&[0.0, 1_500.0, 3_000.0, 5_000.0, 7_000.0]);
    let phases: Vec<Phase> = frames.iter().map(|f| f.phase).collect();
    assert_eq!(
        phases,
        vec![
            Phase::Request,
            Phase::Evaluate,
            Phase::Route,
            Phase::Reset,
            Phase::Request
        ]
    );
    for frame in &frames {
        assert_eq!(frame.progress, 0.0, "at {}", frame.elapsed);
    }
    assert_eq!(frames[3].cycle_index, 0);
    assert_eq!(frames[4].cycle_index, 1);
}

#[test]
fn test_rotation_across_cycles() {
    let frames = frames_at(&[0.0, 7_000.0, 14_000.0, 21_000.0, 28_000.0]);
    let agents: Vec<usize> = frames.iter().map(|f| f.active.agent).collect();
    let rails: Vec<usize> = frames.iter().map(|f| f.active.rail).collect();
    assert_eq!(agents, vec![1, 2, 0, 1, 2]);
    assert_eq!(rails, vec![0, 1, 0, 1, 0]);
}

#[test]
fn test_one_cycle_storyboard() {
    let frames = frames_at(&[750.0, 2_500.0, 4_000.0, 6_000.0]);
    let (request, evaluate, route, reset) = (&frames[0], &frames[1], &frames[2], &frames[3]);

    // Packet travels during the first three phases and is gone on Reset
    assert!(request.packet.is_some());
    assert!(evaluate.packet.is_some());
    assert!(route.packet.is_some());
    assert!(reset.packet.is_none());

    // Only Reset breathes
    assert_eq!(request.dim, 1.0);
    assert_eq!(route.dim, 1.0);
    assert!((reset.dim - 0.66).abs() < 1e-9);

    // Route arrival ripple only near the end of Route
    assert!(route.ripple.is_none());

    // The active agent's track is brightest while its packet travels
    let active = request.active_agent().track_opacity;
    let idle = request.agents[(request.active.agent + 1) % 3].track_opacity;
    assert!(active > idle);
}

#[test]
fn test_pause_mid_route_then_resume() {
    let paused = run_script(
        HeroConfig::default(),
        &[
            Step::Show,
            Step::Advance(4_000.0),
            Step::Frame,
            Step::Hide,
            Step::Advance(123_456.0),
            Step::Frame,
            Step::Show,
            Step::Advance(16.0),
            Step::Frame,
        ],
    )
    .unwrap();

    assert_eq!(paused[0].phase, Phase::Route);
    assert_eq!(paused[1], paused[0]);
    assert_eq!(paused[2].elapsed.as_millis(), 4_016.0);
    assert_eq!(paused[2].phase, Phase::Route);
}

#[test]
fn test_brisk_preset_halves_cycle() {
    let frames = run_script(
        HeroConfig::brisk(),
        &[Step::Show, Step::Advance(3_500.0), Step::Frame],
    )
    .unwrap();
    assert_eq!(frames[0].cycle_index, 1);
    assert_eq!(frames[0].phase, Phase::Request);
}

#[test]
fn test_zero_duration_phase_is_skipped() {
    let config =
        HeroConfig::default().with_timings(PhaseTimings::new(1_000.0, 0.0, 1_000.0, 1_000.0));
    let frames = run_script(
        config,
        &[
            Step::Show,
            Step::Advance(999.0),
            Step::Frame,
            Step::Advance(1.0),
            Step::Frame,
        ],
    )
    .unwrap();
    assert_eq!(frames[0].phase, Phase::Request);
    assert_eq!(frames[1].phase, Phase::Route);
}

proptest! {
    /// Pausing shifts the timeline by the paused span and nothing else
    #[test]
    fn prop_pause_shifts_timeline(
        before in 0.0f64..20_000.0,
        paused in 0.0f64..100_000.0,
        after in 0.0f64..20_000.0,
    ) {
        let interrupted = run_script(
            HeroConfig::default(),
            &[
                Step::Show,
                Step::Advance(before),
                Step::Hide,
                Step::Advance(paused),
                Step::Show,
                Step::Advance(after),
                Step::Frame,
            ],
        )
        .unwrap();
        let straight = run_script(
            HeroConfig::default(),
            &[Step::Show, Step::Advance(before + after), Step::Frame],
        )
        .unwrap();

        let a = &interrupted[0];
        let b = &straight[0];
        prop_assert!((a.elapsed.as_millis() - b.elapsed.as_millis()).abs() < 1e-6);
        prop_assert!((a.elapsed.as_millis() - (before + after)).abs() < 1e-6);
    }

    /// Hover never changes anything but glow
    #[test]
    fn prop_hover_isolated(at in 0.0f64..50_000.0) {
        let frames = run_script(
            HeroConfig::default(),
            &[
                Step::Show,
                Step::Advance(at),
                Step::Frame,
                Step::Hover(true),
                Step::Frame,
            ],
        )
        .unwrap();

        let mut hovered = frames[1].clone();
        prop_assert!(hovered.glow > frames[0].glow);
        hovered.glow = frames[0].glow;
        prop_assert_eq!(&hovered, &frames[0]);
    }
}
