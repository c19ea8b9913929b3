//! Benchmarks for the hero frame loop

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use hero_core::HeroConfig;
use hero_runtime::HeroDriver;
use hero_test::{FrameCadence, HeroSimulator, SignalModel, HOST_EPOCH_MS};
use hero_time::ManualSource;

fn bench_driver_frame(c: &mut Criterion) {
    let host = ManualSource::at(HOST_EPOCH_MS);
    let mut driver = HeroDriver::new(HeroConfig::default(), host.clone()).unwrap();
    driver.set_visible(true);

    c.bench_function("driver_frame", |b| {
        b.iter(|| {
            host.advance(16.7);
            black_box(driver.frame())
        })
    });
}

fn bench_driver_hidden_frame(c: &mut Criterion) {
    let host = ManualSource::at(HOST_EPOCH_MS);
    let mut driver = HeroDriver::new(HeroConfig::default(), host.clone()).unwrap();

    c.bench_function("driver_hidden_frame", |b| {
        b.iter(|| {
            host.advance(16.7);
            black_box(driver.frame())
        })
    });
}

fn bench_visibility_toggle(c: &mut Criterion) {
    let host = ManualSource::at(HOST_EPOCH_MS);
    let mut driver = HeroDriver::new(HeroConfig::default(), host.clone()).unwrap();

    c.bench_function("visibility_toggle", |b| {
        let mut visible = false;
        b.iter(|| {
            visible = !visible;
            host.advance(1.0);
            driver.set_visible(black_box(visible));
        })
    });
}

fn bench_simulated_minute(c: &mut Criterion) {
    c.bench_function("simulate_one_minute_scrolling", |b| {
        b.iter(|| {
            let mut sim = HeroSimulator::new(
                HeroConfig::default(),
                FrameCadence::janky(),
                SignalModel::scrolling(),
                black_box(9),
            )
            .unwrap();
            black_box(sim.run(60_000.0).frames)
        })
    });
}

criterion_group!(
    benches,
    bench_driver_frame,
    bench_driver_hidden_frame,
    bench_visibility_toggle,
    bench_simulated_minute,
);

criterion_main!(benches);
