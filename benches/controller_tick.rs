//! Controller Tick Benchmarks
//!
//! Measures the per-tick cost of the correction path. Every tick must stay
//! constant-time to keep up with high polling rates.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

use lamco_aim_assist::assist::{
    AssistConfig, DebtController, EasingCurve, ManualClock, PotentialAttractor, Vector2,
};

/// Controller with two discrete targets seen and outstanding debt
fn primed_controller(continuous: bool) -> (DebtController<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let mut controller =
        DebtController::with_clock(AssistConfig::default(), clock.clone(), Vector2::ZERO)
            .expect("default config is valid");

    controller.set_target(40.0, 0.0, continuous).unwrap();
    for _ in 0..20 {
        clock.advance(Duration::from_micros(500));
        controller.apply_delta(2.0, 0.5).unwrap();
    }
    clock.advance(Duration::from_millis(1));
    controller.set_target(120.0, 30.0, continuous).unwrap();

    (controller, clock)
}

fn bench_easing(c: &mut Criterion) {
    let curve = EasingCurve::new(175.0, 250.0, 0.5, 5.0, 0.5, 500.0, false).unwrap();

    c.bench_function("easing_ratio", |b| {
        let mut x = 0.0;
        b.iter(|| {
            x = (x + 7.3) % 500.0;
            black_box(curve.evaluate_as_ratio(black_box(x)))
        })
    });
}

fn bench_attractor(c: &mut Criterion) {
    let attractor = PotentialAttractor::default();
    let target = Vector2::new(720.0, 500.0);

    c.bench_function("attract_inside_radius", |b| {
        b.iter(|| attractor.attract(black_box(Vector2::new(650.0, 470.0)), black_box(target)))
    });

    c.bench_function("attract_outside_radius", |b| {
        b.iter(|| attractor.attract(black_box(Vector2::new(100.0, 100.0)), black_box(target)))
    });
}

fn bench_apply_delta(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_delta");

    for (name, continuous) in [("discrete", false), ("continuous", true)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &continuous, |b, &continuous| {
            let (mut controller, clock) = primed_controller(continuous);
            let mut sign = 1.0;
            b.iter(|| {
                clock.advance(Duration::from_micros(500));
                sign = -sign;
                black_box(controller.apply_delta(black_box(1.5 * sign), black_box(0.5)))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_easing, bench_attractor, bench_apply_delta);
criterion_main!(benches);
