//! Controller integration tests
//!
//! Drives the public controller API the way a polling loop would.

use std::time::Duration;

use lamco_aim_assist::assist::{
    AssistConfig, AssistError, AssistMode, AssistPhase, CurveConfig, DebtController, EasingCurve,
    ManualClock, Vector2,
};
use proptest::prelude::*;

fn controller() -> (DebtController<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    let controller =
        DebtController::with_clock(AssistConfig::default(), clock.clone(), Vector2::ZERO)
            .expect("default config is valid");
    (controller, clock)
}

#[test]
fn test_distance_curve_scenario() {
    let curve = EasingCurve::new(175.0, 250.0, 0.5, 5.0, 0.5, 500.0, false).unwrap();

    assert_eq!(curve.evaluate_as_ratio(0.0), 0.0);
    assert_eq!(curve.evaluate_as_ratio(500.0), 1.0);

    let at_a = curve.evaluate_as_ratio(175.0);
    let at_b = curve.evaluate_as_ratio(250.0);
    let at_s = curve.evaluate_as_ratio(500.0);
    assert!(at_a < at_b && at_b < at_s);
}

#[test]
fn test_default_curves_match_presets() {
    let config = AssistConfig::default();
    assert_eq!(config.distance_curve, CurveConfig::distance());
    assert_eq!(config.time_curve, CurveConfig::time());
    assert_eq!(config.speed_curve, CurveConfig::speed());
}

#[test]
fn test_invalid_breakpoints_fail_construction() {
    let mut config = AssistConfig::default();
    config.distance_curve.a = 600.0;

    let result = DebtController::with_clock(config, ManualClock::new(), Vector2::ZERO);
    assert!(matches!(
        result,
        Err(AssistError::InvalidBreakpoints { .. })
    ));
}

#[test]
fn test_session_of_discrete_targets() {
    let (mut controller, clock) = controller();
    controller.reset(Vector2::new(400.0, 300.0)).unwrap();
    assert_eq!(controller.phase(), AssistPhase::Idle);

    // Approach the first target; the field pulls the output ahead of the pointer
    controller.set_target(480.0, 300.0, false).unwrap();
    let mut last = Vector2::ZERO;
    for _ in 0..20 {
        clock.advance(Duration::from_micros(500));
        last = controller.apply_delta(2.0, 0.0).unwrap().unwrap();
    }
    assert!(last.x > controller.real_position().x);

    // Jump to the next target: the drift becomes debt
    clock.advance(Duration::from_millis(3));
    controller.set_target(800.0, 300.0, false).unwrap();
    let debt = controller.real_position() - controller.last_position();
    assert_eq!(controller.debt(), debt);
    assert!(debt.x < 0.0);

    // With time passing, repayment pushes the output back toward the real path
    let mut outputs = Vec::new();
    for _ in 0..1000 {
        clock.advance(Duration::from_micros(500));
        let out = controller.apply_delta(0.1, 0.0).unwrap().unwrap();
        outputs.push(out);
    }
    let final_out = *outputs.last().unwrap();
    let real = controller.real_position();
    // Outside the new target's field, output = real + ratio * debt
    let repayment = final_out - real;
    assert!(repayment.x <= 0.0);
    assert!(repayment.x >= debt.x * controller.config().debt_paying_speed - 1e-12);
    assert_eq!(controller.debt(), debt);
    assert_eq!(controller.phase(), AssistPhase::Active(AssistMode::Discrete));
}

#[test]
fn test_continuous_tracking() {
    let (mut controller, clock) = controller();
    controller.set_target(20.0, 0.0, true).unwrap();

    for step in 1..=50 {
        clock.advance(Duration::from_millis(1));
        controller
            .set_target(20.0 + step as f64, 0.0, true)
            .unwrap();
        controller.apply_delta(1.0, 0.0).unwrap();
    }

    assert_eq!(controller.mode(), AssistMode::Continuous);
    assert_eq!(controller.stats().retargets, 51);
    // Damped deltas: 50 * 0.7
    assert!((controller.real_position().x - 35.0).abs() < 1e-9);
    assert!(controller.last_position().is_finite());
}

#[test]
fn test_nan_inputs_are_rejected_without_side_effects() {
    let (mut controller, clock) = controller();
    controller.set_target(50.0, 50.0, false).unwrap();
    clock.advance(Duration::from_millis(1));
    controller.apply_delta(3.0, 3.0).unwrap();

    let real = controller.real_position();
    let last = controller.last_position();

    assert!(matches!(
        controller.apply_delta(f64::NAN, 0.0),
        Err(AssistError::InvalidPosition(_, _))
    ));
    assert!(matches!(
        controller.apply_delta(0.0, f64::INFINITY),
        Err(AssistError::InvalidPosition(_, _))
    ));
    assert!(matches!(
        controller.set_target(f64::NAN, f64::NAN, true),
        Err(AssistError::InvalidPosition(_, _))
    ));

    assert!(controller.real_position().bit_eq(real));
    assert!(controller.last_position().bit_eq(last));
    assert_eq!(controller.mode(), AssistMode::Discrete);
    assert_eq!(controller.stats().rejected_inputs, 3);

    // Controller keeps working afterwards
    assert!(controller.apply_delta(1.0, 0.0).unwrap().is_some());
}

#[test]
fn test_duplicate_retarget_in_same_tick() {
    let (mut controller, clock) = controller();
    controller.set_target(50.0, 0.0, false).unwrap();
    controller.apply_delta(10.0, 0.0).unwrap();
    clock.advance(Duration::from_millis(2));

    controller.set_target(90.0, 0.0, false).unwrap();
    let state = *controller.state();
    controller.set_target(90.0, 0.0, false).unwrap();
    assert_eq!(*controller.state(), state);
}

proptest! {
    #[test]
    fn prop_outputs_stay_finite(
        deltas in prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 1..200),
        targets in prop::collection::vec((0.0f64..1920.0, 0.0f64..1080.0, any::<bool>()), 1..10),
        step_us in 100u64..5000,
    ) {
        let (mut controller, clock) = controller();
        controller.reset(Vector2::new(960.0, 540.0)).unwrap();

        let per_target = (deltas.len() / targets.len()).max(1);
        let mut targets = targets.into_iter();

        for (i, (dx, dy)) in deltas.into_iter().enumerate() {
            if i % per_target == 0 {
                if let Some((x, y, continuous)) = targets.next() {
                    controller.set_target(x, y, continuous).unwrap();
                }
            }
            clock.advance(Duration::from_micros(step_us));
            if let Some(out) = controller.apply_delta(dx, dy).unwrap() {
                prop_assert!(out.is_finite());
            }
        }
    }

    #[test]
    fn prop_sub_unit_debt_is_never_repaid(
        tx in 0.1f64..1.9,
        continuous in any::<bool>(),
        wait_ms in 0u64..5000,
    ) {
        let (mut controller, clock) = controller();
        // A target this close pulls the output by less than one pixel
        controller.set_target(tx, 0.0, continuous).unwrap();
        controller.apply_delta(0.01, 0.0).unwrap();
        clock.advance(Duration::from_millis(1));
        controller.set_target(500.0, 0.0, continuous).unwrap();
        prop_assert!(controller.debt().length() < 1.0);

        clock.advance(Duration::from_millis(wait_ms));
        prop_assert_eq!(controller.mitigate_error(), Vector2::ZERO);
    }
}
