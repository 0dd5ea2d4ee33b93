use approx::assert_relative_eq;
use proptest::prelude::*;

use crate::clock::{CycleSplit, MAX_ADAPTIVE_CYCLES, MAX_SUBSTEPS, SimulationClock, StepControl};

#[test]
fn test_quiet_field_uses_base_step() {
    let control = StepControl::default();
    let dt = control.step_for(control.dt_base, control.noise_floor * 0.5);

    assert_eq!(dt, control.dt_base);
}

#[test]
fn test_courant_condition_between_bounds() {
    let control = StepControl::default();
    // 0.3 * sqrt(2 / 5000) = 0.006
    let dt = control.step_for(control.dt_base, 5_000.0);

    assert_relative_eq!(dt, 0.006, epsilon = 1e-12);
}

#[test]
fn test_non_finite_acceleration_uses_minimum() {
    let control = StepControl::default();

    assert_eq!(control.step_for(control.dt_base, f64::NAN), control.dt_min);
    assert_eq!(control.step_for(control.dt_base, f64::INFINITY), control.dt_min);
}

#[test]
fn test_short_substep_never_goes_below_minimum() {
    let control = StepControl::default();

    assert_eq!(control.step_for(0.0005, 0.0), control.dt_min);
    assert_eq!(control.step_for(0.004, 0.0), 0.004);
}

#[test]
fn test_split_adds_tail_cycle() {
    let control = StepControl::default();
    let split = control.split(0.016, 5_000.0);
    let steps: Vec<f64> = split.steps().collect();

    assert_eq!(steps.len(), 3);
    assert_relative_eq!(steps[0], 0.006, epsilon = 1e-12);
    assert_relative_eq!(steps[2], 0.004, epsilon = 1e-12);
    assert_relative_eq!(split.stepped(), 0.016, epsilon = 1e-12);
    assert_relative_eq!(split.last(), 0.004, epsilon = 1e-12);
}

#[test]
fn test_split_refines_instead_of_short_tail() {
    let control = StepControl::default();
    // 0.3 * sqrt(2 / 11250) = 0.004; the rest 0.0005 is below dt_min
    let split = control.split(0.0085, 11_250.0);

    assert_eq!(split.cycles, 3);
    assert_relative_eq!(split.dt, 0.0085 / 3.0, epsilon = 1e-12);
    assert_eq!(split.tail, 0.0);
    assert_eq!(split.deferred, 0.0);
}

#[test]
fn test_split_defers_what_cannot_be_stepped() {
    let control = StepControl::default();
    let split = control.split(0.0008, 0.0);

    assert_eq!(split.steps().count(), 0);
    assert_eq!(split.stepped(), 0.0);
    assert_relative_eq!(split.deferred, 0.0008, epsilon = 1e-15);
}

#[test]
fn test_floored_step_defers_short_rest() {
    let control = StepControl::default();
    // Stiff field pins dt at dt_min; 0.0015 leaves 0.0005 over
    let split = control.split(0.0015, 1.0e12);

    assert_eq!(split.cycles, 1);
    assert_eq!(split.dt, control.dt_min);
    assert_relative_eq!(split.deferred, 0.0005, epsilon = 1e-12);
}

#[test]
fn test_invalid_bounds_rejected() {
    let control = StepControl {
        dt_min: 0.1,
        dt_base: 0.01,
        ..StepControl::default()
    };

    assert!(control.validate().is_err());
    assert!(StepControl::default().validate().is_ok());
}

#[test]
fn test_step_ratio_beyond_cycle_cap_rejected() {
    let control = StepControl {
        dt_base: 0.016,
        dt_min: 0.016 / (MAX_ADAPTIVE_CYCLES as f64 * 2.0),
        ..StepControl::default()
    };

    assert!(control.validate().is_err());
}

#[test]
fn test_paused_clock_plans_nothing() {
    let mut clock = SimulationClock::new(StepControl::default(), 1.0, true);

    assert!(clock.plan(0.016).is_none());
}

#[test]
fn test_degenerate_frames_plan_nothing() {
    let mut clock = SimulationClock::new(StepControl::default(), 1.0, false);

    assert!(clock.plan(0.0).is_none());
    assert!(clock.plan(-1.0).is_none());
    assert!(clock.plan(f64::NAN).is_none());

    let mut stopped = SimulationClock::new(StepControl::default(), 0.0, false);
    assert!(stopped.plan(0.016).is_none());
}

#[test]
fn test_time_scale_splits_frame() {
    let mut clock = SimulationClock::new(StepControl::default(), 3.0, false);
    let plan = clock.plan(0.016).unwrap();

    assert_eq!(plan.substeps, 3);
    assert_relative_eq!(plan.base, 0.016, epsilon = 1e-12);
    assert_relative_eq!(plan.simulated_time(), 0.048, epsilon = 1e-12);
}

#[test]
fn test_long_frames_are_capped() {
    let mut clock = SimulationClock::new(StepControl::default(), 1.0, false);
    let plan = clock.plan(10.0).unwrap();

    assert_eq!(plan.substeps, MAX_SUBSTEPS);
    assert!(plan.base <= StepControl::default().dt_base);
    assert_eq!(clock.carry, 0.0);
}

#[test]
fn test_short_frames_are_carried() {
    let mut clock = SimulationClock::new(StepControl::default(), 0.05, false);

    // 0.016 * 0.05 = 0.0008, below dt_min
    let first = clock.plan(0.016).unwrap();
    assert_eq!(first.substeps, 0);
    assert_relative_eq!(clock.carry, 0.0008, epsilon = 1e-15);

    let second = clock.plan(0.016).unwrap();
    assert_eq!(second.substeps, 1);
    assert_relative_eq!(second.base, 0.0016, epsilon = 1e-15);
    assert!(clock.carry < 1e-15);
}

#[test]
fn test_wide_minimum_keeps_substeps_above_it() {
    let control = StepControl {
        dt_base: 0.016,
        dt_min: 0.012,
        ..StepControl::default()
    };
    let mut clock = SimulationClock::new(control, 1.0, false);
    let plan = clock.plan(0.02).unwrap();

    // Two even substeps of 0.01 would dip below dt_min
    assert_eq!(plan.substeps, 1);
    assert_eq!(plan.base, 0.016);
    assert_relative_eq!(clock.carry, 0.004, epsilon = 1e-12);
}

#[test]
fn test_record_advances_time() {
    let mut clock = SimulationClock::new(StepControl::default(), 1.0, false);
    let full = CycleSplit { dt: 0.004, cycles: 4, tail: 0.0, deferred: 0.0 };
    let short = CycleSplit { dt: 0.005, cycles: 3, tail: 0.0, deferred: 0.001 };
    clock.record(&full);
    clock.record(&short);
    clock.finish_tick();

    assert_relative_eq!(clock.time, 0.031, epsilon = 1e-12);
    assert_eq!(clock.last_dt, 0.005);
    assert_relative_eq!(clock.carry, 0.001, epsilon = 1e-15);
    assert_eq!(clock.ticks, 1);
}

proptest! {
    #[test]
    fn prop_adaptive_step_within_bounds(a_max in prop_oneof![
        Just(0.0),
        Just(f64::INFINITY),
        0.0f64..1.0e-3,
        0.0f64..1.0e12,
    ]) {
        let control = StepControl::default();
        let dt = control.step_for(control.dt_base, a_max);

        prop_assert!(dt <= control.dt_base);
        prop_assert!(dt >= control.dt_min);
    }

    #[test]
    fn prop_split_steps_within_bounds(
        base in 1.0e-4f64..0.016,
        a_max in prop_oneof![Just(0.0), Just(f64::NAN), 0.0f64..1.0e12],
    ) {
        let control = StepControl::default();
        let split = control.split(base, a_max);
        let courant = control.step_for(base, a_max);

        for h in split.steps() {
            prop_assert!(h >= control.dt_min * (1.0 - 1e-12));
            prop_assert!(h <= control.dt_base);
            prop_assert!(h <= courant * (1.0 + 1e-9));
        }
        prop_assert!(split.cycles <= MAX_ADAPTIVE_CYCLES + 1);
        prop_assert!(split.deferred < control.dt_min);
        prop_assert!((split.stepped() + split.deferred - base).abs() < 1e-9);
    }

    #[test]
    fn prop_plan_substeps_within_bounds(frame in 1.0e-6f64..1.0, scale in 0.01f64..10.0) {
        let control = StepControl::default();
        let mut clock = SimulationClock::new(control, scale, false);
        let plan = clock.plan(frame).unwrap();

        prop_assert!(plan.substeps <= MAX_SUBSTEPS);
        if plan.substeps > 0 {
            prop_assert!(plan.base >= control.dt_min);
            prop_assert!(plan.base <= control.dt_base * (1.0 + 1e-12));
        } else {
            prop_assert!(clock.carry < control.dt_min);
        }
    }
}
