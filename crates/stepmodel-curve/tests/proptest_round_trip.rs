#![forbid(unsafe_code)]

//! Property tests for the step curve.
//!
//! Validates:
//! - Every step survives a step → model → step round trip.
//! - Step output is always within `0..=steps`.
//! - Model output is always within the source bounds.
//! - `step_to_model` is monotonically non-decreasing.

use proptest::prelude::*;

use stepmodel_curve::{Bounds, ExponentialCurve, LinearConfig};

// ============================================================================
// Strategy helpers
// ============================================================================

fn bounds_strategy() -> impl Strategy<Value = Bounds> {
    (0.0_f64..1_000_000.0, 1.0_f64..1_000_000.0).prop_map(|(min, span)| Bounds::new(min, min + span))
}

fn linear_strategy() -> impl Strategy<Value = Option<LinearConfig>> {
    prop_oneof![
        1 => Just(None),
        3 => (0.0_f64..2_000_000.0, 0.0_f64..=100.0)
            .prop_map(|(max_linear, pct)| Some(LinearConfig::new(max_linear, pct))),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn step_round_trip_is_exact(
        steps in 1_u32..2_000,
        bounds in bounds_strategy(),
        linear in linear_strategy(),
    ) {
        let curve = ExponentialCurve::new(steps, bounds, linear.as_ref());
        for step in 0..=steps {
            let model = curve.step_to_model(step);
            prop_assert_eq!(curve.model_to_step(model), step, "model={}", model);
        }
    }

    #[test]
    fn outputs_stay_in_range(
        steps in 1_u32..5_000,
        bounds in bounds_strategy(),
        linear in linear_strategy(),
        model in -1e7_f64..1e7,
        step in 0_u32..10_000,
    ) {
        let curve = ExponentialCurve::new(steps, bounds, linear.as_ref());
        prop_assert!(curve.model_to_step(model) <= steps);
        let value = curve.step_to_model(step);
        prop_assert!(value >= bounds.min && value <= bounds.max, "value={}", value);
    }

    #[test]
    fn step_to_model_is_monotone(
        steps in 1_u32..1_000,
        bounds in bounds_strategy(),
        linear in linear_strategy(),
    ) {
        let curve = ExponentialCurve::new(steps, bounds, linear.as_ref());
        let mut previous = curve.step_to_model(0);
        for step in 1..=steps {
            let next = curve.step_to_model(step);
            prop_assert!(next >= previous, "step {} went from {} to {}", step, previous, next);
            previous = next;
        }
    }
}
