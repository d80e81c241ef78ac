#![forbid(unsafe_code)]

//! Property-based invariant tests for the step model engine.
//!
//! ## Invariants
//!
//! 1. Step view fields are always within `0..=steps`.
//! 2. A write produces exactly one model notification carrying both fields.
//! 3. Init normalization is idempotent.
//! 4. Reconciliation preserves the step view observed right after a bounds
//!    change.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;

use stepmodel_runtime::{Bounds, LinearConfig, Observable, StepBounds, StepModel, StepModelOptions};

// ── Strategies ────────────────────────────────────────────────────────────

fn arb_bounds() -> impl Strategy<Value = Bounds> {
    (0.0_f64..100_000.0, 10.0_f64..1_000_000.0).prop_map(|(min, span)| Bounds::new(min, min + span))
}

fn arb_linear() -> impl Strategy<Value = Option<LinearConfig>> {
    prop_oneof![
        1 => Just(None),
        3 => (1.0_f64..500_000.0, 1.0_f64..=99.0)
            .prop_map(|(max_linear, pct)| Some(LinearConfig::new(max_linear, pct))),
    ]
}

fn arb_step_pair(steps: u32) -> impl Strategy<Value = StepBounds> {
    (0..=steps, 0..=steps).prop_map(|(a, b)| StepBounds::new(a.min(b), a.max(b)))
}

fn arb_setup() -> impl Strategy<Value = (u32, Bounds, Option<LinearConfig>, StepBounds)> {
    (1_u32..2_000, arb_bounds(), arb_linear()).prop_flat_map(|(steps, bounds, linear)| {
        (Just(steps), Just(bounds), Just(linear), arb_step_pair(steps))
    })
}

// ── 1. Step view range ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn step_view_stays_in_range(
        steps in 1_u32..5_000,
        bounds in arb_bounds(),
        linear in arb_linear(),
        min in -1.0e7_f64..1.0e7,
        max in -1.0e7_f64..1.0e7,
    ) {
        let model = Observable::new(Bounds::new(min, max));
        let sm = StepModel::builder(model, steps, bounds)
            .linear_config(linear)
            .build()
            .expect("build");
        let view = sm.get();
        prop_assert!(view.min <= steps);
        prop_assert!(view.max <= steps);
    }
}

// ── 2. Atomic commit ──────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn write_commits_once((steps, bounds, linear, pair) in arb_setup()) {
        let model = Observable::new(Bounds::new(f64::NAN, f64::NAN));
        let sm = StepModel::builder(model.clone(), steps, bounds)
            .linear_config(linear)
            .build()
            .expect("build");

        let notifications = Rc::new(Cell::new(0u32));
        let notifications_clone = Rc::clone(&notifications);
        let _sub = model.subscribe(move |_| notifications_clone.set(notifications_clone.get() + 1));

        sm.set(pair).expect("identity beautifier never fails");

        prop_assert_eq!(notifications.get(), 1);
        prop_assert_eq!(model.get(), Bounds::new(sm.step_to_model(pair.min), sm.step_to_model(pair.max)));
    }
}

// ── 3. Init idempotence ───────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn init_normalization_is_idempotent(
        steps in 1_u32..2_000,
        bounds in arb_bounds(),
        linear in arb_linear(),
        fraction_min in 0.0_f64..=1.0,
        fraction_max in 0.0_f64..=1.0,
    ) {
        let raw = Bounds::new(
            bounds.min + bounds.span() * fraction_min.min(fraction_max),
            bounds.min + bounds.span() * fraction_min.max(fraction_max),
        );
        let model = Observable::new(raw);
        let options = StepModelOptions::new().fix_model_on_init(true);

        let _first = StepModel::builder(model.clone(), steps, bounds)
            .linear_config(linear)
            .options(options.clone())
            .build()
            .expect("build");
        let version = model.version();
        let normalized = model.get();

        let _second = StepModel::builder(model.clone(), steps, bounds)
            .linear_config(linear)
            .options(options)
            .build()
            .expect("build");

        prop_assert_eq!(model.version(), version);
        prop_assert_eq!(model.get(), normalized);
    }
}

// ── 4. Reconciliation preserves the step ──────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn reconciliation_preserves_step(
        (steps, before, linear, pair) in arb_setup(),
        after in arb_bounds(),
    ) {
        let model = Observable::new(before);
        let bounds = Observable::new(before);
        let sm = StepModel::builder(model.clone(), steps, &bounds)
            .linear_config(linear)
            .options(StepModelOptions::new().watch_bounds(true))
            .build()
            .expect("build");

        sm.set(pair).expect("write");
        bounds.set(after);
        let anchored = sm.get();

        sm.scheduler().flush();

        prop_assert!(sm.scheduler().is_idle());
        prop_assert_eq!(sm.get(), anchored);
        let value = model.get();
        prop_assert!(value.min >= after.min && value.max <= after.max);
    }
}
