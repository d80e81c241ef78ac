#![forbid(unsafe_code)]

//! Bidirectional synchronization between a model range and a step range.
//!
//! # Design
//!
//! A [`StepModel`] keeps two views of the same selection consistent:
//!
//! - the **model** bounds, in domain units, owned by the caller as an
//!   [`Observable<Bounds>`];
//! - the **step view**, integer slider positions in `0..=steps`, derived
//!   from the model through the current range transform.
//!
//! The transform is rebuilt whenever the step count, the source bounds, or
//! the linear configuration changes, and cached otherwise. The step view is
//! cached against the model value plus the transform inputs.
//!
//! Writes flow the other way: a step pair is converted through the current
//! transform, beautified per field, and committed to the model as one value.
//!
//! # Reconciliation
//!
//! When the source bounds change, the old model value lands on some step of
//! the new transform, but the model itself is stale. With
//! [`StepModelOptions::watch_bounds`] the engine queues a correction on its
//! [`Scheduler`] that re-derives the model from that step, so the step
//! position survives and the model drifts slightly to what the step now
//! means. The correction is visible only after the scheduler is flushed.
//!
//! [`StepModelOptions::fix_model_on_init`] applies the same correction once,
//! synchronously, at construction.
//!
//! # Invariants
//!
//! 1. Step view fields are always in `0..=steps`.
//! 2. Both model fields are committed together or not at all.
//! 3. Reconciliation and init normalization never write a value that is
//!    structurally equal to the current one.
//! 4. After reconciliation the step view equals the step view observed
//!    right after the bounds change.

pub mod beautifier;
pub mod options;

pub use beautifier::{Field, ModelBeautifier};
pub use options::StepModelOptions;

use std::cell::RefCell;
use std::rc::Rc;

use stepmodel_curve::{
    Bounds, ExponentialCurveFactory, LinearConfig, RangeTransform, ResolvedConfig, StepBounds,
    TransformFactory,
};
use tracing::{debug, debug_span, warn};

use crate::error::Result;
use crate::reactive::{Memo, Observable, Scheduler, Source, Subscription};

/// Fingerprint of everything the range transform depends on.
#[derive(Debug, Clone, PartialEq)]
struct TransformInputs {
    steps: u32,
    bounds: Bounds,
    linear: Option<LinearConfig>,
}

type SharedTransform = Rc<dyn RangeTransform>;

struct Engine {
    model: Observable<Bounds>,
    bounds: Source<Bounds>,
    beautifier: ModelBeautifier,
    transform: Memo<TransformInputs, SharedTransform>,
    step_view: Memo<(Bounds, TransformInputs), StepBounds>,
    /// Source bounds at construction or at the last reconciliation.
    last_bounds: RefCell<Bounds>,
    scheduler: Scheduler,
}

impl Engine {
    fn new(
        model: Observable<Bounds>,
        steps: Source<u32>,
        bounds: Source<Bounds>,
        linear: Source<Option<LinearConfig>>,
        beautifier: ModelBeautifier,
        factory: Rc<dyn TransformFactory>,
        scheduler: Scheduler,
    ) -> Self {
        let inputs: Rc<dyn Fn() -> TransformInputs> = {
            let bounds = bounds.clone();
            Rc::new(move || TransformInputs {
                steps: steps.get(),
                bounds: bounds.get(),
                linear: linear.get(),
            })
        };

        let transform = {
            let inputs = Rc::clone(&inputs);
            Memo::new(
                move || inputs(),
                move |i: &TransformInputs| -> SharedTransform {
                    debug!(
                        steps = i.steps,
                        min = i.bounds.min,
                        max = i.bounds.max,
                        linear = i.linear.is_some(),
                        "rebuilding range transform"
                    );
                    Rc::from(factory.build(i.steps, i.bounds, i.linear.as_ref()))
                },
            )
        };

        let step_view = {
            let model = model.clone();
            let transform = transform.clone();
            Memo::new(
                move || (model.get(), inputs()),
                move |(value, _): &(Bounds, TransformInputs)| {
                    let transform = transform.get();
                    value.map(|v| transform.model_to_step(v))
                },
            )
        };

        let last_bounds = RefCell::new(bounds.get());
        Self {
            model,
            bounds,
            beautifier,
            transform,
            step_view,
            last_bounds,
            scheduler,
        }
    }

    /// Model value for `steps` under the current transform, beautified.
    /// Computes both fields before returning so callers commit all or nothing.
    fn derive_model(&self, steps: StepBounds) -> Result<Bounds> {
        let transform = self.transform.get();
        let min = self
            .beautifier
            .apply(transform.step_to_model(steps.min), Field::Min)?;
        let max = self
            .beautifier
            .apply(transform.step_to_model(steps.max), Field::Max)?;
        Ok(Bounds::new(min, max))
    }

    fn write(&self, steps: StepBounds) -> Result<()> {
        let _span = debug_span!("step_model.write", step_min = steps.min, step_max = steps.max)
            .entered();
        let next = self.derive_model(steps)?;
        let changed = self.model.set(next);
        debug!(min = next.min, max = next.max, changed, "committed step write");
        Ok(())
    }

    fn normalize(&self) -> Result<bool> {
        let _span = debug_span!("step_model.init_fix").entered();
        let current = self.model.get();
        let corrected = self.derive_model(self.step_view.get())?;
        if corrected == current {
            debug!("initial model already consistent with bounds");
            return Ok(false);
        }
        self.model.set(corrected);
        debug!(
            from_min = current.min,
            from_max = current.max,
            to_min = corrected.min,
            to_max = corrected.max,
            "normalized initial model"
        );
        Ok(true)
    }

    fn reconcile(&self) -> Result<bool> {
        let _span = debug_span!("step_model.reconcile").entered();
        let current_bounds = self.bounds.get();
        if *self.last_bounds.borrow() == current_bounds {
            debug!("source bounds structurally unchanged; skipping");
            return Ok(false);
        }

        // Step view under the new transform, before the model is touched.
        let anchored = self.step_view.get();
        let next = self.derive_model(anchored)?;
        *self.last_bounds.borrow_mut() = current_bounds;

        let previous = self.model.get();
        let changed = self.model.set(next);
        debug!(
            step_min = anchored.min,
            step_max = anchored.max,
            from_min = previous.min,
            to_min = next.min,
            from_max = previous.max,
            to_max = next.max,
            changed,
            "re-anchored model to new bounds"
        );
        Ok(changed)
    }

    fn schedule_reconcile(this: &Rc<Self>) -> bool {
        let key = Rc::as_ptr(this) as *const () as usize;
        let weak = Rc::downgrade(this);
        let queued = this.scheduler.next_tick_keyed(key, move || {
            if let Some(engine) = weak.upgrade()
                && let Err(err) = engine.reconcile()
            {
                warn!(error = %err, "bounds reconciliation failed; model left unchanged");
            }
        });
        debug!(coalesced = !queued, "bounds change queued for reconciliation");
        queued
    }
}

/// Read/write step view over an externally owned model range.
///
/// # Usage
///
/// ```ignore
/// let model = Observable::new(Bounds::new(25_491.0, 125_000.0));
/// let step_model = StepModel::builder(model.clone(), 1_000_u32, Bounds::new(500.0, 125_000.0))
///     .linear_config(LinearConfig::new(15_000.0, 75.0))
///     .build()?;
///
/// assert_eq!(step_model.get(), StepBounds::new(826, 1_000));
/// step_model.set(StepBounds::new(500, 985))?;
/// assert_eq!(model.get().min, 10_500.0);
/// ```
pub struct StepModel {
    engine: Rc<Engine>,
    watch_bounds: bool,
    _bounds_watch: Option<Subscription>,
}

impl StepModel {
    /// Start building a step model over `model`.
    pub fn builder(
        model: Observable<Bounds>,
        steps: impl Into<Source<u32>>,
        bounds: impl Into<Source<Bounds>>,
    ) -> StepModelBuilder {
        StepModelBuilder {
            model,
            steps: steps.into(),
            bounds: bounds.into(),
            linear: Source::Fixed(None),
            options: StepModelOptions::default(),
            factory: Rc::new(ExponentialCurveFactory),
            scheduler: None,
        }
    }

    /// Current step view of the model.
    #[must_use]
    pub fn get(&self) -> StepBounds {
        self.engine.step_view.get()
    }

    /// Write a step pair back into the model.
    ///
    /// Out-of-range steps are clamped by the transform. If the beautifier
    /// fails, the model is left untouched.
    pub fn set(&self, steps: StepBounds) -> Result<()> {
        self.engine.write(steps)
    }

    /// Convert through the current transform.
    #[must_use]
    pub fn model_to_step(&self, value: f64) -> u32 {
        self.engine.transform.get().model_to_step(value)
    }

    /// Convert through the current transform.
    #[must_use]
    pub fn step_to_model(&self, step: u32) -> f64 {
        self.engine.transform.get().step_to_model(step)
    }

    /// Resolved configuration of the current transform.
    #[must_use]
    pub fn config(&self) -> ResolvedConfig {
        *self.engine.transform.get().resolved_config()
    }

    /// The model this step view is bound to.
    #[must_use]
    pub fn model(&self) -> &Observable<Bounds> {
        &self.engine.model
    }

    /// Scheduler that runs deferred reconciliations.
    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.engine.scheduler
    }

    /// Signal a source-bounds change that could not be observed (getter
    /// sources). Queues a reconciliation when `watch_bounds` is on.
    ///
    /// Returns `true` if a new reconciliation was queued.
    pub fn notify_bounds_changed(&self) -> bool {
        if !self.watch_bounds {
            return false;
        }
        Engine::schedule_reconcile(&self.engine)
    }
}

impl std::fmt::Debug for StepModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepModel")
            .field("model", &self.engine.model.get())
            .field("bounds", &self.engine.bounds.get())
            .field("beautifier", &self.engine.beautifier)
            .field("watch_bounds", &self.watch_bounds)
            .finish_non_exhaustive()
    }
}

/// Builder for [`StepModel`].
pub struct StepModelBuilder {
    model: Observable<Bounds>,
    steps: Source<u32>,
    bounds: Source<Bounds>,
    linear: Source<Option<LinearConfig>>,
    options: StepModelOptions,
    factory: Rc<dyn TransformFactory>,
    scheduler: Option<Scheduler>,
}

impl StepModelBuilder {
    /// Linear head segment of the curve. Default: none.
    #[must_use]
    pub fn linear_config(mut self, linear: impl Into<Source<Option<LinearConfig>>>) -> Self {
        self.linear = linear.into();
        self
    }

    #[must_use]
    pub fn options(mut self, options: StepModelOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the default [`ExponentialCurveFactory`].
    #[must_use]
    pub fn factory(mut self, factory: impl TransformFactory + 'static) -> Self {
        self.factory = Rc::new(factory);
        self
    }

    /// Share a scheduler with the host. Default: a private one, reachable
    /// through [`StepModel::scheduler`].
    #[must_use]
    pub fn scheduler(mut self, scheduler: &Scheduler) -> Self {
        self.scheduler = Some(scheduler.clone());
        self
    }

    /// Build the step model, running init normalization if enabled.
    pub fn build(self) -> Result<StepModel> {
        let StepModelOptions {
            watch_bounds,
            fix_model_on_init,
            model_beautifier,
        } = self.options;

        let engine = Rc::new(Engine::new(
            self.model,
            self.steps,
            self.bounds,
            self.linear,
            model_beautifier,
            self.factory,
            self.scheduler.unwrap_or_default(),
        ));

        if fix_model_on_init {
            engine.normalize()?;
        }

        let bounds_watch = if watch_bounds {
            let weak = Rc::downgrade(&engine);
            let watch = engine.bounds.as_observable().map(|bounds| {
                bounds.subscribe(move |_| {
                    if let Some(engine) = weak.upgrade() {
                        Engine::schedule_reconcile(&engine);
                    }
                })
            });
            if watch.is_none() {
                debug!("source bounds are not observable; use notify_bounds_changed");
            }
            watch
        } else {
            None
        };

        Ok(StepModel {
            engine,
            watch_bounds,
            _bounds_watch: bounds_watch,
        })
    }
}

impl From<u32> for Source<u32> {
    fn from(steps: u32) -> Self {
        Source::Fixed(steps)
    }
}

impl From<Bounds> for Source<Bounds> {
    fn from(bounds: Bounds) -> Self {
        Source::Fixed(bounds)
    }
}

impl From<LinearConfig> for Source<Option<LinearConfig>> {
    fn from(linear: LinearConfig) -> Self {
        Source::Fixed(Some(linear))
    }
}

impl From<Option<LinearConfig>> for Source<Option<LinearConfig>> {
    fn from(linear: Option<LinearConfig>) -> Self {
        Source::Fixed(linear)
    }
}
