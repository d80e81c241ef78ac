#![forbid(unsafe_code)]

//! Blended linear/quadratic step curve.
//!
//! # Shape
//!
//! A slider with `steps` ticks is split into two segments:
//!
//! - a **linear** segment covering the first `linear_steps` ticks, mapping
//!   evenly from `min` to `linear_max = min + max_linear`;
//! - a **quadratic** segment covering the remaining ticks, mapping
//!   `t = (s - linear_steps) / (steps - linear_steps)` to
//!   `linear_max + (max - linear_max) * t²`.
//!
//! The quadratic tail gives fine resolution near the linear segment and
//! coarse resolution near `max`, which suits price/distance filters where
//! most interesting values sit near the low end.
//!
//! # Invariants
//!
//! 1. For every `s` in `0..=steps`, `model_to_step(step_to_model(s)) == s`
//!    as long as `min < max`.
//! 2. `model_to_step` output is always in `0..=steps`.
//! 3. `step_to_model` output is always in `[min, max]`.
//! 4. Out-of-range inputs are clamped, never rejected.
//!
//! # Failure Modes
//!
//! - **Degenerate bounds** (`min >= max`) or `steps == 0`: every step maps to
//!   `min` and every model value maps to step 0. Invariant 1 cannot hold and
//!   is not attempted.
//! - **Non-finite model values**: NaN maps to step 0.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;

/// Parameters of the linear head segment.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearConfig {
    /// Width of the linear segment in model units, measured from `min`.
    #[cfg_attr(feature = "serde", serde(alias = "maxLinear"))]
    pub max_linear: f64,
    /// Share of the ticks (0 to 100) given to the linear segment.
    #[cfg_attr(feature = "serde", serde(alias = "linearPercent"))]
    pub linear_percent: f64,
}

impl LinearConfig {
    #[must_use]
    pub const fn new(max_linear: f64, linear_percent: f64) -> Self {
        Self {
            max_linear,
            linear_percent,
        }
    }
}

/// Fully resolved curve parameters, derived from the inputs.
///
/// Exposed read-only for display and debugging.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ResolvedConfig {
    /// Number of ticks; positions run `0..=steps`.
    pub steps: u32,
    /// Lower model bound.
    pub min: f64,
    /// Upper model bound.
    pub max: f64,
    /// Linear configuration as supplied, if any.
    pub linear: Option<LinearConfig>,
    /// Number of ticks in the linear segment.
    pub linear_steps: u32,
    /// Model value at the end of the linear segment.
    pub linear_max: f64,
}

impl ResolvedConfig {
    /// Resolve curve parameters from raw inputs.
    #[must_use]
    pub fn resolve(steps: u32, bounds: Bounds, linear: Option<&LinearConfig>) -> Self {
        let (linear_steps, linear_max) = match linear {
            Some(cfg) if cfg.max_linear > 0.0 && cfg.linear_percent > 0.0 => {
                let share = (f64::from(steps) * cfg.linear_percent / 100.0).round();
                let linear_steps = share.clamp(0.0, f64::from(steps)) as u32;
                let linear_max = bounds.min + cfg.max_linear;
                if linear_steps == 0 {
                    (0, bounds.min)
                } else if linear_steps >= steps || linear_max >= bounds.max {
                    (steps, bounds.max)
                } else {
                    (linear_steps, linear_max)
                }
            }
            _ => (0, bounds.min),
        };

        Self {
            steps,
            min: bounds.min,
            max: bounds.max,
            linear: linear.copied(),
            linear_steps,
            linear_max,
        }
    }

    /// Source bounds this configuration was resolved for.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.min, self.max)
    }

    /// Ticks in the quadratic segment.
    #[must_use]
    pub fn curve_steps(&self) -> u32 {
        self.steps - self.linear_steps
    }

    fn is_degenerate(&self) -> bool {
        self.steps == 0 || !(self.min < self.max)
    }
}

/// A resolved step ↔ model conversion.
///
/// Implementations must be pure: equal inputs produce equal outputs.
pub trait RangeTransform {
    /// Project a model value onto the nearest step.
    fn model_to_step(&self, model: f64) -> u32;

    /// Model value represented by `step`.
    fn step_to_model(&self, step: u32) -> f64;

    /// Snapshot of the parameters this transform was built from.
    fn resolved_config(&self) -> &ResolvedConfig;
}

/// Builds [`RangeTransform`]s from `(steps, bounds, linear config)`.
pub trait TransformFactory {
    fn build(
        &self,
        steps: u32,
        bounds: Bounds,
        linear: Option<&LinearConfig>,
    ) -> Box<dyn RangeTransform>;
}

impl<F, T> TransformFactory for F
where
    F: Fn(u32, Bounds, Option<&LinearConfig>) -> T,
    T: RangeTransform + 'static,
{
    fn build(
        &self,
        steps: u32,
        bounds: Bounds,
        linear: Option<&LinearConfig>,
    ) -> Box<dyn RangeTransform> {
        Box::new(self(steps, bounds, linear))
    }
}

/// The blended linear/quadratic curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialCurve {
    config: ResolvedConfig,
}

impl ExponentialCurve {
    #[must_use]
    pub fn new(steps: u32, bounds: Bounds, linear: Option<&LinearConfig>) -> Self {
        Self {
            config: ResolvedConfig::resolve(steps, bounds, linear),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Model value for `step` (clamped to `0..=steps`).
    #[must_use]
    pub fn step_to_model(&self, step: u32) -> f64 {
        let c = &self.config;
        if c.is_degenerate() {
            return c.min;
        }
        let step = step.min(c.steps);

        let value = if step <= c.linear_steps && c.linear_steps > 0 {
            c.min + (c.linear_max - c.min) * f64::from(step) / f64::from(c.linear_steps)
        } else {
            let t = f64::from(step - c.linear_steps) / f64::from(c.curve_steps());
            c.linear_max + (c.max - c.linear_max) * t * t
        };
        // Float rounding can overshoot `max` by an ulp at the top step.
        c.bounds().clamp(value)
    }

    /// Nearest step for `model` (clamped to `[min, max]`).
    #[must_use]
    pub fn model_to_step(&self, model: f64) -> u32 {
        let c = &self.config;
        if c.is_degenerate() || model.is_nan() {
            return 0;
        }
        let value = c.bounds().clamp(model);

        let raw = if c.linear_steps > 0 && value <= c.linear_max {
            (value - c.min) / (c.linear_max - c.min) * f64::from(c.linear_steps)
        } else {
            let t = ((value - c.linear_max) / (c.max - c.linear_max)).sqrt();
            f64::from(c.linear_steps) + t * f64::from(c.curve_steps())
        };

        raw.round().clamp(0.0, f64::from(c.steps)) as u32
    }
}

impl RangeTransform for ExponentialCurve {
    fn model_to_step(&self, model: f64) -> u32 {
        ExponentialCurve::model_to_step(self, model)
    }

    fn step_to_model(&self, step: u32) -> f64 {
        ExponentialCurve::step_to_model(self, step)
    }

    fn resolved_config(&self) -> &ResolvedConfig {
        &self.config
    }
}

/// Factory for [`ExponentialCurve`]; the default transform provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExponentialCurveFactory;

impl TransformFactory for ExponentialCurveFactory {
    fn build(
        &self,
        steps: u32,
        bounds: Bounds,
        linear: Option<&LinearConfig>,
    ) -> Box<dyn RangeTransform> {
        Box::new(ExponentialCurve::new(steps, bounds, linear))
    }
}

/// One-shot `model → step` conversion.
#[must_use]
pub fn model_to_step(model: f64, steps: u32, bounds: Bounds, linear: Option<&LinearConfig>) -> u32 {
    ExponentialCurve::new(steps, bounds, linear).model_to_step(model)
}

/// One-shot `step → model` conversion.
#[must_use]
pub fn step_to_model(step: u32, steps: u32, bounds: Bounds, linear: Option<&LinearConfig>) -> f64 {
    ExponentialCurve::new(steps, bounds, linear).step_to_model(step)
}
