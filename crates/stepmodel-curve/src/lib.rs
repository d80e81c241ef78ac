#![forbid(unsafe_code)]

//! Step curve: conversion between model values and slider steps.
//!
//! # Role in stepmodel
//! `stepmodel-curve` is the range-transform provider. It resolves
//! `(steps, bounds, linear config)` into a pure conversion pair that the
//! synchronization engine in `stepmodel-runtime` consumes through the
//! [`RangeTransform`] / [`TransformFactory`] seam.
//!
//! # Primary types
//! - [`Bounds`] / [`StepBounds`]: `{min, max}` in model or step units.
//! - [`LinearConfig`]: linear head segment parameters.
//! - [`ResolvedConfig`]: derived curve parameters, read-only snapshot.
//! - [`ExponentialCurve`]: the blended linear/quadratic curve.

pub mod bounds;
pub mod curve;

pub use bounds::{Bounds, StepBounds};
pub use curve::{
    ExponentialCurve, ExponentialCurveFactory, LinearConfig, RangeTransform, ResolvedConfig,
    TransformFactory, model_to_step, step_to_model,
};
