#![forbid(unsafe_code)]

//! stepmodel runtime
//!
//! Keeps a continuous model range and a discretized slider range in sync.
//!
//! # Key Components
//!
//! - [`StepModel`] - read/write step view over an externally owned model
//! - [`StepModelOptions`] - bounds watching, init normalization, beautifier
//! - [`ModelBeautifier`] - per-field post-processing of derived model values
//! - [`Scheduler`] - explicit next-tick queue that runs deferred reconciliation
//! - [`Observable`] / [`Source`] / [`Memo`] - the reactive primitives underneath
//! - `SliderConfig` - slider definitions loaded from TOML or JSON (feature `config`)
//!
//! # Role in stepmodel
//! `stepmodel-runtime` is the synchronization engine. It consumes range
//! transforms from `stepmodel-curve` and owns everything stateful: caching,
//! write-back, and the reconciliation that keeps a slider's step position
//! stable when its source bounds move.
//!
//! # Logging
//! The crate emits `tracing` spans and events but never installs a
//! subscriber; that is left to the host.

#[cfg(feature = "config")]
pub mod config;
pub mod error;
pub mod reactive;
pub mod step_model;

#[cfg(feature = "config")]
pub use config::{BeautifierPreset, OptionsConfig, SliderConfig};
pub use error::{BeautifyError, ConfigError, Result, StepModelError};
pub use reactive::{Memo, Observable, Scheduler, Source, Subscription};
pub use step_model::{Field, ModelBeautifier, StepModel, StepModelBuilder, StepModelOptions};

pub use stepmodel_curve::{
    Bounds, ExponentialCurve, ExponentialCurveFactory, LinearConfig, RangeTransform,
    ResolvedConfig, StepBounds, TransformFactory,
};
