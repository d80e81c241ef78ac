#![forbid(unsafe_code)]

//! Reactive primitives for the step-model engine.
//!
//! This module provides the small host runtime the engine runs on:
//!
//! - [`Observable`]: a shared, version-tracked value with change
//!   notification via subscriber callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Memo`]: a lazily evaluated value cached against a dependency
//!   fingerprint.
//! - [`Source`]: a read-only input that is fixed, observable, or a getter.
//! - [`Scheduler`]: an explicit "next tick" queue for deferred effects.
//!
//! # Architecture
//!
//! Everything is single-threaded (`Rc<RefCell<..>>`). There is no ambient
//! tracking context: dependencies are passed in explicitly, derived values
//! are keyed by fingerprints, and deferred effects go through a scheduler
//! handle the host owns and flushes.
//!
//! # Invariants
//!
//! 1. Setting an observable to a structurally equal value is a no-op.
//! 2. Subscribers are notified in registration order.
//! 3. `Memo::get()` never returns a value derived from stale inputs.
//! 4. Scheduled effects never run inside the call that scheduled them.

pub mod memo;
pub mod observable;
pub mod scheduler;
pub mod source;

pub use memo::Memo;
pub use observable::{Observable, Subscription};
pub use scheduler::Scheduler;
pub use source::Source;
