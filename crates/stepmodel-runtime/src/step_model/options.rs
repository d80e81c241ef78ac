#![forbid(unsafe_code)]

use super::beautifier::ModelBeautifier;

/// Policies for a [`StepModel`](super::StepModel).
///
/// The options are independent. With both flags on, the model is normalized
/// at construction and reconciliation is armed afterwards.
#[derive(Debug, Clone, Default)]
pub struct StepModelOptions {
    /// Re-anchor the model value to its current step whenever the source
    /// bounds change. Runs on the next scheduler flush. Default `false`.
    pub watch_bounds: bool,
    /// Correct the model value once at construction so it matches the
    /// current bounds and step quantization. Default `false`.
    pub fix_model_on_init: bool,
    /// Applied to every model value derived from a step. Default identity.
    pub model_beautifier: ModelBeautifier,
}

impl StepModelOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn watch_bounds(mut self, enabled: bool) -> Self {
        self.watch_bounds = enabled;
        self
    }

    #[must_use]
    pub fn fix_model_on_init(mut self, enabled: bool) -> Self {
        self.fix_model_on_init = enabled;
        self
    }

    #[must_use]
    pub fn model_beautifier(mut self, beautifier: ModelBeautifier) -> Self {
        self.model_beautifier = beautifier;
        self
    }
}
