#![forbid(unsafe_code)]

//! Value-beautification policies applied to model values derived from steps.

use std::fmt;
use std::rc::Rc;

use crate::error::{BeautifyError, StepModelError};

/// Which edge of a range a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Min,
    Max,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type BeautifyFn = dyn Fn(f64, Field) -> Result<f64, BeautifyError>;

/// Post-processing applied to a model value freshly derived from a step,
/// before it is committed (e.g. rounding currency to whole units).
///
/// The policy is called once per field per write. The default is the
/// identity.
#[derive(Clone)]
pub struct ModelBeautifier {
    name: &'static str,
    f: Rc<BeautifyFn>,
}

impl ModelBeautifier {
    /// Pass values through unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(|value, _| value).named("identity")
    }

    /// Build from an infallible function.
    pub fn new(f: impl Fn(f64, Field) -> f64 + 'static) -> Self {
        Self {
            name: "custom",
            f: Rc::new(move |value, field| Ok(f(value, field))),
        }
    }

    /// Build from a fallible function. An error aborts the whole write.
    pub fn try_new(f: impl Fn(f64, Field) -> Result<f64, BeautifyError> + 'static) -> Self {
        Self {
            name: "custom",
            f: Rc::new(f),
        }
    }

    /// Round both edges to the nearest integer.
    #[must_use]
    pub fn round() -> Self {
        Self::new(|value, _| value.round()).named("round")
    }

    /// Round both edges down.
    #[must_use]
    pub fn floor() -> Self {
        Self::new(|value, _| value.floor()).named("floor")
    }

    /// Round both edges up.
    #[must_use]
    pub fn ceil() -> Self {
        Self::new(|value, _| value.ceil()).named("ceil")
    }

    /// Round `min` down and `max` up, so the committed range never shrinks
    /// inside the step's exact value.
    #[must_use]
    pub fn floor_min_ceil_max() -> Self {
        Self::new(|value, field| match field {
            Field::Min => value.floor(),
            Field::Max => value.ceil(),
        })
        .named("floor-min-ceil-max")
    }

    /// Label used in logs and `Debug` output.
    #[must_use]
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Apply the policy to one field.
    pub fn apply(&self, value: f64, field: Field) -> Result<f64, StepModelError> {
        (self.f)(value, field).map_err(|source| StepModelError::Beautify {
            field,
            value,
            source,
        })
    }
}

impl Default for ModelBeautifier {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Debug for ModelBeautifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelBeautifier").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_default() {
        let b = ModelBeautifier::default();
        assert_eq!(b.name(), "identity");
        assert_eq!(b.apply(112_254.2, Field::Max).ok(), Some(112_254.2));
    }

    #[test]
    fn presets() {
        assert_eq!(ModelBeautifier::round().apply(25_619.55, Field::Min).ok(), Some(25_620.0));
        assert_eq!(ModelBeautifier::floor().apply(1.9, Field::Max).ok(), Some(1.0));
        assert_eq!(ModelBeautifier::ceil().apply(1.1, Field::Min).ok(), Some(2.0));

        let outward = ModelBeautifier::floor_min_ceil_max();
        assert_eq!(outward.apply(16_067.648, Field::Min).ok(), Some(16_067.0));
        assert_eq!(outward.apply(112_254.2, Field::Max).ok(), Some(112_255.0));
    }

    #[test]
    fn field_is_passed_through() {
        let b = ModelBeautifier::new(|value, field| match field {
            Field::Min => value - 1.0,
            Field::Max => value + 1.0,
        });
        assert_eq!(b.apply(10.0, Field::Min).ok(), Some(9.0));
        assert_eq!(b.apply(10.0, Field::Max).ok(), Some(11.0));
    }

    #[test]
    fn fallible_policy_reports_field_and_value() {
        let b = ModelBeautifier::try_new(|value, _| {
            if value > 100.0 {
                Err(BeautifyError::new("above cap"))
            } else {
                Ok(value)
            }
        });
        let err = b.apply(150.0, Field::Max).expect_err("should reject");
        assert_eq!(err.to_string(), "beautifier rejected max value 150: above cap");
    }

    #[test]
    fn debug_shows_name() {
        assert_eq!(
            format!("{:?}", ModelBeautifier::round()),
            "ModelBeautifier(\"round\")"
        );
    }
}
