#![forbid(unsafe_code)]

//! Range primitives.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A `{min, max}` pair delimiting a range.
///
/// Used both in domain units (`Bounds<f64>`, the default) and in step units
/// ([`StepBounds`]). Equality is structural: two bounds built independently
/// with the same fields compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds<T = f64> {
    /// Lower edge (inclusive).
    pub min: T,
    /// Upper edge (inclusive).
    pub max: T,
}

/// Bounds expressed as integer positions on a discretized scale.
pub type StepBounds = Bounds<u32>;

impl<T> Bounds<T> {
    /// Create a new range.
    #[inline]
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// Apply `f` to both edges.
    #[inline]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Bounds<U> {
        Bounds {
            min: f(self.min),
            max: f(self.max),
        }
    }
}

impl Bounds<f64> {
    /// Width of the range (`max - min`).
    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Whether both edges are finite and `min <= max`.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }

    /// Clamp `value` into `[min, max]`.
    ///
    /// Does not panic on inverted bounds; `min` wins.
    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.min(self.max).max(self.min)
    }
}

impl<T: Copy> From<(T, T)> for Bounds<T> {
    fn from((min, max): (T, T)) -> Self {
        Self::new(min, max)
    }
}
