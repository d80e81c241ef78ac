#![forbid(unsafe_code)]

//! Read-only inputs that may be constant, observable, or computed on demand.

use std::rc::Rc;

use super::observable::Observable;

/// An input the engine reads at each evaluation.
///
/// Only the [`Observable`](Source::Observable) variant can be watched for
/// changes; the other variants are read through fingerprint checks.
pub enum Source<T> {
    /// A value that never changes.
    Fixed(T),
    /// A shared value with change notification.
    Observable(Observable<T>),
    /// A closure evaluated on every read.
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> Source<T> {
    #[must_use]
    pub fn fixed(value: T) -> Self {
        Self::Fixed(value)
    }

    #[must_use]
    pub fn getter(f: impl Fn() -> T + 'static) -> Self {
        Self::Getter(Rc::new(f))
    }

    /// Read the current value.
    #[must_use]
    pub fn get(&self) -> T {
        match self {
            Self::Fixed(value) => value.clone(),
            Self::Observable(obs) => obs.get(),
            Self::Getter(f) => f(),
        }
    }

    /// The underlying observable, if this source can be watched.
    #[must_use]
    pub fn as_observable(&self) -> Option<&Observable<T>> {
        match self {
            Self::Observable(obs) => Some(obs),
            _ => None,
        }
    }
}

impl<T: Clone> Clone for Source<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Fixed(value) => Self::Fixed(value.clone()),
            Self::Observable(obs) => Self::Observable(obs.clone()),
            Self::Getter(f) => Self::Getter(Rc::clone(f)),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Source<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(value) => f.debug_tuple("Fixed").field(value).finish(),
            Self::Observable(obs) => f.debug_tuple("Observable").field(obs).finish(),
            Self::Getter(_) => f.write_str("Getter(..)"),
        }
    }
}

impl<T> From<Observable<T>> for Source<T> {
    fn from(obs: Observable<T>) -> Self {
        Self::Observable(obs)
    }
}

impl<T> From<&Observable<T>> for Source<T> {
    fn from(obs: &Observable<T>) -> Self {
        Self::Observable(obs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn fixed_source() {
        let src = Source::fixed(1_000u32);
        assert_eq!(src.get(), 1_000);
        assert!(src.as_observable().is_none());
    }

    #[test]
    fn observable_source_tracks_owner() {
        let owner = Observable::new(10u32);
        let src: Source<u32> = (&owner).into();
        owner.set(20);
        assert_eq!(src.get(), 20);
        assert!(src.as_observable().is_some());
    }

    #[test]
    fn getter_source_reads_each_time() {
        let cell = Rc::new(Cell::new(1u32));
        let cell_clone = Rc::clone(&cell);
        let src = Source::getter(move || cell_clone.get());
        assert_eq!(src.get(), 1);
        cell.set(2);
        assert_eq!(src.get(), 2);
        assert_eq!(format!("{src:?}"), "Getter(..)");
    }
}
