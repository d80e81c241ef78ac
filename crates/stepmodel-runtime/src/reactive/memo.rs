#![forbid(unsafe_code)]

//! Memoized values keyed by a dependency fingerprint.
//!
//! # Design
//!
//! [`Memo<K, T>`] pairs a *key* function, which reads the current inputs and
//! returns a cheap fingerprint `K`, with a *compute* function that derives
//! `T` from that fingerprint. On [`get()`](Memo::get) the key is re-read and
//! compared (by `PartialEq`) with the key of the cached value; the compute
//! function runs only when they differ.
//!
//! Unlike subscription-driven invalidation, fingerprint checks also work for
//! inputs that cannot be observed (plain getter closures), so a memo never
//! needs to know where its inputs come from.
//!
//! # Invariants
//!
//! 1. `get()` never returns a value computed from a fingerprint other than
//!    the current one.
//! 2. The compute function runs at most once per distinct fingerprint
//!    transition.
//! 3. `version` increments by exactly 1 per recomputation.
//!
//! # Failure Modes
//!
//! - **Compute function panics**: the previous cache entry is kept, so the
//!   next `get()` retries.
//! - **Key or compute reads this memo**: panics on the re-entrant `RefCell`
//!   borrow. Dependency graphs must be acyclic.

use std::cell::RefCell;
use std::rc::Rc;

struct MemoInner<K, T> {
    key: Box<dyn Fn() -> K>,
    compute: Box<dyn Fn(&K) -> T>,
    cached: Option<(K, T)>,
    version: u64,
}

/// A lazily evaluated value cached against a dependency fingerprint.
///
/// Cloning a `Memo` creates a new handle to the **same** cache.
pub struct Memo<K, T> {
    inner: Rc<RefCell<MemoInner<K, T>>>,
}

impl<K, T> Clone for Memo<K, T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K: std::fmt::Debug, T: std::fmt::Debug> std::fmt::Debug for Memo<K, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Memo")
            .field("cached", &inner.cached)
            .field("version", &inner.version)
            .finish()
    }
}

impl<K: PartialEq + 'static, T: Clone + 'static> Memo<K, T> {
    /// Create a memo. Nothing is computed until the first `get()`.
    pub fn new(key: impl Fn() -> K + 'static, compute: impl Fn(&K) -> T + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoInner {
                key: Box::new(key),
                compute: Box::new(compute),
                cached: None,
                version: 0,
            })),
        }
    }

    /// Current value, recomputed if the fingerprint changed.
    #[must_use]
    pub fn get(&self) -> T {
        let key = (self.inner.borrow().key)();
        let mut inner = self.inner.borrow_mut();
        if let Some((cached_key, value)) = &inner.cached
            && *cached_key == key
        {
            return value.clone();
        }
        let value = (inner.compute)(&key);
        inner.cached = Some((key, value.clone()));
        inner.version += 1;
        value
    }

    /// Whether the next `get()` will recompute.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        let key = (self.inner.borrow().key)();
        !matches!(&self.inner.borrow().cached, Some((cached_key, _)) if *cached_key == key)
    }

    /// Drop the cached value. The next `get()` recomputes.
    pub fn invalidate(&self) {
        self.inner.borrow_mut().cached = None;
    }

    /// Number of recomputations so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }
}
