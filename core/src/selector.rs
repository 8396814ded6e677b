//! Memoized selectors - derived read-views over state
//!
//! A selector projects derived data out of a state snapshot. Derived
//! selectors cache their last `(input, output)` pair and recompute only
//! when an input's *identity* changes - reference equality, never deep
//! equality. Because state subtrees are copy-on-write `Arc`s, an unchanged
//! pointer is proof the data is unchanged, and an `O(n)` rescan is skipped
//! on unrelated state changes.
//!
//! Outputs are shared values themselves (`Arc<[T]>` and friends), so a
//! cache hit returns a pointer-identical value. Downstream consumers may
//! rely on that identity to skip their own work; it is part of the
//! contract, not an optimization detail.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use taskflow_core::selector::Memo;
//!
//! let lengths: Memo<Arc<Vec<String>>, Arc<[usize]>> = Memo::new();
//! let names: Arc<Vec<String>> = Arc::new(vec!["ada".into(), "grace".into()]);
//!
//! let first = lengths.compute(Arc::clone(&names), |names| {
//!     names.iter().map(|name| name.len()).collect()
//! });
//! let second = lengths.compute(Arc::clone(&names), |names| {
//!     names.iter().map(|name| name.len()).collect()
//! });
//! // Same input identity: the cached slice is returned, not a new one.
//! assert!(Arc::ptr_eq(&first, &second));
//! ```

use std::sync::{Arc, Mutex, PoisonError};

/// Identity comparison for selector inputs.
///
/// `identity_eq` answers "is this the same value the cache saw last time",
/// by reference, in `O(1)`. It must never fall back to structural equality:
/// two deep-equal but separately allocated inputs are *different* inputs,
/// and a recompute is the correct (if wasteful) outcome.
pub trait IdentityEq {
    /// Compare two inputs by identity.
    fn identity_eq(&self, other: &Self) -> bool;
}

impl<T: ?Sized> IdentityEq for Arc<T> {
    fn identity_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<A: IdentityEq, B: IdentityEq> IdentityEq for (A, B) {
    fn identity_eq(&self, other: &Self) -> bool {
        self.0.identity_eq(&other.0) && self.1.identity_eq(&other.1)
    }
}

/// A single-slot memo cell: the building block of derived selectors.
///
/// Holds the last `(input, output)` pair. [`Memo::compute`] returns the
/// cached output when the input identity matches, and recomputes (and
/// replaces the slot) otherwise. One slot is enough: selectors are read in
/// lockstep with the latest snapshot, so only the most recent inputs are
/// worth keeping.
///
/// The cell is internally synchronized and can be shared behind an `Arc`;
/// contention is a non-issue because the critical section is a pointer
/// comparison plus a clone.
#[derive(Debug)]
pub struct Memo<I, O> {
    slot: Mutex<Option<(I, O)>>,
}

impl<I, O> Default for Memo<I, O> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }
}

impl<I, O> Memo<I, O>
where
    I: IdentityEq,
    O: Clone,
{
    /// Create an empty memo cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Return the cached output for `input`, or compute and cache it.
    ///
    /// `f` runs only when the cell is empty or the cached input's identity
    /// differs from `input`.
    pub fn compute<F>(&self, input: I, f: F) -> O
    where
        F: FnOnce(&I) -> O,
    {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some((cached_input, cached_output)) = slot.as_ref() {
            if cached_input.identity_eq(&input) {
                return cached_output.clone();
            }
        }

        let output = f(&input);
        *slot = Some((input, output.clone()));
        output
    }

    /// Drop the cached pair, forcing the next [`Memo::compute`] to run.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn caches_on_identical_input() {
        let memo: Memo<Arc<Vec<u32>>, Arc<[u32]>> = Memo::new();
        let runs = AtomicUsize::new(0);
        let input = Arc::new(vec![1, 2, 3]);

        let compute = |input: &Arc<Vec<u32>>| {
            runs.fetch_add(1, Ordering::SeqCst);
            input.iter().map(|n| n * 2).collect()
        };

        let first = memo.compute(Arc::clone(&input), compute);
        let second = memo.compute(Arc::clone(&input), compute);

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn recomputes_on_new_identity() {
        let memo: Memo<Arc<Vec<u32>>, Arc<[u32]>> = Memo::new();
        let runs = AtomicUsize::new(0);

        let compute = |input: &Arc<Vec<u32>>| {
            runs.fetch_add(1, Ordering::SeqCst);
            input.iter().copied().collect()
        };

        // Deep-equal but separately allocated: identity differs.
        let first = memo.compute(Arc::new(vec![5]), compute);
        let second = memo.compute(Arc::new(vec![5]), compute);

        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(first, second);
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn pair_identity_requires_both() {
        let a = Arc::new(1);
        let b = Arc::new(2);
        let b2 = Arc::new(2);

        assert!((Arc::clone(&a), Arc::clone(&b)).identity_eq(&(Arc::clone(&a), Arc::clone(&b))));
        assert!(!(Arc::clone(&a), b).identity_eq(&(a, b2)));
    }

    #[test]
    fn invalidate_forces_recompute() {
        let memo: Memo<Arc<u32>, u32> = Memo::new();
        let runs = AtomicUsize::new(0);
        let input = Arc::new(9);

        let compute = |input: &Arc<u32>| {
            runs.fetch_add(1, Ordering::SeqCst);
            **input + 1
        };

        memo.compute(Arc::clone(&input), compute);
        memo.invalidate();
        memo.compute(input, compute);

        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
