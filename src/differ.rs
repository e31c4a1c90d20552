use std::hash::Hash;

use similar::{algorithms::diff_slices, Algorithm};

use crate::collector::Collector;

/// One step of an edit script: remove `removed` elements at `position` and put
/// `inserted` in their place.
///
/// `position` is in the coordinates of the sequence *before* any edit of the
/// script was applied.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Edit<T> {
    pub position: usize,
    pub removed: usize,
    pub inserted: Vec<T>,
}

impl<T> Edit<T> {
    pub fn new(position: usize, removed: usize, inserted: Vec<T>) -> Self {
        Self {
            position,
            removed,
            inserted,
        }
    }

    /// Shorthand for an edit that only removes elements.
    pub fn delete(position: usize, removed: usize) -> Self {
        Self::new(position, removed, vec![])
    }

    /// Shorthand for an edit that only inserts elements.
    pub fn insert(position: usize, inserted: Vec<T>) -> Self {
        Self::new(position, 0, inserted)
    }

    /// One past the last element this edit removes, or `None` if that does
    /// not fit in a `usize`.
    pub fn end(&self) -> Option<usize> {
        self.position.checked_add(self.removed)
    }
}

/// Computes an edit script that transforms `before` into `after`.
///
/// Implementations must list the edits in ascending, non-overlapping order.
/// Applying them one after the other while tracking the offset introduced by
/// earlier edits must reproduce `after` exactly. Both properties are checked
/// by the blame and a violation is reported as
/// [`Error::DifferContractViolation`](crate::Error::DifferContractViolation).
pub trait Differ<T> {
    fn diff(&self, before: &[T], after: &[T]) -> Vec<Edit<T>>;
}

impl<T, F> Differ<T> for F
where
    F: Fn(&[T], &[T]) -> Vec<Edit<T>>,
{
    fn diff(&self, before: &[T], after: &[T]) -> Vec<Edit<T>> {
        self(before, after)
    }
}

/// A [`Differ`] for any hashable element, backed by the `similar` crate.
#[derive(Clone, Copy, Debug)]
pub struct SliceDiffer {
    algorithm: Algorithm,
}

impl SliceDiffer {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl Default for SliceDiffer {
    fn default() -> Self {
        Self::new(Algorithm::Myers)
    }
}

impl<T> Differ<T> for SliceDiffer
where
    T: Clone + Hash + Ord,
{
    fn diff(&self, before: &[T], after: &[T]) -> Vec<Edit<T>> {
        let mut collector = Collector::new(after);

        match diff_slices(self.algorithm, &mut collector, before, after) {
            Ok(()) => collector.finish(),
            Err(never) => match never {},
        }
    }
}
