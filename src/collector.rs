use std::convert::Infallible;

use similar::algorithms::DiffHook;

use crate::differ::Edit;

/// Collects the changes reported by a `similar` diff as [`Edit`]s, copying the
/// inserted elements out of the target sequence.
pub struct Collector<'a, T> {
    after: &'a [T],
    edits: Vec<Edit<T>>,
}

impl<'a, T: Clone> Collector<'a, T> {
    pub fn new(after: &'a [T]) -> Self {
        Self {
            after,
            edits: vec![],
        }
    }

    pub fn finish(self) -> Vec<Edit<T>> {
        self.edits
    }
}

impl<'a, T: Clone> DiffHook for Collector<'a, T> {
    type Error = Infallible;

    fn delete(
        &mut self,
        old_index: usize,
        old_len: usize,
        _new_index: usize,
    ) -> Result<(), Self::Error> {
        self.edits.push(Edit::delete(old_index, old_len));
        Ok(())
    }

    fn insert(
        &mut self,
        old_index: usize,
        new_index: usize,
        new_len: usize,
    ) -> Result<(), Self::Error> {
        let inserted = self.after[new_index..new_index + new_len].to_vec();
        self.edits.push(Edit::insert(old_index, inserted));
        Ok(())
    }

    fn replace(
        &mut self,
        old_index: usize,
        old_len: usize,
        new_index: usize,
        new_len: usize,
    ) -> Result<(), Self::Error> {
        let inserted = self.after[new_index..new_index + new_len].to_vec();
        self.edits.push(Edit::new(old_index, old_len, inserted));
        Ok(())
    }
}
