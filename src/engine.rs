use tracing::debug;

use crate::blame::{AttributionState, Blame};
use crate::differ::Differ;
use crate::{Error, Result};

/// Options for [`blame_history`].
#[derive(Clone, Copy, Debug)]
pub struct BlameOptions {
    /// Stop walking history as soon as every line has been attributed. The
    /// result is the same either way.
    pub stop_when_resolved: bool,
}

impl Default for BlameOptions {
    fn default() -> Self {
        Self {
            stop_when_resolved: true,
        }
    }
}

impl BlameOptions {
    /// Walk the history until it is exhausted, even if every line is resolved.
    pub fn full_history() -> Self {
        Self {
            stop_when_resolved: false,
        }
    }

    /// Blames the first snapshot of `history`.
    ///
    /// `history` yields `(revision, snapshot)` pairs, newest first. An empty
    /// snapshot marks the end of history; if there is none the end of the
    /// iterator does.
    pub fn blame<T, R, D, I>(&self, differ: &D, history: I) -> Result<Blame<T, R>>
    where
        T: Clone + PartialEq,
        R: Clone,
        D: Differ<T> + ?Sized,
        I: IntoIterator<Item = (R, Vec<T>)>,
    {
        let mut history = history.into_iter();

        let (revision, contents) = history.next().ok_or(Error::EmptyHistory)?;
        let mut state = AttributionState::new(revision, &contents)?;

        let mut revisions = 1;

        // Never pull a snapshot that will not be used
        while !state.is_terminal() {
            if self.stop_when_resolved && state.is_fully_resolved() {
                debug!(revisions, "every line resolved, stopping early");
                break;
            }

            let Some((revision, contents)) = history.next() else {
                break;
            };

            state.advance(differ, revision, &contents)?;
            revisions += 1;
        }

        state.terminate();

        debug!(revisions, lines = state.len(), "blame complete");

        state.finish()
    }
}

/// Blames the first snapshot of `history` with the default [`BlameOptions`].
pub fn blame_history<T, R, D, I>(differ: &D, history: I) -> Result<Blame<T, R>>
where
    T: Clone + PartialEq,
    R: Clone,
    D: Differ<T> + ?Sized,
    I: IntoIterator<Item = (R, Vec<T>)>,
{
    BlameOptions::default().blame(differ, history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Edit, SliceDiffer};
    use pretty_assertions::assert_eq;
    use std::cell::Cell;

    #[test]
    fn empty_history() {
        let history: Vec<(u32, Vec<&str>)> = vec![];

        assert_eq!(
            blame_history(&SliceDiffer::default(), history).unwrap_err(),
            Error::EmptyHistory
        );
    }

    #[test]
    fn missing_sentinel_is_supplied() {
        let history = vec![(1, vec!["a", "b"]), (0, vec!["a"])];

        let blame = blame_history(&SliceDiffer::default(), history).unwrap();

        assert_eq!(blame.revisions().copied().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn nothing_after_sentinel_is_read() {
        let history = vec![(2, vec!["a"]), (1, vec![]), (0, vec!["b"])];

        let blame = BlameOptions::full_history()
            .blame(&SliceDiffer::default(), history)
            .unwrap();

        assert_eq!(blame.revisions().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn stops_once_resolved() {
        let calls = Cell::new(0);
        let differ = |before: &[&'static str], after: &[&'static str]| {
            calls.set(calls.get() + 1);
            SliceDiffer::default().diff(before, after)
        };

        let history = vec![
            (3, vec!["a", "b"]),
            (2, vec!["x", "y"]),
            (1, vec!["x", "z"]),
            (0, vec!["w", "z"]),
        ];

        let early = BlameOptions::default().blame(&differ, history.clone()).unwrap();
        assert_eq!(calls.get(), 1);

        let full = BlameOptions::full_history().blame(&differ, history).unwrap();
        assert_eq!(calls.get(), 4);

        assert_eq!(early, full);
        assert_eq!(early.revisions().copied().collect::<Vec<_>>(), vec![3, 3]);
    }

    #[test]
    fn history_is_not_read_past_its_end() {
        let pulls = Cell::new(0);
        let history = vec![(2, vec!["a"]), (1, vec![]), (0, vec!["c"])];

        let blame = BlameOptions::full_history()
            .blame(
                &SliceDiffer::default(),
                history.into_iter().inspect(|_| pulls.set(pulls.get() + 1)),
            )
            .unwrap();

        assert_eq!(pulls.get(), 2);
        assert_eq!(blame.revisions().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn history_is_not_read_once_resolved() {
        let pulls = Cell::new(0);
        let history = vec![(2, vec!["a"]), (1, vec!["b"]), (0, vec!["c"])];

        let blame = BlameOptions::default()
            .blame(
                &SliceDiffer::default(),
                history.into_iter().inspect(|_| pulls.set(pulls.get() + 1)),
            )
            .unwrap();

        assert_eq!(pulls.get(), 2);
        assert_eq!(blame.revisions().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn differ_errors_abort() {
        let differ = |_: &[char], _: &[char]| -> Vec<Edit<char>> { vec![Edit::delete(5, 1)] };
        let history = vec![("new", vec!['a']), ("old", vec!['b'])];

        let err = blame_history(&differ, history).unwrap_err();

        assert!(matches!(err, Error::DifferContractViolation(_)));
    }
}
