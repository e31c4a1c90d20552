use std::ops::Range;

use rangemap::RangeMap;
use tracing::{debug, trace};

use crate::differ::{Differ, Edit};
use crate::line_tracking::{make_ranges, Link, PositionMap};
use crate::{Error, Result, Violation};

/// Where a line of the blamed snapshot comes from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Origin<R> {
    /// The revision to blame for this line
    pub revision: R,

    /// The line number of the line in the snapshot of `revision`
    pub line_no: usize,

    /// Whether the line was never changed in the walked history, i.e. it is
    /// only attributed to `revision` because history ran out
    pub boundary: bool,
}

/// The attribution of one line of the blamed snapshot. Once resolved it never
/// changes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Attribution<R> {
    Unresolved,
    Resolved(Origin<R>),
}

impl<R> Attribution<R> {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn origin(&self) -> Option<&Origin<R>> {
        match self {
            Self::Resolved(o) => Some(o),
            Self::Unresolved => None,
        }
    }

    pub fn revision(&self) -> Option<&R> {
        self.origin().map(|o| &o.revision)
    }
}

/// The state of a blame in progress.
///
/// The blamed snapshot is kept as it was given. A working copy of it is edited
/// into each older revision in turn, while a [`PositionMap`] remembers which
/// element of the working copy is still the same line as in the blamed
/// snapshot. When a diff removes such an element the line differs between the
/// two revisions being compared and it is attributed to the newer of them.
#[derive(Debug)]
pub struct AttributionState<T, R> {
    final_content: Vec<T>,
    attributions: Vec<Attribution<R>>,
    unresolved: usize,

    working: Vec<T>,
    positions: PositionMap,

    /// The revision `working` corresponds to
    revision: R,
    terminal: bool,
}

impl<T, R> AttributionState<T, R>
where
    T: Clone + PartialEq,
    R: Clone,
{
    /// Starts a blame of `content`, the snapshot at `revision`.
    pub fn new(revision: R, content: &[T]) -> Result<Self> {
        if content.is_empty() {
            return Err(Error::InvalidArgument("content to blame must not be empty"));
        }

        Ok(Self {
            final_content: content.to_vec(),
            attributions: vec![Attribution::Unresolved; content.len()],
            unresolved: content.len(),
            working: content.to_vec(),
            positions: PositionMap::identity(content.len()),
            revision,
            terminal: false,
        })
    }

    /// Moves the blame one revision further back in history.
    ///
    /// An empty `content` means there is no older revision; every line not yet
    /// resolved is attributed to the current revision and the blame becomes
    /// terminal. Calling this on a terminal blame does nothing.
    ///
    /// Returns the lines of the blamed snapshot resolved by this step, as
    /// ascending ranges.
    ///
    /// If the differ is found to break its contract the error is returned and
    /// the blame is left as it was before the call.
    pub fn advance<D>(
        &mut self,
        differ: &D,
        revision: R,
        content: &[T],
    ) -> Result<Vec<Range<usize>>>
    where
        D: Differ<T> + ?Sized,
    {
        if self.terminal {
            return Ok(vec![]);
        }

        if content.is_empty() {
            return Ok(self.terminate());
        }

        let edits = differ.diff(&self.working, content);
        check_script(&edits, self.working.len())?;

        // Edit copies and only commit once the result is known to be right
        let mut working = self.working.clone();
        let mut positions = self.positions.clone();
        let mut pending = vec![];
        let mut offset = 0isize;

        for edit in edits {
            let pos = (edit.position as isize + offset) as usize;
            let inserted = edit.inserted.len();

            for (i, link) in positions.remove(pos, edit.removed).enumerate() {
                if let Link::Linked(k) = link {
                    pending.push((k, edit.position + i));
                }
            }

            working
                .splice(pos..pos + edit.removed, edit.inserted)
                .for_each(drop);
            positions.insert_unlinked(pos, inserted);

            offset += inserted as isize - edit.removed as isize;
        }

        if working != content {
            return Err(Error::DifferContractViolation(Violation::ContentMismatch {
                expected_len: content.len(),
                actual_len: working.len(),
            }));
        }

        let mut resolved = Vec::with_capacity(pending.len());

        for (k, line_no) in pending {
            let slot = &mut self.attributions[k];
            debug_assert!(!slot.is_resolved(), "linked line {k} already resolved");

            *slot = Attribution::Resolved(Origin {
                revision: self.revision.clone(),
                line_no,
                boundary: false,
            });
            resolved.push(k);
        }

        self.unresolved -= resolved.len();
        self.working = working;
        self.positions = positions;
        self.revision = revision;

        resolved.sort_unstable();
        let ranges = make_ranges(&resolved);

        debug!(
            lines = content.len(),
            resolved = resolved.len(),
            unresolved = self.unresolved,
            "advanced to older revision"
        );
        for r in &ranges {
            trace!(lines = ?r, "resolved");
        }

        Ok(ranges)
    }

    /// Attributes every unresolved line to the current revision and makes the
    /// blame terminal. Equivalent to [`advance`](Self::advance) with empty
    /// content.
    pub fn terminate(&mut self) -> Vec<Range<usize>> {
        if self.terminal {
            return vec![];
        }

        let mut resolved = vec![];

        for (pos, k) in self.positions.linked() {
            let slot = &mut self.attributions[k];

            if !slot.is_resolved() {
                *slot = Attribution::Resolved(Origin {
                    revision: self.revision.clone(),
                    line_no: pos,
                    boundary: true,
                });
                resolved.push(k);
            }
        }

        self.unresolved -= resolved.len();
        self.terminal = true;

        debug!(boundary = resolved.len(), "reached end of history");

        // linked() yields ascending line numbers
        make_ranges(&resolved)
    }

    /// Turns a terminal blame into its result.
    pub fn finish(self) -> Result<Blame<T, R>> {
        if !self.terminal {
            return Err(Error::Incomplete {
                unresolved: self.unresolved,
            });
        }

        let origins = self
            .attributions
            .into_iter()
            .filter_map(|a| match a {
                Attribution::Resolved(o) => Some(o),
                Attribution::Unresolved => None,
            })
            .collect::<Vec<_>>();

        if origins.len() != self.final_content.len() {
            return Err(Error::Incomplete {
                unresolved: self.final_content.len() - origins.len(),
            });
        }

        Ok(Blame {
            lines: self.final_content,
            origins,
        })
    }
}

impl<T, R> AttributionState<T, R> {
    /// Number of lines in the blamed snapshot.
    pub fn len(&self) -> usize {
        self.final_content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.final_content.is_empty()
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    /// True if no line is waiting for an attribution. Walking more history
    /// would not change anything.
    pub fn is_fully_resolved(&self) -> bool {
        self.unresolved == 0
    }

    pub fn unresolved(&self) -> usize {
        self.unresolved
    }

    /// The revision unresolved lines would be attributed to next, or `None`
    /// once terminal.
    pub fn cursor_revision(&self) -> Option<&R> {
        (!self.terminal).then_some(&self.revision)
    }

    pub fn oldest_revision_seen(&self) -> &R {
        &self.revision
    }

    pub fn final_content(&self) -> &[T] {
        &self.final_content
    }

    pub fn attributions(&self) -> &[Attribution<R>] {
        &self.attributions
    }

    /// The blamed lines with their revision, if known yet.
    pub fn iter(&self) -> impl Iterator<Item = (&T, Option<&R>)> + '_ {
        self.final_content
            .iter()
            .zip(self.attributions.iter().map(Attribution::revision))
    }
}

fn check_script<T>(edits: &[Edit<T>], len: usize) -> Result<()> {
    let mut previous_end = 0;

    for (index, edit) in edits.iter().enumerate() {
        if edit.position < previous_end {
            return Err(Error::DifferContractViolation(Violation::OutOfOrder {
                index,
                position: edit.position,
                previous_end,
            }));
        }

        previous_end = match edit.end() {
            Some(end) if end <= len => end,
            _ => {
                return Err(Error::DifferContractViolation(Violation::OutOfBounds {
                    index,
                    position: edit.position,
                    removed: edit.removed,
                    len,
                }))
            }
        };
    }

    Ok(())
}

///  A line from the blamed snapshot with blame information.
#[derive(Debug, Eq, PartialEq)]
pub struct BlamedLine<'a, T, R> {
    /// The revision to blame for this line
    pub revision: &'a R,

    /// Whether or not the revision is where history ran out
    pub boundary: bool,

    /// The line number of the line in the blamed snapshot
    pub line_no: usize,

    /// The line number of the line in the revision that introduced it
    pub orig_line_no: usize,

    /// The line contents themselves
    pub line: &'a T,
}

/// A Blame represents a list of blamed lines. Conceptually it's a list of
/// revisions in the order of the lines in the snapshot the Blame was
/// requested for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Blame<T, R> {
    lines: Vec<T>,
    origins: Vec<Origin<R>>,
}

impl<T, R> Blame<T, R> {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The blamed snapshot.
    pub fn contents(&self) -> &[T] {
        &self.lines
    }

    pub fn origins(&self) -> &[Origin<R>] {
        &self.origins
    }

    /// One revision for each line. The list most likely contains both
    /// consecutive and non-consecutive duplicates.
    pub fn revisions(&self) -> impl Iterator<Item = &R> + '_ {
        self.origins.iter().map(|o| &o.revision)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, &R)> + '_ {
        self.lines.iter().zip(self.revisions())
    }

    pub fn blamed_lines(&self) -> impl Iterator<Item = BlamedLine<'_, T, R>> + '_ {
        self.lines
            .iter()
            .zip(&self.origins)
            .enumerate()
            .map(|(line_no, (line, origin))| BlamedLine {
                revision: &origin.revision,
                boundary: origin.boundary,
                line_no,
                orig_line_no: origin.line_no,
                line,
            })
    }

    /// Runs of consecutive lines blamed on the same revision.
    pub fn hunks(&self) -> RangeMap<usize, R>
    where
        R: Clone + Eq,
    {
        let mut hunks = RangeMap::new();

        for (i, r) in self.revisions().enumerate() {
            hunks.insert(i..i + 1, r.clone());
        }

        hunks
    }
}

impl<'a, T, R> IntoIterator for &'a Blame<T, R> {
    type Item = BlamedLine<'a, T, R>;
    type IntoIter = Box<dyn Iterator<Item = BlamedLine<'a, T, R>> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.blamed_lines())
    }
}
