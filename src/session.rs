use std::any::Any;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::blame::{Attribution, AttributionState, Blame};
use crate::differ::{Differ, SliceDiffer};
use crate::{Error, Result};

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Hands out and drives [`Session`]s, one per blamed document.
///
/// Each blamer only accepts the sessions it created itself.
#[derive(Debug)]
pub struct Blamer<D = SliceDiffer> {
    id: u64,
    differ: D,
}

impl Default for Blamer {
    fn default() -> Self {
        Self::new(SliceDiffer::default())
    }
}

impl<D> Blamer<D> {
    pub fn new(differ: D) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            differ,
        }
    }

    pub fn differ(&self) -> &D {
        &self.differ
    }

    /// Whether `session` was started by this blamer.
    pub fn owns<T, R>(&self, session: &Session<T, R>) -> bool {
        session.owner == self.id
    }

    /// Starts or continues a blame.
    ///
    /// Without a `handle` a new session is started for `content` at
    /// `revision`, both of which are required. With a `handle` the session is
    /// moved back to `revision`, whose snapshot is `content`; absent or empty
    /// content means there is no older revision, which finishes the session.
    ///
    /// Errors consume the handle: a blame that failed cannot be continued.
    /// This includes [`Error::TypeMismatch`] for a session started by another
    /// blamer, so check with [`owns`](Self::owns) first when that can happen.
    pub fn blame<T, R>(
        &self,
        handle: Option<Session<T, R>>,
        revision: Option<R>,
        content: Option<&[T]>,
    ) -> Result<Session<T, R>>
    where
        T: Clone + PartialEq,
        R: Clone,
        D: Differ<T>,
    {
        match handle {
            None => {
                let revision = revision.ok_or(Error::InvalidArgument(
                    "revision is required to start a blame",
                ))?;
                let content = content.ok_or(Error::InvalidArgument(
                    "content is required to start a blame",
                ))?;

                let state = AttributionState::new(revision, content)?;

                debug!(session = self.id, lines = state.len(), "started blame session");

                Ok(Session {
                    owner: self.id,
                    state,
                    last_resolved: vec![],
                })
            }
            Some(session) if session.owner != self.id => Err(Error::TypeMismatch),
            Some(mut session) => {
                session.last_resolved = match (content, revision) {
                    (None, _) => session.state.terminate(),
                    (Some(c), _) if c.is_empty() => session.state.terminate(),
                    (Some(_), _) if session.state.is_terminal() => vec![],
                    (Some(c), Some(r)) => session.state.advance(&self.differ, r, c)?,
                    (Some(_), None) => {
                        return Err(Error::InvalidArgument("revision is required with content"))
                    }
                };

                Ok(session)
            }
        }
    }

    /// Like [`blame`](Self::blame), for callers that only hold type-erased
    /// handles. A handle that is not a `Session<T, R>` from this blamer is a
    /// [`Error::TypeMismatch`].
    pub fn blame_any<T, R>(
        &self,
        handle: Option<Box<dyn Any>>,
        revision: Option<R>,
        content: Option<&[T]>,
    ) -> Result<Box<dyn Any>>
    where
        T: Clone + PartialEq + 'static,
        R: Clone + 'static,
        D: Differ<T>,
    {
        let handle = handle
            .map(|h| h.downcast::<Session<T, R>>().map_err(|_| Error::TypeMismatch))
            .transpose()?
            .map(|s| *s);

        let session = self.blame(handle, revision, content)?;

        Ok(Box::new(session))
    }
}

/// An opaque handle to the blame of one document.
#[derive(Debug)]
pub struct Session<T, R> {
    owner: u64,
    state: AttributionState<T, R>,
    last_resolved: Vec<Range<usize>>,
}

impl<T, R> Session<T, R> {
    /// The blamed lines in document order, each with its revision once that is
    /// known.
    pub fn iter(&self) -> impl Iterator<Item = (&T, Option<&R>)> + '_ {
        self.state.iter()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.state.is_fully_resolved()
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn oldest_revision_seen(&self) -> &R {
        self.state.oldest_revision_seen()
    }

    pub fn attributions(&self) -> &[Attribution<R>] {
        self.state.attributions()
    }

    /// The lines resolved by the most recent call to [`Blamer::blame`].
    pub fn last_resolved(&self) -> &[Range<usize>] {
        &self.last_resolved
    }
}

impl<T, R> Session<T, R>
where
    T: Clone + PartialEq,
    R: Clone,
{
    /// The finished blame. Fails unless the end of history has been reached.
    pub fn finish(self) -> Result<Blame<T, R>> {
        self.state.finish()
    }
}
