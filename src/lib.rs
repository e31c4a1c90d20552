//! Line-by-line attribution of a document to the revisions of its history.
//!
//! Given the newest snapshot of a document and its older snapshots, newest
//! first, this crate finds for every line the revision that last introduced or
//! changed it, much like `git blame`. It does not know where the history comes
//! from: revisions are opaque labels and snapshots are slices of any comparable
//! element, usually lines. Diffing is delegated to a [`Differ`]; the default one
//! is backed by [similar].
//!
//! The whole history can be blamed in one go with [`blame_history`], or a
//! [`Blamer`] can be fed one older revision at a time through [`Session`]
//! handles, e.g. while paging through a log.
//!
//! ```
//! use ascribe::{blame_history, SliceDiffer};
//!
//! let history = vec![
//!     ("r2", vec!["a", "b", "c"]),
//!     ("r1", vec!["a", "x", "c"]),
//!     ("r0", vec!["a", "x", "c"]),
//! ];
//!
//! let blame = blame_history(&SliceDiffer::default(), history).unwrap();
//!
//! assert_eq!(blame.revisions().copied().collect::<Vec<_>>(), ["r0", "r2", "r0"]);
//! ```
//!
//! [similar]: https://docs.rs/similar

mod blame;
pub use blame::*;

mod collector;

mod differ;
pub use differ::*;

mod engine;
pub use engine::*;

mod error;
pub use error::*;

mod line_tracking;
pub use line_tracking::{Link, PositionMap};

mod session;
pub use session::*;

pub use similar::Algorithm;
