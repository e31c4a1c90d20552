/// The ways a differ can break its contract. See [`Error::DifferContractViolation`].
#[derive(thiserror::Error, Clone, Debug, Eq, PartialEq)]
pub enum Violation {
    /// Edit number `index` starts before the previous edit ended.
    #[error("edit {index} at position {position} overlaps or precedes the previous edit ending at {previous_end}")]
    OutOfOrder {
        index: usize,
        position: usize,
        previous_end: usize,
    },
    /// Edit number `index` removes elements past the end of the content.
    #[error("edit {index} removes {removed} elements at position {position} but the content has only {len}")]
    OutOfBounds {
        index: usize,
        position: usize,
        removed: usize,
        len: usize,
    },
    /// Applying the whole script did not reproduce the older snapshot.
    #[error("edited content ({actual_len} elements) differs from the older snapshot ({expected_len} elements)")]
    ContentMismatch { expected_len: usize, actual_len: usize },
}

/// The error produced if a blame cannot be produced.
#[derive(thiserror::Error, Debug, Eq, PartialEq)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("Handle was not produced by this blamer")]
    TypeMismatch,
    #[error("Differ broke its contract: {0}")]
    DifferContractViolation(Violation),
    #[error("History contains no revisions")]
    EmptyHistory,
    #[error("Blame is incomplete, {unresolved} lines are unresolved")]
    Incomplete { unresolved: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
