use std::num::ParseIntError;
use thiserror::Error;

/// Errors surfaced by the line buffer engine.
///
/// Every precondition violation is signaled to the immediate caller;
/// nothing is swallowed. IO and durable-write failures from the `io`
/// module convert into this type at the buffer boundary.
#[derive(Debug, Error)]
pub enum BufferError {
    #[error("{what} {index} is out of bounds (valid up to {limit})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("invalid numeric argument: {0}")]
    InvalidArgument(#[from] ParseIntError),

    #[error("no file path set and none was given")]
    PathNotSet,

    #[error(transparent)]
    Io(#[from] crate::io::IoError),

    #[error(transparent)]
    Durable(#[from] crate::io::durable::WriteError),
}

pub type Result<T> = std::result::Result<T, BufferError>;

impl BufferError {
    pub(crate) fn out_of_range(what: &'static str, index: usize, limit: usize) -> Self {
        BufferError::OutOfRange { what, index, limit }
    }

    pub(crate) fn precondition(message: impl Into<String>) -> Self {
        BufferError::PreconditionFailed(message.into())
    }
}
