//! Error types for line parsing and framing.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtocolError`].
pub type Result<T, E = ProtocolError> = std::result::Result<T, E>;

/// Errors surfaced by the line codec.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProtocolError {
    /// I/O error during reading or writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProtocolError {
    /// The underlying I/O error kind, if this is an I/O error.
    pub fn io_kind(&self) -> Option<std::io::ErrorKind> {
        match self {
            Self::Io(e) => Some(e.kind()),
        }
    }
}

/// Errors encountered when tokenizing a single protocol line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The line was empty (or only whitespace).
    #[error("empty message")]
    EmptyMessage,

    /// A prefix was present but no command token followed it.
    #[error("missing command in {line:?}")]
    MissingCommand {
        /// The offending line.
        line: String,
    },
}
