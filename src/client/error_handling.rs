//! Read error classification.
//!
//! A fatal error ends the connection. A transient one is logged and the
//! reader tries again. Anything not recognized is treated as fatal.

use std::io::ErrorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ReadErrorAction {
    /// The connection is gone; disconnect.
    Fatal,
    /// Retry the read.
    Transient,
}

pub(super) fn classify_read_error(kind: ErrorKind) -> ReadErrorAction {
    match kind {
        ErrorKind::Interrupted | ErrorKind::WouldBlock => ReadErrorAction::Transient,
        ErrorKind::TimedOut
        | ErrorKind::ConnectionReset
        | ErrorKind::ConnectionAborted
        | ErrorKind::NetworkUnreachable
        | ErrorKind::HostUnreachable
        | ErrorKind::BrokenPipe
        | ErrorKind::NotConnected
        | ErrorKind::UnexpectedEof => ReadErrorAction::Fatal,
        _ => ReadErrorAction::Fatal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_loss_is_fatal() {
        for kind in [
            ErrorKind::TimedOut,
            ErrorKind::ConnectionReset,
            ErrorKind::ConnectionAborted,
            ErrorKind::BrokenPipe,
            ErrorKind::NotConnected,
            ErrorKind::UnexpectedEof,
        ] {
            assert_eq!(classify_read_error(kind), ReadErrorAction::Fatal, "{kind:?}");
        }
    }

    #[test]
    fn test_interrupted_is_transient() {
        assert_eq!(
            classify_read_error(ErrorKind::Interrupted),
            ReadErrorAction::Transient
        );
        assert_eq!(
            classify_read_error(ErrorKind::WouldBlock),
            ReadErrorAction::Transient
        );
    }

    #[test]
    fn test_unknown_is_fatal() {
        assert_eq!(
            classify_read_error(ErrorKind::InvalidData),
            ReadErrorAction::Fatal
        );
    }
}
