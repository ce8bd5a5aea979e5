//! Unified error handling for parley.
//!
//! Engine faults never reach callers of `write` or the handler API; they
//! turn into a disconnect or a log line. The types here cover the few
//! places where an error does surface: establishing a connection and
//! handler bodies.

use parley_proto::ProtocolError;
use thiserror::Error;

use crate::config::ConfigError;

// ============================================================================
// Client Errors (connection lifecycle)
// ============================================================================

/// Errors returned while establishing or running a connection.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("already connected")]
    AlreadyConnected,

    #[error("no server configured")]
    NoServerConfigured,

    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

// ============================================================================
// Handler Errors (event processing)
// ============================================================================

/// Errors a handler may report. They are logged by the dispatcher and
/// otherwise ignored.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("not enough parameters for {command}")]
    NeedMoreParams { command: &'static str },

    #[error("event has no origin")]
    MissingOrigin,

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NeedMoreParams { .. } => "need_more_params",
            Self::MissingOrigin => "missing_origin",
            Self::Internal(_) => "internal_error",
            Self::Other(_) => "other",
        }
    }
}

/// Result type for event handlers.
pub type HandlerResult = Result<(), HandlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            HandlerError::NeedMoreParams { command: "ping" }.error_code(),
            "need_more_params"
        );
        assert_eq!(HandlerError::MissingOrigin.error_code(), "missing_origin");
        let other: HandlerError = anyhow::anyhow!("boom").into();
        assert_eq!(other.error_code(), "other");
        assert_eq!(other.to_string(), "boom");
    }

    #[test]
    fn test_client_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err: ClientError = io_err.into();
        assert!(matches!(err, ClientError::Io(_)));
        assert_eq!(err.to_string(), "io error: refused");
    }
}
