//! Error types for folkchat-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Connection was closed by the server")]
    ConnectionClosed,

    #[error("Socket error: {0}")]
    Socket(#[source] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(#[source] std::io::Error),

    #[error("Line too long: no frame delimiter within {max} bytes")]
    LineTooLong { max: usize },

    #[error("Response size is bad: {0:?}")]
    MalformedCount(String),

    #[error("Unexpected data while no request is outstanding: {0:?}")]
    UnexpectedData(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    // Input rejected before it reaches the wire
    #[error("Line breaks are not allowed in messages")]
    EmbeddedDelimiter,

    #[error("Message too long: {size} bytes (max: {max})")]
    MessageTooLong { size: usize, max: usize },

    #[error("Nick too long: {size} bytes (max: {max})")]
    NickTooLong { size: usize, max: usize },

    #[error("Too many pending requests (max: {max}), try again")]
    Backlogged { max: usize },
}

impl CoreError {
    /// Whether the error ends the session.
    ///
    /// Input validation errors are reported to the user and the session
    /// continues; everything else means the stream can no longer be trusted.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            CoreError::EmbeddedDelimiter
                | CoreError::MessageTooLong { .. }
                | CoreError::NickTooLong { .. }
                | CoreError::Backlogged { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::ConnectionClosed;
        assert_eq!(err.to_string(), "Connection was closed by the server");
    }

    #[test]
    fn test_malformed_count_display() {
        let err = CoreError::MalformedCount("-1".into());
        assert_eq!(err.to_string(), "Response size is bad: \"-1\"");
    }

    #[test]
    fn test_message_too_long_display() {
        let err = CoreError::MessageTooLong { size: 141, max: 140 };
        assert_eq!(err.to_string(), "Message too long: 141 bytes (max: 140)");
    }

    #[test]
    fn test_fatality() {
        assert!(CoreError::ConnectionClosed.is_fatal());
        assert!(CoreError::LineTooLong { max: 173 }.is_fatal());
        assert!(CoreError::UnexpectedData("x".into()).is_fatal());
        assert!(!CoreError::EmbeddedDelimiter.is_fatal());
        assert!(!CoreError::Backlogged { max: 16 }.is_fatal());
    }
}
