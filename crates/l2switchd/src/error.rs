//! Error types for l2switchd.
//!
//! Forwarding decisions never fail: unparsable frames, self-loops and blocked
//! destinations are handled inside the classifier. The errors here cover the
//! administrative surface, configuration and the event feed.

use sdn_types::DatapathId;
use thiserror::Error;

/// Result type alias for l2switchd operations.
pub type Result<T> = std::result::Result<T, L2SwitchError>;

/// Errors that can occur in l2switchd.
#[derive(Debug, Error)]
pub enum L2SwitchError {
    /// No live session exists for the switch.
    #[error("Switch {0} is not connected")]
    UnknownSwitch(DatapathId),

    /// Configuration file could not be parsed or failed validation.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A line of the event feed could not be decoded.
    #[error("Invalid event on line {line}: {message}")]
    InvalidEvent {
        /// 1-based line number in the feed.
        line: usize,
        /// Decoder message.
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl L2SwitchError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        L2SwitchError::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = L2SwitchError::UnknownSwitch(DatapathId::new(2));
        assert_eq!(err.to_string(), "Switch 00-00-00-00-00-02 is not connected");

        let err = L2SwitchError::InvalidEvent {
            line: 4,
            message: "missing field `event`".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid event on line 4: missing field `event`");
    }
}
