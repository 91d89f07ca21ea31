//! Error types for control-channel operations.

use sdn_types::DatapathId;
use thiserror::Error;

/// Result type alias for channel operations.
pub type ChannelResult<T> = Result<T, ChannelError>;

/// Errors raised at the controller side of the control channel.
#[derive(Debug, Clone, Error)]
pub enum ChannelError {
    /// The outbound half of the channel has been dropped.
    #[error("Control channel to switch {dpid} is closed")]
    Closed {
        /// The switch the message was addressed to.
        dpid: DatapathId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ChannelError::Closed {
            dpid: DatapathId::new(1),
        };
        assert_eq!(err.to_string(), "Control channel to switch 00-00-00-00-00-01 is closed");
    }
}
