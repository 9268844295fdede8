//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when talking to a relay board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A relay list contained something other than a digit 1-8.
    #[error("'{0}' is not a valid value for a relay, admitted values are [1..8]")]
    InvalidRelayToken(char),

    /// A relay number outside 1-8.
    #[error("invalid relay number {0}, admitted values are [1..8]")]
    InvalidRelayIndex(u8),

    /// A single-relay query was given zero or several relays.
    #[error("per-relay state is allowed only for one relay (mask 0x{0:02X})")]
    NotASingleRelay(u8),

    /// A command byte was not fully written.
    #[error("write of command 0x{command:02X} failed: {written} bytes written")]
    TransportWriteFailed {
        /// Command byte being sent.
        command: u8,
        /// Bytes actually accepted by the transport.
        written: usize,
    },

    /// A reply did not have the expected length.
    #[error("read error: requested {expected} bytes, read {actual}")]
    TransportReadFailed {
        /// Reply length the command calls for.
        expected: usize,
        /// Bytes actually received.
        actual: usize,
    },

    /// Byte is not a command the board understands.
    #[error("unknown command code: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Relay state read back after a write does not match the request.
    #[error("relays 0x{requested:02X} did not switch, board reports state 0x{state:02X}")]
    VerifyFailed {
        /// Relays the write addressed.
        requested: u8,
        /// State reported by the board afterwards.
        state: u8,
    },
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
