//! Protocol constants
//!
//! Command codes and reply lengths of the TOSR-0n serial protocol. Every
//! command is a single byte; replies are raw bytes with a fixed length per
//! command and no framing.

// ============================================================================
// Command Codes (host → board)
// ============================================================================

/// Query the module id and software version.
pub const CMD_SW_VERSION: u8 = b'Z';
/// Query the state of all relays as a bitmask.
pub const CMD_RELAY_STATE: u8 = b'[';
/// Query the DC input voltage.
pub const CMD_DC_INPUT: u8 = b']';
/// Switch every relay on. Single relays follow at `CMD_ENABLE_ALL + n`.
pub const CMD_ENABLE_ALL: u8 = b'd';
/// Switch every relay off. Single relays follow at `CMD_DISABLE_ALL + n`.
pub const CMD_DISABLE_ALL: u8 = b'n';

// ============================================================================
// Reply Lengths (board → host)
// ============================================================================

/// Version reply: module id, software version.
pub const SW_VERSION_REPLY_LEN: usize = 2;
/// Relay state reply: one mask byte.
pub const RELAY_STATE_REPLY_LEN: usize = 1;
/// DC input reply: one byte in tenths of a volt.
pub const DC_INPUT_REPLY_LEN: usize = 1;

// ============================================================================
// Board Layout
// ============================================================================

/// Number of relay channels on the board.
pub const RELAY_COUNT: u8 = 8;
/// Mask with every relay set.
pub const ALL_RELAYS_MASK: u8 = 0xFF;
