//! Replies from the relay board.
//!
//! Every reply is a fixed number of raw bytes with no header, so decoding is
//! purely positional. A reply of the wrong length is a transport failure and
//! is never truncated or padded.

use std::fmt;

use crate::constants::*;
use crate::error::*;
use crate::relays::*;

/// Module identification returned by the version query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionInfo {
    /// Board model id.
    pub module_id: u8,
    /// Firmware version.
    pub sw_version: u8,
}

/// Typed result of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// Module id and software version.
    VersionInfo(VersionInfo),

    /// State of all relays.
    RelayState(RelaySet),

    /// State of one relay.
    RelayActive {
        /// Relay that was queried.
        relay: RelayIndex,
        /// Whether it is switched on.
        active: bool,
    },

    /// DC input voltage in tenths of a volt.
    DcInputDeciVolts(u8),

    /// Relay switch commands were written.
    Done,
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::VersionInfo(info) => write!(
                f,
                "Module ID: {} - Software version: {}",
                info.module_id, info.sw_version
            ),
            Reply::RelayState(state) => {
                write!(f, "Relay state (little endian): '{}' ({:x})", state, state.mask())
            }
            Reply::RelayActive { relay, active } => {
                let word = if *active { "active" } else { "inactive" };
                write!(f, "Relay {} is {}", relay, word)
            }
            Reply::DcInputDeciVolts(dv) => write!(f, "DC (in dV): {}", dv),
            Reply::Done => write!(f, "OK"),
        }
    }
}

fn check_len(data: &[u8], expected: usize) -> ProtocolResult<()> {
    if data.len() != expected {
        return Err(ProtocolError::TransportReadFailed {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Decode a version reply: module id, then software version.
pub fn decode_version(data: &[u8]) -> ProtocolResult<VersionInfo> {
    check_len(data, SW_VERSION_REPLY_LEN)?;
    Ok(VersionInfo {
        module_id: data[0],
        sw_version: data[1],
    })
}

/// Decode a relay state reply. Bit 0 is relay 1.
pub fn decode_relay_state(data: &[u8]) -> ProtocolResult<RelaySet> {
    check_len(data, RELAY_STATE_REPLY_LEN)?;
    Ok(RelaySet::from_mask(data[0]))
}

/// Decode a DC input reply in tenths of a volt.
pub fn decode_dc_input(data: &[u8]) -> ProtocolResult<u8> {
    check_len(data, DC_INPUT_REPLY_LEN)?;
    Ok(data[0])
}
