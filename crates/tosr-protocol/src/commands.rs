//! Commands that can be sent to the relay board.

use std::fmt;

use crate::config::SessionConfig;
use crate::constants::*;
use crate::error::*;
use crate::relays::*;

/// A single command byte.
///
/// Commands are only built through the constructors below, which keep every
/// byte inside the board's command table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Command(u8);

impl Command {
    /// Query module id and software version.
    pub const QUERY_VERSION: Command = Command(CMD_SW_VERSION);
    /// Query the relay state mask.
    pub const QUERY_RELAY_STATE: Command = Command(CMD_RELAY_STATE);
    /// Query the DC input voltage.
    pub const QUERY_DC_INPUT: Command = Command(CMD_DC_INPUT);
    /// Switch every relay on.
    pub const ENABLE_ALL: Command = Command(CMD_ENABLE_ALL);
    /// Switch every relay off.
    pub const DISABLE_ALL: Command = Command(CMD_DISABLE_ALL);

    /// Switch one relay on.
    pub fn enable(relay: RelayIndex) -> Self {
        Command(CMD_ENABLE_ALL + relay.get())
    }

    /// Switch one relay off.
    pub fn disable(relay: RelayIndex) -> Self {
        Command(CMD_DISABLE_ALL + relay.get())
    }

    /// Switch one relay on or off.
    pub fn switch(relay: RelayIndex, enable: bool) -> Self {
        if enable {
            Command::enable(relay)
        } else {
            Command::disable(relay)
        }
    }

    /// Get the byte sent on the wire.
    pub fn byte(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' (0x{:02X})", self.0 as char, self.0)
    }
}

/// What a command byte asks the board to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Report module id and software version (2-byte reply).
    QueryVersion,
    /// Report the relay state mask (1-byte reply).
    QueryRelayState,
    /// Report the DC input in tenths of a volt (1-byte reply).
    QueryDcInput,
    /// Switch every relay on.
    EnableAll,
    /// Switch one relay on.
    Enable(RelayIndex),
    /// Switch every relay off.
    DisableAll,
    /// Switch one relay off.
    Disable(RelayIndex),
}

impl CommandKind {
    /// Decode a received byte. Bytes outside the command table are rejected.
    pub fn from_byte(byte: u8) -> ProtocolResult<Self> {
        match byte {
            CMD_SW_VERSION => Ok(CommandKind::QueryVersion),
            CMD_RELAY_STATE => Ok(CommandKind::QueryRelayState),
            CMD_DC_INPUT => Ok(CommandKind::QueryDcInput),
            CMD_ENABLE_ALL => Ok(CommandKind::EnableAll),
            CMD_DISABLE_ALL => Ok(CommandKind::DisableAll),
            b if b > CMD_ENABLE_ALL && b <= CMD_ENABLE_ALL + RELAY_COUNT => {
                Ok(CommandKind::Enable(RelayIndex::new(b - CMD_ENABLE_ALL)?))
            }
            b if b > CMD_DISABLE_ALL && b <= CMD_DISABLE_ALL + RELAY_COUNT => {
                Ok(CommandKind::Disable(RelayIndex::new(b - CMD_DISABLE_ALL)?))
            }
            _ => Err(ProtocolError::UnknownCommand(byte)),
        }
    }

    /// Number of reply bytes the board sends for this command.
    pub fn reply_len(self) -> usize {
        match self {
            CommandKind::QueryVersion => SW_VERSION_REPLY_LEN,
            CommandKind::QueryRelayState => RELAY_STATE_REPLY_LEN,
            CommandKind::QueryDcInput => DC_INPUT_REPLY_LEN,
            _ => 0,
        }
    }
}

/// Encode a relay switch request.
///
/// The full set goes out as the single all-relays command. Any other set
/// yields one command per relay, lowest relay first.
pub fn encode_set_relays(relays: RelaySet, enable: bool) -> Vec<Command> {
    if relays.is_all() {
        let all = if enable {
            Command::ENABLE_ALL
        } else {
            Command::DISABLE_ALL
        };
        return vec![all];
    }
    encode_each(relays, enable)
}

/// Encode a relay switch request as per-relay commands only.
pub fn encode_each(relays: RelaySet, enable: bool) -> Vec<Command> {
    relays
        .iter()
        .map(|relay| Command::switch(relay, enable))
        .collect()
}

/// A logical request to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Read module id and software version.
    QueryVersion,

    /// Read the state of all relays.
    QueryRelayState,

    /// Read whether a single relay is active. The set must hold exactly one
    /// relay.
    QueryRelay(RelaySet),

    /// Read the DC input voltage.
    QueryDcInput,

    /// Switch a set of relays on or off.
    SetRelays {
        /// Relays to switch.
        relays: RelaySet,
        /// On (`true`) or off (`false`).
        enable: bool,
    },
}

impl Operation {
    /// Switch the given relays on.
    pub fn enable(relays: RelaySet) -> Self {
        Operation::SetRelays {
            relays,
            enable: true,
        }
    }

    /// Switch the given relays off.
    pub fn disable(relays: RelaySet) -> Self {
        Operation::SetRelays {
            relays,
            enable: false,
        }
    }

    /// Encode the operation into the command bytes to send, in order.
    pub fn commands(&self, config: &SessionConfig) -> Vec<Command> {
        match *self {
            Operation::QueryVersion => vec![Command::QUERY_VERSION],
            Operation::QueryRelayState | Operation::QueryRelay(_) => {
                vec![Command::QUERY_RELAY_STATE]
            }
            Operation::QueryDcInput => vec![Command::QUERY_DC_INPUT],
            Operation::SetRelays { relays, enable } => {
                if config.all_relays_shortcut {
                    encode_set_relays(relays, enable)
                } else {
                    encode_each(relays, enable)
                }
            }
        }
    }

    /// Number of reply bytes the operation reads back.
    pub fn reply_len(&self) -> usize {
        match self {
            Operation::QueryVersion => SW_VERSION_REPLY_LEN,
            Operation::QueryRelayState | Operation::QueryRelay(_) => RELAY_STATE_REPLY_LEN,
            Operation::QueryDcInput => DC_INPUT_REPLY_LEN,
            Operation::SetRelays { .. } => 0,
        }
    }
}
