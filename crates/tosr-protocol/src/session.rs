//! Request/response exchange with the board.
//!
//! One operation runs to completion before the next starts: input left over
//! from earlier exchanges is discarded, its command bytes are written one at
//! a time, then the fixed-length reply (if any) is read and decoded. Nothing
//! is retried; any failure ends the request.

use crate::commands::*;
use crate::config::SessionConfig;
use crate::error::*;
use crate::relays::*;
use crate::responses::*;
use crate::transport::Transport;

/// An exclusively owned connection to one board.
#[derive(Debug)]
pub struct Session<T> {
    transport: T,
    config: SessionConfig,
}

impl<T: Transport> Session<T> {
    /// Create a session with the default configuration.
    pub fn new(transport: T) -> Self {
        Session::with_config(transport, SessionConfig::default())
    }

    /// Create a session with the given configuration.
    pub fn with_config(transport: T, config: SessionConfig) -> Self {
        Session { transport, config }
    }

    /// Get the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Get the transport mutably.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Give the transport back.
    pub fn into_inner(self) -> T {
        self.transport
    }

    /// Run one operation.
    pub fn execute(&mut self, operation: Operation) -> ProtocolResult<Reply> {
        execute_with(&mut self.transport, operation, &self.config)
    }
}

/// Run one operation with the default configuration.
pub fn execute<T: Transport + ?Sized>(
    transport: &mut T,
    operation: Operation,
) -> ProtocolResult<Reply> {
    execute_with(transport, operation, &SessionConfig::default())
}

/// Run one operation.
pub fn execute_with<T: Transport + ?Sized>(
    transport: &mut T,
    operation: Operation,
    config: &SessionConfig,
) -> ProtocolResult<Reply> {
    if let Operation::QueryRelay(relays) = operation {
        if !relays.is_single() {
            return Err(ProtocolError::NotASingleRelay(relays.mask()));
        }
    }

    log::debug!("executing {:?}", operation);

    // Replies carry no framing, so a late byte from an earlier exchange would
    // be read as the start of this one
    if let Err(e) = transport.discard_input() {
        log::warn!("discarding stale input failed: {}", e);
    }

    for command in operation.commands(config) {
        send_command(transport, command)?;
    }

    match operation {
        Operation::QueryVersion => {
            let data = read_reply(transport, operation.reply_len())?;
            Ok(Reply::VersionInfo(decode_version(&data)?))
        }
        Operation::QueryRelayState => {
            let data = read_reply(transport, operation.reply_len())?;
            Ok(Reply::RelayState(decode_relay_state(&data)?))
        }
        Operation::QueryRelay(relays) => {
            let data = read_reply(transport, operation.reply_len())?;
            let state = decode_relay_state(&data)?;
            // Validated above: exactly one member
            match relays.iter().next() {
                Some(relay) => Ok(Reply::RelayActive {
                    relay,
                    active: state.contains(relay),
                }),
                None => Err(ProtocolError::NotASingleRelay(relays.mask())),
            }
        }
        Operation::QueryDcInput => {
            let data = read_reply(transport, operation.reply_len())?;
            Ok(Reply::DcInputDeciVolts(decode_dc_input(&data)?))
        }
        Operation::SetRelays { relays, enable } => {
            if config.verify_writes && !relays.is_empty() {
                verify_relays(transport, relays, enable)?;
            }
            Ok(Reply::Done)
        }
    }
}

/// Read the relay state back and check the addressed relays switched.
fn verify_relays<T: Transport + ?Sized>(
    transport: &mut T,
    relays: RelaySet,
    enable: bool,
) -> ProtocolResult<()> {
    send_command(transport, Command::QUERY_RELAY_STATE)?;
    let data = read_reply(transport, Operation::QueryRelayState.reply_len())?;
    let state = decode_relay_state(&data)?;

    let switched = state.mask() & relays.mask();
    let expected = if enable { relays.mask() } else { 0 };
    if switched != expected {
        log::warn!(
            "relays {} not {} (board state {})",
            relays,
            if enable { "enabled" } else { "disabled" },
            state
        );
        return Err(ProtocolError::VerifyFailed {
            requested: relays.mask(),
            state: state.mask(),
        });
    }
    Ok(())
}

fn send_command<T: Transport + ?Sized>(transport: &mut T, command: Command) -> ProtocolResult<()> {
    log::trace!("-> {}", command);
    let written = match transport.send(&[command.byte()]) {
        Ok(n) => n,
        Err(e) => {
            log::warn!("write of {} failed: {}", command, e);
            0
        }
    };
    if written != 1 {
        return Err(ProtocolError::TransportWriteFailed {
            command: command.byte(),
            written,
        });
    }
    Ok(())
}

fn read_reply<T: Transport + ?Sized>(
    transport: &mut T,
    expected: usize,
) -> ProtocolResult<Vec<u8>> {
    let mut buf = vec![0u8; expected];
    let actual = match transport.receive(&mut buf) {
        Ok(n) => n,
        Err(e) => {
            log::warn!("read of {} bytes failed: {}", expected, e);
            0
        }
    };
    if actual != expected {
        log::warn!("read error: requested {} bytes, read {}", expected, actual);
        return Err(ProtocolError::TransportReadFailed { expected, actual });
    }
    log::trace!("<- {:02X?}", buf);
    Ok(buf)
}
