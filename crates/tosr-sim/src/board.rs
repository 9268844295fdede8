//! Board state machine.

use std::io::{self, Read, Write};

use bytes::{Buf, BufMut, BytesMut};
use tosr_protocol::{CommandKind, RelaySet, SW_VERSION_REPLY_LEN};
use tracing::{debug, trace, warn};

use crate::config::BoardConfig;

/// Faults the board can be told to produce.
#[derive(Debug, Clone, Default)]
struct Faults {
    /// Cut the next reply down to this many bytes.
    truncate_next_reply: Option<usize>,
    /// Accept no bytes on write.
    refuse_writes: bool,
    /// Acknowledge switch commands without changing any relay.
    stuck_relays: bool,
}

/// A simulated TOSR-0n board.
#[derive(Debug)]
pub struct SimulatedBoard {
    config: BoardConfig,
    relays: RelaySet,
    /// Reply bytes waiting to be read by the host.
    outbound: BytesMut,
    /// Every byte the host has written, in order.
    command_log: Vec<u8>,
    faults: Faults,
}

impl SimulatedBoard {
    /// Power up a board.
    pub fn new(config: BoardConfig) -> Self {
        SimulatedBoard {
            relays: config.relays,
            config,
            outbound: BytesMut::with_capacity(SW_VERSION_REPLY_LEN * 4),
            command_log: Vec::new(),
            faults: Faults::default(),
        }
    }

    /// Current relay state.
    pub fn relays(&self) -> RelaySet {
        self.relays
    }

    /// Force the relay state, as if switched by hand.
    pub fn set_relays(&mut self, relays: RelaySet) {
        self.relays = relays;
    }

    /// Change the DC input reading.
    pub fn set_dc_input(&mut self, deci_volts: u8) {
        self.config.dc_input = deci_volts;
    }

    /// Bytes written by the host so far.
    pub fn command_log(&self) -> &[u8] {
        &self.command_log
    }

    /// Number of reply bytes not yet read.
    pub fn pending_reply_len(&self) -> usize {
        self.outbound.len()
    }

    /// Send at most `len` bytes of the next reply.
    pub fn truncate_next_reply(&mut self, len: usize) {
        self.faults.truncate_next_reply = Some(len);
    }

    /// Make writes accept nothing, as a disconnected adapter would.
    pub fn refuse_writes(&mut self, refuse: bool) {
        self.faults.refuse_writes = refuse;
    }

    /// Keep relays in their current state whatever is commanded.
    pub fn stick_relays(&mut self, stuck: bool) {
        self.faults.stuck_relays = stuck;
    }

    fn handle_byte(&mut self, byte: u8) {
        self.command_log.push(byte);

        let kind = match CommandKind::from_byte(byte) {
            Ok(kind) => kind,
            Err(e) => {
                // The board silently drops bytes it does not understand
                warn!("ignoring byte: {}", e);
                return;
            }
        };
        trace!(?kind, "command");

        match kind {
            CommandKind::QueryVersion => {
                self.reply(&[self.config.module_id, self.config.sw_version]);
            }
            CommandKind::QueryRelayState => self.reply(&[self.relays.mask()]),
            CommandKind::QueryDcInput => self.reply(&[self.config.dc_input]),
            CommandKind::EnableAll => self.switch(RelaySet::ALL),
            CommandKind::DisableAll => self.switch(RelaySet::EMPTY),
            CommandKind::Enable(relay) => {
                let mut next = self.relays;
                next.insert(relay);
                self.switch(next);
            }
            CommandKind::Disable(relay) => {
                let mut next = self.relays;
                next.remove(relay);
                self.switch(next);
            }
        }
    }

    fn switch(&mut self, next: RelaySet) {
        if self.faults.stuck_relays {
            debug!(requested = %next, "relays stuck at {}", self.relays);
            return;
        }
        debug!(from = %self.relays, to = %next, "relays switched");
        self.relays = next;
    }

    fn reply(&mut self, data: &[u8]) {
        let len = match self.faults.truncate_next_reply.take() {
            Some(limit) => limit.min(data.len()),
            None => data.len(),
        };
        self.outbound.put_slice(&data[..len]);
    }
}

impl Default for SimulatedBoard {
    fn default() -> Self {
        Self::new(BoardConfig::default())
    }
}

impl Write for SimulatedBoard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.faults.refuse_writes {
            return Ok(0);
        }
        for &byte in buf {
            self.handle_byte(byte);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for SimulatedBoard {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        if self.outbound.is_empty() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "no reply from board"));
        }
        let n = buf.len().min(self.outbound.len());
        buf[..n].copy_from_slice(&self.outbound[..n]);
        self.outbound.advance(n);
        Ok(n)
    }
}
