//! # tosr-sim
//!
//! A simulated TOSR-0n relay board.
//!
//! [`SimulatedBoard`] implements `std::io::Read` and `std::io::Write` and so
//! plugs into a `tosr_protocol::Session` wherever a serial port would. Bytes
//! written to it are executed as board commands; query replies are queued and
//! handed out by subsequent reads. A read with nothing queued times out the
//! way a serial port with a read timeout does.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tosr_protocol::{Operation, RelaySet, Session};
//! use tosr_sim::{BoardConfig, SimulatedBoard};
//!
//! let mut session = Session::new(SimulatedBoard::new(BoardConfig::default()));
//! session.execute(Operation::enable(RelaySet::from_mask(0x05)))?;
//! assert_eq!(session.transport().relays().mask(), 0x05);
//! ```

mod board;
mod config;

pub use board::*;
pub use config::*;
