//! TOSR-0n Relay Board Protocol
//!
//! This crate implements the host side of the serial command protocol spoken
//! by TOSR-0n relay boards. The board has eight relays and understands
//! single-byte commands; queries are answered with a fixed number of raw
//! bytes and relay switching is not acknowledged.
//!
//! # Protocol Overview
//!
//! - **Queries** (`Z`, `[`, `]`): version, relay state mask, DC input voltage
//! - **Switching** (`d`..`l`, `n`..`v`): all relays or relay *n* on/off
//! - **Replies**: 2 bytes for the version, 1 byte otherwise, no framing
//!
//! The crate does not open or configure serial ports. Any blocking
//! `Read + Write` stream with a read timeout can be used as the [`Transport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use tosr_protocol::{parse_relay_list, Operation, Session};
//!
//! let mut session = Session::new(port);
//! session.execute(Operation::enable(parse_relay_list("135")?))?;
//! let reply = session.execute(Operation::QueryRelayState)?;
//! println!("{}", reply);
//! ```

mod commands;
mod config;
mod constants;
mod error;
mod relays;
mod responses;
mod session;
mod transport;

pub use commands::*;
pub use config::*;
pub use constants::*;
pub use error::*;
pub use relays::*;
pub use responses::*;
pub use session::*;
pub use transport::*;
