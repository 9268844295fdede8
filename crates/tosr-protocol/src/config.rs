//! Session configuration.

use serde::{Deserialize, Serialize};

/// Options controlling how a session encodes and checks operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Send the full relay set as one all-relays command instead of eight
    /// single-relay commands.
    pub all_relays_shortcut: bool,
    /// Read the relay state back after every relay switch and fail if the
    /// addressed relays did not change. Switching is fire-and-forget when off.
    pub verify_writes: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            all_relays_shortcut: true,
            verify_writes: false,
        }
    }
}
