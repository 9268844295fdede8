//! Board configuration.

use serde::{Deserialize, Serialize};
use tosr_protocol::RelaySet;

/// Identity and initial state of a simulated board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Module id reported by the version query.
    pub module_id: u8,
    /// Software version reported by the version query.
    pub sw_version: u8,
    /// DC input in tenths of a volt.
    pub dc_input: u8,
    /// Relays switched on at power-up, as a mask.
    pub relays: RelaySet,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            module_id: 15,
            sw_version: 3,
            dc_input: 120,
            relays: RelaySet::EMPTY,
        }
    }
}
