//! Relay indices, relay sets and their mask encoding.
//!
//! The board addresses relays 1-8. A set of relays travels as a single byte
//! where bit `n - 1` stands for relay `n`, both in the state reply and when
//! deciding which per-relay commands to send.

use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::*;

/// A relay channel number, always in `1..=8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelayIndex(u8);

impl RelayIndex {
    /// Create a relay index, rejecting values outside 1-8.
    pub fn new(index: u8) -> ProtocolResult<Self> {
        if (1..=RELAY_COUNT).contains(&index) {
            Ok(RelayIndex(index))
        } else {
            Err(ProtocolError::InvalidRelayIndex(index))
        }
    }

    /// Get the relay number.
    pub fn get(self) -> u8 {
        self.0
    }

    /// Mask with only this relay's bit set.
    pub fn mask(self) -> u8 {
        1 << (self.0 - 1)
    }
}

impl fmt::Display for RelayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for RelayIndex {
    type Error = ProtocolError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        RelayIndex::new(index)
    }
}

/// A set of relays stored as its wire mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelaySet(u8);

impl RelaySet {
    /// No relays.
    pub const EMPTY: RelaySet = RelaySet(0);
    /// Every relay on the board.
    pub const ALL: RelaySet = RelaySet(ALL_RELAYS_MASK);

    /// Wrap a raw mask. Every 8-bit value is a valid set.
    pub fn from_mask(mask: u8) -> Self {
        RelaySet(mask)
    }

    /// Get the raw mask.
    pub fn mask(self) -> u8 {
        self.0
    }

    /// Check whether a relay is a member.
    pub fn contains(self, relay: RelayIndex) -> bool {
        self.0 & relay.mask() != 0
    }

    /// Add a relay. Adding a member again has no effect.
    pub fn insert(&mut self, relay: RelayIndex) {
        self.0 |= relay.mask();
    }

    /// Drop a relay. Removing a non-member has no effect.
    pub fn remove(&mut self, relay: RelayIndex) {
        self.0 &= !relay.mask();
    }

    /// Number of relays in the set.
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set has no relays.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether the set is the distinguished all-relays value.
    pub fn is_all(self) -> bool {
        self.0 == ALL_RELAYS_MASK
    }

    /// Whether the set holds exactly one relay.
    pub fn is_single(self) -> bool {
        is_single_bit(self.0)
    }

    /// Iterate the members in ascending order.
    pub fn iter(self) -> RelayIndices {
        mask_to_indices(self.0)
    }
}

impl BitOr for RelaySet {
    type Output = RelaySet;

    fn bitor(self, rhs: RelaySet) -> RelaySet {
        RelaySet(self.0 | rhs.0)
    }
}

impl From<RelayIndex> for RelaySet {
    fn from(relay: RelayIndex) -> Self {
        RelaySet(relay.mask())
    }
}

impl FromIterator<RelayIndex> for RelaySet {
    fn from_iter<I: IntoIterator<Item = RelayIndex>>(iter: I) -> Self {
        let mut set = RelaySet::EMPTY;
        for relay in iter {
            set.insert(relay);
        }
        set
    }
}

impl IntoIterator for RelaySet {
    type Item = RelayIndex;
    type IntoIter = RelayIndices;

    fn into_iter(self) -> RelayIndices {
        self.iter()
    }
}

impl FromStr for RelaySet {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_relay_list(s)
    }
}

/// Renders the mask most significant bit first, so relay 8 is leftmost.
impl fmt::Display for RelaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08b}", self.0)
    }
}

/// Parse a relay list such as `"135"` into a set.
///
/// Each character must be a digit 1-8. Parsing stops at the first space and
/// ignores whatever follows it. Repeated digits are accepted.
pub fn parse_relay_list(text: &str) -> ProtocolResult<RelaySet> {
    let mut set = RelaySet::EMPTY;
    for c in text.chars().take_while(|&c| c != ' ') {
        let index = match c {
            '1'..='8' => c as u8 - b'0',
            _ => return Err(ProtocolError::InvalidRelayToken(c)),
        };
        set.insert(RelayIndex(index));
    }
    Ok(set)
}

/// Iterate the relays whose bits are set in `mask`, lowest relay first.
pub fn mask_to_indices(mask: u8) -> RelayIndices {
    RelayIndices { remaining: mask }
}

/// True iff exactly one bit of `mask` is set. Zero has no bit set and is
/// not a single relay.
pub fn is_single_bit(mask: u8) -> bool {
    mask != 0 && mask & (mask - 1) == 0
}

/// Ascending iterator over the relays of a mask.
#[derive(Debug, Clone)]
pub struct RelayIndices {
    remaining: u8,
}

impl Iterator for RelayIndices {
    type Item = RelayIndex;

    fn next(&mut self) -> Option<RelayIndex> {
        if self.remaining == 0 {
            return None;
        }
        let bit = self.remaining.trailing_zeros() as u8;
        // Clear the lowest set bit
        self.remaining &= self.remaining - 1;
        Some(RelayIndex(bit + 1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for RelayIndices {}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices(mask: u8) -> Vec<u8> {
        mask_to_indices(mask).map(RelayIndex::get).collect()
    }

    #[test]
    fn test_relay_index_bounds() {
        assert_eq!(RelayIndex::new(0), Err(ProtocolError::InvalidRelayIndex(0)));
        assert_eq!(RelayIndex::new(9), Err(ProtocolError::InvalidRelayIndex(9)));
        assert_eq!(RelayIndex::new(1).unwrap().mask(), 0x01);
        assert_eq!(RelayIndex::new(8).unwrap().mask(), 0x80);
    }

    #[test]
    fn test_parse_relay_list() {
        assert_eq!(parse_relay_list("135").unwrap().mask(), 0x15);
        assert_eq!(parse_relay_list("8").unwrap().mask(), 0x80);
        assert_eq!(parse_relay_list("").unwrap(), RelaySet::EMPTY);
        assert_eq!(parse_relay_list("12345678").unwrap(), RelaySet::ALL);
    }

    #[test]
    fn test_parse_relay_list_duplicates() {
        assert_eq!(parse_relay_list("3333").unwrap().mask(), 0x04);
        assert_eq!(parse_relay_list("121").unwrap().mask(), 0x03);
    }

    #[test]
    fn test_parse_relay_list_stops_at_space() {
        assert_eq!(parse_relay_list("12 xyz").unwrap().mask(), 0x03);
        assert_eq!(parse_relay_list(" 9").unwrap(), RelaySet::EMPTY);
    }

    #[test]
    fn test_parse_relay_list_rejects_tokens() {
        assert_eq!(parse_relay_list("9"), Err(ProtocolError::InvalidRelayToken('9')));
        assert_eq!(parse_relay_list("0"), Err(ProtocolError::InvalidRelayToken('0')));
        assert_eq!(parse_relay_list("12a4"), Err(ProtocolError::InvalidRelayToken('a')));
        assert_eq!(parse_relay_list("1,2"), Err(ProtocolError::InvalidRelayToken(',')));
    }

    #[test]
    fn test_from_str() {
        let set: RelaySet = "42".parse().unwrap();
        assert_eq!(set.mask(), 0x0A);
        assert!("x".parse::<RelaySet>().is_err());
    }

    #[test]
    fn test_parse_then_indices_recovers_digits() {
        // Every subset of 1..8, written in descending order to exercise sorting
        for mask in 0..=255u8 {
            let text: String = (1..=8u8)
                .rev()
                .filter(|i| mask & (1 << (i - 1)) != 0)
                .map(|i| (b'0' + i) as char)
                .collect();
            let set = parse_relay_list(&text).unwrap();
            let mut expected: Vec<u8> = text.bytes().map(|b| b - b'0').collect();
            expected.sort_unstable();
            assert_eq!(indices(set.mask()), expected, "input {:?}", text);
        }
    }

    #[test]
    fn test_mask_to_indices_len_is_popcount() {
        for mask in 0..=255u8 {
            let iter = mask_to_indices(mask);
            assert_eq!(iter.len(), mask.count_ones() as usize);
            assert_eq!(iter.count(), mask.count_ones() as usize);
        }
        assert!(indices(0).is_empty());
        assert_eq!(indices(0x05), vec![1, 3]);
        assert_eq!(indices(0xFF), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_mask_to_indices_restartable() {
        let iter = mask_to_indices(0xA0);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_is_single_bit() {
        assert!(!is_single_bit(0));
        assert!(is_single_bit(1));
        assert!(is_single_bit(128));
        assert!(!is_single_bit(3));
        assert_eq!((0..=255u8).filter(|&m| is_single_bit(m)).count(), 8);
    }

    #[test]
    fn test_relay_set_ops() {
        let mut set = RelaySet::EMPTY;
        assert!(set.is_empty());
        set.insert(RelayIndex::new(2).unwrap());
        set.insert(RelayIndex::new(2).unwrap());
        assert_eq!(set.len(), 1);
        assert!(set.is_single());
        assert!(set.contains(RelayIndex::new(2).unwrap()));
        assert!(!set.contains(RelayIndex::new(3).unwrap()));

        let union = set | RelaySet::from(RelayIndex::new(7).unwrap());
        assert_eq!(union.mask(), 0x42);
        let mut union = union;
        union.remove(RelayIndex::new(2).unwrap());
        union.remove(RelayIndex::new(5).unwrap());
        assert_eq!(union.mask(), 0x40);
        assert!(RelaySet::ALL.is_all());
    }

    #[test]
    fn test_relay_set_display() {
        assert_eq!(RelaySet::from_mask(0x05).to_string(), "00000101");
        assert_eq!(RelaySet::from_mask(0x80).to_string(), "10000000");
    }
}
