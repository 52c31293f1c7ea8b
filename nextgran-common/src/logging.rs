//! Logging infrastructure for nextgran
//!
//! PDU logging helpers on top of `tracing`, with hex dumps for debugging.
//! Installing a subscriber is left to the embedding application.

use std::fmt;

use crate::types::{DuUeIndex, Lcid};

/// Protocol direction for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Incoming/received PDU
    Rx,
    /// Outgoing/transmitted PDU
    Tx,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Rx => write!(f, "RX"),
            Direction::Tx => write!(f, "TX"),
        }
    }
}

/// Log an RLC PDU of one bearer.
///
/// PDUs are logged at trace level only, since they flow on every slot.
pub fn log_rlc_pdu(ue_index: DuUeIndex, lcid: Lcid, direction: Direction, data: &[u8]) {
    tracing::trace!(
        ue = %ue_index,
        lcid = %lcid,
        direction = %direction,
        len = data.len(),
        hex = %HexDump(data),
        "RLC PDU"
    );
}

/// Wrapper for hex dump formatting
pub struct HexDump<'a>(pub &'a [u8]);

impl fmt::Display for HexDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}
