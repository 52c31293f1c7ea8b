//! RLC SDU

use std::time::Instant;

use bytes::Bytes;

/// An SDU handed to RLC by the upper layer.
///
/// An SDU whose `buf` is empty has been discarded while queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RlcSdu {
    /// Payload
    pub buf: Bytes,
    /// PDCP SN, used to match discard requests
    pub pdcp_sn: Option<u32>,
    /// Time the SDU was handed to RLC
    pub time_of_arrival: Instant,
}

impl RlcSdu {
    /// Creates an SDU stamped with the current time.
    pub fn new(buf: impl Into<Bytes>, pdcp_sn: Option<u32>) -> Self {
        Self {
            buf: buf.into(),
            pdcp_sn,
            time_of_arrival: Instant::now(),
        }
    }

    /// Creates an SDU carrying a PDCP SN.
    pub fn with_pdcp_sn(buf: impl Into<Bytes>, pdcp_sn: u32) -> Self {
        Self::new(buf, Some(pdcp_sn))
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if the payload is empty (discarded)
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
