//! UMD PDU header encoding and decoding (TS 38.322 6.2.2.3)
//!
//! ```text
//! complete SDU     | SI | R R R R R R |
//! 6-bit SN         | SI |    SN      | [SO (16 bits) if middle/last]
//! 12-bit SN        | SI | R R | SN hi | SN lo | [SO (16 bits) if middle/last]
//! ```

use bytes::{Buf, BufMut, BytesMut};
use nextgran_common::UmSnSize;
use thiserror::Error;

/// Errors that can occur while decoding an RLC PDU
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PduError {
    /// Buffer too short
    #[error("buffer too short: need {needed} bytes, have {available}")]
    BufferTooShort {
        /// Number of bytes needed
        needed: usize,
        /// Number of bytes available
        available: usize,
    },

    /// Reserved bits set
    #[error("reserved bits set in header byte 0x{0:02X}")]
    ReservedBitsSet(u8),

    /// Header with no payload
    #[error("PDU carries no payload")]
    EmptyPayload,
}

/// Segmentation info field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SegmentInfo {
    /// Complete SDU
    Full = 0b00,
    /// First segment
    First = 0b01,
    /// Last segment
    Last = 0b10,
    /// Middle segment
    Middle = 0b11,
}

impl SegmentInfo {
    fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => SegmentInfo::Full,
            0b01 => SegmentInfo::First,
            0b10 => SegmentInfo::Last,
            _ => SegmentInfo::Middle,
        }
    }

    /// Returns true if the header carries an SO field
    pub fn has_so(&self) -> bool {
        matches!(self, SegmentInfo::Middle | SegmentInfo::Last)
    }

    /// Returns true if this PDU ends an SDU
    pub fn is_last(&self) -> bool {
        matches!(self, SegmentInfo::Full | SegmentInfo::Last)
    }
}

/// UMD PDU header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UmdPduHeader {
    /// Segmentation info
    pub si: SegmentInfo,
    /// Sequence number, 0 for complete SDUs
    pub sn: u32,
    /// Segment offset, 0 unless `si` is middle or last
    pub so: u16,
}

impl UmdPduHeader {
    /// Header of a complete SDU
    pub fn full() -> Self {
        Self {
            si: SegmentInfo::Full,
            sn: 0,
            so: 0,
        }
    }

    /// Encoded size of a header with the given SI
    pub fn packed_size(si: SegmentInfo, sn_size: UmSnSize) -> usize {
        if si == SegmentInfo::Full {
            return 1;
        }
        let sn_bytes = match sn_size {
            UmSnSize::Size6 => 1,
            UmSnSize::Size12 => 2,
        };
        if si.has_so() {
            sn_bytes + 2
        } else {
            sn_bytes
        }
    }

    /// Encodes the header into `buf`.
    pub fn encode_into(&self, sn_size: UmSnSize, buf: &mut BytesMut) {
        let si = (self.si as u8) << 6;
        if self.si == SegmentInfo::Full {
            buf.put_u8(si);
            return;
        }
        match sn_size {
            UmSnSize::Size6 => buf.put_u8(si | (self.sn & 0x3F) as u8),
            UmSnSize::Size12 => {
                buf.put_u8(si | ((self.sn >> 8) & 0x0F) as u8);
                buf.put_u8((self.sn & 0xFF) as u8);
            }
        }
        if self.si.has_so() {
            buf.put_u16(self.so);
        }
    }

    /// Decodes a header from the front of `data`, returning it with the
    /// header length.
    pub fn decode(data: &[u8], sn_size: UmSnSize) -> Result<(Self, usize), PduError> {
        let mut buf = data;
        if buf.is_empty() {
            return Err(PduError::BufferTooShort {
                needed: 1,
                available: 0,
            });
        }
        let si = SegmentInfo::from_bits(buf[0] >> 6);
        let size = Self::packed_size(si, sn_size);
        if buf.len() < size {
            return Err(PduError::BufferTooShort {
                needed: size,
                available: buf.len(),
            });
        }

        let first = buf.get_u8();
        let sn = match si {
            SegmentInfo::Full => {
                if first & 0x3F != 0 {
                    return Err(PduError::ReservedBitsSet(first));
                }
                0
            }
            _ => match sn_size {
                UmSnSize::Size6 => u32::from(first & 0x3F),
                UmSnSize::Size12 => {
                    if first & 0x30 != 0 {
                        return Err(PduError::ReservedBitsSet(first));
                    }
                    (u32::from(first & 0x0F) << 8) | u32::from(buf.get_u8())
                }
            },
        };
        let so = if si.has_so() { buf.get_u16() } else { 0 };

        if data.len() == size {
            return Err(PduError::EmptyPayload);
        }
        Ok((Self { si, sn, so }, size))
    }
}
