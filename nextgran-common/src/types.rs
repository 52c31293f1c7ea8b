//! RAN identifier types: DU UE index, DU cell index, LCID, SRB/DRB IDs
//!
//! Every identifier converts into `usize` and back through `TryFrom<usize>`,
//! so it can key the identifier tables of `nextgran-adt` directly.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Maximum number of UEs handled by one DU.
pub const MAX_NOF_DU_UES: usize = 1024;

/// Maximum number of cells handled by one DU.
pub const MAX_NOF_DU_CELLS: usize = 16;

/// Highest logical channel ID usable by SRBs and DRBs (TS 38.321 table 6.2.1-1).
pub const MAX_LCID: u8 = 32;

/// First logical channel ID used by DRBs.
pub const LCID_MIN_DRB: u8 = 4;

/// Maximum number of DRBs per UE (TS 38.331 maxDRB).
pub const MAX_NOF_DRBS: u8 = 29;

macro_rules! index_conversions {
    ($name:ident, $repr:ty, $max:expr, $kind:literal) => {
        impl From<$name> for usize {
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = Error;

            fn try_from(value: usize) -> Result<Self, Error> {
                if value < $max as usize {
                    Ok(Self(value as $repr))
                } else {
                    Err(Error::InvalidId { kind: $kind, value })
                }
            }
        }
    };
}

/// UE index inside a DU (`0..MAX_NOF_DU_UES`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DuUeIndex(u16);

impl DuUeIndex {
    /// Creates a UE index, or `None` if out of range.
    pub fn new(value: u16) -> Option<Self> {
        ((value as usize) < MAX_NOF_DU_UES).then_some(Self(value))
    }

    /// Returns the inner value
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for DuUeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

index_conversions!(DuUeIndex, u16, MAX_NOF_DU_UES, "DU UE index");

/// Cell index inside a DU (`0..MAX_NOF_DU_CELLS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DuCellIndex(u8);

impl DuCellIndex {
    /// Creates a cell index, or `None` if out of range.
    pub fn new(value: u8) -> Option<Self> {
        ((value as usize) < MAX_NOF_DU_CELLS).then_some(Self(value))
    }

    /// Returns the inner value
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for DuCellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

index_conversions!(DuCellIndex, u8, MAX_NOF_DU_CELLS, "DU cell index");

/// Signalling radio bearer ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SrbId {
    Srb0 = 0,
    Srb1 = 1,
    Srb2 = 2,
    Srb3 = 3,
}

impl SrbId {
    /// Returns the numeric SRB ID
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for SrbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SRB{}", self.value())
    }
}

/// Data radio bearer ID (1..=29).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DrbId(u8);

impl DrbId {
    /// Creates a DRB ID, or `None` if outside `1..=MAX_NOF_DRBS`.
    pub fn new(value: u8) -> Option<Self> {
        (1..=MAX_NOF_DRBS).contains(&value).then_some(Self(value))
    }

    /// Returns the inner value
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for DrbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DRB{}", self.0)
    }
}

/// Logical channel ID (0..=MAX_LCID).
///
/// LCIDs 0-3 carry SRB0-SRB3, DRB `n` is carried on LCID `n + 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Lcid(u8);

impl Lcid {
    /// Creates an LCID, or `None` if above `MAX_LCID`.
    pub fn new(value: u8) -> Option<Self> {
        (value <= MAX_LCID).then_some(Self(value))
    }

    /// Returns the inner value
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Returns true if this LCID carries an SRB
    pub fn is_srb(&self) -> bool {
        self.0 < LCID_MIN_DRB
    }

    /// SRB carried by this LCID, if any
    pub fn to_srb(&self) -> Option<SrbId> {
        match self.0 {
            0 => Some(SrbId::Srb0),
            1 => Some(SrbId::Srb1),
            2 => Some(SrbId::Srb2),
            3 => Some(SrbId::Srb3),
            _ => None,
        }
    }

    /// DRB carried by this LCID, if any
    pub fn to_drb(&self) -> Option<DrbId> {
        if self.is_srb() {
            return None;
        }
        DrbId::new(self.0 - LCID_MIN_DRB + 1)
    }
}

impl From<SrbId> for Lcid {
    fn from(srb: SrbId) -> Self {
        Self(srb.value())
    }
}

impl From<DrbId> for Lcid {
    fn from(drb: DrbId) -> Self {
        Self(drb.value() - 1 + LCID_MIN_DRB)
    }
}

impl fmt::Display for Lcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

index_conversions!(Lcid, u8, MAX_LCID as usize + 1, "LCID");
