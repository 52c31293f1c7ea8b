//! Error types for the RLC bearer engine

use nextgran_common::{DuUeIndex, Lcid};
use thiserror::Error;

use crate::pdu::PduError;

/// RLC error types
#[derive(Error, Debug)]
pub enum RlcError {
    /// Invalid RLC configuration
    #[error("Invalid RLC configuration: {0}")]
    Config(#[from] nextgran_common::Error),

    /// A bearer already exists on this LCID
    #[error("Bearer with LCID {lcid} already exists for UE {ue_index}")]
    DuplicateBearer {
        /// UE index
        ue_index: DuUeIndex,
        /// Logical channel ID
        lcid: Lcid,
    },

    /// Bearer not found
    #[error("Bearer with LCID {lcid} not found for UE {ue_index}")]
    BearerNotFound {
        /// UE index
        ue_index: DuUeIndex,
        /// Logical channel ID
        lcid: Lcid,
    },

    /// UE not found
    #[error("UE {ue_index} not found")]
    UeNotFound {
        /// UE index
        ue_index: DuUeIndex,
    },

    /// No free UE index left
    #[error("RLC repository full: {max_ues} UEs")]
    RepositoryFull {
        /// Configured UE limit
        max_ues: usize,
    },

    /// Received PDU could not be decoded
    #[error("Malformed RLC PDU: {0}")]
    MalformedPdu(#[from] PduError),
}

/// Result type for RLC operations
pub type RlcResult<T> = std::result::Result<T, RlcError>;
