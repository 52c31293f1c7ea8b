//! RLC bearer engine for nextgran
//!
//! This crate implements the RLC layer of a DU on top of the slotted
//! containers of `nextgran-adt`:
//!
//! - [`sdu_queue`]: thread-safe SDU queue with discard by PDCP SN
//! - [`pdu`]: UMD PDU header codec
//! - [`tx`]: TM and UM TX entities (SDU intake, PDU framing, segmentation)
//! - [`rx`]: TM and UM RX entities (UM reassembly window)
//! - [`bearer`]: per-UE bearers and the DU-wide bearer repository
//!
//! # Example
//!
//! ```
//! use nextgran_rlc::{RlcSdu, RlcSduQueue};
//!
//! let queue = RlcSduQueue::new(8);
//! assert!(queue.write(RlcSdu::with_pdcp_sn(vec![1, 2], 10)));
//! assert!(queue.write(RlcSdu::with_pdcp_sn(vec![3, 4], 11)));
//! assert!(queue.discard(10));
//!
//! assert_eq!(queue.read().and_then(|sdu| sdu.pdcp_sn), Some(11));
//! assert!(queue.read().is_none());
//! ```

pub mod bearer;
pub mod error;
pub mod pdu;
pub mod rx;
pub mod sdu;
pub mod sdu_queue;
pub mod tx;

pub use bearer::{DuRlcRepository, RlcBearer, UeRlcBearers};
pub use error::{RlcError, RlcResult};
pub use pdu::{PduError, SegmentInfo, UmdPduHeader};
pub use rx::{
    BoxedRxNotifier, RlcRxEntity, RlcRxLowerLayerInterface, RlcRxMetrics, RlcRxTmEntity,
    RlcRxUmEntity, RlcRxUpperLayerDataNotifier,
};
pub use sdu::RlcSdu;
pub use sdu_queue::{RlcSduQueue, DEFAULT_SDU_QUEUE_CAPACITY};
pub use tx::{
    RlcTxEntity, RlcTxLowerLayerInterface, RlcTxMetrics, RlcTxSduHandle, RlcTxTmEntity,
    RlcTxUmEntity, RlcTxUpperLayerDataInterface, MAX_SDU_SIZE,
};
