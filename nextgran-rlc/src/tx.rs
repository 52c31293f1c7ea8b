//! RLC TX entities
//!
//! A TX entity owns the [`RlcSduQueue`] of its bearer. The upper layer pushes
//! SDUs through an [`RlcTxSduHandle`], which may be cloned and moved to
//! another thread, and the scheduler pulls PDUs through
//! [`RlcTxLowerLayerInterface`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::BytesMut;
use nextgran_common::{log_rlc_pdu, Direction, DuUeIndex, Lcid, RlcConfig, RlcMode, UmSnSize};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::RlcResult;
use crate::pdu::{SegmentInfo, UmdPduHeader};
use crate::sdu::RlcSdu;
use crate::sdu_queue::RlcSduQueue;

/// Largest SDU accepted from the upper layer (TS 38.323 maximum PDCP PDU size)
pub const MAX_SDU_SIZE: usize = 9000;

/// Interface through which the upper layer hands SDUs to an RLC TX entity.
pub trait RlcTxUpperLayerDataInterface {
    /// Pushes one SDU. Returns `false` if it was dropped.
    fn handle_sdu(&self, sdu: RlcSdu) -> bool;

    /// Requests discard of the queued SDU with the given PDCP SN.
    /// Returns `false` if no such SDU is queued.
    fn discard_sdu(&self, pdcp_sn: u32) -> bool;
}

/// Interface through which the scheduler pulls PDUs from an RLC TX entity.
pub trait RlcTxLowerLayerInterface {
    /// Writes the next PDU into `buf`, returning the number of bytes written.
    /// Returns 0 when there is nothing to send that fits in `buf`.
    fn pull_pdu(&mut self, buf: &mut [u8]) -> usize;

    /// Bytes needed to transmit everything pending, headers included.
    fn get_buffer_state(&self) -> usize;
}

/// Snapshot of the TX counters of one bearer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RlcTxMetrics {
    /// SDUs accepted from the upper layer
    pub num_sdus: u64,
    /// Bytes of accepted SDUs
    pub num_sdu_bytes: u64,
    /// SDUs rejected on arrival
    pub num_dropped_sdus: u64,
    /// SDUs discarded on request while queued
    pub num_discarded_sdus: u64,
    /// Discard requests that matched no queued SDU
    pub num_discard_failures: u64,
    /// PDUs handed to the lower layer
    pub num_pdus: u64,
    /// Bytes of PDUs handed to the lower layer
    pub num_pdu_bytes: u64,
    /// Grants too small to carry any PDU
    pub num_small_grants: u64,
}

#[derive(Debug, Default)]
struct SduCounters {
    sdus: AtomicU64,
    sdu_bytes: AtomicU64,
    dropped: AtomicU64,
    discarded: AtomicU64,
    discard_failures: AtomicU64,
}

/// Producer side of a TX entity.
#[derive(Debug, Clone)]
pub struct RlcTxSduHandle {
    ue_index: DuUeIndex,
    lcid: Lcid,
    mode: RlcMode,
    queue: Arc<RlcSduQueue>,
    counters: Arc<SduCounters>,
}

impl RlcTxUpperLayerDataInterface for RlcTxSduHandle {
    fn handle_sdu(&self, sdu: RlcSdu) -> bool {
        let len = sdu.len();
        if sdu.is_empty() || len > MAX_SDU_SIZE {
            warn!(ue = %self.ue_index, lcid = %self.lcid, len, "Dropping SDU with invalid size");
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let pdcp_sn = sdu.pdcp_sn;
        if !self.queue.write(sdu) {
            warn!(
                ue = %self.ue_index,
                lcid = %self.lcid,
                ?pdcp_sn,
                capacity = self.queue.capacity(),
                "SDU queue full, dropping SDU"
            );
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        trace!(ue = %self.ue_index, lcid = %self.lcid, ?pdcp_sn, len, "SDU queued");
        self.counters.sdus.fetch_add(1, Ordering::Relaxed);
        self.counters.sdu_bytes.fetch_add(len as u64, Ordering::Relaxed);
        true
    }

    fn discard_sdu(&self, pdcp_sn: u32) -> bool {
        if self.mode == RlcMode::Tm {
            warn!(
                ue = %self.ue_index,
                lcid = %self.lcid,
                pdcp_sn,
                "SDU discard not supported in TM"
            );
            return false;
        }

        if self.queue.discard(pdcp_sn) {
            debug!(ue = %self.ue_index, lcid = %self.lcid, pdcp_sn, "Discarded SDU");
            self.counters.discarded.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            debug!(ue = %self.ue_index, lcid = %self.lcid, pdcp_sn, "No queued SDU to discard");
            self.counters.discard_failures.fetch_add(1, Ordering::Relaxed);
            false
        }
    }
}

/// State shared by every TX mode.
#[derive(Debug)]
struct TxCommon {
    ue_index: DuUeIndex,
    lcid: Lcid,
    queue: Arc<RlcSduQueue>,
    counters: Arc<SduCounters>,
    num_pdus: u64,
    num_pdu_bytes: u64,
    num_small_grants: u64,
}

impl TxCommon {
    fn new(ue_index: DuUeIndex, lcid: Lcid, config: &RlcConfig) -> Self {
        Self {
            ue_index,
            lcid,
            queue: Arc::new(RlcSduQueue::new(config.sdu_queue_capacity)),
            counters: Arc::new(SduCounters::default()),
            num_pdus: 0,
            num_pdu_bytes: 0,
            num_small_grants: 0,
        }
    }

    fn handle(&self, mode: RlcMode) -> RlcTxSduHandle {
        RlcTxSduHandle {
            ue_index: self.ue_index,
            lcid: self.lcid,
            mode,
            queue: Arc::clone(&self.queue),
            counters: Arc::clone(&self.counters),
        }
    }

    fn on_pdu(&mut self, pdu: &[u8]) {
        self.num_pdus += 1;
        self.num_pdu_bytes += pdu.len() as u64;
        log_rlc_pdu(self.ue_index, self.lcid, Direction::Tx, pdu);
    }

    fn metrics(&self) -> RlcTxMetrics {
        RlcTxMetrics {
            num_sdus: self.counters.sdus.load(Ordering::Relaxed),
            num_sdu_bytes: self.counters.sdu_bytes.load(Ordering::Relaxed),
            num_dropped_sdus: self.counters.dropped.load(Ordering::Relaxed),
            num_discarded_sdus: self.counters.discarded.load(Ordering::Relaxed),
            num_discard_failures: self.counters.discard_failures.load(Ordering::Relaxed),
            num_pdus: self.num_pdus,
            num_pdu_bytes: self.num_pdu_bytes,
            num_small_grants: self.num_small_grants,
        }
    }
}

/// Transparent mode TX entity. Each PDU is one whole SDU.
#[derive(Debug)]
pub struct RlcTxTmEntity {
    common: TxCommon,
    /// SDU that did not fit the last grant
    pending: Option<RlcSdu>,
}

impl RlcTxTmEntity {
    pub fn new(ue_index: DuUeIndex, lcid: Lcid, config: &RlcConfig) -> Self {
        Self {
            common: TxCommon::new(ue_index, lcid, config),
            pending: None,
        }
    }
}

impl RlcTxLowerLayerInterface for RlcTxTmEntity {
    fn pull_pdu(&mut self, buf: &mut [u8]) -> usize {
        let Some(sdu) = self.pending.take().or_else(|| self.common.queue.read()) else {
            return 0;
        };

        let len = sdu.len();
        if len > buf.len() {
            debug!(
                ue = %self.common.ue_index,
                lcid = %self.common.lcid,
                sdu_len = len,
                grant = buf.len(),
                "Grant too small for TM SDU"
            );
            self.common.num_small_grants += 1;
            self.pending = Some(sdu);
            return 0;
        }

        buf[..len].copy_from_slice(&sdu.buf);
        self.common.on_pdu(&buf[..len]);
        len
    }

    fn get_buffer_state(&self) -> usize {
        self.common.queue.size_bytes() + self.pending.as_ref().map_or(0, RlcSdu::len)
    }
}

/// SDU currently being segmented.
#[derive(Debug)]
struct SegmentationState {
    sdu: RlcSdu,
    next_so: usize,
}

/// Unacknowledged mode TX entity (TS 38.322 5.2.2.1).
#[derive(Debug)]
pub struct RlcTxUmEntity {
    common: TxCommon,
    sn_size: UmSnSize,
    /// SN assigned to the next segmented SDU
    tx_next: u32,
    current: Option<SegmentationState>,
}

impl RlcTxUmEntity {
    pub fn new(ue_index: DuUeIndex, lcid: Lcid, config: &RlcConfig) -> RlcResult<Self> {
        let sn_size = config.um_sn_size()?;
        Ok(Self {
            common: TxCommon::new(ue_index, lcid, config),
            sn_size,
            tx_next: 0,
            current: None,
        })
    }

    /// SN that will be assigned to the next segmented SDU
    pub fn tx_next(&self) -> u32 {
        self.tx_next
    }
}

impl RlcTxLowerLayerInterface for RlcTxUmEntity {
    fn pull_pdu(&mut self, buf: &mut [u8]) -> usize {
        let Some(state) = self
            .current
            .take()
            .or_else(|| self.common.queue.read().map(|sdu| SegmentationState { sdu, next_so: 0 }))
        else {
            return 0;
        };

        let grant = buf.len();
        let remaining = state.sdu.len() - state.next_so;
        let si = if state.next_so == 0 {
            if UmdPduHeader::packed_size(SegmentInfo::Full, self.sn_size) + remaining <= grant {
                SegmentInfo::Full
            } else {
                SegmentInfo::First
            }
        } else if UmdPduHeader::packed_size(SegmentInfo::Last, self.sn_size) + remaining <= grant {
            SegmentInfo::Last
        } else {
            SegmentInfo::Middle
        };

        let header_len = UmdPduHeader::packed_size(si, self.sn_size);
        if grant <= header_len {
            debug!(
                ue = %self.common.ue_index,
                lcid = %self.common.lcid,
                grant,
                header_len,
                "Grant too small for UM PDU"
            );
            self.common.num_small_grants += 1;
            self.current = Some(state);
            return 0;
        }

        let header = match si {
            SegmentInfo::Full => UmdPduHeader::full(),
            _ => UmdPduHeader {
                si,
                sn: self.tx_next,
                so: state.next_so as u16,
            },
        };
        let mut header_buf = BytesMut::with_capacity(header_len);
        header.encode_into(self.sn_size, &mut header_buf);
        buf[..header_len].copy_from_slice(&header_buf);

        let payload_len = remaining.min(grant - header_len);
        let payload = &state.sdu.buf[state.next_so..state.next_so + payload_len];
        buf[header_len..header_len + payload_len].copy_from_slice(payload);
        let pdu_len = header_len + payload_len;

        if si.is_last() {
            if si != SegmentInfo::Full {
                self.tx_next = (self.tx_next + 1) % self.sn_size.modulus();
            }
        } else {
            self.current = Some(SegmentationState {
                next_so: state.next_so + payload_len,
                sdu: state.sdu,
            });
        }

        self.common.on_pdu(&buf[..pdu_len]);
        pdu_len
    }

    fn get_buffer_state(&self) -> usize {
        let full_header = UmdPduHeader::packed_size(SegmentInfo::Full, self.sn_size);
        let queued = self.common.queue.size_bytes() + self.common.queue.size_sdus() * full_header;
        let segmenting = self.current.as_ref().map_or(0, |state| {
            let header = if state.next_so == 0 {
                full_header
            } else {
                UmdPduHeader::packed_size(SegmentInfo::Last, self.sn_size)
            };
            state.sdu.len() - state.next_so + header
        });
        queued + segmenting
    }
}

/// TX entity of one bearer.
#[derive(Debug)]
pub enum RlcTxEntity {
    /// Transparent mode
    Tm(RlcTxTmEntity),
    /// Unacknowledged mode
    Um(RlcTxUmEntity),
}

impl RlcTxEntity {
    /// Creates the TX entity matching `config.mode`.
    pub fn new(ue_index: DuUeIndex, lcid: Lcid, config: &RlcConfig) -> RlcResult<Self> {
        config.validate()?;
        Ok(match config.mode {
            RlcMode::Tm => RlcTxEntity::Tm(RlcTxTmEntity::new(ue_index, lcid, config)),
            RlcMode::Um => RlcTxEntity::Um(RlcTxUmEntity::new(ue_index, lcid, config)?),
        })
    }

    pub fn mode(&self) -> RlcMode {
        match self {
            RlcTxEntity::Tm(_) => RlcMode::Tm,
            RlcTxEntity::Um(_) => RlcMode::Um,
        }
    }

    fn common(&self) -> &TxCommon {
        match self {
            RlcTxEntity::Tm(entity) => &entity.common,
            RlcTxEntity::Um(entity) => &entity.common,
        }
    }

    /// Returns a producer handle for the upper layer.
    pub fn sdu_handle(&self) -> RlcTxSduHandle {
        self.common().handle(self.mode())
    }

    pub fn metrics(&self) -> RlcTxMetrics {
        self.common().metrics()
    }
}

impl RlcTxLowerLayerInterface for RlcTxEntity {
    fn pull_pdu(&mut self, buf: &mut [u8]) -> usize {
        match self {
            RlcTxEntity::Tm(entity) => entity.pull_pdu(buf),
            RlcTxEntity::Um(entity) => entity.pull_pdu(buf),
        }
    }

    fn get_buffer_state(&self) -> usize {
        match self {
            RlcTxEntity::Tm(entity) => entity.get_buffer_state(),
            RlcTxEntity::Um(entity) => entity.get_buffer_state(),
        }
    }
}
