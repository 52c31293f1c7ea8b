//! RLC RX entities
//!
//! The UM RX entity reassembles segmented SDUs per SN (TS 38.322 5.2.2.2).
//! Partially received SDUs live in a [`SlottedVector`] keyed by SN. An SDU
//! that is still incomplete when its SN leaves the reassembly window is
//! dropped.

use bytes::{Bytes, BytesMut};
use nextgran_adt::SlottedVector;
use nextgran_common::{log_rlc_pdu, Direction, DuUeIndex, Lcid, RlcConfig, RlcMode, UmSnSize};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::error::RlcResult;
use crate::pdu::{SegmentInfo, UmdPduHeader};

/// Receiver of reassembled SDUs.
pub trait RlcRxUpperLayerDataNotifier {
    /// Called once per complete SDU, in delivery order.
    fn on_new_sdu(&mut self, sdu: Bytes);
}

impl<F> RlcRxUpperLayerDataNotifier for F
where
    F: FnMut(Bytes),
{
    fn on_new_sdu(&mut self, sdu: Bytes) {
        self(sdu)
    }
}

/// Interface through which the lower layer hands PDUs to an RLC RX entity.
pub trait RlcRxLowerLayerInterface {
    fn handle_pdu(&mut self, pdu: Bytes);
}

/// Boxed upper-layer notifier owned by an RX entity.
pub type BoxedRxNotifier = Box<dyn RlcRxUpperLayerDataNotifier + Send>;

/// Snapshot of the RX counters of one bearer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RlcRxMetrics {
    /// PDUs received from the lower layer
    pub num_pdus: u64,
    /// Bytes of received PDUs
    pub num_pdu_bytes: u64,
    /// SDUs delivered to the upper layer
    pub num_sdus: u64,
    /// Bytes of delivered SDUs
    pub num_sdu_bytes: u64,
    /// PDUs dropped because the header could not be decoded
    pub num_malformed_pdus: u64,
    /// PDUs dropped as duplicates or outside the reassembly window
    pub num_discarded_pdus: u64,
    /// Incomplete SDUs dropped when leaving the reassembly window
    pub num_lost_sdus: u64,
}

struct RxCommon {
    ue_index: DuUeIndex,
    lcid: Lcid,
    notifier: BoxedRxNotifier,
    metrics: RlcRxMetrics,
}

impl RxCommon {
    fn on_pdu(&mut self, pdu: &[u8]) {
        self.metrics.num_pdus += 1;
        self.metrics.num_pdu_bytes += pdu.len() as u64;
        log_rlc_pdu(self.ue_index, self.lcid, Direction::Rx, pdu);
    }

    fn deliver(&mut self, sdu: Bytes) {
        trace!(ue = %self.ue_index, lcid = %self.lcid, len = sdu.len(), "Delivering SDU");
        self.metrics.num_sdus += 1;
        self.metrics.num_sdu_bytes += sdu.len() as u64;
        self.notifier.on_new_sdu(sdu);
    }
}

/// Transparent mode RX entity. Every PDU is delivered as an SDU.
pub struct RlcRxTmEntity {
    common: RxCommon,
}

impl RlcRxTmEntity {
    pub fn new(ue_index: DuUeIndex, lcid: Lcid, notifier: BoxedRxNotifier) -> Self {
        Self {
            common: RxCommon {
                ue_index,
                lcid,
                notifier,
                metrics: RlcRxMetrics::default(),
            },
        }
    }
}

impl RlcRxLowerLayerInterface for RlcRxTmEntity {
    fn handle_pdu(&mut self, pdu: Bytes) {
        self.common.on_pdu(&pdu);
        if pdu.is_empty() {
            warn!(ue = %self.common.ue_index, lcid = %self.common.lcid, "Dropping empty TM PDU");
            self.common.metrics.num_malformed_pdus += 1;
            return;
        }
        self.common.deliver(pdu);
    }
}

/// Segments received so far for one SN.
#[derive(Debug, Default)]
struct RxSduInfo {
    /// `(so, payload)` sorted by SO
    segments: Vec<(usize, Bytes)>,
    /// Known once the last segment arrived
    sdu_len: Option<usize>,
    delivered: bool,
}

impl RxSduInfo {
    /// Stores a segment. Returns false if one with the same SO is present.
    fn add_segment(&mut self, so: usize, payload: Bytes, si: SegmentInfo) -> bool {
        if si.is_last() {
            self.sdu_len = Some(so + payload.len());
        }
        match self.segments.binary_search_by_key(&so, |(seg_so, _)| *seg_so) {
            Ok(_) => false,
            Err(pos) => {
                self.segments.insert(pos, (so, payload));
                true
            }
        }
    }

    fn is_complete(&self) -> bool {
        let Some(sdu_len) = self.sdu_len else {
            return false;
        };
        let mut covered = 0;
        for (so, payload) in &self.segments {
            if *so > covered {
                return false;
            }
            covered = covered.max(so + payload.len());
        }
        covered >= sdu_len
    }

    fn assemble(&mut self) -> Bytes {
        let sdu_len = self.sdu_len.unwrap_or_default();
        let mut sdu = BytesMut::with_capacity(sdu_len);
        for (so, payload) in self.segments.drain(..) {
            let covered = sdu.len();
            if so + payload.len() > covered {
                sdu.extend_from_slice(&payload[covered - so..]);
            }
        }
        sdu.freeze()
    }
}

/// Unacknowledged mode RX entity.
pub struct RlcRxUmEntity {
    common: RxCommon,
    sn_size: UmSnSize,
    /// Earliest SN still considered for reassembly
    rx_next_reassembly: u32,
    /// SN following the highest SN received
    rx_next_highest: u32,
    rx_window: SlottedVector<RxSduInfo>,
}

impl RlcRxUmEntity {
    pub fn new(
        ue_index: DuUeIndex,
        lcid: Lcid,
        config: &RlcConfig,
        notifier: BoxedRxNotifier,
    ) -> RlcResult<Self> {
        let sn_size = config.um_sn_size()?;
        Ok(Self {
            common: RxCommon {
                ue_index,
                lcid,
                notifier,
                metrics: RlcRxMetrics::default(),
            },
            sn_size,
            rx_next_reassembly: 0,
            rx_next_highest: 0,
            rx_window: SlottedVector::new(),
        })
    }

    /// Number of SNs with partially received SDUs
    pub fn nof_pending_sdus(&self) -> usize {
        self.rx_window.iter().filter(|info| !info.delivered).count()
    }

    /// SN offset from the lower edge of the reassembly window.
    fn window_offset(&self, sn: u32) -> u32 {
        let modulus = self.sn_size.modulus();
        let base = (self.rx_next_highest + modulus - self.sn_size.window_size()) % modulus;
        (sn + modulus - base) % modulus
    }

    fn inside_window(&self, sn: u32) -> bool {
        self.window_offset(sn) < self.sn_size.window_size()
    }

    fn handle_segment(&mut self, header: UmdPduHeader, payload: Bytes) {
        let sn = header.sn;
        if self.window_offset(sn) < self.window_offset(self.rx_next_reassembly) {
            debug!(
                ue = %self.common.ue_index,
                lcid = %self.common.lcid,
                sn,
                rx_next_reassembly = self.rx_next_reassembly,
                "Discarding segment of SN already left behind"
            );
            self.common.metrics.num_discarded_pdus += 1;
            return;
        }

        let idx = sn as usize;
        if !self.rx_window.contains(idx) {
            self.rx_window.insert(idx, RxSduInfo::default());
        }
        let info = &mut self.rx_window[idx];
        if info.delivered || !info.add_segment(usize::from(header.so), payload, header.si) {
            debug!(
                ue = %self.common.ue_index,
                lcid = %self.common.lcid,
                sn,
                so = header.so,
                "Discarding duplicate segment"
            );
            self.common.metrics.num_discarded_pdus += 1;
            return;
        }

        if info.is_complete() {
            let sdu = info.assemble();
            info.delivered = true;
            self.common.deliver(sdu);
        }

        if !self.inside_window(sn) {
            self.rx_next_highest = (sn + 1) % self.sn_size.modulus();
            self.drop_outside_window();
            if !self.inside_window(self.rx_next_reassembly) {
                let modulus = self.sn_size.modulus();
                self.rx_next_reassembly =
                    (self.rx_next_highest + modulus - self.sn_size.window_size()) % modulus;
                self.advance_reassembly();
            }
        } else if sn == self.rx_next_reassembly {
            self.advance_reassembly();
        }
    }

    fn decode_header(&self, pdu: &[u8]) -> RlcResult<(UmdPduHeader, usize)> {
        Ok(UmdPduHeader::decode(pdu, self.sn_size)?)
    }

    /// Drops SDU state of SNs that left the window.
    fn drop_outside_window(&mut self) {
        let stale: Vec<usize> = self
            .rx_window
            .keys()
            .filter(|&idx| !self.inside_window(idx as u32))
            .collect();
        for idx in stale {
            let info = self.rx_window.take(idx);
            if !info.delivered {
                debug!(
                    ue = %self.common.ue_index,
                    lcid = %self.common.lcid,
                    sn = idx,
                    "Dropping incomplete SDU"
                );
                self.common.metrics.num_lost_sdus += 1;
            }
        }
    }

    /// Moves `rx_next_reassembly` past SNs already delivered.
    fn advance_reassembly(&mut self) {
        let modulus = self.sn_size.modulus();
        while self.rx_next_reassembly != self.rx_next_highest {
            let idx = self.rx_next_reassembly as usize;
            if !self.rx_window.get(idx).is_some_and(|info| info.delivered) {
                break;
            }
            self.rx_window.erase(idx);
            self.rx_next_reassembly = (self.rx_next_reassembly + 1) % modulus;
        }
    }
}

impl RlcRxLowerLayerInterface for RlcRxUmEntity {
    fn handle_pdu(&mut self, pdu: Bytes) {
        self.common.on_pdu(&pdu);
        let (header, header_len) = match self.decode_header(&pdu) {
            Ok(decoded) => decoded,
            Err(e) => {
                warn!(
                    ue = %self.common.ue_index,
                    lcid = %self.common.lcid,
                    "Dropping UMD PDU: {}",
                    e
                );
                self.common.metrics.num_malformed_pdus += 1;
                return;
            }
        };

        let payload = pdu.slice(header_len..);
        if header.si == SegmentInfo::Full {
            self.common.deliver(payload);
        } else {
            self.handle_segment(header, payload);
        }
    }
}

/// RX entity of one bearer.
pub enum RlcRxEntity {
    /// Transparent mode
    Tm(RlcRxTmEntity),
    /// Unacknowledged mode
    Um(RlcRxUmEntity),
}

impl RlcRxEntity {
    /// Creates the RX entity matching `config.mode`.
    pub fn new(
        ue_index: DuUeIndex,
        lcid: Lcid,
        config: &RlcConfig,
        notifier: BoxedRxNotifier,
    ) -> RlcResult<Self> {
        config.validate()?;
        Ok(match config.mode {
            RlcMode::Tm => RlcRxEntity::Tm(RlcRxTmEntity::new(ue_index, lcid, notifier)),
            RlcMode::Um => RlcRxEntity::Um(RlcRxUmEntity::new(ue_index, lcid, config, notifier)?),
        })
    }

    pub fn metrics(&self) -> RlcRxMetrics {
        match self {
            RlcRxEntity::Tm(entity) => entity.common.metrics,
            RlcRxEntity::Um(entity) => entity.common.metrics,
        }
    }
}

impl RlcRxLowerLayerInterface for RlcRxEntity {
    fn handle_pdu(&mut self, pdu: Bytes) {
        match self {
            RlcRxEntity::Tm(entity) => entity.handle_pdu(pdu),
            RlcRxEntity::Um(entity) => entity.handle_pdu(pdu),
        }
    }
}
