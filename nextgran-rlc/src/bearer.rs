//! RLC bearer repository
//!
//! [`UeRlcBearers`] holds the bearers of one UE keyed by LCID.
//! [`DuRlcRepository`] holds every UE of the DU keyed by [`DuUeIndex`] and
//! allocates UE indexes.

use nextgran_adt::{SlottedHeapIdTable, SlottedIdVector};
use nextgran_common::{
    DrbId, DuRlcConfig, DuUeIndex, Lcid, RlcConfig, RlcMode, SrbId, MAX_NOF_DU_UES,
};
use tracing::{debug, info, warn};

use crate::error::{RlcError, RlcResult};
use crate::rx::{BoxedRxNotifier, RlcRxEntity, RlcRxMetrics};
use crate::tx::{RlcTxEntity, RlcTxLowerLayerInterface, RlcTxMetrics, RlcTxSduHandle};

/// TX and RX entities of one logical channel.
pub struct RlcBearer {
    lcid: Lcid,
    mode: RlcMode,
    pub tx: RlcTxEntity,
    pub rx: RlcRxEntity,
}

impl RlcBearer {
    pub fn new(
        ue_index: DuUeIndex,
        lcid: Lcid,
        config: &RlcConfig,
        notifier: BoxedRxNotifier,
    ) -> RlcResult<Self> {
        Ok(Self {
            lcid,
            mode: config.mode,
            tx: RlcTxEntity::new(ue_index, lcid, config)?,
            rx: RlcRxEntity::new(ue_index, lcid, config, notifier)?,
        })
    }

    pub fn lcid(&self) -> Lcid {
        self.lcid
    }

    pub fn mode(&self) -> RlcMode {
        self.mode
    }

    /// Producer handle for the upper layer
    pub fn sdu_handle(&self) -> RlcTxSduHandle {
        self.tx.sdu_handle()
    }

    pub fn tx_metrics(&self) -> RlcTxMetrics {
        self.tx.metrics()
    }

    pub fn rx_metrics(&self) -> RlcRxMetrics {
        self.rx.metrics()
    }
}

/// RLC bearers of one UE.
pub struct UeRlcBearers {
    ue_index: DuUeIndex,
    bearers: SlottedIdVector<Lcid, RlcBearer>,
}

impl UeRlcBearers {
    pub fn new(ue_index: DuUeIndex) -> Self {
        Self {
            ue_index,
            bearers: SlottedIdVector::new(),
        }
    }

    pub fn ue_index(&self) -> DuUeIndex {
        self.ue_index
    }

    /// Creates the bearer on `lcid`.
    pub fn add_bearer(
        &mut self,
        lcid: Lcid,
        config: &RlcConfig,
        notifier: BoxedRxNotifier,
    ) -> RlcResult<&mut RlcBearer> {
        if self.bearers.contains(lcid) {
            return Err(RlcError::DuplicateBearer {
                ue_index: self.ue_index,
                lcid,
            });
        }
        let bearer = RlcBearer::new(self.ue_index, lcid, config, notifier)?;
        debug!(ue = %self.ue_index, lcid = %lcid, mode = %config.mode, "Created RLC bearer");
        Ok(self.bearers.emplace(lcid, bearer))
    }

    /// Removes the bearer on `lcid`.
    pub fn remove_bearer(&mut self, lcid: Lcid) -> RlcResult<RlcBearer> {
        if !self.bearers.contains(lcid) {
            return Err(RlcError::BearerNotFound {
                ue_index: self.ue_index,
                lcid,
            });
        }
        debug!(ue = %self.ue_index, lcid = %lcid, "Removed RLC bearer");
        Ok(self.bearers.take(lcid))
    }

    pub fn bearer(&self, lcid: Lcid) -> Option<&RlcBearer> {
        self.bearers.get(lcid)
    }

    pub fn bearer_mut(&mut self, lcid: Lcid) -> Option<&mut RlcBearer> {
        self.bearers.get_mut(lcid)
    }

    pub fn len(&self) -> usize {
        self.bearers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bearers.is_empty()
    }

    /// Bearers in ascending LCID order
    pub fn iter(&self) -> impl Iterator<Item = (Lcid, &RlcBearer)> + '_ {
        self.bearers.iter()
    }

    /// Pending TX bytes summed over all bearers
    pub fn total_buffer_state(&self) -> usize {
        self.bearers
            .unsorted()
            .iter()
            .map(|bearer| bearer.tx.get_buffer_state())
            .sum()
    }
}

/// RLC bearers of every UE served by the DU.
pub struct DuRlcRepository {
    config: DuRlcConfig,
    ues: SlottedHeapIdTable<DuUeIndex, UeRlcBearers, MAX_NOF_DU_UES>,
}

impl DuRlcRepository {
    /// Creates an empty repository after validating `config`.
    pub fn new(config: DuRlcConfig) -> RlcResult<Self> {
        config.validate()?;
        info!(max_ues = config.max_ues, "RLC repository created");
        Ok(Self {
            config,
            ues: SlottedHeapIdTable::new(),
        })
    }

    pub fn config(&self) -> &DuRlcConfig {
        &self.config
    }

    /// Allocates the lowest free UE index.
    pub fn create_ue(&mut self) -> RlcResult<DuUeIndex> {
        let ue_index = self
            .ues
            .find_first_empty(DuUeIndex::try_from(0usize)?)
            .filter(|idx| usize::from(*idx) < self.config.max_ues);
        let Some(ue_index) = ue_index else {
            warn!(max_ues = self.config.max_ues, "No free UE index");
            return Err(RlcError::RepositoryFull {
                max_ues: self.config.max_ues,
            });
        };

        self.ues.insert(ue_index, UeRlcBearers::new(ue_index));
        info!(ue = %ue_index, "Created RLC UE context");
        Ok(ue_index)
    }

    /// Removes a UE and all of its bearers.
    pub fn remove_ue(&mut self, ue_index: DuUeIndex) -> RlcResult<UeRlcBearers> {
        if !self.ues.contains(ue_index) {
            return Err(RlcError::UeNotFound { ue_index });
        }
        info!(ue = %ue_index, "Removed RLC UE context");
        Ok(self.ues.take(ue_index))
    }

    pub fn ue(&self, ue_index: DuUeIndex) -> Option<&UeRlcBearers> {
        self.ues.get(ue_index)
    }

    pub fn ue_mut(&mut self, ue_index: DuUeIndex) -> Option<&mut UeRlcBearers> {
        self.ues.get_mut(ue_index)
    }

    pub fn nof_ues(&self) -> usize {
        self.ues.len()
    }

    /// UEs in ascending index order
    pub fn iter(&self) -> impl Iterator<Item = (DuUeIndex, &UeRlcBearers)> + '_ {
        self.ues.iter()
    }

    fn ue_or_err(&mut self, ue_index: DuUeIndex) -> RlcResult<&mut UeRlcBearers> {
        self.ues
            .get_mut(ue_index)
            .ok_or(RlcError::UeNotFound { ue_index })
    }

    /// Adds an SRB with the configured SRB settings.
    pub fn add_srb(
        &mut self,
        ue_index: DuUeIndex,
        srb: SrbId,
        notifier: BoxedRxNotifier,
    ) -> RlcResult<&mut RlcBearer> {
        let config = self.config.srb.clone();
        self.ue_or_err(ue_index)?
            .add_bearer(Lcid::from(srb), &config, notifier)
    }

    /// Adds a DRB with the configured DRB settings.
    pub fn add_drb(
        &mut self,
        ue_index: DuUeIndex,
        drb: DrbId,
        notifier: BoxedRxNotifier,
    ) -> RlcResult<&mut RlcBearer> {
        let config = self.config.drb.clone();
        self.ue_or_err(ue_index)?
            .add_bearer(Lcid::from(drb), &config, notifier)
    }

    /// Pending TX bytes of every bearer with data, in UE then LCID order.
    pub fn buffer_states(&self) -> Vec<(DuUeIndex, Lcid, usize)> {
        self.ues
            .iter()
            .flat_map(|(ue_index, ue)| {
                ue.iter().filter_map(move |(lcid, bearer)| {
                    let bytes = bearer.tx.get_buffer_state();
                    (bytes > 0).then_some((ue_index, lcid, bytes))
                })
            })
            .collect()
    }
}
