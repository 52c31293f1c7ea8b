//! RLC bearer integration tests
//!
//! Drives SDUs from the upper layer through a TX entity, over a simulated
//! lower layer, into an RX entity of a second repository.

use std::thread;

use bytes::Bytes;
use integration_tests::{
    init_test_logging, pdcp_sdu, pump_pdus, test_du_config, SduCollector, TestResult,
};
use nextgran_common::{DrbId, DuUeIndex, Lcid, RlcConfig, SrbId};
use nextgran_rlc::{
    DuRlcRepository, RlcError, RlcRxEntity, RlcSdu, RlcTxEntity, RlcTxLowerLayerInterface,
    RlcTxUpperLayerDataInterface,
};

/// UM DRB: SDUs larger than the grant are segmented and reassembled
#[test]
fn test_um_drb_segmentation_round_trip() -> TestResult {
    init_test_logging();

    let mut gnb = DuRlcRepository::new(test_du_config())?;
    let mut ue_side = DuRlcRepository::new(test_du_config())?;
    let gnb_ue = gnb.create_ue()?;
    let peer_ue = ue_side.create_ue()?;
    let drb1 = DrbId::new(1).ok_or("invalid DRB")?;

    let received = SduCollector::new();
    let handle = gnb.add_drb(gnb_ue, drb1, SduCollector::new().notifier())?.sdu_handle();
    ue_side.add_drb(peer_ue, drb1, received.notifier())?;

    let payloads: Vec<Vec<u8>> = (0..10u8).map(|i| (0..(20 + i * 7)).collect()).collect();
    for (sn, payload) in payloads.iter().enumerate() {
        assert!(handle.handle_sdu(RlcSdu::with_pdcp_sn(payload.clone(), sn as u32)));
    }

    let lcid = Lcid::from(drb1);
    let tx = &mut gnb
        .ue_mut(gnb_ue)
        .ok_or("gNB UE missing")?
        .bearer_mut(lcid)
        .ok_or("DRB missing")?
        .tx;
    let rx = &mut ue_side
        .ue_mut(peer_ue)
        .ok_or("UE missing")?
        .bearer_mut(lcid)
        .ok_or("DRB missing")?
        .rx;
    let nof_pdus = pump_pdus(tx, rx, 16);
    tracing::info!(nof_pdus, "[RAN] DRB1 transfer complete");

    assert!(nof_pdus > payloads.len());
    assert_eq!(tx.get_buffer_state(), 0);
    let delivered: Vec<Vec<u8>> = received.sdus().iter().map(|b| b.to_vec()).collect();
    assert_eq!(delivered, payloads);

    let tx_metrics = tx.metrics();
    let rx_metrics = rx.metrics();
    assert_eq!(tx_metrics.num_pdus, nof_pdus as u64);
    assert_eq!(rx_metrics.num_pdus, nof_pdus as u64);
    assert_eq!(rx_metrics.num_sdus, payloads.len() as u64);
    assert_eq!(rx_metrics.num_lost_sdus, 0);
    Ok(())
}

/// PDCP discard before transmission removes the SDU from the air interface
#[test]
fn test_discard_before_transmission() -> TestResult {
    init_test_logging();

    let config = RlcConfig::um(12);
    let ue_index = DuUeIndex::new(0).ok_or("invalid UE")?;
    let lcid = Lcid::new(4).ok_or("invalid LCID")?;
    let received = SduCollector::new();
    let mut tx = RlcTxEntity::new(ue_index, lcid, &config)?;
    let mut rx = RlcRxEntity::new(ue_index, lcid, &config, received.notifier())?;
    let handle = tx.sdu_handle();

    for sn in 0..5 {
        assert!(handle.handle_sdu(pdcp_sdu(sn, 10)));
    }
    assert!(handle.discard_sdu(1));
    assert!(handle.discard_sdu(3));
    assert!(!handle.discard_sdu(3));
    assert_eq!(tx.get_buffer_state(), 3 * 11);

    pump_pdus(&mut tx, &mut rx, 100);
    let firsts: Vec<u8> = received.sdus().iter().map(|b| b[0]).collect();
    assert_eq!(firsts, vec![0, 2, 4]);
    assert_eq!(tx.metrics().num_discarded_sdus, 2);
    Ok(())
}

/// The producer runs on its own thread while the scheduler pulls PDUs
#[test]
fn test_concurrent_producer_and_scheduler() -> TestResult {
    init_test_logging();

    const NOF_SDUS: u32 = 500;
    let config = RlcConfig::um(12).with_sdu_queue_capacity(32);
    let ue_index = DuUeIndex::new(5).ok_or("invalid UE")?;
    let lcid = Lcid::new(5).ok_or("invalid LCID")?;
    let received = SduCollector::new();
    let mut tx = RlcTxEntity::new(ue_index, lcid, &config)?;
    let mut rx = RlcRxEntity::new(ue_index, lcid, &config, received.notifier())?;

    let handle = tx.sdu_handle();
    let producer = thread::spawn(move || {
        for sn in 0..NOF_SDUS {
            while !handle.handle_sdu(pdcp_sdu(sn, 40)) {
                thread::yield_now();
            }
        }
    });

    while received.len() < NOF_SDUS as usize {
        if pump_pdus(&mut tx, &mut rx, 25) == 0 {
            thread::yield_now();
        }
    }
    producer.join().map_err(|_| "producer panicked")?;

    let sdus = received.sdus();
    assert!(sdus.iter().enumerate().all(|(sn, sdu)| sdu.len() == 40 && sdu[0] == sn as u8));
    Ok(())
}

/// SRBs run in TM and keep an SDU that does not fit the grant
#[test]
fn test_srb_transparent_mode() -> TestResult {
    init_test_logging();

    let mut repo = DuRlcRepository::new(test_du_config())?;
    let ue = repo.create_ue()?;
    let received = SduCollector::new();
    let srb1 = repo.add_srb(ue, SrbId::Srb1, received.notifier())?;
    let handle = srb1.sdu_handle();
    assert!(handle.handle_sdu(RlcSdu::new(Bytes::from_static(b"rrc-setup"), None)));

    let mut small = [0u8; 4];
    assert_eq!(srb1.tx.pull_pdu(&mut small), 0);
    let mut grant = [0u8; 64];
    let len = srb1.tx.pull_pdu(&mut grant);
    assert_eq!(&grant[..len], b"rrc-setup");
    Ok(())
}

/// UE indexes are recycled and the repository respects `max_ues`
#[test]
fn test_repository_lifecycle() -> TestResult {
    init_test_logging();

    let mut repo = DuRlcRepository::new(test_du_config())?;
    let ues: Vec<_> = (0..8).map(|_| repo.create_ue()).collect::<Result<_, _>>()?;
    assert!(matches!(repo.create_ue(), Err(RlcError::RepositoryFull { max_ues: 8 })));

    repo.remove_ue(ues[4])?;
    repo.remove_ue(ues[2])?;
    assert_eq!(repo.create_ue()?.value(), 2);
    assert_eq!(repo.create_ue()?.value(), 4);

    let order: Vec<u16> = repo.iter().map(|(ue, _)| ue.value()).collect();
    assert_eq!(order, (0..8).collect::<Vec<u16>>());
    Ok(())
}
