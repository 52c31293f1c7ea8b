//! SDU queue FIFO, discard and capacity properties
//!
//! Random write/read/discard sequences are checked against a `VecDeque`
//! model that tracks discarded entries explicitly.

use std::collections::VecDeque;

use integration_tests::pdcp_sdu;
use nextgran_rlc::RlcSduQueue;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum QueueOp {
    Write { sn: u32, len: usize },
    Read,
    Discard(u32),
}

fn queue_op() -> impl Strategy<Value = QueueOp> {
    prop_oneof![
        3 => (0..16u32, 1..32usize).prop_map(|(sn, len)| QueueOp::Write { sn, len }),
        2 => Just(QueueOp::Read),
        2 => (0..16u32).prop_map(QueueOp::Discard),
    ]
}

#[derive(Debug)]
struct ModelEntry {
    sn: u32,
    len: usize,
    discarded: bool,
}

proptest! {
    #[test]
    fn prop_reads_in_write_order_without_discarded(
        capacity in 1..16usize,
        ops in prop::collection::vec(queue_op(), 0..200),
    ) {
        let queue = RlcSduQueue::new(capacity);
        let mut model: VecDeque<ModelEntry> = VecDeque::new();

        for op in ops {
            match op {
                QueueOp::Write { sn, len } => {
                    let accepted = model.len() < capacity;
                    prop_assert_eq!(queue.write(pdcp_sdu(sn, len)), accepted);
                    if accepted {
                        model.push_back(ModelEntry { sn, len, discarded: false });
                    }
                }
                QueueOp::Read => {
                    while model.front().is_some_and(|e| e.discarded) {
                        model.pop_front();
                    }
                    let expected = model.pop_front();
                    let got = queue.read();
                    prop_assert_eq!(
                        got.as_ref().and_then(|s| s.pdcp_sn),
                        expected.as_ref().map(|e| e.sn)
                    );
                    prop_assert_eq!(got.map(|s| s.len()), expected.map(|e| e.len));
                }
                QueueOp::Discard(sn) => {
                    let target = model.iter_mut().find(|e| !e.discarded && e.sn == sn);
                    let expected = target.is_some();
                    if let Some(entry) = target {
                        entry.discarded = true;
                    }
                    prop_assert_eq!(queue.discard(sn), expected);
                }
            }

            let live = model.iter().filter(|e| !e.discarded);
            prop_assert_eq!(queue.size_sdus(), live.clone().count());
            prop_assert_eq!(queue.size_bytes(), live.map(|e| e.len).sum::<usize>());
        }
    }

    #[test]
    fn prop_write_rejected_exactly_at_capacity(capacity in 1..64usize, extra in 1..8usize) {
        let queue = RlcSduQueue::new(capacity);
        for sn in 0..capacity as u32 {
            prop_assert!(queue.write(pdcp_sdu(sn, 1)));
        }
        for sn in 0..extra as u32 {
            prop_assert!(!queue.write(pdcp_sdu(sn, 1)));
        }
        prop_assert_eq!(queue.size_sdus(), capacity);

        prop_assert!(queue.read().is_some());
        prop_assert!(queue.write(pdcp_sdu(0, 1)));
        prop_assert!(!queue.write(pdcp_sdu(1, 1)));
    }
}

#[test]
fn test_discard_two_of_four() {
    let queue = RlcSduQueue::new(5);
    for sn in [10, 11, 12, 13] {
        assert!(queue.write(pdcp_sdu(sn, 2)));
    }
    assert_eq!((queue.size_sdus(), queue.size_bytes()), (4, 8));

    assert!(queue.discard(11));
    assert!(queue.discard(13));
    assert_eq!((queue.size_sdus(), queue.size_bytes()), (2, 4));

    let read: Vec<Option<u32>> = (0..4).map(|_| queue.read().and_then(|s| s.pdcp_sn)).collect();
    assert_eq!(read, vec![Some(10), Some(12), None, None]);
}

#[test]
fn test_sixth_write_rejected() {
    let queue = RlcSduQueue::new(5);
    let results: Vec<bool> = (0..6).map(|sn| queue.write(pdcp_sdu(sn, 4))).collect();
    assert_eq!(results, vec![true, true, true, true, true, false]);
    assert_eq!(queue.size_sdus(), 5);
}
