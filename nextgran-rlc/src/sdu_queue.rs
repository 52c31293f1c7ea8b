//! Bounded SDU queue between the upper layer and an RLC TX entity
//!
//! The producer (PDCP) calls [`RlcSduQueue::write`] and
//! [`RlcSduQueue::discard`], the consumer (the TX entity, driven by the
//! scheduler) calls [`RlcSduQueue::read`]. Both sides may run on different
//! threads; structural changes are serialized by an internal mutex.
//!
//! Discarding does not remove the SDU. Its payload is cleared in place and
//! the slot is reclaimed by a later `read`, so SDUs queued ahead of it keep
//! their order.
//!
//! The byte and SDU counters are atomics updated under the lock, so they can
//! be read without taking it. Such reads may be momentarily stale relative to
//! an in-flight `write` or `read`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::sdu::RlcSdu;

pub use nextgran_common::DEFAULT_SDU_QUEUE_CAPACITY;

/// Thread-safe FIFO of RLC SDUs with discard by PDCP SN.
#[derive(Debug)]
pub struct RlcSduQueue {
    capacity: usize,
    queue: Mutex<VecDeque<RlcSdu>>,
    unread_bytes: AtomicUsize,
    n_sdus: AtomicUsize,
}

impl Default for RlcSduQueue {
    fn default() -> Self {
        Self::new(DEFAULT_SDU_QUEUE_CAPACITY)
    }
}

impl RlcSduQueue {
    /// Creates a queue holding at most `capacity` SDUs.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            queue: Mutex::new(VecDeque::with_capacity(capacity)),
            unread_bytes: AtomicUsize::new(0),
            n_sdus: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<RlcSdu>> {
        // A poisoned lock still guards a consistent deque.
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Maximum number of queued SDUs
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Enqueues an SDU.
    ///
    /// Returns `false` without enqueuing when the queue is full. Discarded
    /// SDUs that have not been reclaimed by `read` still occupy a slot.
    pub fn write(&self, sdu: RlcSdu) -> bool {
        let mut queue = self.lock();
        if queue.len() >= self.capacity {
            return false;
        }
        if !sdu.is_empty() {
            self.unread_bytes.fetch_add(sdu.len(), Ordering::Relaxed);
            self.n_sdus.fetch_add(1, Ordering::Relaxed);
        }
        queue.push_back(sdu);
        true
    }

    /// Dequeues the next SDU that was not discarded.
    ///
    /// Discarded entries at the head are dropped on the way. Returns `None`
    /// once the queue runs empty.
    pub fn read(&self) -> Option<RlcSdu> {
        let mut queue = self.lock();
        while let Some(sdu) = queue.pop_front() {
            if sdu.is_empty() {
                continue;
            }
            self.unread_bytes.fetch_sub(sdu.len(), Ordering::Relaxed);
            self.n_sdus.fetch_sub(1, Ordering::Relaxed);
            return Some(sdu);
        }
        None
    }

    /// Discards the front-most queued SDU carrying `pdcp_sn`.
    ///
    /// The SDU stays in place with an empty payload until `read` reclaims
    /// it. Returns `false` if no such SDU is queued.
    pub fn discard(&self, pdcp_sn: u32) -> bool {
        let mut queue = self.lock();
        let Some(sdu) = queue
            .iter_mut()
            .find(|sdu| !sdu.is_empty() && sdu.pdcp_sn == Some(pdcp_sn))
        else {
            return false;
        };
        self.unread_bytes.fetch_sub(sdu.len(), Ordering::Relaxed);
        self.n_sdus.fetch_sub(1, Ordering::Relaxed);
        sdu.buf.clear();
        true
    }

    /// Number of queued SDUs that were not discarded
    pub fn size_sdus(&self) -> usize {
        self.n_sdus.load(Ordering::Relaxed)
    }

    /// Total payload bytes of the queued SDUs that were not discarded
    pub fn size_bytes(&self) -> usize {
        self.unread_bytes.load(Ordering::Relaxed)
    }

    /// Payload size of the head entry without dequeuing it.
    ///
    /// A discarded head reports 0. Returns `None` if the queue is empty.
    pub fn front_size_bytes(&self) -> Option<usize> {
        self.lock().front().map(RlcSdu::len)
    }

    /// Returns true if no entry, discarded or not, is queued
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns true if `write` would currently be rejected
    pub fn is_full(&self) -> bool {
        self.lock().len() >= self.capacity
    }
}
