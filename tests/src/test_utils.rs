//! Test utility functions for integration tests
//!
//! Provides common utilities for test setup, logging, and RLC data flow.

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use nextgran_rlc::{
    BoxedRxNotifier, RlcRxLowerLayerInterface, RlcSdu, RlcTxLowerLayerInterface,
};
use tracing_subscriber::{fmt, EnvFilter};

/// Result type for integration tests
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize logging for tests with optional filter
///
/// Uses RUST_LOG environment variable if set, otherwise defaults to "info"
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// SDU with a PDCP SN and a payload of `len` bytes tagged with the SN
pub fn pdcp_sdu(sn: u32, len: usize) -> RlcSdu {
    RlcSdu::with_pdcp_sn(vec![sn as u8; len], sn)
}

/// Collects the SDUs delivered by an RX entity
#[derive(Debug, Clone, Default)]
pub struct SduCollector {
    sdus: Arc<Mutex<Vec<Bytes>>>,
}

impl SduCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifier to hand to an RX entity
    pub fn notifier(&self) -> BoxedRxNotifier {
        let sdus = Arc::clone(&self.sdus);
        Box::new(move |sdu: Bytes| sdus.lock().unwrap().push(sdu))
    }

    /// SDUs delivered so far
    pub fn sdus(&self) -> Vec<Bytes> {
        self.sdus.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.sdus.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Pulls PDUs of at most `grant` bytes from `tx` and hands them to `rx`
/// until `tx` has nothing left. Returns the number of PDUs moved.
pub fn pump_pdus(
    tx: &mut impl RlcTxLowerLayerInterface,
    rx: &mut impl RlcRxLowerLayerInterface,
    grant: usize,
) -> usize {
    let mut buf = vec![0u8; grant];
    let mut nof_pdus = 0;
    loop {
        let len = tx.pull_pdu(&mut buf);
        if len == 0 {
            return nof_pdus;
        }
        rx.handle_pdu(Bytes::copy_from_slice(&buf[..len]));
        nof_pdus += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextgran_rlc::RlcRxUpperLayerDataNotifier;

    #[test]
    fn test_sdu_collector() {
        let collector = SduCollector::new();
        let mut notifier = collector.notifier();
        notifier.on_new_sdu(Bytes::from_static(b"abc"));
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.sdus()[0], Bytes::from_static(b"abc"));
    }

    #[test]
    fn test_pdcp_sdu() {
        let sdu = pdcp_sdu(7, 3);
        assert_eq!(sdu.pdcp_sn, Some(7));
        assert_eq!(&sdu.buf[..], &[7, 7, 7]);
    }
}
