//! Integration test framework for nextgran
#![allow(missing_docs)]
//!
//! This crate provides helpers shared by the cross-crate integration tests.
//!
//! # Components
//!
//! - [`test_fixtures`] - DU RLC configuration fixtures
//! - [`test_utils`] - Logging setup, SDU collectors and PDU pumping helpers
//!
//! # Test Categories
//!
//! 1. **Container Properties** - Property tests of the slotted containers
//! 2. **SDU Queue Properties** - FIFO, discard and capacity properties of the SDU queue
//! 3. **RLC Bearer Tests** - TX to RX data flow through the bearer repository

pub mod test_fixtures;
pub mod test_utils;

pub use test_fixtures::{test_du_config, TEST_DU_CONFIG_YAML};
pub use test_utils::{init_test_logging, pdcp_sdu, pump_pdus, SduCollector, TestResult};
