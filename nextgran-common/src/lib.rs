//! Common types and utilities for nextgran
//!
//! This crate provides shared identifier types, RLC configuration structures,
//! error types, and logging utilities used across all nextgran crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{
    DuRlcConfig, RlcConfig, RlcMode, RlcUmConfig, UmSnSize, DEFAULT_SDU_QUEUE_CAPACITY,
};
pub use error::Error;
pub use logging::{log_rlc_pdu, Direction, HexDump};
pub use types::*;
