//! RLC configuration structures
//!
//! Configuration for RLC bearers and for the DU-wide RLC repository, loadable
//! from YAML.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::MAX_NOF_DU_UES;

/// Default capacity of the RLC SDU queue of a bearer.
pub const DEFAULT_SDU_QUEUE_CAPACITY: usize = 4096;

/// RLC mode of a bearer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RlcMode {
    /// Transparent mode
    Tm,
    /// Unacknowledged mode
    Um,
}

impl fmt::Display for RlcMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RlcMode::Tm => write!(f, "TM"),
            RlcMode::Um => write!(f, "UM"),
        }
    }
}

/// UM sequence number field length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UmSnSize {
    /// 6-bit SN
    Size6,
    /// 12-bit SN
    Size12,
}

impl UmSnSize {
    /// Number of SN bits
    pub fn bits(&self) -> u8 {
        match self {
            UmSnSize::Size6 => 6,
            UmSnSize::Size12 => 12,
        }
    }

    /// SN modulus (`2^bits`)
    pub fn modulus(&self) -> u32 {
        1 << self.bits()
    }

    /// UM window size (`modulus / 2`)
    pub fn window_size(&self) -> u32 {
        self.modulus() / 2
    }
}

impl TryFrom<u8> for UmSnSize {
    type Error = Error;

    fn try_from(bits: u8) -> Result<Self, Error> {
        match bits {
            6 => Ok(UmSnSize::Size6),
            12 => Ok(UmSnSize::Size12),
            other => Err(Error::Config(format!(
                "unsupported UM SN field length: {other} (expected 6 or 12)"
            ))),
        }
    }
}

/// Unacknowledged mode parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RlcUmConfig {
    /// SN field length in bits (6 or 12)
    #[serde(default = "default_um_sn_field_length")]
    pub sn_field_length: u8,
}

fn default_um_sn_field_length() -> u8 {
    12
}

impl Default for RlcUmConfig {
    fn default() -> Self {
        Self {
            sn_field_length: default_um_sn_field_length(),
        }
    }
}

/// Configuration of one RLC bearer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RlcConfig {
    /// RLC mode
    pub mode: RlcMode,
    /// Maximum number of SDUs held in the TX SDU queue
    #[serde(default = "default_sdu_queue_capacity")]
    pub sdu_queue_capacity: usize,
    /// UM parameters, required when `mode` is `um`
    #[serde(default)]
    pub um: Option<RlcUmConfig>,
}

fn default_sdu_queue_capacity() -> usize {
    DEFAULT_SDU_QUEUE_CAPACITY
}

impl RlcConfig {
    /// Transparent mode bearer with the default queue capacity.
    pub fn tm() -> Self {
        Self {
            mode: RlcMode::Tm,
            sdu_queue_capacity: DEFAULT_SDU_QUEUE_CAPACITY,
            um: None,
        }
    }

    /// Unacknowledged mode bearer with the given SN field length.
    pub fn um(sn_field_length: u8) -> Self {
        Self {
            mode: RlcMode::Um,
            sdu_queue_capacity: DEFAULT_SDU_QUEUE_CAPACITY,
            um: Some(RlcUmConfig { sn_field_length }),
        }
    }

    /// Sets the SDU queue capacity
    pub fn with_sdu_queue_capacity(mut self, capacity: usize) -> Self {
        self.sdu_queue_capacity = capacity;
        self
    }

    /// UM SN size. Fails when the bearer is not UM or the length is invalid.
    pub fn um_sn_size(&self) -> Result<UmSnSize, Error> {
        match (&self.mode, &self.um) {
            (RlcMode::Um, Some(um)) => UmSnSize::try_from(um.sn_field_length),
            (RlcMode::Um, None) => Err(Error::Config("UM bearer without um parameters".into())),
            (mode, _) => Err(Error::Config(format!("{mode} bearer has no SN field"))),
        }
    }

    /// Checks the configuration for consistency.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sdu_queue_capacity == 0 {
            return Err(Error::Config("sdu_queue_capacity must be non-zero".into()));
        }
        if self.mode == RlcMode::Um {
            self.um_sn_size()?;
        }
        Ok(())
    }
}

/// DU-wide RLC configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuRlcConfig {
    /// Maximum number of UEs with RLC bearers
    #[serde(default = "default_max_ues")]
    pub max_ues: usize,
    /// RLC configuration applied to SRBs
    #[serde(default = "RlcConfig::tm")]
    pub srb: RlcConfig,
    /// RLC configuration applied to DRBs
    #[serde(default = "default_drb_config")]
    pub drb: RlcConfig,
}

fn default_max_ues() -> usize {
    MAX_NOF_DU_UES
}

fn default_drb_config() -> RlcConfig {
    RlcConfig::um(12)
}

impl Default for DuRlcConfig {
    fn default() -> Self {
        Self {
            max_ues: default_max_ues(),
            srb: RlcConfig::tm(),
            drb: default_drb_config(),
        }
    }
}

impl DuRlcConfig {
    /// Parses a DU RLC configuration from a YAML string.
    ///
    /// # Example
    /// ```
    /// use nextgran_common::DuRlcConfig;
    ///
    /// let yaml = r#"
    /// max_ues: 64
    /// srb:
    ///   mode: tm
    /// drb:
    ///   mode: um
    ///   sdu_queue_capacity: 256
    ///   um:
    ///     sn_field_length: 6
    /// "#;
    ///
    /// let config = DuRlcConfig::from_yaml(yaml).unwrap();
    /// assert_eq!(config.max_ues, 64);
    /// assert_eq!(config.drb.sdu_queue_capacity, 256);
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads a DU RLC configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Serializes the configuration to a YAML string.
    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks the configuration for consistency.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_ues == 0 || self.max_ues > MAX_NOF_DU_UES {
            return Err(Error::Config(format!(
                "max_ues must be in 1..={MAX_NOF_DU_UES}, got {}",
                self.max_ues
            )));
        }
        self.srb.validate()?;
        self.drb.validate()
    }
}
