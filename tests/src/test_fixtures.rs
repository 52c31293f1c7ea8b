//! Test fixtures for RLC integration tests

use nextgran_common::DuRlcConfig;

/// Small DU: 8 UEs, TM SRBs, 6-bit UM DRBs with a short SDU queue
pub const TEST_DU_CONFIG_YAML: &str = r#"
max_ues: 8
srb:
  mode: tm
  sdu_queue_capacity: 16
drb:
  mode: um
  sdu_queue_capacity: 32
  um:
    sn_field_length: 6
"#;

/// Parses [`TEST_DU_CONFIG_YAML`]
pub fn test_du_config() -> DuRlcConfig {
    DuRlcConfig::from_yaml(TEST_DU_CONFIG_YAML).expect("test DU config must parse")
}

#[cfg(test)]
mod tests {
    use super::*;
    use nextgran_common::RlcMode;

    #[test]
    fn test_du_config_fixture() {
        let config = test_du_config();
        assert_eq!(config.max_ues, 8);
        assert_eq!(config.srb.mode, RlcMode::Tm);
        assert_eq!(config.drb.sdu_queue_capacity, 32);
        assert!(config.validate().is_ok());
    }
}
