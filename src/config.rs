use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::WansimError;
use crate::ip::AddressPlan;
use crate::layout::LayoutParams;
use crate::topology::{TechnologyCatalog, TechnologyProfile};

/// Scenario configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    pub network: NetworkConfig,
    #[serde(default)]
    pub addressing: AddressPlan,
    #[serde(default)]
    pub layout: LayoutParams,
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        // Validate general settings
        if self.general.simulation_duration.is_zero() {
            return Err(ValidationError::InvalidGeneral(
                "simulation_duration must be greater than zero".to_string(),
            ));
        }
        if self.general.animation_output_path.as_os_str().is_empty() {
            return Err(ValidationError::InvalidGeneral(
                "animation_output_path cannot be empty".to_string(),
            ));
        }

        // Validate network settings
        let network = &self.network;
        if network.site_count < 0 {
            return Err(ValidationError::InvalidNetwork(format!(
                "site_count must be non-negative, got {}",
                network.site_count
            )));
        }
        if network.devices_per_site < 0 {
            return Err(ValidationError::InvalidNetwork(format!(
                "devices_per_site must be non-negative, got {}",
                network.devices_per_site
            )));
        }
        if let Some(names) = &network.site_names {
            if names.is_empty() {
                return Err(ValidationError::InvalidNetwork(
                    "site_names cannot be an empty list".to_string(),
                ));
            }
        }
        if let Some(techs) = &network.access_technologies {
            if techs.is_empty() {
                return Err(ValidationError::InvalidNetwork(
                    "access_technologies cannot be an empty list".to_string(),
                ));
            }
        }
        self.catalog()
            .map_err(|e| ValidationError::InvalidNetwork(e.to_string()))?;

        // Validate addressing and layout
        self.addressing
            .validate()
            .map_err(|e| ValidationError::InvalidAddressing(e.to_string()))?;
        if self.layout.ring_capacity == 0 {
            return Err(ValidationError::InvalidLayout(
                "ring_capacity must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Access technology catalog, falling back to the built-in table
    pub fn catalog(&self) -> Result<TechnologyCatalog, WansimError> {
        match &self.network.access_technologies {
            None => Ok(TechnologyCatalog::default()),
            Some(techs) => {
                let profiles = techs
                    .iter()
                    .map(|t| TechnologyProfile::parse(&t.label, &t.bandwidth, &t.delay))
                    .collect::<Result<Vec<_>, _>>()?;
                TechnologyCatalog::new(profiles)
            }
        }
    }

    pub fn site_names(&self) -> &[String] {
        self.network.site_names.as_deref().unwrap_or(&[])
    }

    pub fn duration_secs(&self) -> f64 {
        self.general.simulation_duration.as_secs_f64()
    }
}

/// Shared general configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Simulated run length; bounds traffic and the throughput denominator
    #[serde(with = "humantime_serde")]
    pub simulation_duration: Duration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    #[serde(default = "default_true")]
    pub enable_trace_capture: bool,
    #[serde(default = "default_true")]
    pub enable_flow_monitoring: bool,
    #[serde(default = "default_animation_path")]
    pub animation_output_path: PathBuf,
}

/// Hierarchy size and access technologies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub site_count: i64,
    pub devices_per_site: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_names: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_technologies: Option<Vec<TechnologyConfig>>,
}

/// One entry of a custom access catalog, with unit strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnologyConfig {
    pub label: String,
    pub bandwidth: String,
    pub delay: String,
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid general configuration: {0}")]
    InvalidGeneral(String),
    #[error("Invalid network configuration: {0}")]
    InvalidNetwork(String),
    #[error("Invalid addressing configuration: {0}")]
    InvalidAddressing(String),
    #[error("Invalid layout configuration: {0}")]
    InvalidLayout(String),
}

fn default_true() -> bool {
    true
}

fn default_animation_path() -> PathBuf {
    PathBuf::from("wan-animation.json")
}

/// Default implementations
impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            simulation_duration: Duration::from_secs(60),
            log_level: Some("info".to_string()),
            enable_trace_capture: true,
            enable_flow_monitoring: true,
            animation_output_path: default_animation_path(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            site_count: 5,
            devices_per_site: 50,
            site_names: Some(
                ["Nkolbisson", "Mvog-Ada", "Essos", "Mendong", "Ngoa-Ekellé"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            ),
            access_technologies: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            network: NetworkConfig::default(),
            addressing: AddressPlan::default(),
            layout: LayoutParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_parsing() {
        let yaml = r#"
general:
  simulation_duration: "2m"
  log_level: debug
  enable_trace_capture: false
network:
  site_count: 8
  devices_per_site: 12
  site_names: ["North", "South"]
  access_technologies:
    - { label: "Fibre", bandwidth: "1Gbps", delay: "5ms" }
    - { label: "VSAT", bandwidth: "10Mbps", delay: "550ms" }
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.general.simulation_duration, Duration::from_secs(120));
        assert!(!config.general.enable_trace_capture);
        assert!(config.general.enable_flow_monitoring);
        assert_eq!(config.general.animation_output_path, PathBuf::from("wan-animation.json"));
        assert_eq!(config.addressing, AddressPlan::default());
        assert_eq!(config.layout, LayoutParams::default());

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.profile_for_site(3).label, "VSAT");
        assert_eq!(catalog.profile_for_site(3).delay, Duration::from_millis(550));
        assert_eq!(config.site_names().len(), 2);
    }

    #[test]
    fn test_default_catalog_when_absent() {
        let yaml = r#"
general:
  simulation_duration: "60s"
network:
  site_count: 0
  devices_per_site: 0
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.catalog().unwrap(), TechnologyCatalog::default());
        assert!(config.site_names().is_empty());
    }

    #[test]
    fn test_validation_errors() {
        let mut config = Config::default();
        config.network.site_count = -1;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidNetwork(_))));

        let mut config = Config::default();
        config.network.devices_per_site = -10;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidNetwork(_))));

        let mut config = Config::default();
        config.general.simulation_duration = Duration::ZERO;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidGeneral(_))));

        let mut config = Config::default();
        config.general.animation_output_path = PathBuf::new();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidGeneral(_))));

        let mut config = Config::default();
        config.network.access_technologies = Some(Vec::new());
        assert!(matches!(config.validate(), Err(ValidationError::InvalidNetwork(_))));

        let mut config = Config::default();
        config.network.access_technologies = Some(vec![TechnologyConfig {
            label: "Bad".to_string(),
            bandwidth: "lots".to_string(),
            delay: "5ms".to_string(),
        }]);
        assert!(matches!(config.validate(), Err(ValidationError::InvalidNetwork(_))));

        let mut config = Config::default();
        config.network.site_names = Some(Vec::new());
        assert!(matches!(config.validate(), Err(ValidationError::InvalidNetwork(_))));

        let mut config = Config::default();
        config.layout.ring_capacity = 0;
        assert!(matches!(config.validate(), Err(ValidationError::InvalidLayout(_))));
    }

    #[test]
    fn test_custom_addressing() {
        let yaml = r#"
general:
  simulation_duration: "30s"
network:
  site_count: 2
  devices_per_site: 2
addressing:
  core: { pool_base: "172.16.0.0", pool_prefix: 30, stride_prefix: 30, block_prefix: 30 }
  access: { pool_base: "172.17.0.0", pool_prefix: 16, stride_prefix: 30, block_prefix: 30 }
  local: { pool_base: "172.18.0.0", pool_prefix: 16, stride_prefix: 24, block_prefix: 25 }
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.addressing.access.capacity(), 16384);

        let yaml = yaml.replace("172.17.0.0", "172.16.0.0");
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert!(matches!(config.validate(), Err(ValidationError::InvalidAddressing(_))));
    }

    #[test]
    fn test_default_scenario() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.network.site_count, 5);
        assert_eq!(config.network.devices_per_site, 50);
        assert_eq!(config.duration_secs(), 60.0);
    }
}
