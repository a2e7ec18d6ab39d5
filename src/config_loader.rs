use crate::config::{Config, ValidationError};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<Config> {
    info!("Loading configuration from: {:?}", config_path);

    // Open the configuration file
    let file = File::open(config_path)
        .wrap_err_with(|| format!("Failed to open configuration '{}'", config_path.display()))?;

    // Parse the YAML content
    let config: Config = serde_yaml::from_reader(file)
        .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?;

    // Validate the configuration
    config.validate()?;

    Ok(config)
}

/// Load the given file, or fall back to the built-in scenario
pub fn load_or_default(config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(path) => load_config(path),
        None => {
            info!("No configuration file given, using the built-in scenario");
            Ok(Config::default())
        }
    }
}

/// `general.log_level` of a scenario file, read before logging is set up.
///
/// Unreadable or malformed files yield `None`; `load_config` reports them.
pub fn peek_log_level(config_path: &Path) -> Option<String> {
    #[derive(Deserialize)]
    struct Scenario {
        general: Option<General>,
    }

    #[derive(Deserialize)]
    struct General {
        log_level: Option<String>,
    }

    let file = File::open(config_path).ok()?;
    let scenario: Scenario = serde_yaml::from_reader(file).ok()?;
    scenario.general?.log_level
}

/// CLI arguments that can override YAML settings
#[derive(Debug, Clone, Default)]
pub struct ScenarioOverrides {
    pub sites: Option<i64>,
    pub devices: Option<i64>,
    pub sim_time_secs: Option<f64>,
    pub trace_capture: Option<bool>,
    pub flow_monitoring: Option<bool>,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut Config, overrides: &ScenarioOverrides) -> Result<()> {
    if let Some(sites) = overrides.sites {
        info!("Overriding site_count: {} -> {}", config.network.site_count, sites);
        config.network.site_count = sites;
    }

    if let Some(devices) = overrides.devices {
        info!("Overriding devices_per_site: {} -> {}", config.network.devices_per_site, devices);
        config.network.devices_per_site = devices;
    }

    if let Some(secs) = overrides.sim_time_secs {
        let duration = Duration::try_from_secs_f64(secs).map_err(|_| {
            ValidationError::InvalidGeneral(format!("invalid simulation time: {}", secs))
        })?;
        info!("Overriding simulation_duration: {:?} -> {:?}", config.general.simulation_duration, duration);
        config.general.simulation_duration = duration;
    }

    if let Some(pcap) = overrides.trace_capture {
        config.general.enable_trace_capture = pcap;
    }

    if let Some(flowmon) = overrides.flow_monitoring {
        config.general.enable_flow_monitoring = flowmon;
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}
