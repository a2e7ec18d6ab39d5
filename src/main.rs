use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use wansim::config_loader::{self, ScenarioOverrides};
use wansim::orchestrator;

/// Scenario generator for simulated multi-tier access networks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the scenario configuration YAML file (built-in scenario if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory for the scenario bundle
    #[arg(short, long, default_value = "wansim_output")]
    output: PathBuf,

    /// Number of access sites
    #[arg(long, allow_negative_numbers = true)]
    sites: Option<i64>,

    /// Devices attached to each site LAN
    #[arg(long, allow_negative_numbers = true)]
    devices: Option<i64>,

    /// Simulated duration in seconds
    #[arg(long, allow_negative_numbers = true)]
    sim_time: Option<f64>,

    /// Enable link-level capture files
    #[arg(long)]
    pcap: Option<bool>,

    /// Enable flow monitoring
    #[arg(long)]
    flowmon: Option<bool>,

    /// Log level (trace, debug, info, warn, error); overrides the configuration
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> ScenarioOverrides {
        ScenarioOverrides {
            sites: self.sites,
            devices: self.devices,
            sim_time_secs: self.sim_time,
            trace_capture: self.pcap,
            flow_monitoring: self.flowmon,
        }
    }

    /// Default log filter: `--log-level`, then the scenario's
    /// `general.log_level`, then `info`
    fn log_filter(&self) -> String {
        self.log_level
            .clone()
            .or_else(|| self.config.as_deref().and_then(config_loader::peek_log_level))
            .unwrap_or_else(|| "info".to_string())
    }
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging, RUST_LOG wins over the default filter
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_filter())).init();

    info!("Starting WanSim scenario generator");
    info!("Configuration file: {:?}", args.config);
    info!("Output directory: {:?}", args.output);

    // Load configuration and apply command-line overrides
    let mut config = config_loader::load_or_default(args.config.as_deref())?;
    config_loader::apply_overrides(&mut config, &args.overrides())?;

    let scenario = orchestrator::generate_scenario(&config, &args.output)?;

    for link in scenario.topology.access_links() {
        if let Some(site) = link.site {
            info!(
                "Site {} - Technology: {}",
                scenario.topology.site_name(site).unwrap_or_default(),
                link.profile.label
            );
        }
    }
    if config.general.enable_flow_monitoring {
        info!("Flow monitoring enabled; aggregate the engine's flow file with flow-report");
    }

    info!("Scenario generation completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from(["wansim"]);
        assert_eq!(args.config, None);
        assert_eq!(args.output, PathBuf::from("wansim_output"));
        assert_eq!(args.sites, None);
    }

    #[test]
    fn test_override_args() {
        let args = Args::parse_from([
            "wansim",
            "--config", "scenario.yaml",
            "--sites", "8",
            "--devices", "20",
            "--sim-time", "120",
            "--pcap", "false",
            "--flowmon", "true",
        ]);

        let overrides = args.overrides();
        assert_eq!(overrides.sites, Some(8));
        assert_eq!(overrides.devices, Some(20));
        assert_eq!(overrides.sim_time_secs, Some(120.0));
        assert_eq!(overrides.trace_capture, Some(false));
        assert_eq!(overrides.flow_monitoring, Some(true));
    }

    #[test]
    fn test_log_filter_precedence() {
        let mut scenario = tempfile::NamedTempFile::new().unwrap();
        write!(scenario, "general:\n  log_level: debug\n").unwrap();
        let path = scenario.path().to_str().unwrap();

        let args = Args::parse_from(["wansim", "--config", path, "--log-level", "warn"]);
        assert_eq!(args.log_filter(), "warn");

        let args = Args::parse_from(["wansim", "--config", path]);
        assert_eq!(args.log_filter(), "debug");

        let args = Args::parse_from(["wansim"]);
        assert_eq!(args.log_filter(), "info");
    }

    #[test]
    fn test_negative_counts_reach_validation() {
        let args = Args::parse_from(["wansim", "--sites", "-3"]);
        assert_eq!(args.sites, Some(-3));
    }
}
