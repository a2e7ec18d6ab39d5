//! Flow statistics CLI for finished WanSim runs.
//!
//! Reads the flow records exported by the simulation engine and writes the
//! aggregate performance report as JSON and text.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Context, Result};

use wansim::analysis::{self, AnalysisMetadata, FlowAnalysisReport};
use wansim::{config_loader, orchestrator};

#[derive(Parser)]
#[command(name = "flow-report")]
#[command(about = "Aggregate per-flow statistics of a WanSim run")]
#[command(version)]
struct Cli {
    /// Flow records written by the simulation engine
    #[arg(short, long, default_value = "flows.json")]
    flows: PathBuf,

    /// Scenario configuration the run was generated from
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated duration in seconds; overrides the configuration
    #[arg(long, allow_negative_numbers = true)]
    sim_time: Option<f64>,

    /// Output directory for reports
    #[arg(short, long, default_value = "analysis_output")]
    output: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Omit per-flow rows from the reports
    #[arg(long)]
    summary_only: bool,
}

fn create_metadata(flow_file: &Path, duration_secs: f64) -> AnalysisMetadata {
    AnalysisMetadata {
        analysis_timestamp: chrono::Utc::now().to_rfc3339(),
        flow_file: flow_file.display().to_string(),
        simulation_duration_secs: duration_secs,
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    let config = config_loader::load_or_default(cli.config.as_deref())?;
    let records = analysis::load_flow_records(&cli.flows)?;
    let evaluation = orchestrator::evaluate_flows(&config, &records, cli.sim_time, !cli.summary_only)?;

    let report = FlowAnalysisReport {
        metadata: create_metadata(&cli.flows, evaluation.duration_secs),
        aggregate: evaluation.aggregate,
        flows: evaluation.flows,
    };

    fs::create_dir_all(&cli.output)
        .with_context(|| format!("Failed to create output directory: {}", cli.output.display()))?;
    analysis::generate_json_report(&report, &cli.output.join("flow_report.json"))?;
    analysis::generate_text_report(&report, &cli.output.join("flow_report.txt"))?;
    analysis::report::print_summary(&report);

    Ok(())
}
