//! Scenario orchestrator.
//!
//! This module coordinates the synthesis phases in their dependency order
//! (topology, addressing, layout) and writes the bundle the external
//! simulation engine consumes.

use color_eyre::eyre::WrapErr;
use log::info;
use serde::Serialize;
use std::fs;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use crate::analysis::{aggregate_flows, summarize_flows, AggregateReport, FlowRecord, FlowSummary};
use crate::config::Config;
use crate::error::{Result, WansimError};
use crate::ip::{allocate_addresses, AddressAllocation};
use crate::layout::{compute_layout, Layout};
use crate::topology::{build_topology, checked_count, NodeId, Tier, Topology};

/// UDP echo port the central server listens on
pub const ECHO_PORT: u16 = 9;

/// Number of leading sites whose LAN is captured
pub const CAPTURED_SITE_LANS: usize = 2;

pub const ADDRESSES_FILE: &str = "addresses.json";
pub const MANIFEST_FILE: &str = "scenario.json";

/// Output of the synthesis phases
#[derive(Debug, Clone)]
pub struct Scenario {
    pub topology: Topology,
    pub addresses: AddressAllocation,
    pub layout: Layout,
}

/// Where traffic generators should send their requests
#[derive(Debug, Clone, Serialize)]
pub struct ServerTarget {
    pub node: NodeId,
    pub address: Ipv4Addr,
    pub port: u16,
}

/// One capture file set the engine should emit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureTarget {
    pub prefix: String,
    pub tier: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<usize>,
    pub nodes: Vec<NodeId>,
    pub promiscuous: bool,
}

/// Per-site view of the generated scenario
#[derive(Debug, Clone, Serialize)]
pub struct SiteSummary {
    pub site: usize,
    pub name: String,
    pub technology: String,
    pub bandwidth_bps: u64,
    #[serde(with = "humantime_serde")]
    pub delay: std::time::Duration,
    pub router: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_address: Option<Ipv4Addr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lan_block: Option<String>,
}

/// Top-level description of a generated scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioManifest {
    pub site_count: usize,
    pub devices_per_site: usize,
    pub node_count: usize,
    pub simulation_duration_secs: f64,
    pub server: ServerTarget,
    pub flow_monitoring: bool,
    pub trace_capture: Vec<CaptureTarget>,
    pub animation_file: PathBuf,
    pub sites: Vec<SiteSummary>,
}

/// Paths written by [`write_scenario`]
#[derive(Debug, Clone)]
pub struct ScenarioOutputs {
    pub addresses: PathBuf,
    pub animation: PathBuf,
    pub manifest: PathBuf,
}

/// Run topology, addressing and layout for `config`
pub fn build_scenario(config: &Config) -> Result<Scenario> {
    let catalog = config.catalog()?;

    // refuse counts the address plan cannot hold before any node is created
    let site_count = checked_count("site_count", config.network.site_count)?;
    let devices_per_site = checked_count("devices_per_site", config.network.devices_per_site)?;
    config.addressing.validate()?;
    config.addressing.check_capacity(site_count, devices_per_site)?;

    let topology = build_topology(
        config.network.site_count,
        config.network.devices_per_site,
        &catalog,
        config.site_names(),
    )?;
    let addresses = allocate_addresses(&topology, &config.addressing)?;
    let layout = compute_layout(&topology, &config.layout);

    Ok(Scenario { topology, addresses, layout })
}

/// Capture targets: the core link and the router side of the first site LANs
pub fn capture_plan(topology: &Topology, enabled: bool) -> Vec<CaptureTarget> {
    if !enabled {
        return Vec::new();
    }

    let core = topology.core_link();
    let mut targets = vec![CaptureTarget {
        prefix: "core".to_string(),
        tier: Tier::Core,
        site: None,
        nodes: vec![core.a, core.b],
        promiscuous: false,
    }];
    targets.extend(
        topology
            .lan_segments()
            .iter()
            .take(CAPTURED_SITE_LANS)
            .map(|lan| CaptureTarget {
                prefix: format!("site-{}", lan.site),
                tier: Tier::Local,
                site: Some(lan.site),
                nodes: vec![lan.router()],
                promiscuous: true,
            }),
    );
    targets
}

/// Server endpoint traffic generators target
pub fn server_target(scenario: &Scenario) -> Result<ServerTarget> {
    let node = scenario.topology.central_server();
    let address = scenario
        .addresses
        .address_of(node, Tier::Core)
        .ok_or_else(|| WansimError::invalid("central server has no core address"))?;
    Ok(ServerTarget { node, address, port: ECHO_PORT })
}

/// Assemble the manifest for `scenario`
pub fn build_manifest(config: &Config, scenario: &Scenario, animation_file: &Path) -> Result<ScenarioManifest> {
    let topology = &scenario.topology;
    let sites = topology
        .access_links()
        .iter()
        .filter_map(|link| link.site.map(|site| (site, link)))
        .map(|(site, link)| SiteSummary {
            site,
            name: topology.site_name(site).unwrap_or_default().to_string(),
            technology: link.profile.label.clone(),
            bandwidth_bps: link.profile.bandwidth_bps,
            delay: link.profile.delay,
            router: link.b,
            access_address: scenario.addresses.address_of(link.b, Tier::Access),
            lan_block: scenario
                .addresses
                .block(Tier::Local, Some(site))
                .map(|b| b.to_string()),
        })
        .collect();

    Ok(ScenarioManifest {
        site_count: topology.site_count(),
        devices_per_site: topology.devices_per_site(),
        node_count: topology.nodes().len(),
        simulation_duration_secs: config.duration_secs(),
        server: server_target(scenario)?,
        flow_monitoring: config.general.enable_flow_monitoring,
        trace_capture: capture_plan(topology, config.general.enable_trace_capture),
        animation_file: animation_file.to_path_buf(),
        sites,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> color_eyre::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .wrap_err_with(|| format!("Failed to serialize {}", path.display()))?;
    fs::write(path, json).wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write the scenario bundle into `output_dir`
pub fn write_scenario(config: &Config, scenario: &Scenario, output_dir: &Path) -> color_eyre::Result<ScenarioOutputs> {
    fs::create_dir_all(output_dir)
        .wrap_err_with(|| format!("Failed to create output directory '{}'", output_dir.display()))?;

    let addresses = output_dir.join(ADDRESSES_FILE);
    write_json(&addresses, &scenario.addresses)?;
    info!("Address plan written to {}", addresses.display());

    let animation = output_dir.join(&config.general.animation_output_path);
    if let Some(parent) = animation.parent() {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("Failed to create directory '{}'", parent.display()))?;
    }
    write_json(&animation, &scenario.layout)?;
    info!("Layout written to {}", animation.display());

    let manifest = output_dir.join(MANIFEST_FILE);
    write_json(&manifest, &build_manifest(config, scenario, &animation)?)?;
    info!("Scenario manifest written to {}", manifest.display());

    Ok(ScenarioOutputs { addresses, animation, manifest })
}

/// Build the scenario described by `config` and write it to `output_dir`
pub fn generate_scenario(config: &Config, output_dir: &Path) -> color_eyre::Result<Scenario> {
    info!(
        "Generating scenario: {} sites x {} devices, {:.1}s",
        config.network.site_count,
        config.network.devices_per_site,
        config.duration_secs()
    );

    let scenario = build_scenario(config)?;
    write_scenario(config, &scenario, output_dir)?;
    Ok(scenario)
}

/// Metrics of a finished run
#[derive(Debug, Clone)]
pub struct FlowEvaluation {
    pub duration_secs: f64,
    pub aggregate: AggregateReport,
    pub flows: Vec<FlowSummary>,
}

/// Evaluate the flow records of a run generated from `config`.
///
/// Fails when the scenario ran without flow monitoring. `duration_secs`
/// falls back to the configured simulation duration.
pub fn evaluate_flows(
    config: &Config,
    records: &[FlowRecord],
    duration_secs: Option<f64>,
    per_flow: bool,
) -> Result<FlowEvaluation> {
    if !config.general.enable_flow_monitoring {
        return Err(WansimError::invalid("flow monitoring is disabled for this scenario"));
    }

    let duration_secs = duration_secs.unwrap_or_else(|| config.duration_secs());
    let aggregate = aggregate_flows(records, duration_secs)?;
    let flows = if per_flow {
        summarize_flows(records, duration_secs)?
    } else {
        Vec::new()
    };
    Ok(FlowEvaluation { duration_secs, aggregate, flows })
}
