//! # WanSim - Scenario synthesis for simulated multi-tier access networks
//!
//! This library builds the configuration side of an access network
//! simulation: distributed sites reach a central server over heterogeneous
//! last-mile technologies (fiber, cellular, satellite, radio, copper). It also
//! evaluates the flow counters the simulation engine reports after a run.
//!
//! ## Architecture
//!
//! The phases run in strict order, each over the read-only output of the
//! previous one:
//!
//! - `topology`: server, hub, site routers and devices, with access profiles
//!   taken cyclically from a technology catalog
//! - `ip`: disjoint address blocks per tier and numbered interfaces
//! - `layout`: deterministic 2-D placement for animation export
//! - `analysis`: aggregation of per-flow counters into summary metrics
//!
//! Around them:
//!
//! - `config` / `config_loader`: YAML scenario files and CLI overrides
//! - `orchestrator`: runs the phases, writes the scenario bundle and
//!   evaluates the flow records of a finished run
//! - `utils`: unit string parsing
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use wansim::{config_loader, orchestrator};
//! use std::path::Path;
//!
//! let config = config_loader::load_config(Path::new("scenario.yaml"))?;
//! let scenario = orchestrator::generate_scenario(&config, Path::new("wansim_output"))?;
//! println!("{} nodes", scenario.topology.nodes().len());
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! general:
//!   simulation_duration: "60s"
//!   enable_trace_capture: true
//!   enable_flow_monitoring: true
//!   animation_output_path: "wan-animation.json"
//!
//! network:
//!   site_count: 5
//!   devices_per_site: 50
//! ```
//!
//! ## Error Handling
//!
//! Synthesis and aggregation return [`error::WansimError`]; file handling and
//! the binaries use `color_eyre` for reporting with context.

pub mod error;
pub mod config;
pub mod config_loader;

pub mod topology;
pub mod ip;
pub mod layout;
pub mod analysis;
pub mod utils;
pub mod orchestrator;

pub use error::{Result, WansimError};
