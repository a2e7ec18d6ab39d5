//! Flow statistics analysis for finished runs.
//!
//! This module reads the per-flow counters the simulation engine exports and
//! turns them into network-wide metrics and reports.

pub mod types;
pub mod aggregator;
pub mod flow_loader;
pub mod report;

pub use types::*;
pub use aggregator::{aggregate_flows, summarize_flows};
pub use flow_loader::{load_flow_records, parse_flow_records};
pub use report::{generate_json_report, generate_text_report, render_text_report};
