//! Report generation for flow analysis.
//!
//! Generates both JSON and human-readable text reports.

use std::fs;
use std::path::Path;

use color_eyre::eyre::{Context, Result};

use super::types::*;

/// Render an optional metric, keeping "no data" distinct from zero
fn metric(value: Option<f64>, precision: usize, unit: &str) -> String {
    match value {
        Some(v) => format!("{:.*}{}", precision, v, unit),
        None => "no data".to_string(),
    }
}

/// Generate JSON report
pub fn generate_json_report(report: &FlowAnalysisReport, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report)
        .context("Failed to serialize report to JSON")?;

    fs::write(output_path, json)
        .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))?;

    log::info!("JSON report written to {}", output_path.display());
    Ok(())
}

/// Build the text report body
pub fn render_text_report(report: &FlowAnalysisReport) -> String {
    let mut lines: Vec<String> = Vec::new();
    let agg = &report.aggregate;

    lines.push("=".repeat(72));
    lines.push("                     NETWORK PERFORMANCE STATISTICS".to_string());
    lines.push("=".repeat(72));
    lines.push(String::new());

    lines.push(format!("Analysis Date: {}", report.metadata.analysis_timestamp));
    lines.push(format!("Flow File: {}", report.metadata.flow_file));
    lines.push(format!("Simulated Duration: {:.1}s", report.metadata.simulation_duration_secs));
    lines.push(format!("Flows: {}", agg.flow_count));
    lines.push(String::new());

    if !agg.has_data() {
        lines.push("No flows were recorded during this run.".to_string());
        lines.push(String::new());
    }

    lines.push(format!("Total Throughput: {}", metric(agg.total_throughput_mbps, 4, " Mbps")));
    lines.push(format!("Packets Sent: {}", agg.total_packets_sent));
    lines.push(format!("Packets Received: {}", agg.total_packets_received));
    lines.push(format!("Delivery Ratio: {}", metric(agg.delivery_ratio_percent, 2, "%")));
    lines.push(format!(
        "Mean Delay: {} (over {} flows with deliveries)",
        metric(agg.mean_delay_ms, 3, " ms"),
        agg.flows_with_deliveries
    ));
    lines.push(String::new());

    if !report.flows.is_empty() {
        lines.push("-".repeat(72));
        lines.push(format!(
            "{:>6}  {:>12}  {:>8}  {:>8}  {:>6}  {:>12}",
            "Flow", "Mbps", "Sent", "Recv", "Lost", "Delay"
        ));
        lines.push("-".repeat(72));
        for flow in &report.flows {
            lines.push(format!(
                "{:>6}  {:>12.6}  {:>8}  {:>8}  {:>6}  {:>12}",
                flow.flow_id,
                flow.throughput_mbps,
                flow.tx_packets,
                flow.rx_packets,
                flow.lost_packets,
                metric(flow.mean_delay_ms, 3, " ms"),
            ));
        }
        lines.push(String::new());
    }

    lines.push("=".repeat(72));
    lines.join("\n")
}

/// Generate human-readable text report
pub fn generate_text_report(report: &FlowAnalysisReport, output_path: &Path) -> Result<()> {
    fs::write(output_path, render_text_report(report))
        .with_context(|| format!("Failed to write text report to {}", output_path.display()))?;

    log::info!("Text report written to {}", output_path.display());
    Ok(())
}

/// Print a short summary to stdout
pub fn print_summary(report: &FlowAnalysisReport) {
    let agg = &report.aggregate;
    println!("\n=== NETWORK PERFORMANCE SUMMARY ===\n");
    println!("Flows: {}", agg.flow_count);
    println!("Total throughput: {}", metric(agg.total_throughput_mbps, 4, " Mbps"));
    println!("Packets sent: {}", agg.total_packets_sent);
    println!("Packets received: {}", agg.total_packets_received);
    println!("Delivery ratio: {}", metric(agg.delivery_ratio_percent, 2, "%"));
    println!("Mean delay: {}", metric(agg.mean_delay_ms, 3, " ms"));
    println!();
}
