//! Flow statistics aggregation.
//!
//! Turns the per-flow counters of a finished run into network-wide metrics.
//! The mean delay is an unweighted mean of per-flow means: every flow that
//! delivered at least one packet counts once, regardless of its packet count.

use log::{info, warn};

use crate::error::{Result, WansimError};
use super::types::{AggregateReport, FlowRecord, FlowSummary};

fn check_duration(duration_secs: f64) -> Result<()> {
    if !duration_secs.is_finite() || duration_secs <= 0.0 {
        return Err(WansimError::invalid(format!(
            "simulation duration must be positive, got {}",
            duration_secs
        )));
    }
    Ok(())
}

fn packet_overflow(counter: &str, flow_id: u32) -> WansimError {
    WansimError::invalid(format!(
        "total packets {} overflows at flow {}",
        counter, flow_id
    ))
}

/// Aggregate `records` observed over `duration_secs` of simulated time
pub fn aggregate_flows(records: &[FlowRecord], duration_secs: f64) -> Result<AggregateReport> {
    check_duration(duration_secs)?;

    if records.is_empty() {
        warn!("No flows recorded; aggregate metrics reported as no data");
        return Ok(AggregateReport::no_data());
    }

    let mut total_throughput = 0.0;
    let mut total_sent: u64 = 0;
    let mut total_received: u64 = 0;
    let mut delay_sum = 0.0;
    let mut flows_with_deliveries = 0usize;

    for record in records {
        total_throughput += record.throughput_mbps(duration_secs);
        total_sent = total_sent
            .checked_add(record.tx_packets)
            .ok_or_else(|| packet_overflow("sent", record.flow_id))?;
        total_received = total_received
            .checked_add(record.rx_packets)
            .ok_or_else(|| packet_overflow("received", record.flow_id))?;

        if let Some(mean) = record.mean_delay_secs() {
            delay_sum += mean;
            flows_with_deliveries += 1;
        }
    }

    let delivery_ratio_percent =
        (total_sent > 0).then(|| 100.0 * total_received as f64 / total_sent as f64);
    let mean_delay_ms =
        (flows_with_deliveries > 0).then(|| 1000.0 * delay_sum / flows_with_deliveries as f64);

    let report = AggregateReport {
        flow_count: records.len(),
        total_throughput_mbps: Some(total_throughput),
        total_packets_sent: total_sent,
        total_packets_received: total_received,
        delivery_ratio_percent,
        mean_delay_ms,
        flows_with_deliveries,
    };

    info!(
        "Aggregated {} flows: {:.4} Mbps, {} sent, {} received",
        report.flow_count, total_throughput, total_sent, total_received
    );
    Ok(report)
}

/// Per-flow metrics, ordered by flow id
pub fn summarize_flows(records: &[FlowRecord], duration_secs: f64) -> Result<Vec<FlowSummary>> {
    check_duration(duration_secs)?;

    let mut summaries: Vec<FlowSummary> = records
        .iter()
        .map(|r| FlowSummary {
            flow_id: r.flow_id,
            throughput_mbps: r.throughput_mbps(duration_secs),
            tx_packets: r.tx_packets,
            rx_packets: r.rx_packets,
            lost_packets: r.tx_packets.saturating_sub(r.rx_packets),
            mean_delay_ms: r.mean_delay_secs().map(|d| d * 1000.0),
            five_tuple: r.five_tuple.clone(),
        })
        .collect();
    summaries.sort_by_key(|s| s.flow_id);
    Ok(summaries)
}
