//! Core data types for flow analysis.

use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Transport classification of a flow, as reported by the engine's classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiveTuple {
    pub source_address: Ipv4Addr,
    pub destination_address: Ipv4Addr,
    pub source_port: u16,
    pub destination_port: u16,
    /// IP protocol number (17 = UDP)
    pub protocol: u8,
}

/// Counters of one end-to-end flow at the end of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub flow_id: u32,
    pub tx_packets: u64,
    pub rx_packets: u64,
    #[serde(default)]
    pub tx_bytes: u64,
    pub rx_bytes: u64,
    /// Accumulated one-way delay over all received packets, in seconds
    pub delay_sum_secs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub five_tuple: Option<FiveTuple>,
}

impl FlowRecord {
    pub fn new(flow_id: u32, tx_packets: u64, rx_packets: u64, rx_bytes: u64, delay_sum_secs: f64) -> Self {
        Self {
            flow_id,
            tx_packets,
            rx_packets,
            tx_bytes: 0,
            rx_bytes,
            delay_sum_secs,
            five_tuple: None,
        }
    }

    /// Mean one-way delay in seconds, only defined when something arrived
    pub fn mean_delay_secs(&self) -> Option<f64> {
        (self.rx_packets > 0).then(|| self.delay_sum_secs / self.rx_packets as f64)
    }

    pub fn throughput_mbps(&self, duration_secs: f64) -> f64 {
        self.rx_bytes as f64 * 8.0 / duration_secs / 1e6
    }
}

/// Derived per-flow metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowSummary {
    pub flow_id: u32,
    pub throughput_mbps: f64,
    pub tx_packets: u64,
    pub rx_packets: u64,
    pub lost_packets: u64,
    /// `None` when the flow delivered no packets
    pub mean_delay_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub five_tuple: Option<FiveTuple>,
}

/// Network-wide summary of a run.
///
/// Optional metrics are `None` ("no data") when they are undefined, which is
/// distinct from a measured zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    pub flow_count: usize,
    pub total_throughput_mbps: Option<f64>,
    pub total_packets_sent: u64,
    pub total_packets_received: u64,
    pub delivery_ratio_percent: Option<f64>,
    pub mean_delay_ms: Option<f64>,
    pub flows_with_deliveries: usize,
}

impl AggregateReport {
    /// Report for a run that recorded no flows at all
    pub fn no_data() -> Self {
        Self {
            flow_count: 0,
            total_throughput_mbps: None,
            total_packets_sent: 0,
            total_packets_received: 0,
            delivery_ratio_percent: None,
            mean_delay_ms: None,
            flows_with_deliveries: 0,
        }
    }

    pub fn has_data(&self) -> bool {
        self.flow_count > 0
    }
}

/// Metadata about the analysis
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisMetadata {
    pub analysis_timestamp: String,
    pub flow_file: String,
    pub simulation_duration_secs: f64,
}

/// Everything written by the flow report tool
#[derive(Debug, Clone, Serialize)]
pub struct FlowAnalysisReport {
    pub metadata: AnalysisMetadata,
    pub aggregate: AggregateReport,
    pub flows: Vec<FlowSummary>,
}
