//! Loading flow records exported by the simulation engine.
//!
//! The engine writes its flow monitor counters as JSON, either wrapped as
//! `{ "flows": [...] }` or as a bare array of records.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use color_eyre::eyre::{Context, Result};
use serde::Deserialize;

use super::types::FlowRecord;

#[derive(Deserialize)]
#[serde(untagged)]
enum FlowFile {
    Wrapped { flows: Vec<FlowRecord> },
    Bare(Vec<FlowRecord>),
}

/// Parse flow records from a JSON string
pub fn parse_flow_records(json: &str) -> Result<Vec<FlowRecord>> {
    let file: FlowFile = serde_json::from_str(json).context("Failed to parse flow records")?;
    Ok(file.into_records())
}

/// Load flow records from a JSON file
pub fn load_flow_records(path: &Path) -> Result<Vec<FlowRecord>> {
    log::info!("Loading flow records from {}", path.display());

    let file = File::open(path)
        .with_context(|| format!("Failed to open flow file {}", path.display()))?;
    let parsed: FlowFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse flow file {}", path.display()))?;

    let records = parsed.into_records();
    log::info!("Loaded {} flow records", records.len());
    Ok(records)
}

impl FlowFile {
    fn into_records(self) -> Vec<FlowRecord> {
        match self {
            FlowFile::Wrapped { flows } => flows,
            FlowFile::Bare(flows) => flows,
        }
    }
}
