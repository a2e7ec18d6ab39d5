//! Shared utilities: unit string parsing.

pub mod units;

pub use units::{parse_bandwidth_bps, parse_delay};
