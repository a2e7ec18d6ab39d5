//! Bandwidth and delay unit strings.
//!
//! Link profiles in scenario files are written the way simulator attribute
//! values are written, e.g. `"1Gbps"`, `"100Mbps"`, `"5ms"`, `"6560ns"`.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{Result, WansimError};

/// Compiled unit patterns
pub struct UnitPatterns {
    /// Match: "100Mbps", "1.5 Gbps", "9600bps"
    pub bandwidth: Regex,
    /// Match: "20ms", "6560ns", "1.5s"
    pub delay: Regex,
}

impl UnitPatterns {
    pub fn new() -> Self {
        Self {
            bandwidth: Regex::new(
                r"^\s*(\d+(?:\.\d+)?)\s*(bps|[KkMmGg]bps)\s*$"
            ).expect("Invalid bandwidth regex"),
            delay: Regex::new(
                r"^\s*(\d+(?:\.\d+)?)\s*(ns|us|ms|s)\s*$"
            ).expect("Invalid delay regex"),
        }
    }
}

pub static PATTERNS: LazyLock<UnitPatterns> = LazyLock::new(UnitPatterns::new);

/// Parse a data rate such as `"100Mbps"` into bits per second
///
/// # Examples
/// ```
/// use wansim::utils::units::parse_bandwidth_bps;
///
/// assert_eq!(parse_bandwidth_bps("1Gbps"), Ok(1_000_000_000));
/// assert_eq!(parse_bandwidth_bps("2.5Mbps"), Ok(2_500_000));
/// assert!(parse_bandwidth_bps("fast").is_err());
/// ```
pub fn parse_bandwidth_bps(value: &str) -> Result<u64> {
    let caps = PATTERNS
        .bandwidth
        .captures(value)
        .ok_or_else(|| WansimError::invalid(format!("Invalid bandwidth format: {}", value)))?;
    let amount: f64 = caps[1]
        .parse()
        .map_err(|_| WansimError::invalid(format!("Invalid bandwidth number: {}", value)))?;
    let scale = match caps[2].to_ascii_lowercase().as_str() {
        "bps" => 1.0,
        "kbps" => 1e3,
        "mbps" => 1e6,
        _ => 1e9,
    };
    let bps = (amount * scale).round();
    if bps < 1.0 || bps > u64::MAX as f64 {
        return Err(WansimError::invalid(format!("Bandwidth out of range: {}", value)));
    }
    Ok(bps as u64)
}

/// Parse a propagation delay such as `"20ms"`
pub fn parse_delay(value: &str) -> Result<Duration> {
    let caps = PATTERNS
        .delay
        .captures(value)
        .ok_or_else(|| WansimError::invalid(format!("Invalid delay format: {}", value)))?;
    let amount: f64 = caps[1]
        .parse()
        .map_err(|_| WansimError::invalid(format!("Invalid delay number: {}", value)))?;
    let nanos_per_unit = match &caps[2] {
        "ns" => 1.0,
        "us" => 1e3,
        "ms" => 1e6,
        _ => 1e9,
    };
    Ok(Duration::from_nanos((amount * nanos_per_unit).round() as u64))
}
