//! Access technology catalog.
//!
//! Sites are mapped onto a finite, ordered list of last-mile technologies.
//! Site `i` always gets entry `i mod len`, so deployments larger than the
//! catalog reuse profiles cyclically.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, WansimError};
use crate::utils::units::{parse_bandwidth_bps, parse_delay};

/// Bandwidth, propagation delay and label of one transmission medium
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyProfile {
    pub label: String,
    pub bandwidth_bps: u64,
    #[serde(with = "humantime_serde")]
    pub delay: Duration,
}

impl TechnologyProfile {
    pub fn new(label: impl Into<String>, bandwidth_bps: u64, delay: Duration) -> Self {
        Self {
            label: label.into(),
            bandwidth_bps,
            delay,
        }
    }

    /// Build a profile from unit strings such as `"100Mbps"` and `"20ms"`
    pub fn parse(label: &str, bandwidth: &str, delay: &str) -> Result<Self> {
        Ok(Self::new(label, parse_bandwidth_bps(bandwidth)?, parse_delay(delay)?))
    }

    /// Server to hub backbone
    pub fn core_backbone() -> Self {
        Self::new("Backbone", 10_000_000_000, Duration::from_millis(2))
    }

    /// Shared site LAN
    pub fn site_lan() -> Self {
        Self::new("LAN", 100_000_000, Duration::from_nanos(6560))
    }

    pub fn bandwidth_mbps(&self) -> f64 {
        self.bandwidth_bps as f64 / 1e6
    }
}

/// Non-empty ordered sequence of access profiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TechnologyCatalog {
    profiles: Vec<TechnologyProfile>,
}

impl TechnologyCatalog {
    pub fn new(profiles: Vec<TechnologyProfile>) -> Result<Self> {
        if profiles.is_empty() {
            return Err(WansimError::invalid(
                "technology catalog must contain at least one profile",
            ));
        }
        Ok(Self { profiles })
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn profiles(&self) -> &[TechnologyProfile] {
        &self.profiles
    }

    /// Profile used by the access link of `site`. Total over all indices.
    pub fn profile_for_site(&self, site: usize) -> &TechnologyProfile {
        &self.profiles[site % self.profiles.len()]
    }
}

impl Default for TechnologyCatalog {
    fn default() -> Self {
        Self {
            profiles: vec![
                TechnologyProfile::new("Fibre Optique", 1_000_000_000, Duration::from_millis(5)),
                TechnologyProfile::new("4G/5G", 100_000_000, Duration::from_millis(20)),
                TechnologyProfile::new("Satellite", 50_000_000, Duration::from_millis(600)),
                TechnologyProfile::new("Liaison Radio", 200_000_000, Duration::from_millis(10)),
                TechnologyProfile::new("ADSL", 20_000_000, Duration::from_millis(30)),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_order() {
        let catalog = TechnologyCatalog::default();
        assert_eq!(catalog.len(), 5);
        let labels: Vec<&str> = catalog.profiles().iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, ["Fibre Optique", "4G/5G", "Satellite", "Liaison Radio", "ADSL"]);
        assert_eq!(catalog.profile_for_site(2).delay, Duration::from_millis(600));
    }

    #[test]
    fn test_cyclic_profile_selection() {
        let catalog = TechnologyCatalog::default();
        for site in 0..40 {
            assert_eq!(catalog.profile_for_site(site), catalog.profile_for_site(site + 5));
        }
        assert_eq!(catalog.profile_for_site(7).label, "Satellite");
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(matches!(
            TechnologyCatalog::new(Vec::new()),
            Err(WansimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_single_entry_catalog() {
        let catalog = TechnologyCatalog::new(vec![
            TechnologyProfile::parse("Copper", "8Mbps", "40ms").unwrap(),
        ])
        .unwrap();
        assert_eq!(catalog.profile_for_site(0), catalog.profile_for_site(123));
        assert_eq!(catalog.profile_for_site(3).bandwidth_bps, 8_000_000);
    }
}
