//! Error types shared by the synthesis and aggregation phases.

use crate::topology::Tier;

/// Errors raised while building, addressing or evaluating a scenario.
///
/// Each failure aborts the phase that raised it; nothing in the crate
/// retries or masks these.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WansimError {
    /// Negative or nonsensical input, rejected before anything is allocated
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A tier counter would leave the addressable range of its pool
    #[error("Address space exhausted for {tier} tier at index {index}")]
    AddressSpaceExhausted { tier: Tier, index: usize },
}

impl WansimError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        WansimError::InvalidConfiguration(msg.into())
    }
}

pub type Result<T, E = WansimError> = std::result::Result<T, E>;
