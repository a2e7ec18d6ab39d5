//! IP address allocation and management module.
//!
//! This module hands every tier of the topology a disjoint address block and
//! numbers the interfaces attached to it.

pub mod block;
pub mod registry;
pub mod allocator;

// Re-export commonly used types
pub use block::{AddressBlock, AddressPlan, TierPlan};
pub use registry::{AddressAllocation, InterfaceAddress};
pub use allocator::allocate_addresses;
