//! Network topology module.
//!
//! This module builds the server, hub, site and device hierarchy and holds
//! the catalog of access technologies the sites are mapped onto.

pub mod types;
pub mod catalog;
pub mod builder;

// Re-export key types and functions for easier access
pub use types::{LanSegment, Link, Node, NodeId, NodeRole, Tier, Topology};
pub use catalog::{TechnologyCatalog, TechnologyProfile};
pub use builder::{build_topology, checked_count};
