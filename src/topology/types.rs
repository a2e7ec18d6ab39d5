//! Topology type definitions.
//!
//! This file contains the node, link and LAN segment types that make up the
//! three-tier access hierarchy (server, hub, sites, devices).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::catalog::TechnologyProfile;

/// Dense node identifier, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Role a node plays in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeRole {
    /// Cloud server every site talks to
    CentralServer,
    /// WAN hub joining all access links
    CoreRouter,
    /// Edge router of one site
    SiteRouter,
    /// End-user device on a site LAN
    Device,
}

/// Addressing and link-profile scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Server to hub
    Core,
    /// Hub to site
    Access,
    /// Site to devices
    Local,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Core => write!(f, "Core"),
            Tier::Access => write!(f, "Access"),
            Tier::Local => write!(f, "Local"),
        }
    }
}

/// A node of the topology. Identity never changes after the build phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub role: NodeRole,
    /// Owning site for site routers and devices
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<usize>,
    /// Index of a device within its site
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_index: Option<usize>,
}

/// Point-to-point link between two nodes of the topology.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub a: NodeId,
    pub b: NodeId,
    pub tier: Tier,
    /// Site served by an access link, `None` on the core link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<usize>,
    pub profile: TechnologyProfile,
}

/// Shared broadcast domain of one site: the site router plus every device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanSegment {
    pub site: usize,
    /// Attachment order; the site router always comes first
    pub members: Vec<NodeId>,
    pub profile: TechnologyProfile,
}

impl LanSegment {
    pub fn router(&self) -> NodeId {
        self.members[0]
    }

    pub fn devices(&self) -> &[NodeId] {
        &self.members[1..]
    }
}

/// The complete, read-only hierarchy produced by the builder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Topology {
    pub(crate) nodes: Vec<Node>,
    pub(crate) core_link: Link,
    pub(crate) access_links: Vec<Link>,
    pub(crate) lan_segments: Vec<LanSegment>,
    pub(crate) site_names: Vec<String>,
    pub(crate) site_routers: Vec<NodeId>,
    pub(crate) core_router: NodeId,
    pub(crate) central_server: NodeId,
    pub(crate) devices_per_site: usize,
}

impl Topology {
    pub fn site_count(&self) -> usize {
        self.site_routers.len()
    }

    pub fn devices_per_site(&self) -> usize {
        self.devices_per_site
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn nodes_with_role(&self, role: NodeRole) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.role == role)
    }

    pub fn central_server(&self) -> NodeId {
        self.central_server
    }

    pub fn core_router(&self) -> NodeId {
        self.core_router
    }

    pub fn site_router(&self, site: usize) -> Option<NodeId> {
        self.site_routers.get(site).copied()
    }

    pub fn site_devices(&self, site: usize) -> &[NodeId] {
        self.lan_segments
            .get(site)
            .map(LanSegment::devices)
            .unwrap_or(&[])
    }

    pub fn core_link(&self) -> &Link {
        &self.core_link
    }

    pub fn access_links(&self) -> &[Link] {
        &self.access_links
    }

    pub fn access_link(&self, site: usize) -> Option<&Link> {
        self.access_links.get(site)
    }

    pub fn lan_segments(&self) -> &[LanSegment] {
        &self.lan_segments
    }

    pub fn lan_segment(&self, site: usize) -> Option<&LanSegment> {
        self.lan_segments.get(site)
    }

    /// Display name of a site
    pub fn site_name(&self, site: usize) -> Option<&str> {
        self.site_names.get(site).map(String::as_str)
    }
}
