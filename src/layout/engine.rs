//! Visualization layout.
//!
//! The server sits at a fixed anchor with the hub below it. Site routers are
//! spread evenly on a circle around the hub and each site's devices are packed
//! on concentric rings around their router. Every coordinate is a pure
//! function of the node's indices and the topology counts.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::topology::{NodeRole, Topology};
use super::types::{Layout, NodeAnnotation, Position, Rgb, RingSlot};

/// Geometry constants of the layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutParams {
    pub server_anchor: (f64, f64),
    pub core_router_offset: (f64, f64),
    pub site_radius: f64,
    /// Devices per ring (`R`)
    pub ring_capacity: usize,
    pub ring_base_radius: f64,
    pub ring_radius_step: f64,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            server_anchor: (50.0, 50.0),
            core_router_offset: (0.0, -20.0),
            site_radius: 20.0,
            ring_capacity: 20,
            ring_base_radius: 5.0,
            ring_radius_step: 3.0,
        }
    }
}

impl LayoutParams {
    pub fn server_position(&self) -> Position {
        Position::new(self.server_anchor.0, self.server_anchor.1)
    }

    pub fn core_router_position(&self) -> Position {
        Position::new(
            self.server_anchor.0 + self.core_router_offset.0,
            self.server_anchor.1 + self.core_router_offset.1,
        )
    }

    /// Ring and slot of device `device_index`
    pub fn ring_slot(&self, device_index: usize) -> RingSlot {
        let capacity = self.ring_capacity.max(1);
        RingSlot {
            ring: device_index / capacity,
            slot: device_index % capacity,
        }
    }

    /// Radius of the outermost device ring, if the site has devices
    pub fn outer_ring_radius(&self, devices_per_site: usize) -> Option<f64> {
        let last = devices_per_site.checked_sub(1)?;
        Some(self.ring_base_radius + self.ring_slot(last).ring as f64 * self.ring_radius_step)
    }

    /// Router of site `site` out of `site_count`, at angle `2*pi*site/site_count`
    pub fn site_router_position(&self, site: usize, site_count: usize) -> Position {
        let center = self.core_router_position();
        let angle = 2.0 * PI * site as f64 / site_count.max(1) as f64;
        Position::new(
            center.x + self.site_radius * angle.cos(),
            center.y + self.site_radius * angle.sin(),
        )
    }

    /// Device `device_index` of site `site`
    pub fn device_position(&self, site: usize, site_count: usize, device_index: usize) -> Position {
        let router = self.site_router_position(site, site_count);
        let RingSlot { ring, slot } = self.ring_slot(device_index);
        let radius = self.ring_base_radius + ring as f64 * self.ring_radius_step;
        let angle = 2.0 * PI * slot as f64 / self.ring_capacity.max(1) as f64;
        Position::new(router.x + radius * angle.cos(), router.y + radius * angle.sin())
    }
}

/// Compute positions and annotations for every node of `topology`
pub fn compute_layout(topology: &Topology, params: &LayoutParams) -> Layout {
    if params.ring_capacity == 0 {
        warn!("ring_capacity of 0 treated as 1");
    }

    let site_count = topology.site_count();
    let mut layout = Layout::default();

    if let Some(outer) = params.outer_ring_radius(topology.devices_per_site()) {
        if site_count >= 2 {
            // chord between neighbouring routers on the site circle
            let spacing = 2.0 * params.site_radius * (PI / site_count as f64).sin();
            if 2.0 * outer > spacing {
                warn!(
                    "Device rings (radius {:.1}) overlap between neighbouring sites (spacing {:.1})",
                    outer, spacing
                );
            }
        }
    }

    for node in topology.nodes() {
        let position = match (node.role, node.site, node.device_index) {
            (NodeRole::CentralServer, _, _) => params.server_position(),
            (NodeRole::CoreRouter, _, _) => params.core_router_position(),
            (NodeRole::SiteRouter, Some(site), _) => params.site_router_position(site, site_count),
            (NodeRole::Device, Some(site), Some(j)) => params.device_position(site, site_count, j),
            _ => continue,
        };
        layout.positions.insert(node.id, position);
    }

    layout.annotations.insert(
        topology.central_server(),
        NodeAnnotation { description: "Cloud Server".to_string(), color: Some(Rgb(0, 0, 255)) },
    );
    layout.annotations.insert(
        topology.core_router(),
        NodeAnnotation { description: "WAN Router".to_string(), color: Some(Rgb(255, 165, 0)) },
    );
    for link in topology.access_links() {
        let Some(site) = link.site else { continue };
        let name = topology.site_name(site).unwrap_or_default();
        layout.annotations.insert(
            link.b,
            NodeAnnotation {
                description: format!("{} ({})", name, link.profile.label),
                color: Some(Rgb(0, 255, 0)),
            },
        );
    }

    debug!("Layout placed {} nodes", layout.positions.len());
    layout
}
