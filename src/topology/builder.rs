//! Topology construction.
//!
//! Builds the three-tier hierarchy leaf-first: devices, then site routers,
//! then the core router, then the central server. The core link joins server
//! and hub, one access link joins the hub to each site and every site gets a
//! single shared LAN segment.

use log::{debug, info};

use crate::error::{Result, WansimError};
use super::catalog::{TechnologyCatalog, TechnologyProfile};
use super::types::{LanSegment, Link, Node, NodeId, NodeRole, Tier, Topology};

/// Validate a signed count coming from configuration or the command line
pub fn checked_count(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| {
        WansimError::invalid(format!("{} must be non-negative, got {}", name, value))
    })
}

/// Site labels, applied cyclically over the site index
fn site_label(site_names: &[String], site: usize) -> String {
    if site_names.is_empty() {
        format!("Site {}", site)
    } else {
        site_names[site % site_names.len()].clone()
    }
}

/// Build the hierarchy for `site_count` sites with `devices_per_site` devices each.
///
/// Negative counts are rejected before any node is created. `site_count == 0`
/// is valid and yields only the central server, the core router and the link
/// between them.
///
/// # Arguments
/// * `site_count` - Number of access sites
/// * `devices_per_site` - Devices on each site LAN
/// * `catalog` - Access technologies, selected by `site mod catalog.len()`
/// * `site_names` - Optional display names, also applied cyclically
pub fn build_topology(
    site_count: i64,
    devices_per_site: i64,
    catalog: &TechnologyCatalog,
    site_names: &[String],
) -> Result<Topology> {
    let site_count = checked_count("site_count", site_count)?;
    let devices_per_site = checked_count("devices_per_site", devices_per_site)?;
    let total_nodes = site_count
        .checked_mul(devices_per_site)
        .and_then(|n| n.checked_add(site_count))
        .and_then(|n| n.checked_add(2))
        .ok_or_else(|| WansimError::invalid("node count overflows the identifier space"))?;

    info!(
        "Building topology: {} sites, {} devices per site ({} nodes)",
        site_count, devices_per_site, total_nodes
    );

    let mut nodes = Vec::with_capacity(total_nodes);
    let mut push = |role: NodeRole, site: Option<usize>, device_index: Option<usize>| {
        let id = NodeId(nodes.len());
        nodes.push(Node { id, role, site, device_index });
        id
    };

    let mut site_devices = Vec::with_capacity(site_count);
    for site in 0..site_count {
        let devices: Vec<NodeId> = (0..devices_per_site)
            .map(|j| push(NodeRole::Device, Some(site), Some(j)))
            .collect();
        site_devices.push(devices);
    }
    let site_routers: Vec<NodeId> = (0..site_count)
        .map(|site| push(NodeRole::SiteRouter, Some(site), None))
        .collect();
    let core_router = push(NodeRole::CoreRouter, None, None);
    let central_server = push(NodeRole::CentralServer, None, None);

    let core_link = Link {
        a: central_server,
        b: core_router,
        tier: Tier::Core,
        site: None,
        profile: TechnologyProfile::core_backbone(),
    };

    let access_links: Vec<Link> = site_routers
        .iter()
        .enumerate()
        .map(|(site, &router)| {
            let profile = catalog.profile_for_site(site).clone();
            debug!("Site {} access: {} ({} Mbps, {:?})",
                   site, profile.label, profile.bandwidth_mbps(), profile.delay);
            Link {
                a: core_router,
                b: router,
                tier: Tier::Access,
                site: Some(site),
                profile,
            }
        })
        .collect();

    let lan_segments: Vec<LanSegment> = site_routers
        .iter()
        .zip(site_devices)
        .enumerate()
        .map(|(site, (&router, devices))| {
            let mut members = Vec::with_capacity(devices.len() + 1);
            members.push(router);
            members.extend(devices);
            LanSegment {
                site,
                members,
                profile: TechnologyProfile::site_lan(),
            }
        })
        .collect();

    let site_names = (0..site_count).map(|s| site_label(site_names, s)).collect();

    Ok(Topology {
        nodes,
        core_link,
        access_links,
        lan_segments,
        site_names,
        site_routers,
        core_router,
        central_server,
        devices_per_site,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn build(sites: i64, devices: i64) -> Topology {
        build_topology(sites, devices, &TechnologyCatalog::default(), &[]).unwrap()
    }

    #[test]
    fn test_node_counts_and_roles() {
        let topo = build(5, 3);
        assert_eq!(topo.nodes().len(), 5 * 3 + 5 + 2);
        assert_eq!(topo.nodes_with_role(NodeRole::Device).count(), 15);
        assert_eq!(topo.nodes_with_role(NodeRole::SiteRouter).count(), 5);
        assert_eq!(topo.nodes_with_role(NodeRole::CoreRouter).count(), 1);
        assert_eq!(topo.nodes_with_role(NodeRole::CentralServer).count(), 1);
        assert_eq!(topo.access_links().len(), 5);
        assert_eq!(topo.lan_segments().len(), 5);
    }

    #[test]
    fn test_leaf_first_ordering() {
        let topo = build(2, 2);
        let roles: Vec<NodeRole> = topo.nodes().iter().map(|n| n.role).collect();
        assert_eq!(
            roles,
            vec![
                NodeRole::Device,
                NodeRole::Device,
                NodeRole::Device,
                NodeRole::Device,
                NodeRole::SiteRouter,
                NodeRole::SiteRouter,
                NodeRole::CoreRouter,
                NodeRole::CentralServer,
            ]
        );
        assert_eq!(topo.central_server(), NodeId(7));
        assert_eq!(topo.core_router(), NodeId(6));
        assert_eq!(topo.site_devices(1), &[NodeId(2), NodeId(3)]);
    }

    #[test]
    fn test_links_and_segments() {
        let topo = build(3, 4);
        let core = topo.core_link();
        assert_eq!((core.a, core.b), (topo.central_server(), topo.core_router()));
        assert_eq!(core.tier, Tier::Core);
        assert_eq!(core.profile.bandwidth_bps, 10_000_000_000);
        assert_eq!(core.profile.delay, Duration::from_millis(2));

        for site in 0..3 {
            let link = topo.access_link(site).unwrap();
            assert_eq!(link.tier, Tier::Access);
            assert_eq!(link.a, topo.core_router());
            assert_eq!(Some(link.b), topo.site_router(site));

            let lan = topo.lan_segment(site).unwrap();
            assert_eq!(Some(lan.router()), topo.site_router(site));
            assert_eq!(lan.devices().len(), 4);
            for id in lan.devices() {
                let node = topo.node(*id).unwrap();
                assert_eq!(node.site, Some(site));
                assert_eq!(node.role, NodeRole::Device);
            }
        }
    }

    #[test]
    fn test_access_profiles_cycle() {
        let topo = build(12, 0);
        for site in 0..7 {
            assert_eq!(
                topo.access_link(site).unwrap().profile,
                topo.access_link(site + 5).unwrap().profile
            );
        }
        assert_eq!(topo.access_link(0).unwrap().profile.label, "Fibre Optique");
        assert_eq!(topo.access_link(11).unwrap().profile.label, "4G/5G");
    }

    #[test]
    fn test_substitute_catalog() {
        let catalog = TechnologyCatalog::new(vec![
            TechnologyProfile::parse("A", "1Mbps", "1ms").unwrap(),
            TechnologyProfile::parse("B", "2Mbps", "2ms").unwrap(),
        ])
        .unwrap();
        let topo = build_topology(3, 1, &catalog, &[]).unwrap();
        let labels: Vec<&str> = topo.access_links().iter().map(|l| l.profile.label.as_str()).collect();
        assert_eq!(labels, ["A", "B", "A"]);
    }

    #[test]
    fn test_zero_sites_is_degenerate() {
        let topo = build(0, 10);
        assert_eq!(topo.nodes().len(), 2);
        assert_eq!(topo.site_count(), 0);
        assert!(topo.access_links().is_empty());
        assert!(topo.lan_segments().is_empty());
        assert_eq!(topo.core_link().tier, Tier::Core);
    }

    #[test]
    fn test_zero_devices() {
        let topo = build(2, 0);
        assert_eq!(topo.nodes().len(), 4);
        assert_eq!(topo.lan_segment(0).unwrap().members.len(), 1);
        assert!(topo.site_devices(0).is_empty());
    }

    #[test]
    fn test_negative_counts_rejected() {
        let catalog = TechnologyCatalog::default();
        assert!(matches!(
            build_topology(-1, 5, &catalog, &[]),
            Err(WansimError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            build_topology(5, -3, &catalog, &[]),
            Err(WansimError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_site_names_cycle() {
        let names = vec!["Essos".to_string(), "Mendong".to_string()];
        let topo = build_topology(3, 0, &TechnologyCatalog::default(), &names).unwrap();
        assert_eq!(topo.site_name(0), Some("Essos"));
        assert_eq!(topo.site_name(2), Some("Essos"));
        assert_eq!(topo.site_name(3), None);

        let topo = build(2, 0);
        assert_eq!(topo.site_name(1), Some("Site 1"));
    }
}
