//! IP address allocation logic.
//!
//! This file walks the topology tier by tier (core, then access per site, then
//! local per site) and numbers every interface inside a fresh block. The walk
//! is a pure function of the topology and the plan.

use log::{debug, info};

use crate::error::{Result, WansimError};
use crate::topology::{NodeId, Tier, Topology};
use super::block::{AddressBlock, AddressPlan};
use super::registry::{AddressAllocation, InterfaceAddress};

/// Number `members` from the first usable host of `block`, in order
fn assign_hosts(
    alloc: &mut AddressAllocation,
    block: AddressBlock,
    members: &[NodeId],
    index: usize,
) -> Result<()> {
    if members.len() as u64 > block.usable_hosts() {
        return Err(WansimError::AddressSpaceExhausted { tier: block.tier, index });
    }
    for (n, &node) in members.iter().enumerate() {
        let address = block
            .host(n as u64 + 1)
            .ok_or(WansimError::AddressSpaceExhausted { tier: block.tier, index })?;
        alloc.push_interface(InterfaceAddress {
            node,
            tier: block.tier,
            site: block.site,
            address,
            prefix_len: block.prefix_len,
        });
    }
    debug!("{} block {} -> {} interfaces", block.tier, block, members.len());
    alloc.push_block(block);
    Ok(())
}

/// Allocate disjoint blocks and interface addresses for `topology`.
///
/// # Errors
/// * `InvalidConfiguration` when the plan itself is inconsistent
/// * `AddressSpaceExhausted` when a site index exceeds its tier pool or a
///   block is too small for the interfaces attached to it
pub fn allocate_addresses(topology: &Topology, plan: &AddressPlan) -> Result<AddressAllocation> {
    plan.validate()?;

    let mut alloc = AddressAllocation::new();

    // Core: server first, then the hub
    let core = plan.core.block(Tier::Core, None, 0)?;
    assign_hosts(
        &mut alloc,
        core,
        &[topology.central_server(), topology.core_router()],
        0,
    )?;

    // Access: hub first, then the site router
    for (site, link) in topology.access_links().iter().enumerate() {
        let block = plan.access.block(Tier::Access, Some(site), site)?;
        assign_hosts(&mut alloc, block, &[link.a, link.b], site)?;
    }

    // Local: site router, then devices in index order
    for lan in topology.lan_segments() {
        let block = plan.local.block(Tier::Local, Some(lan.site), lan.site)?;
        assign_hosts(&mut alloc, block, &lan.members, lan.site)?;
    }

    info!(
        "Allocated {} address blocks, {} interfaces",
        alloc.blocks().len(),
        alloc.interfaces().len()
    );
    Ok(alloc)
}
