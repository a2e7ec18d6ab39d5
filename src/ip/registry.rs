//! Address registry.
//!
//! This file holds the result of an allocation run: every block handed out
//! and every interface address numbered inside those blocks, with the lookups
//! traffic generators and exporters need.

use serde::Serialize;
use std::net::Ipv4Addr;

use crate::topology::{NodeId, Tier};
use super::block::AddressBlock;

/// One numbered interface of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InterfaceAddress {
    pub node: NodeId,
    pub tier: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<usize>,
    pub address: Ipv4Addr,
    pub prefix_len: u8,
}

/// Blocks and interface addresses of one topology
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AddressAllocation {
    blocks: Vec<AddressBlock>,
    interfaces: Vec<InterfaceAddress>,
}

impl AddressAllocation {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_block(&mut self, block: AddressBlock) {
        self.blocks.push(block);
    }

    pub(crate) fn push_interface(&mut self, iface: InterfaceAddress) {
        self.interfaces.push(iface);
    }

    /// Blocks in allocation order (core, access per site, local per site)
    pub fn blocks(&self) -> &[AddressBlock] {
        &self.blocks
    }

    pub fn blocks_for_tier(&self, tier: Tier) -> impl Iterator<Item = &AddressBlock> {
        self.blocks.iter().filter(move |b| b.tier == tier)
    }

    pub fn block(&self, tier: Tier, site: Option<usize>) -> Option<&AddressBlock> {
        self.blocks.iter().find(|b| b.tier == tier && b.site == site)
    }

    pub fn interfaces(&self) -> &[InterfaceAddress] {
        &self.interfaces
    }

    pub fn interfaces_of(&self, node: NodeId) -> impl Iterator<Item = &InterfaceAddress> {
        self.interfaces.iter().filter(move |i| i.node == node)
    }

    /// Address of `node` on `tier`, if it has an interface there
    pub fn address_of(&self, node: NodeId, tier: Tier) -> Option<Ipv4Addr> {
        self.interfaces_of(node)
            .find(|i| i.tier == tier)
            .map(|i| i.address)
    }

    /// Node owning `addr`, if any
    pub fn node_for_address(&self, addr: Ipv4Addr) -> Option<NodeId> {
        self.interfaces.iter().find(|i| i.address == addr).map(|i| i.node)
    }

    /// First pair of overlapping blocks, if the allocation is not disjoint
    pub fn find_overlap(&self) -> Option<(&AddressBlock, &AddressBlock)> {
        let mut sorted: Vec<&AddressBlock> = self.blocks.iter().collect();
        sorted.sort_by_key(|b| (b.first(), b.last()));
        sorted
            .windows(2)
            .find(|w| w[0].overlaps(w[1]))
            .map(|w| (w[0], w[1]))
    }

    pub fn is_disjoint(&self) -> bool {
        self.find_overlap().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(tier: Tier, site: Option<usize>, a: [u8; 4], prefix_len: u8) -> AddressBlock {
        AddressBlock { tier, site, base: Ipv4Addr::from(a), prefix_len }
    }

    #[test]
    fn test_lookups() {
        let mut alloc = AddressAllocation::new();
        alloc.push_block(block(Tier::Core, None, [10, 0, 0, 0], 30));
        alloc.push_interface(InterfaceAddress {
            node: NodeId(1),
            tier: Tier::Core,
            site: None,
            address: Ipv4Addr::new(10, 0, 0, 1),
            prefix_len: 30,
        });
        alloc.push_interface(InterfaceAddress {
            node: NodeId(0),
            tier: Tier::Core,
            site: None,
            address: Ipv4Addr::new(10, 0, 0, 2),
            prefix_len: 30,
        });

        assert_eq!(alloc.address_of(NodeId(1), Tier::Core), Some(Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(alloc.address_of(NodeId(1), Tier::Access), None);
        assert_eq!(alloc.node_for_address(Ipv4Addr::new(10, 0, 0, 2)), Some(NodeId(0)));
        assert!(alloc.block(Tier::Core, None).is_some());
        assert!(alloc.block(Tier::Access, Some(0)).is_none());
    }

    #[test]
    fn test_overlap_detection() {
        let mut alloc = AddressAllocation::new();
        alloc.push_block(block(Tier::Local, Some(0), [192, 168, 0, 0], 24));
        alloc.push_block(block(Tier::Access, Some(0), [10, 1, 0, 0], 30));
        assert!(alloc.is_disjoint());

        alloc.push_block(block(Tier::Local, Some(1), [192, 168, 0, 128], 25));
        let (a, b) = alloc.find_overlap().unwrap();
        assert_eq!(a.site, Some(0));
        assert_eq!(b.site, Some(1));
    }
}
