//! Address blocks and per-tier numbering plans.
//!
//! A tier draws its blocks from one pool. Index `k` of a tier owns the
//! stride-sized slice `pool_base + k * stride` and takes a block of
//! `block_prefix` at the start of that slice, so blocks of one tier can never
//! overlap and a tier can never hand out more than `capacity()` blocks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

use crate::error::{Result, WansimError};
use crate::topology::Tier;

/// Smallest block that still has two usable host addresses
pub const MAX_BLOCK_PREFIX: u8 = 30;

/// A contiguous, aligned IPv4 range owned by one tier/site combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AddressBlock {
    pub tier: Tier,
    /// `None` for the core block
    pub site: Option<usize>,
    pub base: Ipv4Addr,
    pub prefix_len: u8,
}

impl AddressBlock {
    /// Number of addresses covered, network and broadcast included
    pub fn size(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix_len))
    }

    pub fn first(&self) -> u32 {
        u32::from(self.base)
    }

    pub fn last(&self) -> u32 {
        (u64::from(self.first()) + self.size() - 1) as u32
    }

    pub fn usable_hosts(&self) -> u64 {
        self.size().saturating_sub(2)
    }

    pub fn netmask(&self) -> Ipv4Addr {
        let bits = u32::MAX.checked_shl(32 - u32::from(self.prefix_len)).unwrap_or(0);
        Ipv4Addr::from(bits)
    }

    /// `n`-th usable host address, counting from 1
    pub fn host(&self, n: u64) -> Option<Ipv4Addr> {
        if n == 0 || n > self.usable_hosts() {
            return None;
        }
        Some(Ipv4Addr::from(self.first() + n as u32))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let a = u32::from(addr);
        a >= self.first() && a <= self.last()
    }

    pub fn overlaps(&self, other: &AddressBlock) -> bool {
        self.first() <= other.last() && other.first() <= self.last()
    }
}

impl fmt::Display for AddressBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix_len)
    }
}

/// Numbering plan of one tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPlan {
    pub pool_base: Ipv4Addr,
    pub pool_prefix: u8,
    pub stride_prefix: u8,
    pub block_prefix: u8,
}

impl TierPlan {
    pub const fn new(pool_base: Ipv4Addr, pool_prefix: u8, stride_prefix: u8, block_prefix: u8) -> Self {
        Self { pool_base, pool_prefix, stride_prefix, block_prefix }
    }

    /// Number of indices the pool can serve
    pub fn capacity(&self) -> u64 {
        1u64 << (self.stride_prefix - self.pool_prefix)
    }

    fn stride(&self) -> u64 {
        1u64 << (32 - u32::from(self.stride_prefix))
    }

    /// The whole pool as a block, for cross-tier checks
    pub fn pool(&self, tier: Tier) -> AddressBlock {
        AddressBlock {
            tier,
            site: None,
            base: self.pool_base,
            prefix_len: self.pool_prefix,
        }
    }

    /// Block for index `index` of `tier`, failing once the pool is used up
    pub fn block(&self, tier: Tier, site: Option<usize>, index: usize) -> Result<AddressBlock> {
        if index as u64 >= self.capacity() {
            return Err(WansimError::AddressSpaceExhausted { tier, index });
        }
        let offset = index as u64 * self.stride();
        Ok(AddressBlock {
            tier,
            site,
            base: Ipv4Addr::from(u32::from(self.pool_base) + offset as u32),
            prefix_len: self.block_prefix,
        })
    }

    pub fn validate(&self, tier: Tier) -> Result<()> {
        if self.block_prefix > MAX_BLOCK_PREFIX {
            return Err(WansimError::invalid(format!(
                "{} block prefix /{} leaves no usable host pair (max /{})",
                tier, self.block_prefix, MAX_BLOCK_PREFIX
            )));
        }
        if self.pool_prefix > self.stride_prefix || self.stride_prefix > self.block_prefix {
            return Err(WansimError::invalid(format!(
                "{} plan needs pool /{} <= stride /{} <= block /{}",
                tier, self.pool_prefix, self.stride_prefix, self.block_prefix
            )));
        }
        let pool = self.pool(tier);
        if u32::from(self.pool_base) & !u32::from(pool.netmask()) != 0 {
            return Err(WansimError::invalid(format!(
                "{} pool base {} is not aligned to /{}",
                tier, self.pool_base, self.pool_prefix
            )));
        }
        Ok(())
    }
}

/// Numbering plans for all three tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressPlan {
    pub core: TierPlan,
    pub access: TierPlan,
    pub local: TierPlan,
}

impl AddressPlan {
    pub fn tier(&self, tier: Tier) -> &TierPlan {
        match tier {
            Tier::Core => &self.core,
            Tier::Access => &self.access,
            Tier::Local => &self.local,
        }
    }

    /// Check each tier and that no two tier pools overlap
    pub fn validate(&self) -> Result<()> {
        let tiers = [Tier::Core, Tier::Access, Tier::Local];
        for tier in tiers {
            self.tier(tier).validate(tier)?;
        }
        for (i, a) in tiers.iter().enumerate() {
            for b in &tiers[i + 1..] {
                let pa = self.tier(*a).pool(*a);
                let pb = self.tier(*b).pool(*b);
                if pa.overlaps(&pb) {
                    return Err(WansimError::invalid(format!(
                        "{} pool {} overlaps {} pool {}",
                        a, pa, b, pb
                    )));
                }
            }
        }
        Ok(())
    }

    /// Check that `site_count` sites of `devices_per_site` devices fit the
    /// plan, failing with the tier and index the allocator would stop at
    pub fn check_capacity(&self, site_count: usize, devices_per_site: usize) -> Result<()> {
        let access = self.access.capacity();
        if site_count as u64 > access {
            return Err(WansimError::AddressSpaceExhausted { tier: Tier::Access, index: access as usize });
        }
        if site_count == 0 {
            return Ok(());
        }

        // router plus devices on every site LAN
        let lan = self.local.block(Tier::Local, Some(0), 0)?;
        if devices_per_site as u64 >= lan.usable_hosts() {
            return Err(WansimError::AddressSpaceExhausted { tier: Tier::Local, index: 0 });
        }
        let local = self.local.capacity();
        if site_count as u64 > local {
            return Err(WansimError::AddressSpaceExhausted { tier: Tier::Local, index: local as usize });
        }
        Ok(())
    }
}

impl Default for AddressPlan {
    /// Core `10.0.0.0/30`, access `10.1.<site>.0/30`, local `192.168.<site>.0/24`
    fn default() -> Self {
        Self {
            core: TierPlan::new(Ipv4Addr::new(10, 0, 0, 0), 30, 30, 30),
            access: TierPlan::new(Ipv4Addr::new(10, 1, 0, 0), 16, 24, 30),
            local: TierPlan::new(Ipv4Addr::new(192, 168, 0, 0), 16, 24, 24),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_geometry() {
        let block = AddressBlock {
            tier: Tier::Access,
            site: Some(3),
            base: Ipv4Addr::new(10, 1, 3, 0),
            prefix_len: 30,
        };
        assert_eq!(block.size(), 4);
        assert_eq!(block.usable_hosts(), 2);
        assert_eq!(block.netmask(), Ipv4Addr::new(255, 255, 255, 252));
        assert_eq!(block.host(1), Some(Ipv4Addr::new(10, 1, 3, 1)));
        assert_eq!(block.host(2), Some(Ipv4Addr::new(10, 1, 3, 2)));
        assert_eq!(block.host(3), None);
        assert_eq!(block.host(0), None);
        assert!(block.contains(Ipv4Addr::new(10, 1, 3, 3)));
        assert!(!block.contains(Ipv4Addr::new(10, 1, 3, 4)));
        assert_eq!(block.to_string(), "10.1.3.0/30");
    }

    #[test]
    fn test_overlap() {
        let wide = AddressBlock { tier: Tier::Local, site: None, base: Ipv4Addr::new(192, 168, 0, 0), prefix_len: 16 };
        let inner = AddressBlock { tier: Tier::Local, site: Some(7), base: Ipv4Addr::new(192, 168, 7, 0), prefix_len: 24 };
        let outside = AddressBlock { tier: Tier::Core, site: None, base: Ipv4Addr::new(10, 0, 0, 0), prefix_len: 30 };
        assert!(wide.overlaps(&inner));
        assert!(inner.overlaps(&wide));
        assert!(!wide.overlaps(&outside));
    }

    #[test]
    fn test_default_plan_numbering() {
        let plan = AddressPlan::default();
        assert!(plan.validate().is_ok());
        assert_eq!(plan.access.capacity(), 256);
        assert_eq!(plan.local.capacity(), 256);
        assert_eq!(plan.core.capacity(), 1);

        let access = plan.access.block(Tier::Access, Some(4), 4).unwrap();
        assert_eq!(access.to_string(), "10.1.4.0/30");
        let local = plan.local.block(Tier::Local, Some(255), 255).unwrap();
        assert_eq!(local.to_string(), "192.168.255.0/24");
    }

    #[test]
    fn test_exhaustion() {
        let plan = AddressPlan::default();
        assert_eq!(
            plan.local.block(Tier::Local, Some(256), 256),
            Err(WansimError::AddressSpaceExhausted { tier: Tier::Local, index: 256 })
        );
        assert_eq!(
            plan.core.block(Tier::Core, None, 1),
            Err(WansimError::AddressSpaceExhausted { tier: Tier::Core, index: 1 })
        );
    }

    #[test]
    fn test_capacity_check() {
        let plan = AddressPlan::default();
        assert_eq!(plan.check_capacity(0, usize::MAX), Ok(()));
        assert_eq!(plan.check_capacity(256, 253), Ok(()));
        assert_eq!(
            plan.check_capacity(257, 1),
            Err(WansimError::AddressSpaceExhausted { tier: Tier::Access, index: 256 })
        );
        assert_eq!(
            plan.check_capacity(1 << 34, 1 << 10),
            Err(WansimError::AddressSpaceExhausted { tier: Tier::Access, index: 256 })
        );
        assert_eq!(
            plan.check_capacity(3, 254),
            Err(WansimError::AddressSpaceExhausted { tier: Tier::Local, index: 0 })
        );
        assert_eq!(
            plan.check_capacity(3, 1 << 40),
            Err(WansimError::AddressSpaceExhausted { tier: Tier::Local, index: 0 })
        );

        // more access than local blocks
        let mut narrow = plan;
        narrow.local = TierPlan::new(Ipv4Addr::new(192, 168, 0, 0), 20, 24, 24);
        assert_eq!(
            narrow.check_capacity(17, 10),
            Err(WansimError::AddressSpaceExhausted { tier: Tier::Local, index: 16 })
        );
    }

    #[test]
    fn test_invalid_plans() {
        let mut plan = AddressPlan::default();
        plan.access = TierPlan::new(Ipv4Addr::new(10, 0, 0, 0), 16, 24, 30);
        assert!(plan.validate().is_err(), "access pool covers the core block");

        let mut plan = AddressPlan::default();
        plan.local = TierPlan::new(Ipv4Addr::new(192, 168, 0, 0), 16, 24, 20);
        assert!(plan.validate().is_err(), "block wider than its stride");

        let mut plan = AddressPlan::default();
        plan.local = TierPlan::new(Ipv4Addr::new(192, 168, 1, 0), 16, 24, 24);
        assert!(plan.validate().is_err(), "unaligned pool");

        let mut plan = AddressPlan::default();
        plan.core = TierPlan::new(Ipv4Addr::new(10, 0, 0, 0), 31, 31, 31);
        assert!(plan.validate().is_err(), "/31 has no usable pair");
    }
}
