// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Address, Ipv4Error, Subnet, ToAddress};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

/**
One element of an allocation request read from external input: either a
single address or a flat list of addresses.

Deserializes from a string/integer or from a sequence of those. Nested
sequences deserialize fine but are refused by [Pool::allocate_batch].
*/
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Allocation {
    One(Address),
    Many(Vec<Allocation>),
}

impl Allocation {
    /// The addresses of a single address or a flat list, in order.
    fn flatten(&self) -> Result<Vec<Address>, Ipv4Error> {
        match self {
            Allocation::One(addr) => Ok(vec![*addr]),
            Allocation::Many(items) => items
                .iter()
                .map(|item| match item {
                    Allocation::One(addr) => Ok(*addr),
                    Allocation::Many(_) => Err(Ipv4Error::UnsupportedNestedInput),
                })
                .collect(),
        }
    }
}

impl From<Address> for Allocation {
    fn from(addr: Address) -> Self {
        Allocation::One(addr)
    }
}

impl From<Vec<Address>> for Allocation {
    fn from(addrs: Vec<Address>) -> Self {
        Allocation::Many(addrs.into_iter().map(Allocation::One).collect())
    }
}

/* ---------------------------------- */

/**
Allocation state over the usable host addresses of one [Subnet].

Starts empty and only grows. Lookups reject addresses outside the usable
host range, but [Pool::allocate] records whatever it is given (an address
outside the range is logged as a warning and still recorded).

Not synchronized; see [super::SharedPool] for a locked wrapper.
*/
#[derive(Clone, Debug)]
pub struct Pool {
    subnet: Subnet,
    allocated: BTreeSet<Address>,
}

impl Pool {
    pub fn new(subnet: Subnet) -> Self {
        Self {
            subnet,
            allocated: BTreeSet::new(),
        }
    }

    #[inline]
    pub fn subnet(&self) -> Subnet {
        self.subnet
    }

    /// Number of allocated addresses.
    pub fn len(&self) -> usize {
        self.allocated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocated.is_empty()
    }

    /// Allocated addresses in ascending order.
    pub fn allocated(&self) -> impl Iterator<Item = Address> + '_ {
        self.allocated.iter().copied()
    }

    /// Usable host addresses not yet allocated, in ascending order.
    pub fn available(&self) -> impl Iterator<Item = Address> + '_ {
        self.subnet
            .hosts()
            .filter(move |addr| !self.allocated.contains(addr))
    }

    /**
    Whether an address has been allocated.

    ### Errors
    [Ipv4Error::AddressOutsideSubnet] if the address is not usable host
    space of the subnet. This includes the network and broadcast addresses.
    */
    pub fn is_allocated(&self, addr: impl ToAddress) -> Result<bool, Ipv4Error> {
        let addr: Address = addr.to_address()?;
        if !self.subnet.is_host(addr) {
            return Err(Ipv4Error::AddressOutsideSubnet {
                addr,
                subnet: self.subnet,
            });
        }
        Ok(self.allocated.contains(&addr))
    }

    /// Whether an address is usable host space and not allocated. Reserved
    /// and out-of-subnet addresses are simply not available.
    pub fn is_available(&self, addr: impl ToAddress) -> Result<bool, Ipv4Error> {
        let addr: Address = addr.to_address()?;
        Ok(self.subnet.is_host(addr) && !self.allocated.contains(&addr))
    }

    /// Allocate a single address. Already allocated is a no-op.
    pub fn allocate(&mut self, addr: impl ToAddress) -> Result<&mut Self, Ipv4Error> {
        let addr: Address = addr.to_address()?;
        self.commit(addr);
        Ok(self)
    }

    /**
    Allocate a flat sequence of addresses.

    Every element is normalized before anything is recorded, so a bad
    element leaves the pool untouched.
    */
    pub fn allocate_all<I>(&mut self, addrs: I) -> Result<&mut Self, Ipv4Error>
    where
        I: IntoIterator,
        I::Item: ToAddress,
    {
        let addrs: Vec<Address> = addrs
            .into_iter()
            .map(|a| a.to_address())
            .collect::<Result<Vec<Address>, Ipv4Error>>()?;
        for addr in addrs {
            self.commit(addr);
        }
        Ok(self)
    }

    /// Allocate a single address or a flat list of them. A nested list fails
    /// with [Ipv4Error::UnsupportedNestedInput] and nothing is recorded.
    pub fn allocate_batch(&mut self, batch: &Allocation) -> Result<&mut Self, Ipv4Error> {
        let addrs: Vec<Address> = batch.flatten()?;
        for addr in addrs {
            self.commit(addr);
        }
        Ok(self)
    }

    fn commit(&mut self, addr: Address) {
        if !self.subnet.is_host(addr) {
            warn!(%addr, subnet = %self.subnet, "allocating address outside usable host range");
        }
        if self.allocated.insert(addr) {
            debug!(%addr, subnet = %self.subnet, "address allocated");
        } else {
            trace!(%addr, subnet = %self.subnet, "address already allocated");
        }
    }

    /// Lowest usable host address that is not allocated, if any.
    pub fn first_available(&self) -> Option<Address> {
        self.scan(self.subnet.network().next().ok(), Address::next)
    }

    /// Highest usable host address that is not allocated, if any.
    pub fn last_available(&self) -> Option<Address> {
        self.scan(self.subnet.broadcast().previous().ok(), Address::previous)
    }

    /**
    Walk from `start` using `step` until a usable, unallocated address turns
    up. Stops with `None` as soon as the candidate leaves the usable host
    range, or if stepping runs off either end of the address space.
    */
    fn scan<F>(&self, start: Option<Address>, step: F) -> Option<Address>
    where
        F: Fn(&Address) -> Result<Address, Ipv4Error>,
    {
        let mut candidate: Option<Address> = start;
        while let Some(addr) = candidate {
            if !self.subnet.is_host(addr) {
                break;
            }
            if !self.allocated.contains(&addr) {
                return Some(addr);
            }
            candidate = step(&addr).ok();
        }
        debug!(subnet = %self.subnet, allocated = self.allocated.len(), "no address available");
        None
    }
}

/* -------------------------------------------------------------------------- */
