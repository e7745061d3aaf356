// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Address, Allocation, Ipv4Error, Pool, Subnet, ToAddress};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/**
A [Pool] behind one exclusive lock, for sharing between threads.

Every operation holds the lock for its whole duration, so a scan never
observes a half-applied batch. Clones share the same underlying pool.
*/
#[derive(Clone, Debug)]
pub struct SharedPool {
    inner: Arc<Mutex<Pool>>,
}

impl SharedPool {
    pub fn new(pool: Pool) -> Self {
        Self {
            inner: Arc::new(Mutex::new(pool)),
        }
    }

    pub fn subnet(&self) -> Subnet {
        self.inner.lock().subnet()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn is_allocated(&self, addr: impl ToAddress) -> Result<bool, Ipv4Error> {
        self.inner.lock().is_allocated(addr)
    }

    pub fn is_available(&self, addr: impl ToAddress) -> Result<bool, Ipv4Error> {
        self.inner.lock().is_available(addr)
    }

    pub fn allocate(&self, addr: impl ToAddress) -> Result<(), Ipv4Error> {
        self.inner.lock().allocate(addr)?;
        Ok(())
    }

    pub fn allocate_all<I>(&self, addrs: I) -> Result<(), Ipv4Error>
    where
        I: IntoIterator,
        I::Item: ToAddress,
    {
        self.inner.lock().allocate_all(addrs)?;
        Ok(())
    }

    pub fn allocate_batch(&self, batch: &Allocation) -> Result<(), Ipv4Error> {
        self.inner.lock().allocate_batch(batch)?;
        Ok(())
    }

    pub fn first_available(&self) -> Option<Address> {
        self.inner.lock().first_available()
    }

    pub fn last_available(&self) -> Option<Address> {
        self.inner.lock().last_available()
    }

    /// Find the first available address and allocate it under the same lock.
    pub fn claim_first_available(&self) -> Option<Address> {
        let mut pool = self.inner.lock();
        let addr: Address = pool.first_available()?;
        pool.allocate(addr).ok()?;
        debug!(%addr, "claimed first available address");
        Some(addr)
    }

    /// A copy of the pool's current state.
    pub fn snapshot(&self) -> Pool {
        self.inner.lock().clone()
    }
}

impl From<Pool> for SharedPool {
    fn from(pool: Pool) -> Self {
        Self::new(pool)
    }
}

/* -------------------------------------------------------------------------- */
