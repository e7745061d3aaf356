// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

/*!
IPv4 address modeling: parsing and formatting addresses, subnet masks and
their prefix lengths, subnet boundaries, and allocation pools over the
usable host addresses of a subnet.

```
use ipv4alloc::{Address, Subnet};

let mut pool = Subnet::new("192.168.0.0", 29)?.to_pool();
pool.allocate_all(["192.168.0.1", "192.168.0.2", "192.168.0.4"])?;
assert_eq!(pool.first_available(), Some("192.168.0.3".parse::<Address>()?));
assert_eq!(pool.last_available(), Some("192.168.0.6".parse::<Address>()?));
# Ok::<(), ipv4alloc::Ipv4Error>(())
```
*/

mod ipv4;

pub use ipv4::*;
