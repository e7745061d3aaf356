// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

pub(crate) static DOT: &str = ".";
pub(crate) static SLASH: &str = "/";

// mod.rs
pub(crate) static ERR_INVALID_ADDR: &str = "invalid IPv4 address";
pub(crate) static ERR_MASK_SIZE: &str = "expecting mask size between 0 and 32, got";
pub(crate) static ERR_SUBNET_FMT: &str = "invalid subnet format (expected <address>/<mask>)";
pub(crate) static ERR_MISALIGNED: &str = "invalid IPv4 subnet";
pub(crate) static ERR_SHOULD_BE: &str = "should be";
pub(crate) static ERR_OUTSIDE: &str = "address is not a usable host address of subnet";
pub(crate) static ERR_NON_CONTIGUOUS: &str = "mask is not a contiguous run of leading ones";
pub(crate) static ERR_NESTED: &str = "nested address sequences are not supported";
pub(crate) static ERR_EXHAUSTED: &str = "IPv4 address space exhausted at";

// address.rs, mask.rs
pub(crate) static EXPECT_ADDR: &str = "a dotted-decimal IPv4 address or a signed 32-bit integer";
pub(crate) static EXPECT_MASK: &str = "a dotted-decimal IPv4 mask or a prefix length";
pub(crate) static EXPECT_SUBNET: &str = "an IPv4 subnet string such as 192.168.0.0/24";
