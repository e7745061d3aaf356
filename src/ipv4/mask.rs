// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{strings::*, Address, Ipv4Error, ToAddress, ToMask, IPV4_BITS};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, net::Ipv4Addr, str::FromStr};

lazy_static! {
    static ref RE_SIZE: Regex = Regex::new(r"^[0-9]+$").unwrap();
}

/**
A subnet mask: ideally `N` leading one-bits followed by `32 - N` zero-bits.

Masks built from a prefix length always have that shape. Masks built from
an address or a dotted-decimal string take the bit pattern as given and
do not check that the ones are contiguous.
*/
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Mask(u32);

impl Mask {
    /// Mask with `size` leading one-bits. Fails with [Ipv4Error::InvalidMaskSize] if `size > 32`.
    pub fn new(size: u8) -> Result<Self, Ipv4Error> {
        Self::from_size(size as i64)
    }

    /// Like [Mask::new], but accepts any integer and range-checks it.
    pub fn from_size(size: i64) -> Result<Self, Ipv4Error> {
        if !(0..=IPV4_BITS as i64).contains(&size) {
            return Err(Ipv4Error::InvalidMaskSize(size.to_string()));
        }
        Ok(Mask(prefix_bits(size as u8)))
    }

    /// Take a raw bit pattern as the mask. The pattern is not validated.
    pub const fn from_bits(value: u32) -> Self {
        Mask(value)
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /**
    The prefix length, i.e. the number of leading one-bits.

    Exact for every mask built from a size: `Mask::new(n)?.size() == n`
    for all `n` in `0..=32`. For a non-contiguous pattern this counts only
    the leading run of ones.
    */
    #[inline]
    pub fn size(&self) -> u8 {
        self.0.leading_ones() as u8
    }

    /// Bitwise AND of the mask and an address.
    pub fn apply(&self, addr: impl ToAddress) -> Result<Address, Ipv4Error> {
        Ok(self.network_of(addr.to_address()?))
    }

    /// Whether the mask is exactly `size()` leading ones followed by zeros.
    pub fn is_contiguous(&self) -> bool {
        self.0 == prefix_bits(self.size())
    }

    #[inline]
    pub(crate) fn network_of(&self, addr: Address) -> Address {
        Address::new(self.0 & addr.value())
    }

    /// The mask's bit pattern as an [Address].
    #[inline]
    pub fn to_addr(&self) -> Address {
        Address::new(self.0)
    }
}

/// u32 with `prefix` high bits set, remaining low bits zero. `prefix`: `0..=32`
#[inline]
fn prefix_bits(prefix: u8) -> u32 {
    if prefix == 0 {
        // shifting by the full width overflows
        return 0;
    }
    u32::MAX << (IPV4_BITS - prefix)
}

fn parse_mask(s: &str) -> Result<Mask, Ipv4Error> {
    if RE_SIZE.is_match(s) {
        let size: i64 = s
            .parse()
            .map_err(|_| Ipv4Error::InvalidMaskSize(s.into()))?;
        return Mask::from_size(size);
    }
    Ok(Mask(s.to_address()?.value()))
}

/* ---------------------------------- */

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_addr())
    }
}

impl FromStr for Mask {
    type Err = Ipv4Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_mask(s)
    }
}

impl From<Address> for Mask {
    fn from(addr: Address) -> Self {
        Mask(addr.value())
    }
}

/* ---------------------------------- */

impl ToMask for Mask {
    #[inline]
    fn to_mask(&self) -> Result<Mask, Ipv4Error> {
        Ok(*self)
    }
}

impl ToMask for str {
    fn to_mask(&self) -> Result<Mask, Ipv4Error> {
        parse_mask(self)
    }
}

impl ToMask for String {
    fn to_mask(&self) -> Result<Mask, Ipv4Error> {
        parse_mask(self)
    }
}

impl ToMask for u8 {
    fn to_mask(&self) -> Result<Mask, Ipv4Error> {
        Mask::new(*self)
    }
}

impl ToMask for u32 {
    fn to_mask(&self) -> Result<Mask, Ipv4Error> {
        Mask::from_size(*self as i64)
    }
}

impl ToMask for i32 {
    fn to_mask(&self) -> Result<Mask, Ipv4Error> {
        Mask::from_size(*self as i64)
    }
}

impl ToMask for i64 {
    fn to_mask(&self) -> Result<Mask, Ipv4Error> {
        Mask::from_size(*self)
    }
}

impl ToMask for Address {
    fn to_mask(&self) -> Result<Mask, Ipv4Error> {
        Ok(Mask::from(*self))
    }
}

impl ToMask for Ipv4Addr {
    fn to_mask(&self) -> Result<Mask, Ipv4Error> {
        Ok(Mask(u32::from(*self)))
    }
}

/* ---------------------------------- */

impl Serialize for Mask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct MaskVisitor;

impl<'de> de::Visitor<'de> for MaskVisitor {
    type Value = Mask;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(EXPECT_MASK)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_mask(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Mask::from_size(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let v: i64 = i64::try_from(v)
            .map_err(|_| E::custom(Ipv4Error::InvalidMaskSize(v.to_string())))?;
        self.visit_i64(v)
    }
}

impl<'de> Deserialize<'de> for Mask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MaskVisitor)
    }
}

/* -------------------------------------------------------------------------- */
