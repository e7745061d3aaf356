// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{strings::*, Ipv4Error, ToAddress};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, net::Ipv4Addr, str::FromStr};

// Compiled once per program execution.
lazy_static! {
    static ref RE_INTEGER: Regex = Regex::new(r"^-?[0-9]+$").unwrap();
    static ref RE_DOTTED: Regex = Regex::new(r"^([0-9]+)\.([0-9]+)\.([0-9]+)\.([0-9]+)$").unwrap();
}

/**
A single IPv4 address.

Stored as the unsigned 32-bit value, which maps bijectively onto
`0.0.0.0..=255.255.255.255`. The signed 32-bit view (where `255.255.255.0`
is `-256`) is accepted on input and available through [Address::as_i32].

Ordering is the unsigned numeric order of the addresses.
*/
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Address(u32);

impl Address {
    /// `0.0.0.0`
    pub const MIN: Address = Address(0);
    /// `255.255.255.255`
    pub const MAX: Address = Address(u32::MAX);

    pub const fn new(value: u32) -> Self {
        Address(value)
    }

    /**
    Create an address from an integer in the signed 32-bit range
    (`-2147483648..=2147483647`), interpreting it as a two's complement word.

    ### Errors
    [Ipv4Error::InvalidAddress] if the value does not fit in 32 signed bits.
    */
    pub fn from_i64(value: i64) -> Result<Self, Ipv4Error> {
        match i32::try_from(value) {
            Ok(word) => Ok(Address(word as u32)),
            Err(_) => Err(Ipv4Error::InvalidAddress(value.to_string())),
        }
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// The address as a signed 32-bit word.
    #[inline]
    pub const fn as_i32(&self) -> i32 {
        self.0 as i32
    }

    /// The four octets, most significant first.
    pub fn octets(&self) -> [u8; 4] {
        // logical shifts, so the high octet is right for any bit pattern
        [
            ((self.0 >> 24) % 256) as u8,
            ((self.0 >> 16) % 256) as u8,
            ((self.0 >> 8) % 256) as u8,
            (self.0 % 256) as u8,
        ]
    }

    /**
    The numerically following address.

    Does not wrap around: fails with [Ipv4Error::AddressSpaceExhausted]
    when called on `255.255.255.255`.
    */
    pub fn next(&self) -> Result<Self, Ipv4Error> {
        self.0
            .checked_add(1)
            .map(Address)
            .ok_or(Ipv4Error::AddressSpaceExhausted(*self))
    }

    /**
    The numerically preceding address.

    Does not wrap around: fails with [Ipv4Error::AddressSpaceExhausted]
    when called on `0.0.0.0`.
    */
    pub fn previous(&self) -> Result<Self, Ipv4Error> {
        self.0
            .checked_sub(1)
            .map(Address)
            .ok_or(Ipv4Error::AddressSpaceExhausted(*self))
    }
}

/// Parse either an integer-like string (signed 32-bit range) or a dotted-decimal address.
fn parse_address(s: &str) -> Result<Address, Ipv4Error> {
    if RE_INTEGER.is_match(s) {
        let value: i64 = s
            .parse()
            .map_err(|_| Ipv4Error::InvalidAddress(s.into()))?;
        return Address::from_i64(value);
    }

    let caps = RE_DOTTED
        .captures(s)
        .ok_or_else(|| Ipv4Error::InvalidAddress(s.into()))?;

    let mut value: u32 = 0;
    for i in 1..=4 {
        let octet: u32 = caps[i]
            .parse::<u32>()
            .ok()
            .filter(|&o| o <= 255)
            .ok_or_else(|| Ipv4Error::InvalidAddress(s.into()))?;
        value = (value << 8) | octet;
    }
    Ok(Address(value))
}

/* ---------------------------------- */

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        write!(f, "{a}{DOT}{b}{DOT}{c}{DOT}{d}")
    }
}

impl FromStr for Address {
    type Err = Ipv4Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s)
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Self {
        Address(value)
    }
}

impl From<Ipv4Addr> for Address {
    fn from(ip: Ipv4Addr) -> Self {
        Address(u32::from(ip))
    }
}

impl From<Address> for Ipv4Addr {
    fn from(addr: Address) -> Self {
        Ipv4Addr::from(addr.0)
    }
}

/* ---------------------------------- */

impl ToAddress for Address {
    #[inline]
    fn to_address(&self) -> Result<Address, Ipv4Error> {
        Ok(*self)
    }
}

impl ToAddress for str {
    fn to_address(&self) -> Result<Address, Ipv4Error> {
        parse_address(self)
    }
}

impl ToAddress for String {
    fn to_address(&self) -> Result<Address, Ipv4Error> {
        parse_address(self)
    }
}

/// Raw unsigned value.
impl ToAddress for u32 {
    fn to_address(&self) -> Result<Address, Ipv4Error> {
        Ok(Address(*self))
    }
}

/// Signed 32-bit word, reinterpreted bit for bit.
impl ToAddress for i32 {
    fn to_address(&self) -> Result<Address, Ipv4Error> {
        Ok(Address(*self as u32))
    }
}

impl ToAddress for i64 {
    fn to_address(&self) -> Result<Address, Ipv4Error> {
        Address::from_i64(*self)
    }
}

impl ToAddress for Ipv4Addr {
    fn to_address(&self) -> Result<Address, Ipv4Error> {
        Ok(Address::from(*self))
    }
}

/* ---------------------------------- */

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct AddressVisitor;

impl<'de> de::Visitor<'de> for AddressVisitor {
    type Value = Address;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(EXPECT_ADDR)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        parse_address(v).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Address::from_i64(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        let v: i64 = i64::try_from(v)
            .map_err(|_| E::custom(Ipv4Error::InvalidAddress(v.to_string())))?;
        self.visit_i64(v)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AddressVisitor)
    }
}

/* -------------------------------------------------------------------------- */
