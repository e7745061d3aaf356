// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

//! IPv4 addresses, masks, subnets and host allocation pools.

mod address;
mod mask;
mod pool;
mod shared;
mod strings;
mod subnet;

use std::{error, fmt};
use strings::*;

pub use address::Address;
pub use mask::Mask;
pub use pool::{Allocation, Pool};
pub use shared::SharedPool;
pub use subnet::{Hosts, Subnet};

pub(crate) const IPV4_BITS: u8 = 32;

/* ######################################################################### */

/**
Anything that can be normalized into an [Address].

Implemented for [Address] itself, dotted-decimal or integer-like strings,
integers and [std::net::Ipv4Addr]. Every method taking "an address" accepts
any of these, so callers never need to construct an [Address] by hand.
*/
pub trait ToAddress {
    fn to_address(&self) -> Result<Address, Ipv4Error>;
}

/**
Anything that can be normalized into a [Mask].

Integers are prefix lengths (`0..=32`). Strings consisting only of digits
are prefix lengths as well; any other string is parsed as an address whose
bit pattern becomes the mask. [Address] and [std::net::Ipv4Addr] are taken
as bit patterns.
*/
pub trait ToMask {
    fn to_mask(&self) -> Result<Mask, Ipv4Error>;
}

impl<T: ToAddress + ?Sized> ToAddress for &T {
    #[inline]
    fn to_address(&self) -> Result<Address, Ipv4Error> {
        (**self).to_address()
    }
}

impl<T: ToMask + ?Sized> ToMask for &T {
    #[inline]
    fn to_mask(&self) -> Result<Mask, Ipv4Error> {
        (**self).to_mask()
    }
}

/* ######################################################################### */

#[rustfmt::skip]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Ipv4Error {
    /// malformed string or out-of-range integer/octet
    InvalidAddress(String),
    /// prefix length outside `0..=32`
    InvalidMaskSize(String),
    /// subnet string does not have the `<address>/<mask>` shape
    InvalidSubnetFmt(String),
    /// network address has bits set outside the mask
    MisalignedSubnet { network: Address, mask: Mask },
    /// allocation status queried for an address outside the usable host range
    AddressOutsideSubnet { addr: Address, subnet: Subnet },
    UnsupportedNestedInput,
    /// mask cannot be expressed as a prefix length
    NonContiguousMask(Mask),
    /// stepping past `0.0.0.0` or `255.255.255.255`
    AddressSpaceExhausted(Address),
}

impl Ipv4Error {
    /// For [Ipv4Error::MisalignedSubnet], the aligned subnet the caller most
    /// likely meant (same mask, host bits cleared).
    pub fn suggested_subnet(&self) -> Option<Subnet> {
        match self {
            Ipv4Error::MisalignedSubnet { network, mask } => {
                Subnet::new(mask.network_of(*network), *mask).ok()
            }
            _ => None,
        }
    }
}

impl fmt::Display for Ipv4Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ipv4Error::InvalidAddress(addr) => {
                write!(f, "{ERR_INVALID_ADDR}: '{addr}'")
            }
            Ipv4Error::InvalidMaskSize(size) => {
                write!(f, "{ERR_MASK_SIZE} {size}")
            }
            Ipv4Error::InvalidSubnetFmt(s) => {
                write!(f, "{ERR_SUBNET_FMT}: '{s}'")
            }
            Ipv4Error::MisalignedSubnet { network, mask } => {
                let size: u8 = mask.size();
                let corrected: Address = mask.network_of(*network);
                write!(f, "{ERR_MISALIGNED} \"{network}{SLASH}{size}\", ")?;
                write!(f, "{ERR_SHOULD_BE} \"{corrected}{SLASH}{size}\"")
            }
            Ipv4Error::AddressOutsideSubnet { addr, subnet } => {
                write!(f, "{ERR_OUTSIDE} {subnet}: {addr}")
            }
            Ipv4Error::UnsupportedNestedInput => {
                write!(f, "{ERR_NESTED}")
            }
            Ipv4Error::NonContiguousMask(mask) => {
                write!(f, "{ERR_NON_CONTIGUOUS}: {mask}")
            }
            Ipv4Error::AddressSpaceExhausted(addr) => {
                write!(f, "{ERR_EXHAUSTED} {addr}")
            }
        }
    }
}

impl error::Error for Ipv4Error {}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misaligned_message() {
        let err = Subnet::new("192.168.1.0", "255.255.0.0").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid IPv4 subnet \"192.168.1.0/16\", should be \"192.168.0.0/16\""
        );
        assert_eq!(err.suggested_subnet().unwrap().to_string(), "192.168.0.0/16");
    }

    #[test]
    fn test_suggestion_only_for_misaligned() {
        let err = Ipv4Error::InvalidAddress("1.2.3".into());
        assert_eq!(err.suggested_subnet(), None);
        assert_eq!(err.to_string(), "invalid IPv4 address: '1.2.3'");
    }

    #[test]
    fn test_reference_normalization() {
        let addr: Address = "10.0.0.1".to_address().unwrap();
        let by_ref: &Address = &addr;
        assert_eq!(by_ref.to_address().unwrap(), addr);
        assert_eq!(String::from("10.0.0.1").to_address().unwrap(), addr);
        assert_eq!((&24i32).to_mask().unwrap(), Mask::new(24).unwrap());
    }
}
