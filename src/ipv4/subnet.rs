// Copyright (c) 2026 Mikko Tanner. All rights reserved.
// Licensed under the MIT License or the Apache License, Version 2.0.
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{strings::*, Address, Ipv4Error, Mask, Pool, ToAddress, ToMask, IPV4_BITS};
use ipnet::Ipv4Net;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, str::FromStr};

/**
A network address paired with its mask.

The network address never has bits set outside the mask; construction
fails with [Ipv4Error::MisalignedSubnet] otherwise. The broadcast address
is derived, not stored.

The network and broadcast addresses are reserved. Everything strictly
between them (and matching the mask) is usable host space, which means a
`/31` or `/32` has no usable hosts at all.
*/
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Subnet {
    network: Address,
    mask: Mask,
}

impl Subnet {
    pub fn new(network: impl ToAddress, mask: impl ToMask) -> Result<Self, Ipv4Error> {
        let network: Address = network.to_address()?;
        let mask: Mask = mask.to_mask()?;

        if mask.network_of(network) != network {
            return Err(Ipv4Error::MisalignedSubnet { network, mask });
        }
        Ok(Self { network, mask })
    }

    #[inline]
    pub fn network(&self) -> Address {
        self.network
    }

    #[inline]
    pub fn mask(&self) -> Mask {
        self.mask
    }

    #[inline]
    pub fn prefix_len(&self) -> u8 {
        self.mask.size()
    }

    /// `network | !mask`
    pub fn broadcast(&self) -> Address {
        Address::new(self.network.value() | !self.mask.value())
    }

    /// Number of addresses matching the mask, reserved ones included.
    pub fn len(&self) -> u64 {
        1u64 << self.mask.value().count_zeros()
    }

    /// Always false: even a `/32` holds its own network address.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_network_address(&self, addr: impl ToAddress) -> Result<bool, Ipv4Error> {
        Ok(addr.to_address()? == self.network)
    }

    pub fn is_broadcast_address(&self, addr: impl ToAddress) -> Result<bool, Ipv4Error> {
        Ok(addr.to_address()? == self.broadcast())
    }

    /// Whether the address falls under this subnet's mask, reserved addresses included.
    pub fn contains(&self, addr: impl ToAddress) -> Result<bool, Ipv4Error> {
        Ok(self.mask.network_of(addr.to_address()?) == self.network)
    }

    /**
    Whether an address is usable host space of this subnet:
    1. it belongs to the subnet
    2. it is not the network address
    3. it is not the broadcast address
    */
    pub fn is_valid_address(&self, addr: impl ToAddress) -> Result<bool, Ipv4Error> {
        Ok(self.is_host(addr.to_address()?))
    }

    #[inline]
    pub(crate) fn is_host(&self, addr: Address) -> bool {
        self.mask.network_of(addr) == self.network
            && addr != self.network
            && addr != self.broadcast()
    }

    /// Iterator over all usable host addresses, in ascending order.
    pub fn hosts(&self) -> Hosts {
        Hosts {
            subnet: *self,
            next: self.network.next().ok(),
        }
    }

    /// A new, empty allocation [Pool] over this subnet.
    pub fn to_pool(&self) -> Pool {
        Pool::new(*self)
    }
}

/* ---------------------------------- */

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SLASH}{}", self.network, self.prefix_len())
    }
}

/// Accepts `a.b.c.d/n` and `a.b.c.d/m.m.m.m`. A bare address is a `/32`.
impl FromStr for Subnet {
    type Err = Ipv4Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.contains(SLASH) {
            return Subnet::new(s, IPV4_BITS);
        }

        let parts: Vec<&str> = s.split(SLASH).collect();
        if parts.len() != 2 {
            return Err(Ipv4Error::InvalidSubnetFmt(s.into()));
        }
        Subnet::new(parts[0], parts[1])
    }
}

impl TryFrom<Subnet> for Ipv4Net {
    type Error = Ipv4Error;

    /// Fails with [Ipv4Error::NonContiguousMask] if the mask has no prefix-length form.
    fn try_from(subnet: Subnet) -> Result<Self, Self::Error> {
        if !subnet.mask.is_contiguous() {
            return Err(Ipv4Error::NonContiguousMask(subnet.mask));
        }
        Ipv4Net::new(subnet.network.into(), subnet.prefix_len())
            .map_err(|_| Ipv4Error::InvalidMaskSize(subnet.prefix_len().to_string()))
    }
}

impl TryFrom<Ipv4Net> for Subnet {
    type Error = Ipv4Error;

    /// Fails with [Ipv4Error::MisalignedSubnet] if the net has host bits set.
    fn try_from(net: Ipv4Net) -> Result<Self, Self::Error> {
        Subnet::new(net.addr(), net.prefix_len())
    }
}

impl Serialize for Subnet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct SubnetVisitor;

impl<'de> de::Visitor<'de> for SubnetVisitor {
    type Value = Subnet;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(EXPECT_SUBNET)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Subnet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(SubnetVisitor)
    }
}

/* ---------------------------------- */

/// Iterator over the usable host addresses of a [Subnet].
pub struct Hosts {
    subnet: Subnet,
    next: Option<Address>,
}

impl Iterator for Hosts {
    type Item = Address;

    fn next(&mut self) -> Option<Self::Item> {
        let broadcast: Address = self.subnet.broadcast();
        while let Some(current) = self.next {
            if current >= broadcast {
                self.next = None;
                return None;
            }
            self.next = current.next().ok();
            if self.subnet.is_host(current) {
                return Some(current);
            }
        }
        None
    }
}

/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    const NET_16: &str = "192.168.0.0";
    const NET_24: &str = "192.168.1.0";
    const HOST: &str = "192.168.1.1";
    const SUBNET_29: &str = "192.168.0.0/29";

    #[test]
    fn test_construction() {
        let s32 = Subnet::new(HOST, 32).unwrap();
        let s24 = Subnet::new(NET_24, 24).unwrap();
        let s16 = Subnet::new(NET_16, 16).unwrap();
        let s0 = Subnet::new("0.0.0.0", 0).unwrap();

        assert_eq!(s32.network(), HOST.parse::<Address>().unwrap());
        assert_eq!(s24.network(), NET_24.parse::<Address>().unwrap());
        assert_eq!(s16.network(), NET_16.parse::<Address>().unwrap());
        assert_eq!(s0.network(), Address::MIN);

        assert_eq!(s32.mask(), "255.255.255.255".parse::<Mask>().unwrap());
        assert_eq!(s24.mask(), "255.255.255.0".parse::<Mask>().unwrap());
        assert_eq!(s16.mask(), "255.255.0.0".parse::<Mask>().unwrap());
        assert_eq!(s0.mask(), "0.0.0.0".parse::<Mask>().unwrap());

        assert_eq!(s24.to_string(), "192.168.1.0/24");
        assert_eq!(Subnet::new(NET_24, "255.255.255.0").unwrap(), s24);
        assert_eq!(Subnet::new(NET_24, "24").unwrap(), s24);
    }

    #[test]
    fn test_misaligned() {
        let err: Ipv4Error = Subnet::new(NET_24, "255.255.0.0").unwrap_err();
        assert!(matches!(err, Ipv4Error::MisalignedSubnet { .. }));
        assert!(err.to_string().contains("\"192.168.1.0/16\""));
        assert!(err.to_string().contains("\"192.168.0.0/16\""));
        assert!(Subnet::new(HOST, 24).is_err());
        assert!(matches!(Subnet::new(NET_24, 33), Err(Ipv4Error::InvalidMaskSize(_))));
        assert!(matches!(Subnet::new("1.2.3", 8), Err(Ipv4Error::InvalidAddress(_))));
    }

    #[test]
    fn test_broadcast() {
        let tests: Vec<(&str, &str)> = vec![
            ("192.168.0.0/16", "192.168.255.255"),
            ("192.168.1.0/24", "192.168.1.255"),
            (SUBNET_29, "192.168.0.7"),
            ("10.0.0.0/8", "10.255.255.255"),
            ("0.0.0.0/0", "255.255.255.255"),
            ("192.168.1.1/32", "192.168.1.1"),
        ];
        for (net, bcast) in tests {
            let subnet: Subnet = net.parse().unwrap();
            assert_eq!(subnet.broadcast().to_string(), bcast, "Failed: '{net}'");

            let ipnet: Ipv4Net = subnet.try_into().unwrap();
            assert_eq!(Address::from(ipnet.broadcast()), subnet.broadcast());
        }
    }

    #[test]
    fn test_valid_addresses() {
        let subnet = Subnet::new(NET_16, 16).unwrap();

        assert!(subnet.is_valid_address("192.168.0.1").unwrap());
        assert!(subnet.is_valid_address("192.168.0.255").unwrap());
        assert!(subnet.is_valid_address("192.168.1.0").unwrap());

        assert!(!subnet.is_valid_address("192.168.0.0").unwrap());
        assert!(!subnet.is_valid_address("192.168.255.255").unwrap());
        assert!(!subnet.is_valid_address("192.167.255.255").unwrap());
        assert!(!subnet.is_valid_address("192.169.0.0").unwrap());

        assert!(subnet.is_network_address(NET_16).unwrap());
        assert!(subnet.is_broadcast_address("192.168.255.255").unwrap());
        assert!(!subnet.is_broadcast_address("192.168.0.1").unwrap());
        assert!(subnet.contains("192.168.255.255").unwrap());
        assert!(subnet.is_valid_address("not an address").is_err());
    }

    #[test]
    fn test_degenerate_subnets() {
        let s31: Subnet = "10.0.0.0/31".parse().unwrap();
        assert!(!s31.is_valid_address("10.0.0.0").unwrap());
        assert!(!s31.is_valid_address("10.0.0.1").unwrap());
        assert_eq!(s31.hosts().count(), 0);

        let s32: Subnet = "255.255.255.255/32".parse().unwrap();
        assert_eq!(s32.hosts().count(), 0);
        assert_eq!(s32.len(), 1);
        assert!(!s32.is_empty());
    }

    #[test]
    fn test_hosts() {
        let subnet: Subnet = SUBNET_29.parse().unwrap();
        let hosts: Vec<String> = subnet.hosts().map(|a| a.to_string()).collect();
        assert_eq!(
            hosts,
            vec![
                "192.168.0.1",
                "192.168.0.2",
                "192.168.0.3",
                "192.168.0.4",
                "192.168.0.5",
                "192.168.0.6",
            ]
        );
        assert_eq!(subnet.len(), 8);
        assert_eq!(Subnet::new(NET_16, 16).unwrap().hosts().count(), 65534);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "192.168.1.0/255.255.255.0".parse::<Subnet>().unwrap().to_string(),
            "192.168.1.0/24"
        );
        assert_eq!(HOST.parse::<Subnet>().unwrap().to_string(), "192.168.1.1/32");
        assert!(matches!(
            "192.168.1.0/24/8".parse::<Subnet>(),
            Err(Ipv4Error::InvalidSubnetFmt(_))
        ));
        assert!(matches!(
            "192.168.1.0/16".parse::<Subnet>(),
            Err(Ipv4Error::MisalignedSubnet { .. })
        ));
    }

    #[test]
    fn test_ipnet_conversion() {
        let net: Ipv4Net = "10.1.0.0/16".parse().unwrap();
        let subnet: Subnet = net.try_into().unwrap();
        assert_eq!(subnet.to_string(), "10.1.0.0/16");
        assert_eq!(Ipv4Net::try_from(subnet).unwrap(), net);

        let host_bits: Ipv4Net = "10.1.2.3/16".parse().unwrap();
        assert!(matches!(
            Subnet::try_from(host_bits),
            Err(Ipv4Error::MisalignedSubnet { .. })
        ));
    }

    #[test]
    fn test_ipnet_rejects_non_contiguous_mask() {
        let subnet = Subnet::new("10.0.0.0", "255.0.255.0").unwrap();
        assert_eq!(subnet.broadcast().to_string(), "10.255.0.255");
        assert!(!subnet.contains("10.0.1.5").unwrap());
        assert_eq!(
            Ipv4Net::try_from(subnet),
            Err(Ipv4Error::NonContiguousMask("255.0.255.0".parse().unwrap()))
        );
    }

    #[test]
    fn test_serde() {
        let subnet: Subnet = SUBNET_29.parse().unwrap();
        assert_eq!(serde_json::to_string(&subnet).unwrap(), "\"192.168.0.0/29\"");
        assert_eq!(serde_json::from_str::<Subnet>("\"192.168.0.0/29\"").unwrap(), subnet);
        assert!(serde_json::from_str::<Subnet>("\"192.168.0.1/29\"").is_err());
    }
}
