use std::net::IpAddr;
use std::str::FromStr;

use indexmap::IndexMap;
use ipnet::{IpNet, Ipv4Net, Ipv6Net};
use mac_address::MacAddress;
use serde::{Deserialize, Serialize};

use crate::error::{SharedResult, SharedTypeError};

/// A complete dataplane interface configuration, as handed over by the schema validator.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub interfaces: IndexMap<String, Interface>,
    #[serde(default)]
    pub loopbacks: IndexMap<String, Loopback>,
}

impl Config {
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.get(name)
    }

    pub fn loopback(&self, name: &str) -> Option<&Loopback> {
        self.loopbacks.get(name)
    }

    /// Look up anything that can own addresses: an interface first, then a loopback.
    pub fn address_owner(&self, name: &str) -> Option<AddressOwner<'_>> {
        if let Some(iface) = self.interface(name) {
            return Some(AddressOwner::Interface(iface));
        }
        self.loopback(name).map(AddressOwner::Loopback)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Interface {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mtu: Option<u32>,
    #[serde(default)]
    pub state: Option<AdminState>,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub lcp: Option<String>,
    #[serde(default)]
    pub encapsulation: Option<EncapsulationConfig>,
    #[serde(default)]
    pub mpls: Option<bool>,
    #[serde(default)]
    pub l2xc: Option<String>,
    #[serde(default)]
    pub unnumbered: Option<String>,
}

impl Interface {
    pub fn has_addresses(&self) -> bool {
        !self.addresses.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Loopback {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub mtu: Option<u32>,
    #[serde(default)]
    pub addresses: Vec<String>,
    #[serde(default)]
    pub lcp: Option<String>,
    #[serde(default)]
    pub mac: Option<MacAddr>,
    #[serde(default)]
    pub unnumbered: Option<String>,
}

impl Loopback {
    pub fn has_addresses(&self) -> bool {
        !self.addresses.is_empty()
    }
}

/// Borrowed view over either kind of address-bearing entity.
#[derive(Debug, Clone, Copy)]
pub enum AddressOwner<'a> {
    Interface(&'a Interface),
    Loopback(&'a Loopback),
}

impl<'a> AddressOwner<'a> {
    pub fn addresses(&self) -> &'a [String] {
        match self {
            AddressOwner::Interface(iface) => &iface.addresses,
            AddressOwner::Loopback(lo) => &lo.addresses,
        }
    }

    pub fn unnumbered(&self) -> Option<&'a str> {
        match self {
            AddressOwner::Interface(iface) => iface.unnumbered.as_deref(),
            AddressOwner::Loopback(lo) => lo.unnumbered.as_deref(),
        }
    }

    pub fn has_addresses(&self) -> bool {
        !self.addresses().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AdminState {
    Up,
    Down,
}

impl AdminState {
    pub fn is_up(self) -> bool {
        self == AdminState::Up
    }
}

impl std::fmt::Display for AdminState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminState::Up => write!(f, "up"),
            AdminState::Down => write!(f, "down"),
        }
    }
}

/// Encapsulation block exactly as written in the configuration document.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct EncapsulationConfig {
    #[serde(default)]
    pub dot1q: Option<u16>,
    #[serde(default)]
    pub dot1ad: Option<u16>,
    #[serde(default)]
    pub inner_dot1q: Option<u16>,
    #[serde(default)]
    pub exact_match: Option<bool>,
}

/// An interface address in `address/prefix` form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAddress {
    pub addr: IpAddr,
    pub prefix_len: u8,
}

impl InterfaceAddress {
    pub fn new(addr: IpAddr, prefix_len: u8) -> Self {
        Self { addr, prefix_len }
    }

    pub fn to_ipnet(&self) -> IpNet {
        match self.addr {
            IpAddr::V4(addr) => IpNet::V4(
                Ipv4Net::new(addr, self.prefix_len).unwrap_or_else(|_| Ipv4Net::from(addr)),
            ),
            IpAddr::V6(addr) => IpNet::V6(
                Ipv6Net::new(addr, self.prefix_len).unwrap_or_else(|_| Ipv6Net::from(addr)),
            ),
        }
    }

    /// True when either address lies within the other's prefix.
    pub fn same_network(&self, other: &InterfaceAddress) -> bool {
        let (net1, net2) = (self.to_ipnet(), other.to_ipnet());
        net1.contains(&other.addr) || net2.contains(&self.addr)
    }
}

impl FromStr for InterfaceAddress {
    type Err = SharedTypeError;

    fn from_str(s: &str) -> SharedResult<Self> {
        let (addr, prefix) = s.split_once('/').ok_or_else(|| SharedTypeError::InvalidValue {
            field: "prefix_length",
            value: s.to_string(),
        })?;
        let addr = addr
            .parse::<IpAddr>()
            .map_err(|_| SharedTypeError::InvalidValue {
                field: "ip_address",
                value: s.to_string(),
            })?;
        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SharedTypeError::InvalidValue {
                field: "prefix_length",
                value: prefix.to_string(),
            });
        }
        let prefix_len = prefix
            .parse::<u8>()
            .map_err(|_| SharedTypeError::InvalidValue {
                field: "prefix_length",
                value: prefix.to_string(),
            })?;
        let max = if addr.is_ipv4() { 32 } else { 128 };
        if prefix_len > max {
            return Err(SharedTypeError::InvalidValue {
                field: "prefix_length",
                value: prefix.to_string(),
            });
        }
        Ok(InterfaceAddress::new(addr, prefix_len))
    }
}

impl std::fmt::Display for InterfaceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacAddr(pub MacAddress);

impl MacAddr {
    /// The group bit is the least significant bit of the first octet.
    pub fn is_multicast(&self) -> bool {
        self.0.bytes()[0] & 0x01 == 0x01
    }
}

struct MacAddrVisitor;

impl<'de> serde::de::Visitor<'de> for MacAddrVisitor {
    type Value = MacAddr;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a MAC address string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        v.parse::<MacAddress>()
            .map(MacAddr)
            .map_err(|_| E::custom(format!("invalid MAC address: {}", v)))
    }
}

impl<'de> Deserialize<'de> for MacAddr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(MacAddrVisitor)
    }
}

impl Serialize for MacAddr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl FromStr for MacAddr {
    type Err = SharedTypeError;

    fn from_str(s: &str) -> SharedResult<Self> {
        s.parse::<MacAddress>()
            .map(MacAddr)
            .map_err(|_| SharedTypeError::InvalidValue {
                field: "mac_address",
                value: s.to_string(),
            })
    }
}

impl std::fmt::Display for MacAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string().to_lowercase())
    }
}
