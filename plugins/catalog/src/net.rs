use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};
use std::str::FromStr;

use logfield_api::Handler;

use crate::primitives::text;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetError {
    #[error("prefix length {prefix} exceeds {max} for {family}")]
    Prefix { prefix: u8, max: u8, family: &'static str },
    #[error("invalid address: {0}")]
    Address(#[from] std::net::AddrParseError),
    #[error("invalid prefix length: {0:?}")]
    PrefixText(String),
    #[error("missing '/' in {0:?}")]
    MissingPrefix(String),
}

fn checked_prefix(addr: &IpAddr, prefix: u8) -> Result<u8, NetError> {
    let (max, family) = match addr {
        IpAddr::V4(_) => (32, "IPv4"),
        IpAddr::V6(_) => (128, "IPv6"),
    };
    if prefix > max {
        return Err(NetError::Prefix { prefix, max, family });
    }
    Ok(prefix)
}

fn masked(addr: IpAddr, prefix: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let mask = u32::MAX.checked_shl(32 - u32::from(prefix)).unwrap_or(0);
            IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
        }
        IpAddr::V6(v6) => {
            let mask = u128::MAX.checked_shl(128 - u32::from(prefix)).unwrap_or(0);
            IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask))
        }
    }
}

fn split_cidr(s: &str) -> Result<(IpAddr, u8), NetError> {
    let (addr, prefix) = s.split_once('/').ok_or_else(|| NetError::MissingPrefix(s.to_string()))?;
    let prefix = prefix
        .parse::<u8>()
        .map_err(|_| NetError::PrefixText(prefix.to_string()))?;
    Ok((addr.parse()?, prefix))
}

/// An IP subnet. Host bits are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpNetwork {
    network: IpAddr,
    prefix: u8,
}

impl IpNetwork {
    /// Subnet containing `addr`. Host bits of `addr` are cleared.
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, NetError> {
        let prefix = checked_prefix(&addr, prefix)?;
        Ok(Self { network: masked(addr, prefix), prefix })
    }

    pub fn network(&self) -> IpAddr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn contains(&self, addr: IpAddr) -> bool {
        addr.is_ipv4() == self.network.is_ipv4() && masked(addr, self.prefix) == self.network
    }
}

impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

impl FromStr for IpNetwork {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = split_cidr(s)?;
        Self::new(addr, prefix)
    }
}

/// A host address together with the prefix of the network it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IpInterface {
    addr: IpAddr,
    prefix: u8,
}

impl IpInterface {
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, NetError> {
        let prefix = checked_prefix(&addr, prefix)?;
        Ok(Self { addr, prefix })
    }

    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    pub fn network(&self) -> IpNetwork {
        IpNetwork {
            network: masked(self.addr, self.prefix),
            prefix: self.prefix,
        }
    }
}

impl fmt::Display for IpInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

impl FromStr for IpInterface {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = split_cidr(s)?;
        Self::new(addr, prefix)
    }
}

pub fn handlers() -> Vec<Handler> {
    vec![
        text::<IpAddr>("ip_addr"),
        text::<Ipv4Addr>("ipv4_addr"),
        text::<Ipv6Addr>("ipv6_addr"),
        text::<SocketAddr>("socket_addr"),
        text::<SocketAddrV4>("socket_addr_v4"),
        text::<SocketAddrV6>("socket_addr_v6"),
        text::<IpNetwork>("ip_network"),
        text::<IpInterface>("ip_interface"),
    ]
}
