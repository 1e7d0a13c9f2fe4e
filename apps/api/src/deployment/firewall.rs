use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::Deserialize;

use super::errors::DeploymentError;

/// Transport protocol of an inbound rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

/// IPv4 CIDR block such as `0.0.0.0/0`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Cidr {
    addr: Ipv4Addr,
    prefix: u8,
}

impl Cidr {
    /// The "any source" block
    pub const ANY: Cidr = Cidr {
        addr: Ipv4Addr::UNSPECIFIED,
        prefix: 0,
    };

    pub fn is_any(&self) -> bool {
        self.prefix == 0
    }
}

impl FromStr for Cidr {
    type Err = DeploymentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DeploymentError::InvalidCidr(s.to_string());
        let (addr, prefix) = match s.split_once('/') {
            Some((addr, prefix)) => (addr, prefix.parse::<u8>().map_err(|_| invalid())?),
            None => (s, 32),
        };
        if prefix > 32 {
            return Err(invalid());
        }
        let addr = addr.parse::<Ipv4Addr>().map_err(|_| invalid())?;
        Ok(Self { addr, prefix })
    }
}

impl TryFrom<String> for Cidr {
    type Error = DeploymentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

/// One inbound security group rule
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FirewallRule {
    pub protocol: Protocol,
    pub port: u16,
    pub source: Cidr,
    #[serde(default)]
    pub description: Option<String>,
}

impl FirewallRule {
    /// TCP rule open to every source address
    pub fn tcp_from_anywhere(port: u16, description: &str) -> Self {
        Self {
            protocol: Protocol::Tcp,
            port,
            source: Cidr::ANY,
            description: Some(description.to_string()),
        }
    }
}
