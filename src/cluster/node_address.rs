use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Representation of a node address. Can be a direct socket address or a
/// hostname. In the latter case, resolution is left to the driver and can
/// yield multiple nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeAddress {
    Direct(SocketAddr),
    Hostname(String),
}

impl From<SocketAddr> for NodeAddress {
    fn from(addr: SocketAddr) -> Self {
        NodeAddress::Direct(addr)
    }
}

impl From<String> for NodeAddress {
    fn from(value: String) -> Self {
        value
            .parse()
            .map(NodeAddress::Direct)
            .unwrap_or(NodeAddress::Hostname(value))
    }
}

impl From<&str> for NodeAddress {
    fn from(value: &str) -> Self {
        value.to_string().into()
    }
}

impl FromStr for NodeAddress {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(value.into())
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeAddress::Direct(addr) => write!(f, "{addr}"),
            NodeAddress::Hostname(hostname) => write!(f, "{hostname}"),
        }
    }
}
