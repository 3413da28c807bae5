use std::fmt;

use derive_more::Constructor;
use itertools::Itertools;

use crate::cluster::NodeAddress;

/// Topology snapshot supplied by the driver for a built cluster handle.
#[derive(Clone, Constructor, Debug, Default, Eq, PartialEq)]
pub struct ClusterMetadata {
    cluster_name: Option<String>,
    nodes: Vec<NodeInfo>,
}

impl ClusterMetadata {
    pub fn cluster_name(&self) -> Option<&str> {
        self.cluster_name.as_deref()
    }

    pub fn nodes(&self) -> &[NodeInfo] {
        &self.nodes
    }
}

impl fmt::Display for ClusterMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cluster {} [{}]",
            self.cluster_name.as_deref().unwrap_or("<unnamed>"),
            self.nodes.iter().map(|node| node.address()).join(", "),
        )
    }
}

/// Known state of a single cluster node.
#[derive(Clone, Constructor, Debug, Eq, PartialEq)]
pub struct NodeInfo {
    address: NodeAddress,
    datacenter: Option<String>,
    rack: Option<String>,
    up: bool,
}

impl NodeInfo {
    pub fn address(&self) -> &NodeAddress {
        &self.address
    }

    pub fn datacenter(&self) -> Option<&str> {
        self.datacenter.as_deref()
    }

    pub fn rack(&self) -> Option<&str> {
        self.rack.as_deref()
    }

    pub fn is_up(&self) -> bool {
        self.up
    }
}
