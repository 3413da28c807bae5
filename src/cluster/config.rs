use std::time::Duration;

use derive_more::Display;

use crate::cluster::NodeAddress;

/// Declarative load-balancing choice forwarded to the driver.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum LoadBalancing {
    RoundRobin,
    Random,
    TopologyAware,
}

/// Consistency level forwarded with query options or per statement.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Consistency {
    One,
    LocalOne,
    Quorum,
    LocalQuorum,
    All,
}

/// Connection pool sizing per node. Unset fields keep driver defaults.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PoolingOptions {
    pub core_connections_per_node: Option<u32>,
    pub max_connections_per_node: Option<u32>,
    pub heartbeat_interval: Option<Duration>,
}

impl PoolingOptions {
    pub fn with_core_connections_per_node(mut self, connections: u32) -> Self {
        self.core_connections_per_node = Some(connections);
        self
    }

    pub fn with_max_connections_per_node(mut self, connections: u32) -> Self {
        self.max_connections_per_node = Some(connections);
        self
    }

    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = Some(interval);
        self
    }
}

/// Low-level socket tuning. Unset fields keep driver defaults.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SocketOptions {
    pub connect_timeout: Option<Duration>,
    pub read_timeout: Option<Duration>,
    pub keepalive: Option<Duration>,
    pub tcp_nodelay: Option<bool>,
}

impl SocketOptions {
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn with_keepalive(mut self, keepalive: Duration) -> Self {
        self.keepalive = Some(keepalive);
        self
    }

    pub fn with_tcp_nodelay(mut self, nodelay: bool) -> Self {
        self.tcp_nodelay = Some(nodelay);
        self
    }
}

/// Defaults applied to queries that carry no per-statement overrides.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct QueryOptions {
    pub consistency: Option<Consistency>,
    pub fetch_size: Option<u32>,
}

impl QueryOptions {
    pub fn with_consistency(mut self, consistency: Consistency) -> Self {
        self.consistency = Some(consistency);
        self
    }

    pub fn with_fetch_size(mut self, fetch_size: u32) -> Self {
        self.fetch_size = Some(fetch_size);
        self
    }
}

/// Toggle for the driver's built-in metrics reporting. Presence with
/// `reporting_enabled == false` is an explicit opt-out; absence keeps the
/// driver default.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct MetricsOptions {
    pub reporting_enabled: bool,
}

impl Default for MetricsOptions {
    fn default() -> Self {
        MetricsOptions {
            reporting_enabled: true,
        }
    }
}

/// Immutable configuration snapshot consumed once when building a cluster
/// handle. Contact points are ordered and must be non-empty by the time a
/// [`ClusterBuilder`](crate::cluster::ClusterBuilder) is constructed.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ClusterConfig {
    pub contact_points: Vec<NodeAddress>,
    pub load_balancing: Option<LoadBalancing>,
    pub pooling: Option<PoolingOptions>,
    pub socket: Option<SocketOptions>,
    pub query: Option<QueryOptions>,
    pub metrics: Option<MetricsOptions>,
}

impl ClusterConfig {
    pub fn builder() -> ClusterConfigBuilder {
        Default::default()
    }
}

/// Builder structure that helps to assemble a [`ClusterConfig`].
#[derive(Debug, Default)]
pub struct ClusterConfigBuilder {
    config: ClusterConfig,
}

impl ClusterConfigBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Adds a contact point.
    pub fn with_contact_point(mut self, address: NodeAddress) -> Self {
        self.config.contact_points.push(address);
        self
    }

    /// Adds multiple contact points, preserving order.
    pub fn with_contact_points(
        mut self,
        addresses: impl IntoIterator<Item = NodeAddress>,
    ) -> Self {
        self.config.contact_points.extend(addresses);
        self
    }

    pub fn with_load_balancing(mut self, strategy: LoadBalancing) -> Self {
        self.config.load_balancing = Some(strategy);
        self
    }

    pub fn with_pooling_options(mut self, options: PoolingOptions) -> Self {
        self.config.pooling = Some(options);
        self
    }

    pub fn with_socket_options(mut self, options: SocketOptions) -> Self {
        self.config.socket = Some(options);
        self
    }

    pub fn with_query_options(mut self, options: QueryOptions) -> Self {
        self.config.query = Some(options);
        self
    }

    pub fn with_metrics_options(mut self, options: MetricsOptions) -> Self {
        self.config.metrics = Some(options);
        self
    }

    /// Finalizes the building process.
    pub fn build(self) -> ClusterConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_every_option_to_absent() {
        let config = ClusterConfig::builder()
            .with_contact_point("10.0.0.1:9042".into())
            .build();

        assert_eq!(config.contact_points.len(), 1);
        assert_eq!(config.load_balancing, None);
        assert_eq!(config.pooling, None);
        assert_eq!(config.socket, None);
        assert_eq!(config.query, None);
        assert_eq!(config.metrics, None);
    }

    #[test]
    fn should_preserve_contact_point_order() {
        let config = ClusterConfig::builder()
            .with_contact_points(vec!["10.0.0.1:9042".into(), "10.0.0.2:9042".into()])
            .with_contact_point("10.0.0.3:9042".into())
            .build();

        assert_eq!(
            config.contact_points,
            vec![
                "10.0.0.1:9042".into(),
                "10.0.0.2:9042".into(),
                "10.0.0.3:9042".into(),
            ]
        );
    }
}
