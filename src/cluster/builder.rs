use std::sync::Arc;

use derivative::Derivative;

use crate::cluster::ClusterConfig;
use crate::driver::{Cluster, ClusterConnector, DriverError};
use crate::error::{Error, Result};

/// Builds fresh cluster handles from an immutable configuration snapshot.
///
/// Owned exclusively by the
/// [`SessionManager`](crate::cluster::SessionManager); every [`build`] call
/// produces a new handle and never mutates a previously produced one.
///
/// [`build`]: ClusterBuilder::build
#[derive(Derivative)]
#[derivative(Debug)]
pub struct ClusterBuilder {
    #[derivative(Debug = "ignore")]
    connector: Arc<dyn ClusterConnector>,
    config: ClusterConfig,
}

impl ClusterBuilder {
    /// Validates the configuration. Fails with a configuration error, before
    /// any driver activity, when no contact points are given.
    pub fn new(connector: Arc<dyn ClusterConnector>, config: ClusterConfig) -> Result<Self> {
        if config.contact_points.is_empty() {
            return Err(Error::Configuration("contact points are missing".into()));
        }

        Ok(ClusterBuilder { connector, config })
    }

    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Produces a new cluster handle. Options absent from the configuration
    /// are not forwarded, leaving driver defaults intact; disabled metrics
    /// reporting is forwarded as an explicit opt-out.
    pub fn build(&self) -> std::result::Result<Arc<dyn Cluster>, DriverError> {
        let mut builder = self.connector.new_builder();

        for contact_point in &self.config.contact_points {
            builder.add_contact_point(contact_point.clone());
        }

        if let Some(load_balancing) = self.config.load_balancing {
            builder.with_load_balancing(load_balancing);
        }
        if let Some(pooling) = &self.config.pooling {
            builder.with_pooling_options(pooling.clone());
        }
        if let Some(socket) = &self.config.socket {
            builder.with_socket_options(socket.clone());
        }
        if let Some(query) = &self.config.query {
            builder.with_query_options(query.clone());
        }
        if let Some(metrics) = &self.config.metrics {
            if !metrics.reporting_enabled {
                builder.without_metrics_reporting();
            }
        }

        builder.build()
    }
}
