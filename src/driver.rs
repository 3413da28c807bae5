//! Interfaces implemented by the storage driver.
//!
//! The session layer never executes queries, pools connections or touches the
//! network itself. It talks to the driver exclusively through the traits in
//! this module and surfaces driver failures unchanged.

use std::sync::Arc;

#[cfg(test)]
use mockall::automock;
use thiserror::Error as ThisError;

use crate::cluster::{
    ClusterMetadata, LoadBalancing, NodeAddress, PoolingOptions, QueryOptions, SocketOptions,
};
use crate::future::OperationFuture;
use crate::statement::{PreparedStatement, ResultSet, Statement};

/// Failure surfaced by the storage driver during connect, execute or prepare.
/// The session layer never interprets or transforms the payload.
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("Driver error: {0}")]
pub struct DriverError(pub String);

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        DriverError(message.into())
    }
}

/// Completion invoked with the single outcome of an asynchronous operation.
pub type Completion<V> = Box<dyn FnOnce(Result<V, DriverError>) + Send + 'static>;

/// Entry point into the storage driver: produces fresh cluster handle
/// builders on demand.
#[cfg_attr(test, automock)]
pub trait ClusterConnector: Send + Sync {
    fn new_builder(&self) -> Box<dyn ClusterHandleBuilder>;
}

/// Driver-side builder for a single cluster handle.
///
/// Setters are only invoked for options that are actually present in the
/// configuration; an untouched option means the driver default applies.
#[cfg_attr(test, automock)]
pub trait ClusterHandleBuilder: Send {
    fn add_contact_point(&mut self, address: NodeAddress);
    fn with_load_balancing(&mut self, strategy: LoadBalancing);
    fn with_pooling_options(&mut self, options: PoolingOptions);
    fn with_socket_options(&mut self, options: SocketOptions);
    fn with_query_options(&mut self, options: QueryOptions);
    /// Explicit opt-out from the driver's built-in metrics reporting.
    fn without_metrics_reporting(&mut self);
    fn build(&mut self) -> Result<Arc<dyn Cluster>, DriverError>;
}

/// A built cluster handle. Building a new handle never mutates previously
/// produced ones.
pub trait Cluster: Send + Sync {
    /// Establishes a new session, blocking the calling thread for the round
    /// trip.
    fn connect(&self) -> Result<Arc<dyn Session>, DriverError>;
    /// Current topology snapshot.
    fn metadata(&self) -> ClusterMetadata;
}

/// A live session on the cluster. Asynchronous operations return a one-shot
/// handle that the driver completes on one of its own internal threads.
pub trait Session: Send + Sync {
    fn execute(&self, statement: &Statement) -> Result<ResultSet, DriverError>;
    fn execute_async(&self, statement: &Statement) -> OperationFuture<ResultSet>;
    fn prepare(&self, query: &str) -> Result<PreparedStatement, DriverError>;
    fn prepare_async(&self, query: &str) -> OperationFuture<PreparedStatement>;
    /// Initiates close without waiting for it; the outcome is not observable
    /// through this interface.
    fn close_async(&self);
    fn is_closed(&self) -> bool;
}
