use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwapOption;
use derivative::Derivative;
use tracing::*;

use crate::cluster::{ClusterBuilder, ClusterConfig, ClusterMetadata};
use crate::context::{ContextHandle, ContextProvider, ThreadContextProvider};
use crate::dispatch::ContextDispatcher;
use crate::driver::{Cluster, ClusterConnector, Completion, Session};
use crate::error::{Error, Result};
use crate::metrics::{MetricsSink, SessionMetrics};
use crate::statement::{PreparedStatement, ResultSet, Statement};

/// Cluster handle and session swapped as a unit, so readers always observe a
/// matching pair.
struct ActiveConnection {
    cluster: Arc<dyn Cluster>,
    session: Arc<dyn Session>,
}

/// Owns the live connection to a storage cluster and routes every
/// asynchronous completion back onto the execution context that issued the
/// call.
///
/// Reading the current session is lock-free. [`reconnect`] swaps it in a
/// single atomic store, so an operation racing a reconnect simply runs
/// against whichever session was current at the instant it read the pointer;
/// the superseded session stays valid until its asynchronous close completes.
///
/// The synchronous [`execute`]/[`prepare`] calls block the calling thread for
/// the network round trip. Callers on a cooperative context forfeit
/// cooperative scheduling for that duration.
///
/// [`reconnect`]: SessionManager::reconnect
/// [`execute`]: SessionManager::execute
/// [`prepare`]: SessionManager::prepare
#[derive(Derivative)]
#[derivative(Debug)]
pub struct SessionManager {
    builder: ClusterBuilder,
    #[derivative(Debug = "ignore")]
    current: ArcSwapOption<ActiveConnection>,
    #[derivative(Debug = "ignore")]
    dispatcher: ContextDispatcher,
    #[derivative(Debug = "ignore")]
    metrics: Mutex<Option<Arc<dyn MetricsSink>>>,
    closed: AtomicBool,
    // serializes reconnect/close so two swaps never race; readers take no lock
    lifecycle_lock: Mutex<()>,
}

impl SessionManager {
    /// Validates the configuration, builds the manager and establishes the
    /// initial session.
    ///
    /// Missing contact points fail with [`Error::Configuration`] before any
    /// driver activity. Any build or connect failure propagates and no
    /// manager is returned; a half-initialized manager never exists.
    pub fn connect(
        connector: Arc<dyn ClusterConnector>,
        config: ClusterConfig,
        provider: Arc<dyn ContextProvider>,
        metrics: Arc<dyn MetricsSink>,
    ) -> Result<Self> {
        let builder = ClusterBuilder::new(connector, config)?;
        let manager = SessionManager {
            builder,
            current: ArcSwapOption::empty(),
            dispatcher: ContextDispatcher::new(provider),
            metrics: Mutex::new(Some(metrics)),
            closed: AtomicBool::new(false),
            lifecycle_lock: Mutex::new(()),
        };
        manager.reconnect()?;

        Ok(manager)
    }

    /// Builds a brand-new cluster handle, connects it and atomically swaps
    /// the result in as current. The superseded session, if any, is closed
    /// asynchronously; its closure is not awaited and its outcome is not
    /// surfaced here.
    ///
    /// On failure nothing is swapped: the previous session remains current
    /// and the error propagates to the caller.
    pub fn reconnect(&self) -> Result<()> {
        let _guard = lock(&self.lifecycle_lock);
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::Closed);
        }

        debug!("building new cluster handle");
        let cluster = self.builder.build()?;
        let session = cluster.connect()?;

        let previous = self
            .current
            .swap(Some(Arc::new(ActiveConnection { cluster, session })));
        if let Some(previous) = previous {
            previous.session.close_async();
        }

        if let Some(metrics) = lock(&self.metrics).as_ref() {
            metrics.after_reconnect();
        }
        info!("session established");

        Ok(())
    }

    /// Executes a query, blocking the calling thread for the round trip.
    pub fn execute(&self, statement: &Statement) -> Result<ResultSet> {
        let connection = self.current_connection()?;
        connection.session.execute(statement).map_err(Error::from)
    }

    /// Executes a query asynchronously. The completion is redelivered on the
    /// context active at the moment of this call; fails with
    /// [`Error::NoActiveContext`] when called outside any context.
    pub fn execute_async(
        &self,
        statement: &Statement,
        completion: Completion<ResultSet>,
    ) -> Result<()> {
        let connection = self.current_connection()?;
        let completion = self.dispatcher.wrap(completion)?;
        connection.session.execute_async(statement).on_complete(completion);

        Ok(())
    }

    /// Same as [`execute_async`](SessionManager::execute_async), with an
    /// explicitly supplied delivery context.
    pub fn execute_async_on(
        &self,
        context: ContextHandle,
        statement: &Statement,
        completion: Completion<ResultSet>,
    ) -> Result<()> {
        let connection = self.current_connection()?;
        let completion = ContextDispatcher::wrap_on(context, completion);
        connection.session.execute_async(statement).on_complete(completion);

        Ok(())
    }

    /// Prepares a statement, blocking the calling thread for the round trip.
    pub fn prepare(&self, query: &str) -> Result<PreparedStatement> {
        let connection = self.current_connection()?;
        connection.session.prepare(query).map_err(Error::from)
    }

    /// Prepares a statement asynchronously; delivery follows the same rules
    /// as [`execute_async`](SessionManager::execute_async).
    pub fn prepare_async(
        &self,
        query: &str,
        completion: Completion<PreparedStatement>,
    ) -> Result<()> {
        let connection = self.current_connection()?;
        let completion = self.dispatcher.wrap(completion)?;
        connection.session.prepare_async(query).on_complete(completion);

        Ok(())
    }

    /// Same as [`prepare_async`](SessionManager::prepare_async), with an
    /// explicitly supplied delivery context.
    pub fn prepare_async_on(
        &self,
        context: ContextHandle,
        query: &str,
        completion: Completion<PreparedStatement>,
    ) -> Result<()> {
        let connection = self.current_connection()?;
        let completion = ContextDispatcher::wrap_on(context, completion);
        connection.session.prepare_async(query).on_complete(completion);

        Ok(())
    }

    /// Topology metadata of the current cluster handle, or `None` when not
    /// connected. Never an error.
    pub fn metadata(&self) -> Option<ClusterMetadata> {
        self.current
            .load()
            .as_ref()
            .map(|connection| connection.cluster.metadata())
    }

    /// The cluster handle the current session belongs to, if any.
    pub fn cluster(&self) -> Option<Arc<dyn Cluster>> {
        self.current
            .load()
            .as_ref()
            .map(|connection| connection.cluster.clone())
    }

    /// True when no session is current, or the current session reports
    /// closed.
    pub fn is_closed(&self) -> bool {
        match self.current.load().as_ref() {
            Some(connection) => connection.session.is_closed(),
            None => true,
        }
    }

    /// Shuts the manager down: the current session is closed asynchronously
    /// and released, metrics are closed and released. Idempotent; `Closed` is
    /// terminal and no operation resurrects the manager.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let _guard = lock(&self.lifecycle_lock);
        if let Some(connection) = self.current.swap(None) {
            connection.session.close_async();
        }
        if let Some(metrics) = lock(&self.metrics).take() {
            metrics.close();
        }
        info!("session manager closed");
    }

    fn current_connection(&self) -> Result<Arc<ActiveConnection>> {
        self.current.load_full().ok_or(Error::Closed)
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.close();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|error| error.into_inner())
}

/// Builder for a [`SessionManager`]. Context discovery defaults to the
/// thread-local registry and metrics to [`SessionMetrics`].
pub struct SessionManagerBuilder {
    connector: Arc<dyn ClusterConnector>,
    config: ClusterConfig,
    provider: Arc<dyn ContextProvider>,
    metrics: Arc<dyn MetricsSink>,
}

impl SessionManagerBuilder {
    pub fn new(connector: Arc<dyn ClusterConnector>, config: ClusterConfig) -> Self {
        SessionManagerBuilder {
            connector,
            config,
            provider: Arc::new(ThreadContextProvider),
            metrics: Arc::new(SessionMetrics::new()),
        }
    }

    pub fn with_context_provider(mut self, provider: Arc<dyn ContextProvider>) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Finalizes the building process and establishes the initial session.
    pub fn build(self) -> Result<SessionManager> {
        SessionManager::connect(self.connector, self.config, self.provider, self.metrics)
    }
}
