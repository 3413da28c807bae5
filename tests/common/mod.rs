use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use uuid::Uuid;

use cluster_session::cluster::{
    ClusterConfig, ClusterMetadata, LoadBalancing, NodeAddress, NodeInfo, PoolingOptions,
    QueryOptions, SocketOptions,
};
use cluster_session::driver::{
    Cluster, ClusterConnector, ClusterHandleBuilder, DriverError, Session,
};
use cluster_session::future::{OperationFuture, OperationPromise};
use cluster_session::metrics::MetricsSink;
use cluster_session::statement::{PreparedStatement, ResultSet, Row, Statement};

/// Observable state shared by every handle the fake driver produces.
#[derive(Default)]
pub struct DriverState {
    pub builders_created: AtomicUsize,
    pub built_contact_points: Mutex<Vec<Vec<NodeAddress>>>,
    pub metrics_suppressed: AtomicBool,
    pub fail_next_connect: AtomicBool,
    pub defer_completions: AtomicBool,
    pub sessions: Mutex<Vec<Arc<FakeSession>>>,
}

impl DriverState {
    pub fn session(&self, index: usize) -> Arc<FakeSession> {
        self.sessions.lock().unwrap()[index].clone()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

/// Scripted in-memory storage driver. Sessions are tagged with creation
/// order; connects can be made to fail on demand; async completions can be
/// held back and released later from a dedicated "driver" thread.
#[derive(Default)]
pub struct FakeDriver {
    state: Arc<DriverState>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> Arc<DriverState> {
        self.state.clone()
    }
}

impl ClusterConnector for FakeDriver {
    fn new_builder(&self) -> Box<dyn ClusterHandleBuilder> {
        self.state.builders_created.fetch_add(1, Ordering::SeqCst);
        Box::new(FakeBuilder {
            state: self.state.clone(),
            contact_points: vec![],
        })
    }
}

struct FakeBuilder {
    state: Arc<DriverState>,
    contact_points: Vec<NodeAddress>,
}

impl ClusterHandleBuilder for FakeBuilder {
    fn add_contact_point(&mut self, address: NodeAddress) {
        self.contact_points.push(address);
    }

    fn with_load_balancing(&mut self, _strategy: LoadBalancing) {}

    fn with_pooling_options(&mut self, _options: PoolingOptions) {}

    fn with_socket_options(&mut self, _options: SocketOptions) {}

    fn with_query_options(&mut self, _options: QueryOptions) {}

    fn without_metrics_reporting(&mut self) {
        self.state.metrics_suppressed.store(true, Ordering::SeqCst);
    }

    fn build(&mut self) -> Result<Arc<dyn Cluster>, DriverError> {
        let contact_points = std::mem::take(&mut self.contact_points);
        self.state
            .built_contact_points
            .lock()
            .unwrap()
            .push(contact_points.clone());

        Ok(Arc::new(FakeCluster {
            state: self.state.clone(),
            contact_points,
        }))
    }
}

struct FakeCluster {
    state: Arc<DriverState>,
    contact_points: Vec<NodeAddress>,
}

impl Cluster for FakeCluster {
    fn connect(&self) -> Result<Arc<dyn Session>, DriverError> {
        if self.state.fail_next_connect.swap(false, Ordering::SeqCst) {
            return Err(DriverError::new("connect refused"));
        }

        let mut sessions = self.state.sessions.lock().unwrap();
        let session = Arc::new(FakeSession {
            id: sessions.len(),
            state: self.state.clone(),
            executed: Default::default(),
            prepared: Default::default(),
            pending: Default::default(),
            close_requested: Default::default(),
        });
        sessions.push(session.clone());

        Ok(session)
    }

    fn metadata(&self) -> ClusterMetadata {
        ClusterMetadata::new(
            Some("fake".into()),
            self.contact_points
                .iter()
                .map(|address| NodeInfo::new(address.clone(), None, None, true))
                .collect(),
        )
    }
}

pub struct FakeSession {
    pub id: usize,
    state: Arc<DriverState>,
    pub executed: Mutex<Vec<String>>,
    pub prepared: Mutex<Vec<String>>,
    pending: Mutex<Vec<(String, OperationPromise<ResultSet>)>>,
    pub close_requested: AtomicBool,
}

impl FakeSession {
    fn result_for(id: usize, query: &str) -> ResultSet {
        ResultSet::new(vec![Row::new(vec![id.to_string(), query.to_string()])])
    }

    /// Completes every held-back operation from a separate "driver" thread,
    /// joining each so callers can rely on the completions having run.
    pub fn complete_pending(&self) {
        let pending: Vec<_> = self.pending.lock().unwrap().drain(..).collect();
        let id = self.id;
        for (query, promise) in pending {
            thread::spawn(move || promise.complete(Ok(FakeSession::result_for(id, &query))))
                .join()
                .unwrap();
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

impl Session for FakeSession {
    fn execute(&self, statement: &Statement) -> Result<ResultSet, DriverError> {
        self.executed.lock().unwrap().push(statement.query().into());
        Ok(FakeSession::result_for(self.id, statement.query()))
    }

    fn execute_async(&self, statement: &Statement) -> OperationFuture<ResultSet> {
        self.executed.lock().unwrap().push(statement.query().into());
        if self.state.defer_completions.load(Ordering::SeqCst) {
            let (promise, future) = OperationFuture::new();
            self.pending
                .lock()
                .unwrap()
                .push((statement.query().into(), promise));
            future
        } else {
            OperationFuture::ready(Ok(FakeSession::result_for(self.id, statement.query())))
        }
    }

    fn prepare(&self, query: &str) -> Result<PreparedStatement, DriverError> {
        self.prepared.lock().unwrap().push(query.into());
        Ok(PreparedStatement::new(Uuid::new_v4(), query.into()))
    }

    fn prepare_async(&self, query: &str) -> OperationFuture<PreparedStatement> {
        self.prepared.lock().unwrap().push(query.into());
        OperationFuture::ready(Ok(PreparedStatement::new(Uuid::new_v4(), query.into())))
    }

    fn close_async(&self) {
        self.close_requested.store(true, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.close_requested.load(Ordering::SeqCst)
    }
}

/// Metrics sink counting notifications, for idempotency assertions.
#[derive(Default)]
pub struct CountingMetrics {
    pub reconnects: AtomicUsize,
    pub close_calls: AtomicUsize,
}

impl MetricsSink for CountingMetrics {
    fn after_reconnect(&self) {
        self.reconnects.fetch_add(1, Ordering::SeqCst);
    }

    fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn two_node_config() -> ClusterConfig {
    ClusterConfig::builder()
        .with_contact_points(vec!["10.0.0.1:9042".into(), "10.0.0.2:9042".into()])
        .build()
}
