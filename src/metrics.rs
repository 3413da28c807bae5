use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use tracing::*;

/// Sink for session lifecycle notifications. Notifications are
/// fire-and-forget; no return value is consumed.
pub trait MetricsSink: Send + Sync {
    /// Called after every successful reconnect, including the initial
    /// connect.
    fn after_reconnect(&self);
    /// Called once when the owning session manager shuts down.
    fn close(&self);
}

/// Process-scoped counters bound to a session manager's lifecycle.
#[derive(Debug, Default)]
pub struct SessionMetrics {
    reconnects: AtomicU64,
    closed: AtomicBool,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Default::default()
    }

    /// Number of successful reconnects, the initial connect included.
    pub fn reconnect_count(&self) -> u64 {
        self.reconnects.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Relaxed)
    }
}

impl MetricsSink for SessionMetrics {
    fn after_reconnect(&self) {
        let count = self.reconnects.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(count, "session reconnected");
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Relaxed);
        debug!("session metrics closed");
    }
}
