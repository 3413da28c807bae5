//! **cluster-session** is a session-management and async-dispatch layer that
//! sits between an application's single-threaded execution contexts and a
//! clustered storage driver whose completions arrive on arbitrary internal
//! threads.
//!
//! The layer does not execute queries, pool connections or touch the network
//! itself; the driver does, behind the traits in [`driver`]. What this crate
//! guarantees is *where* completions run and *how* a live session is swapped:
//!
//! - every asynchronous completion is redelivered on the execution context
//!   that issued the call, never on a driver thread;
//! - [`reconnect`](cluster::SessionManager::reconnect) replaces the underlying
//!   session in a single atomic swap, without dropping the manager's identity
//!   or losing in-flight completion routing.
//!
//! ## Configuration
//!
//! A [`ClusterConfig`](cluster::ClusterConfig) is an immutable snapshot of
//! contact points and optional driver tuning. Absent options keep driver
//! defaults; a disabled metrics toggle is forwarded as an explicit opt-out.
//!
//! ```
//! use cluster_session::cluster::{ClusterConfig, LoadBalancing};
//!
//! let config = ClusterConfig::builder()
//!     .with_contact_points(vec!["10.0.0.1:9042".into(), "10.0.0.2:9042".into()])
//!     .with_load_balancing(LoadBalancing::RoundRobin)
//!     .build();
//!
//! assert_eq!(config.contact_points.len(), 2);
//! ```
//!
//! ## Sessions and dispatch
//!
//! A [`SessionManager`](cluster::SessionManager) is built from a config and a
//! driver [`ClusterConnector`](driver::ClusterConnector) via
//! [`SessionManagerBuilder`](cluster::SessionManagerBuilder). Asynchronous
//! calls capture the current [execution context](context) at call time; when
//! the driver completes on one of its own threads, the
//! [`ContextDispatcher`](dispatch::ContextDispatcher) reschedules delivery
//! onto the captured context's queue. Contexts are explicit values — the
//! `*_async_on` operations take one directly, while the plain `*_async`
//! operations discover the caller's context through a
//! [`ContextProvider`](context::ContextProvider) and fail with
//! [`NoActiveContext`](error::Error::NoActiveContext) when there is none.

pub mod cluster;
pub mod context;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod future;
pub mod metrics;
pub mod statement;
