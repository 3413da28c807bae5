use std::result;

use thiserror::Error as ThisError;

use crate::driver::DriverError;

pub type Result<T> = result::Result<T, Error>;

/// Errors surfaced by the session layer. The layer performs no retries and no
/// error translation: driver failures pass through unchanged, either on the
/// calling thread for synchronous operations, or through the completion
/// redelivered on the originating context for asynchronous ones.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid or missing configuration, detected before any driver activity.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// Failure surfaced by the storage driver, passed through unchanged.
    #[error(transparent)]
    Driver(#[from] DriverError),
    /// An asynchronous call was issued with no identifiable execution context
    /// to redeliver its completion on.
    #[error("No active execution context")]
    NoActiveContext,
    /// The session manager is closed, or holds no current session.
    #[error("Session manager is closed")]
    Closed,
}
