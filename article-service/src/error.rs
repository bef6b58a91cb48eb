//! Process-level error types
//!
//! Request-path failures are modelled by [`ApiError`](crate::articles::ApiError)
//! and [`StoreError`](crate::articles::StoreError); this type covers startup and
//! lifecycle faults (configuration, sockets, database connection).

use thiserror::Error;

/// Result type alias using the service error type
pub type Result<T> = std::result::Result<T, Error>;

/// Service error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded or extracted
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Database connection or setup failed
    #[error("Database error: {0}")]
    Database(String),

    /// I/O error (socket bind, serve loop)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
