//! Errors that can occur while serving HTTP clients.

use std::net::SocketAddr;
use thiserror::Error;

/// Errors that can occur during HTTP service operations.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Failed to bind to address
    #[error("Failed to bind to {0}")]
    BindFailed(SocketAddr),

    /// Low-level I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
