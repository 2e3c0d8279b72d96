//! Application-level error aggregation.

use thiserror::Error;

/// Errors that can surface from the scheduler and startup wiring.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] latchkey_core::Error),

    #[error(transparent)]
    Hardware(#[from] latchkey_hardware::HardwareError),

    #[error(transparent)]
    Http(#[from] latchkey_http::HttpError),

    #[error("Configuration error: {0}")]
    Config(String),
}
