//! Error types for BLE sink operations.

use thiserror::Error;

/// Result type alias for BLE sink operations.
pub type Result<T> = std::result::Result<T, BleError>;

/// Errors that can occur in the BLE command sink.
#[derive(Debug, Error)]
pub enum BleError {
    /// An outbound notification could not be delivered.
    #[error("Notify failed: {0}")]
    Notify(String),
}
