use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing configuration key: {0}")]
    MissingConfig(String),

    // Validation errors
    #[error("Invalid unlock code: {0}")]
    InvalidCode(String),
}

pub type Result<T> = std::result::Result<T, Error>;
